//! masgo core: metric model, update validation, and the in-memory store.
//!
//! This crate defines the update protocol rules and accumulation semantics
//! shared by the server and the agent. It carries no transport or runtime
//! dependencies so the same rules can be exercised from HTTP handlers,
//! integration tests, and the agent's URL builder alike.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Every fallible path
//! surfaces as `MasgoError`/`Result` so a malformed update can never take the
//! server down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metric;
pub mod store;
pub mod validate;

/// Shared result type.
pub use error::{ClientCode, MasgoError, Result};
pub use metric::{Metric, MetricKind, MetricValue};
pub use store::{MemStorage, Repository};
