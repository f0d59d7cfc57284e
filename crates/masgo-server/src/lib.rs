//! masgo server library entry.
//!
//! Wires the update endpoint, operational endpoints, and self-observability
//! around a single in-memory store. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod transport;
