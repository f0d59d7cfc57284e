//! Transport layer (HTTP).
//!
//! Adapts the path-encoded update protocol onto the core validator and store.

pub mod update;
