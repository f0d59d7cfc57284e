//! Lightweight in-process self-observability.
//!
//! Request outcomes are stored as atomics and rendered, together with the
//! store content, by the `/metrics` handler.

pub mod metrics;
