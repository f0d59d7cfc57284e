//! masgo agent library entry.
//!
//! Samples process and system statistics on one interval and reports the
//! latest sample to the server on another.

pub mod collector;
pub mod config;
pub mod reporter;
pub mod runner;
