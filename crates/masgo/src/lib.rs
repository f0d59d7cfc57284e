//! Top-level facade crate for masgo.
//!
//! Re-exports the core, server, and agent libraries so users can depend on a
//! single crate.

pub mod core {
    pub use masgo_core::*;
}

pub mod server {
    pub use masgo_server::*;
}

pub mod agent {
    pub use masgo_agent::*;
}
