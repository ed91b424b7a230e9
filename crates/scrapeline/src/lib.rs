//! Top-level facade crate for scrapeline.
//!
//! Re-exports the registry core and the instrumented HTTP server so users can depend on a single crate.

pub mod core {
    pub use scrapeline_core::*;
}

pub mod server {
    pub use scrapeline_server::*;
}
