//! Top-level facade crate for pbsift.
//!
//! Re-exports the core library and the CLI library so users can depend on a single crate.

pub mod core {
    pub use pbsift_core::*;
}

pub mod cli {
    pub use pbsift_cli::*;
}
