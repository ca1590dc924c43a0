pub mod cli;
pub mod config;
pub mod course;
pub mod engine;
pub mod error;
pub mod tree;
pub mod xp;

pub use error::{AscentError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
