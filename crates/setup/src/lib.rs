//! `gsp-setup` library crate.
//!
//! One-shot environment bootstrap for the Grant Success Predictor store.
//! The binary entrypoint lives in `main.rs`; the modules are exposed here
//! for integration testing.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod report;
pub mod status;

pub use config::SetupConfig;
pub use error::SetupError;
