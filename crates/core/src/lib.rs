//! Shared types and the reference grant catalog for the Grant Success
//! Predictor bootstrap.
//!
//! This crate does no I/O. Everything that touches the store or the AI
//! provider lives in `gsp-db` and `gsp-openai`.

pub mod catalog;
pub mod deadline;
pub mod error;

pub use error::CoreError;
