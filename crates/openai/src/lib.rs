//! Client for OpenAI-compatible completion endpoints.
//!
//! Requests go out in one of two wire shapes (chat completions and the
//! legacy text completions). A client tries its shapes in order and only
//! reports failure once every shape has failed.

pub mod client;
pub mod prompts;
pub mod shape;

pub use client::{Completion, OpenAiClient, OpenAiError, ShapeAttempt};
pub use shape::CallShape;
