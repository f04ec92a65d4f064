//! Serverless functions of the article pipeline.
//!
//! Each function is an async handler under [`handlers`] that takes its
//! collaborators explicitly, plus a thin Lambda binary under `src/bin` that
//! builds those collaborators from [`context::FunctionContext`] for a single
//! invocation and releases them afterwards.

pub mod cards;
pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod secrets;
pub mod telemetry;

pub use config::FunctionConfig;
pub use context::FunctionContext;
pub use error::{FunctionError, FunctionResult};
