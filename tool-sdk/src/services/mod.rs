//! Typed clients for the backends the pipeline depends on

pub mod llm;
pub mod qdrant;
pub mod tool_backend;

mod common;
pub use common::UserAgent;
