//! # Tool SDK
//!
//! HTTP clients for the backends of the Advisor ORCH pipeline.
//!
//! This crate provides:
//!
//! - A client for OpenAI-compatible completion servers (chat and embeddings)
//! - A client for the Qdrant REST search API
//! - A client for remote tool backends
//! - A shared error type that records service, endpoint and HTTP status
//! - Configuration providers backed by environment variables or memory
//!
//! ## Architecture
//!
//! Every client is built from a [`config::ServiceConfig`] implementation and
//! funnels its requests through one send-and-decode helper, so transport
//! failures, non-success statuses and undecodable bodies all surface as a
//! [`ServiceError`] with the same context attached.

pub mod config;
pub use config::{ConfigProvider, ConfigProviderExt, ServiceConfig};

pub mod error;
pub use error::{ErrorContext, Result, ServiceError};

pub mod services;
pub use services::{llm, qdrant, tool_backend};

// Utility module for common functionality
mod util;

#[cfg(test)]
mod tests;
