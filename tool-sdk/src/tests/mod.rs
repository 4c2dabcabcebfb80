//! Unit tests for the Tool SDK
//!
//! This module contains tests for the error taxonomy, configuration loading
//! and the three backend clients.

pub mod config_tests;
pub mod error_tests;
