//! Unit tests for the pipeline engine and its stages
//!
//! Backends are replaced with mockall mocks so each test can assert exactly
//! which collaborators were contacted.

pub mod pipeline_tests;
