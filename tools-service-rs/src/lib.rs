//! Read-only data-lookup tools
//!
//! The registry holds the catalog of tools the model is told about and the
//! dispatcher runs them, either on a remote tool backend or locally against
//! the relational store through the named-parameter binder.

pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod registry;
pub mod sql_binder;

pub use dispatcher::{DispatchRoute, ToolDispatcher};
pub use error::ToolError;
pub use executor::{MySqlExecutor, QueryExecutor, SubjectScore};
pub use registry::{is_read_only_sql, Tool, ToolRegistry, QUERY_STUDENT_SCORES};
pub use sql_binder::{bind_named, BoundQuery};
