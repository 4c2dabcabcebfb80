//! Tool Registry
//!
//! Holds the catalog of callable tools. Every tool is validated when the
//! registry is built and the registry never changes afterwards, so it can be
//! shared behind an `Arc` by every request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tool_sdk::llm::ToolSpec;
use tracing::info;

use crate::error::ToolError;

/// Name of the student score lookup
pub const QUERY_STUDENT_SCORES: &str = "query_student_scores";

/// A named, schema-described read-only data lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments, shown to the model
    pub parameters: Value,
    /// Query text with `:name` placeholders
    pub sql_template: String,
}

impl Tool {
    pub fn validate(&self) -> Result<(), ToolError> {
        if self.name.trim().is_empty() {
            return Err(ToolError::invalid_definition(&self.name, "tool name required"));
        }
        if !self.parameters.is_object() {
            return Err(ToolError::invalid_definition(&self.name, "tool parameters required"));
        }
        if self.sql_template.trim().is_empty() {
            return Err(ToolError::invalid_definition(&self.name, "sql template required"));
        }
        if !is_read_only_sql(&self.sql_template) {
            return Err(ToolError::invalid_definition(&self.name, "sql template must be read-only"));
        }
        Ok(())
    }

    /// Function description in the completion server's tool format
    pub fn spec(&self) -> ToolSpec {
        ToolSpec::function(&self.name, &self.description, self.parameters.clone())
    }
}

/// A template is read-only when it starts with `select ` and holds a single
/// statement.
pub fn is_read_only_sql(sql: &str) -> bool {
    let trimmed = sql.trim().to_lowercase();
    trimmed.starts_with("select ") && !trimmed.contains(';')
}

/// Tools registered when no other catalog is supplied
pub fn default_tools() -> Vec<Tool> {
    vec![Tool {
        name: QUERY_STUDENT_SCORES.to_string(),
        description: "Fetch a student's subject scores for a term".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "student_id": {"type": "integer"},
                "term": {"type": "string"}
            },
            "required": ["student_id"]
        }),
        sql_template: "select subject, score from student_scores where student_id = :student_id and term = :term"
            .to_string(),
    }]
}

/// Immutable catalog of validated tools, keyed by name
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Tool>,
}

impl ToolRegistry {
    /// Validate and register `tools`. Duplicate names are rejected.
    pub fn new(tools: Vec<Tool>) -> Result<Self, ToolError> {
        let mut registered = BTreeMap::new();

        for tool in tools {
            tool.validate()?;
            if registered.contains_key(&tool.name) {
                return Err(ToolError::invalid_definition(&tool.name, "duplicate tool name"));
            }
            registered.insert(tool.name.clone(), tool);
        }

        info!(tools = registered.len(), "tool registry loaded");
        Ok(Self { tools: registered })
    }

    pub fn with_default_tools() -> Result<Self, ToolError> {
        Self::new(default_tools())
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Registered tools in name order
    pub fn tools(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values()
    }

    /// The whole catalog in the completion server's tool format
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools().map(Tool::spec).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
