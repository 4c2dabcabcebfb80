//! Qdrant REST data models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /collections/{collection}/points/search`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRequest {
    /// Query vector
    pub vector: Vec<f32>,

    /// Maximum number of points to return
    pub limit: usize,

    /// Whether to return point payloads
    pub with_payload: bool,

    /// Minimum similarity score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_threshold: Option<f32>,
}

/// A point returned by a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPoint {
    /// Point identifier (integer or UUID)
    #[serde(default)]
    pub id: Value,

    /// Similarity score
    #[serde(default)]
    pub score: f32,

    /// Point payload
    #[serde(default)]
    pub payload: Option<Map<String, Value>>,
}

impl ScoredPoint {
    /// The `text` payload field, when present and a string
    pub fn text(&self) -> Option<&str> {
        self.payload.as_ref()?.get("text")?.as_str()
    }
}

/// Search response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub result: Vec<ScoredPoint>,

    #[serde(default)]
    pub status: Option<Value>,

    #[serde(default)]
    pub time: Option<f64>,
}
