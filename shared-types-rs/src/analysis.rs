//! Final response shape returned to callers

use serde::{Deserialize, Serialize};

use crate::{require_non_blank, Result, SchemaError};

/// Structured answer produced by the model.
///
/// Every field defaults when absent from the model's JSON, so an omitted
/// field is reported by `validate` as a contract violation rather than as a
/// parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredAnalysis {
    pub summary: String,
    pub analysis: AnalysisDetail,
    pub recommendations: Vec<Recommendation>,
    pub data_snapshot: DataSnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDetail {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub trend: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    pub action: String,
    pub example: String,
}

/// Subject scores the analysis was based on; zero means "missing"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSnapshot {
    pub math: i64,
    pub english: i64,
    pub physics: i64,
}

impl StructuredAnalysis {
    pub fn validate(&self) -> Result<()> {
        require_non_blank(&self.summary, "summary")?;
        self.analysis.validate()?;

        if self.recommendations.is_empty() {
            return Err(SchemaError::required("recommendations"));
        }
        for (i, rec) in self.recommendations.iter().enumerate() {
            if rec.action.trim().is_empty() || rec.example.trim().is_empty() {
                return Err(SchemaError::invalid(format!(
                    "recommendations[{}] must include action and example",
                    i
                )));
            }
        }

        self.data_snapshot.validate()
    }
}

impl AnalysisDetail {
    fn validate(&self) -> Result<()> {
        if self.strengths.is_empty() {
            return Err(SchemaError::required("analysis.strengths"));
        }
        if self.weaknesses.is_empty() {
            return Err(SchemaError::required("analysis.weaknesses"));
        }
        require_non_blank(&self.trend, "analysis.trend")
    }
}

impl DataSnapshot {
    fn validate(&self) -> Result<()> {
        if self.math == 0 || self.english == 0 || self.physics == 0 {
            return Err(SchemaError::invalid("data_snapshot requires math, english, physics"));
        }
        Ok(())
    }
}
