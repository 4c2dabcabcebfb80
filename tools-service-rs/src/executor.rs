//! Local query execution against the relational store

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::mysql::{MySql, MySqlArguments, MySqlPool, MySqlPoolOptions};
use sqlx::query::QueryAs;
use tracing::{debug, info};

use crate::error::ToolError;
use crate::sql_binder::BoundQuery;

const MAX_CONNECTIONS: u32 = 10;

/// One row of the student score lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectScore {
    pub subject: String,
    pub score: i64,
}

/// Runs bound read-only queries
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run a query whose rows are `(subject, score)` pairs
    async fn fetch_subject_scores(&self, query: &BoundQuery) -> Result<Vec<SubjectScore>, ToolError>;
}

/// MySQL executor backed by a shared connection pool
#[derive(Debug, Clone)]
pub struct MySqlExecutor {
    pool: MySqlPool,
}

impl MySqlExecutor {
    /// Open a pool for `dsn`. Connections are established on first use.
    pub fn connect(driver: &str, dsn: &str) -> Result<Self, ToolError> {
        if !driver.trim().eq_ignore_ascii_case("mysql") {
            return Err(ToolError::UnsupportedDriver(driver.to_string()));
        }
        if dsn.trim().is_empty() {
            return Err(ToolError::NotConfigured("sql dsn is required".to_string()));
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_lazy(dsn)?;

        info!(max_connections = MAX_CONNECTIONS, "mysql pool opened");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Close every pooled connection and wait for checked-out ones to return
    pub async fn close(&self) {
        self.pool.close().await;
        info!("mysql pool closed");
    }
}

fn bind_value<'q, O>(
    query: QueryAs<'q, MySql, O, MySqlArguments>,
    value: &Value,
) -> QueryAs<'q, MySql, O, MySqlArguments> {
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(flag) => query.bind(*flag),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                query.bind(int)
            } else if let Some(uint) = number.as_u64() {
                query.bind(uint)
            } else {
                query.bind(number.as_f64().unwrap_or_default())
            }
        }
        Value::String(text) => query.bind(text.clone()),
        // Arrays and objects go over as JSON text
        other => query.bind(other.to_string()),
    }
}

#[async_trait]
impl QueryExecutor for MySqlExecutor {
    async fn fetch_subject_scores(&self, query: &BoundQuery) -> Result<Vec<SubjectScore>, ToolError> {
        debug!(sql = %query.sql, args = query.args.len(), "running local tool query");

        let mut statement = sqlx::query_as::<_, (String, i64)>(&query.sql);
        for value in &query.args {
            statement = bind_value(statement, value);
        }

        let rows = statement.fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|(subject, score)| SubjectScore { subject, score })
            .collect())
    }
}
