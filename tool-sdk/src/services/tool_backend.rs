//! Remote tool backend client
//!
//! A tool backend runs a registered tool on behalf of the gateway. The call is
//! `POST {base_url}/v1/tools/{name}` with the tool arguments and the SQL
//! template; the answer carries the result object under `data`.

use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{ServiceConfig, ToolBackendConfig};
use crate::error::{Result, ServiceError};
use crate::services::common::{build_http_client, create_error_context, send_json, UserAgent};
use crate::util::join_url;

const SERVICE_NAME: &str = "tools";

/// Tool invocation body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub arguments: Map<String, Value>,
    pub sql: String,
}

/// Tool invocation answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocationResponse {
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

/// Client for a remote tool backend
#[derive(Debug, Clone)]
pub struct ToolBackendClient {
    http_client: Client,
    config: ToolBackendConfig,
}

impl ToolBackendClient {
    /// Create a new client from a validated configuration
    pub fn new(config: ToolBackendConfig) -> Result<Self> {
        config.validate()?;

        let http_client = build_http_client(
            Some(UserAgent::for_client("tool-backend-client")),
            Some(Duration::from_secs(config.timeout_seconds)),
        )?;

        Ok(Self { http_client, config })
    }

    /// Server root this client talks to
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Invoke a tool and return its `data` object
    pub async fn invoke(&self, tool_name: &str, arguments: &Map<String, Value>, sql: &str) -> Result<Map<String, Value>> {
        let endpoint = format!("v1/tools/{}", tool_name);
        let url = join_url(&self.config.base_url, &endpoint);
        debug!("Invoking remote tool {}: POST {}", tool_name, url);

        let body = ToolInvocation {
            tool_name: tool_name.to_string(),
            arguments: arguments.clone(),
            sql: sql.to_string(),
        };

        let response: ToolInvocationResponse =
            send_json(SERVICE_NAME, &endpoint, self.http_client.post(&url).json(&body)).await?;

        response.data.ok_or_else(|| {
            ServiceError::parsing(format!("tool backend response for {} missing data", tool_name))
                .with_context(create_error_context(SERVICE_NAME, &endpoint, None))
        })
    }
}
