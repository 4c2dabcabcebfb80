//! Qdrant vector-search client
//!
//! Talks to the Qdrant REST API and returns the `text` payload of the nearest
//! points in the configured collection.

mod models;
pub use models::*;

use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;

use crate::config::{QdrantConfig, ServiceConfig};
use crate::error::Result;
use crate::services::common::{build_http_client, send_json, UserAgent};
use crate::util::join_url;

const SERVICE_NAME: &str = "qdrant";

/// Qdrant client bound to one collection
#[derive(Debug, Clone)]
pub struct QdrantClient {
    http_client: Client,
    config: QdrantConfig,
}

impl QdrantClient {
    /// Create a new client from a validated configuration
    pub fn new(config: QdrantConfig) -> Result<Self> {
        config.validate()?;

        let http_client = build_http_client(
            Some(UserAgent::for_client("qdrant-client")),
            Some(Duration::from_secs(config.timeout_seconds)),
        )?;

        Ok(Self { http_client, config })
    }

    /// Collection searched by this client
    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    /// Run a raw search request against the collection
    pub async fn search_points(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let endpoint = format!("collections/{}/points/search", self.config.collection);
        let url = join_url(&self.config.url, &endpoint);
        debug!("Searching Qdrant: POST {} (limit {})", url, request.limit);

        let mut builder = self.http_client.post(&url).json(request);
        if let Some(ref api_key) = self.config.api_key {
            builder = builder.header("api-key", api_key);
        }

        send_json(SERVICE_NAME, &endpoint, builder).await
    }

    /// Return the texts of the `limit` nearest points, best match first.
    ///
    /// Points without a string `text` payload are skipped.
    pub async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<String>> {
        let request = SearchRequest {
            vector: vector.to_vec(),
            limit,
            with_payload: true,
            score_threshold: None,
        };

        let response = self.search_points(&request).await?;
        let total = response.result.len();
        let passages: Vec<String> = response
            .result
            .iter()
            .filter_map(|point| point.text().map(str::to_string))
            .collect();

        if passages.len() < total {
            warn!(
                "{} of {} Qdrant points had no text payload",
                total - passages.len(),
                total
            );
        }

        Ok(passages)
    }
}
