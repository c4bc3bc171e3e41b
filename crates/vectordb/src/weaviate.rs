//! Weaviate near-text search over GraphQL.
//!
//! Issues `Get { <Collection>(nearText: …, limit: …) { <text> <source> } }`
//! against `/v1/graphql`. Vectorization of the query happens inside Weaviate,
//! which is why the inference key is forwarded as `X-OpenAI-Api-Key`.

use async_trait::async_trait;
use docquery_core::error::VectorStoreError;
use docquery_core::retrieval::{NearTextQuery, RetrievedChunk, VectorStore};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Connection and schema settings for a Weaviate collection.
#[derive(Clone)]
pub struct WeaviateConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub inference_api_key: Option<String>,
    pub collection: String,
    pub text_field: String,
    pub source_field: String,
    pub timeout: Duration,
}

/// A Weaviate-backed [`VectorStore`].
pub struct WeaviateStore {
    base_url: String,
    config: WeaviateConfig,
    client: reqwest::Client,
}

impl WeaviateStore {
    pub fn new(config: WeaviateConfig) -> Result<Self, VectorStoreError> {
        if config.url.trim().is_empty() {
            return Err(VectorStoreError::NotConfigured("url is empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VectorStoreError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            config,
            client,
        })
    }

    /// Render the GraphQL document for a near-text query.
    fn graphql(&self, query: &NearTextQuery) -> Result<String, VectorStoreError> {
        // JSON string literals are valid GraphQL string literals.
        let concepts = serde_json::to_string(&query.concepts)
            .map_err(|e| VectorStoreError::Query(e.to_string()))?;
        let distance = query
            .max_distance
            .map(|d| format!(", distance: {d}"))
            .unwrap_or_default();

        Ok(format!(
            "{{ Get {{ {collection}(nearText: {{concepts: {concepts}{distance}}}, limit: {limit}) {{ {text} {source} }} }} }}",
            collection = self.config.collection,
            limit = query.limit,
            text = self.config.text_field,
            source = self.config.source_field,
        ))
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let mut builder = builder;
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        if let Some(key) = &self.config.inference_api_key {
            builder = builder.header("X-OpenAI-Api-Key", key);
        }
        builder
    }

    /// Pull `(text, source)` pairs out of a GraphQL response.
    fn parse_hits(&self, response: GraphQlResponse) -> Result<Vec<RetrievedChunk>, VectorStoreError> {
        if !response.errors.is_empty() {
            let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
            return Err(VectorStoreError::Query(messages.join("; ")));
        }

        let hits = response
            .data
            .as_ref()
            .and_then(|d| d["Get"][self.config.collection.as_str()].as_array())
            .ok_or_else(|| {
                VectorStoreError::MalformedResponse(format!(
                    "missing data.Get.{}",
                    self.config.collection
                ))
            })?;

        hits.iter()
            .map(|hit| {
                let field = |name: &str| {
                    hit[name].as_str().map(String::from).ok_or_else(|| {
                        VectorStoreError::MalformedResponse(format!("hit without '{name}'"))
                    })
                };
                Ok(RetrievedChunk {
                    text: field(&self.config.text_field)?,
                    source: field(&self.config.source_field)?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl VectorStore for WeaviateStore {
    fn name(&self) -> &str {
        "weaviate"
    }

    fn collection(&self) -> &str {
        &self.config.collection
    }

    async fn near_text(
        &self,
        query: NearTextQuery,
    ) -> Result<Vec<RetrievedChunk>, VectorStoreError> {
        let url = format!("{}/v1/graphql", self.base_url);
        let body = serde_json::json!({ "query": self.graphql(&query)? });

        debug!(
            collection = %self.config.collection,
            limit = query.limit,
            "Sending near-text query"
        );

        let response = self
            .request(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| VectorStoreError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return Err(VectorStoreError::AuthenticationFailed(
                "Invalid Weaviate API key".into(),
            ));
        }

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Vector store returned error");
            return Err(VectorStoreError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let parsed: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| VectorStoreError::MalformedResponse(e.to_string()))?;

        self.parse_hits(parsed)
    }

    async fn health_check(&self) -> Result<bool, VectorStoreError> {
        let url = format!("{}/v1/.well-known/ready", self.base_url);
        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| VectorStoreError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}
