//! Vector-search abstraction.
//!
//! A `VectorStore` answers near-text similarity queries over a fixed
//! document collection and returns `(text, source)` pairs, most similar first.

use crate::error::VectorStoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One chunk of documentation returned by a similarity search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// The chunk text.
    pub text: String,
    /// Opaque path-like identifier of the originating document.
    pub source: String,
}

impl RetrievedChunk {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

/// A near-text similarity query.
#[derive(Debug, Clone)]
pub struct NearTextQuery {
    /// Free-text concepts to search for.
    pub concepts: Vec<String>,
    /// Maximum number of matches the store should return.
    pub limit: usize,
    /// Optional distance cutoff; matches further away are dropped server side.
    pub max_distance: Option<f32>,
}

impl NearTextQuery {
    pub fn new(query: impl Into<String>, limit: usize) -> Self {
        Self {
            concepts: vec![query.into()],
            limit,
            max_distance: None,
        }
    }

    pub fn with_max_distance(mut self, max_distance: Option<f32>) -> Self {
        self.max_distance = max_distance;
        self
    }
}

/// The vector-search collaborator.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// A human-readable name for this backend (e.g., "weaviate").
    fn name(&self) -> &str;

    /// Name of the collection being searched.
    fn collection(&self) -> &str;

    /// Run a near-text search, returning chunks ordered by descending similarity.
    async fn near_text(
        &self,
        query: NearTextQuery,
    ) -> std::result::Result<Vec<RetrievedChunk>, VectorStoreError>;

    /// Health check — is the store ready to serve queries?
    async fn health_check(&self) -> std::result::Result<bool, VectorStoreError> {
        Ok(true)
    }
}
