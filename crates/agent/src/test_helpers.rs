//! Shared test doubles for the pipeline tests.

use async_trait::async_trait;
use docquery_core::error::{ProviderError, VectorStoreError};
use docquery_core::message::Message;
use docquery_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use docquery_core::retrieval::{NearTextQuery, RetrievedChunk, VectorStore};
use std::sync::Mutex;

/// A provider that answers every request with the same text and records
/// what it was sent.
pub struct ScriptedProvider {
    answer: String,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);
        Ok(ProviderResponse {
            message: Message::assistant(&self.answer),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model,
        })
    }
}

/// A provider that always fails.
pub struct FailingProvider;

#[async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Err(ProviderError::ApiError {
            status_code: 500,
            message: "upstream exploded".into(),
        })
    }
}

/// A vector store that returns up to `limit` of its canned chunks and
/// records every query.
pub struct ScriptedStore {
    chunks: Vec<RetrievedChunk>,
    queries: Mutex<Vec<NearTextQuery>>,
}

impl ScriptedStore {
    pub fn new(chunks: Vec<RetrievedChunk>) -> Self {
        Self {
            chunks,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// `n` chunks with sources `a/b0.html`, `a/b1.html`, ...
    pub fn with_chunks(n: usize) -> Self {
        Self::new(
            (0..n)
                .map(|i| RetrievedChunk::new(format!("chunk {i}"), format!("a/b{i}.html")))
                .collect(),
        )
    }

    pub fn queries(&self) -> Vec<NearTextQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorStore for ScriptedStore {
    fn name(&self) -> &str {
        "scripted"
    }

    fn collection(&self) -> &str {
        "TestCollection"
    }

    async fn near_text(
        &self,
        query: NearTextQuery,
    ) -> Result<Vec<RetrievedChunk>, VectorStoreError> {
        let limit = query.limit;
        self.queries.lock().unwrap().push(query);
        Ok(self.chunks.iter().take(limit).cloned().collect())
    }
}

/// A vector store that ignores the limit and returns all of its chunks.
pub struct OverflowingStore(pub ScriptedStore);

#[async_trait]
impl VectorStore for OverflowingStore {
    fn name(&self) -> &str {
        "overflowing"
    }

    fn collection(&self) -> &str {
        "TestCollection"
    }

    async fn near_text(
        &self,
        query: NearTextQuery,
    ) -> Result<Vec<RetrievedChunk>, VectorStoreError> {
        self.0.queries.lock().unwrap().push(query);
        Ok(self.0.chunks.clone())
    }
}
