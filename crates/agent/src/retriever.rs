//! Retriever: top-N similar chunks from the vector store.

use docquery_core::error::{Result, VectorStoreError};
use docquery_core::retrieval::{NearTextQuery, RetrievedChunk, VectorStore};
use std::sync::Arc;
use tracing::debug;

/// Hard cap on chunks used per query, whatever the caller asks for.
pub const MAX_CHUNKS: usize = 5;

/// Fetches the most similar chunks for a query.
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    max_distance: Option<f32>,
}

impl Retriever {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self {
            store,
            max_distance: None,
        }
    }

    /// Drop matches further than `max_distance` (server side).
    pub fn with_max_distance(mut self, max_distance: Option<f32>) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Up to `min(num_chunks, MAX_CHUNKS)` chunks, most similar first.
    ///
    /// `num_chunks` is sent to the store as the limit; an empty result is
    /// an error.
    pub async fn retrieve(&self, query: &str, num_chunks: usize) -> Result<Vec<RetrievedChunk>> {
        let request = NearTextQuery::new(query, num_chunks).with_max_distance(self.max_distance);
        let mut chunks = self.store.near_text(request).await?;
        chunks.truncate(num_chunks.min(MAX_CHUNKS));

        debug!(
            store = self.store.name(),
            requested = num_chunks,
            returned = chunks.len(),
            "Retrieved chunks"
        );

        if chunks.is_empty() {
            return Err(VectorStoreError::NoMatches {
                collection: self.store.collection().to_string(),
            }
            .into());
        }
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{OverflowingStore, ScriptedStore};
    use docquery_core::Error;

    #[tokio::test]
    async fn caps_at_five() {
        let store = Arc::new(OverflowingStore(ScriptedStore::with_chunks(10)));
        let retriever = Retriever::new(store.clone());

        for n in [1, 3, 5, 8, 20] {
            let chunks = retriever.retrieve("q", n).await.unwrap();
            assert_eq!(chunks.len(), n.min(MAX_CHUNKS), "n={n}");
        }
        // The requested count goes to the store untouched.
        assert_eq!(store.0.queries().last().unwrap().limit, 20);
    }

    #[tokio::test]
    async fn fewer_matches_than_requested() {
        let retriever = Retriever::new(Arc::new(ScriptedStore::with_chunks(2)));
        let chunks = retriever.retrieve("q", 5).await.unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].source, "a/b0.html");
    }

    #[tokio::test]
    async fn empty_result_is_no_matches() {
        let retriever = Retriever::new(Arc::new(ScriptedStore::new(vec![])));
        let err = retriever.retrieve("q", 5).await.unwrap_err();
        assert!(matches!(
            err,
            Error::VectorStore(VectorStoreError::NoMatches { .. })
        ));
    }

    #[tokio::test]
    async fn forwards_distance_cutoff() {
        let store = Arc::new(ScriptedStore::with_chunks(5));
        let retriever = Retriever::new(store.clone()).with_max_distance(Some(0.3));
        retriever.retrieve("what is a random forest", 3).await.unwrap();

        let sent = &store.queries()[0];
        assert_eq!(sent.concepts, vec!["what is a random forest".to_string()]);
        assert_eq!(sent.limit, 3);
        assert_eq!(sent.max_distance, Some(0.3));
    }
}
