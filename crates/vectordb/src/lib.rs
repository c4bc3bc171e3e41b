//! Vector-search clients for DocQuery.
//!
//! All backends implement the `docquery_core::VectorStore` trait.

pub mod weaviate;

pub use weaviate::{WeaviateConfig, WeaviateStore};

use docquery_core::error::VectorStoreError;
use docquery_core::retrieval::VectorStore;
use std::sync::Arc;
use std::time::Duration;

/// Build the vector store described by `config`.
pub fn build_from_config(
    config: &docquery_config::AppConfig,
) -> Result<Arc<dyn VectorStore>, VectorStoreError> {
    let vs = &config.vector_store;
    let store = WeaviateStore::new(WeaviateConfig {
        url: vs.url.clone(),
        api_key: vs.api_key.clone(),
        inference_api_key: vs.inference_api_key.clone(),
        collection: vs.collection.clone(),
        text_field: vs.text_field.clone(),
        source_field: vs.source_field.clone(),
        timeout: Duration::from_secs(config.request_timeout_secs),
    })?;
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docquery_config::AppConfig;

    #[test]
    fn builds_from_config() {
        let mut config = AppConfig::default();
        config.vector_store.url = "https://cluster.weaviate.network".into();
        let store = build_from_config(&config).unwrap();
        assert_eq!(store.name(), "weaviate");
        assert_eq!(store.collection(), "ScikitLearnDocumentation");
    }

    #[test]
    fn empty_url_rejected() {
        let err = build_from_config(&AppConfig::default()).err().unwrap();
        assert!(err.to_string().contains("url"));
    }
}
