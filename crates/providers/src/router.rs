//! Provider selection — builds the configured completion backend.

use crate::openai_compat::OpenAiCompatProvider;
use docquery_core::error::ProviderError;
use docquery_core::provider::Provider;
use std::sync::Arc;
use std::time::Duration;

/// Build the completion provider described by `config`.
///
/// Every supported backend speaks the OpenAI chat-completions protocol;
/// only the base URL and key differ.
pub fn build_from_config(
    config: &docquery_config::AppConfig,
) -> Result<Arc<dyn Provider>, ProviderError> {
    let base_url = match (&config.api_url, default_base_url(&config.provider)) {
        (Some(url), _) => url.clone(),
        (None, Some(url)) => url,
        (None, None) => {
            return Err(ProviderError::NotConfigured(format!(
                "unknown provider '{}'; set api_url",
                config.provider
            )));
        }
    };

    let api_key = match (&config.api_key, config.is_local_provider()) {
        (Some(key), _) => key.clone(),
        (None, true) => config.provider.clone(),
        (None, false) => {
            return Err(ProviderError::NotConfigured(format!(
                "no API key for provider '{}'",
                config.provider
            )));
        }
    };

    let provider = OpenAiCompatProvider::new(
        &config.provider,
        base_url,
        api_key,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    Ok(Arc::new(provider))
}

/// Base URL of a well-known provider; `None` for names we don't know.
pub fn default_base_url(provider_name: &str) -> Option<String> {
    let url = match provider_name {
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "ollama" => "http://localhost:11434/v1",
        "groq" => "https://api.groq.com/openai/v1",
        "together" => "https://api.together.xyz/v1",
        "vllm" => "http://localhost:8000/v1",
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1",
        _ => return None,
    };
    Some(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docquery_config::AppConfig;

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openai").unwrap().contains("api.openai.com"));
        assert!(default_base_url("openrouter").unwrap().contains("openrouter.ai"));
        assert!(default_base_url("ollama").unwrap().contains("localhost:11434"));
        assert!(default_base_url("azure").is_none());
    }

    #[test]
    fn unknown_provider_without_url_fails() {
        let config = AppConfig {
            provider: "mistral".into(),
            api_key: Some("k".into()),
            ..AppConfig::default()
        };
        let err = build_from_config(&config).err().unwrap();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
        assert!(err.to_string().contains("unknown provider 'mistral'"));
    }

    #[test]
    fn unknown_provider_with_url_builds() {
        let config = AppConfig {
            provider: "mistral".into(),
            api_key: Some("k".into()),
            api_url: Some("https://api.mistral.ai/v1".into()),
            ..AppConfig::default()
        };
        assert_eq!(build_from_config(&config).unwrap().name(), "mistral");
    }

    #[test]
    fn builds_openai_with_key() {
        let config = AppConfig {
            api_key: Some("sk-test".into()),
            ..AppConfig::default()
        };
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn hosted_provider_without_key_fails() {
        let err = build_from_config(&AppConfig::default()).err().unwrap();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn local_provider_without_key_builds() {
        let config = AppConfig {
            provider: "ollama".into(),
            ..AppConfig::default()
        };
        assert_eq!(build_from_config(&config).unwrap().name(), "ollama");
    }
}
