//! Answer generator: one chat completion per query.

use docquery_core::error::Result;
use docquery_core::message::Message;
use docquery_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;
use tracing::debug;

/// Sends `[system, assistant, user]` to the completion provider.
pub struct AnswerGenerator {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: Option<f32>,
}

impl AnswerGenerator {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The generated text of the first choice.
    pub async fn generate(
        &self,
        system_content: &str,
        assistant_content: &str,
        user_content: &str,
    ) -> Result<String> {
        let mut request = ProviderRequest::new(
            self.model.clone(),
            vec![
                Message::system(system_content),
                Message::assistant(assistant_content),
                Message::user(user_content),
            ],
        );
        request.temperature = self.temperature;

        debug!(
            provider = self.provider.name(),
            model = %self.model,
            "Requesting completion"
        );

        let response = self.provider.complete(request).await?;
        if let Some(usage) = &response.usage {
            debug!(
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Completion usage"
            );
        }
        Ok(response.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{FailingProvider, ScriptedProvider};
    use docquery_core::message::Role;

    #[tokio::test]
    async fn sends_three_messages_in_order() {
        let provider = Arc::new(ScriptedProvider::new("Use fit()."));
        let generator = AnswerGenerator::new(provider.clone(), "gpt-4");

        let answer = generator
            .generate("Be succinct.", "", "query: how?, context: []")
            .await
            .unwrap();
        assert_eq!(answer, "Use fit().");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let roles: Vec<Role> = requests[0].messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::Assistant, Role::User]);
        assert_eq!(requests[0].messages[2].content, "query: how?, context: []");
        assert_eq!(requests[0].model, "gpt-4");
        assert_eq!(requests[0].temperature, None);
    }

    #[tokio::test]
    async fn forwards_temperature() {
        let provider = Arc::new(ScriptedProvider::new("ok"));
        let generator = AnswerGenerator::new(provider.clone(), "gpt-4").with_temperature(Some(0.2));
        generator.generate("s", "a", "u").await.unwrap();
        assert_eq!(provider.requests()[0].temperature, Some(0.2));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let generator = AnswerGenerator::new(Arc::new(FailingProvider), "gpt-4");
        let err = generator.generate("s", "a", "u").await.unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("upstream exploded"));
    }
}
