//! `docquery doctor` — Diagnose configuration and connectivity.

use docquery_agent::{QueryAgentConfig, Tokenizer};
use docquery_config::AppConfig;
use docquery_core::provider::Provider;
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 DocQuery Doctor — System Diagnostics");
    println!("======================================\n");

    let mut issues = 0;

    let path = super::config_path(config_path);
    if path.exists() {
        println!("  ✅ Config file found: {}", path.display());
    } else {
        println!("  ⚠️  No config file at {} — using defaults (run `docquery onboard`)", path.display());
    }

    let config = match AppConfig::load(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config before running further checks.");
            return finish(1);
        }
    };

    issues += check_budget(&config);

    if let Err(e) = config.validate_credentials() {
        println!("  ❌ {e}");
        return finish(issues + 1);
    }
    println!("  ✅ Credentials configured");

    match docquery_providers::build_from_config(&config) {
        Ok(provider) => match provider.health_check().await {
            Ok(true) => {
                println!("  ✅ Completion endpoint reachable ({})", provider.name());
                issues += check_model(provider.as_ref(), &config.model).await;
            }
            Ok(false) => {
                println!("  ❌ Completion endpoint answered with an error ({})", provider.name());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Completion endpoint unreachable: {e}");
                issues += 1;
            }
        },
        Err(e) => {
            println!("  ❌ Completion provider: {e}");
            issues += 1;
        }
    }

    match docquery_vectordb::build_from_config(&config) {
        Ok(store) => match store.health_check().await {
            Ok(true) => println!(
                "  ✅ Vector store ready ({}, collection {})",
                store.name(),
                store.collection()
            ),
            Ok(false) => {
                println!("  ❌ Vector store not ready ({})", store.name());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Vector store unreachable: {e}");
                issues += 1;
            }
        },
        Err(e) => {
            println!("  ❌ Vector store: {e}");
            issues += 1;
        }
    }

    finish(issues)
}

/// Print the summary; any issue makes the command fail.
fn finish(issues: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
        Ok(())
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
        Err(format!("doctor found {issues} issue(s)").into())
    }
}

/// Confirm the endpoint serves `model`. Returns the number of issues.
///
/// An empty model list means the endpoint does not publish one.
async fn check_model(provider: &dyn Provider, model: &str) -> usize {
    match provider.list_models().await {
        Ok(models) if models.is_empty() => {
            println!("  ⚠️  Endpoint lists no models; cannot confirm '{model}'");
            0
        }
        Ok(models) if models.iter().any(|m| m == model) => {
            println!("  ✅ Model '{model}' available");
            0
        }
        Ok(_) => {
            println!("  ❌ Model '{model}' not offered by the endpoint");
            1
        }
        Err(e) => {
            println!("  ❌ Listing models failed: {e}");
            1
        }
    }
}

/// Report the tokenizer and prompt budget. Returns the number of issues.
fn check_budget(config: &AppConfig) -> usize {
    let agent = match QueryAgentConfig::from_app_config(config) {
        Ok(agent) => agent,
        Err(e) => {
            println!("  ❌ {e}");
            return 1;
        }
    };
    let tokenizer = match Tokenizer::new(agent.tokenizer, &agent.llm) {
        Ok(t) => t,
        Err(e) => {
            println!("  ❌ {e}");
            return 1;
        }
    };
    match docquery_agent::ContextBudgeter::new(
        tokenizer,
        agent.max_context_length,
        agent.context_fraction,
        &agent.system_content,
        &agent.assistant_content,
    ) {
        Ok(budget) => {
            println!(
                "  ✅ Prompt budget: {} tokens ({})",
                budget.max_tokens(),
                budget.tokenizer().name()
            );
            0
        }
        Err(e) => {
            println!("  ❌ {e}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docquery_core::error::ProviderError;
    use docquery_core::message::Message;
    use docquery_core::provider::{ProviderRequest, ProviderResponse};

    struct Listing(Vec<&'static str>);

    #[async_trait]
    impl Provider for Listing {
        fn name(&self) -> &str {
            "listing"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                message: Message::assistant(""),
                usage: None,
                model: request.model,
            })
        }

        async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
            Ok(self.0.iter().map(|m| m.to_string()).collect())
        }
    }

    #[tokio::test]
    async fn configured_model_must_be_listed() {
        assert_eq!(check_model(&Listing(vec!["gpt-4", "gpt-4o"]), "gpt-4").await, 0);
        assert_eq!(check_model(&Listing(vec!["gpt-4o"]), "gpt-4").await, 1);
        assert_eq!(check_model(&Listing(vec![]), "gpt-4").await, 0);
    }

    #[test]
    fn issues_fail_the_command() {
        assert!(finish(0).is_ok());
        let err = finish(2).unwrap_err();
        assert!(err.to_string().contains("2 issue(s)"));
    }

    #[test]
    fn budget_check_counts_oversized_instructions() {
        let mut config = AppConfig::default();
        config.agent.tokenizer = "heuristic".into();
        assert_eq!(check_budget(&config), 0);

        config.agent.max_context_length = 8;
        assert_eq!(check_budget(&config), 1);
    }
}
