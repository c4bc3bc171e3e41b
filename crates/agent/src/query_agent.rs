//! The query agent: retrieve → budget → generate → result.
//!
//! Built once with the model, the fixed instructions and the collaborator
//! handles. The prompt budget is computed at construction and never changes;
//! nothing else is kept between queries.

use crate::context::{ContextBudgeter, Tokenizer, TokenizerChoice};
use crate::generator::AnswerGenerator;
use crate::retriever::Retriever;
use docquery_config::AppConfig;
use docquery_core::error::{Error, Result};
use docquery_core::provider::Provider;
use docquery_core::result::QueryResult;
use docquery_core::retrieval::VectorStore;
use std::sync::Arc;
use tracing::info;

/// Construction parameters for a [`QueryAgent`].
#[derive(Debug, Clone)]
pub struct QueryAgentConfig {
    pub llm: String,
    pub temperature: Option<f32>,
    pub system_content: String,
    pub assistant_content: String,
    pub max_context_length: usize,
    pub context_fraction: f64,
    pub tokenizer: TokenizerChoice,
    pub num_chunks: usize,
    pub max_distance: Option<f32>,
}

impl Default for QueryAgentConfig {
    fn default() -> Self {
        Self {
            llm: "gpt-4".into(),
            temperature: None,
            system_content: "Answer the query using the context provided. Be succinct.".into(),
            assistant_content: String::new(),
            max_context_length: 4096,
            context_fraction: crate::context::budget::DEFAULT_CONTEXT_FRACTION,
            tokenizer: TokenizerChoice::Auto,
            num_chunks: 5,
            max_distance: None,
        }
    }
}

impl QueryAgentConfig {
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            llm: config.model.clone(),
            temperature: config.temperature,
            system_content: config.agent.system_content.clone(),
            assistant_content: config.agent.assistant_content.clone(),
            max_context_length: config.agent.max_context_length,
            context_fraction: config.agent.context_fraction,
            tokenizer: config.agent.tokenizer.parse()?,
            num_chunks: config.agent.num_chunks,
            max_distance: config.vector_store.max_distance,
        })
    }
}

/// Answers questions over the document collection.
pub struct QueryAgent {
    llm: String,
    system_content: String,
    assistant_content: String,
    num_chunks: usize,
    budgeter: ContextBudgeter,
    retriever: Retriever,
    generator: AnswerGenerator,
}

impl QueryAgent {
    /// Fix the model, instructions and budget.
    ///
    /// Fails with a configuration error if the instructions leave no room
    /// for the prompt.
    pub fn new(
        config: QueryAgentConfig,
        provider: Arc<dyn Provider>,
        store: Arc<dyn VectorStore>,
    ) -> Result<Self> {
        if config.num_chunks == 0 {
            return Err(Error::config("num_chunks must be >= 1"));
        }

        let tokenizer = Tokenizer::new(config.tokenizer, &config.llm)?;
        let budgeter = ContextBudgeter::new(
            tokenizer,
            config.max_context_length,
            config.context_fraction,
            &config.system_content,
            &config.assistant_content,
        )?;

        info!(
            llm = %config.llm,
            tokenizer = budgeter.tokenizer().name(),
            context_length = budgeter.max_tokens(),
            "Query agent ready"
        );

        Ok(Self {
            retriever: Retriever::new(store).with_max_distance(config.max_distance),
            generator: AnswerGenerator::new(provider, config.llm.clone())
                .with_temperature(config.temperature),
            llm: config.llm,
            system_content: config.system_content,
            assistant_content: config.assistant_content,
            num_chunks: config.num_chunks,
            budgeter,
        })
    }

    /// Build from the application config.
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        store: Arc<dyn VectorStore>,
    ) -> Result<Self> {
        Self::new(QueryAgentConfig::from_app_config(config)?, provider, store)
    }

    pub fn llm(&self) -> &str {
        &self.llm
    }

    /// Tokens available to the user message.
    pub fn context_length(&self) -> usize {
        self.budgeter.max_tokens()
    }

    /// Answer `query` using the configured number of chunks.
    pub async fn ask(&self, query: &str) -> Result<QueryResult> {
        self.ask_with(query, self.num_chunks).await
    }

    /// Answer `query` using up to `num_chunks` retrieved chunks.
    pub async fn ask_with(&self, query: &str, num_chunks: usize) -> Result<QueryResult> {
        if query.trim().is_empty() {
            return Err(Error::InvalidInput("query must not be empty".into()));
        }
        if num_chunks == 0 {
            return Err(Error::InvalidInput("num_chunks must be >= 1".into()));
        }

        let chunks = self.retriever.retrieve(query, num_chunks).await?;
        let (texts, sources): (Vec<String>, Vec<String>) =
            chunks.into_iter().map(|c| (c.text, c.source)).unzip();

        let user_content = self.budgeter.fit(&render_prompt(query, &texts));

        let answer = self
            .generator
            .generate(&self.system_content, &self.assistant_content, &user_content)
            .await?;

        info!(
            chunks = sources.len(),
            answer_len = answer.len(),
            "Answered query"
        );

        Ok(QueryResult {
            question: query.to_string(),
            sources,
            answer,
            llm: self.llm.clone(),
        })
    }
}

/// `query: <q>, context: ["<chunk>", ...]`
fn render_prompt(query: &str, texts: &[String]) -> String {
    format!("query: {query}, context: {texts:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{FailingProvider, ScriptedProvider, ScriptedStore};
    use docquery_core::error::VectorStoreError;
    use docquery_core::retrieval::RetrievedChunk;

    fn heuristic_config() -> QueryAgentConfig {
        QueryAgentConfig {
            tokenizer: TokenizerChoice::Heuristic,
            ..Default::default()
        }
    }

    #[test]
    fn renders_quoted_context_list() {
        let prompt = render_prompt("q?", &["one".into(), "two \"x\"".into()]);
        assert_eq!(prompt, r#"query: q?, context: ["one", "two \"x\""]"#);
    }

    #[tokio::test]
    async fn decision_tree_end_to_end() {
        let provider = Arc::new(ScriptedProvider::new("A decision tree is..."));
        let store = Arc::new(ScriptedStore::with_chunks(5));
        let agent = QueryAgent::new(heuristic_config(), provider.clone(), store).unwrap();

        let result = agent.ask("What is a decision tree?").await.unwrap();
        assert_eq!(result.question, "What is a decision tree?");
        assert_eq!(result.answer, "A decision tree is...");
        assert_eq!(result.llm, "gpt-4");
        assert_eq!(result.sources.len(), 5);
        assert_eq!(result.sources[0], "a/b0.html");
        assert_eq!(result.sources[4], "a/b4.html");

        let sent = &provider.requests()[0].messages[2].content;
        assert!(sent.starts_with("query: What is a decision tree?, context: [\"chunk 0\""));
    }

    #[tokio::test]
    async fn empty_query_makes_no_calls() {
        let provider = Arc::new(ScriptedProvider::new("unused"));
        let store = Arc::new(ScriptedStore::with_chunks(5));
        let agent = QueryAgent::new(heuristic_config(), provider.clone(), store.clone()).unwrap();

        let err = agent.ask("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(store.queries().is_empty());
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn prompt_is_trimmed_but_sources_are_not() {
        let long = "x".repeat(10_000);
        let store = Arc::new(ScriptedStore::new(vec![
            RetrievedChunk::new(long.clone(), "a/one.html"),
            RetrievedChunk::new(long, "a/two.html"),
        ]));
        let provider = Arc::new(ScriptedProvider::new("ok"));
        let config = QueryAgentConfig {
            max_context_length: 200,
            system_content: String::new(),
            ..heuristic_config()
        };
        let agent = QueryAgent::new(config, provider.clone(), store).unwrap();
        assert_eq!(agent.context_length(), 100);

        let result = agent.ask_with("q", 2).await.unwrap();
        assert_eq!(result.sources, vec!["a/one.html", "a/two.html"]);

        let sent = &provider.requests()[0].messages[2].content;
        assert!(Tokenizer::Heuristic.count(sent) <= 100);
        assert!(sent.starts_with("query: q, context: ["));
    }

    #[tokio::test]
    async fn num_chunks_override_is_capped() {
        let store = Arc::new(ScriptedStore::with_chunks(5));
        let agent = QueryAgent::new(
            heuristic_config(),
            Arc::new(ScriptedProvider::new("ok")),
            store.clone(),
        )
        .unwrap();

        let result = agent.ask_with("q", 2).await.unwrap();
        assert_eq!(result.sources.len(), 2);
        assert_eq!(store.queries()[0].limit, 2);
        assert!(agent.ask_with("q", 0).await.is_err());
    }

    #[tokio::test]
    async fn no_matches_propagates() {
        let agent = QueryAgent::new(
            heuristic_config(),
            Arc::new(ScriptedProvider::new("ok")),
            Arc::new(ScriptedStore::new(vec![])),
        )
        .unwrap();
        let err = agent.ask("q").await.unwrap_err();
        assert!(matches!(
            err,
            Error::VectorStore(VectorStoreError::NoMatches { .. })
        ));
    }

    #[tokio::test]
    async fn completion_failure_propagates() {
        let agent = QueryAgent::new(
            heuristic_config(),
            Arc::new(FailingProvider),
            Arc::new(ScriptedStore::with_chunks(1)),
        )
        .unwrap();
        assert!(agent.ask("q").await.unwrap_err().is_upstream());
    }

    #[test]
    fn oversized_instructions_rejected() {
        let config = QueryAgentConfig {
            max_context_length: 16,
            system_content: "long instructions ".repeat(10),
            ..heuristic_config()
        };
        let result = QueryAgent::new(
            config,
            Arc::new(ScriptedProvider::new("ok")),
            Arc::new(ScriptedStore::with_chunks(1)),
        );
        assert!(matches!(result.err(), Some(Error::Config { .. })));
    }

    #[test]
    fn from_app_config_reads_agent_section() {
        let mut app = AppConfig::default();
        app.model = "gpt-4o".into();
        app.agent.tokenizer = "heuristic".into();
        app.agent.num_chunks = 3;
        app.vector_store.max_distance = Some(0.4);

        let config = QueryAgentConfig::from_app_config(&app).unwrap();
        assert_eq!(config.llm, "gpt-4o");
        assert_eq!(config.tokenizer, TokenizerChoice::Heuristic);
        assert_eq!(config.num_chunks, 3);
        assert_eq!(config.max_distance, Some(0.4));

        app.agent.tokenizer = "bogus".into();
        assert!(QueryAgentConfig::from_app_config(&app).is_err());
    }

    #[test]
    fn default_budget_with_gpt4_tokenizer() {
        let agent = QueryAgent::new(
            QueryAgentConfig::default(),
            Arc::new(ScriptedProvider::new("ok")),
            Arc::new(ScriptedStore::with_chunks(1)),
        )
        .unwrap();
        let instructions = Tokenizer::new(TokenizerChoice::Cl100kBase, "gpt-4")
            .unwrap()
            .count("Answer the query using the context provided. Be succinct.");
        assert_eq!(agent.context_length(), 2048 - instructions);
    }
}
