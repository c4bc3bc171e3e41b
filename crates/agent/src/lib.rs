//! The DocQuery query pipeline.
//!
//! Each question flows through three stages:
//!
//! 1. **Retrieve** the most similar chunks from the vector store
//! 2. **Budget** the prompt `query: …, context: […]` to the token budget
//! 3. **Generate** the answer with one chat completion
//!
//! and comes back as a [`QueryResult`](docquery_core::QueryResult).

pub mod context;
pub mod generator;
pub mod query_agent;
pub mod retriever;

#[cfg(test)]
mod test_helpers;

pub use context::{ContextBudgeter, Tokenizer, TokenizerChoice, context_length};
pub use generator::AnswerGenerator;
pub use query_agent::{QueryAgent, QueryAgentConfig};
pub use retriever::{MAX_CHUNKS, Retriever};
