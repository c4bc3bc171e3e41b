//! The per-query result record and source-link rendering.

use serde::{Deserialize, Serialize};

/// Outcome of one question: produced once per query and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    /// The question as asked.
    pub question: String,
    /// Source identifiers of every retrieved chunk, in relevance order.
    pub sources: Vec<String>,
    /// The generated answer.
    pub answer: String,
    /// Model identifier that produced the answer.
    pub llm: String,
}

impl QueryResult {
    /// Display URLs for every source, in order.
    pub fn links(&self, base_url: &str) -> Vec<String> {
        self.sources.iter().map(|s| source_link(base_url, s)).collect()
    }
}

/// Build a display URL from a base URL and a source identifier.
///
/// Only the trailing path segment of the source is kept; both `\` and `/`
/// separate segments, so Windows-style paths from the ingestion machine work.
pub fn source_link(base_url: &str, source: &str) -> String {
    let segment = source.rsplit(['\\', '/']).next().unwrap_or(source);
    format!("{base_url}{segment}")
}
