//! `docquery ask` — Answer one question from the command line.

use docquery_agent::QueryAgent;
use docquery_core::result::QueryResult;
use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    query: &str,
    num_chunks: Option<usize>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    config.validate_credentials()?;

    let provider = docquery_providers::build_from_config(&config)?;
    let store = docquery_vectordb::build_from_config(&config)?;
    let agent = QueryAgent::from_config(&config, provider, store)?;

    let result = match num_chunks {
        Some(n) => agent.ask_with(query, n).await?,
        None => agent.ask(query).await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render(&result, &config.gateway.source_link));
    }

    Ok(())
}

/// Plain-text rendering: the answer, then one link per source.
fn render(result: &QueryResult, source_link: &str) -> String {
    let mut out = format!("Answer:\n{}\n\nSources:\n", result.answer.trim_end());
    for link in result.links(source_link) {
        out.push_str(&format!("  - {link}\n"));
    }
    out
}
