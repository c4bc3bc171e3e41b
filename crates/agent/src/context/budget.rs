//! Context budget: how many tokens the user message may occupy.

use super::token::Tokenizer;
use docquery_core::error::{Error, Result};

/// Share of the context window given to the prompt when none is configured.
pub const DEFAULT_CONTEXT_FRACTION: f64 = 0.5;

/// Tokens available to the user message:
/// `floor(fraction * max_context_length) - instruction_tokens`.
///
/// Fails with a configuration error when the instructions alone exceed the
/// share of the window.
pub fn context_length(
    max_context_length: usize,
    fraction: f64,
    instruction_tokens: usize,
) -> Result<usize> {
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(Error::config(format!(
            "context fraction must be in (0, 1], got {fraction}"
        )));
    }
    let window = (fraction * max_context_length as f64).floor() as usize;
    window.checked_sub(instruction_tokens).ok_or_else(|| {
        Error::config(format!(
            "instructions use {instruction_tokens} tokens but only {window} fit in \
             {fraction} of a {max_context_length}-token context"
        ))
    })
}

/// Cuts prompts down to a fixed token budget.
#[derive(Debug, Clone)]
pub struct ContextBudgeter {
    tokenizer: Tokenizer,
    max_tokens: usize,
}

impl ContextBudgeter {
    /// Derive the budget from the context window and the fixed instructions.
    pub fn new(
        tokenizer: Tokenizer,
        max_context_length: usize,
        fraction: f64,
        system_content: &str,
        assistant_content: &str,
    ) -> Result<Self> {
        let instructions = format!("{system_content}{assistant_content}");
        let max_tokens = context_length(
            max_context_length,
            fraction,
            tokenizer.count(&instructions),
        )?;
        Ok(Self {
            tokenizer,
            max_tokens,
        })
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Prefix of `text` that fits the budget.
    pub fn fit(&self, text: &str) -> String {
        self.tokenizer.trim(text, self.max_tokens)
    }
}
