//! Token counting and prefix truncation.
//!
//! Exact counts come from `tiktoken-rs` BPE encodings. The heuristic mode
//! assumes 1 token ≈ 4 bytes of text, rounding up, and is used for models
//! whose tokenizer is unknown (local backends).

use docquery_core::error::{Error, Result};
use std::str::FromStr;
use std::sync::Arc;
use tiktoken_rs::{CoreBPE, cl100k_base, o200k_base};

const HEURISTIC_BYTES_PER_TOKEN: usize = 4;

/// Which token counter to use. Parsed from `agent.tokenizer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerChoice {
    /// Pick by model name.
    Auto,
    Cl100kBase,
    O200kBase,
    Heuristic,
}

impl FromStr for TokenizerChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "cl100k_base" | "cl100k" => Ok(Self::Cl100kBase),
            "o200k_base" | "o200k" => Ok(Self::O200kBase),
            "heuristic" => Ok(Self::Heuristic),
            other => Err(Error::config(format!("unknown tokenizer '{other}'"))),
        }
    }
}

impl TokenizerChoice {
    /// Resolve `Auto` against a model identifier.
    pub fn resolve(self, model: &str) -> Self {
        if self != Self::Auto {
            return self;
        }
        let model = model.to_ascii_lowercase();
        let model = model.rsplit('/').next().unwrap_or(&model);
        if model.starts_with("gpt-4o")
            || model.starts_with("gpt-4.1")
            || model.starts_with("gpt-5")
            || model.starts_with("o1")
            || model.starts_with("o3")
            || model.starts_with("o4")
        {
            Self::O200kBase
        } else if model.starts_with("gpt-") || model.contains("text-embedding") {
            Self::Cl100kBase
        } else {
            Self::Heuristic
        }
    }
}

/// A token counter that can also cut text down to a token budget.
#[derive(Clone)]
pub enum Tokenizer {
    Bpe { name: &'static str, bpe: Arc<CoreBPE> },
    Heuristic,
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Tokenizer {
    /// Build the tokenizer for `choice`, resolving `Auto` against `model`.
    pub fn new(choice: TokenizerChoice, model: &str) -> Result<Self> {
        match choice.resolve(model) {
            TokenizerChoice::Cl100kBase => Self::bpe("cl100k_base", cl100k_base()),
            TokenizerChoice::O200kBase => Self::bpe("o200k_base", o200k_base()),
            TokenizerChoice::Heuristic | TokenizerChoice::Auto => Ok(Self::Heuristic),
        }
    }

    fn bpe<E: std::fmt::Display>(
        name: &'static str,
        loaded: std::result::Result<CoreBPE, E>,
    ) -> Result<Self> {
        loaded
            .map(|bpe| Self::Bpe {
                name,
                bpe: Arc::new(bpe),
            })
            .map_err(|e| Error::Tokenizer(format!("failed to load {name}: {e}")))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bpe { name, .. } => name,
            Self::Heuristic => "heuristic",
        }
    }

    /// Number of tokens in `text`.
    pub fn count(&self, text: &str) -> usize {
        match self {
            Self::Bpe { bpe, .. } => bpe.encode_ordinary(text).len(),
            Self::Heuristic => text.len().div_ceil(HEURISTIC_BYTES_PER_TOKEN),
        }
    }

    /// Longest prefix of `text` whose token count is at most `max_tokens`.
    ///
    /// Text already within budget is returned unchanged.
    pub fn trim(&self, text: &str, max_tokens: usize) -> String {
        match self {
            Self::Bpe { bpe, .. } => {
                let tokens = bpe.encode_ordinary(text);
                if tokens.len() <= max_tokens {
                    return text.to_string();
                }
                // A cut can land inside a multi-byte character, and a decoded
                // prefix can re-encode differently; back off until both hold.
                let mut n = max_tokens;
                while n > 0 {
                    if let Ok(prefix) = bpe.decode(tokens[..n].to_vec()) {
                        if text.starts_with(&prefix) && self.count(&prefix) <= max_tokens {
                            return prefix;
                        }
                    }
                    n -= 1;
                }
                String::new()
            }
            Self::Heuristic => {
                let max_bytes = max_tokens.saturating_mul(HEURISTIC_BYTES_PER_TOKEN);
                if text.len() <= max_bytes {
                    return text.to_string();
                }
                let mut end = max_bytes;
                while !text.is_char_boundary(end) {
                    end -= 1;
                }
                text[..end].to_string()
            }
        }
    }
}
