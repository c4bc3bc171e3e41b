//! Prompt budgeting.
//!
//! The user message sent to the model is cut down to a fixed token budget
//! derived once from the model's context window and the fixed instructions.

pub mod budget;
pub mod token;

pub use budget::{ContextBudgeter, context_length};
pub use token::{Tokenizer, TokenizerChoice};
