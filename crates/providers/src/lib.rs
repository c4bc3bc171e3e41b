//! Chat-completion provider implementations for DocQuery.
//!
//! All providers implement the `docquery_core::Provider` trait.
//! [`router::build_from_config`] builds the configured one.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;
