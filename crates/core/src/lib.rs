//! # DocQuery Core
//!
//! Domain types, traits, and error definitions for the DocQuery
//! retrieval-augmented question-answering service.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Both external collaborators (the completion endpoint and the vector-search
//! service) are defined as traits here. Implementations live in their
//! respective crates, so the query pipeline can run against test doubles.

pub mod error;
pub mod message;
pub mod provider;
pub mod retrieval;
pub mod result;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use retrieval::{NearTextQuery, RetrievedChunk, VectorStore};
pub use result::{QueryResult, source_link};
