//! Alerting configuration core
//!
//! Decodes alerting configuration documents, enforces the receiver and
//! routing invariants, and classifies which backend a document targets.
//! Everything here is synchronous and free of shared state.

pub mod classifier;
pub mod decoder;
pub mod error;
pub mod types;
pub mod validator;
pub mod walker;

#[cfg(test)]
mod tests;

pub use decoder::{decode_document, decode_gettable, decode_postable, Document, DocumentVariant};
pub use error::ValidationError;
pub use types::*;
