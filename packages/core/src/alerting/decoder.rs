//! Bytes to validated document.
//!
//! Decoding is two explicit phases: parse into the raw structural shape,
//! then convert, which runs the validator. A caller either gets a fully
//! validated document or an error; nothing in between is observable.

use serde::de::DeserializeOwned;

use super::error::ValidationError;
use super::types::{Backend, GettableUserConfig, PostableUserConfig, RawUserConfig, UserConfig};

/// Which document shape a payload is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentVariant {
    /// Read-model, as returned to clients.
    Gettable,
    /// Write-model, as accepted from clients.
    Postable,
}

/// A validated document of either variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Gettable(GettableUserConfig),
    Postable(PostableUserConfig),
}

impl Document {
    pub fn variant(&self) -> DocumentVariant {
        match self {
            Document::Gettable(_) => DocumentVariant::Gettable,
            Document::Postable(_) => DocumentVariant::Postable,
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            Document::Gettable(config) => config.backend(),
            Document::Postable(config) => config.backend(),
        }
    }
}

/// Decode and validate a document whose managed receivers have shape `M`.
pub fn decode<M: DeserializeOwned>(bytes: &[u8]) -> Result<UserConfig<M>, ValidationError> {
    let raw: RawUserConfig<M> = serde_json::from_slice(bytes)?;
    UserConfig::try_from(raw)
}

pub fn decode_postable(bytes: &[u8]) -> Result<PostableUserConfig, ValidationError> {
    decode(bytes)
}

pub fn decode_gettable(bytes: &[u8]) -> Result<GettableUserConfig, ValidationError> {
    decode(bytes)
}

pub fn decode_document(bytes: &[u8], variant: DocumentVariant) -> Result<Document, ValidationError> {
    match variant {
        DocumentVariant::Gettable => decode_gettable(bytes).map(Document::Gettable),
        DocumentVariant::Postable => decode_postable(bytes).map(Document::Postable),
    }
}
