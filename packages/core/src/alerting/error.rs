//! Error types for alerting configuration decoding and validation

use thiserror::Error;

use super::types::IntegrationKind;

/// Why a document was rejected. Every variant is deterministic: the same
/// input always fails the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("failed to parse alerting config: {message}")]
    Parse { message: String },

    #[error("cannot have both native {kind} configs & managed receivers together (receiver \"{receiver}\")")]
    ReceiverMix {
        receiver: String,
        kind: IntegrationKind,
    },

    #[error("duplicate receiver name \"{name}\"")]
    DuplicateReceiver { name: String },

    #[error("cannot mix Alertmanager & Grafana receiver types")]
    BackendMix,

    #[error("unexpected receiver ({name}) is undefined")]
    UndefinedReceiver { name: String },

    #[error("routing tree exceeds maximum depth of {max_depth}")]
    RouteTooDeep { max_depth: usize },
}

impl ValidationError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse { message: message.into() }
    }

    pub fn receiver_mix(receiver: impl Into<String>, kind: IntegrationKind) -> Self {
        Self::ReceiverMix {
            receiver: receiver.into(),
            kind,
        }
    }

    pub fn duplicate_receiver(name: impl Into<String>) -> Self {
        Self::DuplicateReceiver { name: name.into() }
    }

    pub fn undefined_receiver(name: impl Into<String>) -> Self {
        Self::UndefinedReceiver { name: name.into() }
    }

    /// Stable short label, used as a metrics dimension.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse",
            Self::ReceiverMix { .. } => "receiver_mix",
            Self::DuplicateReceiver { .. } => "duplicate_receiver",
            Self::BackendMix => "backend_mix",
            Self::UndefinedReceiver { .. } => "undefined_receiver",
            Self::RouteTooDeep { .. } => "route_too_deep",
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}
