//! Error types for the object mapper.
//!
//! Transport failures ([`TransportError`]) and document failures
//! ([`XmlError`]) convert into [`Error`] automatically, so every operation
//! returns the single [`Result`] alias.

use thiserror::Error;
use yaru_xml::XmlError;

use crate::fetch::TransportError;
use crate::kind::ResourceKind;

/// The primary error type for client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The server declared a different resource type than requested.
    #[error(
        "resource type mismatch: expected {expected}, server declared {}",
        .declared.as_deref().unwrap_or("nothing")
    )]
    TypeMismatch {
        /// Kind of the object being filled.
        expected: ResourceKind,
        /// Type parameter of the response content type.
        declared: Option<String>,
    },

    /// An entry type outside the closed vocabulary.
    #[error("unknown entry type: {0}")]
    UnknownEntryType(String),

    /// An access level outside the closed vocabulary.
    #[error("unknown access level: {0}")]
    UnknownAccessLevel(String),

    /// A club role outside the closed vocabulary.
    #[error("unknown club role: {0}")]
    UnknownClubRole(String),

    /// The operation is not defined for this resource kind.
    #[error("{operation} is not supported for {kind} resources")]
    UnsupportedOperation {
        /// Operation name.
        operation: &'static str,
        /// Kind of the receiving object.
        kind: ResourceKind,
    },

    /// A write or read could not be performed.
    #[error("{message}")]
    OperationFailed {
        /// Human-readable description.
        message: String,
        /// URL involved, when one was known.
        target: Option<String>,
    },

    /// The attribute is absent after materialization.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// A member element or declared type has no registered object kind.
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    /// The request failed at the transport level.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body is not a usable document.
    #[error(transparent)]
    Parse(#[from] XmlError),

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn failed(message: impl Into<String>, target: Option<&str>) -> Self {
        Error::OperationFailed {
            message: message.into(),
            target: target.map(str::to_string),
        }
    }

    pub(crate) fn unsupported(operation: &'static str, kind: ResourceKind) -> Self {
        Error::UnsupportedOperation { operation, kind }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
