//! Error types for XML parsing and composition.

use thiserror::Error;

/// Errors produced while reading or writing resource XML.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The underlying reader rejected the document.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An element attribute could not be read.
    #[error("attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Text or names could not be decoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// The document is not valid UTF-8.
    #[error("utf8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Writing the composed document failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is well-formed at the token level but not as a tree.
    #[error("malformed document: {0}")]
    Structure(String),
}

impl XmlError {
    pub(crate) fn structure(message: impl Into<String>) -> Self {
        XmlError::Structure(message.into())
    }
}

/// Result type alias for XML operations.
pub type Result<T> = std::result::Result<T, XmlError>;
