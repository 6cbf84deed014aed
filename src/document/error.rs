//! Error types for reading and writing SVG documents

use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    /// Malformed XML reported by the reader
    #[error("XML error at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("invalid attribute on <{element}>: {message}")]
    Attribute { element: String, message: String },

    #[error("cannot resolve reference '&{name};': {message}")]
    Reference { name: String, message: String },

    #[error("closing tag </{name}> without matching opening tag")]
    UnexpectedEnd { name: String },

    #[error("element <{name}> is never closed")]
    Unclosed { name: String },

    #[error("document has no root element")]
    NoRoot,

    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),

    #[error("failed to write document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write document: {0}")]
    Write(#[from] quick_xml::Error),
}
