//! # Document Errors
//!
//! Error types raised by document-model operations.

use std::fmt;

use crate::element::ElementClass;

/// Represents a failure of a document-model operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// An element id was not found in the document index.
    UnknownId(String),
    /// An element has no text content.
    NoSuchText(ElementClass),
    /// An element that needs a parent has none.
    NoParent(ElementClass),
    /// A child could not be attached where requested.
    NotAttachable {
        /// The class of the element being attached.
        child: ElementClass,
        /// The reason the attachment was rejected.
        reason: String,
    },
    /// A correction request was inconsistent.
    InvalidCorrection(String),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::UnknownId(id) => write!(f, "unknown element id: {}", id),
            DocumentError::NoSuchText(class) => {
                write!(f, "element <{}> has no text content", class.xmltag())
            }
            DocumentError::NoParent(class) => {
                write!(f, "element <{}> has no parent", class.xmltag())
            }
            DocumentError::NotAttachable { child, reason } => {
                write!(f, "cannot attach <{}>: {}", child.xmltag(), reason)
            }
            DocumentError::InvalidCorrection(reason) => {
                write!(f, "invalid correction: {}", reason)
            }
        }
    }
}

impl std::error::Error for DocumentError {}
