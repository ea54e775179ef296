//! # FQL Core
//!
//! The annotated-document model consumed by the FQL query engine: a typed
//! element tree with set declarations, selection walks, span annotations,
//! corrections, alternatives and XML/JSON serialisation.

/// The document tree and its operations.
pub mod document;
/// Element classes, capability flags and attribute bags.
pub mod element;
/// Error types for document operations.
pub mod error;

/// Commonly used types re-exported for easy access.
pub mod prelude {
    pub use crate::document::{CorrectParams, Document, NodeId};
    pub use crate::element::{AnnotationType, AnnotatorType, ElementClass, ElementProps};
    pub use crate::error::DocumentError;
}
