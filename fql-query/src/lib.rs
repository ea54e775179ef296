//! # FQL Query
//!
//! This crate provides the FQL (FoLiA Query Language) lexer, parser and
//! evaluation engine: queries select, edit, add, delete and correct
//! annotations on a document tree provided by `fql-core`.

/// Abstract syntax tree types.
pub mod ast;
/// Error types and formatting for query parsing and evaluation.
pub mod error;
/// Query evaluation against a document.
pub mod eval;
/// Lexical analysis and tokenization.
pub mod lexer;
/// Query parsers for all query constructs.
pub mod parser;

/// Commonly used types re-exported for easy access.
pub mod prelude {
    pub use crate::{
        ast::Query,
        error::{EvalError, ParserError},
        eval::{QueryContext, QueryResult},
        parser::query::parse_query,
    };
}
