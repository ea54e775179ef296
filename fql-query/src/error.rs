//! # Error Handling
//!
//! This module provides error types and formatting for FQL query parsing
//! and evaluation.

use ariadne::{Config, Label, Report, ReportKind, Source};
use chumsky::error::{RichPattern, RichReason};
use std::fmt;

use fql_core::prelude::DocumentError;

use crate::lexer::{Span, Token};

/// Represents a parsing error with detailed context for user-friendly
/// error messages.
///
/// This struct captures all relevant information about a parsing failure,
/// including what was expected, what was found, and the parsing context.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserError {
    /// A human-readable error message describing the failure.
    pub message: String,
    /// The span in the source where the error occurred.
    pub span: Span,
    /// The list of expected tokens or patterns at the error location.
    pub expected: Vec<String>,
    /// The actual token found at the error location, if any.
    pub found: Option<String>,
    /// The parsing context stack (innermost first).
    pub context: Vec<String>,
}

impl ParserError {
    /// Creates a [`ParserError`] from a chumsky Rich error (token-level).
    ///
    /// ## Arguments
    ///
    /// * `err` - The chumsky Rich error to convert.
    ///
    /// ## Returns
    ///
    /// Returns a new [`ParserError`] with information extracted from the
    /// Rich error.
    pub fn from_rich(err: &chumsky::error::Rich<'_, Token, Span>) -> Self {
        let span = *err.span();
        let found = err.found().map(|t| t.to_string());

        let expected: Vec<String> = err
            .expected()
            .map(|e| match e {
                RichPattern::Token(t) => t.to_string(),
                RichPattern::Label(l) => l.to_string(),
                RichPattern::EndOfInput => "end of input".to_string(),
                RichPattern::Identifier(s) => s.clone(),
                RichPattern::Any => "any token".to_string(),
                RichPattern::SomethingElse => "something else".to_string(),
            })
            .collect();

        let context: Vec<String> = err
            .contexts()
            .map(|(label, _)| match label {
                RichPattern::Token(t) => t.to_string(),
                RichPattern::Label(l) => l.to_string(),
                RichPattern::EndOfInput => "end of input".to_string(),
                RichPattern::Identifier(s) => s.clone(),
                RichPattern::Any => "any token".to_string(),
                RichPattern::SomethingElse => "something else".to_string(),
            })
            .collect();

        let message = match err.reason() {
            RichReason::ExpectedFound { .. } => match context.first() {
                Some(innermost) => format!("invalid {}", innermost),
                None => "invalid query".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        Self {
            message,
            span,
            expected,
            found,
            context,
        }
    }

    /// Creates a [`ParserError`] from a chumsky Rich error
    /// (character-level/lexer).
    ///
    /// ## Arguments
    ///
    /// * `err` - The chumsky Rich error from the lexer.
    ///
    /// ## Returns
    ///
    /// Returns a new [`ParserError`] with information extracted from the
    /// lexer error.
    pub fn from_lexer_rich(err: &chumsky::error::Rich<'_, char, Span>) -> Self {
        let span = *err.span();
        let found = err.found().map(|c| c.to_string());

        let expected: Vec<String> = err
            .expected()
            .map(|e| match e {
                RichPattern::Token(t) => format!("'{}'", t.into_inner()),
                RichPattern::Label(l) => l.to_string(),
                RichPattern::EndOfInput => "end of input".to_string(),
                RichPattern::Identifier(s) => s.clone(),
                RichPattern::Any => "any character".to_string(),
                RichPattern::SomethingElse => "something else".to_string(),
            })
            .collect();

        let context: Vec<String> = err
            .contexts()
            .map(|(label, _)| match label {
                RichPattern::Token(t) => t.into_inner().to_string(),
                RichPattern::Label(l) => l.to_string(),
                RichPattern::EndOfInput => "end of input".to_string(),
                RichPattern::Identifier(s) => s.clone(),
                RichPattern::Any => "any character".to_string(),
                RichPattern::SomethingElse => "something else".to_string(),
            })
            .collect();

        let message = match err.reason() {
            RichReason::ExpectedFound { .. } => "invalid token".to_string(),
            RichReason::Custom(msg) => msg.to_string(),
        };

        Self {
            message,
            span,
            expected,
            found,
            context,
        }
    }

    /// Formats the error as a human-readable string without colors.
    ///
    /// ## Arguments
    ///
    /// * `source` - The original query string for context display.
    ///
    /// ## Returns
    ///
    /// Returns a formatted error string with source context.
    pub fn format(&self, source: &str) -> String {
        self.format_impl(source, false)
    }

    /// Formats the error as a human-readable string with ANSI colors.
    ///
    /// ## Arguments
    ///
    /// * `source` - The original query string for context display.
    ///
    /// ## Returns
    ///
    /// Returns a formatted error string with source context and ANSI color
    /// codes.
    pub fn format_colored(&self, source: &str) -> String {
        self.format_impl(source, true)
    }

    /// Internal implementation for formatting errors using ariadne.
    fn format_impl(&self, source: &str, colored: bool) -> String {
        let label_msg = if self.expected.is_empty() {
            "unexpected input".to_string()
        } else if self.expected.len() == 1 {
            format!("Expected {}", self.expected[0])
        } else {
            let last = self.expected.last().unwrap();
            let rest = &self.expected[..self.expected.len() - 1];
            format!("Expected {}, or {}", rest.join(", "), last)
        };

        let mut report_builder =
            Report::build(ReportKind::Error, ("<query>", self.span.into_range()))
                .with_config(Config::default().with_color(colored))
                .with_message(&self.message)
                .with_label(
                    Label::new(("<query>", self.span.into_range())).with_message(label_msg),
                );

        if !self.context.is_empty() {
            let context_path = self
                .context
                .iter()
                .rev()
                .cloned()
                .collect::<Vec<_>>()
                .join(" -> ");
            report_builder =
                report_builder.with_help(format!("While parsing: {}", context_path));
        }

        let report = report_builder.finish();

        let mut output = Vec::new();
        if report
            .write(("<query>", Source::from(source)), &mut output)
            .is_err()
        {
            return self.to_string();
        }

        String::from_utf8(output).unwrap_or_else(|_| self.to_string())
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected_str = if self.expected.is_empty() {
            "something".to_string()
        } else if self.expected.len() == 1 {
            self.expected[0].clone()
        } else {
            let last = self.expected.last().unwrap();
            let rest = &self.expected[..self.expected.len() - 1];
            format!("{}, or {}", rest.join(", "), last)
        };

        let found_str = self.found.as_deref().unwrap_or("end of input");

        write!(
            f,
            "{}: expected {}, found {} at {}..{}",
            self.message, expected_str, found_str, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for ParserError {}

/// Represents a failure during query evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Semantic misuse of the query language against a document.
    Query(String),
    /// A declared-unsupported construct was reached.
    NotImplemented(String),
    /// A document-model operation failed.
    Document(DocumentError),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Query(msg) => write!(f, "query error: {}", msg),
            EvalError::NotImplemented(what) => write!(f, "not implemented: {}", what),
            EvalError::Document(err) => write!(f, "document error: {}", err),
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvalError::Document(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DocumentError> for EvalError {
    fn from(err: DocumentError) -> Self {
        EvalError::Document(err)
    }
}
