//! # Common Parser Utilities
//!
//! Shared building blocks for the FQL token parsers.

use chumsky::{extra, input::ValueInput, prelude::*};
use fql_core::prelude::{AnnotatorType, ElementClass};

use crate::{
    ast::Assignments,
    error::ParserError,
    lexer::{Span, Token, lexer},
};

/// Lexes the input string into a vector of tokens.
///
/// ## Arguments
///
/// * `input` - The input string to lex.
pub(crate) fn lex_input(input: &str) -> Result<Vec<(Token, Span)>, Vec<ParserError>> {
    let (tokens, lex_errs) = lexer().parse(input).into_output_errors();

    if !lex_errs.is_empty() {
        return Err(lex_errs.iter().map(ParserError::from_lexer_rich).collect());
    }

    Ok(tokens.unwrap())
}

/// Creates a parser that matches a bare value: an identifier, a string
/// literal or a number.
pub(crate) fn value_parser<'tokens, I>()
-> impl Parser<'tokens, I, String, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    select! {
        Token::Ident(s) => s,
        Token::StringLit(s) => s,
        Token::Number(s) => s,
    }
    .labelled("value")
}

/// Creates a parser that matches a registered element type name.
pub(crate) fn element_class_parser<'tokens, I>()
-> impl Parser<'tokens, I, ElementClass, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    select! { Token::Ident(name) => name }
        .try_map(|name, span| {
            ElementClass::from_xmltag(&name)
                .ok_or_else(|| Rich::custom(span, format!("expected element type, got {}", name)))
        })
        .labelled("element type")
}

/// One parsed `attribute value` assignment pair.
#[derive(Debug, Clone)]
enum AssignPair {
    Annotator(String),
    AnnotatorType(AnnotatorType),
    Class(String),
    N(String),
    Confidence(f64),
    Text(String),
}

fn assignment_pair<'tokens, I>()
-> impl Parser<'tokens, I, AssignPair, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    select! { Token::Ident(key) => key }
        .then(value_parser())
        .try_map(|(key, value), span| match key.as_str() {
            "annotator" => Ok(AssignPair::Annotator(value)),
            "annotatortype" => AnnotatorType::parse(&value)
                .map(AssignPair::AnnotatorType)
                .ok_or_else(|| {
                    Rich::custom(span, format!("invalid value for annotatortype: {}", value))
                }),
            "class" => Ok(AssignPair::Class(value)),
            "n" => Ok(AssignPair::N(value)),
            "confidence" => value.parse::<f64>().map(AssignPair::Confidence).map_err(|_| {
                Rich::custom(span, format!("invalid value for confidence: {}", value))
            }),
            "text" => Ok(AssignPair::Text(value)),
            _ => Err(Rich::custom(
                span,
                format!("expected assignment attribute, got {}", key),
            )),
        })
        .labelled("assignment")
}

fn collect_assignments(pairs: Vec<AssignPair>) -> Assignments {
    let mut assignments = Assignments::default();
    for pair in pairs {
        match pair {
            AssignPair::Annotator(v) => assignments.annotator = Some(v),
            AssignPair::AnnotatorType(v) => assignments.annotatortype = Some(v),
            AssignPair::Class(v) => assignments.class = Some(v),
            AssignPair::N(v) => assignments.n = Some(v),
            AssignPair::Confidence(v) => assignments.confidence = Some(v),
            AssignPair::Text(v) => assignments.text = Some(v),
        }
    }
    assignments
}

/// Creates a parser for zero or more assignment pairs.
pub(crate) fn assignments_parser<'tokens, I>()
-> impl Parser<'tokens, I, Assignments, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    assignment_pair()
        .repeated()
        .collect::<Vec<_>>()
        .map(collect_assignments)
}

/// Creates a parser for the assignments after a WITH keyword; at least one
/// pair is required.
pub(crate) fn with_assignments_parser<'tokens, I>()
-> impl Parser<'tokens, I, Assignments, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    assignment_pair()
        .repeated()
        .at_least(1)
        .collect::<Vec<_>>()
        .map(collect_assignments)
        .labelled("assignments")
        .as_context()
}
