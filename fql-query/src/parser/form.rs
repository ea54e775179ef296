//! # Form Parser
//!
//! Parsers for the `AS ALTERNATIVE` and `AS [BARE] CORRECTION` forms that
//! wrap an action's effect.

use chumsky::{extra, input::ValueInput, prelude::*};

use crate::ast::{AlternativeForm, Assignments, CorrectionForm, Filter, Form};
use crate::lexer::{Span, Token};
use crate::parser::common::{assignments_parser, value_parser, with_assignments_parser};

/// Creates the alternative-form parser.
///
/// Grammar: `ALTERNATIVE [assigns] [WITH assigns] [WHERE filter]
/// [ALTERNATIVE ...]`.
pub(crate) fn alternative_parser<'tokens, I, F>(
    filter: F,
) -> impl Parser<'tokens, I, AlternativeForm, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
    F: Parser<'tokens, I, Filter, extra::Err<Rich<'tokens, Token, Span>>> + Clone + 'tokens,
{
    recursive(|alternative| {
        just(Token::Alternative)
            .ignore_then(assignments_parser())
            .then(just(Token::With).ignore_then(with_assignments_parser()).or_not())
            .then(just(Token::Where).ignore_then(filter.clone()).or_not())
            .then(alternative.or_not())
            .map(
                |(((subassignments, assignments), filter), next): (
                    ((Assignments, Option<Assignments>), Option<Filter>),
                    Option<AlternativeForm>,
                )| AlternativeForm {
                    subassignments,
                    assignments: assignments.unwrap_or_default(),
                    filter,
                    next: next.map(Box::new),
                },
            )
            .labelled("alternative form")
            .as_context()
    })
}

/// Creates the correction-form parser.
///
/// Grammar: `[BARE] CORRECTION [OF set] [assigns] [WHERE filter]
/// [WITH assigns] {SUGGESTION [assigns] [WITH assigns]}`.
pub(crate) fn correction_parser<'tokens, I, F>(
    filter: F,
) -> impl Parser<'tokens, I, CorrectionForm, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
    F: Parser<'tokens, I, Filter, extra::Err<Rich<'tokens, Token, Span>>> + Clone + 'tokens,
{
    let suggestion = just(Token::Suggestion)
        .ignore_then(assignments_parser())
        .then(just(Token::With).ignore_then(with_assignments_parser()).or_not())
        .map(|(subassignments, assignments)| {
            (subassignments, assignments.unwrap_or_default())
        })
        .labelled("suggestion")
        .as_context();

    just(Token::Bare)
        .or_not()
        .map(|bare| bare.is_some())
        .then_ignore(just(Token::Correction))
        .then(just(Token::Of).ignore_then(value_parser()).or_not())
        .then(assignments_parser())
        .then(just(Token::Where).ignore_then(filter).or_not())
        .then(just(Token::With).ignore_then(with_assignments_parser()).or_not())
        .then(suggestion.repeated().collect::<Vec<_>>())
        .map(
            |(((((bare, set), action_assignments), filter), assignments), suggestions)| {
                CorrectionForm {
                    set,
                    action_assignments,
                    assignments: assignments.unwrap_or_default(),
                    filter,
                    suggestions,
                    bare,
                }
            },
        )
        .labelled("correction form")
        .as_context()
}

/// Creates the parser for the form following an `AS` keyword.
pub(crate) fn form_parser<'tokens, I, F>(
    filter: F,
) -> impl Parser<'tokens, I, Form, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
    F: Parser<'tokens, I, Filter, extra::Err<Rich<'tokens, Token, Span>>> + Clone + 'tokens,
{
    choice((
        alternative_parser(filter.clone()).map(Form::Alternative),
        correction_parser(filter).map(Form::Correction),
    ))
    .labelled("form")
    .as_context()
}
