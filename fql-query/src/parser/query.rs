//! # Query Parser
//!
//! The top-level FQL parser: DECLARE statements, one action chain, an
//! optional target, an optional inline form and trailing RETURN / FORMAT /
//! REQUEST clauses.

use chumsky::{extra, input::ValueInput, prelude::*};

use crate::ast::{Action, Declaration, Form, Query};
use crate::error::ParserError;
use crate::lexer::{Span, Token};
use crate::parser::action::action_parser;
use crate::parser::common::{element_class_parser, lex_input, value_parser, with_assignments_parser};
use crate::parser::filter::filter_parser;
use crate::parser::form::form_parser;
use crate::parser::target::target_parser;

/// One trailing clause of a query.
#[derive(Debug, Clone)]
enum Trailer {
    Return(String),
    Format(String),
    Request(String),
}

/// Attaches an inline form to the final action of a chain.
fn attach_form(mut action: Action, form: Form) -> Action {
    match action.next.take() {
        Some(next) => {
            action.next = Some(Box::new(attach_form(*next, form)));
            action
        }
        None => {
            action.form = Some(form);
            action
        }
    }
}

fn query_parser<'tokens, I>()
-> impl Parser<'tokens, I, Query, extra::Err<Rich<'tokens, Token, Span>>>
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    let declaration = just(Token::Declare)
        .ignore_then(element_class_parser().try_map(|class, span| {
            if class.annotation_type().is_some() {
                Ok(class)
            } else {
                Err(Rich::custom(
                    span,
                    format!("cannot declare element type {}", class.xmltag()),
                ))
            }
        }))
        .then(just(Token::Of).ignore_then(value_parser()).or_not())
        .then(just(Token::With).ignore_then(with_assignments_parser()).or_not())
        .map(|((class, set), defaults)| Declaration {
            class,
            set,
            defaults: defaults.unwrap_or_default(),
        })
        .labelled("declaration")
        .as_context();

    let trailer = choice((
        just(Token::Return).ignore_then(value_parser()).map(Trailer::Return),
        just(Token::Format).ignore_then(value_parser()).map(Trailer::Format),
        just(Token::Request).ignore_then(value_parser()).map(Trailer::Request),
    ))
    .labelled("trailing clause");

    let inline_form = just(Token::As).ignore_then(form_parser(filter_parser()));

    declaration
        .repeated()
        .collect::<Vec<_>>()
        .then(action_parser().or_not())
        .then(target_parser().or_not())
        .then(inline_form.or_not())
        .then(trailer.repeated().collect::<Vec<_>>())
        .then_ignore(end())
        .try_map(|((((declarations, action), target), form), trailers), span| {
            let action = match form {
                Some(form) => match action {
                    Some(action) => Some(attach_form(action, form)),
                    None => {
                        return Err(Rich::custom(span, "AS clause without an action"));
                    }
                },
                None => action,
            };

            let mut return_type = None;
            let mut format = None;
            let mut request = None;
            for trailer in trailers {
                match trailer {
                    Trailer::Return(name) => return_type = Some(name),
                    Trailer::Format(name) => format = Some(name),
                    Trailer::Request(csv) => {
                        request = Some(csv.split(',').map(|s| s.to_string()).collect())
                    }
                }
            }

            Ok(Query {
                declarations,
                action,
                target,
                return_type,
                format,
                request,
            })
        })
        .labelled("query")
        .as_context()
}

/// Parses an FQL query string into a [`Query`] AST node.
///
/// ## Arguments
///
/// * `input` - The query string to parse.
///
/// ## Returns
///
/// Returns [`Ok`]\([`Query`]) if parsing succeeds, or
/// [`Err`]\([`Vec<ParserError>`]) containing all parsing errors if it
/// fails.
pub fn parse_query(input: &str) -> Result<Query, Vec<ParserError>> {
    let tokens = lex_input(input)?;
    let len = input.len();
    let eoi = Span::new((), len..len);

    let (result, parse_errs) = query_parser()
        .parse(tokens.as_slice().map(eoi, |(t, s)| (t, s)))
        .into_output_errors();

    if !parse_errs.is_empty() {
        return Err(parse_errs.iter().map(ParserError::from_rich).collect());
    }

    Ok(result.unwrap())
}
