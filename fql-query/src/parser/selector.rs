//! # Selector Parser
//!
//! Parsers for single selectors (`class [OF set] [ID id] [WHERE filter]`)
//! and span expressions (`sel & sel & ...`).

use chumsky::{extra, input::ValueInput, prelude::*};
use fql_core::prelude::ElementClass;

use crate::ast::{Filter, Selector, SpanExpr};
use crate::lexer::{Span, Token};
use crate::parser::common::{element_class_parser, value_parser};

/// A trailing selector qualifier.
#[derive(Debug, Clone)]
enum Qualifier {
    Set(String),
    Id(String),
}

/// Creates a selector parser using the given filter parser for WHERE
/// clauses.
///
/// The head is either `ID <value>` or a registered element type; `OF` and
/// `ID` qualifiers may follow in any order, then an optional `WHERE`
/// filter.
pub(crate) fn selector_with<'tokens, I, F>(
    filter: F,
) -> impl Parser<'tokens, I, Selector, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
    F: Parser<'tokens, I, Filter, extra::Err<Rich<'tokens, Token, Span>>> + Clone + 'tokens,
{
    let id_head = just(Token::Id)
        .ignore_then(value_parser())
        .map(|id| (None::<ElementClass>, Some(id)));
    let class_head = element_class_parser().map(|class| (Some(class), None::<String>));

    let qualifier = choice((
        just(Token::Of).ignore_then(value_parser()).map(Qualifier::Set),
        just(Token::Id).ignore_then(value_parser()).map(Qualifier::Id),
    ));

    choice((id_head, class_head))
        .then(qualifier.repeated().collect::<Vec<_>>())
        .then(just(Token::Where).ignore_then(filter).or_not())
        .map(|(((class, id), qualifiers), filter)| {
            let mut set = None;
            let mut id = id;
            for qualifier in qualifiers {
                match qualifier {
                    Qualifier::Set(s) => set = Some(s),
                    Qualifier::Id(i) => id = Some(i),
                }
            }
            Selector {
                class,
                set,
                id,
                filter,
            }
        })
        .labelled("selector")
        .as_context()
}

/// Creates a span expression parser: one or more selectors joined by `&`.
pub(crate) fn span_with<'tokens, I, F>(
    filter: F,
) -> impl Parser<'tokens, I, SpanExpr, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
    F: Parser<'tokens, I, Filter, extra::Err<Rich<'tokens, Token, Span>>> + Clone + 'tokens,
{
    selector_with(filter)
        .separated_by(just(Token::Ampersand))
        .at_least(1)
        .collect::<Vec<_>>()
        .map(|targets| SpanExpr { targets })
        .labelled("span expression")
        .as_context()
}
