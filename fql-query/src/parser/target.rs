//! # Target Parser
//!
//! Parser for the FOR/IN target expression that scopes an action.

use chumsky::{extra, input::ValueInput, prelude::*};

use crate::ast::{Target, TargetItem};
use crate::lexer::{Span, Token};
use crate::parser::filter::filter_parser;
use crate::parser::selector::{selector_with, span_with};

/// Creates the target parser.
///
/// A target starts with `FOR` (recursive descent) or `IN` (strict), lists
/// comma-separated selectors or `SPAN` expressions (never mixed), and may
/// end in a nested `FOR`/`IN` scope that is evaluated first.
pub(crate) fn target_parser<'tokens, I>()
-> impl Parser<'tokens, I, Target, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    let filter = filter_parser();

    let strict = choice((just(Token::For).to(false), just(Token::In).to(true)));

    let item = choice((
        just(Token::Span)
            .ignore_then(span_with(filter.clone()))
            .map(TargetItem::Span),
        selector_with(filter.clone()).map(TargetItem::Selector),
    ))
    .labelled("target");

    strict
        .then(
            item.separated_by(just(Token::Comma))
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .then(
            choice((just(Token::For), just(Token::In)))
                .ignore_then(selector_with(filter))
                .or_not(),
        )
        .try_map(|((strict, targets), nested), span| {
            let spans = targets
                .iter()
                .filter(|t| matches!(t, TargetItem::Span(_)))
                .count();
            if spans != 0 && spans != targets.len() {
                return Err(Rich::custom(
                    span,
                    "SPAN targets may not be mixed with non-span targets",
                ));
            }
            Ok(Target {
                targets,
                strict,
                nested,
            })
        })
        .labelled("target expression")
        .as_context()
}
