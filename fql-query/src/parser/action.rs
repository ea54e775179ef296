//! # Action Parser
//!
//! Parser for one action (verb, focus, assignments, RESPAN, subaction and
//! form groups) and the chain of actions that follows it.

use chumsky::{extra, input::ValueInput, prelude::*};

use crate::ast::{Action, Form, Verb};
use crate::lexer::{Span, Token};
use crate::parser::common::with_assignments_parser;
use crate::parser::filter::filter_parser;
use crate::parser::form::form_parser;
use crate::parser::selector::{selector_with, span_with};

/// The content of one parenthesised group after the focus.
#[derive(Debug, Clone)]
enum GroupItem {
    /// A subaction run against the focus selection.
    Sub(Action),
    /// An `AS ...` form the action delegates to.
    Form(Form),
}

/// Creates the action parser, including the `next` chain.
pub(crate) fn action_parser<'tokens, I>()
-> impl Parser<'tokens, I, Action, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    recursive(|action| {
        let filter = filter_parser();
        let selector = selector_with(filter.clone());

        let verb = choice((
            just(Token::Select).to(Verb::Select),
            just(Token::Edit).to(Verb::Edit),
            just(Token::Add).to(Verb::Add),
            just(Token::Append).to(Verb::Append),
            just(Token::Prepend).to(Verb::Prepend),
            just(Token::Delete).to(Verb::Delete),
            just(Token::Merge).to(Verb::Merge),
            just(Token::Split).to(Verb::Split),
        ))
        .labelled("action verb");

        let group = choice((
            just(Token::As)
                .ignore_then(form_parser(filter.clone()))
                .map(GroupItem::Form),
            action.clone().map(GroupItem::Sub),
        ))
        .delimited_by(just(Token::OpenParen), just(Token::CloseParen))
        .labelled("subexpression");

        verb.then(selector)
            .then(just(Token::With).ignore_then(with_assignments_parser()).or_not())
            .then(just(Token::Respan).ignore_then(span_with(filter.clone())).or_not())
            .then(group.repeated().collect::<Vec<_>>())
            .then(action.or_not())
            .try_map(|(((((verb, focus), with), respan), groups), next), span| {
                if with.is_some() && matches!(verb, Verb::Select | Verb::Delete) {
                    return Err(Rich::custom(
                        span,
                        format!("{} does not support a WITH statement", verb.as_str()),
                    ));
                }
                if verb == Verb::Add && focus.filter.is_some() {
                    return Err(Rich::custom(
                        span,
                        "focus has a WHERE statement but ADD does not support this",
                    ));
                }
                if respan.is_some() && verb != Verb::Edit {
                    return Err(Rich::custom(span, "RESPAN is only valid with EDIT"));
                }

                let mut subactions = Vec::new();
                let mut form = None;
                for item in groups {
                    match item {
                        GroupItem::Sub(sub) => subactions.push(sub),
                        GroupItem::Form(f) => form = Some(f),
                    }
                }
                if !subactions.is_empty()
                    && matches!(verb, Verb::Delete | Verb::Split | Verb::Merge)
                {
                    return Err(Rich::custom(
                        span,
                        format!("subactions are not allowed for action {}", verb.as_str()),
                    ));
                }
                for sub in &subactions {
                    if !matches!(sub.verb, Verb::Edit | Verb::Delete | Verb::Add) {
                        return Err(Rich::custom(
                            span,
                            format!("{} is not allowed as a subaction", sub.verb.as_str()),
                        ));
                    }
                }

                Ok(Action {
                    verb,
                    focus,
                    assignments: with.unwrap_or_default(),
                    form,
                    subactions,
                    next: next.map(Box::new),
                    respan,
                })
            })
            .labelled("action")
            .as_context()
    })
}
