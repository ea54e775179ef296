//! # Filter Parser
//!
//! Parsers for WHERE predicates: attribute comparisons, nested
//! parenthesised filters with AND/OR/NOT, and relational sub-queries
//! (HAS / PARENT / NEXT / PREVIOUS / ...).

use chumsky::{extra, input::ValueInput, prelude::*};
use regex::Regex;

use crate::ast::{Clause, CompareOp, ContextModifier, Filter, Selector};
use crate::lexer::{Span, Token};
use crate::parser::common::value_parser;
use crate::parser::selector::selector_with;

fn compare_op_parser<'tokens, I>()
-> impl Parser<'tokens, I, CompareOp, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    choice((
        just(Token::Equals).to(CompareOp::Equal),
        just(Token::NotEquals).to(CompareOp::NotEqual),
        just(Token::GreaterEquals).to(CompareOp::GreaterEqual),
        just(Token::LessEquals).to(CompareOp::LessEqual),
        just(Token::Greater).to(CompareOp::Greater),
        just(Token::Less).to(CompareOp::Less),
        just(Token::Contains).to(CompareOp::Contains),
    ))
    .labelled("comparison operator")
}

fn context_modifier_parser<'tokens, I>()
-> impl Parser<'tokens, I, ContextModifier, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    choice((
        just(Token::Previous).to(ContextModifier::Previous),
        just(Token::Next).to(ContextModifier::Next),
        just(Token::LeftContext).to(ContextModifier::LeftContext),
        just(Token::RightContext).to(ContextModifier::RightContext),
        just(Token::Context).to(ContextModifier::Context),
        just(Token::Parent).to(ContextModifier::Parent),
        just(Token::Ancestor).to(ContextModifier::Ancestor),
        just(Token::Child).to(ContextModifier::Child),
    ))
    .labelled("context keyword")
}

/// Builds the nested-filter clause the `:tag` shorthand stands for:
/// `(tag HAS class <op> "value")`.
fn shorthand_clause(tag: fql_core::prelude::ElementClass, op: CompareOp, value: String) -> Clause {
    Clause::Nested(Filter {
        clauses: vec![Clause::Relational {
            modifier: ContextModifier::Child,
            selector: Box::new(Selector {
                class: Some(tag),
                set: None,
                id: None,
                filter: None,
            }),
            filter: Some(Box::new(Filter {
                clauses: vec![Clause::Predicate {
                    attr: "class".to_string(),
                    op,
                    value,
                }],
                negated: false,
                disjunction: false,
            })),
        }],
        negated: false,
        disjunction: false,
    })
}

/// Creates the filter parser.
///
/// Clauses are separated by a single logical operator; mixing AND and OR
/// at one level is a syntax error, as is NOT over more than one clause and
/// a context expression with siblings.
pub(crate) fn filter_parser<'tokens, I>()
-> impl Parser<'tokens, I, Filter, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    recursive(|filter| {
        let selector = selector_with(filter.clone());
        let value = value_parser();

        let predicate = select! { Token::Ident(attr) => attr }
            .then(compare_op_parser())
            .then(value.clone())
            .map(|((attr, op), value)| Clause::Predicate { attr, op, value });

        let regex_predicate = select! { Token::Ident(attr) => attr }
            .then_ignore(just(Token::Matches))
            .then(value.clone())
            .try_map(|(attr, pattern), span| {
                Regex::new(&pattern)
                    .map(|regex| Clause::Regex { attr, regex })
                    .map_err(|e| {
                        Rich::custom(span, format!("invalid regular expression: {}", e))
                    })
            });

        let nested = filter
            .clone()
            .delimited_by(just(Token::OpenParen), just(Token::CloseParen))
            .map(Clause::Nested);

        let relational_context = context_modifier_parser()
            .then(selector.clone())
            .map(|(modifier, selector)| Clause::Relational {
                modifier,
                selector: Box::new(selector),
                filter: None,
            });

        let has_clause = selector
            .clone()
            .then_ignore(just(Token::Has))
            .then(filter.clone())
            .map(|(selector, sub)| Clause::Relational {
                modifier: ContextModifier::Child,
                selector: Box::new(selector),
                filter: Some(Box::new(sub)),
            });

        // the :tag shorthand accepts an operator, or the word `class`
        // standing for equality
        let shorthand_op = choice((
            compare_op_parser(),
            select! { Token::Ident(attr) => attr }.try_map(|attr, span| {
                if attr == "class" {
                    Ok(CompareOp::Equal)
                } else {
                    Err(Rich::custom(
                        span,
                        format!("expected operator or class, got {}", attr),
                    ))
                }
            }),
        ));
        let shorthand = select! { Token::Shorthand(tag) => tag }
            .try_map(|tag, span| {
                fql_core::prelude::ElementClass::from_xmltag(&tag).ok_or_else(|| {
                    Rich::custom(span, format!("expected element type, got {}", tag))
                })
            })
            .then(shorthand_op)
            .then(value.clone())
            .map(|((tag, op), value)| shorthand_clause(tag, op, value));

        let clause = choice((
            nested,
            relational_context,
            shorthand,
            regex_predicate,
            predicate,
            has_clause,
        ))
        .labelled("filter condition");

        let logop = choice((just(Token::And).to(false), just(Token::Or).to(true)));

        just(Token::Not)
            .or_not()
            .map(|not| not.is_some())
            .then(clause.clone())
            .then(logop.then(clause).repeated().collect::<Vec<_>>())
            .try_map(|((negated, first), rest), span| {
                let mut disjunction: Option<bool> = None;
                let mut clauses = vec![first];
                for (is_or, clause) in rest {
                    match disjunction {
                        None => disjunction = Some(is_or),
                        Some(previous) if previous != is_or => {
                            return Err(Rich::custom(
                                span,
                                "mixed logical operators, use parentheses",
                            ));
                        }
                        _ => {}
                    }
                    clauses.push(clause);
                }
                if negated && clauses.len() > 1 {
                    return Err(Rich::custom(
                        span,
                        "expecting parentheses when NOT is used with multiple conditions",
                    ));
                }
                let has_context = clauses
                    .iter()
                    .any(|c| matches!(c, Clause::Relational { filter: None, .. }));
                if has_context && clauses.len() > 1 {
                    return Err(Rich::custom(
                        span,
                        "a context expression must be the only condition in its filter",
                    ));
                }
                Ok(Filter {
                    clauses,
                    negated,
                    disjunction: disjunction.unwrap_or(false),
                })
            })
            .labelled("filter")
            .as_context()
    })
}
