//! # Evaluation Engine
//!
//! Executes a parsed [`Query`] against a [`Document`]: resolves selectors
//! and targets, applies filters, performs mutations and formats the
//! response selection.

mod action;
mod form;
mod format;
mod select;

use std::collections::HashMap;

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use fql_core::prelude::{Document, ElementProps, NodeId};

use crate::ast::{Assignments, Query};
use crate::error::EvalError;

/// An ordered group of elements acting as the argument of a span-level
/// operation.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanSet(pub Vec<NodeId>);

/// One element of an evaluation context: a plain element or a span set.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ContextItem {
    /// A single document element.
    Node(NodeId),
    /// A span set produced by a SPAN target.
    Span(SpanSet),
}

/// A rebuildable recipe for the context selection, so the same stream can
/// be driven more than once.
pub(crate) enum ContextSource<'q> {
    /// The document's top-level structural sequence.
    Root,
    /// A FOR/IN target rooted at the top-level sequence.
    Target(&'q crate::ast::Target),
    /// An already materialised selection.
    Materialised(Vec<ContextItem>),
}

/// Session defaults carried across queries: output format, return type,
/// request filter and default annotation sets.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryContext {
    /// The default response format (`python`).
    pub format: String,
    /// The default response selection (`focus`).
    pub return_type: String,
    /// The default request filter.
    pub request: Vec<String>,
    /// Default annotation attributes.
    pub defaults: Assignments,
    /// Default sets per element tag, adopted by set-less selectors.
    pub default_sets: HashMap<String, String>,
}

impl Default for QueryContext {
    fn default() -> Self {
        Self {
            format: "python".to_string(),
            return_type: "focus".to_string(),
            request: vec!["all".to_string()],
            defaults: Assignments::default(),
            default_sets: HashMap::new(),
        }
    }
}

/// The outcome of running a query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// The response selection itself (`python` format).
    Elements(Vec<NodeId>),
    /// At most one element (`single-python` format).
    Element(Option<NodeId>),
    /// A serialised rendering (`xml` / `json` / `single-*` formats).
    Serialised(String),
}

/// Appends `node` unless an identical element is already present.
pub(crate) fn push_unique(selection: &mut Vec<NodeId>, node: NodeId) {
    if !selection.contains(&node) {
        selection.push(node);
    }
}

/// Converts parsed assignments into a document attribute bag.
pub(crate) fn props_from_assignments(assignments: &Assignments) -> ElementProps {
    ElementProps {
        id: None,
        set: assignments.set.clone(),
        cls: assignments.class.clone(),
        annotator: assignments.annotator.clone(),
        annotatortype: assignments.annotatortype,
        confidence: assignments.confidence,
        n: assignments.n.clone(),
        value: assignments.text.clone(),
    }
}

/// The per-invocation evaluation state: the document under query, the
/// session context and the id-suffix generator.
pub(crate) struct Evaluator<'a> {
    pub(crate) doc: &'a mut Document,
    pub(crate) ctx: &'a QueryContext,
    pub(crate) rng: StdRng,
}

impl<'a> Evaluator<'a> {
    fn run(&mut self, query: &Query) -> Result<QueryResult, EvalError> {
        debug!("running query on document {}", self.doc.id);

        for declaration in &query.declarations {
            let annotation = declaration.class.annotation_type().ok_or_else(|| {
                EvalError::Query(format!(
                    "cannot declare element type {}",
                    declaration.class.xmltag()
                ))
            })?;
            debug!(
                "processing declaration for {} of {:?}",
                declaration.class.xmltag(),
                declaration.set
            );
            self.doc.declare(
                annotation,
                declaration.set.clone(),
                props_from_assignments(&declaration.defaults),
            );
        }

        let (focus, targets) = match &query.action {
            Some(action) => {
                let source = match &query.target {
                    Some(target) => ContextSource::Target(target),
                    None => ContextSource::Root,
                };
                self.evaluate_action(action, source)?
            }
            None => (Vec::new(), Vec::new()),
        };

        let return_type = query
            .return_type
            .as_deref()
            .unwrap_or(&self.ctx.return_type);
        let response = match return_type {
            "focus" => focus,
            "target" | "inner-target" => {
                let mut response = Vec::new();
                for target in targets {
                    push_unique(&mut response, target);
                }
                response
            }
            "outer-target" => {
                return Err(EvalError::NotImplemented(
                    "return type outer-target".to_string(),
                ));
            }
            "ancestor-target" => {
                return Err(EvalError::NotImplemented(
                    "return type ancestor-target".to_string(),
                ));
            }
            other => {
                return Err(EvalError::Query(format!("invalid return type: {}", other)));
            }
        };

        self.format_response(query, response)
    }
}

impl Query {
    /// Executes the query on a document.
    ///
    /// Declarations are processed first, then the action chain is driven
    /// against the query's target scope (or the document's top-level
    /// sequence), and the response selection is rendered per the query's
    /// RETURN and FORMAT clauses.
    ///
    /// ## Arguments
    ///
    /// * `doc` - The document to query and mutate.
    /// * `context` - Session defaults for format, return type and sets.
    ///
    /// ## Returns
    ///
    /// Returns the formatted [`QueryResult`], or the first error raised by
    /// parsing-adjacent validation, evaluation or the document model.
    pub fn run(
        &self,
        doc: &mut Document,
        context: &QueryContext,
    ) -> Result<QueryResult, EvalError> {
        let mut evaluator = Evaluator {
            doc,
            ctx: context,
            rng: StdRng::from_entropy(),
        };
        evaluator.run(self)
    }
}
