//! # Selection Evaluation
//!
//! Resolves selectors, filters, spans and targets against the document.

use std::cmp::Ordering;

use log::debug;

use fql_core::prelude::NodeId;

use crate::ast::{Clause, CompareOp, ContextModifier, Filter, Selector, SpanExpr, Target,
    TargetItem};
use crate::error::EvalError;
use crate::eval::{ContextItem, ContextSource, Evaluator, SpanSet};

/// Compares attribute values numerically when both sides parse as numbers,
/// lexicographically otherwise.
fn compare_values(left: &str, right: &str) -> Ordering {
    match (left.parse::<f64>(), right.parse::<f64>()) {
        (Ok(l), Ok(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
        _ => left.cmp(right),
    }
}

impl Evaluator<'_> {
    /// Materialises a context recipe into a fresh selection.
    pub(crate) fn build_context(
        &mut self,
        source: &ContextSource<'_>,
    ) -> Result<Vec<ContextItem>, EvalError> {
        match source {
            ContextSource::Root => Ok(self
                .doc
                .data()
                .iter()
                .map(|&node| ContextItem::Node(node))
                .collect()),
            ContextSource::Target(target) => {
                let root: Vec<ContextItem> = self
                    .doc
                    .data()
                    .iter()
                    .map(|&node| ContextItem::Node(node))
                    .collect();
                self.evaluate_target(target, root)
            }
            ContextSource::Materialised(items) => Ok(items.clone()),
        }
    }

    /// Drives a selector chain over a context selection.
    ///
    /// Every selector of the chain is evaluated against every context
    /// element, in order; candidates are paired with the context element
    /// they were found under (id lookups carry no context).
    pub(crate) fn evaluate_selector_chain(
        &mut self,
        selectors: &[Selector],
        context: &[ContextItem],
        recurse: bool,
    ) -> Result<Vec<(NodeId, Option<ContextItem>)>, EvalError> {
        let mut yielded = Vec::new();
        for item in context {
            for selector in selectors {
                self.evaluate_selector(selector, item, recurse, &mut yielded)?;
            }
        }
        Ok(yielded)
    }

    fn evaluate_selector(
        &mut self,
        selector: &Selector,
        item: &ContextItem,
        recurse: bool,
        yielded: &mut Vec<(NodeId, Option<ContextItem>)>,
    ) -> Result<(), EvalError> {
        if let Some(id) = &selector.id {
            // missing ids are silently ignored
            if let Some(node) = self.doc.get(id) {
                if self.filter_passes(selector, node)? {
                    debug!("selector yielded {} by id", self.doc.describe(node));
                    yielded.push((node, None));
                }
            }
            return Ok(());
        }

        let class = match selector.class {
            Some(class) => class,
            None => return Ok(()),
        };
        let set = selector.set.clone().or_else(|| {
            self.ctx.default_sets.get(class.xmltag()).cloned()
        });
        let set = set.as_deref();

        if class.is_span() {
            match item {
                ContextItem::Node(node) if self.doc.class_of(*node).is_word_like() => {
                    for candidate in self.doc.findspans(*node, class, set) {
                        if self.filter_passes(selector, candidate)? {
                            debug!("selector yielded span {}", self.doc.describe(candidate));
                            yielded.push((candidate, Some(item.clone())));
                        }
                    }
                }
                ContextItem::Span(spanset) => {
                    let first = match spanset.0.first() {
                        Some(&first) => first,
                        None => return Ok(()),
                    };
                    for candidate in self.doc.findspans(first, class, set) {
                        if !self.filter_passes(selector, candidate)? {
                            continue;
                        }
                        let members = self.doc.wrefs(candidate).to_vec();
                        if spanset.0[1..].iter().all(|e| members.contains(e)) {
                            debug!(
                                "selector yielded span {} for span set",
                                self.doc.describe(candidate)
                            );
                            yielded.push((candidate, Some(item.clone())));
                        }
                    }
                }
                ContextItem::Node(node) => {
                    for candidate in self.doc.select(*node, class, set, recurse) {
                        if self.filter_passes(selector, candidate)? {
                            yielded.push((candidate, Some(item.clone())));
                        }
                    }
                }
            }
            return Ok(());
        }

        match item {
            ContextItem::Span(_) => Err(EvalError::Query(
                "got a span set for a non-span element".to_string(),
            )),
            ContextItem::Node(node) => {
                for candidate in self.doc.select(*node, class, set, recurse) {
                    if self.filter_passes(selector, candidate)? {
                        yielded.push((candidate, Some(item.clone())));
                    }
                }
                Ok(())
            }
        }
    }

    fn filter_passes(&mut self, selector: &Selector, node: NodeId) -> Result<bool, EvalError> {
        match &selector.filter {
            Some(filter) => self.filter_matches(filter, node),
            None => Ok(true),
        }
    }

    /// The non-generator predicate used by relational filters: does a
    /// single candidate satisfy the selector?
    pub(crate) fn selector_matches(
        &mut self,
        selector: &Selector,
        node: NodeId,
    ) -> Result<bool, EvalError> {
        if let Some(id) = &selector.id {
            if self.doc.id_of(node) != Some(id.as_str()) {
                return Ok(false);
            }
        } else if let Some(class) = selector.class {
            if self.doc.class_of(node) != class {
                return Ok(false);
            }
        }
        self.filter_passes(selector, node)
    }

    /// Tests a filter against an element.
    ///
    /// Clause verdicts are negated per the filter, then short-circuit:
    /// under disjunction the first true verdict wins, under conjunction
    /// the first false one. An empty filter is vacuously true.
    pub(crate) fn filter_matches(
        &mut self,
        filter: &Filter,
        node: NodeId,
    ) -> Result<bool, EvalError> {
        let mut verdict = true;
        for clause in &filter.clauses {
            verdict = self.clause_matches(clause, node)?;
            if filter.negated {
                verdict = !verdict;
            }
            if verdict {
                if filter.disjunction {
                    return Ok(true);
                }
            } else if !filter.disjunction {
                return Ok(false);
            }
        }
        Ok(verdict)
    }

    fn clause_matches(&mut self, clause: &Clause, node: NodeId) -> Result<bool, EvalError> {
        match clause {
            Clause::Nested(filter) => self.filter_matches(filter, node),
            Clause::Predicate { attr, op, value } => self.predicate_matches(node, attr, *op, value),
            Clause::Regex { attr, regex } => {
                match self.attribute_value(node, attr)? {
                    Some(actual) => Ok(regex.is_match(&actual)),
                    None => Ok(false),
                }
            }
            Clause::Relational {
                modifier,
                selector,
                filter,
            } => match modifier {
                ContextModifier::Child => {
                    let context = [ContextItem::Node(node)];
                    let candidates = self.evaluate_selector_chain(
                        std::slice::from_ref(selector.as_ref()),
                        &context,
                        true,
                    )?;
                    // existential: one matching descendant suffices
                    for (candidate, _) in candidates {
                        let matched = match filter {
                            Some(sub) => self.filter_matches(sub, candidate)?,
                            None => true,
                        };
                        if matched {
                            return Ok(true);
                        }
                    }
                    Ok(false)
                }
                ContextModifier::Parent => match self.doc.parent(node) {
                    Some(parent) => self.selector_matches(selector, parent),
                    None => Ok(false),
                },
                ContextModifier::Next => match self.doc.next(node) {
                    Some(next) => self.selector_matches(selector, next),
                    None => Ok(false),
                },
                ContextModifier::Previous => match self.doc.previous(node) {
                    Some(previous) => self.selector_matches(selector, previous),
                    None => Ok(false),
                },
                other => Err(EvalError::NotImplemented(format!(
                    "context keyword {}",
                    other.as_str()
                ))),
            },
        }
    }

    fn attribute_value(&mut self, node: NodeId, attr: &str) -> Result<Option<String>, EvalError> {
        match attr {
            "text" => Ok(Some(self.doc.text(node)?)),
            "class" | "id" | "set" | "annotator" | "annotatortype" | "confidence" | "n" => {
                Ok(self.doc.attribute(node, attr))
            }
            other => Err(EvalError::Query(format!(
                "unknown attribute in filter: {}",
                other
            ))),
        }
    }

    fn predicate_matches(
        &mut self,
        node: NodeId,
        attr: &str,
        op: CompareOp,
        value: &str,
    ) -> Result<bool, EvalError> {
        let actual = self.attribute_value(node, attr)?;
        Ok(match op {
            CompareOp::Equal => actual.is_some_and(|a| a == value),
            CompareOp::NotEqual => actual.is_none_or(|a| a != value),
            CompareOp::Contains => actual.is_some_and(|a| a.contains(value)),
            CompareOp::Greater => {
                actual.is_some_and(|a| compare_values(&a, value) == Ordering::Greater)
            }
            CompareOp::Less => actual.is_some_and(|a| compare_values(&a, value) == Ordering::Less),
            CompareOp::GreaterEqual => {
                actual.is_some_and(|a| compare_values(&a, value) != Ordering::Less)
            }
            CompareOp::LessEqual => {
                actual.is_some_and(|a| compare_values(&a, value) != Ordering::Greater)
            }
        })
    }

    /// Evaluates a span expression to a span set.
    pub(crate) fn evaluate_span(
        &mut self,
        span: &SpanExpr,
        context: &[ContextItem],
        recurse: bool,
    ) -> Result<SpanSet, EvalError> {
        let pairs = self.evaluate_selector_chain(&span.targets, context, recurse)?;
        Ok(SpanSet(pairs.into_iter().map(|(node, _)| node).collect()))
    }

    /// Evaluates a FOR/IN target against a context selection.
    ///
    /// A nested scope is evaluated first and becomes the context of the
    /// outer target; `IN` targets never descend below direct children.
    pub(crate) fn evaluate_target(
        &mut self,
        target: &Target,
        context: Vec<ContextItem>,
    ) -> Result<Vec<ContextItem>, EvalError> {
        let context = match &target.nested {
            Some(nested) => {
                debug!("deferring to nested target first");
                self.evaluate_selector_chain(std::slice::from_ref(nested), &context, true)?
                    .into_iter()
                    .map(|(node, _)| ContextItem::Node(node))
                    .collect()
            }
            None => context,
        };

        let mut items = Vec::new();
        let mut selectors = Vec::new();
        for item in &target.targets {
            match item {
                TargetItem::Span(span) => {
                    let spanset = self.evaluate_span(span, &context, !target.strict)?;
                    debug!("target yielded span set of {}", spanset.0.len());
                    items.push(ContextItem::Span(spanset));
                }
                TargetItem::Selector(selector) => selectors.push(selector.clone()),
            }
        }
        if !selectors.is_empty() {
            for (node, _) in self.evaluate_selector_chain(&selectors, &context, !target.strict)? {
                items.push(ContextItem::Node(node));
            }
        }
        Ok(items)
    }
}
