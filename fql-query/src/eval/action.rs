//! # Action Evaluation
//!
//! Applies an action chain to the document: focus selection, mutation,
//! form delegation, subactions and result consolidation.

use log::debug;

use fql_core::prelude::{ElementProps, NodeId};

use crate::ast::{Action, Form, Selector, Verb};
use crate::error::EvalError;
use crate::eval::{ContextItem, ContextSource, Evaluator, props_from_assignments, push_unique};

impl Evaluator<'_> {
    fn autodeclare(&mut self, selector: &Selector) {
        if let (Some(class), Some(set)) = (selector.class, &selector.set) {
            if let Some(annotation) = class.annotation_type() {
                if !self.doc.declared(annotation, Some(set.as_str())) {
                    debug!("auto-declaring {} of {}", class.xmltag(), set);
                    self.doc
                        .declare(annotation, Some(set.clone()), ElementProps::new());
                }
            }
        }
    }

    fn push_target(constrained: &mut Vec<NodeId>, target: &ContextItem) {
        match target {
            ContextItem::Span(spanset) => {
                for &element in &spanset.0 {
                    push_unique(constrained, element);
                }
            }
            ContextItem::Node(node) => push_unique(constrained, *node),
        }
    }

    /// Evaluates an action chain and returns the focus selection and the
    /// constrained target selection.
    ///
    /// The chain shares one context: with more than one action the context
    /// recipe is materialised once, so every action observes the same
    /// frozen context while mutations remain visible on the document.
    pub(crate) fn evaluate_action(
        &mut self,
        root: &Action,
        source: ContextSource<'_>,
    ) -> Result<(Vec<NodeId>, Vec<NodeId>), EvalError> {
        let mut actions = vec![root];
        let mut cursor = root;
        while let Some(next) = cursor.next.as_deref() {
            actions.push(next);
            cursor = next;
        }
        debug!("evaluating action chain of {}", actions.len());

        let source = if actions.len() > 1 {
            ContextSource::Materialised(self.build_context(&source)?)
        } else {
            source
        };

        for action in &actions {
            if action.verb != Verb::Select {
                self.autodeclare(&action.focus);
            }
            if let Some(Form::Correction(correction)) = &action.form {
                if let Some(set) = &correction.set {
                    let annotation = fql_core::prelude::AnnotationType::Correction;
                    if !self.doc.declared(annotation, Some(set.as_str())) {
                        self.doc
                            .declare(annotation, Some(set.clone()), ElementProps::new());
                    }
                }
            }
        }

        let mut focus_all: Vec<NodeId> = Vec::new();
        let mut target_all: Vec<NodeId> = Vec::new();

        for &action in &actions {
            debug!("evaluating action {}", action.verb.as_str());
            let mut focusselection: Vec<NodeId> = Vec::new();
            let mut constrained: Vec<NodeId> = Vec::new();
            let mut processed_form: Vec<NodeId> = Vec::new();

            if !matches!(action.verb, Verb::Add | Verb::Append | Verb::Prepend) {
                let context = self.build_context(&source)?;
                let pairs = self.evaluate_selector_chain(
                    std::slice::from_ref(&action.focus),
                    &context,
                    true,
                )?;
                for (focus, target) in pairs {
                    if let Some(target) = &target {
                        Self::push_target(&mut constrained, target);
                    }

                    if let Some(form) = &action.form {
                        if processed_form.contains(&focus) {
                            continue;
                        }
                        processed_form.push(focus);
                        let produced =
                            self.evaluate_form(form, action, Some(focus), target.as_ref())?;
                        focusselection.extend(produced);
                    } else {
                        if action.verb != Verb::Delete {
                            if focusselection.contains(&focus) {
                                continue;
                            }
                            focusselection.push(focus);
                        }
                        match action.verb {
                            Verb::Edit => {
                                debug!("applying EDIT to {}", self.doc.describe(focus));
                                let props = props_from_assignments(&action.assignments);
                                self.doc.update(focus, &props);
                                if let Some(respan) = &action.respan {
                                    if !self.doc.class_of(focus).is_span() {
                                        return Err(EvalError::Query(
                                            "can only perform RESPAN on span annotation elements"
                                                .to_string(),
                                        ));
                                    }
                                    let context = self.build_context(&source)?;
                                    let spanset = self.evaluate_span(respan, &context, true)?;
                                    self.doc.setspan(focus, &spanset.0);
                                }
                            }
                            Verb::Delete => {
                                debug!("deleting {}", self.doc.describe(focus));
                                self.doc.remove(focus);
                            }
                            _ => {}
                        }
                    }
                }
            }

            if matches!(action.verb, Verb::Add | Verb::Append | Verb::Prepend)
                || (action.verb == Verb::Edit && focusselection.is_empty())
            {
                debug!("applying {} to targets", action.verb.as_str());
                let class = action
                    .focus
                    .class
                    .ok_or_else(|| EvalError::Query("focus of action has no class".to_string()))?;
                let mut assignments = action.assignments.clone();
                if assignments.set.is_none() {
                    assignments.set = action.focus.set.clone();
                }

                let targetselection = self.build_context(&source)?;
                for target in targetselection {
                    if let Some(form) = &action.form {
                        let produced = self.evaluate_form(form, action, None, Some(&target))?;
                        focusselection.extend(produced);
                    } else {
                        match &target {
                            ContextItem::Span(spanset) => {
                                if matches!(action.verb, Verb::Add | Verb::Edit) {
                                    let props = props_from_assignments(&assignments);
                                    let node = self.doc.add_span(&spanset.0, class, props)?;
                                    focusselection.push(node);
                                }
                            }
                            ContextItem::Node(node) => match action.verb {
                                Verb::Add | Verb::Edit => {
                                    let props = props_from_assignments(&assignments);
                                    let created = self.doc.add(*node, class, props);
                                    focusselection.push(created);
                                }
                                Verb::Append | Verb::Prepend => {
                                    let parent = self.doc.parent(*node).ok_or_else(|| {
                                        EvalError::Query(format!(
                                            "{} target has no parent",
                                            action.verb.as_str()
                                        ))
                                    })?;
                                    let index = self
                                        .doc
                                        .children(parent)
                                        .iter()
                                        .position(|&c| c == *node)
                                        .unwrap_or(0);
                                    let index = if action.verb == Verb::Prepend {
                                        index.saturating_sub(1)
                                    } else {
                                        index
                                    };
                                    let props = props_from_assignments(&assignments);
                                    let created = self.doc.insert(parent, index, class, props);
                                    focusselection.push(created);
                                }
                                _ => {}
                            },
                        }
                    }
                    Self::push_target(&mut constrained, &target);
                }
            }

            if !focusselection.is_empty() && !action.subactions.is_empty() {
                for subaction in &action.subactions {
                    if subaction.verb != Verb::Select {
                        self.autodeclare(&subaction.focus);
                    }
                    debug!("invoking subaction {}", subaction.verb.as_str());
                    let sub_context: Vec<ContextItem> = focusselection
                        .iter()
                        .map(|&node| ContextItem::Node(node))
                        .collect();
                    // subaction results are discarded
                    self.evaluate_action(subaction, ContextSource::Materialised(sub_context))?;
                }
            }

            for element in focusselection {
                push_unique(&mut focus_all, element);
            }
            for element in constrained {
                push_unique(&mut target_all, element);
            }
        }

        Ok((focus_all, target_all))
    }
}
