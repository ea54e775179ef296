//! # Form Evaluation
//!
//! Delegated evaluation of `AS ALTERNATIVE` and `AS CORRECTION` forms:
//! the focus mutation is wrapped in the requested wrapper element instead
//! of being applied directly.

use log::debug;
use rand::RngCore;

use fql_core::prelude::{CorrectParams, ElementClass, NodeId};

use crate::ast::{Action, AlternativeForm, CorrectionForm, Form, Verb};
use crate::error::EvalError;
use crate::eval::{ContextItem, Evaluator, props_from_assignments};

impl Evaluator<'_> {
    /// Delegates an action to its form, producing the elements that join
    /// the focus selection.
    pub(crate) fn evaluate_form(
        &mut self,
        form: &Form,
        action: &Action,
        focus: Option<NodeId>,
        target: Option<&ContextItem>,
    ) -> Result<Vec<NodeId>, EvalError> {
        match form {
            Form::Alternative(alternative) => {
                let mut produced = Vec::new();
                let mut cursor = Some(alternative);
                while let Some(form) = cursor {
                    produced.extend(self.evaluate_alternative(form, action, focus, target)?);
                    cursor = form.next.as_deref();
                }
                Ok(produced)
            }
            Form::Correction(correction) => {
                self.evaluate_correction(correction, action, focus, target)
            }
        }
    }

    fn form_parent_from_target(target: Option<&ContextItem>) -> Result<NodeId, EvalError> {
        match target {
            Some(ContextItem::Node(node)) => Ok(*node),
            Some(ContextItem::Span(_)) => Err(EvalError::Query(
                "got a span set for a non-span element".to_string(),
            )),
            None => Err(EvalError::Query(
                "form requires a focus or target element".to_string(),
            )),
        }
    }

    fn evaluate_alternative(
        &mut self,
        form: &AlternativeForm,
        action: &Action,
        focus: Option<NodeId>,
        target: Option<&ContextItem>,
    ) -> Result<Vec<NodeId>, EvalError> {
        let class = action.focus.class.ok_or_else(|| {
            EvalError::Query("alternative requires a focus element type".to_string())
        })?;

        match action.verb {
            Verb::Select => {
                let focus = focus.ok_or_else(|| {
                    EvalError::Query("SELECT requires a focus element".to_string())
                })?;
                if class.is_span() {
                    return Err(EvalError::NotImplemented(
                        "selecting alternative spans".to_string(),
                    ));
                }
                let set = self.doc.set_of(focus).map(|s| s.to_string());
                let mut produced = Vec::new();
                for alternative in self.doc.alternatives(focus, class, set.as_deref()) {
                    let keep = match &form.filter {
                        Some(filter) => self.filter_matches(filter, alternative)?,
                        None => true,
                    };
                    if keep {
                        produced.push(alternative);
                    }
                }
                Ok(produced)
            }
            Verb::Edit | Verb::Add => {
                if class.is_span() {
                    return Err(EvalError::NotImplemented(
                        "editing alternative spans".to_string(),
                    ));
                }
                let subassignments = form.subassignments.merged_over(&action.assignments);
                let inner =
                    self.doc
                        .build(class, props_from_assignments(&subassignments), Vec::new());
                let alternative = self.doc.build(
                    ElementClass::Alternative,
                    props_from_assignments(&form.assignments),
                    vec![inner],
                );
                let parent = match focus {
                    Some(focus) => self
                        .doc
                        .ancestor_where(focus, |c| c.is_structural())
                        .ok_or_else(|| {
                            EvalError::Query("focus has no structural ancestor".to_string())
                        })?,
                    None => Self::form_parent_from_target(target)?,
                };
                self.doc.attach(parent, alternative);
                debug!("attached alternative under {}", self.doc.describe(parent));
                Ok(vec![alternative])
            }
            verb => Err(EvalError::Query(format!(
                "alternative does not handle action {}",
                verb.as_str()
            ))),
        }
    }

    fn default_set_for(&self, class: ElementClass) -> Option<String> {
        self.ctx
            .default_sets
            .get(class.xmltag())
            .cloned()
            .or_else(|| {
                class
                    .annotation_type()
                    .and_then(|annotation| self.doc.defaultset(annotation))
            })
    }

    fn evaluate_correction(
        &mut self,
        form: &CorrectionForm,
        action: &Action,
        focus: Option<NodeId>,
        target: Option<&ContextItem>,
    ) -> Result<Vec<NodeId>, EvalError> {
        let class = action.focus.class.ok_or_else(|| {
            EvalError::Query("correction requires a focus element type".to_string())
        })?;

        match action.verb {
            Verb::Select => {
                let focus = focus.ok_or_else(|| {
                    EvalError::Query("SELECT requires a focus element".to_string())
                })?;
                match self.doc.incorrection(focus) {
                    Some(correction) => {
                        let keep = match &form.filter {
                            Some(filter) => self.filter_matches(filter, correction)?,
                            None => true,
                        };
                        Ok(if keep { vec![correction] } else { Vec::new() })
                    }
                    None => Ok(Vec::new()),
                }
            }
            Verb::Edit | Verb::Add => {
                let mut action_assignments =
                    form.action_assignments.merged_over(&action.assignments);
                if !action_assignments.is_empty() && action_assignments.set.is_none() {
                    action_assignments.set = self.default_set_for(class);
                }

                let existing = match focus {
                    Some(focus) => self.doc.incorrection(focus),
                    None => None,
                };

                let mut params = CorrectParams {
                    set: form.set.clone(),
                    props: props_from_assignments(&form.assignments),
                    ..CorrectParams::default()
                };

                if !action_assignments.is_empty() {
                    let mut children = Vec::new();
                    if !form.bare {
                        if let Some(focus) = focus {
                            // id suffix keeps copied ids unique
                            let suffix = format!(".copy.{:08x}", self.rng.next_u32());
                            for child in self.doc.children(focus).to_vec() {
                                children.push(self.doc.copy(child, &suffix));
                            }
                        }
                    }
                    params.new = Some(self.doc.build(
                        class,
                        props_from_assignments(&action_assignments),
                        children,
                    ));
                    params.original = focus;
                } else {
                    params.current = focus;
                    params.reuse = existing;
                }

                let parent = match focus {
                    Some(focus) => {
                        let include_correction = params.reuse.is_none();
                        self.doc
                            .ancestor_where(focus, move |c| {
                                c.is_structural()
                                    || c.is_span()
                                    || c.is_layer()
                                    || (include_correction && c == ElementClass::Correction)
                            })
                            .ok_or_else(|| {
                                EvalError::Query(
                                    "focus has no suitable ancestor for a correction".to_string(),
                                )
                            })?
                    }
                    None => Self::form_parent_from_target(target)?,
                };

                if params.reuse.is_none() {
                    params.id = Some(self.doc.generate_id(parent, ElementClass::Correction));
                }

                for (subassignments, suggestion_assignments) in &form.suggestions {
                    let mut subassignments = subassignments.merged_over(&action.assignments);
                    if subassignments.set.is_none() {
                        subassignments.set = self.default_set_for(class);
                    }
                    let inner = self.doc.build(
                        class,
                        props_from_assignments(&subassignments),
                        Vec::new(),
                    );
                    let suggestion = self.doc.build(
                        ElementClass::Suggestion,
                        props_from_assignments(suggestion_assignments),
                        vec![inner],
                    );
                    params.suggestions.push(suggestion);
                }

                debug!("correcting under {}", self.doc.describe(parent));
                let correction = self.doc.correct(parent, params)?;
                Ok(vec![correction])
            }
            verb => Err(EvalError::Query(format!(
                "correction does not handle action {}",
                verb.as_str()
            ))),
        }
    }
}
