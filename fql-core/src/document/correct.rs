//! # Corrections
//!
//! The correction primitive: wrapping document content in a
//! [`ElementClass::Correction`] element that records the authoritative
//! edit, the demoted content and any suggestions.

use crate::document::{Document, NodeId};
use crate::element::{ElementClass, ElementProps};
use crate::error::DocumentError;

/// The keyword bag accepted by [`Document::correct`].
///
/// Exactly one of `new`+`original`, `current`, or a bare suggestion-only
/// request should be populated; `reuse` points at an existing correction
/// to extend instead of creating a fresh one.
#[derive(Debug, Clone, Default)]
pub struct CorrectParams {
    /// The correction set.
    pub set: Option<String>,
    /// An explicit id for the correction element.
    pub id: Option<String>,
    /// Detached replacement content, placed under `new`.
    pub new: Option<NodeId>,
    /// The in-tree element being replaced, demoted under `original`.
    pub original: Option<NodeId>,
    /// The in-tree element kept as authoritative, held under `current`.
    pub current: Option<NodeId>,
    /// An existing correction element to extend.
    pub reuse: Option<NodeId>,
    /// Detached suggestion wrappers to append.
    pub suggestions: Vec<NodeId>,
    /// Attributes for the correction element itself.
    pub props: ElementProps,
}

impl Document {
    fn container(&mut self, correction: NodeId, class: ElementClass) -> NodeId {
        let existing = self
            .children(correction)
            .iter()
            .copied()
            .find(|&c| self.class_of(c) == class);
        match existing {
            Some(node) => node,
            None => self.add(correction, class, ElementProps::new()),
        }
    }

    fn position_of(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|&c| c == node)
    }

    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node);
        while let Some(p) = cursor {
            if p == ancestor {
                return true;
            }
            cursor = self.parent(p);
        }
        false
    }

    /// Applies a correction under `parent`.
    ///
    /// With `new` (and usually `original`), the correction element takes
    /// the original's place, the original is demoted under an `original`
    /// container and the replacement becomes the `new` content. With
    /// `current`, the element is wrapped in place as authoritative
    /// `current` content. With `reuse`, an existing correction is extended
    /// instead. Suggestions are appended in all cases.
    ///
    /// ## Arguments
    ///
    /// * `parent` - The element the correction is attached under.
    /// * `params` - The correction request, see [`CorrectParams`].
    ///
    /// ## Returns
    ///
    /// Returns the handle of the correction element.
    pub fn correct(
        &mut self,
        parent: NodeId,
        params: CorrectParams,
    ) -> Result<NodeId, DocumentError> {
        let (correction, fresh) = match params.reuse {
            Some(reuse) => {
                if self.class_of(reuse) != ElementClass::Correction {
                    return Err(DocumentError::InvalidCorrection(
                        "reuse target is not a correction".to_string(),
                    ));
                }
                (reuse, false)
            }
            None => {
                let mut props = params.props.clone();
                if props.id.is_none() {
                    props.id = params.id.clone();
                }
                if props.set.is_none() {
                    props.set = params.set.clone();
                }
                (self.build(ElementClass::Correction, props, Vec::new()), true)
            }
        };
        if !fresh {
            let mut props = params.props.clone();
            if props.set.is_none() {
                props.set = params.set.clone();
            }
            self.update(correction, &props);
        }

        if let Some(new) = params.new {
            match params.original {
                Some(original) => {
                    let position = self.position_of(original);
                    self.detach(original);
                    if fresh {
                        match position {
                            Some(index) => self.attach_at(parent, index, correction),
                            None => self.attach(parent, correction),
                        }
                    }
                    let original_container = self.container(correction, ElementClass::Original);
                    self.attach(original_container, original);
                }
                None => {
                    if fresh {
                        self.attach(parent, correction);
                    }
                }
            }
            let new_container = self.container(correction, ElementClass::New);
            self.attach(new_container, new);
        } else if let Some(current) = params.current {
            if self.is_descendant(current, correction) {
                // already held by the reused correction, leave in place
            } else {
                let position = self.position_of(current);
                self.detach(current);
                if fresh {
                    match position {
                        Some(index) => self.attach_at(parent, index, correction),
                        None => self.attach(parent, correction),
                    }
                }
                let current_container = self.container(correction, ElementClass::Current);
                self.attach(current_container, current);
            }
        } else if fresh {
            self.attach(parent, correction);
        }

        for suggestion in params.suggestions {
            if self.class_of(suggestion) != ElementClass::Suggestion {
                return Err(DocumentError::InvalidCorrection(
                    "suggestion payload is not a suggestion element".to_string(),
                ));
            }
            self.attach(correction, suggestion);
        }

        Ok(correction)
    }
}
