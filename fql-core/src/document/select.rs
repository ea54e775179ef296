//! # Selection and Navigation
//!
//! Read-only walks over the document tree: class selection, span lookup,
//! alternatives, corrections, ancestors, siblings and text access.

use crate::document::{Document, NodeId};
use crate::element::ElementClass;
use crate::error::DocumentError;

impl Document {
    fn set_matches(&self, node: NodeId, set: Option<&str>) -> bool {
        match set {
            Some(set) => self.node(node).set.as_deref() == Some(set),
            None => true,
        }
    }

    /// Selects descendants of `context` by class and set, in document
    /// order.
    ///
    /// ## Arguments
    ///
    /// * `context` - The element whose children are searched.
    /// * `class` - The element class to match.
    /// * `set` - If given, only elements of this set match.
    /// * `recurse` - Whether to descend beyond direct children. Descent
    ///   never enters non-authoritative containers (alternatives,
    ///   originals, suggestions).
    ///
    /// ## Returns
    ///
    /// Returns the matching elements in document order.
    pub fn select(
        &self,
        context: NodeId,
        class: ElementClass,
        set: Option<&str>,
        recurse: bool,
    ) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.select_into(context, class, set, recurse, &mut found);
        found
    }

    fn select_into(
        &self,
        context: NodeId,
        class: ElementClass,
        set: Option<&str>,
        recurse: bool,
        found: &mut Vec<NodeId>,
    ) {
        for &child in &self.node(context).children {
            if self.node(child).class == class && self.set_matches(child, set) {
                found.push(child);
            }
            if recurse && self.node(child).class.is_authoritative_container() {
                self.select_into(child, class, set, recurse, found);
            }
        }
    }

    /// Finds span annotations referencing a word-like element.
    ///
    /// ## Arguments
    ///
    /// * `word` - The referenced element.
    /// * `class` - The span annotation class to match.
    /// * `set` - If given, only spans of this set match.
    ///
    /// ## Returns
    ///
    /// Returns the matching span annotations in document order.
    pub fn findspans(&self, word: NodeId, class: ElementClass, set: Option<&str>) -> Vec<NodeId> {
        let mut found = Vec::new();
        for &root in &self.roots {
            self.findspans_into(root, word, class, set, &mut found);
        }
        found
    }

    fn findspans_into(
        &self,
        context: NodeId,
        word: NodeId,
        class: ElementClass,
        set: Option<&str>,
        found: &mut Vec<NodeId>,
    ) {
        for &child in &self.node(context).children {
            if self.node(child).class == class
                && self.set_matches(child, set)
                && self.node(child).wrefs.contains(&word)
            {
                found.push(child);
            }
            if self.node(child).class.is_authoritative_container() {
                self.findspans_into(child, word, class, set, found);
            }
        }
    }

    /// Returns the alternative wrappers under `node` that contain an
    /// annotation of the given class and set.
    pub fn alternatives(
        &self,
        node: NodeId,
        class: ElementClass,
        set: Option<&str>,
    ) -> Vec<NodeId> {
        let mut found = Vec::new();
        for &child in &self.node(node).children {
            if self.node(child).class == ElementClass::Alternative
                && self.contains_class(child, class, set)
            {
                found.push(child);
            }
        }
        found
    }

    fn contains_class(&self, context: NodeId, class: ElementClass, set: Option<&str>) -> bool {
        self.node(context).children.iter().any(|&child| {
            (self.node(child).class == class && self.set_matches(child, set))
                || self.contains_class(child, class, set)
        })
    }

    /// Returns the correction `node` is an authoritative part of, if any.
    ///
    /// An element sits in a correction when its ancestor chain reaches a
    /// [`ElementClass::Correction`] through a `new` or `current` branch
    /// before crossing a structural boundary.
    pub fn incorrection(&self, node: NodeId) -> Option<NodeId> {
        let mut prev = node;
        let mut cursor = self.node(node).parent;
        while let Some(ancestor) = cursor {
            let class = self.node(ancestor).class;
            if class == ElementClass::Correction {
                let via = self.node(prev).class;
                if via == ElementClass::New || via == ElementClass::Current {
                    return Some(ancestor);
                }
                return None;
            }
            if class.is_structural() {
                return None;
            }
            prev = ancestor;
            cursor = self.node(ancestor).parent;
        }
        None
    }

    /// Returns the nearest ancestor whose class satisfies the predicate.
    pub fn ancestor_where(
        &self,
        node: NodeId,
        predicate: impl Fn(ElementClass) -> bool,
    ) -> Option<NodeId> {
        let mut cursor = self.node(node).parent;
        while let Some(ancestor) = cursor {
            if predicate(self.node(ancestor).class) {
                return Some(ancestor);
            }
            cursor = self.node(ancestor).parent;
        }
        None
    }

    fn siblings(&self, node: NodeId) -> &[NodeId] {
        match self.node(node).parent {
            Some(parent) => &self.node(parent).children,
            None => &self.roots,
        }
    }

    /// The next sibling of `node`, if any.
    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        let siblings = self.siblings(node);
        let pos = siblings.iter().position(|&s| s == node)?;
        siblings.get(pos + 1).copied()
    }

    /// The previous sibling of `node`, if any.
    pub fn previous(&self, node: NodeId) -> Option<NodeId> {
        let siblings = self.siblings(node);
        let pos = siblings.iter().position(|&s| s == node)?;
        pos.checked_sub(1).map(|p| siblings[p])
    }

    /// Returns the text of an element.
    ///
    /// For a text-content element this is its literal value; otherwise the
    /// value of a direct text-content child; otherwise the space-joined
    /// values of all authoritative descendant text content, which resolves
    /// text through corrections.
    ///
    /// ## Returns
    ///
    /// Returns the text, or [`DocumentError::NoSuchText`] when the element
    /// has none.
    pub fn text(&self, node: NodeId) -> Result<String, DocumentError> {
        let data = self.node(node);
        if data.class == ElementClass::TextContent {
            return data
                .value
                .clone()
                .ok_or(DocumentError::NoSuchText(data.class));
        }
        for &child in &data.children {
            let child_data = self.node(child);
            if child_data.class == ElementClass::TextContent {
                if let Some(value) = &child_data.value {
                    return Ok(value.clone());
                }
            }
        }
        let contents = self.select(node, ElementClass::TextContent, None, true);
        let parts: Vec<String> = contents
            .into_iter()
            .filter_map(|t| self.node(t).value.clone())
            .collect();
        if parts.is_empty() {
            Err(DocumentError::NoSuchText(data.class))
        } else {
            Ok(parts.join(" "))
        }
    }
}
