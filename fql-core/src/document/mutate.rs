//! # Mutation
//!
//! Structural edits on the document tree: construction, attachment,
//! detachment, text and span updates, deep copies and id generation.

use crate::document::{Document, NodeData, NodeId};
use crate::element::{ElementClass, ElementProps};
use crate::error::DocumentError;

impl Document {
    /// Builds a detached element with the given attributes and children.
    ///
    /// The children must themselves be detached; they are re-parented to
    /// the new element. A `value` on a non-text-content class becomes a
    /// text-content child.
    ///
    /// ## Returns
    ///
    /// Returns the handle of the new detached element.
    pub fn build(
        &mut self,
        class: ElementClass,
        props: ElementProps,
        children: Vec<NodeId>,
    ) -> NodeId {
        let node = self.alloc(NodeData::from_props(class, &props));
        for child in children {
            self.node_mut(child).parent = Some(node);
            self.node_mut(node).children.push(child);
        }
        if class != ElementClass::TextContent {
            if let Some(value) = props.value {
                let t = self.alloc(NodeData {
                    value: Some(value),
                    ..NodeData::from_props(ElementClass::TextContent, &ElementProps::new())
                });
                self.node_mut(t).parent = Some(node);
                self.node_mut(node).children.push(t);
            }
        }
        node
    }

    /// Attaches a detached element as the last child of `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Attaches a detached element at `index` among the children of
    /// `parent`, clamped to the child count.
    pub fn attach_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
        let len = self.node(parent).children.len();
        self.node_mut(parent).children.insert(index.min(len), child);
    }

    /// Creates a new element as the last child of `parent`.
    ///
    /// ## Arguments
    ///
    /// * `parent` - The element to attach under.
    /// * `class` - The class of the new element.
    /// * `props` - The attributes of the new element.
    ///
    /// ## Returns
    ///
    /// Returns the handle of the new element.
    pub fn add(&mut self, parent: NodeId, class: ElementClass, props: ElementProps) -> NodeId {
        let node = self.build(class, props, Vec::new());
        self.attach(parent, node);
        node
    }

    /// Creates a new element at `index` among the children of `parent`.
    pub fn insert(
        &mut self,
        parent: NodeId,
        index: usize,
        class: ElementClass,
        props: ElementProps,
    ) -> NodeId {
        let node = self.build(class, props, Vec::new());
        self.attach_at(parent, index, node);
        node
    }

    /// Creates a span annotation over `members` in the appropriate layer.
    ///
    /// The layer is found (or created, honouring the set in `props`) under
    /// the nearest non-word structural ancestor of the first member.
    ///
    /// ## Returns
    ///
    /// Returns the handle of the new span annotation, or an error when the
    /// class is not a span annotation or no suitable ancestor exists.
    pub fn add_span(
        &mut self,
        members: &[NodeId],
        class: ElementClass,
        props: ElementProps,
    ) -> Result<NodeId, DocumentError> {
        let layer_class = class.layer_class().ok_or(DocumentError::NotAttachable {
            child: class,
            reason: "not a span annotation class".to_string(),
        })?;
        let first = *members.first().ok_or(DocumentError::NotAttachable {
            child: class,
            reason: "empty span".to_string(),
        })?;
        let host = self
            .ancestor_where(first, |c| c.is_structural() && !c.is_word_like())
            .ok_or(DocumentError::NoParent(class))?;
        let set = props.set.clone();
        let existing = self.children(host).iter().copied().find(|&c| {
            self.node(c).class == layer_class && (set.is_none() || self.node(c).set == set)
        });
        let layer = match existing {
            Some(layer) => layer,
            None => {
                let mut layer_props = ElementProps::new();
                layer_props.set = set.clone();
                self.add(host, layer_class, layer_props)
            }
        };
        let span = self.build(class, props, Vec::new());
        self.node_mut(span).wrefs = members.to_vec();
        self.attach(layer, span);
        Ok(span)
    }

    /// Detaches `node` from its parent (or the top-level sequence) without
    /// touching the id index, so it can be re-attached elsewhere.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.node(node).parent {
            self.node_mut(parent).children.retain(|&c| c != node);
            self.node_mut(node).parent = None;
        } else {
            self.roots.retain(|&r| r != node);
        }
    }

    /// Removes `node` and its subtree from the document.
    ///
    /// The subtree is detached and all of its element ids are dropped from
    /// the index.
    pub fn remove(&mut self, node: NodeId) {
        self.detach(node);
        self.unindex(node);
    }

    fn unindex(&mut self, node: NodeId) {
        if let Some(id) = self.node(node).id.clone() {
            self.index.remove(&id);
        }
        for child in self.node(node).children.clone() {
            self.unindex(child);
        }
    }

    /// Sets the text of an element.
    ///
    /// On a text-content element the value is replaced; otherwise the
    /// direct text-content child is updated, or created when absent.
    pub fn settext(&mut self, node: NodeId, value: impl Into<String>) {
        let value = value.into();
        if self.node(node).class == ElementClass::TextContent {
            self.node_mut(node).value = Some(value);
            return;
        }
        let existing = self
            .node(node)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).class == ElementClass::TextContent);
        match existing {
            Some(t) => self.node_mut(t).value = Some(value),
            None => {
                let t = self.build(
                    ElementClass::TextContent,
                    ElementProps::with_value(value),
                    Vec::new(),
                );
                self.attach(node, t);
            }
        }
    }

    /// Replaces the word references of a span annotation.
    pub fn setspan(&mut self, span: NodeId, members: &[NodeId]) {
        self.node_mut(span).wrefs = members.to_vec();
    }

    /// Applies the set attributes of `props` to an element.
    ///
    /// A `value` is applied through [`Document::settext`]; unset fields
    /// are left untouched.
    pub fn update(&mut self, node: NodeId, props: &ElementProps) {
        if let Some(id) = &props.id {
            self.node_mut(node).id = Some(id.clone());
            self.index.insert(id.clone(), node);
        }
        if let Some(set) = &props.set {
            self.node_mut(node).set = Some(set.clone());
        }
        if let Some(cls) = &props.cls {
            self.node_mut(node).cls = Some(cls.clone());
        }
        if let Some(annotator) = &props.annotator {
            self.node_mut(node).annotator = Some(annotator.clone());
        }
        if let Some(annotatortype) = props.annotatortype {
            self.node_mut(node).annotatortype = Some(annotatortype);
        }
        if let Some(confidence) = props.confidence {
            self.node_mut(node).confidence = Some(confidence);
        }
        if let Some(n) = &props.n {
            self.node_mut(node).n = Some(n.clone());
        }
        if let Some(value) = &props.value {
            self.settext(node, value.clone());
        }
    }

    /// Deep-copies a subtree into a detached element.
    ///
    /// Element ids in the copy are suffixed with `id_suffix` and
    /// registered in the index; word references still point at the
    /// original referenced elements.
    ///
    /// ## Returns
    ///
    /// Returns the handle of the detached copy.
    pub fn copy(&mut self, node: NodeId, id_suffix: &str) -> NodeId {
        let mut data = self.node(node).clone();
        data.parent = None;
        data.children = Vec::new();
        data.id = data.id.map(|id| format!("{}{}", id, id_suffix));
        let children = self.node(node).children.clone();
        let copied = self.alloc(data);
        for child in children {
            let child_copy = self.copy(child, id_suffix);
            self.node_mut(child_copy).parent = Some(copied);
            self.node_mut(copied).children.push(child_copy);
        }
        copied
    }

    /// Generates a fresh element id under `parent` for the given class.
    ///
    /// Ids take the form `{base}.{tag}.{n}` where the base is the parent's
    /// id (or the document id) and `n` is the first free ordinal.
    pub fn generate_id(&self, parent: NodeId, class: ElementClass) -> String {
        let base = self
            .node(parent)
            .id
            .clone()
            .unwrap_or_else(|| self.id.clone());
        let mut n = 1usize;
        loop {
            let candidate = format!("{}.{}.{}", base, class.xmltag(), n);
            if !self.index.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}
