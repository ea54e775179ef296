//! # Document Model
//!
//! The arena-backed annotated-document tree. Elements are stored in a
//! single arena owned by the [`Document`]; a [`NodeId`] is a stable handle
//! whose equality is element identity.

mod correct;
mod mutate;
mod select;
mod serialize;

pub use correct::CorrectParams;

use std::collections::HashMap;

use crate::element::{AnnotationType, AnnotatorType, ElementClass, ElementProps};

/// A handle to an element in a [`Document`].
///
/// Handles are cheap to copy and compare; comparing two handles compares
/// element identity, not element content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// The stored state of a single element.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) class: ElementClass,
    pub(crate) id: Option<String>,
    pub(crate) set: Option<String>,
    pub(crate) cls: Option<String>,
    pub(crate) annotator: Option<String>,
    pub(crate) annotatortype: Option<AnnotatorType>,
    pub(crate) confidence: Option<f64>,
    pub(crate) n: Option<String>,
    pub(crate) value: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) wrefs: Vec<NodeId>,
}

impl NodeData {
    fn from_props(class: ElementClass, props: &ElementProps) -> Self {
        let value = if class == ElementClass::TextContent {
            props.value.clone()
        } else {
            None
        };
        Self {
            class,
            id: props.id.clone(),
            set: props.set.clone(),
            cls: props.cls.clone(),
            annotator: props.annotator.clone(),
            annotatortype: props.annotatortype,
            confidence: props.confidence,
            n: props.n.clone(),
            value,
            parent: None,
            children: Vec::new(),
            wrefs: Vec::new(),
        }
    }
}

/// An annotated document: a tree of typed elements with set declarations
/// and an id index.
#[derive(Debug, Clone)]
pub struct Document {
    /// The document id.
    pub id: String,
    nodes: Vec<NodeData>,
    roots: Vec<NodeId>,
    index: HashMap<String, NodeId>,
    declarations: Vec<(AnnotationType, Option<String>)>,
    declaration_defaults: HashMap<(AnnotationType, Option<String>), ElementProps>,
}

impl Document {
    /// Creates an empty document.
    ///
    /// ## Arguments
    ///
    /// * `id` - The document id, also the base for generated element ids.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nodes: Vec::new(),
            roots: Vec::new(),
            index: HashMap::new(),
            declarations: Vec::new(),
            declaration_defaults: HashMap::new(),
        }
    }

    pub(crate) fn node(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.0]
    }

    pub(crate) fn node_mut(&mut self, node: NodeId) -> &mut NodeData {
        &mut self.nodes[node.0]
    }

    pub(crate) fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(eid) = data.id.clone() {
            self.index.insert(eid, id);
        }
        self.nodes.push(data);
        id
    }

    /// Registers a `(type, set)` declaration, with optional annotation
    /// defaults. Declaring the same pair twice is a no-op.
    ///
    /// ## Arguments
    ///
    /// * `annotation` - The annotation type being declared.
    /// * `set` - The set, if the declaration is set-specific.
    /// * `defaults` - Default annotation attributes for the pair.
    pub fn declare(
        &mut self,
        annotation: AnnotationType,
        set: Option<String>,
        defaults: ElementProps,
    ) {
        let key = (annotation, set);
        if !self.declarations.contains(&key) {
            self.declarations.push(key.clone());
        }
        self.declaration_defaults.insert(key, defaults);
    }

    /// Whether a `(type, set)` pair has been declared.
    pub fn declared(&self, annotation: AnnotationType, set: Option<&str>) -> bool {
        self.declarations
            .iter()
            .any(|(a, s)| *a == annotation && s.as_deref() == set)
    }

    /// Returns the default set for an annotation type.
    ///
    /// ## Returns
    ///
    /// Returns the declared set when exactly one declaration exists for the
    /// type, [`None`] when there are none or the choice is ambiguous.
    pub fn defaultset(&self, annotation: AnnotationType) -> Option<String> {
        let mut sets = self
            .declarations
            .iter()
            .filter(|(a, _)| *a == annotation)
            .map(|(_, s)| s.clone());
        match (sets.next(), sets.next()) {
            (Some(set), None) => set,
            _ => None,
        }
    }

    /// Looks up an element by id.
    pub fn get(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    /// The top-level structural sequence of the document.
    pub fn data(&self) -> &[NodeId] {
        &self.roots
    }

    /// Adds a top-level element (normally a text body).
    ///
    /// ## Arguments
    ///
    /// * `class` - The element class.
    /// * `props` - The element attributes.
    ///
    /// ## Returns
    ///
    /// Returns the handle of the new element.
    pub fn add_root(&mut self, class: ElementClass, props: ElementProps) -> NodeId {
        let node = self.alloc(NodeData::from_props(class, &props));
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
        self.roots.push(node);
        node
    }

    /// The class of an element.
    pub fn class_of(&self, node: NodeId) -> ElementClass {
        self.node(node).class
    }

    /// The id of an element, if it has one.
    pub fn id_of(&self, node: NodeId) -> Option<&str> {
        self.node(node).id.as_deref()
    }

    /// The set attribute of an element, if set.
    pub fn set_of(&self, node: NodeId) -> Option<&str> {
        self.node(node).set.as_deref()
    }

    /// The class attribute of an element, if set.
    pub fn cls_of(&self, node: NodeId) -> Option<&str> {
        self.node(node).cls.as_deref()
    }

    /// The parent of an element, if attached.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    /// The ordered children of an element.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    /// The word references of a span annotation element.
    pub fn wrefs(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).wrefs
    }

    /// Reads a named attribute as a string.
    ///
    /// ## Arguments
    ///
    /// * `node` - The element to read from.
    /// * `name` - One of `id`, `set`, `class`, `annotator`,
    ///   `annotatortype`, `confidence` or `n`.
    ///
    /// ## Returns
    ///
    /// Returns the attribute value, or [`None`] when the attribute is
    /// unset or the name is not a recognised attribute.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let data = self.node(node);
        match name {
            "id" => data.id.clone(),
            "set" => data.set.clone(),
            "class" => data.cls.clone(),
            "annotator" => data.annotator.clone(),
            "annotatortype" => data.annotatortype.map(|t| t.as_str().to_string()),
            "confidence" => data.confidence.map(|c| c.to_string()),
            "n" => data.n.clone(),
            _ => None,
        }
    }

    /// A short human-readable description of an element, for diagnostics.
    pub fn describe(&self, node: NodeId) -> String {
        let data = self.node(node);
        match &data.id {
            Some(id) => format!("<{} id={}>", data.class.xmltag(), id),
            None => format!("<{}>", data.class.xmltag()),
        }
    }
}
