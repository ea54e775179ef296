//! # Element Registry
//!
//! The closed registry of annotation element classes and their capability
//! flags. Consumers never branch on tag names, only on capabilities.

/// The kind of annotation an element class carries, used for set
/// declarations.
///
/// Only declarable classes map to an annotation type; wrapper content such
/// as `Original` or `Suggestion` does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationType {
    /// Text content (`t`).
    Text,
    /// Division structure (`div`).
    Division,
    /// Paragraph structure (`p`).
    Paragraph,
    /// Sentence structure (`s`).
    Sentence,
    /// Token structure (`w`).
    Token,
    /// Morphological structure (`morpheme`).
    Morphological,
    /// Part-of-speech annotation (`pos`).
    Pos,
    /// Lemma annotation (`lemma`).
    Lemma,
    /// Sense annotation (`sense`).
    Sense,
    /// Named entity span annotation (`entity`, `entities`).
    Entity,
    /// Chunk span annotation (`chunk`, `chunking`).
    Chunking,
    /// Syntactic unit span annotation (`su`, `syntax`).
    Syntax,
    /// Correction annotation (`correction`).
    Correction,
}

/// Whether an annotation was produced automatically or by a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotatorType {
    /// Produced by an automatic process.
    Auto,
    /// Produced by a human annotator.
    Manual,
}

impl AnnotatorType {
    /// Returns the lowercase name used in queries and serialisation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotatorType::Auto => "auto",
            AnnotatorType::Manual => "manual",
        }
    }

    /// Parses the lowercase name used in queries.
    ///
    /// ## Arguments
    ///
    /// * `s` - The value to parse (`"auto"` or `"manual"`).
    ///
    /// ## Returns
    ///
    /// Returns the matching [`AnnotatorType`], or [`None`] for any other
    /// value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(AnnotatorType::Auto),
            "manual" => Some(AnnotatorType::Manual),
            _ => None,
        }
    }
}

/// An element class in the annotated-document model.
///
/// Classes split into structural elements, text content, inline (token)
/// annotations, span annotations with their layers, and the wrapper
/// elements used by corrections and alternatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementClass {
    /// A text body, the top-level structural element.
    Text,
    /// A division within a text.
    Division,
    /// A paragraph.
    Paragraph,
    /// A sentence.
    Sentence,
    /// A word token.
    Word,
    /// A morpheme within a word.
    Morpheme,
    /// Literal text content of a structural element.
    TextContent,
    /// A part-of-speech annotation on a token.
    PosAnnotation,
    /// A lemma annotation on a token.
    LemmaAnnotation,
    /// A sense annotation on a token.
    SenseAnnotation,
    /// A named-entity span annotation.
    Entity,
    /// A chunk span annotation.
    Chunk,
    /// A syntactic-unit span annotation.
    SyntacticUnit,
    /// The layer holding entity annotations.
    EntitiesLayer,
    /// The layer holding chunk annotations.
    ChunkingLayer,
    /// The layer holding syntactic-unit annotations.
    SyntaxLayer,
    /// An authoritative correction wrapping original and new content.
    Correction,
    /// A non-authoritative alternative annotation.
    Alternative,
    /// A suggested (non-authoritative) correction payload.
    Suggestion,
    /// The demoted content of a correction.
    Original,
    /// The authoritative new content of a correction.
    New,
    /// The authoritative current content of a correction.
    Current,
}

impl ElementClass {
    /// Looks up an element class by its tag name.
    ///
    /// ## Arguments
    ///
    /// * `tag` - The tag name as it appears in queries and serialisation.
    ///
    /// ## Returns
    ///
    /// Returns the matching [`ElementClass`], or [`None`] for an unknown
    /// tag.
    pub fn from_xmltag(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(ElementClass::Text),
            "div" => Some(ElementClass::Division),
            "p" => Some(ElementClass::Paragraph),
            "s" => Some(ElementClass::Sentence),
            "w" => Some(ElementClass::Word),
            "morpheme" => Some(ElementClass::Morpheme),
            "t" => Some(ElementClass::TextContent),
            "pos" => Some(ElementClass::PosAnnotation),
            "lemma" => Some(ElementClass::LemmaAnnotation),
            "sense" => Some(ElementClass::SenseAnnotation),
            "entity" => Some(ElementClass::Entity),
            "chunk" => Some(ElementClass::Chunk),
            "su" => Some(ElementClass::SyntacticUnit),
            "entities" => Some(ElementClass::EntitiesLayer),
            "chunking" => Some(ElementClass::ChunkingLayer),
            "syntax" => Some(ElementClass::SyntaxLayer),
            "correction" => Some(ElementClass::Correction),
            "alt" => Some(ElementClass::Alternative),
            "suggestion" => Some(ElementClass::Suggestion),
            "original" => Some(ElementClass::Original),
            "new" => Some(ElementClass::New),
            "current" => Some(ElementClass::Current),
            _ => None,
        }
    }

    /// Returns the tag name of this class.
    pub fn xmltag(&self) -> &'static str {
        match self {
            ElementClass::Text => "text",
            ElementClass::Division => "div",
            ElementClass::Paragraph => "p",
            ElementClass::Sentence => "s",
            ElementClass::Word => "w",
            ElementClass::Morpheme => "morpheme",
            ElementClass::TextContent => "t",
            ElementClass::PosAnnotation => "pos",
            ElementClass::LemmaAnnotation => "lemma",
            ElementClass::SenseAnnotation => "sense",
            ElementClass::Entity => "entity",
            ElementClass::Chunk => "chunk",
            ElementClass::SyntacticUnit => "su",
            ElementClass::EntitiesLayer => "entities",
            ElementClass::ChunkingLayer => "chunking",
            ElementClass::SyntaxLayer => "syntax",
            ElementClass::Correction => "correction",
            ElementClass::Alternative => "alt",
            ElementClass::Suggestion => "suggestion",
            ElementClass::Original => "original",
            ElementClass::New => "new",
            ElementClass::Current => "current",
        }
    }

    /// Returns the annotation type this class declares under, if it is
    /// declarable.
    pub fn annotation_type(&self) -> Option<AnnotationType> {
        match self {
            ElementClass::TextContent => Some(AnnotationType::Text),
            ElementClass::Division => Some(AnnotationType::Division),
            ElementClass::Paragraph => Some(AnnotationType::Paragraph),
            ElementClass::Sentence => Some(AnnotationType::Sentence),
            ElementClass::Word => Some(AnnotationType::Token),
            ElementClass::Morpheme => Some(AnnotationType::Morphological),
            ElementClass::PosAnnotation => Some(AnnotationType::Pos),
            ElementClass::LemmaAnnotation => Some(AnnotationType::Lemma),
            ElementClass::SenseAnnotation => Some(AnnotationType::Sense),
            ElementClass::Entity | ElementClass::EntitiesLayer => Some(AnnotationType::Entity),
            ElementClass::Chunk | ElementClass::ChunkingLayer => Some(AnnotationType::Chunking),
            ElementClass::SyntacticUnit | ElementClass::SyntaxLayer => {
                Some(AnnotationType::Syntax)
            }
            ElementClass::Correction => Some(AnnotationType::Correction),
            _ => None,
        }
    }

    /// Whether this class is a structural element.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ElementClass::Text
                | ElementClass::Division
                | ElementClass::Paragraph
                | ElementClass::Sentence
                | ElementClass::Word
                | ElementClass::Morpheme
        )
    }

    /// Whether this class is a span annotation.
    pub fn is_span(&self) -> bool {
        matches!(
            self,
            ElementClass::Entity | ElementClass::Chunk | ElementClass::SyntacticUnit
        )
    }

    /// Whether this class is an annotation layer.
    pub fn is_layer(&self) -> bool {
        matches!(
            self,
            ElementClass::EntitiesLayer | ElementClass::ChunkingLayer | ElementClass::SyntaxLayer
        )
    }

    /// Whether span annotations can reference elements of this class.
    pub fn is_word_like(&self) -> bool {
        matches!(self, ElementClass::Word | ElementClass::Morpheme)
    }

    /// Returns the layer class holding span annotations of this class.
    ///
    /// ## Returns
    ///
    /// Returns the layer [`ElementClass`] for a span annotation class, or
    /// [`None`] for any other class.
    pub fn layer_class(&self) -> Option<ElementClass> {
        match self {
            ElementClass::Entity => Some(ElementClass::EntitiesLayer),
            ElementClass::Chunk => Some(ElementClass::ChunkingLayer),
            ElementClass::SyntacticUnit => Some(ElementClass::SyntaxLayer),
            _ => None,
        }
    }

    /// Whether selection walks may descend through this class.
    ///
    /// Alternatives, originals and suggestions hold non-authoritative
    /// content and are skipped by [`Document::select`](crate::Document::select).
    pub fn is_authoritative_container(&self) -> bool {
        !matches!(
            self,
            ElementClass::Alternative | ElementClass::Original | ElementClass::Suggestion
        )
    }
}

impl std::fmt::Display for ElementClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.xmltag())
    }
}

/// The optional attribute bag used when constructing or updating elements.
///
/// Unset fields are left untouched by updates and omitted by constructors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementProps {
    /// The element id.
    pub id: Option<String>,
    /// The annotation set.
    pub set: Option<String>,
    /// The annotation class attribute.
    pub cls: Option<String>,
    /// The annotator name.
    pub annotator: Option<String>,
    /// The annotator type.
    pub annotatortype: Option<AnnotatorType>,
    /// The annotation confidence.
    pub confidence: Option<f64>,
    /// The sequence number attribute.
    pub n: Option<String>,
    /// Text value: the literal value for a [`ElementClass::TextContent`]
    /// element, or the text content to attach to a structural element.
    pub value: Option<String>,
}

impl ElementProps {
    /// Creates an empty attribute bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bag with only the class attribute set.
    ///
    /// ## Arguments
    ///
    /// * `cls` - The annotation class.
    pub fn with_class(cls: impl Into<String>) -> Self {
        Self {
            cls: Some(cls.into()),
            ..Self::default()
        }
    }

    /// Creates a bag with only the text value set.
    ///
    /// ## Arguments
    ///
    /// * `value` - The text value.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Returns a copy with the id set.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns a copy with the set attribute set.
    pub fn set(mut self, set: impl Into<String>) -> Self {
        self.set = Some(set.into());
        self
    }
}
