//! # AST Types
//!
//! Abstract Syntax Tree type definitions for FQL queries. All nodes are
//! immutable after parsing; evaluation never rewrites them.

use fql_core::prelude::{AnnotatorType, ElementClass};
use regex::Regex;

/// The verb of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Select focus elements without mutating.
    Select,
    /// Edit attributes (or spans) of focus elements.
    Edit,
    /// Add a new annotation under each target.
    Add,
    /// Insert a new element at the target's position.
    Append,
    /// Insert a new element before the target's position.
    Prepend,
    /// Remove focus elements from their parents.
    Delete,
    /// Merge focus elements.
    Merge,
    /// Split focus elements.
    Split,
}

impl Verb {
    /// The keyword this verb was parsed from.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Select => "SELECT",
            Verb::Edit => "EDIT",
            Verb::Add => "ADD",
            Verb::Append => "APPEND",
            Verb::Prepend => "PREPEND",
            Verb::Delete => "DELETE",
            Verb::Merge => "MERGE",
            Verb::Split => "SPLIT",
        }
    }
}

/// A comparison operator in an attribute predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equality (`=` or `==`).
    Equal,
    /// Inequality (`!=`).
    NotEqual,
    /// Greater than (`>`).
    Greater,
    /// Less than (`<`).
    Less,
    /// Greater than or equal (`>=`).
    GreaterEqual,
    /// Less than or equal (`<=`).
    LessEqual,
    /// Substring containment (`CONTAINS`).
    Contains,
}

/// The relation a relational filter clause tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextModifier {
    /// A descendant matches (the HAS relation).
    Child,
    /// The parent matches.
    Parent,
    /// The next sibling matches.
    Next,
    /// The previous sibling matches.
    Previous,
    /// Unimplemented left-context relation.
    LeftContext,
    /// Unimplemented right-context relation.
    RightContext,
    /// Unimplemented two-sided context relation.
    Context,
    /// Unimplemented ancestor relation.
    Ancestor,
}

impl ContextModifier {
    /// The keyword this modifier was parsed from.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextModifier::Child => "CHILD",
            ContextModifier::Parent => "PARENT",
            ContextModifier::Next => "NEXT",
            ContextModifier::Previous => "PREVIOUS",
            ContextModifier::LeftContext => "LEFTCONTEXT",
            ContextModifier::RightContext => "RIGHTCONTEXT",
            ContextModifier::Context => "CONTEXT",
            ContextModifier::Ancestor => "ANCESTOR",
        }
    }
}

/// A single selector: element class or id, optional set and filter.
///
/// Exactly one of `class` and `id` is set by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    /// The element class to select, if selecting by class.
    pub class: Option<ElementClass>,
    /// The annotation set constraint.
    pub set: Option<String>,
    /// The element id to select, if selecting by id.
    pub id: Option<String>,
    /// The WHERE filter candidates must pass.
    pub filter: Option<Filter>,
}

/// A WHERE filter: clauses joined by a single logical operator.
///
/// When `negated` is set the filter holds exactly one clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// The clauses, in source order.
    pub clauses: Vec<Clause>,
    /// Whether the whole filter is negated (`NOT`).
    pub negated: bool,
    /// Whether clauses are joined by OR (otherwise AND).
    pub disjunction: bool,
}

/// One clause of a filter.
#[derive(Debug, Clone)]
pub enum Clause {
    /// An attribute comparison.
    Predicate {
        /// The attribute name.
        attr: String,
        /// The comparison operator.
        op: CompareOp,
        /// The right-hand value.
        value: String,
    },
    /// An attribute regular-expression test (`MATCHES`), compiled at
    /// parse time.
    Regex {
        /// The attribute name.
        attr: String,
        /// The compiled pattern.
        regex: Regex,
    },
    /// A parenthesised nested filter.
    Nested(Filter),
    /// A relational sub-query: HAS, PARENT, NEXT, PREVIOUS, ...
    Relational {
        /// The relation tested.
        modifier: ContextModifier,
        /// The selector the related element must match.
        selector: Box<Selector>,
        /// The sub-filter applied to related elements (HAS only).
        filter: Option<Box<Filter>>,
    },
}

impl PartialEq for Clause {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Clause::Predicate { attr, op, value },
                Clause::Predicate {
                    attr: attr2,
                    op: op2,
                    value: value2,
                },
            ) => attr == attr2 && op == op2 && value == value2,
            (
                Clause::Regex { attr, regex },
                Clause::Regex {
                    attr: attr2,
                    regex: regex2,
                },
            ) => attr == attr2 && regex.as_str() == regex2.as_str(),
            (Clause::Nested(a), Clause::Nested(b)) => a == b,
            (
                Clause::Relational {
                    modifier,
                    selector,
                    filter,
                },
                Clause::Relational {
                    modifier: modifier2,
                    selector: selector2,
                    filter: filter2,
                },
            ) => modifier == modifier2 && selector == selector2 && filter == filter2,
            _ => false,
        }
    }
}

/// A span expression: selectors joined by `&`, evaluated to a span set.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanExpr {
    /// The selectors making up the span.
    pub targets: Vec<Selector>,
}

/// One item of a target list.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetItem {
    /// A plain selector target.
    Selector(Selector),
    /// A `SPAN ...` target.
    Span(SpanExpr),
}

/// A FOR/IN target expression scoping an action.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// The targets, in source order. Span and non-span items never mix.
    pub targets: Vec<TargetItem>,
    /// `true` for IN (no recursive descent), `false` for FOR.
    pub strict: bool,
    /// A nested scope, evaluated before this target.
    pub nested: Option<Selector>,
}

/// Parsed WITH assignments.
///
/// `set` is never produced by the parser; evaluation fills it in when an
/// annotation is created in a specific set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Assignments {
    /// The annotator name.
    pub annotator: Option<String>,
    /// The annotator type (`auto` / `manual`).
    pub annotatortype: Option<AnnotatorType>,
    /// The annotation class.
    pub class: Option<String>,
    /// The sequence number.
    pub n: Option<String>,
    /// The confidence value.
    pub confidence: Option<f64>,
    /// The text value; applied as the element value on text content.
    pub text: Option<String>,
    /// The annotation set (evaluation only).
    pub set: Option<String>,
}

impl Assignments {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.annotator.is_none()
            && self.annotatortype.is_none()
            && self.class.is_none()
            && self.n.is_none()
            && self.confidence.is_none()
            && self.text.is_none()
            && self.set.is_none()
    }

    /// Returns `base` overlaid with the fields set on `self`.
    ///
    /// ## Arguments
    ///
    /// * `base` - The assignments providing fallback values.
    pub fn merged_over(&self, base: &Assignments) -> Assignments {
        Assignments {
            annotator: self.annotator.clone().or_else(|| base.annotator.clone()),
            annotatortype: self.annotatortype.or(base.annotatortype),
            class: self.class.clone().or_else(|| base.class.clone()),
            n: self.n.clone().or_else(|| base.n.clone()),
            confidence: self.confidence.or(base.confidence),
            text: self.text.clone().or_else(|| base.text.clone()),
            set: self.set.clone().or_else(|| base.set.clone()),
        }
    }
}

/// An `AS ALTERNATIVE` form.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeForm {
    /// Assignments for the annotation inside the alternative.
    pub subassignments: Assignments,
    /// Assignments for the alternative wrapper itself.
    pub assignments: Assignments,
    /// The filter applied when selecting alternatives.
    pub filter: Option<Filter>,
    /// A chained further alternative.
    pub next: Option<Box<AlternativeForm>>,
}

/// An `AS [BARE] CORRECTION` form.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionForm {
    /// The correction set.
    pub set: Option<String>,
    /// Assignments for the corrected annotation (the action payload).
    pub action_assignments: Assignments,
    /// Assignments for the correction element itself.
    pub assignments: Assignments,
    /// The filter applied when selecting corrections.
    pub filter: Option<Filter>,
    /// Suggestions: (annotation assignments, suggestion assignments).
    pub suggestions: Vec<(Assignments, Assignments)>,
    /// Whether the correction is BARE (no child content carried over).
    pub bare: bool,
}

/// The form wrapping an action's effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Form {
    /// A non-authoritative alternative.
    Alternative(AlternativeForm),
    /// An authoritative correction.
    Correction(CorrectionForm),
}

/// One action of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// The verb.
    pub verb: Verb,
    /// The focus selector.
    pub focus: Selector,
    /// The WITH assignments.
    pub assignments: Assignments,
    /// The form delegated to, if any.
    pub form: Option<Form>,
    /// Subactions run against the focus selection.
    pub subactions: Vec<Action>,
    /// The next action in the chain.
    pub next: Option<Box<Action>>,
    /// The RESPAN span for span-annotation edits.
    pub respan: Option<SpanExpr>,
}

/// A DECLARE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// The declared element class.
    pub class: ElementClass,
    /// The declared set.
    pub set: Option<String>,
    /// Default annotation attributes for the declaration.
    pub defaults: Assignments,
}

/// A parsed FQL query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Leading DECLARE statements.
    pub declarations: Vec<Declaration>,
    /// The root action, if the query has one.
    pub action: Option<Action>,
    /// The target scope, if the query has one.
    pub target: Option<Target>,
    /// The RETURN trailer; validated at execution time.
    pub return_type: Option<String>,
    /// The FORMAT trailer; validated at execution time.
    pub format: Option<String>,
    /// The REQUEST trailer, split on commas.
    pub request: Option<Vec<String>>,
}
