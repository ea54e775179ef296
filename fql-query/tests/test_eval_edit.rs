use fql_core::prelude::*;
use fql_query::prelude::*;

fn props(id: &str) -> ElementProps {
    ElementProps::new().id(id)
}

fn sample_doc() -> (Document, NodeId, Vec<NodeId>) {
    let mut doc = Document::new("doc");
    let text = doc.add_root(ElementClass::Text, props("doc.text"));
    let s = doc.add(text, ElementClass::Sentence, props("doc.s.1"));
    let mut words = Vec::new();
    for (i, t) in ["the", "cat", "runs"].iter().enumerate() {
        let w = doc.add(s, ElementClass::Word, props(&format!("doc.w.{}", i + 1)));
        doc.settext(w, *t);
        words.push(w);
    }
    (doc, s, words)
}

fn run(doc: &mut Document, query: &str) -> Result<QueryResult, EvalError> {
    parse_query(query).unwrap().run(doc, &QueryContext::default())
}

fn elements(result: QueryResult) -> Vec<NodeId> {
    match result {
        QueryResult::Elements(elements) => elements,
        other => panic!("expected an element selection, got {:?}", other),
    }
}

#[test]
fn edit_sets_attributes_on_the_focus() {
    let (mut doc, _s, words) = sample_doc();
    let pos = doc.add(
        words[2],
        ElementClass::PosAnnotation,
        ElementProps::with_class("N").set("brown"),
    );
    let result = elements(
        run(
            &mut doc,
            "EDIT pos WITH class \"V\" annotator \"me\" FOR w WHERE text = \"runs\"",
        )
        .unwrap(),
    );
    assert_eq!(result, vec![pos]);
    assert_eq!(doc.cls_of(pos), Some("V"));
    assert_eq!(doc.attribute(pos, "annotator"), Some("me".to_string()));
    // the set is untouched
    assert_eq!(doc.set_of(pos), Some("brown"));
}

#[test]
fn edit_text_uses_settext() {
    let (mut doc, _s, words) = sample_doc();
    let result = elements(
        run(&mut doc, "EDIT w WHERE text = \"runs\" WITH text \"walks\"").unwrap(),
    );
    assert_eq!(result, vec![words[2]]);
    assert_eq!(doc.text(words[2]).unwrap(), "walks");
}

#[test]
fn edit_without_matching_focus_adds_to_targets() {
    let (mut doc, _s, words) = sample_doc();
    let result = elements(
        run(
            &mut doc,
            "EDIT pos OF \"brown\" WITH class \"N\" FOR w WHERE text = \"cat\"",
        )
        .unwrap(),
    );
    assert_eq!(result.len(), 1);
    let pos = result[0];
    assert_eq!(doc.parent(pos), Some(words[1]));
    assert_eq!(doc.class_of(pos), ElementClass::PosAnnotation);
    assert_eq!(doc.cls_of(pos), Some("N"));
    // the focus set is adopted by the new annotation
    assert_eq!(doc.set_of(pos), Some("brown"));
    // and the pair was auto-declared
    assert!(doc.declared(AnnotationType::Pos, Some("brown")));
}

#[test]
fn add_attaches_under_each_target() {
    let (mut doc, _s, _words) = sample_doc();
    let result = elements(run(&mut doc, "ADD lemma OF \"wn\" WITH class \"x\" FOR w").unwrap());
    assert_eq!(result.len(), 3);
    for lemma in &result {
        assert_eq!(doc.class_of(*lemma), ElementClass::LemmaAnnotation);
    }
}

#[test]
fn append_inserts_at_the_target_position() {
    let (mut doc, s, words) = sample_doc();
    let result = elements(
        run(&mut doc, "APPEND w WITH text \"X\" FOR w WHERE text = \"cat\"").unwrap(),
    );
    let added = result[0];
    assert_eq!(
        doc.children(s),
        &[words[0], added, words[1], words[2]],
        "APPEND inserts at the target's own index"
    );
    assert_eq!(doc.text(added).unwrap(), "X");
}

#[test]
fn prepend_inserts_before_the_previous_sibling() {
    let (mut doc, s, words) = sample_doc();
    let result = elements(
        run(&mut doc, "PREPEND w WITH text \"X\" FOR w WHERE text = \"cat\"").unwrap(),
    );
    let added = result[0];
    assert_eq!(doc.children(s), &[added, words[0], words[1], words[2]]);
}

#[test]
fn delete_removes_the_focus() {
    let (mut doc, _s, words) = sample_doc();
    doc.add(
        words[2],
        ElementClass::PosAnnotation,
        ElementProps::with_class("V").set("brown"),
    );
    let result = elements(run(&mut doc, "DELETE pos FOR w WHERE text = \"runs\"").unwrap());
    // DELETE collects nothing
    assert!(result.is_empty());
    assert!(doc.select(words[2], ElementClass::PosAnnotation, None, true).is_empty());
}

#[test]
fn respan_requires_a_span_focus() {
    let (mut doc, _s, words) = sample_doc();
    doc.add(
        words[2],
        ElementClass::PosAnnotation,
        ElementProps::with_class("V"),
    );
    assert!(matches!(
        run(&mut doc, "EDIT pos RESPAN w FOR w WHERE text = \"runs\""),
        Err(EvalError::Query(_))
    ));
}

#[test]
fn respan_replaces_the_word_references() {
    let (mut doc, _s, words) = sample_doc();
    let entity = doc
        .add_span(
            &[words[0], words[1]],
            ElementClass::Entity,
            ElementProps::with_class("x").set("ents"),
        )
        .unwrap();
    run(&mut doc, "EDIT entity OF \"ents\" RESPAN w FOR s").unwrap();
    assert_eq!(doc.wrefs(entity), &[words[0], words[1], words[2]]);
}

#[test]
fn subactions_run_against_the_focus_selection() {
    let (mut doc, _s, words) = sample_doc();
    let pos = doc.add(
        words[2],
        ElementClass::PosAnnotation,
        ElementProps::with_class("N").set("brown"),
    );
    let result = elements(
        run(
            &mut doc,
            "SELECT w WHERE text = \"runs\" (EDIT pos WITH class \"V\") FOR s",
        )
        .unwrap(),
    );
    // subaction results are discarded, the focus selection is returned
    assert_eq!(result, vec![words[2]]);
    assert_eq!(doc.cls_of(pos), Some("V"));
}

#[test]
fn spanset_for_a_non_span_focus_is_a_query_error() {
    let (mut doc, _s, _words) = sample_doc();
    assert!(matches!(
        run(&mut doc, "SELECT pos FOR SPAN w & w"),
        Err(EvalError::Query(_))
    ));
}

#[test]
fn add_span_over_a_span_target() {
    let (mut doc, s, words) = sample_doc();
    let result = elements(
        run(
            &mut doc,
            "ADD entity OF \"ents\" WITH class \"thing\" FOR SPAN w WHERE text = \"the\" & w WHERE text = \"cat\"",
        )
        .unwrap(),
    );
    assert_eq!(result.len(), 1);
    let entity = result[0];
    assert_eq!(doc.class_of(entity), ElementClass::Entity);
    assert_eq!(doc.wrefs(entity), &[words[0], words[1]]);
    assert_eq!(doc.cls_of(entity), Some("thing"));
    let layer = doc.parent(entity).unwrap();
    assert_eq!(doc.class_of(layer), ElementClass::EntitiesLayer);
    assert_eq!(doc.parent(layer), Some(s));
    assert!(doc.declared(AnnotationType::Entity, Some("ents")));
}

#[test]
fn select_spans_for_a_span_target() {
    let (mut doc, _s, words) = sample_doc();
    let entity = doc
        .add_span(
            &[words[0], words[1]],
            ElementClass::Entity,
            ElementProps::with_class("x").set("ents"),
        )
        .unwrap();
    let result = elements(
        run(
            &mut doc,
            "SELECT entity FOR SPAN w WHERE text = \"the\" & w WHERE text = \"cat\"",
        )
        .unwrap(),
    );
    assert_eq!(result, vec![entity]);
    // a span set not covered by the annotation does not match
    let result = elements(
        run(
            &mut doc,
            "SELECT entity FOR SPAN w WHERE text = \"the\" & w WHERE text = \"runs\"",
        )
        .unwrap(),
    );
    assert!(result.is_empty());
}

#[test]
fn find_spans_from_a_word_context() {
    let (mut doc, _s, words) = sample_doc();
    let entity = doc
        .add_span(
            &[words[0], words[1]],
            ElementClass::Entity,
            ElementProps::with_class("x").set("ents"),
        )
        .unwrap();
    let result = elements(run(&mut doc, "SELECT entity FOR w WHERE text = \"the\"").unwrap());
    assert_eq!(result, vec![entity]);
}
