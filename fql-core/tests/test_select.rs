use fql_core::prelude::*;

fn props(id: &str) -> ElementProps {
    ElementProps::new().id(id)
}

/// text > p > s > (w x3, entities layer with one entity over w1 & w2)
fn sample_doc() -> (Document, NodeId, NodeId, Vec<NodeId>, NodeId) {
    let mut doc = Document::new("doc");
    let text = doc.add_root(ElementClass::Text, props("doc.text"));
    let p = doc.add(text, ElementClass::Paragraph, props("doc.p.1"));
    let s = doc.add(p, ElementClass::Sentence, props("doc.s.1"));
    let mut words = Vec::new();
    for (i, t) in ["John", "Smith", "runs"].iter().enumerate() {
        let w = doc.add(s, ElementClass::Word, props(&format!("doc.w.{}", i + 1)));
        doc.settext(w, *t);
        words.push(w);
    }
    let entity = doc
        .add_span(
            &[words[0], words[1]],
            ElementClass::Entity,
            ElementProps::with_class("person").set("ents").id("doc.entity.1"),
        )
        .unwrap();
    (doc, text, s, words, entity)
}

#[test]
fn recursive_selection_in_document_order() {
    let (doc, text, s, words, _entity) = sample_doc();
    assert_eq!(doc.select(text, ElementClass::Word, None, true), words);
    assert_eq!(doc.select(text, ElementClass::Sentence, None, true), vec![s]);
    // non-recursive selection only inspects direct children
    assert!(doc.select(text, ElementClass::Word, None, false).is_empty());
    assert_eq!(doc.select(s, ElementClass::Word, None, false), words);
}

#[test]
fn selection_by_set() {
    let (mut doc, text, _s, words, _entity) = sample_doc();
    let brown = doc.add(
        words[0],
        ElementClass::PosAnnotation,
        ElementProps::with_class("N").set("brown"),
    );
    let cgn = doc.add(
        words[0],
        ElementClass::PosAnnotation,
        ElementProps::with_class("NOU").set("cgn"),
    );
    assert_eq!(
        doc.select(text, ElementClass::PosAnnotation, Some("brown"), true),
        vec![brown]
    );
    assert_eq!(
        doc.select(text, ElementClass::PosAnnotation, None, true),
        vec![brown, cgn]
    );
}

#[test]
fn selection_skips_non_authoritative_content() {
    let (mut doc, text, _s, words, _entity) = sample_doc();
    let alt_pos = doc.build(
        ElementClass::PosAnnotation,
        ElementProps::with_class("V"),
        Vec::new(),
    );
    let alt = doc.build(ElementClass::Alternative, ElementProps::new(), vec![alt_pos]);
    doc.attach(words[0], alt);
    assert!(doc.select(text, ElementClass::PosAnnotation, None, true).is_empty());
    // but the alternative wrapper itself is a direct child
    assert_eq!(
        doc.select(words[0], ElementClass::Alternative, None, false),
        vec![alt]
    );
}

#[test]
fn span_lookup() {
    let (doc, _text, _s, words, entity) = sample_doc();
    assert_eq!(doc.wrefs(entity), &[words[0], words[1]]);
    assert_eq!(
        doc.findspans(words[0], ElementClass::Entity, None),
        vec![entity]
    );
    assert_eq!(
        doc.findspans(words[0], ElementClass::Entity, Some("ents")),
        vec![entity]
    );
    assert!(doc.findspans(words[0], ElementClass::Entity, Some("other")).is_empty());
    assert!(doc.findspans(words[2], ElementClass::Entity, None).is_empty());
}

#[test]
fn span_layer_is_created_under_the_sentence() {
    let (doc, _text, s, _words, entity) = sample_doc();
    let layer = doc.parent(entity).unwrap();
    assert_eq!(doc.class_of(layer), ElementClass::EntitiesLayer);
    assert_eq!(doc.parent(layer), Some(s));
    assert_eq!(doc.set_of(layer), Some("ents"));
}

#[test]
fn alternatives_lookup() {
    let (mut doc, _text, _s, words, _entity) = sample_doc();
    let alt_pos = doc.build(
        ElementClass::PosAnnotation,
        ElementProps::with_class("V").set("brown"),
        Vec::new(),
    );
    let alt = doc.build(ElementClass::Alternative, ElementProps::new(), vec![alt_pos]);
    doc.attach(words[0], alt);

    assert_eq!(
        doc.alternatives(words[0], ElementClass::PosAnnotation, None),
        vec![alt]
    );
    assert_eq!(
        doc.alternatives(words[0], ElementClass::PosAnnotation, Some("brown")),
        vec![alt]
    );
    assert!(doc.alternatives(words[0], ElementClass::PosAnnotation, Some("cgn")).is_empty());
    assert!(doc.alternatives(words[0], ElementClass::LemmaAnnotation, None).is_empty());
    assert!(doc.alternatives(words[1], ElementClass::PosAnnotation, None).is_empty());
}

#[test]
fn incorrection_lookup() {
    let (mut doc, _text, _s, words, _entity) = sample_doc();
    let replacement = doc.build(
        ElementClass::TextContent,
        ElementProps::with_value("Jon"),
        Vec::new(),
    );
    let original = doc.select(words[0], ElementClass::TextContent, None, false)[0];
    let correction = doc
        .correct(
            words[0],
            CorrectParams {
                set: Some("corrections".to_string()),
                id: Some("doc.correction.1".to_string()),
                new: Some(replacement),
                original: Some(original),
                ..CorrectParams::default()
            },
        )
        .unwrap();

    assert_eq!(doc.incorrection(replacement), Some(correction));
    assert_eq!(doc.incorrection(original), None);
    assert_eq!(doc.incorrection(words[0]), None);
}
