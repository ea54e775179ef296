use fql_core::prelude::*;

fn props(id: &str) -> ElementProps {
    ElementProps::new().id(id)
}

fn sample_doc() -> (Document, NodeId, NodeId, Vec<NodeId>) {
    let mut doc = Document::new("doc");
    let text = doc.add_root(ElementClass::Text, props("doc.text"));
    let s = doc.add(text, ElementClass::Sentence, props("doc.s.1"));
    let mut words = Vec::new();
    for (i, t) in ["the", "cat", "runs"].iter().enumerate() {
        let w = doc.add(s, ElementClass::Word, props(&format!("doc.w.{}", i + 1)));
        doc.settext(w, *t);
        words.push(w);
    }
    (doc, text, s, words)
}

#[test]
fn construction_and_attributes() {
    let (doc, text, s, words) = sample_doc();
    assert_eq!(doc.data(), &[text]);
    assert_eq!(doc.class_of(s), ElementClass::Sentence);
    assert_eq!(doc.id_of(words[0]), Some("doc.w.1"));
    assert_eq!(doc.parent(words[0]), Some(s));
    assert_eq!(doc.get("doc.w.2"), Some(words[1]));
    assert_eq!(doc.get("doc.w.9"), None);
    assert_eq!(doc.describe(s), "<s id=doc.s.1>");
}

#[test]
fn attribute_reading() {
    let mut doc = Document::new("doc");
    let text = doc.add_root(ElementClass::Text, props("doc.text"));
    let w = doc.add(text, ElementClass::Word, props("doc.w.1"));
    let pos = doc.add(
        w,
        ElementClass::PosAnnotation,
        ElementProps {
            set: Some("brown".to_string()),
            cls: Some("N".to_string()),
            annotator: Some("tagger".to_string()),
            annotatortype: Some(AnnotatorType::Auto),
            confidence: Some(0.75),
            ..ElementProps::default()
        },
    );
    assert_eq!(doc.attribute(pos, "class"), Some("N".to_string()));
    assert_eq!(doc.attribute(pos, "set"), Some("brown".to_string()));
    assert_eq!(doc.attribute(pos, "annotator"), Some("tagger".to_string()));
    assert_eq!(doc.attribute(pos, "annotatortype"), Some("auto".to_string()));
    assert_eq!(doc.attribute(pos, "confidence"), Some("0.75".to_string()));
    assert_eq!(doc.attribute(pos, "n"), None);
    assert_eq!(doc.attribute(pos, "bogus"), None);
}

#[test]
fn text_access() {
    let (mut doc, _text, s, words) = sample_doc();
    assert_eq!(doc.text(words[1]).unwrap(), "cat");
    assert_eq!(doc.text(s).unwrap(), "the cat runs");
    doc.settext(words[1], "dog");
    assert_eq!(doc.text(words[1]).unwrap(), "dog");

    let bare = doc.add(s, ElementClass::Word, props("doc.w.4"));
    assert!(matches!(
        doc.text(bare),
        Err(DocumentError::NoSuchText(ElementClass::Word))
    ));
}

#[test]
fn sibling_navigation() {
    let (doc, _text, _s, words) = sample_doc();
    assert_eq!(doc.next(words[0]), Some(words[1]));
    assert_eq!(doc.previous(words[1]), Some(words[0]));
    assert_eq!(doc.previous(words[0]), None);
    assert_eq!(doc.next(words[2]), None);
}

#[test]
fn ancestors() {
    let (mut doc, text, s, words) = sample_doc();
    let pos = doc.add(words[0], ElementClass::PosAnnotation, ElementProps::new());
    assert_eq!(
        doc.ancestor_where(pos, |c| c.is_structural()),
        Some(words[0])
    );
    assert_eq!(
        doc.ancestor_where(pos, |c| c == ElementClass::Sentence),
        Some(s)
    );
    assert_eq!(
        doc.ancestor_where(words[0], |c| c == ElementClass::Text),
        Some(text)
    );
    assert_eq!(doc.ancestor_where(text, |c| c.is_structural()), None);
}

#[test]
fn id_generation() {
    let (mut doc, _text, s, _words) = sample_doc();
    assert_eq!(
        doc.generate_id(s, ElementClass::Correction),
        "doc.s.1.correction.1"
    );
    let c = doc.add(
        s,
        ElementClass::Correction,
        props("doc.s.1.correction.1"),
    );
    assert_eq!(doc.class_of(c), ElementClass::Correction);
    assert_eq!(
        doc.generate_id(s, ElementClass::Correction),
        "doc.s.1.correction.2"
    );
}

#[test]
fn deep_copy_with_suffix() {
    let (mut doc, _text, _s, words) = sample_doc();
    let copy = doc.copy(words[1], ".copy.0000abcd");
    assert_eq!(doc.parent(copy), None);
    assert_eq!(doc.id_of(copy), Some("doc.w.2.copy.0000abcd"));
    assert_eq!(doc.get("doc.w.2.copy.0000abcd"), Some(copy));
    assert_eq!(doc.text(copy).unwrap(), "cat");
    // the original is untouched
    assert_eq!(doc.id_of(words[1]), Some("doc.w.2"));
}

#[test]
fn removal_unindexes_subtree() {
    let (mut doc, _text, s, words) = sample_doc();
    doc.remove(words[1]);
    assert_eq!(doc.children(s).len(), 2);
    assert_eq!(doc.get("doc.w.2"), None);
    assert_eq!(doc.get("doc.w.1"), Some(words[0]));
}

#[test]
fn declarations_are_idempotent() {
    let mut doc = Document::new("doc");
    assert!(!doc.declared(AnnotationType::Pos, Some("brown")));
    doc.declare(
        AnnotationType::Pos,
        Some("brown".to_string()),
        ElementProps::new(),
    );
    doc.declare(
        AnnotationType::Pos,
        Some("brown".to_string()),
        ElementProps::new(),
    );
    assert!(doc.declared(AnnotationType::Pos, Some("brown")));
    assert_eq!(doc.defaultset(AnnotationType::Pos), Some("brown".to_string()));

    doc.declare(
        AnnotationType::Pos,
        Some("cgn".to_string()),
        ElementProps::new(),
    );
    // two declared sets, the default is ambiguous
    assert_eq!(doc.defaultset(AnnotationType::Pos), None);
    assert_eq!(doc.defaultset(AnnotationType::Lemma), None);
}

#[test]
fn insert_positions() {
    let (mut doc, _text, s, words) = sample_doc();
    let inserted = doc.insert(s, 1, ElementClass::Word, props("doc.w.x"));
    assert_eq!(doc.children(s), &[words[0], inserted, words[1], words[2]]);
    // out-of-range indexes clamp to the end
    let tail = doc.insert(s, 99, ElementClass::Word, props("doc.w.y"));
    assert_eq!(doc.children(s).last(), Some(&tail));
}
