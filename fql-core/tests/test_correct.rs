use fql_core::prelude::*;

fn props(id: &str) -> ElementProps {
    ElementProps::new().id(id)
}

fn sample_doc() -> (Document, NodeId, NodeId) {
    let mut doc = Document::new("doc");
    let text = doc.add_root(ElementClass::Text, props("doc.text"));
    let s = doc.add(text, ElementClass::Sentence, props("doc.s.1"));
    let w = doc.add(s, ElementClass::Word, props("doc.w.1"));
    doc.settext(w, "kat");
    (doc, s, w)
}

#[test]
fn correction_replaces_in_place() {
    let (mut doc, _s, w) = sample_doc();
    let original = doc.select(w, ElementClass::TextContent, None, false)[0];
    let replacement = doc.build(
        ElementClass::TextContent,
        ElementProps::with_value("cat"),
        Vec::new(),
    );
    let correction = doc
        .correct(
            w,
            CorrectParams {
                set: Some("corrections".to_string()),
                id: Some("doc.correction.1".to_string()),
                new: Some(replacement),
                original: Some(original),
                props: ElementProps::with_class("spelling"),
                ..CorrectParams::default()
            },
        )
        .unwrap();

    // the correction takes the original's place among the word's children
    assert_eq!(doc.children(w), &[correction]);
    assert_eq!(doc.class_of(correction), ElementClass::Correction);
    assert_eq!(doc.set_of(correction), Some("corrections"));
    assert_eq!(doc.cls_of(correction), Some("spelling"));

    let containers: Vec<ElementClass> = doc
        .children(correction)
        .iter()
        .map(|&c| doc.class_of(c))
        .collect();
    assert_eq!(containers, vec![ElementClass::Original, ElementClass::New]);

    // text resolves through the authoritative new content
    assert_eq!(doc.text(w).unwrap(), "cat");
}

#[test]
fn current_wrapping_and_reuse() {
    let (mut doc, _s, w) = sample_doc();
    let t = doc.select(w, ElementClass::TextContent, None, false)[0];
    let correction = doc
        .correct(
            w,
            CorrectParams {
                set: Some("corrections".to_string()),
                id: Some("doc.correction.1".to_string()),
                current: Some(t),
                ..CorrectParams::default()
            },
        )
        .unwrap();

    assert_eq!(doc.children(w), &[correction]);
    let current = doc.children(correction)[0];
    assert_eq!(doc.class_of(current), ElementClass::Current);
    assert_eq!(doc.children(current), &[t]);
    assert_eq!(doc.text(w).unwrap(), "kat");

    // extending the same correction with a suggestion reuses it
    let suggested = doc.build(
        ElementClass::TextContent,
        ElementProps::with_value("cat"),
        Vec::new(),
    );
    let suggestion = doc.build(ElementClass::Suggestion, ElementProps::new(), vec![suggested]);
    let again = doc
        .correct(
            w,
            CorrectParams {
                reuse: Some(correction),
                current: Some(t),
                suggestions: vec![suggestion],
                ..CorrectParams::default()
            },
        )
        .unwrap();
    assert_eq!(again, correction);
    assert_eq!(doc.children(w), &[correction]);
    let classes: Vec<ElementClass> = doc
        .children(correction)
        .iter()
        .map(|&c| doc.class_of(c))
        .collect();
    assert_eq!(classes, vec![ElementClass::Current, ElementClass::Suggestion]);
    // suggestions are non-authoritative, text is unchanged
    assert_eq!(doc.text(w).unwrap(), "kat");
}

#[test]
fn correction_rejects_bad_payloads() {
    let (mut doc, _s, w) = sample_doc();
    let not_a_suggestion = doc.build(ElementClass::Word, ElementProps::new(), Vec::new());
    let result = doc.correct(
        w,
        CorrectParams {
            suggestions: vec![not_a_suggestion],
            ..CorrectParams::default()
        },
    );
    assert!(matches!(result, Err(DocumentError::InvalidCorrection(_))));

    let result = doc.correct(
        w,
        CorrectParams {
            reuse: Some(w),
            ..CorrectParams::default()
        },
    );
    assert!(matches!(result, Err(DocumentError::InvalidCorrection(_))));
}

#[test]
fn xml_rendering() {
    let (mut doc, _s, w) = sample_doc();
    let pos = doc.add(
        w,
        ElementClass::PosAnnotation,
        ElementProps::with_class("N").set("brown"),
    );
    let xml = doc.xmlstring(pos, false);
    assert_eq!(xml, "<pos set=\"brown\" class=\"N\"/>");

    let xml = doc.xmlstring(w, true);
    assert!(xml.starts_with("<w xml:id=\"doc.w.1\">"));
    assert!(xml.contains("<t>kat</t>"));
    assert!(xml.contains("<pos set=\"brown\" class=\"N\"/>"));
    assert!(xml.trim_end().ends_with("</w>"));
}

#[test]
fn xml_escaping() {
    let mut doc = Document::new("doc");
    let text = doc.add_root(ElementClass::Text, props("doc.text"));
    let w = doc.add(text, ElementClass::Word, props("doc.w.1"));
    doc.settext(w, "a<b&\"c\"");
    let xml = doc.xmlstring(w, false);
    assert!(xml.contains("a&lt;b&amp;&quot;c&quot;"));
}

#[test]
fn json_rendering() {
    let (mut doc, _s, w) = sample_doc();
    doc.add(
        w,
        ElementClass::PosAnnotation,
        ElementProps::with_class("N").set("brown"),
    );
    let value = doc.json(w);
    assert_eq!(value["type"], "w");
    assert_eq!(value["id"], "doc.w.1");
    let children = value["children"].as_array().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0]["type"], "t");
    assert_eq!(children[0]["text"], "kat");
    assert_eq!(children[1]["class"], "N");
}

#[test]
fn span_json_includes_wrefs() {
    let (mut doc, s, w) = sample_doc();
    let w2 = doc.add(s, ElementClass::Word, props("doc.w.2"));
    doc.settext(w2, "zit");
    let entity = doc
        .add_span(
            &[w, w2],
            ElementClass::Entity,
            ElementProps::with_class("x").set("ents"),
        )
        .unwrap();
    let value = doc.json(entity);
    let wrefs = value["wrefs"].as_array().unwrap();
    assert_eq!(wrefs.len(), 2);
    assert_eq!(wrefs[0], "doc.w.1");
    assert_eq!(wrefs[1], "doc.w.2");

    let xml = doc.xmlstring(entity, false);
    assert!(xml.contains("<wref id=\"doc.w.1\"/>"));
}
