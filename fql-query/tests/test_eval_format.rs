use fql_core::prelude::*;
use fql_query::prelude::*;

fn props(id: &str) -> ElementProps {
    ElementProps::new().id(id)
}

fn sample_doc() -> (Document, Vec<NodeId>) {
    let mut doc = Document::new("doc");
    let text = doc.add_root(ElementClass::Text, props("doc.text"));
    let s = doc.add(text, ElementClass::Sentence, props("doc.s.1"));
    let mut words = Vec::new();
    for (i, t) in ["the", "cat"].iter().enumerate() {
        let w = doc.add(s, ElementClass::Word, props(&format!("doc.w.{}", i + 1)));
        doc.settext(w, *t);
        words.push(w);
    }
    (doc, words)
}

fn run(doc: &mut Document, query: &str) -> Result<QueryResult, EvalError> {
    parse_query(query).unwrap().run(doc, &QueryContext::default())
}

#[test]
fn xml_format_wraps_results() {
    let (mut doc, _words) = sample_doc();
    let result = run(&mut doc, "SELECT w WHERE text = \"cat\" FORMAT xml").unwrap();
    match result {
        QueryResult::Serialised(xml) => {
            assert!(xml.starts_with("<results>\n<result>\n"));
            assert!(xml.contains("<w xml:id=\"doc.w.2\">"));
            assert!(xml.contains("<t>cat</t>"));
            assert!(xml.ends_with("</results>\n"));
        }
        other => panic!("expected serialised output, got {:?}", other),
    }
}

#[test]
fn empty_xml_results() {
    let (mut doc, _words) = sample_doc();
    let result = run(&mut doc, "SELECT w WHERE text = \"dog\" FORMAT xml").unwrap();
    assert_eq!(
        result,
        QueryResult::Serialised("<results></results>".to_string())
    );
}

#[test]
fn json_format_is_a_list() {
    let (mut doc, _words) = sample_doc();
    let result = run(&mut doc, "SELECT w FORMAT json").unwrap();
    match result {
        QueryResult::Serialised(json) => {
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            let list = value.as_array().unwrap();
            assert_eq!(list.len(), 2);
            assert_eq!(list[0]["type"], "w");
            assert_eq!(list[0]["id"], "doc.w.1");
        }
        other => panic!("expected serialised output, got {:?}", other),
    }
}

#[test]
fn single_formats_require_at_most_one_result() {
    let (mut doc, words) = sample_doc();
    let result = run(&mut doc, "SELECT w WHERE text = \"cat\" FORMAT single-python").unwrap();
    assert_eq!(result, QueryResult::Element(Some(words[1])));

    let result = run(&mut doc, "SELECT w WHERE text = \"dog\" FORMAT single-python").unwrap();
    assert_eq!(result, QueryResult::Element(None));

    assert!(matches!(
        run(&mut doc, "SELECT w FORMAT single-python"),
        Err(EvalError::Query(_))
    ));
}

#[test]
fn single_serialised_sentinels() {
    let (mut doc, _words) = sample_doc();
    let result = run(&mut doc, "SELECT w WHERE text = \"dog\" FORMAT single-xml").unwrap();
    assert_eq!(result, QueryResult::Serialised(String::new()));
    let result = run(&mut doc, "SELECT w WHERE text = \"dog\" FORMAT single-json").unwrap();
    assert_eq!(result, QueryResult::Serialised("null".to_string()));

    let result = run(&mut doc, "SELECT w WHERE text = \"cat\" FORMAT single-json").unwrap();
    match result {
        QueryResult::Serialised(json) => {
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value["type"], "w");
        }
        other => panic!("expected serialised output, got {:?}", other),
    }
}

#[test]
fn invalid_format_and_return_type() {
    let (mut doc, _words) = sample_doc();
    assert!(matches!(
        run(&mut doc, "SELECT w FORMAT yaml"),
        Err(EvalError::Query(_))
    ));
    assert!(matches!(
        run(&mut doc, "SELECT w FORMAT single-yaml"),
        Err(EvalError::Query(_))
    ));
    assert!(matches!(
        run(&mut doc, "SELECT w RETURN bogus"),
        Err(EvalError::Query(_))
    ));
    assert!(matches!(
        run(&mut doc, "SELECT w RETURN outer-target"),
        Err(EvalError::NotImplemented(_))
    ));
    assert!(matches!(
        run(&mut doc, "SELECT w RETURN ancestor-target"),
        Err(EvalError::NotImplemented(_))
    ));
}

#[test]
fn context_defaults_apply_without_trailers() {
    let (mut doc, words) = sample_doc();
    let context = QueryContext {
        format: "single-python".to_string(),
        ..QueryContext::default()
    };
    let result = parse_query("SELECT w WHERE text = \"the\"")
        .unwrap()
        .run(&mut doc, &context)
        .unwrap();
    assert_eq!(result, QueryResult::Element(Some(words[0])));

    // a FORMAT trailer overrides the context
    let result = parse_query("SELECT w WHERE text = \"the\" FORMAT python")
        .unwrap()
        .run(&mut doc, &context)
        .unwrap();
    assert_eq!(result, QueryResult::Elements(vec![words[0]]));
}

#[test]
fn context_default_sets_are_adopted() {
    let (mut doc, words) = sample_doc();
    let brown = doc.add(
        words[0],
        ElementClass::PosAnnotation,
        ElementProps::with_class("D").set("brown"),
    );
    doc.add(
        words[0],
        ElementClass::PosAnnotation,
        ElementProps::with_class("LID").set("cgn"),
    );
    let mut context = QueryContext::default();
    context
        .default_sets
        .insert("pos".to_string(), "brown".to_string());
    let result = parse_query("SELECT pos FOR w")
        .unwrap()
        .run(&mut doc, &context)
        .unwrap();
    assert_eq!(result, QueryResult::Elements(vec![brown]));
}

#[test]
fn declarations_run_and_queries_may_be_declaration_only() {
    let (mut doc, _words) = sample_doc();
    let result = run(&mut doc, "DECLARE pos OF \"brown\"").unwrap();
    assert_eq!(result, QueryResult::Elements(vec![]));
    assert!(doc.declared(AnnotationType::Pos, Some("brown")));
    // declaring again is equivalent to declaring once
    run(&mut doc, "DECLARE pos OF \"brown\"").unwrap();
    assert_eq!(doc.defaultset(AnnotationType::Pos), Some("brown".to_string()));
}
