//! # Serialisation
//!
//! XML and JSON renderings of document elements.

use serde_json::{Map, Value, json};

use crate::document::{Document, NodeId};
use crate::element::ElementClass;

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl Document {
    fn xml_attributes(&self, node: NodeId) -> String {
        let data = self.node(node);
        let mut out = String::new();
        if let Some(id) = &data.id {
            out.push_str(&format!(" xml:id=\"{}\"", escape_xml(id)));
        }
        if let Some(set) = &data.set {
            out.push_str(&format!(" set=\"{}\"", escape_xml(set)));
        }
        if let Some(cls) = &data.cls {
            out.push_str(&format!(" class=\"{}\"", escape_xml(cls)));
        }
        if let Some(annotator) = &data.annotator {
            out.push_str(&format!(" annotator=\"{}\"", escape_xml(annotator)));
        }
        if let Some(annotatortype) = data.annotatortype {
            out.push_str(&format!(" annotatortype=\"{}\"", annotatortype.as_str()));
        }
        if let Some(confidence) = data.confidence {
            out.push_str(&format!(" confidence=\"{}\"", confidence));
        }
        if let Some(n) = &data.n {
            out.push_str(&format!(" n=\"{}\"", escape_xml(n)));
        }
        out
    }

    fn xml_into(&self, node: NodeId, pretty: bool, depth: usize, out: &mut String) {
        let data = self.node(node);
        let indent = if pretty { "  ".repeat(depth) } else { String::new() };
        let newline = if pretty { "\n" } else { "" };
        let tag = data.class.xmltag();

        if data.class == ElementClass::TextContent {
            let value = data.value.as_deref().unwrap_or("");
            out.push_str(&format!(
                "{}<{}{}>{}</{}>{}",
                indent,
                tag,
                self.xml_attributes(node),
                escape_xml(value),
                tag,
                newline
            ));
            return;
        }

        if data.children.is_empty() && data.wrefs.is_empty() {
            out.push_str(&format!(
                "{}<{}{}/>{}",
                indent,
                tag,
                self.xml_attributes(node),
                newline
            ));
            return;
        }

        out.push_str(&format!(
            "{}<{}{}>{}",
            indent,
            tag,
            self.xml_attributes(node),
            newline
        ));
        for &wref in &data.wrefs {
            let id = self.node(wref).id.as_deref().unwrap_or("");
            out.push_str(&format!(
                "{}<wref id=\"{}\"/>{}",
                if pretty { "  ".repeat(depth + 1) } else { String::new() },
                escape_xml(id),
                newline
            ));
        }
        for &child in &data.children {
            self.xml_into(child, pretty, depth + 1, out);
        }
        out.push_str(&format!("{}</{}>{}", indent, tag, newline));
    }

    /// Renders an element subtree as an XML string.
    ///
    /// ## Arguments
    ///
    /// * `node` - The element to render.
    /// * `pretty` - Whether to indent and add newlines.
    ///
    /// ## Returns
    ///
    /// Returns the XML rendering of the subtree.
    pub fn xmlstring(&self, node: NodeId, pretty: bool) -> String {
        let mut out = String::new();
        self.xml_into(node, pretty, 0, &mut out);
        if pretty {
            out.truncate(out.trim_end().len());
        }
        out
    }

    /// Renders an element subtree as a JSON value.
    ///
    /// Unset attributes are omitted; children and word references are
    /// rendered recursively.
    pub fn json(&self, node: NodeId) -> Value {
        let data = self.node(node);
        let mut map = Map::new();
        map.insert("type".to_string(), json!(data.class.xmltag()));
        if let Some(id) = &data.id {
            map.insert("id".to_string(), json!(id));
        }
        if let Some(set) = &data.set {
            map.insert("set".to_string(), json!(set));
        }
        if let Some(cls) = &data.cls {
            map.insert("class".to_string(), json!(cls));
        }
        if let Some(annotator) = &data.annotator {
            map.insert("annotator".to_string(), json!(annotator));
        }
        if let Some(annotatortype) = data.annotatortype {
            map.insert("annotatortype".to_string(), json!(annotatortype.as_str()));
        }
        if let Some(confidence) = data.confidence {
            map.insert("confidence".to_string(), json!(confidence));
        }
        if let Some(n) = &data.n {
            map.insert("n".to_string(), json!(n));
        }
        if data.class == ElementClass::TextContent {
            map.insert(
                "text".to_string(),
                json!(data.value.as_deref().unwrap_or("")),
            );
        }
        if !data.wrefs.is_empty() {
            let ids: Vec<Value> = data
                .wrefs
                .iter()
                .map(|&w| json!(self.node(w).id.as_deref().unwrap_or("")))
                .collect();
            map.insert("wrefs".to_string(), Value::Array(ids));
        }
        if !data.children.is_empty() {
            let children: Vec<Value> =
                data.children.iter().map(|&c| self.json(c)).collect();
            map.insert("children".to_string(), Value::Array(children));
        }
        Value::Object(map)
    }
}
