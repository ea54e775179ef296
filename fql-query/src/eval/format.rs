//! # Response Formatting
//!
//! Renders the response selection per the query's FORMAT clause.

use log::debug;

use fql_core::prelude::NodeId;

use crate::ast::Query;
use crate::error::EvalError;
use crate::eval::{Evaluator, QueryResult};

impl Evaluator<'_> {
    /// Formats the response selection.
    ///
    /// `single-*` formats require at most one result and render the bare
    /// element (with the empty string / `null` / [`None`] as the empty
    /// sentinel); plural formats wrap results in `<results>`/`<result>`
    /// or a JSON list.
    pub(crate) fn format_response(
        &self,
        query: &Query,
        response: Vec<NodeId>,
    ) -> Result<QueryResult, EvalError> {
        let format = query.format.as_deref().unwrap_or(&self.ctx.format);
        debug!("returning {} results as {}", response.len(), format);

        if format.starts_with("single") {
            if response.len() > 1 {
                return Err(EvalError::Query(
                    "a single response was expected, but multiple are returned".to_string(),
                ));
            }
            return match format {
                "single-python" => Ok(QueryResult::Element(response.first().copied())),
                "single-xml" => Ok(QueryResult::Serialised(match response.first() {
                    Some(&element) => self.doc.xmlstring(element, true),
                    None => String::new(),
                })),
                "single-json" => Ok(QueryResult::Serialised(match response.first() {
                    Some(&element) => self.doc.json(element).to_string(),
                    None => "null".to_string(),
                })),
                other => Err(EvalError::Query(format!("invalid format: {}", other))),
            };
        }

        match format {
            "python" => Ok(QueryResult::Elements(response)),
            "xml" => {
                if response.is_empty() {
                    return Ok(QueryResult::Serialised("<results></results>".to_string()));
                }
                let mut out = String::from("<results>\n");
                for &element in &response {
                    out.push_str("<result>\n");
                    out.push_str(&self.doc.xmlstring(element, true));
                    out.push_str("\n</result>\n");
                }
                out.push_str("</results>\n");
                Ok(QueryResult::Serialised(out))
            }
            "json" => {
                let values: Vec<serde_json::Value> =
                    response.iter().map(|&element| self.doc.json(element)).collect();
                Ok(QueryResult::Serialised(
                    serde_json::Value::Array(values).to_string(),
                ))
            }
            other => Err(EvalError::Query(format!("invalid format: {}", other))),
        }
    }
}
