//! Decoded Solr responses.
//!
//! Every handler is asked for JSON (`wt=json`), so one decoder covers update
//! acknowledgements, query results and pings. [`SolrResponse::parse`]
//! validates the envelope in a fixed order:
//!
//! 1. the body must be valid JSON
//! 2. the top level must be an object holding a `responseHeader` object
//! 3. the header must hold a numeric `status`
//! 4. the status must be `0`
//! 5. a `response` section, when present, must be well-formed results
//!
//! Anything else at the top level (`facet_counts`, `highlighting`, ...) is
//! kept verbatim in a named-section map.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::error::ResponseError;

/// JSON object type used for headers and result documents.
pub type JsonObject = Map<String, Value>;

/// The `response` results section of a query answer.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResults {
    /// Total number of matching documents in the index.
    pub num_found: u64,
    /// Offset of the first returned document.
    pub start: u64,
    /// The returned documents, each a JSON object.
    pub docs: Vec<JsonObject>,
}

/// A validated response from any Solr handler.
#[derive(Debug, Clone, PartialEq)]
pub struct SolrResponse {
    raw: Bytes,
    header: JsonObject,
    results: Option<QueryResults>,
    sections: BTreeMap<String, Value>,
}

impl SolrResponse {
    /// Decodes and validates a complete response body.
    pub fn parse(raw: impl Into<Bytes>) -> Result<SolrResponse, ResponseError> {
        let raw = raw.into();
        let value: Value = serde_json::from_slice(&raw)?;
        let root = value.as_object().ok_or(ResponseError::MissingHeader)?;

        let header = root
            .get("responseHeader")
            .and_then(Value::as_object)
            .ok_or(ResponseError::MissingHeader)?;
        let status = header
            .get("status")
            .and_then(Value::as_i64)
            .ok_or(ResponseError::MissingStatus)?;
        if status != 0 {
            return Err(ResponseError::ErrorStatus(status));
        }

        let results = match root.get("response") {
            Some(section) => Some(extract_results(section)?),
            None => None,
        };

        let mut sections = BTreeMap::new();
        for (key, section) in root {
            if key == "responseHeader" || key == "response" {
                continue;
            }
            sections.insert(key.clone(), section.clone());
        }

        Ok(SolrResponse {
            header: header.clone(),
            results,
            sections,
            raw,
        })
    }

    /// The `responseHeader` object.
    pub fn header(&self) -> &JsonObject {
        &self.header
    }

    /// Server-side processing time in milliseconds, when reported.
    pub fn qtime(&self) -> Option<u64> {
        self.header.get("QTime").and_then(Value::as_u64)
    }

    /// The query results, absent on update acknowledgements and pings.
    pub fn results(&self) -> Option<&QueryResults> {
        self.results.as_ref()
    }

    /// A named top-level section such as `facet_counts` or `highlighting`.
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.sections.get(name)
    }

    /// All top-level sections other than the header and results.
    pub fn sections(&self) -> &BTreeMap<String, Value> {
        &self.sections
    }

    /// The undecoded body bytes.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }
}

impl fmt::Display for SolrResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.raw))
    }
}

fn extract_results(section: &Value) -> Result<QueryResults, ResponseError> {
    let results = section
        .as_object()
        .ok_or(ResponseError::MalformedResults("response"))?;
    let num_found = results
        .get("numFound")
        .and_then(Value::as_u64)
        .ok_or(ResponseError::MalformedResults("numFound"))?;
    let start = results
        .get("start")
        .and_then(Value::as_u64)
        .ok_or(ResponseError::MalformedResults("start"))?;
    let raw_docs = results
        .get("docs")
        .and_then(Value::as_array)
        .ok_or(ResponseError::MalformedResults("docs"))?;

    let mut docs = Vec::with_capacity(raw_docs.len());
    for doc in raw_docs {
        let doc = doc
            .as_object()
            .ok_or(ResponseError::MalformedResults("docs"))?;
        docs.push(doc.clone());
    }

    Ok(QueryResults {
        num_found,
        start,
        docs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const QUERY_BODY: &str = r#"{
        "responseHeader": {"status": 0, "QTime": 2, "params": {"q": "cat"}},
        "response": {
            "numFound": 2,
            "start": 0,
            "docs": [
                {"id": "1", "name": "grissom"},
                {"id": "2", "name": "sara"}
            ]
        }
    }"#;

    #[test]
    fn test_parse_query_response() {
        let response = SolrResponse::parse(QUERY_BODY).unwrap();
        assert_eq!(response.qtime(), Some(2));
        assert_eq!(response.header().get("status"), Some(&json!(0)));

        let results = response.results().unwrap();
        assert_eq!(results.num_found, 2);
        assert_eq!(results.start, 0);
        assert_eq!(results.docs.len(), 2);
        assert_eq!(results.docs[0].get("name"), Some(&json!("grissom")));
    }

    #[test]
    fn test_parse_update_acknowledgement() {
        let response = SolrResponse::parse(r#"{"responseHeader":{"status":0,"QTime":10}}"#).unwrap();
        assert!(response.results().is_none());
        assert!(response.sections().is_empty());
        assert_eq!(response.qtime(), Some(10));
    }

    #[test]
    fn test_parse_keeps_extra_sections() {
        let body = r#"{
            "responseHeader": {"status": 0, "QTime": 1},
            "response": {"numFound": 0, "start": 0, "docs": []},
            "facet_counts": {"facet_fields": {"cat": ["a", 3]}},
            "highlighting": {}
        }"#;
        let response = SolrResponse::parse(body).unwrap();
        assert_eq!(response.sections().len(), 2);
        assert_eq!(
            response.section("facet_counts").unwrap()["facet_fields"]["cat"][1],
            json!(3)
        );
        assert!(response.section("highlighting").is_some());
        assert!(response.section("responseHeader").is_none());
        assert!(response.section("response").is_none());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = SolrResponse::parse("<response/>").unwrap_err();
        assert!(matches!(err, ResponseError::Json(_)));
    }

    #[test]
    fn test_parse_rejects_missing_header() {
        let err = SolrResponse::parse(r#"{"response": {}}"#).unwrap_err();
        assert!(matches!(err, ResponseError::MissingHeader));

        // A non-object top level has no header either.
        let err = SolrResponse::parse("5").unwrap_err();
        assert!(matches!(err, ResponseError::MissingHeader));
    }

    #[test]
    fn test_parse_rejects_missing_status() {
        let err = SolrResponse::parse(r#"{"responseHeader": {"QTime": 2}}"#).unwrap_err();
        assert!(matches!(err, ResponseError::MissingStatus));
    }

    #[test]
    fn test_parse_rejects_error_status() {
        let err = SolrResponse::parse(r#"{"responseHeader": {"status": 400}}"#).unwrap_err();
        assert!(matches!(err, ResponseError::ErrorStatus(400)));
    }

    #[test]
    fn test_error_status_wins_over_well_formed_results() {
        let body = r#"{
            "responseHeader": {"status": 1, "QTime": 2},
            "response": {"numFound": 1, "start": 0, "docs": [{"id": "1"}]}
        }"#;
        let err = SolrResponse::parse(body).unwrap_err();
        assert!(matches!(err, ResponseError::ErrorStatus(1)));
    }

    #[test]
    fn test_parse_rejects_malformed_results() {
        let body = r#"{"responseHeader": {"status": 0}, "response": 5}"#;
        let err = SolrResponse::parse(body).unwrap_err();
        assert!(matches!(err, ResponseError::MalformedResults("response")));

        let body = r#"{"responseHeader": {"status": 0}, "response": {"start": 0, "docs": []}}"#;
        let err = SolrResponse::parse(body).unwrap_err();
        assert!(matches!(err, ResponseError::MalformedResults("numFound")));

        let body = r#"{"responseHeader": {"status": 0}, "response": {"numFound": 0, "docs": []}}"#;
        let err = SolrResponse::parse(body).unwrap_err();
        assert!(matches!(err, ResponseError::MalformedResults("start")));

        let body = r#"{"responseHeader": {"status": 0}, "response": {"numFound": 0, "start": 0}}"#;
        let err = SolrResponse::parse(body).unwrap_err();
        assert!(matches!(err, ResponseError::MalformedResults("docs")));

        let body =
            r#"{"responseHeader": {"status": 0}, "response": {"numFound": 1, "start": 0, "docs": [5]}}"#;
        let err = SolrResponse::parse(body).unwrap_err();
        assert!(matches!(err, ResponseError::MalformedResults("docs")));
    }

    #[test]
    fn test_display_echoes_raw_body() {
        let body = r#"{"responseHeader":{"status":0}}"#;
        let response = SolrResponse::parse(body).unwrap();
        assert_eq!(response.to_string(), body);
        assert_eq!(response.raw(), body.as_bytes());
    }
}
