//! The stock XML update factory.
//!
//! Bodies follow the classic Solr XML update message format, sent as
//! `text/xml`:
//!
//! ```text
//! <add><doc><field name="id">1</field></doc></add>
//! <delete><id>1</id><id>2</id></delete>
//! <delete><query>name:hello</query></delete>
//! <commit waitSearcher="true"/>
//! <rollback/>
//! <optimize maxSegments="2"/>
//! ```
//!
//! XML metacharacters in field names, values, ids and queries are escaped;
//! attribute emission order is fixed so bodies are byte-deterministic.

use super::{AddOptions, Body, CommitOptions, OptimizeOptions, UpdateFactory};
use crate::error::InputError;
use crate::types::{Document, FieldValue};

const CONTENT_TYPE: &str = "text/xml";

/// [`UpdateFactory`] emitting the Solr XML update message format.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlUpdateFactory;

impl XmlUpdateFactory {
    pub fn new() -> Self {
        XmlUpdateFactory
    }

    fn body(&self, content: String) -> Body {
        Body::new(CONTENT_TYPE, content)
    }
}

impl UpdateFactory for XmlUpdateFactory {
    fn content_type(&self) -> &str {
        CONTENT_TYPE
    }

    fn add(&self, documents: &[Document], options: &AddOptions) -> Result<Body, InputError> {
        let mut out = String::from("<add");
        if let Some(overwrite) = options.overwrite {
            push_attr(&mut out, "overwrite", bool_text(overwrite));
        }
        if let Some(millis) = options.commit_within {
            push_attr(&mut out, "commitWithin", &millis.to_string());
        }
        out.push('>');
        for document in documents {
            out.push_str("<doc>");
            for (name, values) in document.iter() {
                for value in values {
                    let Some(text) = value.render()? else {
                        continue;
                    };
                    out.push_str("<field name=\"");
                    push_attr_text(&mut out, name);
                    out.push_str("\">");
                    push_text(&mut out, &text);
                    out.push_str("</field>");
                }
            }
            out.push_str("</doc>");
        }
        out.push_str("</add>");
        Ok(self.body(out))
    }

    fn delete(&self, ids: &[FieldValue]) -> Result<Body, InputError> {
        let mut out = String::from("<delete>");
        for id in ids {
            let Some(text) = id.render()? else {
                continue;
            };
            out.push_str("<id>");
            push_text(&mut out, &text);
            out.push_str("</id>");
        }
        out.push_str("</delete>");
        Ok(self.body(out))
    }

    fn delete_by_query(&self, query: &str) -> Result<Body, InputError> {
        let mut out = String::from("<delete><query>");
        push_text(&mut out, query);
        out.push_str("</query></delete>");
        Ok(self.body(out))
    }

    fn commit(&self, options: &CommitOptions) -> Result<Body, InputError> {
        let mut out = String::from("<commit");
        if let Some(wait) = options.wait_flush {
            push_attr(&mut out, "waitFlush", bool_text(wait));
        }
        if let Some(wait) = options.wait_searcher {
            push_attr(&mut out, "waitSearcher", bool_text(wait));
        }
        if let Some(expunge) = options.expunge_deletes {
            push_attr(&mut out, "expungeDeletes", bool_text(expunge));
        }
        out.push_str("/>");
        Ok(self.body(out))
    }

    fn rollback(&self) -> Result<Body, InputError> {
        Ok(self.body("<rollback/>".to_string()))
    }

    fn optimize(&self, options: &OptimizeOptions) -> Result<Body, InputError> {
        let mut out = String::from("<optimize");
        if let Some(wait) = options.wait_flush {
            push_attr(&mut out, "waitFlush", bool_text(wait));
        }
        if let Some(wait) = options.wait_searcher {
            push_attr(&mut out, "waitSearcher", bool_text(wait));
        }
        if let Some(segments) = options.max_segments {
            push_attr(&mut out, "maxSegments", &segments.to_string());
        }
        out.push_str("/>");
        Ok(self.body(out))
    }
}

fn bool_text(flag: bool) -> &'static str {
    if flag {
        "true"
    } else {
        "false"
    }
}

/// Appends ` name="value"` with the value attribute-escaped.
fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    push_attr_text(out, value);
    out.push('"');
}

/// Appends text escaped for element content.
fn push_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Appends text escaped for a double-quoted attribute value.
fn push_attr_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
