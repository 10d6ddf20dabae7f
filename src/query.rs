//! Query-string construction and query-language escaping.
//!
//! [`QueryParams`] is an ordered parameter list for the `/select` handler.
//! Encoding applies three fixed rules:
//!
//! - underscores in parameter names become dots (`hl_fl` → `hl.fl`), so
//!   nested Solr names can be written as plain identifiers
//! - any caller-supplied `wt` is dropped and `wt=json` is appended last;
//!   the decoder only speaks JSON
//! - null values are suppressed like everywhere else
//!
//! The free function [`escape`] quotes the query-language metacharacters in a
//! literal term. Nothing escapes automatically: `q` is sent exactly as given,
//! so callers escape user-entered terms themselves where they need to.

use std::borrow::Cow;

use url::form_urlencoded;

use crate::error::InputError;
use crate::types::FieldValue;

/// Characters with meaning in the Solr query language.
const RESERVED: &str = "\\+-&|!(){}[]^\"~*?:";

/// Escapes query-language metacharacters in a literal term.
///
/// Each reserved character is prefixed with a backslash; everything else
/// passes through untouched. Not idempotent: the backslashes it inserts are
/// themselves reserved, so escaping twice escapes them again.
///
/// ```
/// use solr_rs::escape;
///
/// assert_eq!(escape("(1+1):2"), "\\(1\\+1\\)\\:2");
/// ```
pub fn escape(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if RESERVED.contains(ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Ordered parameters for a `/select` request.
///
/// ```
/// use solr_rs::QueryParams;
///
/// let params = QueryParams::new()
///     .param("q", "iamafish")
///     .param("fl", "id,name")
///     .param("hl_fl", "name");
/// assert_eq!(params.encode().unwrap(), "q=iamafish&fl=id%2Cname&hl.fl=name&wt=json");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    params: Vec<(String, FieldValue)>,
}

impl QueryParams {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn param(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a parameter, replacing an existing one of the same name in place
    /// or appending at the end.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
    }

    /// Returns the current value of a parameter, if set.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Number of parameters set.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` when no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Encodes the parameters as an `application/x-www-form-urlencoded`
    /// string, ending in `wt=json`.
    pub fn encode(&self) -> Result<String, InputError> {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.params {
            let name = remap_name(name);
            if name == "wt" {
                continue;
            }
            let Some(text) = value.render()? else {
                continue;
            };
            serializer.append_pair(&name, &text);
        }
        serializer.append_pair("wt", "json");
        Ok(serializer.finish())
    }
}

/// Maps underscores in a parameter name to dots.
fn remap_name(name: &str) -> Cow<'_, str> {
    if name.contains('_') {
        Cow::Owned(name.replace('_', "."))
    } else {
        Cow::Borrowed(name)
    }
}
