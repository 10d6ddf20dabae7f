//! Documents and field values sent to the index.
//!
//! A [`Document`] is an ordered collection of named fields. Each field holds
//! one or more [`FieldValue`]s; a repeated field name is how Solr represents
//! multi-valued fields on the wire.
//!
//! # Value Rendering
//!
//! Every scalar renders to text by one fixed rule, applied identically in
//! update bodies and query strings:
//!
//! | Value | Wire text |
//! |-------|-----------|
//! | `Str` | the string itself |
//! | `Int` | decimal digits |
//! | `Float` | shortest decimal form; non-finite values are rejected |
//! | `Bool` | `true` / `false` |
//! | `DateTime` | `%Y-%m-%dT%H:%M:%SZ`, UTC, sub-second part dropped |
//! | `Date` | midnight UTC, `%Y-%m-%dT00:00:00Z` |
//! | `Null` | nothing; the value is suppressed entirely |
//!
//! # Examples
//!
//! ```
//! use solr_rs::{Document, FieldValue};
//!
//! let doc = Document::new()
//!     .field("id", 1)
//!     .field("title", "getting started")
//!     .fields("tags", ["solr", "search"])
//!     .field("draft", FieldValue::Null);
//! assert_eq!(doc.len(), 4);
//! ```

use crate::error::InputError;
use chrono::{DateTime, NaiveDate, Utc};

/// Wire format for timestamps. The sub-second part is always dropped.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Wire format for calendar dates, pinned to midnight UTC.
const DATE_FORMAT: &str = "%Y-%m-%dT00:00:00Z";

/// A single typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    /// Absent value. Null fields are never emitted on the wire.
    Null,
}

impl FieldValue {
    /// Returns `true` for [`FieldValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Renders the value into its wire text.
    ///
    /// `Ok(None)` means the value is null and must be suppressed by the
    /// caller. Non-finite floats have no Solr representation and fail with
    /// [`InputError`].
    pub fn render(&self) -> Result<Option<String>, InputError> {
        match self {
            FieldValue::Str(s) => Ok(Some(s.clone())),
            FieldValue::Int(i) => Ok(Some(i.to_string())),
            FieldValue::Float(f) if !f.is_finite() => {
                Err(InputError(format!("non-finite float {f}")))
            }
            FieldValue::Float(f) => Ok(Some(f.to_string())),
            FieldValue::Bool(b) => Ok(Some(if *b { "true" } else { "false" }.to_string())),
            FieldValue::DateTime(dt) => Ok(Some(dt.format(DATETIME_FORMAT).to_string())),
            FieldValue::Date(d) => Ok(Some(d.format(DATE_FORMAT).to_string())),
            FieldValue::Null => Ok(None),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => FieldValue::Null,
        }
    }
}

/// A document to be indexed.
///
/// Fields keep their insertion order, and adding the same name twice keeps
/// both entries, which Solr reads as a multi-valued field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: Vec<(String, Vec<FieldValue>)>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single-valued field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.entries.push((name.into(), vec![value.into()]));
        self
    }

    /// Appends a multi-valued field.
    pub fn fields<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        self.entries
            .push((name.into(), values.into_iter().map(Into::into).collect()));
        self
    }

    /// Number of field entries (multi-valued fields count once).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldValue])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    // ========== Rendering Tests ==========

    #[test]
    fn test_render_scalars() {
        assert_eq!(
            FieldValue::from("hello").render().unwrap(),
            Some("hello".to_string())
        );
        assert_eq!(FieldValue::from(12).render().unwrap(), Some("12".to_string()));
        assert_eq!(
            FieldValue::from(-3i64).render().unwrap(),
            Some("-3".to_string())
        );
        assert_eq!(
            FieldValue::from(1.5).render().unwrap(),
            Some("1.5".to_string())
        );
        assert_eq!(
            FieldValue::from(true).render().unwrap(),
            Some("true".to_string())
        );
        assert_eq!(
            FieldValue::from(false).render().unwrap(),
            Some("false".to_string())
        );
    }

    #[test]
    fn test_render_datetime_drops_subseconds() {
        let dt = Utc
            .with_ymd_and_hms(2010, 1, 1, 23, 59, 59)
            .unwrap()
            .with_nanosecond(999_000)
            .unwrap();
        assert_eq!(
            FieldValue::from(dt).render().unwrap(),
            Some("2010-01-01T23:59:59Z".to_string())
        );
    }

    #[test]
    fn test_render_date_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2011, 12, 31).unwrap();
        assert_eq!(
            FieldValue::from(date).render().unwrap(),
            Some("2011-12-31T00:00:00Z".to_string())
        );
    }

    #[test]
    fn test_render_null_is_suppressed() {
        assert_eq!(FieldValue::Null.render().unwrap(), None);
        assert!(FieldValue::Null.is_null());
    }

    #[test]
    fn test_render_rejects_non_finite_floats() {
        assert!(FieldValue::Float(f64::NAN).render().is_err());
        assert!(FieldValue::Float(f64::INFINITY).render().is_err());
        assert!(FieldValue::Float(f64::NEG_INFINITY).render().is_err());
    }

    #[test]
    fn test_from_option() {
        assert_eq!(FieldValue::from(Some(7)), FieldValue::Int(7));
        assert_eq!(FieldValue::from(None::<i32>), FieldValue::Null);
    }

    // ========== Document Tests ==========

    #[test]
    fn test_document_keeps_insertion_order() {
        let doc = Document::new()
            .field("text", "hello")
            .field("id", 1)
            .fields("tags", ["a", "b"]);

        let names: Vec<&str> = doc.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["text", "id", "tags"]);
    }

    #[test]
    fn test_document_scalar_wraps_single_value() {
        let doc = Document::new().field("id", 1);
        let (_, values) = doc.iter().next().unwrap();
        assert_eq!(values, [FieldValue::Int(1)]);
    }

    #[test]
    fn test_document_repeated_name_keeps_both() {
        let doc = Document::new().field("tag", "a").field("tag", "b");
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
    }
}
