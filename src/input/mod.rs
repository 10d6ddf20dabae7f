//! Request-body construction for the update handler.
//!
//! The client never builds update bodies itself; it delegates to an
//! [`UpdateFactory`]. The factory owns both the bytes and the content type,
//! so a different wire format (e.g. a JSON update format) can be swapped in
//! without touching the client. [`XmlUpdateFactory`] is the stock
//! implementation and the default.

mod xml;

pub use xml::XmlUpdateFactory;

use bytes::Bytes;

use crate::error::InputError;
use crate::types::{Document, FieldValue};

/// An encoded request body plus its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    content_type: String,
    content: Bytes,
}

impl Body {
    /// Creates a body from already-encoded content.
    pub fn new(content_type: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Body {
            content_type: content_type.into(),
            content: content.into(),
        }
    }

    /// MIME type to send as the `Content-Type` header.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The raw body bytes.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Consumes the body, returning its bytes.
    pub fn into_content(self) -> Bytes {
        self.content
    }

    /// Body length in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns `true` for a zero-length body.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// The body as UTF-8 text, if it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}

/// Options for an `<add>` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddOptions {
    /// Whether existing documents with the same unique key are replaced.
    pub overwrite: Option<bool>,
    /// Milliseconds within which the server must commit the documents.
    pub commit_within: Option<u32>,
}

impl AddOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = Some(overwrite);
        self
    }

    pub fn with_commit_within(mut self, millis: u32) -> Self {
        self.commit_within = Some(millis);
        self
    }
}

/// Options for a `<commit>` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitOptions {
    /// Block until index changes are flushed to disk.
    pub wait_flush: Option<bool>,
    /// Block until a new searcher is opened on the committed index.
    pub wait_searcher: Option<bool>,
    /// Merge away segments that only contain deleted documents.
    pub expunge_deletes: Option<bool>,
}

impl CommitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wait_flush(mut self, wait: bool) -> Self {
        self.wait_flush = Some(wait);
        self
    }

    pub fn with_wait_searcher(mut self, wait: bool) -> Self {
        self.wait_searcher = Some(wait);
        self
    }

    pub fn with_expunge_deletes(mut self, expunge: bool) -> Self {
        self.expunge_deletes = Some(expunge);
        self
    }
}

/// Options for an `<optimize>` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizeOptions {
    /// Block until index changes are flushed to disk.
    pub wait_flush: Option<bool>,
    /// Block until a new searcher is opened on the optimized index.
    pub wait_searcher: Option<bool>,
    /// Merge down to at most this many segments.
    pub max_segments: Option<u32>,
}

impl OptimizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wait_flush(mut self, wait: bool) -> Self {
        self.wait_flush = Some(wait);
        self
    }

    pub fn with_wait_searcher(mut self, wait: bool) -> Self {
        self.wait_searcher = Some(wait);
        self
    }

    pub fn with_max_segments(mut self, segments: u32) -> Self {
        self.max_segments = Some(segments);
        self
    }
}

/// Builds wire bodies for the update handler.
///
/// Every method returns the finished [`Body`] for one update command, or
/// [`InputError`] when a value in the input has no wire representation.
/// Implementations must be deterministic: field and id order in the body
/// follows input order.
pub trait UpdateFactory: Send + Sync {
    /// MIME type of the bodies this factory produces.
    fn content_type(&self) -> &str;

    /// Body adding `documents` to the index.
    fn add(&self, documents: &[Document], options: &AddOptions) -> Result<Body, InputError>;

    /// Body deleting documents by unique key.
    fn delete(&self, ids: &[FieldValue]) -> Result<Body, InputError>;

    /// Body deleting every document matching a query.
    fn delete_by_query(&self, query: &str) -> Result<Body, InputError>;

    /// Body committing pending changes.
    fn commit(&self, options: &CommitOptions) -> Result<Body, InputError>;

    /// Body rolling back uncommitted changes.
    fn rollback(&self) -> Result<Body, InputError>;

    /// Body merging index segments.
    fn optimize(&self, options: &OptimizeOptions) -> Result<Body, InputError>;
}
