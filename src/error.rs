//! Error types for the Solr client library.
//!
//! All fallible operations return [`Result<T>`], an alias for
//! `std::result::Result<T, SolrError>`.
//!
//! # Error Categories
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | [`SolrError::Input`] | A document or value could not be encoded into a request body |
//! | [`SolrError::WrongStatus`] | The server answered with a non-200 HTTP status |
//! | [`SolrError::Request`] | The HTTP exchange itself failed (connection, DNS, timeout) |
//! | [`SolrError::Response`] | The server body was not a valid Solr response |
//!
//! `WrongStatus` and `Response` are mutually exclusive for a single call: the
//! response body is only decoded when the status was 200, so a rejected status
//! never produces a decode error on top.

use thiserror::Error;

/// Convenient result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SolrError>;

/// Boxed error used at the transport seam.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error for all client operations.
#[derive(Error, Debug)]
pub enum SolrError {
    /// A value in the update input has no wire representation.
    #[error("invalid update input: {0}")]
    Input(#[from] InputError),

    /// The server answered with a status other than 200 OK.
    #[error("server answered with HTTP status {0}")]
    WrongStatus(u16),

    /// The HTTP request could not be completed at all.
    #[error("HTTP request failed: {0}")]
    Request(#[source] BoxError),

    /// The server body did not decode as a well-formed Solr response.
    #[error("invalid Solr response: {0}")]
    Response(#[from] ResponseError),
}

/// A value that cannot be rendered into a request body or query string.
///
/// The payload describes the offending value, e.g. `non-finite float NaN`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct InputError(pub String);

/// Failure while decoding a server response body.
#[derive(Error, Debug)]
pub enum ResponseError {
    /// The body was not valid JSON.
    #[error("body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level object has no `responseHeader` object.
    #[error("response does not have responseHeader")]
    MissingHeader,

    /// The `responseHeader` object has no numeric `status` entry.
    #[error("responseHeader does not have status")]
    MissingStatus,

    /// The `responseHeader.status` entry was non-zero.
    #[error("response has wrong status: {0}")]
    ErrorStatus(i64),

    /// The `response` results section is missing a required part.
    #[error("response is missing {0}")]
    MalformedResults(&'static str),
}
