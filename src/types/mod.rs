//! Core data types for the Solr client.

mod document;
mod response;

pub use bytes::Bytes;
pub use document::{Document, FieldValue};
pub use response::{JsonObject, QueryResults, SolrResponse};
