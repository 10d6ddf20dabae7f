//! Asynchronous client library for the Apache Solr search server.
//!
//! The client speaks plain Solr HTTP: update commands are encoded as XML
//! update messages and POSTed to `/update`, queries hit `/select`, and every
//! handler answers JSON, decoded into [`SolrResponse`].
//!
//! # Quick Start
//!
//! ```no_run
//! use solr_rs::{Document, QueryParams, SolrClient};
//!
//! # async fn run() -> solr_rs::Result<()> {
//! let client = SolrClient::new("http://localhost:8983/solr");
//!
//! // Index and commit.
//! client
//!     .add([Document::new().field("id", 1).field("name", "grissom")])
//!     .await?;
//! client.commit().await?;
//!
//! // Query back, with extra select parameters.
//! let response = client
//!     .search_with("name:grissom", QueryParams::new().param("fl", "id,name"))
//!     .await?;
//! for doc in &response.results().unwrap().docs {
//!     println!("{doc:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Design Notes
//!
//! - Update bodies come from an [`UpdateFactory`]; [`XmlUpdateFactory`] is
//!   the default and a JSON factory can be dropped in without touching the
//!   client.
//! - The network sits behind [`HttpTransport`], so tests script exchanges
//!   without a server.
//! - Long query strings switch `/select` from GET to form POST at a
//!   configurable threshold ([`DEFAULT_SELECT_POST_THRESHOLD`]).
//! - Errors form the closed [`SolrError`] union: bad input, wrong HTTP
//!   status, failed exchange, or undecodable response.
//! - Diagnostics go through [`tracing`]; the crate never installs a
//!   subscriber, so output is entirely the application's choice.

pub mod client;
pub mod error;
pub mod input;
pub mod query;
pub mod types;

pub use client::{
    BodyStream, ConsumerState, EmptyConsumer, HttpTransport, Method, ReqwestTransport, Request,
    ResponseConsumer, SolrClient, TransportResponse, DEFAULT_SELECT_POST_THRESHOLD, USER_AGENT,
};
pub use error::{BoxError, InputError, ResponseError, Result, SolrError};
pub use input::{
    AddOptions, Body, CommitOptions, OptimizeOptions, UpdateFactory, XmlUpdateFactory,
};
pub use query::{escape, QueryParams};
pub use types::{Document, FieldValue, JsonObject, QueryResults, SolrResponse};
