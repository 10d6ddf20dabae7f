//! The asynchronous Solr client.
//!
//! [`SolrClient`] maps the Solr HTTP API onto async methods. Update
//! commands are encoded by an [`UpdateFactory`] and POSTed to `/update`;
//! queries go to `/select`, by GET until the query string reaches a size
//! threshold and by form POST from there on; `ping` GETs `/admin/ping`.
//! Every handler is asked for JSON, and every 200 body is decoded by the
//! same [`ResponseConsumer`] pipeline.
//!
//! # Examples
//!
//! ```no_run
//! use solr_rs::{Document, QueryParams, SolrClient};
//!
//! # async fn run() -> solr_rs::Result<()> {
//! let client = SolrClient::new("http://localhost:8983/solr");
//!
//! client
//!     .add([Document::new().field("id", 1).field("name", "grissom")])
//!     .await?;
//! client.commit().await?;
//!
//! let found = client.search("name:grissom").await?;
//! if let Some(results) = found.results() {
//!     println!("{} documents", results.num_found);
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use http::Method;

use crate::client::consumer::{EmptyConsumer, ResponseConsumer};
use crate::client::transport::{HttpTransport, ReqwestTransport, Request};
use crate::error::{Result, SolrError};
use crate::input::{
    AddOptions, Body, CommitOptions, OptimizeOptions, UpdateFactory, XmlUpdateFactory,
};
use crate::query::QueryParams;
use crate::types::{Document, FieldValue, SolrResponse};

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("solr-rs/", env!("CARGO_PKG_VERSION"));

/// Query-string length at which `/select` switches from GET to form POST.
///
/// Keeps long queries clear of proxy and container URL-length limits.
pub const DEFAULT_SELECT_POST_THRESHOLD: usize = 1024;

const UPDATE_PATH: &str = "/update?wt=json";
const SELECT_PATH: &str = "/select";
const PING_PATH: &str = "/admin/ping?wt=json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Asynchronous client for one Solr core.
///
/// The client is cheap to clone and safe to share; the transport behind it
/// owns the connection pool.
#[derive(Clone)]
pub struct SolrClient {
    base_url: String,
    factory: Arc<dyn UpdateFactory>,
    transport: Arc<dyn HttpTransport>,
    select_post_threshold: usize,
}

impl SolrClient {
    /// Creates a client for the core at `base_url`, e.g.
    /// `http://localhost:8983/solr`. Trailing slashes are stripped; handler
    /// paths are appended verbatim.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        SolrClient {
            base_url,
            factory: Arc::new(XmlUpdateFactory::new()),
            transport: Arc::new(ReqwestTransport::new()),
            select_post_threshold: DEFAULT_SELECT_POST_THRESHOLD,
        }
    }

    /// Replaces the update body factory.
    pub fn with_factory(mut self, factory: impl UpdateFactory + 'static) -> Self {
        self.factory = Arc::new(factory);
        self
    }

    /// Replaces the HTTP transport. Takes an `Arc` so a caller can keep a
    /// handle to the same transport, which scripted test transports rely on.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// Overrides [`DEFAULT_SELECT_POST_THRESHOLD`] for this client.
    pub fn with_select_post_threshold(mut self, threshold: usize) -> Self {
        self.select_post_threshold = threshold;
        self
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one request to a handler path and decodes the answer.
    ///
    /// `path` is appended to the base URL as given, query string included.
    /// The client `User-Agent` replaces any caller-supplied one. A non-200
    /// status fails with [`SolrError::WrongStatus`] and the body is
    /// discarded unread.
    ///
    /// The named operations all route through here; it is public as the
    /// escape hatch for handlers the client has no method for.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        mut headers: BTreeMap<String, String>,
        body: Option<Body>,
    ) -> Result<SolrResponse> {
        headers.insert("User-Agent".to_string(), USER_AGENT.to_string());
        let request = Request {
            method,
            url: format!("{}{}", self.base_url, path),
            headers,
            body,
        };
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let response = self
            .transport
            .send(request)
            .await
            .map_err(SolrError::Request)?;
        tracing::debug!(status = response.status, "response received");

        if response.status == 200 {
            ResponseConsumer::new().consume(response.body).await
        } else {
            let status = response.status;
            EmptyConsumer.consume(response.body);
            Err(SolrError::WrongStatus(status))
        }
    }

    /// POSTs an encoded update body to the update handler.
    async fn update(&self, body: Body) -> Result<SolrResponse> {
        self.request(Method::POST, UPDATE_PATH, BTreeMap::new(), Some(body))
            .await
    }

    /// Adds documents to the index with default options.
    pub async fn add(
        &self,
        documents: impl IntoIterator<Item = Document>,
    ) -> Result<SolrResponse> {
        self.add_with_options(documents, &AddOptions::default()).await
    }

    /// Adds documents to the index.
    pub async fn add_with_options(
        &self,
        documents: impl IntoIterator<Item = Document>,
        options: &AddOptions,
    ) -> Result<SolrResponse> {
        let documents: Vec<Document> = documents.into_iter().collect();
        let body = self.factory.add(&documents, options)?;
        self.update(body).await
    }

    /// Deletes documents by unique key.
    pub async fn delete<I, V>(&self, ids: I) -> Result<SolrResponse>
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        let ids: Vec<FieldValue> = ids.into_iter().map(Into::into).collect();
        let body = self.factory.delete(&ids)?;
        self.update(body).await
    }

    /// Deletes every document matching a query.
    pub async fn delete_by_query(&self, query: &str) -> Result<SolrResponse> {
        let body = self.factory.delete_by_query(query)?;
        self.update(body).await
    }

    /// Commits pending changes with default options.
    pub async fn commit(&self) -> Result<SolrResponse> {
        self.commit_with_options(&CommitOptions::default()).await
    }

    /// Commits pending changes.
    pub async fn commit_with_options(&self, options: &CommitOptions) -> Result<SolrResponse> {
        let body = self.factory.commit(options)?;
        self.update(body).await
    }

    /// Rolls back changes since the last commit.
    pub async fn rollback(&self) -> Result<SolrResponse> {
        let body = self.factory.rollback()?;
        self.update(body).await
    }

    /// Merges index segments with default options.
    pub async fn optimize(&self) -> Result<SolrResponse> {
        self.optimize_with_options(&OptimizeOptions::default()).await
    }

    /// Merges index segments.
    pub async fn optimize_with_options(
        &self,
        options: &OptimizeOptions,
    ) -> Result<SolrResponse> {
        let body = self.factory.optimize(options)?;
        self.update(body).await
    }

    /// Runs a query against the select handler.
    ///
    /// The encoded query string travels in the URL while it is shorter than
    /// the client's POST threshold, and as a form POST body from the
    /// threshold up.
    pub async fn select(&self, params: &QueryParams) -> Result<SolrResponse> {
        let encoded = params.encode()?;
        if encoded.len() < self.select_post_threshold {
            let path = format!("{SELECT_PATH}?{encoded}");
            self.request(Method::GET, &path, BTreeMap::new(), None).await
        } else {
            tracing::debug!(
                length = encoded.len(),
                "query string over threshold, selecting via POST"
            );
            let body = Body::new(FORM_CONTENT_TYPE, encoded);
            self.request(Method::POST, SELECT_PATH, BTreeMap::new(), Some(body))
                .await
        }
    }

    /// Queries with `q` set to `query`, sent exactly as given.
    ///
    /// Nothing is escaped on the way out; use [`escape`](crate::escape) on
    /// user-entered terms first where they must match literally.
    pub async fn search(&self, query: &str) -> Result<SolrResponse> {
        self.search_with(query, QueryParams::new()).await
    }

    /// Queries with extra parameters such as `fl`, `sort` or `facet_field`.
    ///
    /// `query` replaces any `q` already present in `params`.
    pub async fn search_with(&self, query: &str, mut params: QueryParams) -> Result<SolrResponse> {
        params.set("q", query);
        self.select(&params).await
    }

    /// Checks that the server is up via the ping handler.
    pub async fn ping(&self) -> Result<SolrResponse> {
        self.request(Method::GET, PING_PATH, BTreeMap::new(), None)
            .await
    }
}

impl std::fmt::Debug for SolrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolrClient")
            .field("base_url", &self.base_url)
            .field("select_post_threshold", &self.select_post_threshold)
            .finish()
    }
}
