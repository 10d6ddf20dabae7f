//! HTTP transport abstraction.
//!
//! The client core never talks to the network directly; it hands a
//! [`Request`] to an [`HttpTransport`] and gets back a status code plus a
//! byte stream. [`ReqwestTransport`] is the production implementation; tests
//! substitute scripted transports through the same trait.

use std::collections::BTreeMap;
use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, Stream, TryStreamExt};
use http::Method;
use reqwest::Client;

use crate::error::BoxError;
use crate::input::Body;

/// Streaming response body as delivered by the transport.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes, BoxError>> + Send + 'static>>;

/// A complete HTTP request ready to be sent.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Body>,
}

impl Request {
    /// Creates a request with no headers and no body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Request {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Sets a header, replacing any previous value for the name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attaches an encoded body.
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }
}

/// Status code and body stream returned by a transport.
pub struct TransportResponse {
    pub status: u16,
    pub body: BodyStream,
}

impl TransportResponse {
    pub fn new(status: u16, body: BodyStream) -> Self {
        TransportResponse { status, body }
    }

    /// Builds a response whose body arrives as a single chunk.
    pub fn buffered(status: u16, body: impl Into<Bytes>) -> Self {
        let chunk: Result<Bytes, BoxError> = Ok(body.into());
        TransportResponse {
            status,
            body: Box::pin(stream::iter([chunk])),
        }
    }
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("body", &"<stream>")
            .finish()
    }
}

/// Sends requests and yields streamed responses.
///
/// Implementations report HTTP statuses as responses, never as errors; the
/// error channel is reserved for failures of the exchange itself.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: Request) -> Result<TransportResponse, BoxError>;
}

/// [`HttpTransport`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with a fresh connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already-configured client, sharing its pool.
    pub fn with_client(client: Client) -> Self {
        ReqwestTransport { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<TransportResponse, BoxError> {
        let Request {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(method, url);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            builder = builder.header(http::header::CONTENT_TYPE, body.content_type());
            builder = builder.body(body.into_content());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response
            .bytes_stream()
            .map_err(|err| Box::new(err) as BoxError);
        Ok(TransportResponse::new(status, Box::pin(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_request_builder() {
        let request = Request::new(Method::POST, "http://localhost:8983/solr/update")
            .with_header("User-Agent", "test")
            .with_body(Body::new("text/xml", "<commit/>"));
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.headers.get("User-Agent").unwrap(), "test");
        assert_eq!(request.body.unwrap().text(), Some("<commit/>"));
    }

    #[tokio::test]
    async fn test_buffered_response_yields_one_chunk() {
        let mut response = TransportResponse::buffered(200, "hello");
        assert_eq!(response.status, 200);
        let chunk = response.body.next().await.unwrap().unwrap();
        assert_eq!(&chunk[..], b"hello");
        assert!(response.body.next().await.is_none());
    }
}
