//! Response body accumulation and decoding.
//!
//! Bodies arrive as a chunk stream from the transport. A
//! [`ResponseConsumer`] buffers every chunk and decodes once, when the
//! stream ends; responses are JSON, so no prefix of the body is usable
//! early.
//!
//! # State Machine
//!
//! ```text
//! Receiving --feed()--> Receiving
//! Receiving --finish(), decode ok--> Complete
//! Receiving --finish(), decode err--> Failed
//! ```
//!
//! A stream that ends in an error is logged and then decoded anyway: the
//! buffered prefix is often a complete body whose connection closed
//! uncleanly, and when it is not, decoding fails and reports that.

use bytes::BytesMut;
use futures::StreamExt;

use crate::client::transport::BodyStream;
use crate::error::{Result, SolrError};
use crate::types::SolrResponse;

/// Consumer lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    /// Accepting body chunks.
    Receiving,
    /// Stream finished and the body decoded as a valid response.
    Complete,
    /// Stream finished but the body did not decode.
    Failed,
}

/// Accumulates body chunks and decodes them as one [`SolrResponse`].
///
/// A consumer is single-use: [`finish`](Self::finish) takes the buffer and
/// moves to a terminal state.
#[derive(Debug)]
pub struct ResponseConsumer {
    buffer: BytesMut,
    state: ConsumerState,
}

impl Default for ResponseConsumer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseConsumer {
    pub fn new() -> Self {
        ResponseConsumer {
            buffer: BytesMut::new(),
            state: ConsumerState::Receiving,
        }
    }

    pub fn state(&self) -> ConsumerState {
        self.state
    }

    /// Appends a body chunk. Chunks fed after the terminal state are
    /// discarded.
    pub fn feed(&mut self, chunk: &[u8]) {
        if self.state == ConsumerState::Receiving {
            self.buffer.extend_from_slice(chunk);
        }
    }

    /// Decodes the buffered body and moves to a terminal state.
    pub fn finish(&mut self) -> Result<SolrResponse> {
        let raw = self.buffer.split().freeze();
        match SolrResponse::parse(raw) {
            Ok(response) => {
                self.state = ConsumerState::Complete;
                Ok(response)
            }
            Err(err) => {
                self.state = ConsumerState::Failed;
                Err(SolrError::Response(err))
            }
        }
    }

    /// Drains a body stream to completion and decodes it.
    pub async fn consume(mut self, mut body: BodyStream) -> Result<SolrResponse> {
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(bytes) => self.feed(&bytes),
                Err(reason) => {
                    tracing::warn!(%reason, "response body ended uncleanly, decoding buffered bytes");
                    break;
                }
            }
        }
        self.finish()
    }
}

/// Discards the body of a response we will not decode.
///
/// Dropping the stream releases the connection without reading the rest of
/// the body; used for non-200 answers where only the status matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyConsumer;

impl EmptyConsumer {
    pub fn consume(self, body: BodyStream) {
        drop(body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use bytes::Bytes;
    use futures::stream;
    use std::result::Result;

    const GOOD_BODY: &str = r#"{"responseHeader": {"status": 0, "QTime": 3}}"#;

    fn chunked(chunks: Vec<Result<&'static str, &'static str>>) -> BodyStream {
        let items: Vec<Result<Bytes, BoxError>> = chunks
            .into_iter()
            .map(|chunk| match chunk {
                Ok(text) => Ok(Bytes::from(text)),
                Err(reason) => Err(BoxError::from(reason)),
            })
            .collect();
        Box::pin(stream::iter(items))
    }

    #[test]
    fn test_feed_and_finish_across_chunk_boundaries() {
        let mut consumer = ResponseConsumer::new();
        let (first, second) = GOOD_BODY.as_bytes().split_at(17);
        consumer.feed(first);
        assert_eq!(consumer.state(), ConsumerState::Receiving);
        consumer.feed(second);

        let response = consumer.finish().unwrap();
        assert_eq!(consumer.state(), ConsumerState::Complete);
        assert_eq!(response.qtime(), Some(3));
    }

    #[test]
    fn test_finish_with_undecodable_body_fails() {
        let mut consumer = ResponseConsumer::new();
        consumer.feed(b"<html>not json</html>");
        let err = consumer.finish().unwrap_err();
        assert_eq!(consumer.state(), ConsumerState::Failed);
        assert!(matches!(err, SolrError::Response(_)));
    }

    #[test]
    fn test_feed_after_finish_is_discarded() {
        let mut consumer = ResponseConsumer::new();
        consumer.feed(GOOD_BODY.as_bytes());
        consumer.finish().unwrap();
        consumer.feed(b"late chunk");
        assert_eq!(consumer.state(), ConsumerState::Complete);
    }

    #[tokio::test]
    async fn test_consume_whole_stream() {
        let (first, second) = GOOD_BODY.split_at(10);
        let body = chunked(vec![Ok(first), Ok(second)]);
        let response = ResponseConsumer::new().consume(body).await.unwrap();
        assert_eq!(response.qtime(), Some(3));
    }

    #[tokio::test]
    async fn test_consume_decodes_after_unclean_close() {
        // The complete body arrived before the connection dropped.
        let body = chunked(vec![Ok(GOOD_BODY), Err("connection reset")]);
        let response = ResponseConsumer::new().consume(body).await.unwrap();
        assert_eq!(response.qtime(), Some(3));
    }

    #[tokio::test]
    async fn test_consume_reports_truncated_body() {
        let body = chunked(vec![Ok(&GOOD_BODY[..12]), Err("connection reset")]);
        let err = ResponseConsumer::new().consume(body).await.unwrap_err();
        assert!(matches!(err, SolrError::Response(_)));
    }

    #[tokio::test]
    async fn test_consume_empty_stream_fails_decode() {
        let body = chunked(vec![]);
        let err = ResponseConsumer::new().consume(body).await.unwrap_err();
        assert!(matches!(err, SolrError::Response(_)));
    }
}
