//! HTTP client layer: the transport seam, body consumers and the client.

mod consumer;
mod solr;
mod transport;

pub use http::Method;

pub use consumer::{ConsumerState, EmptyConsumer, ResponseConsumer};
pub use solr::{SolrClient, DEFAULT_SELECT_POST_THRESHOLD, USER_AGENT};
pub use transport::{BodyStream, HttpTransport, ReqwestTransport, Request, TransportResponse};
