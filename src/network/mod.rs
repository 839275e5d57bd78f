//! HTTP networking module
//!
//! Provides the transport used to reach the remote search service.

mod client;
mod transport;

pub use client::HttpClient;
pub use transport::{ApiRequest, ApiResponse, Transport, TransportError, UnavailableTransport};

#[cfg(test)]
pub(crate) use transport::mock::MockTransport;
