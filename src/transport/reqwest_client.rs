use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;

use super::{Transport, TransportError, TransportResponse};
use crate::request::TokenRequest;

/// Sends token requests with a `reqwest` client.
///
/// Must be polled within a tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> ReqwestTransport {
        ReqwestTransport::default()
    }

    /// Use a preconfigured client, e.g. one with timeouts.
    pub fn with_client(client: Client) -> ReqwestTransport {
        ReqwestTransport { client }
    }
}

impl Transport for ReqwestTransport {
    fn perform_request(&self, request: TokenRequest) -> BoxFuture<'static, TransportResponse> {
        let (method, url, headers, body) = request.into_parts();
        let pending = self
            .client
            .request(method, url)
            .headers(headers)
            .body(body)
            .send();

        async move {
            let rsp = match pending.await {
                Ok(rsp) => rsp,
                Err(err) => return TransportResponse::failed(err.into()),
            };
            let status = rsp.status().as_u16();
            match rsp.bytes().await {
                Ok(bytes) => TransportResponse::new(status, bytes.to_vec()),
                Err(err) => TransportResponse {
                    body: None,
                    status,
                    error: Some(err.into()),
                },
            }
        }
        .boxed()
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else if err.is_body() || err.is_decode() {
            TransportError::Io(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}
