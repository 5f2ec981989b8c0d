//! The HTTP transport token requests are sent through.
//!
//! A `Transport` only reports whether bytes were received. Interpreting
//! the status code is left to the `TokenExchanger`, so a `401` is a
//! successful round trip as far as the transport is concerned.
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use futures::channel::oneshot;
use futures::future::{BoxFuture, FutureExt};

use crate::request::TokenRequest;

mod reqwest_client;

pub use self::reqwest_client::ReqwestTransport;

/// Sends a `TokenRequest` and completes exactly once with the outcome.
///
/// Timeouts and cancellation are entirely up to the implementor. If the
/// returned future never completes, neither does the token request.
pub trait Transport {
    fn perform_request(&self, request: TokenRequest) -> BoxFuture<'static, TransportResponse>;
}

impl<'a, T: Transport + ?Sized> Transport for &'a T {
    fn perform_request(&self, request: TokenRequest) -> BoxFuture<'static, TransportResponse> {
        (**self).perform_request(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn perform_request(&self, request: TokenRequest) -> BoxFuture<'static, TransportResponse> {
        (**self).perform_request(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn perform_request(&self, request: TokenRequest) -> BoxFuture<'static, TransportResponse> {
        (**self).perform_request(request)
    }
}

/// What a `Transport` delivers for a request.
///
/// `body` is `None` if no data was received. In that case `error`
/// should say why.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub body: Option<Vec<u8>>,
    /// The HTTP status code or `0` if there was no response.
    pub status: u16,
    pub error: Option<TransportError>,
}

impl TransportResponse {
    pub fn new<B: Into<Vec<u8>>>(status: u16, body: B) -> TransportResponse {
        TransportResponse {
            body: Some(body.into()),
            status,
            error: None,
        }
    }

    /// A response without any data.
    pub fn failed(error: TransportError) -> TransportResponse {
        TransportResponse {
            body: None,
            status: 0,
            error: Some(error),
        }
    }
}

/// An error on the transport level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// No connection to the server could be established.
    Connection(String),
    Timeout(String),
    /// Reading or writing data failed.
    Io(String),
    /// The transport gave up on the request without answering.
    Canceled,
    Other(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TransportError::Connection(ref msg) => write!(f, "Connection error: {}", msg),
            TransportError::Timeout(ref msg) => write!(f, "Timeout: {}", msg),
            TransportError::Io(ref msg) => write!(f, "IO error: {}", msg),
            TransportError::Canceled => write!(f, "The request was canceled by the transport"),
            TransportError::Other(ref msg) => write!(f, "Transport error: {}", msg),
        }
    }
}

impl Error for TransportError {}

/// Completes a request handed to a `CallbackTransport`.
///
/// `respond` consumes the responder so a request can only be answered
/// once. Dropping it without answering completes the request with
/// `TransportError::Canceled`.
#[derive(Debug)]
pub struct Responder {
    sender: oneshot::Sender<TransportResponse>,
}

impl Responder {
    pub fn respond(self, body: Option<Vec<u8>>, status: u16, error: Option<TransportError>) {
        self.complete(TransportResponse {
            body,
            status,
            error,
        })
    }

    pub fn complete(self, response: TransportResponse) {
        if self.sender.send(response).is_err() {
            debug!("Nobody is waiting for the response anymore");
        }
    }
}

/// Adapts a callback based HTTP stack to `Transport`.
///
/// The callback receives the request and a `Responder`. It may answer
/// right away or hand the `Responder` to any other thread.
pub struct CallbackTransport<F> {
    perform: F,
}

impl<F> CallbackTransport<F>
where
    F: Fn(TokenRequest, Responder),
{
    pub fn new(perform: F) -> CallbackTransport<F> {
        CallbackTransport { perform }
    }
}

impl<F> Transport for CallbackTransport<F>
where
    F: Fn(TokenRequest, Responder),
{
    fn perform_request(&self, request: TokenRequest) -> BoxFuture<'static, TransportResponse> {
        let (sender, receiver) = oneshot::channel();
        (self.perform)(request, Responder { sender });
        receiver
            .map(|received| match received {
                Ok(response) => response,
                Err(oneshot::Canceled) => TransportResponse::failed(TransportError::Canceled),
            })
            .boxed()
    }
}

#[cfg(test)]
mod test {
    use std::thread;

    use futures::executor::block_on;
    use url::Url;

    use super::*;
    use crate::config::{AuthConfig, ClientIdentity, EndpointConfig};
    use crate::credentials::Credentials;
    use crate::grant::password;

    fn request() -> TokenRequest {
        password::build(
            &Credentials::new("alice", "p@ss"),
            &ClientIdentity::new("cid"),
            &AuthConfig::default(),
            &EndpointConfig::parse("https://auth.example.com/token", None).unwrap(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn callback_transport_answers_synchronously() {
        let transport = CallbackTransport::new(|_request, responder: Responder| {
            responder.respond(Some(b"{}".to_vec()), 200, None)
        });

        let response = block_on(transport.perform_request(request()));

        assert_eq!(TransportResponse::new(200, &b"{}"[..]), response);
    }

    #[test]
    fn callback_transport_answers_from_another_thread() {
        let transport = CallbackTransport::new(|request: TokenRequest, responder: Responder| {
            thread::spawn(move || {
                let body = format!("{{\"echo\": \"{}\"}}", request.url());
                responder.complete(TransportResponse::new(200, body))
            });
        });

        let response = block_on(transport.perform_request(request()));

        assert_eq!(200, response.status);
        assert_eq!(
            Some(br#"{"echo": "https://auth.example.com/token"}"#.to_vec()),
            response.body
        );
    }

    #[test]
    fn sends_a_hand_made_request() {
        let transport = CallbackTransport::new(|request: TokenRequest, responder: Responder| {
            let body = format!("{{\"echo\": \"{}\"}}", request.body());
            responder.complete(TransportResponse::new(200, body))
        });
        let request = TokenRequest::new(
            Url::parse("http://localhost:8080/token").unwrap(),
            None,
            "grant_type=custom".to_string(),
        );

        let response = block_on(transport.perform_request(request));

        assert_eq!(
            TransportResponse::new(200, r#"{"echo": "grant_type=custom"}"#),
            response
        );
    }

    #[test]
    fn a_dropped_responder_cancels_the_request() {
        let transport = CallbackTransport::new(|_request, _responder: Responder| {});

        let response = block_on(transport.perform_request(request()));

        assert_eq!(
            TransportResponse::failed(TransportError::Canceled),
            response
        );
    }
}
