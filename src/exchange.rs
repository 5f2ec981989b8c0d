//! Sending a token request and classifying what came back.
use crate::error::{GrantError, GrantErrorKind, TokenResult};
use crate::parsers::{JsonTokenResponseParser, ResponseParser};
use crate::request::TokenRequest;
use crate::transport::{Transport, TransportResponse};

/// Performs the single round trip to the token endpoint.
pub struct TokenExchanger<T, P = JsonTokenResponseParser> {
    transport: T,
    parser: P,
}

impl<T> TokenExchanger<T>
where
    T: Transport,
{
    pub fn new(transport: T) -> TokenExchanger<T> {
        TokenExchanger {
            transport,
            parser: JsonTokenResponseParser,
        }
    }
}

impl<T, P> TokenExchanger<T, P>
where
    T: Transport,
    P: ResponseParser,
{
    pub fn with_parser<PP: ResponseParser>(self, parser: PP) -> TokenExchanger<T, PP> {
        TokenExchanger {
            transport: self.transport,
            parser,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `request` and waits for the transport to complete.
    ///
    /// The request is consumed. The returned future resolves exactly once
    /// and only after the transport has completed.
    pub async fn exchange(&self, request: TokenRequest) -> TokenResult {
        info!("Requesting new access token from {}", request.url());
        let response = self.transport.perform_request(request).await;
        classify(response, &self.parser)
    }
}

/// Turns what the transport delivered into a `TokenResult`.
///
/// * No data: the transport's error or `NoDataInResponse`
/// * Unparsable data: `ResponseParse`
/// * A status below 400: the parsed payload
/// * Any other status: `Response` with the parsed payload attached
///
/// If data was received a transport error is ignored.
pub fn classify<P>(response: TransportResponse, parser: &P) -> TokenResult
where
    P: ResponseParser + ?Sized,
{
    let TransportResponse {
        body,
        status,
        error,
    } = response;

    let body = match (body, error) {
        (Some(body), _) => body,
        (None, Some(err)) => {
            warn!("The transport failed: {}", err);
            return Err(err.into());
        }
        (None, None) => return Err(GrantErrorKind::NoDataInResponse.into()),
    };

    let payload = parser.parse(&body).map_err(|msg| {
        warn!("Error parsing response: {}", msg);
        GrantError::from(GrantErrorKind::ResponseParse(msg))
    })?;

    if status < 400 {
        info!("Did get access token [{}]", payload.access_token().is_some());
        Ok(payload)
    } else {
        warn!("The token endpoint rejected the request with status {}", status);
        Err(GrantError::rejected(payload))
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::executor::block_on;
    use futures::future::{self, BoxFuture, FutureExt};

    use super::*;
    use crate::config::{AuthConfig, ClientIdentity, EndpointConfig};
    use crate::credentials::Credentials;
    use crate::error::{AuthorizationServerErrorCode, REJECTED_MESSAGE};
    use crate::grant::password;
    use crate::parsers::TokenPayload;
    use crate::transport::TransportError;

    struct StubTransport {
        response: TransportResponse,
        calls: AtomicUsize,
    }

    impl StubTransport {
        fn new(response: TransportResponse) -> StubTransport {
            StubTransport {
                response,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Transport for StubTransport {
        fn perform_request(&self, _request: TokenRequest) -> BoxFuture<'static, TransportResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            future::ready(self.response.clone()).boxed()
        }
    }

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

    fn exchange(response: TransportResponse) -> TokenResult {
        let exchanger = TokenExchanger::new(StubTransport::new(response));
        let result = block_on(exchanger.exchange(request()));
        assert_eq!(1, exchanger.transport().calls.load(Ordering::SeqCst));
        result
    }

    #[test]
    fn success_with_a_valid_payload() {
        let payload = exchange(TransportResponse::new(
            200,
            r#"{"access_token": "abc", "expires_in": 60}"#,
        ))
        .unwrap();

        assert_eq!(Some("abc"), payload.access_token());
    }

    #[test]
    fn success_with_an_empty_payload() {
        let payload = exchange(TransportResponse::new(200, "{}")).unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn any_status_below_400_is_a_success() {
        assert!(exchange(TransportResponse::new(302, "{}")).is_ok());
        assert!(exchange(TransportResponse::new(399, "{}")).is_ok());
    }

    #[test]
    fn status_401_is_a_rejection() {
        let err = exchange(TransportResponse::new(
            401,
            r#"{"error": "invalid_grant", "error_description": "Bad credentials"}"#,
        ))
        .unwrap_err();

        match *err.kind() {
            GrantErrorKind::Response { ref message, .. } => {
                assert_eq!(REJECTED_MESSAGE, message)
            }
            ref other => panic!("expected a rejection, got {:?}", other),
        }
        assert_eq!(
            Some("invalid_grant"),
            err.payload().and_then(|p| p.get_str("error"))
        );
        let oauth_error = err.oauth_error().unwrap();
        assert_eq!(AuthorizationServerErrorCode::InvalidGrant, oauth_error.error);
        assert_eq!(
            Some("Bad credentials".to_string()),
            oauth_error.error_description
        );
    }

    #[test]
    fn server_errors_are_rejections_as_well() {
        let err = exchange(TransportResponse::new(503, "{}")).unwrap_err();
        assert_eq!(Some(&TokenPayload::default()), err.payload());
        assert_eq!(None, err.oauth_error());
    }

    #[test]
    fn transport_errors_are_passed_through() {
        let timeout = TransportError::Timeout("no answer after 30s".to_string());
        let err = exchange(TransportResponse::failed(timeout.clone())).unwrap_err();
        assert_eq!(&GrantErrorKind::Transport(timeout), err.kind());
    }

    #[test]
    fn no_data_and_no_error() {
        let err = exchange(TransportResponse {
            body: None,
            status: 200,
            error: None,
        })
        .unwrap_err();
        assert_eq!(&GrantErrorKind::NoDataInResponse, err.kind());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = exchange(TransportResponse::new(200, "<html>Hello</html>")).unwrap_err();
        match *err.kind() {
            GrantErrorKind::ResponseParse(_) => {}
            ref other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn garbage_with_an_error_status_is_still_a_parse_error() {
        let err = exchange(TransportResponse::new(500, "Internal Server Error")).unwrap_err();
        match *err.kind() {
            GrantErrorKind::ResponseParse(_) => {}
            ref other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn data_wins_over_a_transport_error() {
        let payload = exchange(TransportResponse {
            body: Some(br#"{"access_token": "abc"}"#.to_vec()),
            status: 200,
            error: Some(TransportError::Io("connection reset".to_string())),
        })
        .unwrap();
        assert_eq!(Some("abc"), payload.access_token());
    }

    #[test]
    fn uses_a_custom_parser() {
        let exchanger = TokenExchanger::new(StubTransport::new(TransportResponse::new(200, "x")))
            .with_parser(|_bytes: &[u8]| -> Result<TokenPayload, String> {
                TokenPayload::parse(br#"{"access_token": "from-parser"}"#)
            });
        let payload = block_on(exchanger.exchange(request())).unwrap();
        assert_eq!(Some("from-parser"), payload.access_token());
    }
}
