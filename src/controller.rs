//! The entry point of a grant: validate, build, send, report.
use std::time::Instant;

use crate::config::{AuthConfig, ClientIdentity, EndpointConfig};
use crate::error::{GrantError, GrantResult, TokenResult};
use crate::exchange::TokenExchanger;
use crate::grant::{GrantStrategy, PasswordGrant};
use crate::metrics::{DevNullMetricsCollector, MetricsCollector};
use crate::parsers::{JsonTokenResponseParser, ResponseParser, TokenPayload};
use crate::request::{ExtraParams, TokenRequest};
use crate::settings::GrantSettings;
use crate::transport::Transport;

/// Receives the outcome of an authorization.
///
/// Exactly one of the two methods is called per authorization.
pub trait AuthorizationFlow {
    /// An access token was obtained.
    fn did_authorize(&self, payload: TokenPayload);
    /// The authorization failed.
    fn did_fail(&self, error: GrantError);
}

/// Obtains access tokens with a `GrantStrategy`.
///
/// Requests are built and validated before anything is sent, so
/// invalid input never reaches the transport. There are no retries.
/// A controller should not be used for overlapping authorizations
/// if its strategy holds credentials that may change.
pub struct GrantController<G, T, P = JsonTokenResponseParser, M = DevNullMetricsCollector> {
    strategy: G,
    client: ClientIdentity,
    auth: AuthConfig,
    endpoint: EndpointConfig,
    exchanger: TokenExchanger<T, P>,
    metrics_collector: M,
}

impl<G, T> GrantController<G, T>
where
    G: GrantStrategy,
    T: Transport,
{
    pub fn new(
        strategy: G,
        client: ClientIdentity,
        auth: AuthConfig,
        endpoint: EndpointConfig,
        transport: T,
    ) -> GrantController<G, T> {
        GrantController {
            strategy,
            client,
            auth,
            endpoint,
            exchanger: TokenExchanger::new(transport),
            metrics_collector: DevNullMetricsCollector,
        }
    }
}

impl<T> GrantController<PasswordGrant, T>
where
    T: Transport,
{
    /// A controller for the resource owner password credentials grant.
    pub fn password_grant(settings: GrantSettings, transport: T) -> Self {
        GrantController::new(
            PasswordGrant::new(settings.credentials),
            settings.client,
            settings.auth,
            settings.endpoint,
            transport,
        )
    }
}

impl<G, T, P, M> GrantController<G, T, P, M>
where
    G: GrantStrategy,
    T: Transport,
    P: ResponseParser,
    M: MetricsCollector,
{
    pub fn with_parser<PP: ResponseParser>(self, parser: PP) -> GrantController<G, T, PP, M> {
        GrantController {
            strategy: self.strategy,
            client: self.client,
            auth: self.auth,
            endpoint: self.endpoint,
            exchanger: self.exchanger.with_parser(parser),
            metrics_collector: self.metrics_collector,
        }
    }

    pub fn with_metrics<MM: MetricsCollector>(
        self,
        metrics_collector: MM,
    ) -> GrantController<G, T, P, MM> {
        GrantController {
            strategy: self.strategy,
            client: self.client,
            auth: self.auth,
            endpoint: self.endpoint,
            exchanger: self.exchanger,
            metrics_collector,
        }
    }

    pub fn strategy(&self) -> &G {
        &self.strategy
    }

    pub fn transport(&self) -> &T {
        self.exchanger.transport()
    }

    /// Builds the token request without sending it.
    pub fn build_request(&self, extra: Option<&ExtraParams>) -> GrantResult<TokenRequest> {
        self.strategy
            .build_request(&self.client, &self.auth, &self.endpoint, extra)
    }

    /// Builds and sends a token request.
    ///
    /// Fails without calling the transport if the request can not be
    /// built.
    pub async fn obtain_access_token(&self, extra: Option<&ExtraParams>) -> TokenResult {
        let start = Instant::now();
        self.metrics_collector.incoming_grant_request();

        let result = match self.build_request(extra) {
            Ok(request) => self.send(request).await,
            Err(err) => {
                debug!(
                    "Could not build a '{}' token request: {}",
                    self.strategy.grant_type(),
                    err
                );
                Err(err)
            }
        };

        self.metrics_collector.grant_request(start);
        if result.is_ok() {
            self.metrics_collector.grant_request_success(start);
        } else {
            self.metrics_collector.grant_request_failure(start);
        }
        result
    }

    async fn send(&self, request: TokenRequest) -> TokenResult {
        let start = Instant::now();
        let result = self.exchanger.exchange(request).await;
        self.metrics_collector.token_endpoint_call(start);
        if result.is_ok() {
            self.metrics_collector.token_endpoint_call_success(start);
        } else {
            self.metrics_collector.token_endpoint_call_failure(start);
        }
        result
    }

    /// Obtains an access token and hands the outcome to `on_complete`.
    ///
    /// On success the payload is passed without an error. On failure the
    /// error is passed along with the payload if the server sent one.
    pub async fn authorize<F>(&self, extra: Option<&ExtraParams>, on_complete: F)
    where
        F: FnOnce(Option<TokenPayload>, Option<GrantError>),
    {
        match self.obtain_access_token(extra).await {
            Ok(payload) => on_complete(Some(payload), None),
            Err(err) => {
                let payload = err.payload().cloned();
                on_complete(payload, Some(err))
            }
        }
    }

    /// Obtains an access token and reports the outcome to `flow`.
    pub async fn authorize_flow<A>(&self, extra: Option<&ExtraParams>, flow: &A)
    where
        A: AuthorizationFlow + ?Sized,
    {
        match self.obtain_access_token(extra).await {
            Ok(payload) => flow.did_authorize(payload),
            Err(err) => flow.did_fail(err),
        }
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    use futures::executor::block_on;
    use futures::future::{self, BoxFuture, FutureExt};
    use http::header::AUTHORIZATION;

    use super::*;
    use crate::credentials::Credentials;
    use crate::error::GrantErrorKind;
    use crate::grant::RefreshTokenGrant;
    use crate::transport::{CallbackTransport, Responder, TransportError, TransportResponse};

    struct CountingTransport {
        response: TransportResponse,
        calls: AtomicUsize,
        last_body: RefCell<Option<String>>,
    }

    impl CountingTransport {
        fn new(response: TransportResponse) -> CountingTransport {
            CountingTransport {
                response,
                calls: AtomicUsize::new(0),
                last_body: RefCell::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Transport for CountingTransport {
        fn perform_request(&self, request: TokenRequest) -> BoxFuture<'static, TransportResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_body.borrow_mut() = Some(request.body().to_string());
            future::ready(self.response.clone()).boxed()
        }
    }

    #[derive(Default)]
    struct CountingMetrics {
        incoming: AtomicUsize,
        successes: AtomicUsize,
        failures: AtomicUsize,
        endpoint_calls: AtomicUsize,
    }

    impl<'a> MetricsCollector for &'a CountingMetrics {
        fn incoming_grant_request(&self) {
            self.incoming.fetch_add(1, Ordering::SeqCst);
        }
        fn grant_request(&self, _request_started: Instant) {}
        fn grant_request_success(&self, _request_started: Instant) {
            self.successes.fetch_add(1, Ordering::SeqCst);
        }
        fn grant_request_failure(&self, _request_started: Instant) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }
        fn token_endpoint_call(&self, _request_started: Instant) {
            self.endpoint_calls.fetch_add(1, Ordering::SeqCst);
        }
        fn token_endpoint_call_failure(&self, _request_started: Instant) {}
        fn token_endpoint_call_success(&self, _request_started: Instant) {}
    }

    #[derive(Default)]
    struct RecordingFlow {
        authorized: RefCell<Vec<TokenPayload>>,
        failed: RefCell<Vec<GrantError>>,
    }

    impl AuthorizationFlow for RecordingFlow {
        fn did_authorize(&self, payload: TokenPayload) {
            self.authorized.borrow_mut().push(payload);
        }

        fn did_fail(&self, error: GrantError) {
            self.failed.borrow_mut().push(error);
        }
    }

    fn settings(username: &str, password: &str) -> GrantSettings {
        GrantSettings {
            client: ClientIdentity::with_secret("cid", "secret"),
            auth: AuthConfig::default(),
            endpoint: EndpointConfig::parse(
                "https://auth.example.com/authorize",
                Some("https://auth.example.com/token"),
            )
            .unwrap(),
            credentials: Credentials::new(username, password),
        }
    }

    fn ok_response() -> TransportResponse {
        TransportResponse::new(200, r#"{"access_token": "abc", "token_type": "bearer"}"#)
    }

    type Completion = (Option<TokenPayload>, Option<GrantError>);

    /// Runs `authorize` and returns every invocation of the callback.
    fn authorize_with<T: Transport>(
        controller: &GrantController<PasswordGrant, T>,
        extra: Option<&ExtraParams>,
    ) -> Vec<Completion> {
        let completions = RefCell::new(Vec::new());
        block_on(controller.authorize(extra, |payload, error| {
            completions.borrow_mut().push((payload, error))
        }));
        completions.into_inner()
    }

    #[test]
    fn an_empty_username_never_reaches_the_transport() {
        let controller = GrantController::password_grant(
            settings("", "p@ss"),
            CountingTransport::new(ok_response()),
        );

        let completions = authorize_with(&controller, None);

        assert_eq!(0, controller.transport().calls());
        assert_eq!(1, completions.len());
        let (ref payload, ref error) = completions[0];
        assert!(payload.is_none());
        assert_eq!(
            &GrantErrorKind::MissingUsername,
            error.as_ref().unwrap().kind()
        );
    }

    #[test]
    fn an_empty_password_never_reaches_the_transport() {
        let controller = GrantController::password_grant(
            settings("alice", ""),
            CountingTransport::new(ok_response()),
        );

        let err = block_on(controller.obtain_access_token(None)).unwrap_err();

        assert_eq!(0, controller.transport().calls());
        assert_eq!(&GrantErrorKind::MissingPassword, err.kind());
    }

    #[test]
    fn an_empty_client_id_never_reaches_the_transport() {
        let mut settings = settings("alice", "p@ss");
        settings.client.client_id = String::new();
        let controller =
            GrantController::password_grant(settings, CountingTransport::new(ok_response()));

        let err = block_on(controller.obtain_access_token(None)).unwrap_err();

        assert_eq!(0, controller.transport().calls());
        assert_eq!(&GrantErrorKind::MissingClientId, err.kind());
    }

    #[test]
    fn authorizes_with_the_payload() {
        let _ = env_logger::try_init();
        let controller = GrantController::password_grant(
            settings("alice", "p@ss"),
            CountingTransport::new(ok_response()),
        );
        let mut extra = ExtraParams::new();
        extra.insert("device_id".into(), "42".into());

        let completions = authorize_with(&controller, Some(&extra));

        assert_eq!(1, controller.transport().calls());
        assert_eq!(
            Some("grant_type=password&username=alice&password=p%40ss&device_id=42".to_string()),
            *controller.transport().last_body.borrow()
        );
        assert_eq!(1, completions.len());
        let (ref payload, ref error) = completions[0];
        assert!(error.is_none());
        assert_eq!(Some("abc"), payload.as_ref().unwrap().access_token());
    }

    #[test]
    fn a_rejection_still_delivers_the_payload() {
        let controller = GrantController::password_grant(
            settings("alice", "wrong"),
            CountingTransport::new(TransportResponse::new(
                400,
                r#"{"error": "invalid_grant"}"#,
            )),
        );

        let completions = authorize_with(&controller, None);

        assert_eq!(1, completions.len());
        let (ref payload, ref error) = completions[0];
        assert_eq!(
            Some("invalid_grant"),
            payload.as_ref().unwrap().get_str("error")
        );
        assert_eq!(
            "The username or password is incorrect",
            error.as_ref().unwrap().to_string()
        );
    }

    #[test]
    fn completes_exactly_once_for_every_outcome() {
        let outcomes = vec![
            ok_response(),
            TransportResponse::new(200, "{}"),
            TransportResponse::new(401, r#"{"error": "invalid_client"}"#),
            TransportResponse::new(500, "{}"),
            TransportResponse::new(200, "garbage"),
            TransportResponse::failed(TransportError::Timeout("timed out".into())),
            TransportResponse::failed(TransportError::Connection("refused".into())),
            TransportResponse {
                body: None,
                status: 204,
                error: None,
            },
        ];

        for outcome in outcomes {
            let controller = GrantController::password_grant(
                settings("alice", "p@ss"),
                CountingTransport::new(outcome.clone()),
            );
            let completions = authorize_with(&controller, None);
            assert_eq!(1, completions.len(), "outcome: {:?}", outcome);
            assert_eq!(1, controller.transport().calls());

            let flow = RecordingFlow::default();
            block_on(controller.authorize_flow(None, &flow));
            assert_eq!(
                1,
                flow.authorized.borrow().len() + flow.failed.borrow().len(),
                "outcome: {:?}",
                outcome
            );
        }
    }

    #[test]
    fn flow_is_told_about_success_or_failure() {
        let controller = GrantController::password_grant(
            settings("alice", "p@ss"),
            CountingTransport::new(ok_response()),
        );
        let flow = RecordingFlow::default();
        block_on(controller.authorize_flow(None, &flow));
        assert_eq!(1, flow.authorized.borrow().len());
        assert!(flow.failed.borrow().is_empty());

        let controller = GrantController::password_grant(
            settings("", "p@ss"),
            CountingTransport::new(ok_response()),
        );
        let flow = RecordingFlow::default();
        block_on(controller.authorize_flow(None, &flow));
        assert!(flow.authorized.borrow().is_empty());
        assert_eq!(
            &GrantErrorKind::MissingUsername,
            flow.failed.borrow()[0].kind()
        );
    }

    #[test]
    fn completes_after_an_asynchronous_transport() {
        let transport = CallbackTransport::new(|_request, responder: Responder| {
            thread::spawn(move || {
                responder.respond(Some(br#"{"access_token": "late"}"#.to_vec()), 200, None)
            });
        });
        let controller = GrantController::password_grant(settings("alice", "p@ss"), transport);

        let payload = block_on(controller.obtain_access_token(None)).unwrap();

        assert_eq!(Some("late"), payload.access_token());
    }

    #[test]
    fn records_metrics() {
        let metrics = CountingMetrics::default();
        let controller = GrantController::password_grant(
            settings("alice", "p@ss"),
            CountingTransport::new(ok_response()),
        )
        .with_metrics(&metrics);

        block_on(controller.obtain_access_token(None)).unwrap();

        let controller = GrantController::password_grant(
            settings("", "p@ss"),
            CountingTransport::new(ok_response()),
        )
        .with_metrics(&metrics);

        block_on(controller.obtain_access_token(None)).unwrap_err();

        assert_eq!(2, metrics.incoming.load(Ordering::SeqCst));
        assert_eq!(1, metrics.successes.load(Ordering::SeqCst));
        assert_eq!(1, metrics.failures.load(Ordering::SeqCst));
        assert_eq!(1, metrics.endpoint_calls.load(Ordering::SeqCst));
    }

    #[test]
    fn works_with_other_grants() {
        let transport = Arc::new(CountingTransport::new(ok_response()));
        let controller = GrantController::new(
            RefreshTokenGrant::new("tGzv3JOkF0XG5Qx2TlKWIA"),
            ClientIdentity::with_secret("cid", "secret"),
            AuthConfig::default(),
            EndpointConfig::parse("https://auth.example.com/token", None).unwrap(),
            transport.clone(),
        );

        let request = controller.build_request(None).unwrap();
        assert_eq!(
            "grant_type=refresh_token&refresh_token=tGzv3JOkF0XG5Qx2TlKWIA",
            request.body()
        );
        assert!(request.header(AUTHORIZATION).is_some());

        let payload = block_on(controller.obtain_access_token(None)).unwrap();
        assert_eq!(Some("abc"), payload.access_token());
        assert_eq!(1, transport.calls());
    }
}
