use std::time::Instant;

/// Collects metrics for token requests
pub trait MetricsCollector {
    /// An incoming request for an access token
    fn incoming_grant_request(&self);
    /// The complete grant workflow was finished regardless of the
    /// result.
    fn grant_request(&self, request_started: Instant);
    /// The complete grant workflow was finished and successful
    fn grant_request_success(&self, request_started: Instant);
    /// The complete grant workflow was finished and failed
    fn grant_request_failure(&self, request_started: Instant);

    /// The token endpoint was called regardless of the result.
    fn token_endpoint_call(&self, request_started: Instant);
    /// The token endpoint was called and the call was a failure.
    fn token_endpoint_call_failure(&self, request_started: Instant);
    /// The token endpoint was called and the call was a success.
    fn token_endpoint_call_success(&self, request_started: Instant);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DevNullMetricsCollector;

impl MetricsCollector for DevNullMetricsCollector {
    fn incoming_grant_request(&self) {}
    fn grant_request(&self, _request_started: Instant) {}
    fn grant_request_success(&self, _request_started: Instant) {}
    fn grant_request_failure(&self, _request_started: Instant) {}

    fn token_endpoint_call(&self, _request_started: Instant) {}
    fn token_endpoint_call_failure(&self, _request_started: Instant) {}
    fn token_endpoint_call_success(&self, _request_started: Instant) {}
}

#[cfg(feature = "metrix")]
pub mod metrix {
    use std::time::Instant;

    use metrix::cockpit::*;
    use metrix::instruments::*;
    use metrix::processor::*;
    use metrix::TelemetryTransmitterSync;
    use metrix::TransmitsTelemetryData;

    #[derive(Clone, PartialEq, Eq)]
    enum MetricsGrantRequest {
        IncomingGrantRequest,
        GrantRequest,
        GrantRequestSuccess,
        GrantRequestFailure,
    }

    #[derive(Clone, PartialEq, Eq)]
    enum MetricsTokenEndpoint {
        TokenEndpointCall,
        TokenEndpointCallSuccess,
        TokenEndpointCallFailure,
    }

    /// A `MetricsCollector` that works with the [`metrix`](https://crates.io/crates/metrix)
    ///  library
    #[derive(Clone)]
    pub struct MetrixCollector {
        grant_transmitter: TelemetryTransmitterSync<MetricsGrantRequest>,
        endpoint_transmitter: TelemetryTransmitterSync<MetricsTokenEndpoint>,
    }

    impl MetrixCollector {
        /// Creates a new collector that
        /// is attached to `add_metrics_to`.
        pub fn new<T>(add_metrics_to: &mut T) -> MetrixCollector
        where
            T: AggregatesProcessors,
        {
            let (grant_tx, grant_rx) = create_grant_metrics();
            let (endpoint_tx, endpoint_rx) = create_token_endpoint_metrics();

            add_metrics_to.add_processor(grant_rx);
            add_metrics_to.add_processor(endpoint_rx);

            MetrixCollector {
                grant_transmitter: grant_tx,
                endpoint_transmitter: endpoint_tx,
            }
        }
    }

    impl super::MetricsCollector for MetrixCollector {
        fn incoming_grant_request(&self) {
            self.grant_transmitter
                .observed_one_now(MetricsGrantRequest::IncomingGrantRequest);
        }
        fn grant_request(&self, request_started: Instant) {
            self.grant_transmitter
                .measure_time(MetricsGrantRequest::GrantRequest, request_started);
        }
        fn grant_request_success(&self, request_started: Instant) {
            self.grant_transmitter
                .measure_time(MetricsGrantRequest::GrantRequestSuccess, request_started);
        }
        fn grant_request_failure(&self, request_started: Instant) {
            self.grant_transmitter
                .measure_time(MetricsGrantRequest::GrantRequestFailure, request_started);
        }

        fn token_endpoint_call(&self, request_started: Instant) {
            self.endpoint_transmitter
                .measure_time(MetricsTokenEndpoint::TokenEndpointCall, request_started);
        }
        fn token_endpoint_call_failure(&self, request_started: Instant) {
            self.endpoint_transmitter.measure_time(
                MetricsTokenEndpoint::TokenEndpointCallFailure,
                request_started,
            );
        }
        fn token_endpoint_call_success(&self, request_started: Instant) {
            self.endpoint_transmitter.measure_time(
                MetricsTokenEndpoint::TokenEndpointCallSuccess,
                request_started,
            );
        }
    }

    fn create_grant_metrics() -> (
        TelemetryTransmitterSync<MetricsGrantRequest>,
        TelemetryProcessor<MetricsGrantRequest>,
    ) {
        let mut cockpit: Cockpit<MetricsGrantRequest> = Cockpit::without_name();

        let panel = Panel::with_name(MetricsGrantRequest::IncomingGrantRequest, "incoming");
        add_counting_instruments_to_cockpit(&mut cockpit, panel);

        let panel = Panel::with_name(MetricsGrantRequest::GrantRequest, "all");
        add_counting_and_timing_instruments_to_cockpit(&mut cockpit, panel);

        let panel = Panel::with_name(MetricsGrantRequest::GrantRequestSuccess, "successful");
        add_counting_and_timing_instruments_to_cockpit(&mut cockpit, panel);

        let panel = Panel::with_name(MetricsGrantRequest::GrantRequestFailure, "failed");
        add_counting_and_timing_instruments_to_cockpit(&mut cockpit, panel);

        let (tx, rx) = TelemetryProcessor::new_pair("password_grant");

        tx.add_cockpit(cockpit);

        (tx.synced(), rx)
    }

    fn create_token_endpoint_metrics() -> (
        TelemetryTransmitterSync<MetricsTokenEndpoint>,
        TelemetryProcessor<MetricsTokenEndpoint>,
    ) {
        let mut cockpit: Cockpit<MetricsTokenEndpoint> = Cockpit::without_name();

        let panel = Panel::with_name(MetricsTokenEndpoint::TokenEndpointCall, "all");
        add_counting_and_timing_instruments_to_cockpit(&mut cockpit, panel);

        let panel = Panel::with_name(MetricsTokenEndpoint::TokenEndpointCallSuccess, "successful");
        add_counting_and_timing_instruments_to_cockpit(&mut cockpit, panel);

        let panel = Panel::with_name(MetricsTokenEndpoint::TokenEndpointCallFailure, "failed");
        add_counting_and_timing_instruments_to_cockpit(&mut cockpit, panel);

        let (tx, rx) = TelemetryProcessor::new_pair("token_endpoint");

        tx.add_cockpit(cockpit);

        (tx.synced(), rx)
    }

    fn add_counting_instruments_to_cockpit<L>(cockpit: &mut Cockpit<L>, mut panel: Panel<L>)
    where
        L: Clone + Eq + Send + 'static,
    {
        panel.add_counter(Counter::new_with_defaults("count"));
        panel.add_meter(Meter::new_with_defaults("per_second"));
        cockpit.add_panel(panel);
    }

    fn add_counting_and_timing_instruments_to_cockpit<L>(
        cockpit: &mut Cockpit<L>,
        mut panel: Panel<L>,
    ) where
        L: Clone + Eq + Send + 'static,
    {
        panel.add_counter(Counter::new_with_defaults("count"));
        panel.add_meter(Meter::new_with_defaults("per_second"));
        panel.add_histogram(Histogram::new_with_defaults("time_us"));
        cockpit.add_panel(panel);
    }

}
