use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("groqchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("groqchat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("groqchat.client.request_duration_seconds");

pub(crate) static CONNECTOR_EMPTY_RESPONSES: Counter =
    Counter::new("groqchat.connector.empty_responses");
pub(crate) static CONNECTOR_PROBE_FAILURES: Counter =
    Counter::new("groqchat.connector.probe_failures");

pub(crate) static HISTORY_APPENDS: Counter = Counter::new("groqchat.history.appends");
pub(crate) static HISTORY_ERRORS: Counter = Counter::new("groqchat.history.errors");

pub(crate) static SESSION_COMMANDS: Counter = Counter::new("groqchat.session.commands");
pub(crate) static SESSION_QUERIES: Counter = Counter::new("groqchat.session.queries");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&CONNECTOR_EMPTY_RESPONSES);
    collector.register_counter(&CONNECTOR_PROBE_FAILURES);

    collector.register_counter(&HISTORY_APPENDS);
    collector.register_counter(&HISTORY_ERRORS);

    collector.register_counter(&SESSION_COMMANDS);
    collector.register_counter(&SESSION_QUERIES);
}
