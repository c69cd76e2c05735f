use biometrics::{Collector, Counter, Moments};

pub(crate) static HTTP_REQUESTS: Counter = Counter::new("unibot.http.requests");
pub(crate) static HTTP_REQUEST_ERRORS: Counter = Counter::new("unibot.http.request_errors");
pub(crate) static HTTP_REQUEST_DURATION: Moments =
    Moments::new("unibot.http.request_duration_seconds");

pub(crate) static CHAT_SUBMISSIONS: Counter = Counter::new("unibot.chat.submissions");
pub(crate) static CHAT_FAILURES: Counter = Counter::new("unibot.chat.failures");
pub(crate) static CHAT_REJECTED: Counter = Counter::new("unibot.chat.rejected");
pub(crate) static CHAT_EXPORTS: Counter = Counter::new("unibot.chat.exports");

pub(crate) static STATS_FETCHES: Counter = Counter::new("unibot.stats.fetches");
pub(crate) static STATS_RETRIES: Counter = Counter::new("unibot.stats.retries");
pub(crate) static STATS_FAILURES: Counter = Counter::new("unibot.stats.failures");
pub(crate) static STATS_RETRY_BACKOFF: Moments =
    Moments::new("unibot.stats.retry_backoff_seconds");

pub(crate) static AUTH_LOGINS: Counter = Counter::new("unibot.auth.logins");
pub(crate) static AUTH_FAILURES: Counter = Counter::new("unibot.auth.failures");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&HTTP_REQUESTS);
    collector.register_counter(&HTTP_REQUEST_ERRORS);
    collector.register_moments(&HTTP_REQUEST_DURATION);

    collector.register_counter(&CHAT_SUBMISSIONS);
    collector.register_counter(&CHAT_FAILURES);
    collector.register_counter(&CHAT_REJECTED);
    collector.register_counter(&CHAT_EXPORTS);

    collector.register_counter(&STATS_FETCHES);
    collector.register_counter(&STATS_RETRIES);
    collector.register_counter(&STATS_FAILURES);
    collector.register_moments(&STATS_RETRY_BACKOFF);

    collector.register_counter(&AUTH_LOGINS);
    collector.register_counter(&AUTH_FAILURES);
}
