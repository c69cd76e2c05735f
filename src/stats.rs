//! Analytics dashboard data: fetching with retry, and the view state around it.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;

use crate::auth::AuthSession;
use crate::client::{Transport, error_message};
use crate::error::{Error, Result};
use crate::observability::{STATS_FAILURES, STATS_FETCHES, STATS_RETRIES, STATS_RETRY_BACKOFF};
use crate::types::{DateRange, StatsPayload, TimeFilter};

/// Retries after the first attempt when none are specified.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Endpoint serving the dashboard payload.
pub const STATS_PATH: &str = "/api/stats";

const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(1000);

/// Authenticated GET with exponential backoff on server and network errors.
#[derive(Clone)]
pub struct StatsFetcher {
    transport: Arc<dyn Transport>,
    backoff_base: Duration,
}

impl StatsFetcher {
    /// Creates a fetcher with a one second backoff base.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }

    /// Overrides the backoff base.
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Delay before retry number `attempt + 1`: `base * 2^attempt`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Fetches and validates the stats payload at `path`.
    ///
    /// Status 401 and other 4xx responses fail at once, as does a payload
    /// missing required fields. Status 5xx and network failures are retried
    /// up to `max_retries` times, sleeping [`backoff_delay`](Self::backoff_delay)
    /// between attempts, so at most `max_retries + 1` requests are made.
    pub async fn fetch_stats(
        &self,
        path: &str,
        token: &str,
        max_retries: u32,
    ) -> Result<StatsPayload> {
        STATS_FETCHES.click();
        let mut attempt = 0;
        loop {
            let err = match self.attempt(path, token).await {
                Ok(payload) => return Ok(payload),
                Err(err) => err,
            };
            if !err.is_retryable() || attempt >= max_retries {
                STATS_FAILURES.click();
                tracing::error!(%path, attempts = attempt + 1, error = %err, "failed to fetch stats");
                return Err(err);
            }
            let delay = self.backoff_delay(attempt);
            STATS_RETRIES.click();
            STATS_RETRY_BACKOFF.add(delay.as_secs_f64());
            tracing::warn!(
                %path,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "retrying stats request"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, path: &str, token: &str) -> Result<StatsPayload> {
        let response = self.transport.get(path, Some(token)).await?;
        match response.status {
            200..=299 => StatsPayload::parse(&response.body),
            401 => Err(Error::authentication(error_message(
                &response.body,
                "Authentication failed. Please log in again.",
            ))),
            status if status >= 500 => Err(Error::server_error(
                status,
                format!("Server error ({status}). Please try again later."),
            )),
            status => Err(Error::api(
                status,
                format!("Failed to fetch dashboard data ({status})"),
            )),
        }
    }
}

/// Filters chosen on the dashboard.
///
/// These shape how results are presented; they are not sent with the
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsQueryState {
    /// Aggregation granularity.
    pub time_filter: TimeFilter,
    /// Inclusive reporting window.
    pub date_range: DateRange,
}

impl Default for StatsQueryState {
    fn default() -> Self {
        Self {
            time_filter: TimeFilter::default(),
            date_range: DateRange::last_week(OffsetDateTime::now_utc().date()),
        }
    }
}

/// State behind the analytics view.
#[derive(Debug, Default)]
pub struct Dashboard {
    query: StatsQueryState,
    stats: StatsPayload,
    error: Option<Error>,
    last_updated: Option<OffsetDateTime>,
}

impl Dashboard {
    /// Creates an empty dashboard with default filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reloads the payload using the signed-in user's token.
    ///
    /// The dashboard is loading for as long as the returned future runs.
    /// On failure the payload is reset to its empty shape and the error is
    /// kept for display as well as returned.
    pub async fn refresh(&mut self, fetcher: &StatsFetcher, auth: &AuthSession) -> Result<()> {
        let result = match auth.token() {
            Some(token) => fetcher.fetch_stats(STATS_PATH, token, DEFAULT_MAX_RETRIES).await,
            None => Err(Error::authentication(
                "Authentication token not found. Please log in again.",
            )),
        };
        match result {
            Ok(stats) => {
                self.stats = stats;
                self.error = None;
                self.last_updated = Some(OffsetDateTime::now_utc());
                Ok(())
            }
            Err(err) => {
                self.stats = StatsPayload::default();
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Changes the aggregation granularity.
    pub fn set_time_filter(&mut self, filter: TimeFilter) {
        self.query.time_filter = filter;
    }

    /// Changes the reporting window.
    pub fn set_date_range(&mut self, range: DateRange) {
        self.query.date_range = range;
    }

    /// Validates and applies a reporting window.
    pub fn set_dates(&mut self, start: time::Date, end: time::Date) -> Result<()> {
        self.set_date_range(DateRange::new(start, end)?);
        Ok(())
    }

    /// The current filters.
    pub fn query(&self) -> &StatsQueryState {
        &self.query
    }

    /// The latest payload, or the empty shape.
    pub fn stats(&self) -> &StatsPayload {
        &self.stats
    }

    /// The error from the latest refresh, if it failed.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// When the payload was last loaded successfully.
    pub fn last_updated(&self) -> Option<OffsetDateTime> {
        self.last_updated
    }
}
