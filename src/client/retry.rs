//! Bounded-retry initial connection

use crate::config::AerospikeConfig;
use crate::driver::{ClientPolicy, Driver};
use crate::metrics::{counters, histograms, labels};
use std::time::{Duration, Instant};

/// Time budget used when neither an override nor any base timeout is configured
pub const DEFAULT_MAX_RETRY_TIME: Duration = Duration::from_millis(30_000);

/// Attempt and time limits for the initial connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    /// Maximum number of attempts, at least 1
    pub max_attempts: u32,
    /// Stop retrying once this much time has passed since the first attempt
    /// (zero = no time cutoff)
    pub max_retry_time: Duration,
    /// Pause between attempts
    pub retry_sleep: Duration,
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            max_retry_time: DEFAULT_MAX_RETRY_TIME,
            retry_sleep: Duration::ZERO,
        }
    }
}

impl RetryBudget {
    /// Derive the budget from the configuration.
    ///
    /// The time budget is, in order of precedence: `maxConnectRetryTimeMs`;
    /// the sum of the connect and login base timeouts when either is set;
    /// [`DEFAULT_MAX_RETRY_TIME`].
    pub fn from_config(config: &AerospikeConfig) -> Self {
        let max_attempts = config
            .max_connect_attempts
            .filter(|&attempts| attempts > 0)
            .map_or(1, |attempts| u32::try_from(attempts).unwrap_or(u32::MAX));

        let mut max_retry_time = match config.base_timeouts() {
            Some(t) if t.connect.is_some() || t.login.is_some() => Duration::from_millis(
                t.connect
                    .unwrap_or(0)
                    .saturating_add(t.login.unwrap_or(0)),
            ),
            _ => DEFAULT_MAX_RETRY_TIME,
        };
        if let Some(ms) = config.max_connect_retry_time_ms {
            max_retry_time = Duration::from_millis(ms);
        }

        let retry_sleep = config
            .connect_retry_sleep_ms
            .filter(|&ms| ms > 0)
            .map_or(Duration::ZERO, |ms| Duration::from_millis(ms.unsigned_abs()));

        Self {
            max_attempts,
            max_retry_time,
            retry_sleep,
        }
    }
}

/// Connect through `driver`, retrying within `budget`.
///
/// At least one attempt is always made. On failure the attempt counter is
/// bumped and the loop stops when it exceeds `max_attempts`, or when the time
/// budget is non-zero and already spent; otherwise it sleeps `retry_sleep` and
/// tries again. The last driver error is returned as is.
pub async fn connect_with_retry<D: Driver>(
    driver: &D,
    policy: &ClientPolicy,
    host: &str,
    port: u16,
    budget: &RetryBudget,
) -> Result<D::Client, D::Error> {
    let started = Instant::now();
    let mut attempt: u32 = 1;

    loop {
        tracing::debug!(attempt, host, port, "connecting");
        counters::connect_attempted();

        let err = match driver.connect(policy, host, port).await {
            Ok(client) => {
                histograms::connect_duration(started.elapsed().as_millis() as u64);
                tracing::info!(attempt, host, port, "connected");
                return Ok(client);
            }
            Err(err) => err,
        };

        tracing::warn!(attempt, error = %err, "connect attempt failed");
        attempt = attempt.saturating_add(1);

        let elapsed = started.elapsed();
        let out_of_time = !budget.max_retry_time.is_zero() && elapsed > budget.max_retry_time;
        if attempt > budget.max_attempts || out_of_time {
            let reason = if out_of_time {
                labels::REASON_TIME_BUDGET
            } else {
                labels::REASON_ATTEMPTS
            };
            counters::connect_failed(reason);
            histograms::connect_duration(elapsed.as_millis() as u64);
            tracing::debug!(attempts = attempt - 1, ?elapsed, reason, "giving up");
            return Err(err);
        }

        if !budget.retry_sleep.is_zero() {
            tokio::time::sleep(budget.retry_sleep).await;
        }
    }
}
