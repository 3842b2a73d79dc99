//! Metric names and label values

/// Connection attempts made against the seed node
pub const CONNECT_ATTEMPTS_TOTAL: &str = "aerospike_connect_attempts_total";
/// Failed bootstrap calls, labelled by reason
pub const CONNECT_FAILURES_TOTAL: &str = "aerospike_connect_failures_total";
/// Successful bootstrap calls
pub const CONNECT_SUCCESS_TOTAL: &str = "aerospike_connect_success_total";
/// Wall-clock time spent in the retry loop
pub const CONNECT_DURATION_MS: &str = "aerospike_connect_duration_ms";

/// Label key for failure reason
pub const REASON: &str = "reason";

/// Retry attempts exhausted
pub const REASON_ATTEMPTS: &str = "attempts_exhausted";
/// Retry time budget exceeded
pub const REASON_TIME_BUDGET: &str = "time_budget_exceeded";
/// Required seed host or port missing
pub const REASON_CONFIG_CHECK: &str = "config_check";
/// Connect policy could not be built
pub const REASON_CONNECT_POLICY: &str = "connect_policy";
