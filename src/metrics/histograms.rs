//! Histogram metrics

use super::labels;

/// Time spent connecting, across all attempts
pub fn connect_duration(duration_ms: u64) {
    ::metrics::histogram!(labels::CONNECT_DURATION_MS).record(duration_ms as f64);
}
