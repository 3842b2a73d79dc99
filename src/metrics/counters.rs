//! Counter metrics

use super::labels;

/// One connection attempt started
pub fn connect_attempted() {
    ::metrics::counter!(labels::CONNECT_ATTEMPTS_TOTAL).increment(1);
}

/// Bootstrap connected
pub fn connect_succeeded() {
    ::metrics::counter!(labels::CONNECT_SUCCESS_TOTAL).increment(1);
}

/// Bootstrap failed; `reason` is a stage label or one of the `REASON_*` values
pub fn connect_failed(reason: &'static str) {
    ::metrics::counter!(labels::CONNECT_FAILURES_TOTAL, labels::REASON => reason).increment(1);
}
