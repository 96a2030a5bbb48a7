//! Mediator counters.
//!
//! Recorded through the `metrics` facade; they go nowhere until the binary
//! installs a recorder.

use ::metrics::counter;

/// Dispatches by request type and outcome.
pub(crate) const DISPATCH_TOTAL: &str = "herald_dispatch_total";

/// Failures reported for rejected requests, by request type.
pub(crate) const VALIDATION_FAILURES_TOTAL: &str = "herald_validation_failures_total";

/// Records a dispatch. `outcome` is `ok`, `error` or `not_found`.
pub(crate) fn record_dispatch(request_type: &'static str, outcome: &'static str) {
    counter!(
        DISPATCH_TOTAL,
        "request_type" => request_type,
        "outcome" => outcome
    )
    .increment(1);
}

/// Records the number of failures reported for one rejected request.
pub(crate) fn record_validation_failures(request_type: &'static str, count: usize) {
    counter!(VALIDATION_FAILURES_TOTAL, "request_type" => request_type)
        .increment(u64::try_from(count).unwrap_or(u64::MAX));
}
