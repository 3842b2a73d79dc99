//! Connection bootstrapper
//!
//! `connect_with_driver` runs the stages in order: config check, connect
//! policy, bounded-retry connect, operation policies.

mod aerospike;
mod connect_policy;
mod policies;
mod retry;

pub use aerospike::{connect_with_driver, Aerospike, ConnectOutcome};
pub use connect_policy::build_connect_policy;
pub use policies::{derive_policies, OperationPolicies};
pub use retry::{connect_with_retry, RetryBudget, DEFAULT_MAX_RETRY_TIME};
