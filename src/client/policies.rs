//! Per-operation policy derivation

use crate::config::{AerospikeConfig, TransactionPolicyConfig};
use crate::driver::{BasePolicy, InfoPolicy, QueryPolicy, ScanPolicy, WritePolicy};
use crate::Result;
use std::time::Duration;

/// Policies for requests issued after the connection is up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationPolicies {
    /// Read policy
    pub read: BasePolicy,
    /// Write policy
    pub write: WritePolicy,
    /// Scan policy
    pub scan: ScanPolicy,
    /// Query policy
    pub query: QueryPolicy,
    /// Info policy
    pub info: InfoPolicy,
}

/// Derive the five operation policies.
///
/// Each starts from the driver default and is overridden only where the
/// configuration has a value.
///
/// # Errors
///
/// Never fails today; the `Result` lets the orchestrator surface a failure
/// while keeping the live connection.
pub fn derive_policies(config: &AerospikeConfig) -> Result<OperationPolicies> {
    let mut policies = OperationPolicies::default();

    let Some(configured) = config.policies.as_ref() else {
        return Ok(policies);
    };

    if let Some(read) = &configured.read {
        apply(&mut policies.read, read);
    }
    if let Some(write) = &configured.write {
        apply(&mut policies.write.base_policy, write);
    }
    if let Some(scan) = &configured.scan {
        apply(&mut policies.scan.base_policy, scan);
    }
    if let Some(query) = &configured.query {
        apply(&mut policies.query.base_policy, query);
    }
    if let Some(timeout) = configured.info.as_ref().and_then(|i| i.timeout_ms) {
        policies.info.timeout = Duration::from_millis(timeout);
    }

    Ok(policies)
}

fn apply(policy: &mut BasePolicy, config: &TransactionPolicyConfig) {
    if let Some(max_retries) = config.max_retries {
        policy.max_retries = max_retries;
    }
    if let Some(timeouts) = &config.timeout_ms {
        if let Some(sleep) = timeouts.sleep_between_retries {
            policy.sleep_between_retries = Duration::from_millis(sleep);
        }
        if let Some(socket) = timeouts.socket {
            policy.socket_timeout = Duration::from_millis(socket);
        }
        if let Some(total) = timeouts.total {
            policy.total_timeout = Duration::from_millis(total);
        }
    }
}
