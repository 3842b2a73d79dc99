//! Aerospike handle and the connect orchestrator

use super::connect_policy::build_connect_policy;
use super::policies::{derive_policies, OperationPolicies};
use super::retry::{connect_with_retry, RetryBudget};
use crate::config::AerospikeConfig;
use crate::driver::{Driver, SeedClient, TcpDriver};
use crate::metrics::{counters, labels};
use crate::{Error, Result};
use tracing::Instrument;

/// Connected client plus the policies derived for it
#[derive(Debug)]
pub struct Aerospike<C = SeedClient> {
    /// Driver client
    pub client: C,
    /// Read, write, scan, query and info policies
    pub policies: OperationPolicies,
}

impl Aerospike<SeedClient> {
    /// Connect with the reference [`TcpDriver`]
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example() -> aerospike_connect::Result<()> {
    /// use aerospike_connect::{parse_config, Aerospike, AerospikeConfig};
    ///
    /// let config: AerospikeConfig = parse_config("host: 127.0.0.1\nport: 3000\n")?;
    /// let aero = Aerospike::connect(&config).await.into_result()?;
    /// assert!(aero.client.is_connected());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(config: &AerospikeConfig) -> ConnectOutcome<SeedClient> {
        connect_with_driver(&TcpDriver, config).await
    }

    /// Close the seed connection
    pub async fn close(self) -> std::io::Result<()> {
        self.client.close().await
    }
}

/// Result of a connect call.
///
/// Unlike a plain `Result`, a handle and an error can both be present: when
/// policy derivation fails the connection is already live and is handed back
/// with driver-default policies alongside the error. An outcome always holds
/// at least one of the two.
#[derive(Debug)]
#[must_use = "the outcome may carry an error"]
pub struct ConnectOutcome<C> {
    state: OutcomeState<C>,
}

#[derive(Debug)]
enum OutcomeState<C> {
    Connected(Aerospike<C>),
    Partial(Aerospike<C>, Error),
    Failed(Error),
}

impl<C> ConnectOutcome<C> {
    fn ok(handle: Aerospike<C>) -> Self {
        Self {
            state: OutcomeState::Connected(handle),
        }
    }

    fn partial(handle: Aerospike<C>, error: Error) -> Self {
        Self {
            state: OutcomeState::Partial(handle, error),
        }
    }

    fn failed(error: Error) -> Self {
        Self {
            state: OutcomeState::Failed(error),
        }
    }

    /// Whether the call fully succeeded
    pub fn is_ok(&self) -> bool {
        matches!(self.state, OutcomeState::Connected(_))
    }

    /// Connected handle, if the connect stage succeeded
    pub fn handle(&self) -> Option<&Aerospike<C>> {
        match &self.state {
            OutcomeState::Connected(handle) | OutcomeState::Partial(handle, _) => Some(handle),
            OutcomeState::Failed(_) => None,
        }
    }

    /// First error encountered, if any
    pub fn error(&self) -> Option<&Error> {
        match &self.state {
            OutcomeState::Connected(_) => None,
            OutcomeState::Partial(_, error) | OutcomeState::Failed(error) => Some(error),
        }
    }

    /// Handle and error, both optional
    pub fn into_parts(self) -> (Option<Aerospike<C>>, Option<Error>) {
        match self.state {
            OutcomeState::Connected(handle) => (Some(handle), None),
            OutcomeState::Partial(handle, error) => (Some(handle), Some(error)),
            OutcomeState::Failed(error) => (None, Some(error)),
        }
    }

    /// Collapse into a `Result`, dropping a partially usable handle on error
    pub fn into_result(self) -> Result<Aerospike<C>> {
        match self.state {
            OutcomeState::Connected(handle) => Ok(handle),
            OutcomeState::Partial(_, error) | OutcomeState::Failed(error) => Err(error),
        }
    }
}

/// Validate, build the connect policy, connect with retry, then derive the
/// operation policies.
///
/// Every stage error is wrapped with its stage label and returned at once. A
/// policy derivation failure still returns the connected handle.
pub async fn connect_with_driver<D: Driver>(
    driver: &D,
    config: &AerospikeConfig,
) -> ConnectOutcome<D::Client> {
    let (host, port) = match config.seed() {
        Ok(seed) => seed,
        Err(reason) => {
            counters::connect_failed(labels::REASON_CONFIG_CHECK);
            return ConnectOutcome::failed(Error::ConfigCheck(reason));
        }
    };

    async {
        let policy = match build_connect_policy(config) {
            Ok(policy) => policy,
            Err(e) => {
                counters::connect_failed(labels::REASON_CONNECT_POLICY);
                tracing::error!(error = %e, "connect policy rejected");
                return ConnectOutcome::failed(e.into());
            }
        };

        let budget = RetryBudget::from_config(config);
        tracing::debug!(
            max_attempts = budget.max_attempts,
            max_retry_time = ?budget.max_retry_time,
            retry_sleep = ?budget.retry_sleep,
            tls = policy.tls_config.is_some(),
            "connect policy ready"
        );

        let client = match connect_with_retry(driver, &policy, host, port, &budget).await {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = %e, "connect failed");
                return ConnectOutcome::failed(Error::Connect(Box::new(e)));
            }
        };
        counters::connect_succeeded();

        match derive_policies(config) {
            Ok(policies) => ConnectOutcome::ok(Aerospike { client, policies }),
            Err(e) => {
                tracing::warn!(error = %e, "operation policies not derived, using defaults");
                ConnectOutcome::partial(
                    Aerospike {
                        client,
                        policies: OperationPolicies::default(),
                    },
                    Error::MakePolicies(e.to_string()),
                )
            }
        }
    }
    .instrument(tracing::info_span!("connect", host = %host, port))
    .await
}
