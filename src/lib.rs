//! aerospike-connect: configuration-driven connection bootstrapping
//!
//! Turns a YAML descriptor into a connected client handle:
//!
//! * decode the descriptor into a presence-tracked [`AerospikeConfig`]
//! * translate it into a driver-native [`ClientPolicy`] (auth, TLS, queue sizing)
//! * connect to the seed node with a bounded attempt/time budget
//! * derive the read, write, scan, query and info policies
//!
//! The wire protocol, cluster discovery and in-flight retries belong to the
//! driver behind the [`Driver`] trait. [`TcpDriver`] is a reference driver that
//! establishes the seed connection (plain or TLS) and nothing more.
//!
//! ```no_run
//! # async fn example() -> aerospike_connect::Result<()> {
//! use aerospike_connect::{load_config, Aerospike, AerospikeConfig};
//!
//! let config: AerospikeConfig = load_config("aerospike.yml")?;
//! let aero = Aerospike::connect(&config).await.into_result()?;
//! println!("read timeout: {:?}", aero.policies.read.total_timeout);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod connection;
pub mod driver;
pub mod error;
pub mod metrics;

pub use client::{
    build_connect_policy, connect_with_driver, derive_policies, Aerospike, ConnectOutcome,
    OperationPolicies, RetryBudget,
};
pub use config::{load_config, parse_config, AerospikeConfig};
pub use driver::{
    AuthMode, BasePolicy, ClientPolicy, Driver, InfoPolicy, QueryPolicy, ScanPolicy, SeedClient,
    TcpDriver, WritePolicy,
};
pub use error::{Error, Result, TlsError};
