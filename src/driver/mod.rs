//! Driver boundary
//!
//! The bootstrapper only needs one thing from a database driver: "connect to
//! this seed node with this policy". Everything past that (cluster discovery,
//! the wire protocol, per-operation retries) stays inside the driver.

mod policy;

pub use policy::{AuthMode, BasePolicy, ClientPolicy, InfoPolicy, QueryPolicy, ScanPolicy, WritePolicy};

use crate::connection::Transport;
use std::future::Future;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// A database driver able to open a client from a seed node
pub trait Driver {
    /// Connected client handle
    type Client;
    /// Connection failure
    type Error: std::error::Error + Send + Sync + 'static;

    /// Make one connection attempt to the seed node.
    fn connect(
        &self,
        policy: &ClientPolicy,
        host: &str,
        port: u16,
    ) -> impl Future<Output = Result<Self::Client, Self::Error>> + Send;
}

/// [`TcpDriver`] connection failures
#[derive(Debug, Error)]
pub enum DriverError {
    /// Socket-level failure (refused, unreachable, TLS handshake)
    #[error("{host}:{port}: {source}")]
    Io {
        /// Seed host
        host: String,
        /// Seed port
        port: u16,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Connect did not finish within `ClientPolicy::timeout`
    #[error("{host}:{port}: connect timed out after {timeout:?}")]
    Timeout {
        /// Seed host
        host: String,
        /// Seed port
        port: u16,
        /// Deadline that expired
        timeout: Duration,
    },
}

/// Reference driver: opens the seed-node socket, optionally over TLS.
///
/// It honours `timeout`, `tls_config` and `fail_if_not_connected` from the
/// [`ClientPolicy`]; the remaining fields are carried for drivers that speak
/// the cluster protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpDriver;

impl TcpDriver {
    async fn open(policy: &ClientPolicy, host: &str, port: u16) -> io::Result<Transport> {
        let transport = Transport::connect_tcp(host, port).await?;
        match &policy.tls_config {
            Some(tls) => transport.upgrade_to_tls(tls, host).await,
            None => Ok(transport),
        }
    }
}

impl Driver for TcpDriver {
    type Client = SeedClient;
    type Error = DriverError;

    async fn connect(
        &self,
        policy: &ClientPolicy,
        host: &str,
        port: u16,
    ) -> Result<SeedClient, DriverError> {
        let result = if policy.timeout.is_zero() {
            Self::open(policy, host, port)
                .await
                .map_err(|source| DriverError::Io {
                    host: host.to_string(),
                    port,
                    source,
                })
        } else {
            match tokio::time::timeout(policy.timeout, Self::open(policy, host, port)).await {
                Ok(opened) => opened.map_err(|source| DriverError::Io {
                    host: host.to_string(),
                    port,
                    source,
                }),
                Err(_) => Err(DriverError::Timeout {
                    host: host.to_string(),
                    port,
                    timeout: policy.timeout,
                }),
            }
        };

        let transport = match result {
            Ok(transport) => Some(transport),
            Err(e) if !policy.fail_if_not_connected => {
                tracing::warn!(error = %e, "seed node unreachable, returning disconnected client");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(SeedClient {
            host: host.to_string(),
            port,
            cluster_name: policy.cluster_name.clone(),
            transport,
        })
    }
}

/// Client produced by [`TcpDriver`]: an open socket to the seed node
#[derive(Debug)]
pub struct SeedClient {
    host: String,
    port: u16,
    cluster_name: Option<String>,
    transport: Option<Transport>,
}

impl SeedClient {
    /// Seed host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Seed port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Expected cluster name
    pub fn cluster_name(&self) -> Option<&str> {
        self.cluster_name.as_deref()
    }

    /// Whether the seed socket is open
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Whether the seed socket is TLS-encrypted
    pub fn is_tls(&self) -> bool {
        self.transport.as_ref().is_some_and(Transport::is_tls)
    }

    /// Close the seed socket
    pub async fn close(mut self) -> io::Result<()> {
        if let Some(mut transport) = self.transport.take() {
            transport.shutdown().await?;
        }
        Ok(())
    }
}
