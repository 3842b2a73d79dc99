//! Driver-native policy objects and their defaults

use crate::connection::TlsConfig;
use std::time::Duration;

/// Authentication mode used when logging in to the cluster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// Credentials checked by the server's own user store
    #[default]
    Internal,
    /// Credentials forwarded to an external provider (LDAP)
    External,
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal => write!(f, "internal"),
            Self::External => write!(f, "external"),
        }
    }
}

/// Policy governing how the initial cluster connection is established
#[derive(Clone)]
pub struct ClientPolicy {
    /// Authentication mode
    pub auth_mode: AuthMode,
    /// User name
    pub user: Option<String>,
    /// Password
    pub password: Option<String>,
    /// Socket connect timeout (zero = no deadline)
    pub timeout: Duration,
    /// Idle time before a pooled connection is closed
    pub idle_timeout: Duration,
    /// Login timeout
    pub login_timeout: Duration,
    /// Connections kept per node
    pub connection_queue_size: usize,
    /// Refuse to open more than `connection_queue_size` connections
    pub limit_connections_to_queue_size: bool,
    /// Fail instead of returning a disconnected client
    pub fail_if_not_connected: bool,
    /// Expected cluster name
    pub cluster_name: Option<String>,
    /// TLS configuration; `None` means plaintext
    pub tls_config: Option<TlsConfig>,
}

impl Default for ClientPolicy {
    fn default() -> Self {
        Self {
            auth_mode: AuthMode::default(),
            user: None,
            password: None,
            timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(55),
            login_timeout: Duration::from_secs(10),
            connection_queue_size: 256,
            limit_connections_to_queue_size: true,
            fail_if_not_connected: true,
            cluster_name: None,
            tls_config: None,
        }
    }
}

impl std::fmt::Debug for ClientPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientPolicy")
            .field("auth_mode", &self.auth_mode)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("idle_timeout", &self.idle_timeout)
            .field("login_timeout", &self.login_timeout)
            .field("connection_queue_size", &self.connection_queue_size)
            .field(
                "limit_connections_to_queue_size",
                &self.limit_connections_to_queue_size,
            )
            .field("fail_if_not_connected", &self.fail_if_not_connected)
            .field("cluster_name", &self.cluster_name)
            .field("tls_config", &self.tls_config)
            .finish()
    }
}

/// Common per-operation policy, used directly for reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasePolicy {
    /// Socket idle timeout per attempt
    pub socket_timeout: Duration,
    /// Total transaction timeout (zero = unbounded)
    pub total_timeout: Duration,
    /// Maximum retries before aborting
    pub max_retries: u32,
    /// Sleep between retries
    pub sleep_between_retries: Duration,
}

impl Default for BasePolicy {
    fn default() -> Self {
        Self {
            socket_timeout: Duration::from_secs(30),
            total_timeout: Duration::from_secs(1),
            max_retries: 2,
            sleep_between_retries: Duration::from_millis(1),
        }
    }
}

impl BasePolicy {
    /// Defaults for long-running multi-record operations (scan, query)
    fn multi_record() -> Self {
        Self {
            total_timeout: Duration::ZERO,
            max_retries: 5,
            ..Self::default()
        }
    }
}

/// Write policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WritePolicy {
    /// Shared operation settings
    pub base_policy: BasePolicy,
    /// Expected record generation (0 = ignore)
    pub generation: u32,
    /// Record TTL in seconds (0 = namespace default)
    pub expiration: u32,
}

impl WritePolicy {
    /// Write policy with the given generation and expiration
    pub fn new(generation: u32, expiration: u32) -> Self {
        Self {
            base_policy: BasePolicy::default(),
            generation,
            expiration,
        }
    }
}

/// Scan policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPolicy {
    /// Shared operation settings
    pub base_policy: BasePolicy,
    /// Return bin data along with record metadata
    pub include_bin_data: bool,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            base_policy: BasePolicy::multi_record(),
            include_bin_data: true,
        }
    }
}

/// Query policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    /// Shared operation settings
    pub base_policy: BasePolicy,
    /// Return bin data along with record metadata
    pub include_bin_data: bool,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self {
            base_policy: BasePolicy::multi_record(),
            include_bin_data: true,
        }
    }
}

/// Info request policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoPolicy {
    /// Info request timeout
    pub timeout: Duration,
}

impl Default for InfoPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(1),
        }
    }
}
