//! Connection configuration model
//!
//! Every field is an explicit `Option`: an absent field means "defer to the
//! driver default", which is not the same thing as a field set to zero or
//! `false`. Records serialize back with absent fields omitted, so a decoded
//! configuration can be compared field-for-field with its source document.

mod loader;

pub use loader::{load_config, parse_config};

use serde::{Deserialize, Serialize};

/// Top-level connection configuration
///
/// Usually embedded under an application-chosen key:
///
/// ```yaml
/// aerospike:
///   host: 127.0.0.1
///   port: 3000
///   maxConnectAttempts: 3
///   policies:
///     base:
///       timeoutMs:
///         connect: 1000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AerospikeConfig {
    /// Seed host (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Seed port (required)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Per-node connection queue size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_queue_size: Option<usize>,
    /// Hard-limit open connections to `connection_queue_size`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_connections_to_queue_size: Option<bool>,
    /// Expected cluster name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    /// Maximum initial connect attempts (values below 1 mean one attempt)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connect_attempts: Option<i64>,
    /// Overall retry time budget in milliseconds (0 disables the time cutoff)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connect_retry_time_ms: Option<u64>,
    /// Sleep between connect attempts in milliseconds (values below 1 mean no sleep)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_retry_sleep_ms: Option<i64>,
    /// Timeouts and per-operation policies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<PoliciesConfig>,
    /// Credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityConfig>,
    /// Transport security
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsSettings>,
}

/// Base timeouts and per-operation-kind policies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoliciesConfig {
    /// Connection-level timeouts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<BasePolicyConfig>,
    /// Read policy overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<TransactionPolicyConfig>,
    /// Write policy overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write: Option<TransactionPolicyConfig>,
    /// Scan policy overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan: Option<TransactionPolicyConfig>,
    /// Query policy overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<TransactionPolicyConfig>,
    /// Info policy overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<InfoPolicyConfig>,
}

/// Connection-level policy block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasePolicyConfig {
    /// Connection-level timeouts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<BaseTimeoutsConfig>,
}

/// Connection-level timeouts, in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseTimeoutsConfig {
    /// Socket connect timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect: Option<u64>,
    /// Idle connection reap timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle: Option<u64>,
    /// Login timeout, only honoured when credentials are configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<u64>,
}

/// Overrides for a read, write, scan or query policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPolicyConfig {
    /// Timeouts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<TransactionTimeoutsConfig>,
    /// Maximum retries before the operation is aborted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

/// Operation timeouts, in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionTimeoutsConfig {
    /// Socket idle timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<u64>,
    /// Total transaction timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Sleep between operation retries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_between_retries: Option<u64>,
}

/// Overrides for the info policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoPolicyConfig {
    /// Info request timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Authentication settings
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfig {
    /// User name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// `true` selects external (LDAP) authentication, `false` internal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_mode_external: Option<bool>,
}

impl SecurityConfig {
    /// Whether a username or password is configured
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("auth_mode_external", &self.auth_mode_external)
            .finish()
    }
}

/// Transport security settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsSettings {
    /// PEM bundle of trusted CA certificates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_file: Option<String>,
    /// PEM client certificate chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<String>,
    /// PEM client private key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,
    /// Expected server name for certificate verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    /// Disable server certificate verification
    #[serde(
        default,
        rename = "InsecureSkipVerify",
        alias = "insecureSkipVerify",
        skip_serializing_if = "Option::is_none"
    )]
    pub insecure_skip_verify: Option<bool>,
}

impl TlsSettings {
    /// TLS is only switched on when some certificate material or a server name is given
    pub fn is_requested(&self) -> bool {
        self.ca_file.is_some()
            || self.cert_file.is_some()
            || self.key_file.is_some()
            || self.server_name.is_some()
    }
}

impl AerospikeConfig {
    /// Base timeouts, if any are configured
    pub fn base_timeouts(&self) -> Option<&BaseTimeoutsConfig> {
        self.policies.as_ref()?.base.as_ref()?.timeout_ms.as_ref()
    }

    /// Whether a username or password is configured
    pub fn has_credentials(&self) -> bool {
        self.security
            .as_ref()
            .is_some_and(SecurityConfig::has_credentials)
    }

    /// Check the fields that must be present before any network action
    ///
    /// Returns the seed host and port.
    pub fn seed(&self) -> Result<(&str, u16), String> {
        let host = self
            .host
            .as_deref()
            .ok_or_else(|| "aerospike seed host not specified".to_string())?;
        let port = self
            .port
            .ok_or_else(|| "aerospike seed port not specified".to_string())?;
        Ok((host, port))
    }
}
