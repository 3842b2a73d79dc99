//! Error types
//!
//! Every bootstrapping stage wraps its failure with a short stage label so the
//! rendered message tells the caller which step failed.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed driver error carried by [`Error::Connect`]
pub type DriverFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be opened
    #[error("could not open config file '{}': {source}", .path.display())]
    ConfigOpen {
        /// Path that was opened
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration content did not decode into the target structure
    #[error("decoding configuration file: {0}")]
    ConfigDecode(#[from] serde_yaml::Error),

    /// Required configuration field missing
    #[error("config check: {0}")]
    ConfigCheck(String),

    /// Connect policy could not be built
    #[error("create connect policy: {0}")]
    ConnectPolicy(#[from] TlsError),

    /// The driver failed to connect within the retry budget
    ///
    /// Carries the last driver error unchanged.
    #[error("connect: {0}")]
    Connect(#[source] DriverFailure),

    /// Operation policies could not be derived
    #[error("makePolicies: {0}")]
    MakePolicies(String),
}

/// TLS material errors raised while building the connect policy
#[derive(Debug, Error)]
pub enum TlsError {
    /// CA bundle unreadable or unparsable
    #[error("tls: loadca: {0}")]
    LoadCa(String),

    /// Client certificate / private key pair unreadable or unparsable
    #[error("tls: loadkeys: {0}")]
    LoadKeys(String),

    /// No usable root certificates
    #[error("tls: roots: {0}")]
    Roots(String),
}

impl Error {
    /// Short label of the stage that produced this error
    pub fn stage(&self) -> &'static str {
        match self {
            Error::ConfigOpen { .. } | Error::ConfigDecode(_) => "load",
            Error::ConfigCheck(_) => "config_check",
            Error::ConnectPolicy(_) => "connect_policy",
            Error::Connect(_) => "connect",
            Error::MakePolicies(_) => "make_policies",
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
