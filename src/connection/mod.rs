//! Connection management
//!
//! This module handles:
//! * Transport to the seed node (plain TCP or TLS)
//! * TLS configuration and certificate material loading

mod tls;
mod transport;

pub use tls::{parse_server_name, TlsConfig, TlsConfigBuilder};
pub use transport::Transport;
