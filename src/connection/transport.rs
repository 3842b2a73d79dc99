//! Transport abstraction (TCP with optional TLS)

use super::tls::{parse_server_name, TlsConfig};
use std::io;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Seed-node transport: plain or TLS-encrypted TCP
#[allow(clippy::large_enum_variant)]
pub enum Transport {
    /// Plain TCP connection
    Plain(TcpStream),
    /// TLS-encrypted TCP connection
    Tls(tokio_rustls::client::TlsStream<TcpStream>),
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Plain(_) => f.write_str("Transport::Plain(TcpStream)"),
            Transport::Tls(_) => f.write_str("Transport::Tls(TlsStream)"),
        }
    }
}

impl Transport {
    /// Connect via plain TCP
    pub async fn connect_tcp(host: &str, port: u16) -> io::Result<Self> {
        let stream = TcpStream::connect((host, port)).await?;
        stream.set_nodelay(true)?;
        Ok(Transport::Plain(stream))
    }

    /// Upgrade a plain TCP transport to TLS.
    ///
    /// The certificate is verified against `tls_config.server_name()` when set,
    /// otherwise against `host`.
    pub async fn upgrade_to_tls(self, tls_config: &TlsConfig, host: &str) -> io::Result<Self> {
        match self {
            Transport::Plain(tcp_stream) => {
                let name = tls_config.server_name().unwrap_or(host);
                let server_name = parse_server_name(name)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
                let server_name = rustls_pki_types::ServerName::try_from(server_name)
                    .map_err(|e| {
                        io::Error::new(
                            io::ErrorKind::InvalidInput,
                            format!("invalid hostname for TLS '{}': {}", name, e),
                        )
                    })?;

                let tls_connector = tokio_rustls::TlsConnector::from(tls_config.client_config());
                let tls_stream = tls_connector.connect(server_name, tcp_stream).await?;

                Ok(Transport::Tls(tls_stream))
            }
            Transport::Tls(_) => Err(io::Error::new(
                io::ErrorKind::Other,
                "transport is already TLS-encrypted",
            )),
        }
    }

    /// Whether the transport is TLS-encrypted
    pub fn is_tls(&self) -> bool {
        matches!(self, Transport::Tls(_))
    }

    /// Shutdown the transport
    pub async fn shutdown(&mut self) -> io::Result<()> {
        match self {
            Transport::Plain(stream) => stream.shutdown().await,
            Transport::Tls(stream) => stream.shutdown().await,
        }
    }
}
