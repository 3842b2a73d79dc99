//! TLS configuration for secure connections to cluster nodes.
//!
//! This module loads CA bundles and client key pairs from PEM files and
//! compiles them into a rustls `ClientConfig`. The handshake itself is done by
//! rustls when the transport is upgraded.

use crate::TlsError;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use rustls_pemfile::Item;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// TLS configuration for cluster connections.
///
/// By default, server certificates are validated against the platform root
/// certificates, falling back to the bundled webpki roots.
///
/// # Examples
///
/// ```ignore
/// use aerospike_connect::connection::TlsConfig;
///
/// // Custom CA and expected server name
/// let tls = TlsConfig::builder()
///     .ca_file("/etc/aerospike/ca.pem")
///     .server_name("cluster.internal")
///     .build()?;
///
/// // Mutual TLS
/// let tls = TlsConfig::builder()
///     .ca_file("/etc/aerospike/ca.pem")
///     .client_cert_path("/etc/aerospike/client.pem")
///     .client_key_path("/etc/aerospike/client.key")
///     .build()?;
/// ```
#[derive(Clone)]
pub struct TlsConfig {
    /// Path to CA bundle (None = platform roots)
    ca_file: Option<PathBuf>,
    /// Server name used for verification instead of the seed host
    server_name: Option<String>,
    /// Whether server certificate verification is disabled
    insecure_skip_verify: bool,
    /// Whether a client certificate is presented
    client_auth: bool,
    /// Compiled rustls ClientConfig
    client_config: Arc<ClientConfig>,
}

impl TlsConfig {
    /// Create a new TLS configuration builder.
    pub fn builder() -> TlsConfigBuilder {
        TlsConfigBuilder::default()
    }

    /// Get the rustls ClientConfig for this TLS configuration.
    pub fn client_config(&self) -> Arc<ClientConfig> {
        self.client_config.clone()
    }

    /// Server name override used for SNI and hostname verification.
    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    /// Check if server certificate verification is disabled.
    pub fn insecure_skip_verify(&self) -> bool {
        self.insecure_skip_verify
    }

    /// Path of the custom CA bundle, if one was loaded.
    pub fn ca_file(&self) -> Option<&Path> {
        self.ca_file.as_deref()
    }

    /// Check if a client certificate is presented to the server.
    pub fn has_client_cert(&self) -> bool {
        self.client_auth
    }
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("ca_file", &self.ca_file)
            .field("server_name", &self.server_name)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("client_auth", &self.client_auth)
            .field("client_config", &"<ClientConfig>")
            .finish()
    }
}

/// Builder for TLS configuration.
#[derive(Debug, Default)]
pub struct TlsConfigBuilder {
    ca_file: Option<PathBuf>,
    client_cert_path: Option<PathBuf>,
    client_key_path: Option<PathBuf>,
    server_name: Option<String>,
    insecure_skip_verify: bool,
}

impl TlsConfigBuilder {
    /// Set the path to a CA bundle (PEM format).
    ///
    /// If not set, platform root certificates are used.
    pub fn ca_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_file = Some(path.into());
        self
    }

    /// Set the client certificate chain (PEM format) for mutual TLS.
    pub fn client_cert_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.client_cert_path = Some(path.into());
        self
    }

    /// Set the client private key (PEM format) for mutual TLS.
    pub fn client_key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.client_key_path = Some(path.into());
        self
    }

    /// Verify the server certificate against this name instead of the host.
    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }

    /// ⚠️ **DANGER**: Skip server certificate verification (default: false).
    ///
    /// **NEVER use in production.** The connection is still encrypted but is
    /// open to man-in-the-middle attacks.
    pub fn insecure_skip_verify(mut self, skip: bool) -> Self {
        self.insecure_skip_verify = skip;
        self
    }

    /// Build the TLS configuration.
    ///
    /// Setting only one of the client certificate and key still attempts to
    /// load the pair, with the other path empty.
    ///
    /// # Errors
    ///
    /// - [`TlsError::LoadCa`] if the CA bundle cannot be read or holds no certificate
    /// - [`TlsError::LoadKeys`] if the client certificate or key cannot be loaded
    pub fn build(self) -> Result<TlsConfig, TlsError> {
        let root_store = match &self.ca_file {
            Some(ca_path) => load_ca(ca_path)?,
            None => platform_roots()?,
        };

        let builder = if self.insecure_skip_verify {
            ClientConfig::builder()
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(NoServerVerification))
        } else {
            ClientConfig::builder().with_root_certificates(root_store)
        };

        let client_auth = self.client_cert_path.is_some() || self.client_key_path.is_some();
        let client_config = if client_auth {
            let cert_path = self.client_cert_path.clone().unwrap_or_default();
            let key_path = self.client_key_path.clone().unwrap_or_default();
            let (certs, key) = load_key_pair(&cert_path, &key_path)?;
            builder
                .with_client_auth_cert(certs, key)
                .map_err(|e| TlsError::LoadKeys(e.to_string()))?
        } else {
            builder.with_no_client_auth()
        };

        Ok(TlsConfig {
            ca_file: self.ca_file,
            server_name: self.server_name,
            insecure_skip_verify: self.insecure_skip_verify,
            client_auth,
            client_config: Arc::new(client_config),
        })
    }
}

/// Load a CA bundle from a PEM file.
fn load_ca(ca_path: &Path) -> Result<RootCertStore, TlsError> {
    let ca_data = fs::read(ca_path)
        .map_err(|e| TlsError::LoadCa(format!("{}: {}", ca_path.display(), e)))?;

    let mut reader = std::io::Cursor::new(&ca_data);
    let mut root_store = RootCertStore::empty();
    let mut found_certs = 0;

    loop {
        match rustls_pemfile::read_one(&mut reader) {
            Ok(Some(Item::X509Certificate(cert))) => {
                root_store
                    .add(cert)
                    .map_err(|e| TlsError::LoadCa(format!("{}: {}", ca_path.display(), e)))?;
                found_certs += 1;
            }
            Ok(Some(_)) => {
                // keys and other items are not trust anchors
            }
            Ok(None) => break,
            Err(e) => {
                return Err(TlsError::LoadCa(format!(
                    "{}: invalid PEM: {}",
                    ca_path.display(),
                    e
                )));
            }
        }
    }

    if found_certs == 0 {
        return Err(TlsError::LoadCa(format!(
            "{}: no certificates found",
            ca_path.display()
        )));
    }

    Ok(root_store)
}

/// Platform root certificates, or the bundled webpki roots if none are installed.
fn platform_roots() -> Result<RootCertStore, TlsError> {
    let result = rustls_native_certs::load_native_certs();

    let mut store = RootCertStore::empty();
    let (added, _ignored) = store.add_parsable_certificates(result.certs);

    if added == 0 {
        if !result.errors.is_empty() {
            tracing::debug!(
                errors = result.errors.len(),
                "platform roots unavailable, using bundled webpki roots"
            );
        }
        store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    if store.is_empty() {
        return Err(TlsError::Roots(
            "no root certificates available".to_string(),
        ));
    }
    Ok(store)
}

/// Load a client certificate chain and its private key.
fn load_key_pair(
    cert_path: &Path,
    key_path: &Path,
) -> Result<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>), TlsError> {
    let cert_data = fs::read(cert_path)
        .map_err(|e| TlsError::LoadKeys(format!("{}: {}", cert_path.display(), e)))?;
    let key_data = fs::read(key_path)
        .map_err(|e| TlsError::LoadKeys(format!("{}: {}", key_path.display(), e)))?;

    let certs = rustls_pemfile::certs(&mut std::io::Cursor::new(&cert_data))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TlsError::LoadKeys(format!("{}: {}", cert_path.display(), e)))?;
    if certs.is_empty() {
        return Err(TlsError::LoadKeys(format!(
            "{}: no certificates found",
            cert_path.display()
        )));
    }

    let key = rustls_pemfile::private_key(&mut std::io::Cursor::new(&key_data))
        .map_err(|e| TlsError::LoadKeys(format!("{}: {}", key_path.display(), e)))?
        .ok_or_else(|| {
            TlsError::LoadKeys(format!("{}: no private key found", key_path.display()))
        })?;

    Ok((certs, key))
}

/// Accepts any server certificate. Only used with `insecure_skip_verify`.
#[derive(Debug)]
struct NoServerVerification;

impl ServerCertVerifier for NoServerVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
        ]
    }
}

/// Parse server name from hostname for TLS SNI (Server Name Indication).
///
/// # Errors
///
/// Returns the offending name if it is empty, too long, or has characters
/// that cannot appear in a DNS name or IP address.
pub fn parse_server_name(hostname: &str) -> Result<String, String> {
    let hostname = hostname.trim_end_matches('.');

    if hostname.is_empty() || hostname.len() > 253 {
        return Err(format!("invalid hostname for TLS: '{}'", hostname));
    }

    if !hostname
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '.' || c == ':')
    {
        return Err(format!("invalid hostname for TLS: '{}'", hostname));
    }

    Ok(hostname.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tls_config_builder_defaults() {
        let tls = TlsConfigBuilder::default();
        assert!(!tls.insecure_skip_verify);
        assert!(tls.ca_file.is_none());
        assert!(tls.server_name.is_none());
        assert!(tls.client_cert_path.is_none());
    }

    #[test]
    fn test_tls_config_server_name_only() {
        let tls = TlsConfig::builder()
            .server_name("db.example.com")
            .build()
            .expect("Failed to build TLS config");

        assert_eq!(tls.server_name(), Some("db.example.com"));
        assert!(!tls.insecure_skip_verify());
        assert!(!tls.has_client_cert());
        assert!(tls.ca_file().is_none());
    }

    #[test]
    fn test_tls_config_insecure() {
        let tls = TlsConfig::builder()
            .insecure_skip_verify(true)
            .build()
            .expect("Failed to build TLS config");
        assert!(tls.insecure_skip_verify());
    }

    #[test]
    fn test_tls_config_missing_ca_file() {
        let err = TlsConfig::builder()
            .ca_file("/no/such/ca.pem")
            .build()
            .unwrap_err();
        assert!(matches!(err, TlsError::LoadCa(_)));
        assert!(err.to_string().starts_with("tls: loadca: "));
    }

    #[test]
    fn test_tls_config_key_without_cert_fails() {
        let err = TlsConfig::builder()
            .client_key_path("/no/such/client.key")
            .build()
            .unwrap_err();
        assert!(matches!(err, TlsError::LoadKeys(_)));
        assert!(err.to_string().starts_with("tls: loadkeys: "));
    }

    #[test]
    fn test_parse_server_name_valid() {
        assert!(parse_server_name("localhost").is_ok());
        assert!(parse_server_name("example.com").is_ok());
        assert!(parse_server_name("10.0.0.12").is_ok());
        assert!(parse_server_name("::1").is_ok());
    }

    #[test]
    fn test_parse_server_name_trailing_dot() {
        assert_eq!(parse_server_name("example.com.").unwrap(), "example.com");
    }

    #[test]
    fn test_parse_server_name_invalid() {
        assert!(parse_server_name("").is_err());
        assert!(parse_server_name("bad host").is_err());
        assert!(parse_server_name("host/path").is_err());
    }

    #[test]
    fn test_tls_config_debug() {
        let tls = TlsConfig::builder()
            .server_name("db")
            .build()
            .expect("Failed to build TLS config");

        let debug_str = format!("{:?}", tls);
        assert!(debug_str.contains("TlsConfig"));
        assert!(debug_str.contains("insecure_skip_verify"));
    }
}
