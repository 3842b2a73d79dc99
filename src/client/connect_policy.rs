//! Connect policy construction

use crate::config::{AerospikeConfig, TlsSettings};
use crate::connection::TlsConfig;
use crate::driver::{AuthMode, ClientPolicy};
use crate::TlsError;
use std::time::Duration;

/// Build the driver connect policy from the configuration.
///
/// Only fields present in the configuration are applied; everything else keeps
/// the [`ClientPolicy`] default. `fail_if_not_connected` is always set.
///
/// # Errors
///
/// Returns a [`TlsError`] when TLS is requested and the CA bundle or client key
/// pair cannot be loaded. No policy is returned in that case.
pub fn build_connect_policy(config: &AerospikeConfig) -> Result<ClientPolicy, TlsError> {
    let mut policy = ClientPolicy {
        fail_if_not_connected: true,
        ..ClientPolicy::default()
    };
    let has_credentials = config.has_credentials();

    if let Some(timeouts) = config.base_timeouts() {
        if let Some(idle) = timeouts.idle {
            policy.idle_timeout = Duration::from_millis(idle);
        }
        if let Some(connect) = timeouts.connect {
            policy.timeout = Duration::from_millis(connect);
        }
        // login timeout is meaningless without credentials
        if let (true, Some(login)) = (has_credentials, timeouts.login) {
            policy.login_timeout = Duration::from_millis(login);
        }
    }

    if let Some(security) = config.security.as_ref().filter(|s| s.has_credentials()) {
        if let Some(username) = &security.username {
            policy.user = Some(username.clone());
        }
        if let Some(password) = &security.password {
            policy.password = Some(password.clone());
        }
        match security.auth_mode_external {
            Some(true) => policy.auth_mode = AuthMode::External,
            Some(false) => policy.auth_mode = AuthMode::Internal,
            None => {}
        }
    }

    if let Some(size) = config.connection_queue_size {
        policy.connection_queue_size = size;
    }
    if let Some(limit) = config.limit_connections_to_queue_size {
        policy.limit_connections_to_queue_size = limit;
    }
    if let Some(name) = &config.cluster_name {
        policy.cluster_name = Some(name.clone());
    }

    if let Some(tls) = config.tls.as_ref().filter(|t| t.is_requested()) {
        policy.tls_config = Some(build_tls(tls)?);
    }

    Ok(policy)
}

fn build_tls(settings: &TlsSettings) -> Result<TlsConfig, TlsError> {
    let mut builder = TlsConfig::builder();

    if let Some(skip) = settings.insecure_skip_verify {
        builder = builder.insecure_skip_verify(skip);
    }
    if let Some(name) = &settings.server_name {
        builder = builder.server_name(name);
    }
    if let Some(ca_file) = &settings.ca_file {
        builder = builder.ca_file(ca_file);
    }
    if settings.cert_file.is_some() || settings.key_file.is_some() {
        builder = builder
            .client_cert_path(settings.cert_file.clone().unwrap_or_default())
            .client_key_path(settings.key_file.clone().unwrap_or_default());
    }

    let tls = builder.build()?;
    tracing::debug!(
        server_name = ?tls.server_name(),
        insecure_skip_verify = tls.insecure_skip_verify(),
        client_cert = tls.has_client_cert(),
        "TLS configured"
    );
    Ok(tls)
}
