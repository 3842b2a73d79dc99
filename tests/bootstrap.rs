//! Bootstrap tests against an in-process driver
//!
//! `ScriptedDriver` counts connect attempts and fails until a configured
//! attempt number, so the retry budget can be checked without a cluster.

use aerospike_connect::{
    connect_with_driver, AerospikeConfig, AuthMode, ClientPolicy, Driver, Error,
};
use aerospike_connect::config::{
    BasePolicyConfig, BaseTimeoutsConfig, PoliciesConfig, SecurityConfig, TlsSettings,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
#[error("connection refused (attempt {0})")]
struct Refused(u32);

#[derive(Debug)]
struct FakeClient {
    attempt: u32,
    policy: ClientPolicy,
}

/// Fails every attempt before `succeed_on` (0 = never succeeds)
#[derive(Default)]
struct ScriptedDriver {
    attempts: AtomicU32,
    succeed_on: u32,
    seen: Mutex<Vec<(String, u16)>>,
}

impl ScriptedDriver {
    fn failing() -> Self {
        Self::default()
    }

    fn succeeding_on(attempt: u32) -> Self {
        Self {
            succeed_on: attempt,
            ..Self::default()
        }
    }

    fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Driver for ScriptedDriver {
    type Client = FakeClient;
    type Error = Refused;

    async fn connect(
        &self,
        policy: &ClientPolicy,
        host: &str,
        port: u16,
    ) -> Result<FakeClient, Refused> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        self.seen.lock().unwrap().push((host.to_string(), port));
        if self.succeed_on != 0 && attempt >= self.succeed_on {
            Ok(FakeClient {
                attempt,
                policy: policy.clone(),
            })
        } else {
            Err(Refused(attempt))
        }
    }
}

fn seed() -> AerospikeConfig {
    AerospikeConfig {
        host: Some("10.0.0.1".into()),
        port: Some(3000),
        ..Default::default()
    }
}

fn base_timeouts(connect: Option<u64>, login: Option<u64>) -> Option<PoliciesConfig> {
    Some(PoliciesConfig {
        base: Some(BasePolicyConfig {
            timeout_ms: Some(BaseTimeoutsConfig {
                connect,
                idle: None,
                login,
            }),
        }),
        ..Default::default()
    })
}

#[tokio::test]
async fn test_missing_host_fails_before_connecting() {
    let driver = ScriptedDriver::failing();
    let config = AerospikeConfig {
        port: Some(3000),
        ..Default::default()
    };

    let (handle, error) = connect_with_driver(&driver, &config).await.into_parts();
    assert!(handle.is_none());
    let error = error.expect("validation error");
    assert!(matches!(error, Error::ConfigCheck(_)));
    assert_eq!(
        error.to_string(),
        "config check: aerospike seed host not specified"
    );
    assert_eq!(driver.attempts(), 0);
}

#[tokio::test]
async fn test_missing_port_fails_before_connecting() {
    let driver = ScriptedDriver::failing();
    let config = AerospikeConfig {
        host: Some("10.255.255.1".into()),
        max_connect_attempts: Some(100),
        ..Default::default()
    };

    let err = connect_with_driver(&driver, &config)
        .await
        .into_result()
        .unwrap_err();
    assert_eq!(err.to_string(), "config check: aerospike seed port not specified");
    assert_eq!(driver.attempts(), 0);
}

#[tokio::test]
async fn test_single_attempt_by_default() {
    let driver = ScriptedDriver::failing();
    let started = Instant::now();

    let err = connect_with_driver(&driver, &seed())
        .await
        .into_result()
        .unwrap_err();

    assert_eq!(driver.attempts(), 1);
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(err.to_string(), "connect: connection refused (attempt 1)");
}

#[tokio::test]
async fn test_max_attempts_one_is_exactly_one() {
    let driver = ScriptedDriver::failing();
    let config = AerospikeConfig {
        max_connect_attempts: Some(1),
        connect_retry_sleep_ms: Some(500),
        ..seed()
    };
    let started = Instant::now();

    let outcome = connect_with_driver(&driver, &config).await;
    assert!(outcome.handle().is_none());
    assert_eq!(driver.attempts(), 1);
    // no sleep after the only attempt
    assert!(started.elapsed() < Duration::from_millis(500));
}

#[tokio::test]
async fn test_three_attempts_with_sleep() {
    let driver = ScriptedDriver::failing();
    let config = AerospikeConfig {
        max_connect_attempts: Some(3),
        connect_retry_sleep_ms: Some(10),
        ..seed()
    };
    let started = Instant::now();

    let err = connect_with_driver(&driver, &config)
        .await
        .into_result()
        .unwrap_err();

    assert_eq!(driver.attempts(), 3);
    assert!(started.elapsed() >= Duration::from_millis(20));
    // the last driver error comes back unchanged
    assert!(matches!(err, Error::Connect(_)));
    assert_eq!(err.to_string(), "connect: connection refused (attempt 3)");
}

#[tokio::test]
async fn test_time_budget_from_base_timeouts() {
    let driver = ScriptedDriver::failing();
    let config = AerospikeConfig {
        max_connect_attempts: Some(10_000),
        connect_retry_sleep_ms: Some(10),
        policies: base_timeouts(Some(100), Some(50)),
        ..seed()
    };
    let started = Instant::now();

    let outcome = connect_with_driver(&driver, &config).await;
    let elapsed = started.elapsed();

    assert!(outcome.error().is_some());
    assert!(elapsed >= Duration::from_millis(150), "stopped early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "ran too long: {elapsed:?}");
    let attempts = driver.attempts();
    assert!(attempts > 1 && attempts < 10_000, "attempts: {attempts}");
}

#[tokio::test]
async fn test_zero_time_budget_only_counts_attempts() {
    let driver = ScriptedDriver::failing();
    let config = AerospikeConfig {
        max_connect_attempts: Some(5),
        max_connect_retry_time_ms: Some(0),
        connect_retry_sleep_ms: Some(1),
        ..seed()
    };

    let outcome = connect_with_driver(&driver, &config).await;
    assert!(outcome.error().is_some());
    assert_eq!(driver.attempts(), 5);
}

#[tokio::test]
async fn test_explicit_time_budget_overrides_timeouts() {
    let driver = ScriptedDriver::failing();
    let config = AerospikeConfig {
        max_connect_attempts: Some(10_000),
        max_connect_retry_time_ms: Some(30),
        connect_retry_sleep_ms: Some(5),
        policies: base_timeouts(Some(60_000), None),
        ..seed()
    };
    let started = Instant::now();

    let outcome = connect_with_driver(&driver, &config).await;
    assert!(outcome.error().is_some());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_retry_then_success() {
    let driver = ScriptedDriver::succeeding_on(3);
    let config = AerospikeConfig {
        max_connect_attempts: Some(5),
        ..seed()
    };

    let aero = connect_with_driver(&driver, &config)
        .await
        .into_result()
        .expect("connected");

    assert_eq!(aero.client.attempt, 3);
    assert_eq!(driver.attempts(), 3);
    let seen = driver.seen.lock().unwrap();
    assert!(seen.iter().all(|(host, port)| host == "10.0.0.1" && *port == 3000));
}

#[tokio::test]
async fn test_connected_handle_carries_policies() {
    let driver = ScriptedDriver::succeeding_on(1);
    let config: AerospikeConfig = aerospike_connect::parse_config(
        r#"
host: 10.0.0.1
port: 3000
clusterName: prod
security:
  username: app
policies:
  base:
    timeoutMs:
      connect: 750
      login: 300
  scan:
    maxRetries: 9
"#,
    )
    .expect("decode");

    let outcome = connect_with_driver(&driver, &config).await;
    assert!(outcome.is_ok());
    let aero = outcome.into_result().expect("handle");

    assert_eq!(aero.policies.scan.base_policy.max_retries, 9);
    assert_eq!(aero.client.policy.timeout, Duration::from_millis(750));
    assert_eq!(aero.client.policy.login_timeout, Duration::from_millis(300));
    assert_eq!(aero.client.policy.cluster_name.as_deref(), Some("prod"));
    assert_eq!(aero.client.policy.user.as_deref(), Some("app"));
    assert!(aero.client.policy.fail_if_not_connected);
}

#[tokio::test]
async fn test_username_without_auth_mode_keeps_driver_default() {
    let driver = ScriptedDriver::succeeding_on(1);
    let config = AerospikeConfig {
        security: Some(SecurityConfig {
            username: Some("app".into()),
            ..Default::default()
        }),
        ..seed()
    };

    let aero = connect_with_driver(&driver, &config)
        .await
        .into_result()
        .expect("connected");
    assert_eq!(aero.client.policy.auth_mode, ClientPolicy::default().auth_mode);
    assert_eq!(aero.client.policy.auth_mode, AuthMode::Internal);
}

#[tokio::test]
async fn test_server_name_alone_enables_verified_tls() {
    let driver = ScriptedDriver::succeeding_on(1);
    let config = AerospikeConfig {
        tls: Some(TlsSettings {
            server_name: Some("db.example.com".into()),
            ..Default::default()
        }),
        ..seed()
    };

    let aero = connect_with_driver(&driver, &config)
        .await
        .into_result()
        .expect("connected");
    let tls = aero.client.policy.tls_config.as_ref().expect("TLS enabled");
    assert_eq!(tls.server_name(), Some("db.example.com"));
    assert!(!tls.insecure_skip_verify());
}

#[tokio::test]
async fn test_bad_ca_aborts_before_connecting() {
    let driver = ScriptedDriver::succeeding_on(1);
    let config = AerospikeConfig {
        tls: Some(TlsSettings {
            ca_file: Some("/no/such/ca.pem".into()),
            ..Default::default()
        }),
        ..seed()
    };

    let err = connect_with_driver(&driver, &config)
        .await
        .into_result()
        .unwrap_err();
    assert!(matches!(err, Error::ConnectPolicy(_)));
    assert!(err
        .to_string()
        .starts_with("create connect policy: tls: loadca: "));
    assert_eq!(driver.attempts(), 0);
}
