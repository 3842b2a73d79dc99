//! YAML configuration loading

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a YAML configuration file into `T`
///
/// `T` is whatever structure the caller wants decoded, typically a wrapper
/// that embeds [`AerospikeConfig`](super::AerospikeConfig) under an
/// application key. No semantic validation happens here.
///
/// # Errors
///
/// Returns [`Error::ConfigOpen`] if the file cannot be opened and
/// [`Error::ConfigDecode`] if its content does not decode into `T`.
pub fn load_config<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::ConfigOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let config = serde_yaml::from_reader(BufReader::new(file))?;
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Decode YAML configuration text into `T`
pub fn parse_config<T: DeserializeOwned>(contents: &str) -> Result<T> {
    Ok(serde_yaml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AerospikeConfig;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        aerospike: Option<AerospikeConfig>,
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config::<AerospikeConfig>("/definitely/not/here.yml").unwrap_err();
        assert!(matches!(err, Error::ConfigOpen { .. }));
        assert!(err.to_string().starts_with("could not open config file"));
    }

    #[test]
    fn test_load_config_wrapped_under_app_key() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "aerospike:\n  host: db1\n  port: 3000").expect("write");

        let wrapper: Wrapper = load_config(file.path()).expect("load");
        let config = wrapper.aerospike.expect("aerospike key");
        assert_eq!(config.host.as_deref(), Some("db1"));
        assert_eq!(config.port, Some(3000));
        assert!(config.policies.is_none());
    }

    #[test]
    fn test_parse_config_wrong_shape() {
        let err = parse_config::<AerospikeConfig>("host: [1, 2]\n").unwrap_err();
        assert!(matches!(err, Error::ConfigDecode(_)));
        assert!(err.to_string().starts_with("decoding configuration file"));
    }

    #[test]
    fn test_parse_config_rejects_out_of_range_port() {
        let result = parse_config::<AerospikeConfig>("host: db1\nport: 70000\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_insecure_skip_verify_spellings() {
        let upper: AerospikeConfig =
            parse_config("tls:\n  serverName: db\n  InsecureSkipVerify: true\n").unwrap();
        assert_eq!(upper.tls.unwrap().insecure_skip_verify, Some(true));

        let lower: AerospikeConfig =
            parse_config("tls:\n  serverName: db\n  insecureSkipVerify: false\n").unwrap();
        assert_eq!(lower.tls.unwrap().insecure_skip_verify, Some(false));
    }

    #[test]
    fn test_parse_config_keeps_zero_distinct_from_absent() {
        let config: AerospikeConfig =
            parse_config("host: db1\nport: 3000\nconnectRetrySleepMs: 0\n").unwrap();
        assert_eq!(config.connect_retry_sleep_ms, Some(0));
        assert_eq!(config.max_connect_retry_time_ms, None);
    }
}
