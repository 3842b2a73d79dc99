//! Connect using a YAML file and print the derived policies
//!
//! Run with: cargo run --example connect -- path/to/config.yml
//!
//! The file is expected to hold the connection settings under an `aerospike` key.

use aerospike_connect::{load_config, Aerospike, AerospikeConfig};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Deserialize)]
struct AppConfig {
    aerospike: AerospikeConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "aerospike.yml".to_string());
    let app: AppConfig = load_config(&path)?;

    let (handle, error) = Aerospike::connect(&app.aerospike).await.into_parts();
    if let Some(e) = &error {
        tracing::error!(error = %e, "bootstrap incomplete");
    }
    let Some(aero) = handle else {
        return Err(error.map(Into::into).unwrap_or_else(|| "no connection".into()));
    };

    println!("connected to {}:{}", aero.client.host(), aero.client.port());
    println!("tls: {}", aero.client.is_tls());
    println!("policies: {:#?}", aero.policies);

    aero.close().await?;
    Ok(())
}
