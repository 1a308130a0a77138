//! Storefront shipping server
//!
//! This example demonstrates:
//! - Loading locations and provider catalogs from YAML
//! - Serving `POST /shipping/estimate` and the provider reference routes
//! - Graceful shutdown on Ctrl+C / SIGTERM
//!
//! Run from the repository root:
//!
//! ```sh
//! RUST_LOG=shipquote=debug,tower_http=info cargo run --example storefront_shipping
//! ```

use shipquote::prelude::*;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "demos/storefront_shipping/config/shipping.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ShippingConfig::from_yaml_file(CONFIG_PATH)?;
    tracing::info!(
        provinces = config.locations.len(),
        providers = config.providers.len(),
        "loaded shipping configuration"
    );

    let addr = std::env::var("SHIPQUOTE_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    println!("🚚 Storefront shipping server on http://{}", addr);
    println!("   GET  /health");
    println!("   GET  /shipping/providers");
    println!("   GET  /shipping/providers/{{provider_id}}/zones");
    println!("   GET  /shipping/providers/{{provider_id}}/delivery-types");
    println!("   POST /shipping/estimate\n");
    println!("Try:");
    println!(
        r#"   curl -s -X POST http://{}/shipping/estimate -H 'content-type: application/json' \
     -d '{{"provider_id":"ghn","from_address":{{"province_code":"79","district_code":"760","ward_code":"26734"}},"to_address":{{"province_code":"79","district_code":"769"}},"items":[{{"product_id":"paint-001","quantity":2,"unit_weight":2.5}}],"delivery_type":"EXPRESS"}}'"#,
        addr
    );

    ServerBuilder::new()
        .with_config(config)
        .with_permissive_cors()
        .serve(&addr)
        .await
}
