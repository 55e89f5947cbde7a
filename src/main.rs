use std::env;

use payslip_engine::api::{AppState, create_router};
use payslip_engine::config::{ConfigLoader, DeliveryMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_DIR: &str = "./config/default";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config_dir = env::var("PAYSLIP_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let addr = env::var("PAYSLIP_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let static_build = env::var("PAYSLIP_STATIC_BUILD").is_ok_and(|v| v == "true");

    let mut config = ConfigLoader::load(&config_dir)?;
    if static_build {
        config = config.with_delivery_mode(DeliveryMode::Download);
    }
    info!(
        config_dir = %config_dir,
        tax_rate = %config.derivation().tax_rate,
        tax_basis = ?config.derivation().tax_basis,
        delivery_mode = ?config.email().delivery_mode,
        "Configuration loaded"
    );

    let app = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Payslip engine listening");
    axum::serve(listener, app).await?;

    Ok(())
}
