//! Server entry-point: loads settings, wires adapters and runs the listener.

mod server;

use std::ffi::OsString;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use dogspot::config::AppSettings;
use ortho_config::OrthoConfig;
use dogspot::inbound::http::health::HealthState;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args: Vec<OsString> = std::env::args_os().collect();
    let settings = AppSettings::load_from_iter(args)
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = ServerConfig::from_settings(&settings)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, &config)?;
    info!(bind_addr = %config.bind_addr(), "dogspot listening");
    server.await
}
