//! MeteorSim impact assessment HTTP service binary.
//!
//! # Configuration
//!
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `LOG_FORMAT` - log format: json (default) or text
//! - `RUST_LOG` - log level (default: info)
//! - `NASA_API_KEY` - upstream catalog API key (default: DEMO_KEY)
//! - `METEORSIM_NEO_BASE_URL` - catalog base URL override
//! - `METEORSIM_CRATER_URL` - optional crater-calculator endpoint

use std::env;
use std::net::SocketAddr;

use tracing::{error, info};

use meteorsim_service_impact::app;
use meteorsim_service_shared::{init_logging, AppState, LoggingConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env();
    init_logging(&logging_config);

    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8080);

    // The engine's blocking HTTP client must be built before entering the
    // async runtime.
    let state = AppState::from_env().map_err(|err| {
        error!(error = %err, "failed to initialize application state");
        err
    })?;

    info!(port, "starting impact service");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(state, port))
}

async fn serve(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
