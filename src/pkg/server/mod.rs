pub mod handlers;
pub mod middlewares;
pub mod router;
pub mod state;
pub mod uispec;

use standard_error::{Interpolate, StandardError};

use crate::{conf::settings, prelude::Result};
use router::build_routes;
use state::AppState;

pub async fn listen() -> Result<()> {
    let state = AppState::new().await?;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", settings.port))
        .await
        .map_err(|e| StandardError::new("ERR-IO-001").interpolate_err(e.to_string()))?;
    tracing::info!("{} listening at port {}", settings.service_name, settings.port);
    tokio::select! {
        r = axum::serve(listener, build_routes(state)) => {
            tracing::warn!("server ended unexpectedly: {:?}", &r)
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received ctrl+c interrupt, closing server");
        }
    }
    Ok(())
}
