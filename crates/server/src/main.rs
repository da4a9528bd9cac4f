use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    error::ErrorBody,
    protocol::{BypassRequest, BypassResponse, HealthResponse, BYPASS_PATH, HEALTH_PATH},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;
mod landing;
mod resolver;

use api::ApiContext;
use app_state::AppState;
use config::load_settings;
use resolver::HttpLinkResolver;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let resolver = HttpLinkResolver::new(&settings)?;
    let state = AppState {
        api: ApiContext {
            resolver: Arc::new(resolver),
        },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, upstream_timeout_secs = settings.upstream_timeout_secs, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(BYPASS_PATH, post(http_bypass))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn http_bypass(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BypassRequest>, JsonRejection>,
) -> Result<Json<BypassResponse>, (StatusCode, Json<ErrorBody>)> {
    let Json(req) = payload.map_err(|rejection| {
        warn!(error = %rejection, "rejected bypass request body");
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody::new(rejection.body_text())),
        )
    })?;

    api::bypass(&state.api, &req.url)
        .await
        .map(Json)
        .map_err(|(status, body)| (status, Json(body)))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
