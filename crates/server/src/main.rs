use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use relay_api::{summarize, ApiContext, ProcessSummarizer};
use shared::protocol::{
    healthz_route, summarize_route, ErrorBody, SummarizeRequest, SummarizeResponse,
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod cors;

use app_state::AppState;
use config::load_settings;
use cors::{enforce_allow_list, OriginPolicy};

const MAX_REQUEST_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let summarizer = ProcessSummarizer::new(&settings.summarizer_program)
        .arg(&settings.summarizer_script)
        .with_timeout(settings.summarizer_timeout());
    info!(
        program = summarizer.program(),
        args = ?summarizer.args(),
        timeout = ?summarizer.timeout(),
        "summarizer configured"
    );
    info!(origins = ?settings.allowed_origins, "cors allow-list");

    let policy = OriginPolicy::new(&settings.allowed_origins);
    let state = AppState {
        api: ApiContext::new(summarizer),
    };
    let app = build_router(Arc::new(state), policy);

    let addr: SocketAddr = settings
        .bind_addr()
        .parse()
        .with_context(|| format!("invalid listen address '{}'", settings.bind_addr()))?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

fn build_router(state: Arc<AppState>, policy: OriginPolicy) -> Router {
    Router::new()
        .route(healthz_route(), get(healthz))
        .route(summarize_route(), post(http_summarize))
        .layer(policy.cors_layer())
        .layer(middleware::from_fn_with_state(policy, enforce_allow_list))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_summarize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, (StatusCode, Json<ErrorBody>)> {
    summarize(&state.api, req)
        .await
        .map(Json)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, Json(err.body())))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
