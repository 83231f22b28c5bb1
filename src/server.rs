use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::analyzer::CodeAnalyzer;
use crate::error::{DocumntrError, Result};

#[derive(Clone)]
struct AppState {
    analyzer: Arc<CodeAnalyzer>,
}

pub fn router(analyzer: Arc<CodeAnalyzer>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/metrics", get(metrics))
        .route("/analyze", post(analyze))
        .with_state(AppState { analyzer })
}

pub async fn serve(analyzer: Arc<CodeAnalyzer>, addr: SocketAddr) -> Result<()> {
    let app = router(analyzer);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    code: String,
}

async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Response {
    match state.analyzer.analyze_code(&req.code).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            let status = match err {
                DocumntrError::EmptyCode => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(json!({ "error": err.client_message() }))).into_response()
        }
    }
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.analyzer.metrics())
}
