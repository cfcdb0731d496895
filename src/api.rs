//! REST API server for the WalletSense dashboard
//!
//! Exposes upload, dashboard panels, chat, categorization, summaries and
//! CSV exports over HTTP for the web front end.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::backend::FinanceBackend;
use crate::error::DashboardError;
use crate::export;
use crate::state::AppState;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub expanded: bool,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

type ApiResult = (StatusCode, Json<ApiResponse>);

fn ok<T: Serialize>(data: T) -> ApiResult {
    (StatusCode::OK, Json(ApiResponse::success(data)))
}

fn failure(err: &DashboardError) -> ApiResult {
    let status = match err {
        DashboardError::ParseError(_) | DashboardError::ShapeError(_) => StatusCode::BAD_REQUEST,
        DashboardError::BackendError(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub app: Arc<AppState>,
    pub backend: Arc<dyn FinanceBackend>,
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Upload and Dashboard
/// =============================

async fn upload(State(state): State<ApiState>, body: String) -> ApiResult {
    info!("Received upload ({} bytes)", body.len());
    match state.app.upload(&body).await {
        Ok(summary) => ok(summary),
        Err(e) => failure(&e),
    }
}

async fn dashboard(State(state): State<ApiState>, Query(query): Query<DashboardQuery>) -> ApiResult {
    ok(state.app.dashboard(today(), query.expanded).await)
}

async fn upload_error(State(state): State<ApiState>) -> ApiResult {
    ok(serde_json::json!({ "error": state.app.upload_error().await }))
}

/// =============================
/// Backend-driven Endpoints
/// =============================

async fn send_chat(State(state): State<ApiState>, Json(req): Json<ChatRequest>) -> ApiResult {
    let chat = state.app.chat();
    match chat.send(state.backend.as_ref(), &req.prompt).await {
        Ok(reply) => ok(serde_json::json!({
            "reply": reply,
            "transcript_len": chat.transcript().await.len(),
        })),
        Err(e) => failure(&e),
    }
}

async fn get_chat(State(state): State<ApiState>) -> ApiResult {
    let transcript = state.app.chat().transcript().await;
    ok(transcript.messages().collect::<Vec<_>>())
}

async fn categorize(State(state): State<ApiState>) -> ApiResult {
    match state.app.categorize(state.backend.as_ref()).await {
        Ok(outcome) => ok(outcome),
        Err(e) => {
            warn!("Categorization failed: {}", e);
            failure(&e)
        }
    }
}

async fn summaries(State(state): State<ApiState>) -> ApiResult {
    match state.app.refresh_summaries(state.backend.as_ref()).await {
        Ok(Some(summaries)) => ok(summaries),
        // superseded by a concurrent refresh; report what is stored
        Ok(None) => ok(state.app.summaries().await),
        Err(e) => failure(&e),
    }
}

/// =============================
/// CSV Exports
/// =============================

fn csv_response(filename: &str, result: crate::Result<String>) -> Response {
    match result {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            body,
        )
            .into_response(),
        Err(e) => failure(&e).into_response(),
    }
}

async fn export_receipts(State(state): State<ApiState>) -> Response {
    let loaded = state.app.records().await;
    csv_response(
        "receipts.csv",
        export::receipts_csv(loaded.as_ref().map(|l| l.records.as_ref())),
    )
}

async fn export_report(State(state): State<ApiState>) -> Response {
    let dashboard = state.app.dashboard(today(), true).await;
    csv_response("report.csv", export::report_csv(&dashboard))
}

/// =============================
/// Router
/// =============================

pub fn create_router(app: Arc<AppState>, backend: Arc<dyn FinanceBackend>) -> Router {
    let state = ApiState { app, backend };

    Router::new()
        .route("/health", get(health))
        .route("/api/upload", post(upload))
        .route("/api/dashboard", get(dashboard))
        .route("/api/error", get(upload_error))
        .route("/api/chat", post(send_chat).get(get_chat))
        .route("/api/categorize", post(categorize))
        .route("/api/summaries", get(summaries))
        .route("/api/export/receipts.csv", get(export_receipts))
        .route("/api/export/report.csv", get(export_report))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    app: Arc<AppState>,
    backend: Arc<dyn FinanceBackend>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(app, backend);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
