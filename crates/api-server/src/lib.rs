//! Read-only HTTP surface over the pipeline's persisted artifacts. The
//! server never computes anything itself; every route re-serves what the
//! last pipeline run wrote to the data store.

pub mod routes;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use data_store::DataStore;
use screener_core::ScreenerError;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Uniform response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self { success: true, data: Some(data), error: None })
    }
}

/// Route-level failure, rendered as the same envelope.
#[derive(Debug)]
pub enum AppError {
    /// The pipeline has not produced this artifact yet.
    NotAvailable(String),
    Internal(String),
}

impl From<ScreenerError> for AppError {
    fn from(e: ScreenerError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotAvailable(m) => (StatusCode::NOT_FOUND, m),
            AppError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        let body = Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message),
        });
        (status, body).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DataStore>,
}

pub fn build_router(state: AppState) -> Router {
    routes::api_routes()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(store: DataStore, port: u16) -> anyhow::Result<()> {
    let state = AppState { store: Arc::new(store) };
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "api server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
