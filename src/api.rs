use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::PipelineError;
use crate::notify::DeliveryResult;
use crate::pipeline::Pipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/send-newsletter", get(send_newsletter))
        .route("/newsletter/preview", get(preview_newsletter))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct SendOk {
    success: bool,
    message: &'static str,
    details: DeliveryResult,
}

#[derive(Serialize)]
struct SendErr {
    success: bool,
    error: String,
    details: serde_json::Value,
}

/// Every pipeline failure maps to 500 with a readable message.
struct ApiError(PipelineError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = SendErr {
            success: false,
            error: self.0.to_string(),
            details: self.0.details(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        Self(e)
    }
}

async fn send_newsletter(State(state): State<AppState>) -> Result<Json<SendOk>, ApiError> {
    tracing::info!("starting newsletter generation and delivery");
    let result = state.pipeline.run_and_deliver().await.map_err(|e| {
        tracing::error!(error = %e, "newsletter process failed");
        e
    })?;
    tracing::info!(attempt = result.attempt, "newsletter process finished");

    Ok(Json(SendOk {
        success: true,
        message: "Newsletter generated and sent successfully!",
        details: result,
    }))
}

async fn preview_newsletter(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let html = state.pipeline.run().await?;
    Ok(Html(html))
}
