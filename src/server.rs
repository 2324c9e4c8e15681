use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::{error, info};
use serde::Serialize;
use serde_json::json;

use crate::ingest::{MeetingRecord, WebhookIngestor, WebhookPayload};
use crate::middleware::trace_layer;

#[derive(Clone)]
pub struct ApiState {
    pub ingestor: WebhookIngestor,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_payload: Option<MeetingRecord>,
}

impl WebhookResponse {
    pub fn success(record: MeetingRecord) -> Self {
        Self {
            status: "success",
            message: "Webhook parsed successfully!".to_string(),
            parsed_payload: Some(record),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
            parsed_payload: None,
        }
    }
}

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", post(webhook))
        .layer(trace_layer())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "trackor-bridge"
    }))
}

/// Accepts any content type; the body just has to be a JSON object.
async fn webhook(
    State(state): State<ApiState>,
    body: Bytes,
) -> (StatusCode, Json<WebhookResponse>) {
    let payload = match WebhookPayload::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!("Rejected webhook payload: {}", e);
            return (StatusCode::BAD_REQUEST, Json(WebhookResponse::error(e.to_string())));
        }
    };

    info!("Webhook received for session {}", payload.session_id);
    let record = state.ingestor.ingest(&payload).await;

    (StatusCode::OK, Json(WebhookResponse::success(record)))
}
