//! Axum route handlers for the companion HTTP server.
//!
//! # Routes
//!
//! - `GET  /health`   returns `{"status": "ok", "version": "..."}`
//! - `GET  /personas` lists persona descriptions
//! - `POST /decide`   accepts a `ContextSnapshot`, returns a `Decision`
//! - `POST /reward`   applies feedback for an earlier decision
//! - `GET  /learner`  exploration rate and table size

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::actions::ActionId;
use crate::contracts::ContextSnapshot;
use crate::discretizer::StateKey;
use crate::pipeline::{Decision, DecisionPipeline, LearnerStats};

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DecisionPipeline>,
}

impl AppState {
    pub fn new(pipeline: DecisionPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Body of `POST /reward`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardRequest {
    pub state_key: String,
    pub action_id: ActionId,
    pub reward: f64,
    #[serde(default)]
    pub next_state_key: Option<String>,
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/personas", get(personas_handler))
        .route("/decide", post(decide_handler))
        .route("/reward", post(reward_handler))
        .route("/learner", get(learner_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health: liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "companion",
    }))
}

/// GET /personas
async fn personas_handler(State(state): State<AppState>) -> Json<Value> {
    let personas = state.pipeline.registry().list();
    Json(json!({ "personas": personas }))
}

/// POST /decide
///
/// Unknown tags are rejected by the JSON extractor (422); the remaining
/// boundary checks map to 422 as well.
async fn decide_handler(
    State(state): State<AppState>,
    Json(snapshot): Json<ContextSnapshot>,
) -> Result<Json<Decision>, ApiError> {
    snapshot
        .validate()
        .map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let pipeline = state.pipeline.clone();
    let decision = tokio::task::spawn_blocking(move || pipeline.decide(&snapshot))
        .await
        .map_err(|e| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Decision task panicked: {}", e),
            )
        })?;

    Ok(Json(decision))
}

/// POST /reward
///
/// Response: `{"q_value": <updated value>, "epsilon": <after decay>}`
async fn reward_handler(
    State(state): State<AppState>,
    Json(request): Json<RewardRequest>,
) -> Result<Json<Value>, ApiError> {
    if !request.reward.is_finite() {
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "reward must be a finite number",
        ));
    }
    for key in std::iter::once(&request.state_key).chain(request.next_state_key.as_ref()) {
        StateKey::parse(key)
            .map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    }

    let pipeline = state.pipeline.clone();
    let (q_value, stats) = tokio::task::spawn_blocking(move || {
        let q = pipeline.reward(
            &request.state_key,
            request.action_id,
            request.reward,
            request.next_state_key.as_deref(),
        );
        (q, pipeline.learner_stats())
    })
    .await
    .map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Reward task panicked: {}", e),
        )
    })?;

    Ok(Json(json!({
        "q_value": q_value,
        "epsilon": stats.epsilon,
    })))
}

/// GET /learner
async fn learner_handler(State(state): State<AppState>) -> Json<LearnerStats> {
    Json(state.pipeline.learner_stats())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
