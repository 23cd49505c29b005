use crate::metrics::MetricsSnapshot;
use crate::web::render::{self, PredictionOutcome};
use crate::web::{form, AppState, PredictorState};
use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

fn halted(message: &str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Html(render::render_halted(message)),
    )
        .into_response()
}

/// Render the form with the submitted control values
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match &state.predictor {
        PredictorState::Halted(message) => halted(message),
        PredictorState::Ready(_) => {
            let record = form::collect(&params);
            Html(render::render_page(&record, None)).into_response()
        }
    }
}

/// Classify the submitted record and render the result
pub async fn predict(
    State(state): State<AppState>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    match &state.predictor {
        PredictorState::Halted(message) => halted(message),
        PredictorState::Ready(predictor) => {
            let record = form::collect(&params);
            let outcome = PredictionOutcome::from(predictor.classify(&record));
            Html(render::render_page(&record, Some(&outcome))).into_response()
        }
    }
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status_code, status, model, error) = match &state.predictor {
        PredictorState::Ready(predictor) => (
            StatusCode::OK,
            "ready",
            Some(predictor.model_name().to_string()),
            None,
        ),
        PredictorState::Halted(message) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "halted",
            None,
            Some(message.to_string()),
        ),
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            model_loaded: model.is_some(),
            model,
            error,
            metrics: state.metrics.snapshot(),
        }),
    )
}

/// Health body: status plus the prediction counters at the top level
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_loaded: bool,
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub metrics: MetricsSnapshot,
}
