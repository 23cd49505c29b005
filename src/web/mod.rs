//! Interactive page served over HTTP

pub mod form;
pub mod handlers;
pub mod render;
pub mod routes;

use crate::error::ModelError;
use crate::metrics::PredictionMetrics;
use crate::models::predictor::ChurnPredictor;
use std::sync::Arc;

pub use routes::build_router;

/// Whether the page can serve predictions
#[derive(Clone)]
pub enum PredictorState {
    /// Model loaded; the form is interactive
    Ready(ChurnPredictor),
    /// Model failed to load; every page shows only this message
    Halted(Arc<str>),
}

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub predictor: PredictorState,
    pub metrics: Arc<PredictionMetrics>,
}

impl AppState {
    pub fn ready(predictor: ChurnPredictor, metrics: Arc<PredictionMetrics>) -> Self {
        Self {
            predictor: PredictorState::Ready(predictor),
            metrics,
        }
    }

    pub fn halted(error: &ModelError, metrics: Arc<PredictionMetrics>) -> Self {
        Self {
            predictor: PredictorState::Halted(Arc::from(error.to_string())),
            metrics,
        }
    }
}
