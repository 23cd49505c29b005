//! Customer Churn Analyzer Library
//!
//! Serves an interactive page that collects thirteen customer attributes and
//! classifies them with a pre-trained churn model loaded once at startup.

pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod types;
pub mod web;

pub use config::AppConfig;
pub use error::{ModelError, PredictionError};
pub use feature_extractor::FeatureExtractor;
pub use models::predictor::ChurnPredictor;
pub use types::{prediction::ChurnPrediction, record::CustomerFeatureRecord};
