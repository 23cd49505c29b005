//! Error types for model loading and prediction

use std::path::PathBuf;
use thiserror::Error;

/// Startup failures while loading the model artifact. Both variants are fatal.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The artifact does not exist at the configured path
    #[error("Error: '{}' not found. Please ensure the model file is in the same directory as the app.", path.display())]
    NotFound { path: PathBuf },

    /// The artifact exists but could not be deserialized
    #[error("An error occurred while loading the model: {reason}")]
    Load { path: PathBuf, reason: String },
}

impl ModelError {
    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ModelError::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Path of the artifact that failed to load
    pub fn path(&self) -> &std::path::Path {
        match self {
            ModelError::NotFound { path } | ModelError::Load { path, .. } => path,
        }
    }
}

/// Recoverable failure of a single classify call
#[derive(Error, Debug, Clone, PartialEq)]
#[error("An error occurred during prediction: {0}")]
pub struct PredictionError(pub String);

impl PredictionError {
    pub fn new(message: impl ToString) -> Self {
        Self(message.to_string())
    }
}

impl From<ort::Error> for PredictionError {
    fn from(err: ort::Error) -> Self {
        Self(err.to_string())
    }
}
