//! Predictor adapter: record in, validated churn prediction out

use crate::config::ModelConfig;
use crate::error::{ModelError, PredictionError};
use crate::feature_extractor::FeatureExtractor;
use crate::metrics::PredictionMetrics;
use crate::models::inference::{ChurnClassifier, RawPrediction};
use crate::models::loader::ModelLoader;
use crate::types::prediction::{ChurnLabel, ChurnPrediction};
use crate::types::record::CustomerFeatureRecord;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Classifies customer records with a loaded, read-only model
#[derive(Clone)]
pub struct ChurnPredictor {
    classifier: Arc<dyn ChurnClassifier>,
    extractor: Arc<FeatureExtractor>,
    metrics: Arc<PredictionMetrics>,
}

impl ChurnPredictor {
    /// Wrap an already loaded classifier
    pub fn new(classifier: Arc<dyn ChurnClassifier>, metrics: Arc<PredictionMetrics>) -> Self {
        Self {
            classifier,
            extractor: Arc::new(FeatureExtractor::new()),
            metrics,
        }
    }

    /// Load the configured model artifact
    pub fn load(config: &ModelConfig, metrics: Arc<PredictionMetrics>) -> Result<Self, ModelError> {
        let classifier = ModelLoader::with_threads(config.onnx_threads).load(&config.path)?;
        Ok(Self::new(Arc::from(classifier), metrics))
    }

    /// Name of the underlying model
    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }

    /// Classify one record.
    ///
    /// Output outside the binary contract (label not 0/1, probability NaN or
    /// outside [0, 1], label disagreeing with the 0.5 threshold) is rejected
    /// rather than clamped.
    pub fn classify(
        &self,
        record: &CustomerFeatureRecord,
    ) -> Result<ChurnPrediction, PredictionError> {
        let features = self.extractor.extract(record);
        let start = Instant::now();

        let result = self
            .classifier
            .predict(&features)
            .and_then(Self::validate);

        match result {
            Ok(prediction) => {
                let elapsed = start.elapsed();
                self.metrics.record_prediction(elapsed, &prediction);
                debug!(
                    model = %self.classifier.name(),
                    label = ?prediction.label,
                    churn_probability = prediction.churn_probability,
                    inference_us = elapsed.as_micros(),
                    "Prediction complete"
                );
                Ok(prediction)
            }
            Err(e) => {
                self.metrics.record_failure();
                warn!(model = %self.classifier.name(), error = %e, "Prediction failed");
                Err(e)
            }
        }
    }

    fn validate(raw: RawPrediction) -> Result<ChurnPrediction, PredictionError> {
        let label = ChurnLabel::from_class(raw.class).ok_or_else(|| {
            PredictionError::new(format!("model returned unknown class {}", raw.class))
        })?;

        let p = raw.churn_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(PredictionError::new(format!(
                "model returned churn probability {} outside [0, 1]",
                p
            )));
        }

        if label != ChurnLabel::from_probability(p) {
            return Err(PredictionError::new(format!(
                "model returned class {} for churn probability {}",
                raw.class, p
            )));
        }

        Ok(ChurnPrediction::new(label, p))
    }
}
