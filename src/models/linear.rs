//! Logistic-regression classifier loaded from a JSON artifact

use crate::error::{ModelError, PredictionError};
use crate::models::inference::{ChurnClassifier, RawPrediction};
use crate::types::prediction::ChurnLabel;
use crate::types::record::{FEATURE_COUNT, FIELD_SPECS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Standardization applied before the linear term: `(x - mean) / scale`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Serialized logistic-regression model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticArtifact {
    /// Column names in training order
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler: Option<Scaler>,
}

impl LogisticArtifact {
    /// Check the artifact against the record's feature contract
    pub fn validate(&self) -> Result<(), String> {
        let expected: Vec<&str> = FIELD_SPECS.iter().map(|spec| spec.name).collect();
        if self.feature_names != expected {
            return Err(format!(
                "feature names {:?} do not match expected {:?}",
                self.feature_names, expected
            ));
        }

        if self.coefficients.len() != FEATURE_COUNT {
            return Err(format!(
                "expected {} coefficients, found {}",
                FEATURE_COUNT,
                self.coefficients.len()
            ));
        }

        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != FEATURE_COUNT || scaler.scale.len() != FEATURE_COUNT {
                return Err("scaler mean/scale must have one entry per feature".to_string());
            }
            if scaler.scale.iter().any(|&s| s == 0.0 || !s.is_finite()) {
                return Err("scaler scale entries must be finite and non-zero".to_string());
            }
        }

        let finite = self.intercept.is_finite()
            && self.coefficients.iter().all(|c| c.is_finite())
            && self
                .scaler
                .as_ref()
                .map_or(true, |s| s.mean.iter().all(|m| m.is_finite()));
        if !finite {
            return Err("model parameters must be finite".to_string());
        }

        Ok(())
    }
}

/// Classifier evaluating a [`LogisticArtifact`]
pub struct LinearClassifier {
    name: String,
    artifact: LogisticArtifact,
}

impl LinearClassifier {
    /// Wrap an artifact after validating it
    pub fn new(name: impl Into<String>, artifact: LogisticArtifact) -> Result<Self, String> {
        artifact.validate()?;
        Ok(Self {
            name: name.into(),
            artifact,
        })
    }

    /// Read and validate an artifact from disk
    pub fn from_file<P: AsRef<Path>>(path: P, name: &str) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| ModelError::load(path, e))?;
        let artifact: LogisticArtifact =
            serde_json::from_slice(&bytes).map_err(|e| ModelError::load(path, e))?;

        Self::new(name, artifact).map_err(|reason| ModelError::load(path, reason))
    }

    fn logit(&self, features: &[f32]) -> f64 {
        let artifact = &self.artifact;
        features
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let x = match &artifact.scaler {
                    Some(scaler) => (x as f64 - scaler.mean[i]) / scaler.scale[i],
                    None => x as f64,
                };
                artifact.coefficients[i] * x
            })
            .sum::<f64>()
            + artifact.intercept
    }
}

impl ChurnClassifier for LinearClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &[f32]) -> Result<RawPrediction, PredictionError> {
        if features.len() != FEATURE_COUNT {
            return Err(PredictionError::new(format!(
                "expected {} features, got {}",
                FEATURE_COUNT,
                features.len()
            )));
        }

        let churn_probability = sigmoid(self.logit(features));

        Ok(RawPrediction {
            class: ChurnLabel::from_probability(churn_probability).class() as i64,
            churn_probability,
        })
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn artifact(coefficients: Vec<f64>, intercept: f64) -> LogisticArtifact {
        LogisticArtifact {
            feature_names: FIELD_SPECS.iter().map(|s| s.name.to_string()).collect(),
            coefficients,
            intercept,
            scaler: None,
        }
    }

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
        assert!(sigmoid(1000.0) <= 1.0);
        assert!(sigmoid(-1000.0) >= 0.0);
    }

    #[test]
    fn test_intercept_only_model() {
        let classifier = LinearClassifier::new("zero", artifact(vec![0.0; 13], 0.0)).unwrap();
        let raw = classifier.predict(&[1.0; 13]).unwrap();
        assert_eq!(raw.churn_probability, 0.5);
        assert_eq!(raw.class, 1);
    }

    #[test]
    fn test_scaler_applied() {
        let mut coefficients = vec![0.0; 13];
        coefficients[0] = 1.0;
        let mut model = artifact(coefficients, 0.0);
        model.scaler = Some(Scaler {
            mean: vec![5.0; 13],
            scale: vec![1.0; 13],
        });
        let classifier = LinearClassifier::new("scaled", model).unwrap();

        let mut features = [0.0_f32; 13];
        features[0] = 5.0;
        let raw = classifier.predict(&features).unwrap();
        assert!((raw.churn_probability - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_wrong_feature_order() {
        let mut model = artifact(vec![0.0; 13], 0.0);
        model.feature_names.swap(0, 1);
        let err = LinearClassifier::new("bad", model).err().unwrap();
        assert!(err.contains("do not match"));
    }

    #[test]
    fn test_rejects_wrong_coefficient_count() {
        let err = LinearClassifier::new("bad", artifact(vec![0.0; 12], 0.0))
            .err()
            .unwrap();
        assert!(err.contains("expected 13 coefficients"));
    }

    #[test]
    fn test_rejects_zero_scale() {
        let mut model = artifact(vec![0.0; 13], 0.0);
        model.scaler = Some(Scaler {
            mean: vec![0.0; 13],
            scale: vec![0.0; 13],
        });
        assert!(LinearClassifier::new("bad", model).is_err());
    }

    #[test]
    fn test_wrong_feature_count_is_prediction_error() {
        let classifier = LinearClassifier::new("zero", artifact(vec![0.0; 13], 0.0)).unwrap();
        let err = classifier.predict(&[0.0; 12]).unwrap_err();
        assert!(err.0.contains("expected 13 features, got 12"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&artifact(vec![0.1; 13], -2.0)).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let classifier = LinearClassifier::from_file(file.path(), "from_file").unwrap();
        assert_eq!(classifier.name(), "from_file");
    }

    #[test]
    fn test_from_file_corrupt() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = LinearClassifier::from_file(file.path(), "corrupt").err().unwrap();
        assert!(matches!(err, ModelError::Load { .. }));
    }
}
