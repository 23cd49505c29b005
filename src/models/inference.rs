//! Churn classifier interface and the ONNX Runtime implementation

use crate::error::PredictionError;
use ort::memory::Allocator;
use ort::session::Session;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType};
use std::sync::Mutex;
use tracing::debug;

/// Raw model output before validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPrediction {
    /// Hard class id as reported by the model
    pub class: i64,
    /// Probability mass on class 1
    pub churn_probability: f64,
}

/// A loaded, immutable binary classifier.
///
/// Implementations receive features in contract order and must not mutate
/// observable state between calls.
pub trait ChurnClassifier: Send + Sync {
    /// Short name for logs and the health endpoint
    fn name(&self) -> &str;

    /// Run inference on one feature vector
    fn predict(&self, features: &[f32]) -> Result<RawPrediction, PredictionError>;
}

/// Classifier backed by an ONNX Runtime session
pub struct OnnxClassifier {
    name: String,
    /// Session runs need exclusive access
    session: Mutex<Session>,
    input_name: String,
    label_output: Option<String>,
    probability_output: String,
}

impl OnnxClassifier {
    pub fn new(
        name: String,
        session: Session,
        input_name: String,
        label_output: Option<String>,
        probability_output: String,
    ) -> Self {
        Self {
            name,
            session: Mutex::new(session),
            input_name,
            label_output,
            probability_output,
        }
    }

    /// Extract churn probability from model output.
    /// Handles both tensor outputs and seq(map) outputs (sklearn ZipMap).
    fn extract_probability(
        &self,
        outputs: &ort::session::SessionOutputs,
    ) -> Result<f64, PredictionError> {
        if let Some(output) = outputs.get(&self.probability_output) {
            let dtype = output.dtype();

            if let Ok(tensor) = output.try_extract_tensor::<f32>() {
                let (shape, data) = tensor;
                let prob = Self::churn_prob_from_tensor(shape, data)?;
                debug!(model = %self.name, prob = prob, "Extracted from tensor");
                return Ok(prob);
            }

            if DynSequenceValueType::can_downcast(&dtype) {
                return self.extract_from_sequence_map(output);
            }
        }

        // Fallback: any non-label output carrying probabilities
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }

            let dtype = output.dtype();

            if let Ok(tensor) = output.try_extract_tensor::<f32>() {
                let (shape, data) = tensor;
                let prob = Self::churn_prob_from_tensor(shape, data)?;
                debug!(model = %self.name, output = %name, prob = prob, "Extracted from tensor (fallback)");
                return Ok(prob);
            }

            if DynSequenceValueType::can_downcast(&dtype) {
                if let Ok(prob) = self.extract_from_sequence_map(&output) {
                    return Ok(prob);
                }
            }
        }

        Err(PredictionError::new(format!(
            "model '{}' produced no probability output",
            self.name
        )))
    }

    /// Extract probability from seq(map(int64, float)) format
    fn extract_from_sequence_map(
        &self,
        output: &ort::value::DynValue,
    ) -> Result<f64, PredictionError> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| PredictionError::new(format!("Failed to downcast to sequence: {}", e)))?;

        let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;

        // batch size is always 1
        let map_value = maps
            .first()
            .ok_or_else(|| PredictionError::new("Empty probability sequence"))?;

        let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;

        if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 1) {
            debug!(model = %self.name, prob = *prob, "Extracted from seq(map)");
            return Ok(*prob as f64);
        }

        if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 0) {
            return Ok(1.0 - *prob as f64);
        }

        Err(PredictionError::new("No churn probability found in map"))
    }

    /// Extract churn probability from tensor data
    fn churn_prob_from_tensor(
        shape: &ort::tensor::Shape,
        data: &[f32],
    ) -> Result<f64, PredictionError> {
        let dims: Vec<i64> = shape.iter().copied().collect();
        let num_classes = dims.last().copied().unwrap_or(0);

        match (dims.len(), num_classes) {
            // [batch, classes] or [classes]
            (1 | 2, n) if n >= 2 && data.len() >= 2 => Ok(data[1] as f64),
            // [batch, 1] or [1]: single positive-class probability
            (1 | 2, 1) if !data.is_empty() => Ok(data[0] as f64),
            _ => Err(PredictionError::new(format!(
                "unexpected probability tensor shape {:?}",
                dims
            ))),
        }
    }

    fn extract_label(
        &self,
        outputs: &ort::session::SessionOutputs,
    ) -> Result<Option<i64>, PredictionError> {
        let Some(label_output) = &self.label_output else {
            return Ok(None);
        };
        let Some(output) = outputs.get(label_output) else {
            return Ok(None);
        };

        let (_, data) = output.try_extract_tensor::<i64>()?;
        data.first()
            .copied()
            .map(Some)
            .ok_or_else(|| PredictionError::new("Empty label tensor"))
    }
}

impl ChurnClassifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &[f32]) -> Result<RawPrediction, PredictionError> {
        use ort::value::Tensor;

        // Input tensor shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| PredictionError::new(format!("Lock error: {}", e)))?;

        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        let churn_probability = self.extract_probability(&outputs)?;
        let class = match self.extract_label(&outputs)? {
            Some(class) => class,
            None => crate::types::ChurnLabel::from_probability(churn_probability).class() as i64,
        };

        Ok(RawPrediction {
            class,
            churn_probability,
        })
    }
}
