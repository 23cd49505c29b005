//! Model artifact loader

use crate::error::ModelError;
use crate::models::inference::{ChurnClassifier, OnnxClassifier};
use crate::models::linear::LinearClassifier;
use anyhow::Context;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// Supported artifact formats, keyed by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// ONNX graph run through ONNX Runtime
    Onnx,
    /// Logistic-regression parameters as JSON
    LogisticJson,
}

impl ModelFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "onnx" => Some(ModelFormat::Onnx),
            "json" => Some(ModelFormat::LogisticJson),
            _ => None,
        }
    }
}

/// Loader for the churn model artifact
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load the classifier stored at `path`.
    ///
    /// A missing file is reported as [`ModelError::NotFound`]; every other
    /// failure is a [`ModelError::Load`].
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Box<dyn ChurnClassifier>, ModelError> {
        let path = path.as_ref();

        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ModelError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ModelError::load(path, e),
        })?;
        if !metadata.is_file() {
            return Err(ModelError::load(path, "model path is not a regular file"));
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();

        let classifier: Box<dyn ChurnClassifier> = match ModelFormat::from_path(path) {
            Some(ModelFormat::Onnx) => Box::new(self.load_onnx(path, &name)?),
            Some(ModelFormat::LogisticJson) => {
                info!(model = %name, path = %path.display(), "Loading logistic model");
                Box::new(LinearClassifier::from_file(path, &name)?)
            }
            None => {
                return Err(ModelError::load(
                    path,
                    format!(
                        "unsupported model format '{}' (expected .onnx or .json)",
                        path.display()
                    ),
                ))
            }
        };

        info!(model = %name, "Model loaded successfully");
        Ok(classifier)
    }

    /// Load an ONNX model from file
    fn load_onnx(&self, path: &Path, name: &str) -> Result<OnnxClassifier, ModelError> {
        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = self
            .build_session(path)
            .map_err(|e| ModelError::load(path, format!("{:#}", e)))?;

        if session.inputs.len() != 1 {
            return Err(ModelError::load(
                path,
                format!(
                    "expected a single float input, found {} inputs",
                    session.inputs.len()
                ),
            ));
        }
        let input_name = session.inputs[0].name.clone();

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone());

        let probability_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .or_else(|| session.outputs.iter().rev().find(|o| !o.name.contains("label")))
            .map(|o| o.name.clone())
            .ok_or_else(|| ModelError::load(path, "model has no probability output"))?;

        info!(
            model = %name,
            input = %input_name,
            label = ?label_output,
            output = %probability_output,
            "ONNX session ready"
        );

        Ok(OnnxClassifier::new(
            name.to_string(),
            session,
            input_name,
            label_output,
            probability_output,
        ))
    }

    fn build_session(&self, path: &Path) -> anyhow::Result<Session> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;
        Ok(session)
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ModelFormat::from_path(Path::new("models/churn.onnx")),
            Some(ModelFormat::Onnx)
        );
        assert_eq!(
            ModelFormat::from_path(Path::new("churn.JSON")),
            Some(ModelFormat::LogisticJson)
        );
        assert_eq!(ModelFormat::from_path(Path::new("churn.pkl")), None);
        assert_eq!(ModelFormat::from_path(Path::new("churn")), None);
    }

    #[test]
    fn test_missing_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customer_churn_model.onnx");

        let err = ModelLoader::new().load(&path).err().unwrap();
        assert!(matches!(err, ModelError::NotFound { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_directory_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelLoader::new().load(dir.path()).err().unwrap();
        assert!(matches!(err, ModelError::Load { .. }));
    }

    #[test]
    fn test_unreadable_path_is_load_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().join("customer_churn_model.onnx");

        let err = ModelLoader::new().load(&path).err().unwrap();
        assert!(matches!(err, ModelError::Load { .. }), "{:?}", err);
        assert!(!err.to_string().contains("not found"));
    }

    #[test]
    fn test_unsupported_format_is_load_error() {
        let mut file = tempfile::Builder::new().suffix(".pkl").tempfile().unwrap();
        file.write_all(b"\x80\x04pickle").unwrap();

        let err = ModelLoader::new().load(file.path()).err().unwrap();
        assert!(matches!(err, ModelError::Load { .. }));
        assert!(err.to_string().contains("unsupported model format"));
    }

    #[test]
    fn test_corrupt_json_is_load_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(b"[1, 2, 3]").unwrap();

        let err = ModelLoader::new().load(file.path()).err().unwrap();
        assert!(matches!(err, ModelError::Load { .. }));
    }

    #[test]
    fn test_corrupt_onnx_is_load_error() {
        let mut file = tempfile::Builder::new().suffix(".onnx").tempfile().unwrap();
        file.write_all(b"definitely not a protobuf graph").unwrap();

        let err = ModelLoader::new().load(file.path()).err().unwrap();
        assert!(matches!(err, ModelError::Load { .. }));
    }
}
