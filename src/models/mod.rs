//! ML model loading and inference components

pub mod inference;
pub mod linear;
pub mod loader;
pub mod predictor;

pub use inference::{ChurnClassifier, OnnxClassifier, RawPrediction};
pub use linear::LinearClassifier;
pub use loader::ModelLoader;
pub use predictor::ChurnPredictor;
