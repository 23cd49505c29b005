//! Type definitions for the churn analyzer

pub mod prediction;
pub mod record;

pub use prediction::{ChurnLabel, ChurnPrediction};
pub use record::{CustomerFeatureRecord, FieldDomain, FieldSpec, FEATURE_COUNT, FIELD_SPECS};
