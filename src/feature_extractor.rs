//! Feature extraction for churn model inference.
//!
//! Converts a [`CustomerFeatureRecord`] into the flat vector the serialized
//! model was trained on. No engineered features: the model consumes the
//! thirteen raw columns directly.

use crate::types::record::{CustomerFeatureRecord, FEATURE_COUNT, FIELD_SPECS};

/// Feature extractor that transforms records into model input features.
///
/// Features are emitted in the exact column order of the training frame.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract features from a record.
    pub fn extract(&self, record: &CustomerFeatureRecord) -> Vec<f32> {
        record.values().iter().map(|&v| v as f32).collect()
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get feature names (matching the training column order).
    pub fn feature_names(&self) -> Vec<&'static str> {
        FIELD_SPECS.iter().map(|spec| spec.name).collect()
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_extraction() {
        let extractor = FeatureExtractor::new();
        let record = CustomerFeatureRecord {
            call_failure: 20,
            seconds_of_use: 20000,
            customer_value: 5000.0,
            ..Default::default()
        };

        let features = extractor.extract(&record);

        assert_eq!(features.len(), extractor.feature_count());
        assert_eq!(features[0], 20.0); // Call_Failure
        assert_eq!(features[4], 20000.0); // Seconds_of_Use
        assert_eq!(features[11], 30.0); // Age
        assert_eq!(features[12], 5000.0); // Customer_Value
    }

    #[test]
    fn test_feature_names() {
        let extractor = FeatureExtractor::new();
        assert_eq!(extractor.feature_count(), 13);
        assert_eq!(
            extractor.feature_names(),
            vec![
                "Call_Failure",
                "Complains",
                "Subscription_Length",
                "Charge_Amount",
                "Seconds_of_Use",
                "Frequency_of_use",
                "Frequency_of_SMS",
                "Distinct_Called_Numbers",
                "Age_Group",
                "Tariff_Plan",
                "Status",
                "Age",
                "Customer_Value",
            ]
        );
    }
}
