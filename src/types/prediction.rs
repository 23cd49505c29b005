//! Churn prediction result types

use serde::{Deserialize, Serialize};

/// Probability at or above which a customer is classed as churning
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Hard class predicted by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChurnLabel {
    /// Class 0
    Stay,
    /// Class 1, the positive class
    Churn,
}

impl ChurnLabel {
    /// Map a raw model class id onto a label
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(ChurnLabel::Stay),
            1 => Some(ChurnLabel::Churn),
            _ => None,
        }
    }

    /// Label implied by the standard binary threshold
    pub fn from_probability(churn_probability: f64) -> Self {
        if churn_probability >= DECISION_THRESHOLD {
            ChurnLabel::Churn
        } else {
            ChurnLabel::Stay
        }
    }

    pub fn class(self) -> u8 {
        match self {
            ChurnLabel::Stay => 0,
            ChurnLabel::Churn => 1,
        }
    }
}

/// Output of one classify call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChurnPrediction {
    pub label: ChurnLabel,
    /// Probability mass on the churn class, in [0, 1]
    pub churn_probability: f64,
}

impl ChurnPrediction {
    pub fn new(label: ChurnLabel, churn_probability: f64) -> Self {
        Self {
            label,
            churn_probability,
        }
    }

    pub fn is_churn(&self) -> bool {
        self.label == ChurnLabel::Churn
    }

    /// Result banner text
    pub fn headline(&self) -> &'static str {
        match self.label {
            ChurnLabel::Churn => "Customer is likely to Churn",
            ChurnLabel::Stay => "Customer is unlikely to Churn",
        }
    }

    /// Churn probability as a percentage with two decimals, e.g. `42.17%`
    pub fn percentage(&self) -> String {
        format!("{:.2}%", self.churn_probability * 100.0)
    }

    /// Progress bar fill in [0, 100]
    pub fn progress(&self) -> f64 {
        (self.churn_probability * 100.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_class() {
        assert_eq!(ChurnLabel::from_class(0), Some(ChurnLabel::Stay));
        assert_eq!(ChurnLabel::from_class(1), Some(ChurnLabel::Churn));
        assert_eq!(ChurnLabel::from_class(2), None);
        assert_eq!(ChurnLabel::from_class(-1), None);
    }

    #[test]
    fn test_label_threshold_boundary() {
        assert_eq!(ChurnLabel::from_probability(0.5), ChurnLabel::Churn);
        assert_eq!(ChurnLabel::from_probability(0.4999), ChurnLabel::Stay);
        assert_eq!(ChurnLabel::from_probability(1.0), ChurnLabel::Churn);
        assert_eq!(ChurnLabel::from_probability(0.0), ChurnLabel::Stay);
    }

    #[test]
    fn test_prediction_display() {
        let churn = ChurnPrediction::new(ChurnLabel::Churn, 0.8734);
        assert_eq!(churn.headline(), "Customer is likely to Churn");
        assert_eq!(churn.percentage(), "87.34%");
        assert!((churn.progress() - 87.34).abs() < 1e-9);

        let stay = ChurnPrediction::new(ChurnLabel::Stay, 0.05);
        assert_eq!(stay.headline(), "Customer is unlikely to Churn");
        assert_eq!(stay.percentage(), "5.00%");
    }

    #[test]
    fn test_prediction_serialization() {
        let prediction = ChurnPrediction::new(ChurnLabel::Churn, 0.75);
        let json = serde_json::to_string(&prediction).unwrap();
        assert_eq!(json, r#"{"label":"churn","churn_probability":0.75}"#);
    }
}
