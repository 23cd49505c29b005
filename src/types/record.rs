//! Customer feature record and its field schema

use serde::{Deserialize, Serialize};

/// Number of features in the model contract
pub const FEATURE_COUNT: usize = 13;

/// Value domain of a single input field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDomain {
    /// Inclusive integer range, rendered as a slider
    Integer { min: i64, max: i64 },
    /// Fixed set of integer choices, rendered as a select box
    Choice(&'static [i64]),
    /// Inclusive float range, rendered as a number input
    Float { min: f64, max: f64, step: f64 },
}

/// Schema entry for one field of [`CustomerFeatureRecord`]
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Column name expected by the model
    pub name: &'static str,
    /// Human readable control label
    pub label: &'static str,
    /// Optional help text shown under the control
    pub help: Option<&'static str>,
    pub domain: FieldDomain,
    pub default: f64,
}

impl FieldSpec {
    /// Whether `value` is reachable through this field's control
    pub fn contains(&self, value: f64) -> bool {
        match self.domain {
            FieldDomain::Integer { min, max } => {
                value.fract() == 0.0 && value >= min as f64 && value <= max as f64
            }
            FieldDomain::Choice(choices) => choices.iter().any(|&c| c as f64 == value),
            FieldDomain::Float { min, max, .. } => value >= min && value <= max,
        }
    }

    /// Map raw control input onto the field domain.
    ///
    /// Missing or unparseable input yields the default. Ranges clamp,
    /// choice sets fall back to the default.
    pub fn coerce(&self, raw: Option<&str>) -> f64 {
        let Some(value) = raw
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
        else {
            return self.default;
        };

        match self.domain {
            FieldDomain::Integer { min, max } => value.round().clamp(min as f64, max as f64),
            FieldDomain::Choice(_) if self.contains(value) => value,
            FieldDomain::Choice(_) => self.default,
            FieldDomain::Float { min, max, .. } => value.clamp(min, max),
        }
    }
}

const BINARY: &[i64] = &[0, 1];
const CHARGE_TIERS: &[i64] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
const AGE_GROUPS: &[i64] = &[1, 2, 3, 4, 5];
const ONE_OR_TWO: &[i64] = &[1, 2];

/// Field schema in model contract order
pub static FIELD_SPECS: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec {
        name: "Call_Failure",
        label: "Call Failures",
        help: None,
        domain: FieldDomain::Integer { min: 0, max: 20 },
        default: 5.0,
    },
    FieldSpec {
        name: "Complains",
        label: "Complains",
        help: Some("0 = No, 1 = Yes"),
        domain: FieldDomain::Choice(BINARY),
        default: 0.0,
    },
    FieldSpec {
        name: "Subscription_Length",
        label: "Subscription Length (months)",
        help: None,
        domain: FieldDomain::Integer { min: 1, max: 60 },
        default: 24.0,
    },
    FieldSpec {
        name: "Charge_Amount",
        label: "Charge Amount Tier",
        help: None,
        domain: FieldDomain::Choice(CHARGE_TIERS),
        default: 0.0,
    },
    FieldSpec {
        name: "Seconds_of_Use",
        label: "Seconds of Use",
        help: None,
        domain: FieldDomain::Integer { min: 0, max: 20000 },
        default: 5000.0,
    },
    FieldSpec {
        name: "Frequency_of_use",
        label: "Frequency of Use",
        help: None,
        domain: FieldDomain::Integer { min: 0, max: 200 },
        default: 50.0,
    },
    FieldSpec {
        name: "Frequency_of_SMS",
        label: "Frequency of SMS",
        help: None,
        domain: FieldDomain::Integer { min: 0, max: 500 },
        default: 50.0,
    },
    FieldSpec {
        name: "Distinct_Called_Numbers",
        label: "Distinct Called Numbers",
        help: None,
        domain: FieldDomain::Integer { min: 0, max: 100 },
        default: 20.0,
    },
    FieldSpec {
        name: "Age_Group",
        label: "Age Group",
        help: None,
        domain: FieldDomain::Choice(AGE_GROUPS),
        default: 4.0,
    },
    FieldSpec {
        name: "Tariff_Plan",
        label: "Tariff Plan",
        help: None,
        domain: FieldDomain::Choice(ONE_OR_TWO),
        default: 2.0,
    },
    FieldSpec {
        name: "Status",
        label: "Status",
        help: Some("Customer status tier"),
        domain: FieldDomain::Choice(ONE_OR_TWO),
        default: 2.0,
    },
    FieldSpec {
        name: "Age",
        label: "Age",
        help: None,
        domain: FieldDomain::Integer { min: 15, max: 80 },
        default: 30.0,
    },
    FieldSpec {
        name: "Customer_Value",
        label: "Customer Value",
        help: None,
        domain: FieldDomain::Float {
            min: 0.0,
            max: 5000.0,
            step: 50.0,
        },
        default: 500.0,
    },
];

/// One customer's attributes, as fed to the churn classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerFeatureRecord {
    #[serde(rename = "Call_Failure")]
    pub call_failure: u32,

    /// 0 = no complaints, 1 = complained
    #[serde(rename = "Complains")]
    pub complains: u8,

    /// Months subscribed
    #[serde(rename = "Subscription_Length")]
    pub subscription_length: u32,

    #[serde(rename = "Charge_Amount")]
    pub charge_amount: u8,

    #[serde(rename = "Seconds_of_Use")]
    pub seconds_of_use: u32,

    #[serde(rename = "Frequency_of_use")]
    pub frequency_of_use: u32,

    #[serde(rename = "Frequency_of_SMS")]
    pub frequency_of_sms: u32,

    #[serde(rename = "Distinct_Called_Numbers")]
    pub distinct_called_numbers: u32,

    #[serde(rename = "Age_Group")]
    pub age_group: u8,

    #[serde(rename = "Tariff_Plan")]
    pub tariff_plan: u8,

    #[serde(rename = "Status")]
    pub status: u8,

    #[serde(rename = "Age")]
    pub age: u32,

    #[serde(rename = "Customer_Value")]
    pub customer_value: f64,
}

impl CustomerFeatureRecord {
    /// Build a record from values in contract order.
    ///
    /// Values are expected to be within their domains already; see
    /// [`FieldSpec::coerce`].
    pub fn from_values(values: &[f64; FEATURE_COUNT]) -> Self {
        Self {
            call_failure: values[0] as u32,
            complains: values[1] as u8,
            subscription_length: values[2] as u32,
            charge_amount: values[3] as u8,
            seconds_of_use: values[4] as u32,
            frequency_of_use: values[5] as u32,
            frequency_of_sms: values[6] as u32,
            distinct_called_numbers: values[7] as u32,
            age_group: values[8] as u8,
            tariff_plan: values[9] as u8,
            status: values[10] as u8,
            age: values[11] as u32,
            customer_value: values[12],
        }
    }

    /// Field values in contract order
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.call_failure as f64,
            self.complains as f64,
            self.subscription_length as f64,
            self.charge_amount as f64,
            self.seconds_of_use as f64,
            self.frequency_of_use as f64,
            self.frequency_of_sms as f64,
            self.distinct_called_numbers as f64,
            self.age_group as f64,
            self.tariff_plan as f64,
            self.status as f64,
            self.age as f64,
            self.customer_value,
        ]
    }

    /// `(name, value)` pairs in contract order
    pub fn fields(&self) -> impl Iterator<Item = (&'static FieldSpec, f64)> {
        FIELD_SPECS.iter().zip(self.values())
    }

    /// Whether every field lies within its declared domain
    pub fn is_within_domain(&self) -> bool {
        self.fields().all(|(spec, value)| spec.contains(value))
    }
}

impl Default for CustomerFeatureRecord {
    fn default() -> Self {
        let mut defaults = [0.0; FEATURE_COUNT];
        for (slot, spec) in defaults.iter_mut().zip(FIELD_SPECS.iter()) {
            *slot = spec.default;
        }
        Self::from_values(&defaults)
    }
}
