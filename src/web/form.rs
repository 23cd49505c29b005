//! Input collection: raw control values to a feature record

use crate::types::record::{CustomerFeatureRecord, FEATURE_COUNT, FIELD_SPECS};
use std::collections::HashMap;

/// Build a record from submitted control values.
///
/// Keys are the model column names. Every field is coerced into its domain,
/// so the result is always a valid record.
pub fn collect(params: &HashMap<String, String>) -> CustomerFeatureRecord {
    let mut values = [0.0; FEATURE_COUNT];
    for (slot, spec) in values.iter_mut().zip(FIELD_SPECS.iter()) {
        *slot = spec.coerce(params.get(spec.name).map(String::as_str));
    }
    CustomerFeatureRecord::from_values(&values)
}
