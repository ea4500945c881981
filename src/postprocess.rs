//! Turns raw regression output into integer class labels.
//!
//! The model emits one float per row in `outputs[0].Double.data`; each value is
//! rounded to the nearest class label and returned next to the original payload.

use serde_json::Value;
use tracing::debug;

use crate::error::{PostprocessError, Result};
use crate::models::{ResultEnvelope, RoundingMode};

// 2^63, the first f64 past the i64 range
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn round_one(index: usize, value: f64, mode: RoundingMode) -> Result<i64> {
    let rounded = mode.round(value);
    // NaN and infinities fail both comparisons
    if rounded >= -I64_BOUND && rounded < I64_BOUND {
        Ok(rounded as i64)
    } else {
        Err(PostprocessError::TypeConversion {
            index,
            value: value.to_string(),
        })
    }
}

/// Round every prediction to the nearest integer, keeping length and order.
pub fn round_predictions(values: &[f64], mode: RoundingMode) -> Result<Vec<i64>> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| round_one(index, value, mode))
        .collect()
}

fn field<'a>(value: &'a Value, parent: &str, key: &str) -> Result<&'a Value> {
    let path = if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    };
    let object = value.as_object().ok_or_else(|| {
        let location = if parent.is_empty() { "payload" } else { parent };
        PostprocessError::schema(&path, format!("{location} is not an object"))
    })?;
    object
        .get(key)
        .ok_or_else(|| PostprocessError::schema(&path, "key is missing"))
}

fn prediction_data(envelope: &Value) -> Result<&[Value]> {
    let outputs = field(envelope, "", "outputs")?
        .as_array()
        .ok_or_else(|| PostprocessError::schema("outputs", "expected an array"))?;
    let first = outputs
        .first()
        .ok_or_else(|| PostprocessError::schema("outputs[0]", "outputs is empty"))?;
    let double = field(first, "outputs[0]", "Double")?;
    field(double, "outputs[0].Double", "data")?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| PostprocessError::schema("outputs[0].Double.data", "expected an array"))
}

// Numbers are kept as their literal text, so anything outside the f64 range
// (e.g. `1e400`) has no f64 value and lands here too.
fn element_as_f64(index: usize, item: &Value) -> Result<f64> {
    item.as_f64().ok_or_else(|| PostprocessError::TypeConversion {
        index,
        value: item.to_string(),
    })
}

/// Pull `outputs[0].Double.data` out of a parsed inference payload.
pub fn extract_prediction_vector(envelope: &Value) -> Result<Vec<f64>> {
    prediction_data(envelope)?
        .iter()
        .enumerate()
        .map(|(index, item)| element_as_f64(index, item))
        .collect()
}

/// Integer literals are taken as-is so labels past 2^53 keep every digit;
/// everything else goes through f64 rounding.
fn label_for(index: usize, item: &Value, mode: RoundingMode) -> Result<i64> {
    match item.as_i64() {
        Some(exact) => Ok(exact),
        None => round_one(index, element_as_f64(index, item)?, mode),
    }
}

/// Parse an inference payload and build the result envelope for it.
///
/// Takes the raw body bytes; anything that is not UTF-8 JSON is a parse error.
pub fn assemble_response(data: impl AsRef<[u8]>, mode: RoundingMode) -> Result<ResultEnvelope> {
    let original: Value = serde_json::from_slice(data.as_ref())?;
    let prediction = prediction_data(&original)?
        .iter()
        .enumerate()
        .map(|(index, item)| label_for(index, item, mode))
        .collect::<Result<Vec<_>>>()?;
    debug!(len = prediction.len(), ?mode, "rounded prediction vector");

    Ok(ResultEnvelope {
        original,
        prediction,
    })
}

/// [`assemble_response`] with the default half-to-even rounding.
pub fn postprocess(data: impl AsRef<[u8]>) -> Result<ResultEnvelope> {
    assemble_response(data, RoundingMode::default())
}
