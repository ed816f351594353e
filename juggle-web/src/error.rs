//! Errors raised while configuring the tracker or loading recordings
//!
//! Steady-state ticking never fails; only host-supplied settings and JSON
//! can be rejected.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("processVariance must be a finite number > 0 (got {0})")]
    InvalidProcessVariance(f64),

    #[error("measurementVariance must be a finite number > 0 (got {0})")]
    InvalidMeasurementVariance(f64),

    #[error("bufferCapacity must be at least 3 (got {0})")]
    BufferTooSmall(usize),

    #[error("defaultDiameter must be a finite number > 0 (got {0})")]
    InvalidDefaultDiameter(f64),

    #[error("scoreThreshold must be within 0..=1 (got {0})")]
    InvalidScoreThreshold(f64),

    #[error("recording fps must be a finite number > 0 (got {0})")]
    InvalidFrameRate(f64),

    #[error("malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

impl From<TrackerError> for JsValue {
    fn from(err: TrackerError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
