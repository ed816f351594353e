//! Tracker configuration
//!
//! Fixed for the lifetime of a session. The host may pass it as JSON
//! (camelCase keys, every key optional).

use serde::Deserialize;

use crate::error::TrackerError;

/// Kalman process noise (how much we trust the kinematic model)
pub const PROCESS_VARIANCE: f64 = 0.01;

/// Kalman measurement noise (detector jitter, display px²)
pub const MEASUREMENT_VARIANCE: f64 = 0.1;

/// Samples kept for detection and the trail
pub const BUFFER_CAPACITY: usize = 30;

/// Diameter used for extrapolated samples before any detection was stored
pub const DEFAULT_DIAMETER: f64 = 40.0;

/// Detections scoring below this are ignored
pub const SCORE_THRESHOLD: f64 = 0.4;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackerConfig {
    pub process_variance: f64,
    pub measurement_variance: f64,
    pub buffer_capacity: usize,
    /// Debounce between counted juggles, 0 disables it
    pub min_juggle_interval_ms: u32,
    pub default_diameter: f64,
    pub score_threshold: f64,
    /// Only detections of this category are tracked (any when `None`)
    pub category_name: Option<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            process_variance: PROCESS_VARIANCE,
            measurement_variance: MEASUREMENT_VARIANCE,
            buffer_capacity: BUFFER_CAPACITY,
            min_juggle_interval_ms: 0,
            default_diameter: DEFAULT_DIAMETER,
            score_threshold: SCORE_THRESHOLD,
            category_name: None,
        }
    }
}

impl TrackerConfig {
    /// Parse and validate a JSON config; blank input gives the defaults
    pub fn from_json(json: &str) -> Result<Self, TrackerError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        if !is_positive(self.process_variance) {
            return Err(TrackerError::InvalidProcessVariance(self.process_variance));
        }
        if !is_positive(self.measurement_variance) {
            return Err(TrackerError::InvalidMeasurementVariance(self.measurement_variance));
        }
        if self.buffer_capacity < 3 {
            return Err(TrackerError::BufferTooSmall(self.buffer_capacity));
        }
        if !is_positive(self.default_diameter) {
            return Err(TrackerError::InvalidDefaultDiameter(self.default_diameter));
        }
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(TrackerError::InvalidScoreThreshold(self.score_threshold));
        }
        Ok(())
    }

    /// Debounced variant of the juggle counter
    pub fn with_min_interval(mut self, min_juggle_interval_ms: u32) -> Self {
        self.min_juggle_interval_ms = min_juggle_interval_ms;
        self
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
