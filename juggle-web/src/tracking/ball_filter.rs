//! Ball filter - X/Y Kalman pair sharing one clock
//!
//! Observed frames are folded in with `observe`, missing frames are bridged
//! with `extrapolate`. Both advance the filters to "now" afterwards.

use super::kalman::AxisKalman;

/// Smoothed reading taken right after a measurement
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterEstimate {
    pub position: (f64, f64),
    pub velocity: (f64, f64),
}

/// Two independent axis filters with identical noise settings
#[derive(Clone, Debug)]
pub struct BallFilter {
    x: AxisKalman,
    y: AxisKalman,
    process_variance: f64,
    measurement_variance: f64,
}

impl BallFilter {
    pub fn new(process_variance: f64, measurement_variance: f64) -> Self {
        Self {
            x: AxisKalman::new(process_variance, measurement_variance),
            y: AxisKalman::new(process_variance, measurement_variance),
            process_variance,
            measurement_variance,
        }
    }

    /// Fold in an observed center, then predict `dt_seconds` ahead
    ///
    /// The very first observation seeds both axes directly (zero velocity
    /// and acceleration) instead of running an update, so there is no lag
    /// on initial lock-on.
    pub fn observe(&mut self, center: (f64, f64), dt_seconds: f64) -> FilterEstimate {
        if self.is_initialised() {
            self.x.update(center.0);
            self.y.update(center.1);
        } else {
            self.x.seed(center.0);
            self.y.seed(center.1);
        }

        let estimate = FilterEstimate {
            position: (self.x.position(), self.y.position()),
            velocity: (self.x.velocity(), self.y.velocity()),
        };

        self.x.predict(dt_seconds);
        self.y.predict(dt_seconds);

        estimate
    }

    /// Predict only (no detection this frame)
    ///
    /// Returns `None` until the filter has locked on.
    pub fn extrapolate(&mut self, dt_seconds: f64) -> Option<(f64, f64)> {
        if !self.is_initialised() {
            return None;
        }
        Some((self.x.predict(dt_seconds), self.y.predict(dt_seconds)))
    }

    pub fn is_initialised(&self) -> bool {
        self.x.is_initialised() && self.y.is_initialised()
    }

    pub fn axis_x(&self) -> &AxisKalman {
        &self.x
    }

    pub fn axis_y(&self) -> &AxisKalman {
        &self.y
    }

    /// Drop both filters; the next observation locks on afresh
    pub fn reset(&mut self) {
        self.x = AxisKalman::new(self.process_variance, self.measurement_variance);
        self.y = AxisKalman::new(self.process_variance, self.measurement_variance);
    }
}
