//! Ball sample - one point of the tracked trajectory

use std::fmt;

/// Per-apex diagnostic shown next to a trail dot
#[derive(Clone, Debug, PartialEq)]
pub struct DebugLabel {
    /// Juggle number when the apex was counted
    pub ordinal: Option<u32>,
    /// Apex Y rounded to one decimal
    pub rounded_y: f64,
    /// drop_from_top / min_amplitude, one decimal
    pub amplitude_ratio: f64,
}

impl DebugLabel {
    pub fn new(ordinal: Option<u32>, y: f64, amplitude_ratio: f64) -> Self {
        Self {
            ordinal,
            rounded_y: round1(y),
            amplitude_ratio,
        }
    }

    /// Two display lines: ordinal (or "-") and "y,ratio"
    pub fn lines(&self) -> (String, String) {
        let first = match self.ordinal {
            Some(n) => n.to_string(),
            None => "-".to_string(),
        };
        (first, format!("{},{}", self.rounded_y, self.amplitude_ratio))
    }
}

impl fmt::Display for DebugLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (first, second) = self.lines();
        write!(f, "{}\n{}", first, second)
    }
}

/// State of the ball at one frame
#[derive(Clone, Debug, PartialEq)]
pub struct BallSample {
    /// Position in display pixels
    pub position: (f64, f64),

    /// Velocity in display pixels per second
    pub velocity: (f64, f64),

    /// Apparent ball diameter in display pixels
    pub diameter: f64,

    /// Produced by prediction alone (no detection this frame)?
    pub is_extrapolated: bool,

    /// Wall-clock capture time (ms)
    pub timestamp_ms: f64,

    /// Set on the apex of a counted juggle
    pub juggle_ordinal: Option<u32>,

    pub label: Option<DebugLabel>,
}

impl BallSample {
    pub fn x(&self) -> f64 {
        self.position.0
    }

    pub fn y(&self) -> f64 {
        self.position.1
    }
}

/// Input for appending a sample to the trajectory
#[derive(Clone, Debug)]
pub struct SampleInput {
    pub position: (f64, f64),
    /// Derived from the previous sample when `None`
    pub velocity: Option<(f64, f64)>,
    pub diameter: f64,
    pub is_extrapolated: bool,
    pub timestamp_ms: f64,
}

impl SampleInput {
    pub fn observed(position: (f64, f64), diameter: f64, timestamp_ms: f64) -> Self {
        Self {
            position,
            velocity: None,
            diameter,
            is_extrapolated: false,
            timestamp_ms,
        }
    }

    pub fn extrapolated(position: (f64, f64), diameter: f64, timestamp_ms: f64) -> Self {
        Self {
            is_extrapolated: true,
            ..Self::observed(position, diameter, timestamp_ms)
        }
    }

    pub fn with_velocity(mut self, velocity: (f64, f64)) -> Self {
        self.velocity = Some(velocity);
        self
    }
}

/// Round to one decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
