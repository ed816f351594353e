//! Tracking module - ball filtering, trajectory and juggle counting
//!
//! Re-exports only. All logic in submodules.

mod ball_filter;
mod config;
mod detection;
mod juggle;
mod kalman;
mod replay;
mod sample;
mod session;
mod trail;
mod trajectory;

pub use ball_filter::{BallFilter, FilterEstimate};
pub use config::{
    TrackerConfig, BUFFER_CAPACITY, DEFAULT_DIAMETER, MEASUREMENT_VARIANCE, PROCESS_VARIANCE,
    SCORE_THRESHOLD,
};
pub use detection::{select_best, BoundingBox, Detection, DetectionFilter, DisplayGeometry, Observation};
pub use juggle::{ApexOutcome, JuggleDetector};
pub use kalman::AxisKalman;
pub use replay::{replay, RecordedFrame, Recording, ReplaySummary, DEFAULT_FPS};
pub use sample::{BallSample, DebugLabel, SampleInput};
pub use session::{JuggleTracker, TickOutcome};
pub use trail::{layout_trail, TrailDot, DOT_SIZE, DOT_SIZE_JUGGLE};
pub use trajectory::{TrajectoryBuffer, DEFAULT_CAPACITY};
