//! Offline replay of a recorded detection log
//!
//! Feeds frames through a fresh tracker at a fixed frame rate so a recorded
//! clip always yields the same count. Used to regression-test tuning.

use serde::Deserialize;

use super::config::TrackerConfig;
use super::detection::{select_best, Detection, DisplayGeometry};
use super::session::JuggleTracker;
use crate::error::TrackerError;

/// Frame rate assumed when a recording does not specify one
pub const DEFAULT_FPS: f64 = 30.0;

/// Detector output for one video frame
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordedFrame {
    /// Capture time; defaults to `index * 1000 / fps`
    pub timestamp_ms: Option<f64>,
    pub detections: Vec<Detection>,
}

/// A recorded clip
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// Video → display mapping; identity when absent
    #[serde(default)]
    pub geometry: Option<DisplayGeometry>,
    pub frames: Vec<RecordedFrame>,
}

fn default_fps() -> f64 {
    DEFAULT_FPS
}

impl Recording {
    pub fn from_json(json: &str) -> Result<Self, TrackerError> {
        let recording: Self = serde_json::from_str(json)?;
        if !(recording.fps.is_finite() && recording.fps > 0.0) {
            return Err(TrackerError::InvalidFrameRate(recording.fps));
        }
        Ok(recording)
    }
}

/// What a replay produced
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplaySummary {
    pub count: u32,
    pub frames: usize,
    pub observed_frames: usize,
    pub extrapolated_frames: usize,
    /// Timestamp of each counted apex
    pub juggle_timestamps_ms: Vec<f64>,
}

/// Run `recording` through a new tracker built from `config`
pub fn replay(recording: &Recording, config: TrackerConfig) -> Result<ReplaySummary, TrackerError> {
    if !(recording.fps.is_finite() && recording.fps > 0.0) {
        return Err(TrackerError::InvalidFrameRate(recording.fps));
    }
    let mut tracker = JuggleTracker::new(config)?;
    let filter = tracker.detection_filter();
    let geometry = recording.geometry.unwrap_or_default();
    let frame_ms = 1000.0 / recording.fps;

    let mut summary = ReplaySummary {
        frames: recording.frames.len(),
        ..Default::default()
    };

    for (index, frame) in recording.frames.iter().enumerate() {
        let timestamp_ms = frame.timestamp_ms.unwrap_or(index as f64 * frame_ms);
        let observation = select_best(&frame.detections, &filter).map(|d| geometry.observe(&d.bounding_box));

        let outcome = tracker.tick(timestamp_ms, observation);
        if let Some(sample) = &outcome.latest {
            if sample.is_extrapolated {
                summary.extrapolated_frames += 1;
            } else {
                summary.observed_frames += 1;
            }
        }
        if let Some(apex) = outcome.apex.as_ref().filter(|a| a.fired) {
            if let Some(peak) = tracker.trajectory().get(apex.apex_index) {
                summary.juggle_timestamps_ms.push(peak.timestamp_ms);
            }
        }
    }

    summary.count = tracker.count();
    log::info!(
        "replayed {} frames: {} juggles ({} observed, {} extrapolated)",
        summary.frames,
        summary.count,
        summary.observed_frames,
        summary.extrapolated_frames
    );
    Ok(summary)
}
