//! Trail ("snake") layout for the trajectory display
//!
//! Maps the buffered samples into a frame: oldest on the left, newest on the
//! right, Y stretched over the frame height. Pure geometry, the host draws.

use super::sample::DebugLabel;
use super::trajectory::TrajectoryBuffer;

/// Dot size for ordinary samples (px)
pub const DOT_SIZE: f32 = 5.0;

/// Dot size for counted juggle apexes (px)
pub const DOT_SIZE_JUGGLE: f32 = 10.0;

/// One dot of the trail, positioned inside the frame
#[derive(Clone, Debug, PartialEq)]
pub struct TrailDot {
    /// Dot center in frame pixels
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub is_juggle: bool,
    pub is_extrapolated: bool,
    pub label: Option<DebugLabel>,
}

impl TrailDot {
    /// Packed flags for the JS side: bit 0 juggle, bit 1 extrapolated
    pub fn flags(&self) -> u32 {
        (self.is_juggle as u32) | ((self.is_extrapolated as u32) << 1)
    }
}

/// Lay out the whole buffer in a `frame_width` × `frame_height` frame
///
/// A single sample sits in the horizontal middle; a flat trail (no vertical
/// span) is drawn along the vertical middle.
pub fn layout_trail(trajectory: &TrajectoryBuffer, frame_width: f32, frame_height: f32) -> Vec<TrailDot> {
    let n = trajectory.len();
    if n == 0 {
        return Vec::new();
    }

    let (min_y, max_y) = trajectory
        .iter()
        .map(|s| s.y())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));
    let range_y = max_y - min_y;

    trajectory
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let x_frac = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.5 };
            let y_frac = if range_y > 0.0 {
                ((sample.y() - min_y) / range_y) as f32
            } else {
                0.5
            };
            let is_juggle = sample.juggle_ordinal.is_some();
            TrailDot {
                x: x_frac * frame_width,
                y: y_frac * frame_height,
                size: if is_juggle { DOT_SIZE_JUGGLE } else { DOT_SIZE },
                is_juggle,
                is_extrapolated: sample.is_extrapolated,
                label: sample.label.clone(),
            }
        })
        .collect()
}
