//! Tracker session storage and JS bridge
//!
//! Receives detector boxes from JavaScript once per video frame, runs the
//! tracking pipeline and exposes the count and trail for rendering.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::tracking::{
    layout_trail, replay, select_best, BoundingBox, Detection, DisplayGeometry, JuggleTracker,
    Recording, TickOutcome, TrackerConfig,
};

/// Values per box in the flat array from JS: originX, originY, width, height, score
pub const BOX_STRIDE: usize = 5;

/// Values per sample in `get_trajectory`
pub const TRAJECTORY_STRIDE: usize = 8;

/// Values per dot in `get_trail_layout`
pub const TRAIL_STRIDE: usize = 4;

/// Per-page tracking state
#[derive(Default)]
struct TrackerStore {
    tracker: JuggleTracker,
    geometry: DisplayGeometry,
}

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static TRACKER: RefCell<TrackerStore> = RefCell::new(TrackerStore::default());
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Replace the session with a new one built from a JSON config
/// (empty string = defaults)
#[wasm_bindgen]
pub fn init_tracker(config_json: &str) -> Result<(), JsValue> {
    let config = TrackerConfig::from_json(config_json)?;
    let tracker = JuggleTracker::new(config)?;
    TRACKER.with(|store_cell| {
        store_cell.borrow_mut().tracker = tracker;
    });
    log::info!("juggle tracker initialised");
    Ok(())
}

/// Video resolution and on-screen size, used to map boxes to display pixels
#[wasm_bindgen]
pub fn set_display_geometry(video_width: f64, video_height: f64, display_width: f64, display_height: f64) {
    TRACKER.with(|store_cell| {
        store_cell.borrow_mut().geometry =
            DisplayGeometry::new(video_width, video_height, display_width, display_height);
    });
}

/// Called from JavaScript with a flat Float32Array of boxes
/// (n × [originX, originY, width, height, score]). Returns the juggle count.
#[wasm_bindgen]
pub fn submit_detections(boxes: &[f32]) -> u32 {
    let detections = parse_boxes(boxes).unwrap_or_else(|| {
        log::warn!(
            "Invalid detection data length: {} (expected a multiple of {})",
            boxes.len(),
            BOX_STRIDE
        );
        Vec::new()
    });
    tick_at(js_sys::Date::now(), &detections).count
}

/// Frame without any detection - extrapolate only
#[wasm_bindgen]
pub fn submit_no_detection() -> u32 {
    tick_at(js_sys::Date::now(), &[]).count
}

#[wasm_bindgen]
pub fn get_juggle_count() -> u32 {
    TRACKER.with(|store_cell| store_cell.borrow().tracker.count())
}

/// Start over: count 0, empty trail, filters unlocked
#[wasm_bindgen]
pub fn reset_tracker() {
    TRACKER.with(|store_cell| store_cell.borrow_mut().tracker.reset());
}

/// Trail samples, oldest first, 8 values each:
/// x, y, vx, vy, diameter, extrapolated (0/1), timestamp_ms, ordinal (-1 = none)
#[wasm_bindgen]
pub fn get_trajectory() -> Vec<f64> {
    TRACKER.with(|store_cell| {
        let store = store_cell.borrow();
        let trajectory = store.tracker.trajectory();
        let mut result = Vec::with_capacity(trajectory.len() * TRAJECTORY_STRIDE);
        for s in trajectory.iter() {
            result.extend_from_slice(&[
                s.position.0,
                s.position.1,
                s.velocity.0,
                s.velocity.1,
                s.diameter,
                if s.is_extrapolated { 1.0 } else { 0.0 },
                s.timestamp_ms,
                s.juggle_ordinal.map_or(-1.0, f64::from),
            ]);
        }
        result
    })
}

/// Trail dots laid out in a frame, 4 values each: x, y, size, flags
#[wasm_bindgen]
pub fn get_trail_layout(frame_width: f32, frame_height: f32) -> Vec<f32> {
    TRACKER.with(|store_cell| {
        let store = store_cell.borrow();
        layout_trail(store.tracker.trajectory(), frame_width, frame_height)
            .iter()
            .flat_map(|dot| [dot.x, dot.y, dot.size, dot.flags() as f32])
            .collect()
    })
}

/// Debug label of the trail sample at `index` ("ordinal\ny,ratio")
#[wasm_bindgen]
pub fn get_trail_label(index: usize) -> Option<String> {
    TRACKER.with(|store_cell| {
        let store = store_cell.borrow();
        store
            .tracker
            .trajectory()
            .get(index)
            .and_then(|s| s.label.as_ref())
            .map(|label| label.to_string())
    })
}

/// Replay a recorded detection log with the current session's config.
/// The live session is left untouched. Returns the juggle count.
#[wasm_bindgen]
pub fn replay_recording(recording_json: &str) -> Result<u32, JsValue> {
    let recording = Recording::from_json(recording_json)?;
    let config = TRACKER.with(|store_cell| store_cell.borrow().tracker.config().clone());
    let summary = replay(&recording, config)?;
    Ok(summary.count)
}

// ============================================================================
// INTERNAL API (no wasm_bindgen)
// ============================================================================

/// Split the flat box array; `None` when the length is not a whole number of boxes
fn parse_boxes(boxes: &[f32]) -> Option<Vec<Detection>> {
    if boxes.len() % BOX_STRIDE != 0 {
        return None;
    }
    Some(
        boxes
            .chunks_exact(BOX_STRIDE)
            .map(|b| Detection {
                bounding_box: BoundingBox {
                    origin_x: f64::from(b[0]),
                    origin_y: f64::from(b[1]),
                    width: f64::from(b[2]),
                    height: f64::from(b[3]),
                },
                score: f64::from(b[4]),
                category_name: None,
            })
            .collect(),
    )
}

/// Run one frame against the stored session
fn tick_at(timestamp_ms: f64, detections: &[Detection]) -> TickOutcome {
    TRACKER.with(|store_cell| {
        let mut store = store_cell.borrow_mut();
        let filter = store.tracker.detection_filter();
        let observation = select_best(detections, &filter).map(|d| store.geometry.observe(&d.bounding_box));
        store.tracker.tick(timestamp_ms, observation)
    })
}
