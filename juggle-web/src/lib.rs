//! Juggle Web - ball tracking and juggle counting for a browser detector
//! 
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules
//!
//! The tracking pipeline itself lives in [`tracking`] and has no browser
//! dependencies, so it can be driven from native code and tests.

mod bridge;
mod error;
pub mod tracking;

use wasm_bindgen::prelude::*;

pub use error::TrackerError;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    get_juggle_count, get_trail_label, get_trail_layout, get_trajectory, init_tracker,
    replay_recording, reset_tracker, set_display_geometry, set_log_level, submit_detections,
    submit_no_detection, BOX_STRIDE, TRAIL_STRIDE, TRAJECTORY_STRIDE,
};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    bridge::init_logging(log::LevelFilter::Info);
    log::info!("✅ Juggle tracker loaded");
}
