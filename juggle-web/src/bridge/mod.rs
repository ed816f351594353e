//! Bridge module - JS ↔ Rust communication
//! 
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod console;
mod tracker;

pub use console::{init_logging, set_log_level};

pub use tracker::{
    // WASM entry points
    init_tracker,
    set_display_geometry,
    submit_detections,
    submit_no_detection,
    get_juggle_count,
    reset_tracker,
    get_trajectory,
    get_trail_layout,
    get_trail_label,
    replay_recording,
    // Constants
    BOX_STRIDE, TRAJECTORY_STRIDE, TRAIL_STRIDE,
};
