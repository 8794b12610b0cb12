//! Application-level configuration constants.

// Storage keys
pub const ITEMS_KEY: &str = "poh_items";
pub const SETTINGS_KEY: &str = "poh_settings";

// Settings panel slider
pub const DURATION_STEP_MS: u32 = 250;

// Wheel canvas (CSS pixels)
pub const WHEEL_CANVAS_SIZE: f64 = 1200.0;
pub const WHEEL_RIM_MARGIN: f64 = 30.0;
pub const WHEEL_HUB_RADIUS: f64 = 40.0;
pub const LABEL_MAX_WIDTH: f64 = 120.0;
pub const LABEL_LINE_HEIGHT: f64 = 20.0;

// UI behavior
pub const NOTICE_TIMEOUT_MS: u32 = 4000;
pub const MAX_ITEM_NAME_LEN: usize = 60;
pub const MAX_PRESET_NAME_LEN: usize = 40;
