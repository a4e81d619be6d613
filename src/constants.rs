// Web front-end wiring. Tuning values live in `oil_core::constants`.

pub const CANVAS_ID: &str = "app-canvas"; // <canvas> the surface is attached to

// Assets, relative to the page
pub const BASE_TEXTURE_URL: &str = "textures/oil.jpg";
pub const FLOW_MAP_URL: &str = "textures/flow.png";

// localStorage key holding the tuning preset JSON
pub const PRESET_STORAGE_KEY: &str = "oil.tuning";
