// Shared tuning constants used by both web and native frontends.

// Frame clock
pub const MAX_STEP_SECONDS: f32 = 1.0 / 30.0; // ~30 fps worth of simulated time per frame at most

// Plane layout
pub const PLANE_ASPECT_RATIO: f32 = 9.0 / 16.0; // plane height = plane width * ratio

// Cameras (orthographic, pixel units)
pub const CAMERA_NEAR: f32 = -10_000.0;
pub const CAMERA_FAR: f32 = 10_000.0;
pub const SCENE_CAMERA_Z: f32 = 500.0;
pub const TRAIL_CAMERA_Z: f32 = 100.0;

// Pointer smoothing and brush
pub const POINTER_SMOOTH_RATIO: f32 = 0.25; // fraction of the gap closed per trail tick
pub const POINTER_DELTA_SCALE: f32 = 100.0; // clamped distance -> brush units
pub const BRUSH_MAX_RADIUS: f32 = 19.0; // brush units mapped to 1.0 before easing
pub const BRUSH_BASE_RADIUS: f32 = 0.25; // radius at full eased delta, before scaling
pub const BRUSH_STRENGTH_MARGIN: f32 = 0.4; // min strength = max strength - margin

// Trail defaults
pub const DEFAULT_TRAIL_RADIUS_SCALE: f32 = 1.2;
pub const DEFAULT_TRAIL_STRENGTH: f32 = 1.6;
pub const DEFAULT_TRAIL_LENGTH: f32 = 0.02;
pub const INITIAL_BRUSH_RADIUS: f32 = 0.1;

// Surface defaults
pub const SURFACE_TIME_SCALE: f32 = 1.5;
pub const DEFAULT_FLOW_SPEED: f32 = 0.085;
pub const DEFAULT_FLOW_BLUR_RADIUS: f32 = 15.0;
pub const DEFAULT_NOISE_SPEED: f32 = 0.3;
pub const DEFAULT_NOISE_SCALE_X: f32 = 3.3;
pub const DEFAULT_NOISE_SCALE_Y: f32 = 4.4;
pub const DEFAULT_NOISE_AMPLITUDE: f32 = 0.05;

// Screen clear colour (linear RGBA)
pub const CLEAR_COLOR: [f64; 4] = [1.0, 1.0, 1.0, 1.0];
