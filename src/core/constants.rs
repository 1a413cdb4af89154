// Shared tuning constants for the glyph and particle effects.

// ---------------- Glyph jitter ----------------

// Max horizontal jitter (px) for a row at intensity 1.0
pub const FUZZ_RANGE_PX: f32 = 30.0;
// Slack added to the tight ink width of the offscreen bitmap
pub const OFFSCREEN_WIDTH_BUFFER_PX: u32 = 10;
// Margin on each side of the visible canvas reserved for jitter overflow
pub const HORIZONTAL_MARGIN_PX: u32 = 20;
pub const VERTICAL_MARGIN_PX: u32 = 0;

// Jitter recomposition runs at ~30fps
pub const GLYPH_FRAME_INTERVAL_MS: f64 = 33.0;
// Fraction of the canvas that must be on screen for the jitter loop to run
pub const GLYPH_VISIBILITY_THRESHOLD: f64 = 0.1;

// Fallbacks when the platform omits ink metrics
pub const FALLBACK_DESCENT_RATIO: f32 = 0.2; // of the font px size

// Defaults lifted from the site's hero text
pub const DEFAULT_FONT_SIZE: &str = "clamp(2rem, 10vw, 10rem)";
pub const DEFAULT_FONT_WEIGHT: u16 = 900;
pub const DEFAULT_GLYPH_COLOR: &str = "#F97316";
pub const DEFAULT_BASE_INTENSITY: f32 = 0.18;
pub const DEFAULT_HOVER_INTENSITY: f32 = 0.5;
pub const FALLBACK_FONT_FAMILY: &str = "sans-serif";
pub const ROOT_FONT_PX: f32 = 16.0;

// ---------------- Particle field ----------------

pub const DEFAULT_PARTICLE_COUNT: usize = 150;
pub const DEFAULT_PARTICLE_SPREAD: f32 = 2.0;
pub const DEFAULT_PARTICLE_SPEED: f32 = 0.12;
pub const DEFAULT_HOVER_FACTOR: f32 = 2.0;

// Drift (persistent background) variant
pub const DRIFT_MIN_RADIUS: f32 = 1.0;
pub const DRIFT_ALPHA_MIN: f32 = 0.3;
pub const DRIFT_ALPHA_SPAN: f32 = 0.5;
pub const DRIFT_INTERACTION_RADIUS: f32 = 100.0;

// Constellation (eased, linked) variant
pub const CONSTELLATION_MIN_RADIUS: f32 = 0.5;
pub const CONSTELLATION_ALPHA_MIN: f32 = 0.1;
pub const CONSTELLATION_ALPHA_SPAN: f32 = 0.3;
pub const CONSTELLATION_INTERACTION_RADIUS: f32 = 200.0;
pub const REPEL_TARGET_SCALE: f32 = 5.0; // target = pos + push * scale, push points away from the pointer
pub const REPEL_EASE: f32 = 0.1; // 10% convergence per frame
pub const RETURN_EASE: f32 = 0.01; // pull back toward the undisturbed path
pub const RETURN_SNAP_DISTANCE: f32 = 1.0;

// Connective lines
pub const LINK_DISTANCE: f32 = 100.0;
pub const LINK_MAX_ALPHA: f32 = 0.1;
pub const LINK_WIDTH: f32 = 0.5;

// Adaptive particle tiers (viewport CSS width)
pub const MOBILE_MAX_WIDTH: f32 = 768.0;
pub const TABLET_MAX_WIDTH: f32 = 1200.0;
pub const MOBILE_PARTICLES: usize = 100;
pub const TABLET_PARTICLES: usize = 150;
pub const DESKTOP_PARTICLES: usize = 200;

// ---------------- Scheduling ----------------

pub const POINTER_THROTTLE_MS: f64 = 16.0; // ~60Hz
pub const RESIZE_DEBOUNCE_MS: i32 = 100;
