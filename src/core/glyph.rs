use super::color::Rgb;
use super::constants::*;
use super::font::{FontFamily, FontSizeSpec};
use super::schedule::FrameThrottle;
use rand::Rng;

/// Everything that determines how a fuzzy text instance looks. A change to
/// any field means a fresh bitmap.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRenderConfig {
    pub text: String,
    pub font_size: FontSizeSpec,
    pub font_weight: u16,
    pub font_family: FontFamily,
    pub color: Rgb,
    pub hover_enabled: bool,
    pub base_intensity: f32,
    pub hover_intensity: f32,
}

impl Default for GlyphRenderConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: FontSizeSpec::Css(DEFAULT_FONT_SIZE.to_string()),
            font_weight: DEFAULT_FONT_WEIGHT,
            font_family: FontFamily::Inherit,
            color: Rgb::parse(DEFAULT_GLYPH_COLOR).unwrap_or(Rgb::WHITE),
            hover_enabled: true,
            base_intensity: DEFAULT_BASE_INTENSITY,
            hover_intensity: DEFAULT_HOVER_INTENSITY,
        }
    }
}

impl GlyphRenderConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Ink extents of a measured string relative to its alphabetic baseline
/// origin, as reported by the platform's actual bounding box metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InkExtents {
    pub left: f32,
    pub right: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl InkExtents {
    /// Fill in any metric the platform could not provide.
    pub fn from_measurement(
        left: Option<f64>,
        right: Option<f64>,
        advance: f64,
        ascent: Option<f64>,
        descent: Option<f64>,
        font_px: f32,
    ) -> Self {
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite()).map(|x| x as f32);
        Self {
            left: finite(left).unwrap_or(0.0),
            right: finite(right).unwrap_or(advance as f32),
            ascent: finite(ascent).unwrap_or(font_px),
            descent: finite(descent).unwrap_or(font_px * FALLBACK_DESCENT_RATIO),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// Measurements recorded once per bitmap and used for hit testing and
/// per-frame compositing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    pub tight_width: u32,
    pub tight_height: u32,
    pub offscreen_width: u32,
    pub interactive_bounds: Rect,
    pub fuzz_range: f32,
}

/// Sizes and offsets for the offscreen bitmap and the visible canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphLayout {
    pub metrics: TextMetrics,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Translation applied to the visible canvas before compositing.
    pub origin: [f32; 2],
    /// Where `fillText` places the string inside the offscreen bitmap.
    pub text_origin: [f32; 2],
}

impl GlyphLayout {
    pub fn compute(text: &str, ink: InkExtents) -> Self {
        if text.trim().is_empty() {
            return Self::empty();
        }
        let tight_width = (ink.left + ink.right).ceil().max(0.0) as u32;
        let tight_height = (ink.ascent + ink.descent).ceil().max(0.0) as u32;
        let offscreen_width = tight_width + OFFSCREEN_WIDTH_BUFFER_PX;
        let x_offset = (OFFSCREEN_WIDTH_BUFFER_PX / 2) as f32;

        let margin_x = HORIZONTAL_MARGIN_PX as f32;
        let margin_y = VERTICAL_MARGIN_PX as f32;
        let interactive_left = margin_x + x_offset;
        Self {
            metrics: TextMetrics {
                tight_width,
                tight_height,
                offscreen_width,
                interactive_bounds: Rect {
                    left: interactive_left,
                    top: margin_y,
                    right: interactive_left + tight_width as f32,
                    bottom: margin_y + tight_height as f32,
                },
                fuzz_range: FUZZ_RANGE_PX,
            },
            canvas_width: offscreen_width + HORIZONTAL_MARGIN_PX * 2,
            canvas_height: tight_height + VERTICAL_MARGIN_PX * 2,
            origin: [margin_x, margin_y],
            text_origin: [x_offset - ink.left, ink.ascent],
        }
    }

    /// Layout for blank text: a zero-sized bitmap that draws nothing.
    pub fn empty() -> Self {
        Self {
            metrics: TextMetrics {
                fuzz_range: FUZZ_RANGE_PX,
                ..TextMetrics::default()
            },
            canvas_width: HORIZONTAL_MARGIN_PX * 2,
            canvas_height: VERTICAL_MARGIN_PX * 2,
            origin: [HORIZONTAL_MARGIN_PX as f32, VERTICAL_MARGIN_PX as f32],
            text_origin: [0.0, 0.0],
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.metrics.tight_width == 0 || self.metrics.tight_height == 0
    }

    /// Region cleared each frame, in translated canvas coordinates:
    /// the bitmap grown by the fuzz range on every side.
    pub fn clear_region(&self) -> [f64; 4] {
        let fuzz = self.metrics.fuzz_range as f64;
        [
            -fuzz,
            -fuzz,
            self.metrics.offscreen_width as f64 + 2.0 * fuzz,
            self.metrics.tight_height as f64 + 2.0 * fuzz,
        ]
    }
}

/// Horizontal offset for one row. `unit` is a uniform sample in [0, 1).
#[inline]
pub fn jitter_offset(intensity: f32, fuzz_range: f32, unit: f32) -> i32 {
    let span = intensity * fuzz_range;
    let bound = span.abs().floor() as i32;
    let dx = (span * (unit - 0.5)).floor() as i32;
    dx.clamp(-bound, bound)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoverState {
    pub is_hovering: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Throttled,
    Drawn,
    Empty,
}

/// Drawing seam for the compositor: the visible canvas with the offscreen
/// bitmap as its row source.
pub trait RowBlitter {
    fn clear(&mut self, x: f64, y: f64, w: f64, h: f64);
    /// Copy bitmap row `row` (`width` px wide, 1px tall) to `(dx, row)`.
    fn blit_row(&mut self, row: u32, dx: i32, width: u32);
}

/// Per-instance jitter state, owned by the renderer for the lifetime of one
/// bitmap.
#[derive(Clone, Debug)]
pub struct GlyphJitter {
    layout: GlyphLayout,
    hover_enabled: bool,
    base_intensity: f32,
    hover_intensity: f32,
    hover: HoverState,
    throttle: FrameThrottle,
    offsets: Vec<i32>,
}

impl GlyphJitter {
    pub fn new(config: &GlyphRenderConfig, layout: GlyphLayout) -> Self {
        Self {
            layout,
            hover_enabled: config.hover_enabled,
            base_intensity: config.base_intensity,
            hover_intensity: config.hover_intensity,
            hover: HoverState::default(),
            throttle: FrameThrottle::new(GLYPH_FRAME_INTERVAL_MS),
            offsets: vec![0; layout.metrics.tight_height as usize],
        }
    }

    pub fn layout(&self) -> &GlyphLayout {
        &self.layout
    }

    pub fn hover(&self) -> HoverState {
        self.hover
    }

    /// Offsets used by the most recent drawn frame, one per bitmap row.
    pub fn offsets(&self) -> &[i32] {
        &self.offsets
    }

    #[inline]
    pub fn intensity(&self) -> f32 {
        if self.hover.is_hovering {
            self.hover_intensity
        } else {
            self.base_intensity
        }
    }

    /// Hit test a canvas-local pointer position against the ink bounds.
    pub fn pointer_at(&mut self, x: f32, y: f32) {
        if !self.hover_enabled || self.layout.is_empty() {
            return;
        }
        self.hover.is_hovering = self.layout.metrics.interactive_bounds.contains(x, y);
    }

    pub fn pointer_left(&mut self) {
        self.hover.is_hovering = false;
    }

    /// Forget the last frame time so the first frame after a resume draws.
    pub fn resume(&mut self) {
        self.throttle.reset();
    }

    pub fn render_frame<R, S>(&mut self, timestamp_ms: f64, rng: &mut R, surface: &mut S) -> FrameOutcome
    where
        R: Rng + ?Sized,
        S: RowBlitter + ?Sized,
    {
        if self.layout.is_empty() {
            return FrameOutcome::Empty;
        }
        if !self.throttle.should_run(timestamp_ms) {
            return FrameOutcome::Throttled;
        }
        let intensity = self.intensity();
        let fuzz = self.layout.metrics.fuzz_range;
        for dx in self.offsets.iter_mut() {
            *dx = jitter_offset(intensity, fuzz, rng.gen::<f32>());
        }

        let [x, y, w, h] = self.layout.clear_region();
        surface.clear(x, y, w, h);
        let width = self.layout.metrics.offscreen_width;
        for (row, dx) in self.offsets.iter().enumerate() {
            surface.blit_row(row as u32, *dx, width);
        }
        FrameOutcome::Drawn
    }
}
