use csscolorparser::Color;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid CSS color {input:?}: {source}")]
pub struct ColorError {
    pub input: String,
    #[source]
    pub source: csscolorparser::ParseColorError,
}

/// Opaque 8-bit sRGB color as understood by canvas fill/stroke styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse any CSS `<color>` (named, hex, `rgb()`, `hsl()`, ...).
    /// Alpha is dropped; particles and glyphs carry their own opacity.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let color: Color = input.trim().parse().map_err(|source| ColorError {
            input: input.to_string(),
            source,
        })?;
        let [r, g, b, _a] = color.to_rgba8();
        Ok(Rgb::new(r, g, b))
    }

    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    pub fn to_css_alpha(self, alpha: f32) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            alpha.clamp(0.0, 1.0)
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
