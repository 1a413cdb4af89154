use super::constants::{FALLBACK_FONT_FAMILY, ROOT_FONT_PX};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FontError {
    #[error("could not resolve font size {0:?} to pixels")]
    Unresolvable(String),
}

/// Font size as handed in by the host: plain pixels or any CSS length.
#[derive(Clone, Debug, PartialEq)]
pub enum FontSizeSpec {
    Px(f32),
    Css(String),
}

impl FontSizeSpec {
    /// Text used in the canvas `font` shorthand.
    pub fn css(&self) -> String {
        match self {
            FontSizeSpec::Px(px) => format!("{}px", px),
            FontSizeSpec::Css(s) => s.clone(),
        }
    }
}

impl FontSizeSpec {
    /// Numeric size from the host; only finite positive pixels qualify.
    pub fn from_px(px: f64) -> Option<Self> {
        let px = px as f32;
        (px.is_finite() && px > 0.0).then_some(FontSizeSpec::Px(px))
    }
}

impl From<f32> for FontSizeSpec {
    fn from(px: f32) -> Self {
        FontSizeSpec::Px(px)
    }
}

impl From<&str> for FontSizeSpec {
    fn from(s: &str) -> Self {
        let t = s.trim();
        let numeric = t.strip_suffix("px").unwrap_or(t).trim();
        match numeric.parse::<f32>() {
            Ok(px) if px.is_finite() => FontSizeSpec::Px(px),
            _ => FontSizeSpec::Css(t.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontFamily {
    Inherit,
    Named(String),
}

impl FontFamily {
    pub fn parse(s: &str) -> Self {
        let t = s.trim();
        if t.is_empty() || t.eq_ignore_ascii_case("inherit") {
            FontFamily::Inherit
        } else {
            FontFamily::Named(t.to_string())
        }
    }

    /// Resolve against the family the host element computes, if any.
    pub fn resolve(&self, inherited: Option<&str>) -> String {
        match self {
            FontFamily::Named(name) => name.clone(),
            FontFamily::Inherit => inherited
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(FALLBACK_FONT_FAMILY)
                .to_string(),
        }
    }
}

/// Turns a symbolic CSS size into pixels. Browsers answer this with a layout
/// probe; tests and headless hosts can use [`RelativeUnitResolver`].
pub trait FontSizeResolver {
    fn resolve_px(&self, css: &str) -> Option<f32>;
}

/// Resolves `px`, `rem`, `em`, `%` and bare numbers without a layout engine.
#[derive(Clone, Copy, Debug)]
pub struct RelativeUnitResolver {
    pub root_px: f32,
    pub parent_px: f32,
}

impl Default for RelativeUnitResolver {
    fn default() -> Self {
        Self {
            root_px: ROOT_FONT_PX,
            parent_px: ROOT_FONT_PX,
        }
    }
}

impl FontSizeResolver for RelativeUnitResolver {
    fn resolve_px(&self, css: &str) -> Option<f32> {
        let s = css.trim();
        let (number, scale) = if let Some(n) = s.strip_suffix("rem") {
            (n, self.root_px)
        } else if let Some(n) = s.strip_suffix("em") {
            (n, self.parent_px)
        } else if let Some(n) = s.strip_suffix("px") {
            (n, 1.0)
        } else if let Some(n) = s.strip_suffix('%') {
            (n, self.parent_px / 100.0)
        } else {
            (s, 1.0)
        };
        let v: f32 = number.trim().parse().ok()?;
        let px = v * scale;
        (px.is_finite() && px > 0.0).then_some(px)
    }
}

pub fn resolve_font_px(
    spec: &FontSizeSpec,
    resolver: &dyn FontSizeResolver,
) -> Result<f32, FontError> {
    let px = match spec {
        FontSizeSpec::Px(px) => Some(*px),
        FontSizeSpec::Css(css) => resolver.resolve_px(css),
    };
    match px {
        Some(px) if px.is_finite() && px > 0.0 => Ok(px),
        _ => Err(FontError::Unresolvable(spec.css())),
    }
}

#[inline]
pub fn font_shorthand(weight: u16, size_css: &str, family: &str) -> String {
    format!("{} {} {}", weight, size_css, family)
}

/// Size and `font` shorthand handed to the 2D context.
#[derive(Debug, PartialEq)]
pub struct CanvasFont {
    pub px: f32,
    pub shorthand: String,
    /// Set when the size stayed symbolic; `px` is then the root size.
    pub unresolved: Option<FontError>,
}

/// Resolve `spec` and build the canvas font around the resolved pixels.
/// Canvas contexts reject math functions and viewport units in `font`, so
/// the CSS text only survives when no pixel size could be found.
pub fn canvas_font(
    weight: u16,
    spec: &FontSizeSpec,
    family: &str,
    resolver: &dyn FontSizeResolver,
) -> CanvasFont {
    match resolve_font_px(spec, resolver) {
        Ok(px) => CanvasFont {
            px,
            shorthand: font_shorthand(weight, &format!("{}px", px), family),
            unresolved: None,
        },
        Err(e) => CanvasFont {
            px: ROOT_FONT_PX,
            shorthand: font_shorthand(weight, &spec.css(), family),
            unresolved: Some(e),
        },
    }
}
