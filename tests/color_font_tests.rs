// Host-side tests for color parsing and font resolution.

#![allow(dead_code)]
mod constants {
    include!("../src/core/constants.rs");
}
mod color {
    include!("../src/core/color.rs");
}
mod font {
    include!("../src/core/font.rs");
}

use color::*;
use font::*;

#[test]
fn parses_hex_colors() {
    assert_eq!(Rgb::parse("#F97316").unwrap(), Rgb::new(0xf9, 0x73, 0x16));
    assert_eq!(Rgb::parse("#fff").unwrap(), Rgb::WHITE);
    assert_eq!(Rgb::parse("  #0a0B0c ").unwrap(), Rgb::new(10, 11, 12));
}

#[test]
fn parses_rgb_function() {
    assert_eq!(Rgb::parse("rgb(255, 128, 0)").unwrap(), Rgb::new(255, 128, 0));
    assert_eq!(Rgb::parse("rgb(1,2,3)").unwrap(), Rgb::new(1, 2, 3));
}

#[test]
fn accepts_everyday_css_color_forms() {
    assert_eq!(Rgb::parse("white").unwrap(), Rgb::WHITE);
    assert_eq!(Rgb::parse("orange").unwrap(), Rgb::new(255, 165, 0));
    assert_eq!(Rgb::parse("rgb(255 255 255)").unwrap(), Rgb::WHITE);
    // alpha is dropped, channels kept
    assert_eq!(Rgb::parse("rgba(255, 255, 255, 0.5)").unwrap(), Rgb::WHITE);
    assert_eq!(
        Rgb::parse("#F97316cc").unwrap(),
        Rgb::new(0xf9, 0x73, 0x16)
    );
    let hsl = Rgb::parse("hsl(24, 95%, 53%)").unwrap();
    assert!(hsl.r > 240 && hsl.g > 100 && hsl.g < 130 && hsl.b < 40, "{hsl:?}");
}

#[test]
fn rejects_bad_colors() {
    for bad in ["not-a-color", "#12345", "#ggg", "rgb(1, 2)", ""] {
        let err = Rgb::parse(bad).unwrap_err();
        assert_eq!(err.input, bad);
        assert!(err.to_string().contains("invalid CSS color"));
    }
}

#[test]
fn formats_css_strings() {
    let c = Rgb::new(249, 115, 22);
    assert_eq!(c.to_css(), "rgb(249, 115, 22)");
    assert_eq!(c.to_css_alpha(0.25), "rgba(249, 115, 22, 0.25)");
    assert_eq!(c.to_css_alpha(3.0), "rgba(249, 115, 22, 1)");
    assert_eq!(c.to_string(), "#f97316");
}

#[test]
fn font_size_spec_normalises_pixels() {
    assert_eq!(FontSizeSpec::from("48px"), FontSizeSpec::Px(48.0));
    assert_eq!(FontSizeSpec::from(" 36 "), FontSizeSpec::Px(36.0));
    assert_eq!(FontSizeSpec::from(24.0_f32), FontSizeSpec::Px(24.0));
    assert_eq!(FontSizeSpec::from("3rem"), FontSizeSpec::Css("3rem".into()));
    assert_eq!(
        FontSizeSpec::from("clamp(2rem, 10vw, 10rem)"),
        FontSizeSpec::Css("clamp(2rem, 10vw, 10rem)".into())
    );
    assert_eq!(FontSizeSpec::Px(48.0).css(), "48px");
    assert_eq!(FontSizeSpec::Css("3rem".into()).css(), "3rem");
}

#[test]
fn relative_units_resolve_without_layout() {
    let r = RelativeUnitResolver {
        root_px: 16.0,
        parent_px: 20.0,
    };
    assert_eq!(r.resolve_px("2rem"), Some(32.0));
    assert_eq!(r.resolve_px("1.5em"), Some(30.0));
    assert_eq!(r.resolve_px("50%"), Some(10.0));
    assert_eq!(r.resolve_px("18px"), Some(18.0));
    assert_eq!(r.resolve_px("18"), Some(18.0));
    assert_eq!(r.resolve_px("10vw"), None);
    assert_eq!(r.resolve_px("clamp(2rem, 10vw, 10rem)"), None);
    assert_eq!(r.resolve_px("-2rem"), None);
}

struct FixedResolver(Option<f32>);

impl FontSizeResolver for FixedResolver {
    fn resolve_px(&self, _css: &str) -> Option<f32> {
        self.0
    }
}

#[test]
fn numeric_sizes_skip_the_resolver() {
    let px = resolve_font_px(&FontSizeSpec::Px(40.0), &FixedResolver(None)).unwrap();
    assert_eq!(px, 40.0);
}

#[test]
fn symbolic_sizes_ask_the_resolver() {
    let spec = FontSizeSpec::from("clamp(2rem, 10vw, 10rem)");
    assert_eq!(resolve_font_px(&spec, &FixedResolver(Some(96.0))), Ok(96.0));
    assert_eq!(
        resolve_font_px(&spec, &FixedResolver(None)),
        Err(FontError::Unresolvable("clamp(2rem, 10vw, 10rem)".into()))
    );
    assert!(resolve_font_px(&spec, &FixedResolver(Some(0.0))).is_err());
}

#[test]
fn font_family_inherits_with_fallback() {
    assert_eq!(FontFamily::parse("inherit"), FontFamily::Inherit);
    assert_eq!(FontFamily::parse(""), FontFamily::Inherit);
    assert_eq!(FontFamily::Inherit.resolve(Some("Inter, sans-serif")), "Inter, sans-serif");
    assert_eq!(FontFamily::Inherit.resolve(Some("  ")), "sans-serif");
    assert_eq!(FontFamily::Inherit.resolve(None), "sans-serif");
    assert_eq!(FontFamily::parse("Space Grotesk").resolve(Some("Inter")), "Space Grotesk");
}

#[test]
fn font_shorthand_orders_weight_size_family() {
    assert_eq!(font_shorthand(900, "2rem", "Inter"), "900 2rem Inter");
}

#[test]
fn canvas_font_uses_resolved_pixels_not_css_functions() {
    let spec = FontSizeSpec::from("clamp(2rem, 10vw, 10rem)");
    let font = canvas_font(900, &spec, "Inter", &FixedResolver(Some(96.0)));
    assert_eq!(font.px, 96.0);
    assert_eq!(font.shorthand, "900 96px Inter");
    assert!(!font.shorthand.contains("clamp"));
    assert_eq!(font.unresolved, None);

    let rem = canvas_font(700, &FontSizeSpec::from("2rem"), "serif", &RelativeUnitResolver::default());
    assert_eq!(rem.shorthand, "700 32px serif");
}

#[test]
fn canvas_font_keeps_css_text_only_when_unresolvable() {
    let spec = FontSizeSpec::from("clamp(2rem, 10vw, 10rem)");
    let font = canvas_font(900, &spec, "Inter", &FixedResolver(None));
    assert_eq!(font.px, 16.0);
    assert_eq!(font.shorthand, "900 clamp(2rem, 10vw, 10rem) Inter");
    assert!(matches!(font.unresolved, Some(FontError::Unresolvable(_))));
}

#[test]
fn numeric_font_size_must_be_finite_and_positive() {
    assert_eq!(FontSizeSpec::from_px(48.0), Some(FontSizeSpec::Px(48.0)));
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.0, -12.0] {
        assert_eq!(FontSizeSpec::from_px(bad), None, "{bad} accepted");
    }
}
