use crate::core::{FieldVariant, FontFamily, FontSizeSpec, GlyphRenderConfig, ParticleFieldConfig, Rgb};
use crate::dom;
use crate::glyph::{GlyphJitterHandle, GlyphOptions};
use crate::particles::{ParticleFieldHandle, ParticleOptions};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

pub const FUZZY_TEXT_SELECTOR: &str = "canvas[data-fuzzy-text]";
pub const PARTICLE_CANVAS_ID: &str = "particle-background";

/// All effects mounted from the page markup. Call `unmount()` (or `free()`)
/// to tear everything down.
#[wasm_bindgen]
pub struct PageEffects {
    glyphs: Vec<GlyphJitterHandle>,
    background: Option<ParticleFieldHandle>,
}

#[wasm_bindgen]
impl PageEffects {
    #[wasm_bindgen(getter, js_name = glyphCount)]
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    #[wasm_bindgen(getter, js_name = hasBackground)]
    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    pub fn unmount(&mut self) {
        for g in self.glyphs.drain(..) {
            g.unmount();
        }
        if let Some(mut bg) = self.background.take() {
            bg.unmount();
        }
    }
}

/// Mount every `canvas[data-fuzzy-text]` and the `#particle-background`
/// canvas found in the current document.
#[wasm_bindgen(js_name = mountPage)]
pub fn mount_page() -> Result<PageEffects, JsValue> {
    let document = dom::window_document().ok_or_else(|| JsValue::from_str("no document"))?;

    let mut glyphs = Vec::new();
    let nodes = document.query_selector_all(FUZZY_TEXT_SELECTOR)?;
    for i in 0..nodes.length() {
        let Some(canvas) = nodes
            .get(i)
            .and_then(|n| n.dyn_into::<web::HtmlCanvasElement>().ok())
        else {
            continue;
        };
        let options = GlyphOptions::from_config(glyph_config_from(&canvas));
        glyphs.push(GlyphJitterHandle::mount(canvas, &options));
    }

    let background = document
        .get_element_by_id(PARTICLE_CANVAS_ID)
        .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
        .map(|canvas| {
            let options = ParticleOptions::from_config(particle_config_from(&canvas));
            ParticleFieldHandle::mount(canvas, &options)
        });

    log::info!(
        "[page] mounted {} fuzzy text canvas(es), background: {}",
        glyphs.len(),
        background.is_some()
    );
    Ok(PageEffects { glyphs, background })
}

fn attr(el: &web::Element, name: &str) -> Option<String> {
    el.get_attribute(name).filter(|s| !s.trim().is_empty())
}

fn attr_parse<T: std::str::FromStr>(el: &web::Element, name: &str) -> Option<T> {
    let raw = attr(el, name)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("[page] ignoring {}={:?}", name, raw);
            None
        }
    }
}

fn glyph_config_from(el: &web::Element) -> GlyphRenderConfig {
    let mut config = GlyphRenderConfig::new(attr(el, "data-fuzzy-text").unwrap_or_default());
    if let Some(size) = attr(el, "data-font-size") {
        config.font_size = FontSizeSpec::from(size.as_str());
    }
    if let Some(weight) = attr_parse(el, "data-font-weight") {
        config.font_weight = weight;
    }
    if let Some(family) = attr(el, "data-font-family") {
        config.font_family = FontFamily::parse(&family);
    }
    if let Some(color) = attr(el, "data-color") {
        match Rgb::parse(&color) {
            Ok(c) => config.color = c,
            Err(e) => log::warn!("[page] {}", e),
        }
    }
    if let Some(hover) = attr_parse(el, "data-hover") {
        config.hover_enabled = hover;
    }
    if let Some(base) = attr_parse(el, "data-base-intensity") {
        config.base_intensity = base;
    }
    if let Some(hover) = attr_parse(el, "data-hover-intensity") {
        config.hover_intensity = hover;
    }
    config
}

fn particle_config_from(el: &web::Element) -> ParticleFieldConfig {
    let mut config = ParticleFieldConfig {
        adaptive_count: true,
        ..ParticleFieldConfig::default()
    };
    if let Some(variant) = attr(el, "data-variant") {
        match FieldVariant::parse(&variant) {
            Some(v) => config.variant = v,
            None => log::warn!("[page] unknown particle variant {:?}", variant),
        }
    }
    config
}
