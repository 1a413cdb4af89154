use crate::core::constants::{GLYPH_VISIBILITY_THRESHOLD, POINTER_THROTTLE_MS};
use crate::core::{
    canvas_font, CanvasFont, EventThrottle, FontFamily, FontSizeSpec, FrameGate, FrameOutcome,
    GlyphJitter, GlyphLayout, GlyphRenderConfig, InkExtents, LoopCommand, Rgb, RowBlitter,
};
use crate::dom::{self, Listener, Listeners, ProbeResolver, VisibilityObserver};
use crate::frame::AnimationLoop;
use crate::input;
use anyhow::anyhow;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Construction options for a fuzzy text canvas.
#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct GlyphOptions {
    config: GlyphRenderConfig,
}

#[wasm_bindgen]
impl GlyphOptions {
    #[wasm_bindgen(constructor)]
    pub fn new(text: String) -> GlyphOptions {
        GlyphOptions {
            config: GlyphRenderConfig::new(text),
        }
    }

    /// Accepts a number (pixels) or any CSS length string.
    #[wasm_bindgen(js_name = fontSize)]
    pub fn font_size(mut self, size: JsValue) -> GlyphOptions {
        if let Some(px) = size.as_f64() {
            match FontSizeSpec::from_px(px) {
                Some(spec) => self.config.font_size = spec,
                None => log::warn!("[glyph] ignoring fontSize {}", px),
            }
        } else if let Some(css) = size.as_string() {
            self.config.font_size = FontSizeSpec::from(css.as_str());
        } else {
            log::warn!("[glyph] ignoring fontSize {:?}", size);
        }
        self
    }

    #[wasm_bindgen(js_name = fontWeight)]
    pub fn font_weight(mut self, weight: u16) -> GlyphOptions {
        self.config.font_weight = weight;
        self
    }

    #[wasm_bindgen(js_name = fontFamily)]
    pub fn font_family(mut self, family: &str) -> GlyphOptions {
        self.config.font_family = FontFamily::parse(family);
        self
    }

    pub fn color(mut self, css: &str) -> GlyphOptions {
        match Rgb::parse(css) {
            Ok(c) => self.config.color = c,
            Err(e) => log::warn!("[glyph] {}", e),
        }
        self
    }

    #[wasm_bindgen(js_name = enableHover)]
    pub fn enable_hover(mut self, enabled: bool) -> GlyphOptions {
        self.config.hover_enabled = enabled;
        self
    }

    #[wasm_bindgen(js_name = baseIntensity)]
    pub fn base_intensity(mut self, intensity: f32) -> GlyphOptions {
        self.config.base_intensity = intensity;
        self
    }

    #[wasm_bindgen(js_name = hoverIntensity)]
    pub fn hover_intensity(mut self, intensity: f32) -> GlyphOptions {
        self.config.hover_intensity = intensity;
        self
    }
}

impl GlyphOptions {
    pub(crate) fn from_config(config: GlyphRenderConfig) -> Self {
        Self { config }
    }
}

/// Visible canvas plus the offscreen bitmap it samples rows from.
struct CanvasBlitter {
    ctx: web::CanvasRenderingContext2d,
    bitmap: web::HtmlCanvasElement,
}

impl RowBlitter for CanvasBlitter {
    fn clear(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.clear_rect(x, y, w, h);
    }

    fn blit_row(&mut self, row: u32, dx: i32, width: u32) {
        let (row, width) = (row as f64, width as f64);
        let _ = self
            .ctx
            .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.bitmap,
                0.0,
                row,
                width,
                1.0,
                dx as f64,
                row,
                width,
                1.0,
            );
    }
}

struct GlyphRuntime {
    jitter: GlyphJitter,
    gate: FrameGate,
    rng: StdRng,
    surface: CanvasBlitter,
    touch_throttle: EventThrottle,
}

impl GlyphRuntime {
    fn frame(&mut self, timestamp: f64) -> bool {
        if !self.gate.begin_frame() {
            return false;
        }
        let Self {
            jitter,
            gate,
            rng,
            surface,
            ..
        } = self;
        if jitter.render_frame(timestamp, rng, surface) == FrameOutcome::Drawn {
            gate.frame_drawn();
        }
        true
    }
}

/// Everything registered by a finished mount. Field order is drop order:
/// stop observing, drop listeners, then cancel the frame loop.
struct Mounted {
    runtime: Option<Rc<RefCell<GlyphRuntime>>>,
    _observer: Option<VisibilityObserver>,
    _listeners: Listeners,
    _frames: Option<AnimationLoop>,
}

impl Drop for Mounted {
    fn drop(&mut self) {
        // a frame already queued must not draw once teardown starts
        if let Some(rt) = &self.runtime {
            if let Ok(mut rt) = rt.try_borrow_mut() {
                rt.gate.halt();
            }
        }
    }
}

/// A mounted fuzzy text effect. Unmounting (or dropping) removes every
/// listener, observer and pending frame, including while the initial font
/// wait is still in flight.
#[wasm_bindgen]
pub struct GlyphJitterHandle {
    cancelled: Rc<Cell<bool>>,
    mounted: Rc<RefCell<Option<Mounted>>>,
}

#[wasm_bindgen]
impl GlyphJitterHandle {
    pub fn mount(canvas: web::HtmlCanvasElement, options: &GlyphOptions) -> GlyphJitterHandle {
        let cancelled = Rc::new(Cell::new(false));
        let mounted = Rc::new(RefCell::new(None));
        let config = options.config.clone();

        let cancelled_init = cancelled.clone();
        let mounted_init = mounted.clone();
        spawn_local(async move {
            match init(canvas, config, cancelled_init.clone()).await {
                Ok(Some(m)) if !cancelled_init.get() => {
                    *mounted_init.borrow_mut() = Some(m);
                }
                Ok(_) => log::debug!("[glyph] mount abandoned"),
                Err(e) => log::warn!("[glyph] init error: {:?}", e),
            }
        });

        GlyphJitterHandle { cancelled, mounted }
    }

    pub fn unmount(&self) {
        self.cancelled.set(true);
        self.mounted.borrow_mut().take();
    }
}

impl Drop for GlyphJitterHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

async fn fonts_ready(document: &web::Document) {
    let ready = js_sys::Reflect::get(document, &JsValue::from_str("fonts"))
        .ok()
        .filter(|fonts| !fonts.is_undefined() && !fonts.is_null())
        .and_then(|fonts| js_sys::Reflect::get(&fonts, &JsValue::from_str("ready")).ok())
        .and_then(|ready| ready.dyn_into::<js_sys::Promise>().ok());
    if let Some(promise) = ready {
        if let Err(e) = JsFuture::from(promise).await {
            log::warn!("[glyph] document.fonts.ready rejected: {:?}", e);
        }
    }
}

/// Rasterize `config.text` once into a fresh offscreen canvas.
fn rasterize(
    document: &web::Document,
    canvas: &web::HtmlCanvasElement,
    config: &GlyphRenderConfig,
) -> anyhow::Result<Option<(web::HtmlCanvasElement, GlyphLayout)>> {
    let family = config
        .font_family
        .resolve(dom::computed_font_family(canvas).as_deref());
    let CanvasFont {
        px: font_px,
        shorthand: font,
        unresolved,
    } = canvas_font(
        config.font_weight,
        &config.font_size,
        &family,
        &ProbeResolver::new(document.clone()),
    );
    if let Some(e) = unresolved {
        log::warn!("[glyph] {}; assuming {}px", e, font_px);
    }

    let bitmap = document
        .create_element("canvas")
        .map_err(|e| anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow!("{:?}", e))?;
    let Some(bctx) = dom::context_2d(&bitmap) else {
        return Ok(None);
    };
    bctx.set_font(&font);
    bctx.set_text_baseline("alphabetic");
    let m = bctx
        .measure_text(&config.text)
        .map_err(|e| anyhow!("{:?}", e))?;
    let ink = InkExtents::from_measurement(
        Some(m.actual_bounding_box_left()),
        Some(m.actual_bounding_box_right()),
        m.width(),
        Some(m.actual_bounding_box_ascent()),
        Some(m.actual_bounding_box_descent()),
        font_px,
    );
    let layout = GlyphLayout::compute(&config.text, ink);

    bitmap.set_width(layout.metrics.offscreen_width);
    bitmap.set_height(layout.metrics.tight_height);
    if !layout.is_empty() {
        // resizing reset the context state
        bctx.set_font(&font);
        bctx.set_text_baseline("alphabetic");
        bctx.set_fill_style_str(&config.color.to_css());
        let [x, y] = layout.text_origin;
        bctx.fill_text(&config.text, x as f64, y as f64)
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    log::debug!(
        "[glyph] {:?} -> {}x{} bitmap ({})",
        config.text,
        layout.metrics.offscreen_width,
        layout.metrics.tight_height,
        font
    );
    Ok(Some((bitmap, layout)))
}

async fn init(
    canvas: web::HtmlCanvasElement,
    config: GlyphRenderConfig,
    cancelled: Rc<Cell<bool>>,
) -> anyhow::Result<Option<Mounted>> {
    let document = dom::window_document().ok_or_else(|| anyhow!("no document"))?;
    fonts_ready(&document).await;
    if cancelled.get() {
        return Ok(None);
    }

    let Some(ctx) = dom::context_2d(&canvas) else {
        log::warn!("[glyph] 2D context unavailable; rendering nothing");
        return Ok(None);
    };
    let Some((bitmap, layout)) = rasterize(&document, &canvas, &config)? else {
        log::warn!("[glyph] offscreen 2D context unavailable; rendering nothing");
        return Ok(None);
    };

    canvas.set_width(layout.canvas_width);
    canvas.set_height(layout.canvas_height);
    ctx.translate(layout.origin[0] as f64, layout.origin[1] as f64)
        .map_err(|e| anyhow!("{:?}", e))?;

    if layout.is_empty() {
        return Ok(Some(Mounted {
            runtime: None,
            _observer: None,
            _listeners: Listeners::new(),
            _frames: None,
        }));
    }

    let runtime = Rc::new(RefCell::new(GlyphRuntime {
        jitter: GlyphJitter::new(&config, layout),
        gate: FrameGate::new(false),
        rng: StdRng::from_entropy(),
        surface: CanvasBlitter { ctx, bitmap },
        touch_throttle: EventThrottle::new(POINTER_THROTTLE_MS),
    }));

    let listeners = if config.hover_enabled {
        wire_hover(&canvas, &runtime)
    } else {
        Listeners::new()
    };

    let rt_frame = runtime.clone();
    let frames = AnimationLoop::new(move |timestamp| rt_frame.borrow_mut().frame(timestamp));

    let control = frames.control();
    let rt_vis = runtime.clone();
    let observer = VisibilityObserver::observe(&canvas, GLYPH_VISIBILITY_THRESHOLD, move |visible| {
        let mut rt = rt_vis.borrow_mut();
        let command = rt.gate.set_visible(visible);
        match command {
            LoopCommand::Start => {
                rt.jitter.resume();
                control.resume();
            }
            LoopCommand::Stop => control.pause(),
            LoopCommand::Keep => {}
        }
    });
    if observer.is_none() {
        // no IntersectionObserver: treat as always visible
        if runtime.borrow_mut().gate.set_visible(true) == LoopCommand::Start {
            frames.resume();
        }
    }

    log::info!(
        "[glyph] mounted {:?} ({}x{})",
        config.text,
        layout.canvas_width,
        layout.canvas_height
    );
    Ok(Some(Mounted {
        runtime: Some(runtime),
        _observer: observer,
        _listeners: listeners,
        _frames: Some(frames),
    }))
}

fn wire_hover(canvas: &web::HtmlCanvasElement, runtime: &Rc<RefCell<GlyphRuntime>>) -> Listeners {
    let mut listeners = Listeners::new();

    let rt = runtime.clone();
    let el = canvas.clone();
    listeners.extend(Listener::new(canvas, "mousemove", move |ev: web::MouseEvent| {
        let p = input::mouse_local_px(&ev, &el);
        rt.borrow_mut().jitter.pointer_at(p.x, p.y);
    }));

    let rt = runtime.clone();
    listeners.extend(Listener::new(canvas, "mouseleave", move |_: web::MouseEvent| {
        rt.borrow_mut().jitter.pointer_left();
    }));

    let rt = runtime.clone();
    let el = canvas.clone();
    listeners.extend(Listener::new_active(canvas, "touchmove", move |ev: web::TouchEvent| {
        ev.prevent_default();
        let mut rt = rt.borrow_mut();
        if !rt.touch_throttle.admit(ev.time_stamp()) {
            return;
        }
        if let Some(p) = input::touch_local_px(&ev, &el) {
            rt.jitter.pointer_at(p.x, p.y);
        }
    }));

    let rt = runtime.clone();
    listeners.extend(Listener::new(canvas, "touchend", move |_: web::TouchEvent| {
        rt.borrow_mut().jitter.pointer_left();
    }));

    listeners
}
