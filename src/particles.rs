use crate::core::constants::{POINTER_THROTTLE_MS, RESIZE_DEBOUNCE_MS};
use crate::core::{
    EventThrottle, FieldVariant, FrameGate, LoopCommand, ParticleField, ParticleFieldConfig,
    ParticleSurface, PointerState, Rgb,
};
use crate::dom::{self, Listener, Listeners, Timeout};
use crate::frame::{AnimationLoop, LoopControl};
use crate::input;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

/// Construction options for the ambient particle field.
#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct ParticleOptions {
    config: ParticleFieldConfig,
}

#[wasm_bindgen]
impl ParticleOptions {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ParticleOptions {
        ParticleOptions::default()
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(mut self, count: u32) -> ParticleOptions {
        self.config.count = count as usize;
        self
    }

    /// Let the viewport's device tier pick the count (100 / 150 / 200).
    #[wasm_bindgen(js_name = adaptiveCount)]
    pub fn adaptive_count(mut self, adaptive: bool) -> ParticleOptions {
        self.config.adaptive_count = adaptive;
        self
    }

    #[wasm_bindgen(js_name = particleSpread)]
    pub fn particle_spread(mut self, spread: f32) -> ParticleOptions {
        self.config.spread = spread;
        self
    }

    pub fn speed(mut self, speed: f32) -> ParticleOptions {
        self.config.speed = speed;
        self
    }

    #[wasm_bindgen(js_name = particleColors)]
    pub fn particle_colors(mut self, colors: js_sys::Array) -> ParticleOptions {
        let parsed: Vec<Rgb> = colors
            .iter()
            .filter_map(|v| v.as_string())
            .filter_map(|s| {
                Rgb::parse(&s)
                    .map_err(|e| log::warn!("[particles] {}", e))
                    .ok()
            })
            .collect();
        if !parsed.is_empty() {
            self.config.colors = parsed;
        }
        self
    }

    #[wasm_bindgen(js_name = moveParticlesOnHover)]
    pub fn move_particles_on_hover(mut self, enabled: bool) -> ParticleOptions {
        self.config.hover_repel = enabled;
        self
    }

    #[wasm_bindgen(js_name = particleHoverFactor)]
    pub fn particle_hover_factor(mut self, factor: f32) -> ParticleOptions {
        self.config.hover_factor = factor;
        self
    }

    #[wasm_bindgen(js_name = alphaParticles)]
    pub fn alpha_particles(mut self, enabled: bool) -> ParticleOptions {
        self.config.alpha_blend = enabled;
        self
    }

    /// `"drift"` (default) or `"constellation"`.
    pub fn variant(mut self, name: &str) -> ParticleOptions {
        match FieldVariant::parse(name) {
            Some(v) => self.config.variant = v,
            None => log::warn!("[particles] unknown variant {:?}", name),
        }
        self
    }
}

impl ParticleOptions {
    pub(crate) fn from_config(config: ParticleFieldConfig) -> Self {
        Self { config }
    }
}

struct CanvasPainter {
    ctx: web::CanvasRenderingContext2d,
    fill: Option<Rgb>,
}

impl ParticleSurface for CanvasPainter {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.set_global_alpha(1.0);
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        if self.fill != Some(color) {
            self.ctx.set_fill_style_str(&color.to_css());
            self.fill = Some(color);
        }
        self.ctx.set_global_alpha(alpha as f64);
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.fill();
    }

    fn stroke_line(&mut self, a: Vec2, b: Vec2, alpha: f32, width: f32) {
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_stroke_style_str(&Rgb::WHITE.to_css_alpha(alpha));
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(a.x as f64, a.y as f64);
        self.ctx.line_to(b.x as f64, b.y as f64);
        self.ctx.stroke();
    }
}

struct FieldRuntime {
    canvas: web::HtmlCanvasElement,
    field: ParticleField,
    pointer: PointerState,
    pointer_throttle: EventThrottle,
    gate: FrameGate,
    rng: StdRng,
    painter: CanvasPainter,
}

impl FieldRuntime {
    fn frame(&mut self) -> bool {
        if !self.gate.begin_frame() {
            return false;
        }
        self.field.step(&self.pointer);
        self.field.render(&mut self.painter);
        self.gate.frame_drawn();
        true
    }

    fn reinitialize(&mut self) {
        let viewport = dom::sync_canvas_to_viewport(&self.canvas, &self.painter.ctx);
        // setting the canvas size dropped the cached fill style
        self.painter.fill = None;
        self.field.reinitialize(viewport, &mut self.rng);
        log::info!(
            "[particles] reinitialized {} particles for {}x{}",
            self.field.len(),
            viewport.width,
            viewport.height
        );
    }

    fn set_pointer(&mut self, pos: Option<Vec2>) {
        self.pointer = match pos {
            Some(p) => PointerState::at(p.x, p.y),
            None => PointerState {
                active: false,
                ..self.pointer
            },
        };
    }
}

/// Listeners and timers owned by a live field. Field order is drop order.
struct Mounted {
    runtime: Rc<RefCell<FieldRuntime>>,
    _listeners: Listeners,
    pending_resize: Rc<RefCell<Option<Timeout>>>,
    frames: AnimationLoop,
}

impl Drop for Mounted {
    fn drop(&mut self) {
        if let Ok(mut rt) = self.runtime.try_borrow_mut() {
            rt.gate.halt();
        }
        self.pending_resize.borrow_mut().take();
        self.frames.pause();
    }
}

/// A mounted particle field covering the viewport.
#[wasm_bindgen]
pub struct ParticleFieldHandle {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl ParticleFieldHandle {
    pub fn mount(canvas: web::HtmlCanvasElement, options: &ParticleOptions) -> ParticleFieldHandle {
        let mounted = mount_field(canvas, options.config.clone());
        ParticleFieldHandle { mounted }
    }

    pub fn unmount(&mut self) {
        if self.mounted.take().is_some() {
            log::info!("[particles] unmounted");
        }
    }
}

fn mount_field(canvas: web::HtmlCanvasElement, config: ParticleFieldConfig) -> Option<Mounted> {
    let Some(ctx) = dom::context_2d(&canvas) else {
        log::warn!("[particles] 2D context unavailable; rendering nothing");
        return None;
    };
    let window = web::window()?;
    let document = window.document()?;

    let viewport = dom::sync_canvas_to_viewport(&canvas, &ctx);
    let mut rng = StdRng::from_entropy();
    let hover_repel = config.hover_repel;
    let field = ParticleField::new(config, viewport, &mut rng);
    log::info!(
        "[particles] mounted {} particles for {}x{}",
        field.len(),
        viewport.width,
        viewport.height
    );

    let runtime = Rc::new(RefCell::new(FieldRuntime {
        canvas: canvas.clone(),
        field,
        pointer: PointerState::default(),
        pointer_throttle: EventThrottle::new(POINTER_THROTTLE_MS),
        gate: FrameGate::new(!document.hidden()),
        rng,
        painter: CanvasPainter { ctx, fill: None },
    }));

    let rt_frame = runtime.clone();
    let frames = AnimationLoop::new(move |_timestamp| rt_frame.borrow_mut().frame());
    let control = frames.control();

    let mut listeners = Listeners::new();
    listeners.extend(wire_visibility(&document, &runtime, control));

    let pending_resize = Rc::new(RefCell::new(None::<Timeout>));
    let pending = pending_resize.clone();
    let rt_resize = runtime.clone();
    listeners.extend(Listener::new(&window, "resize", move |_: web::Event| {
        let rt = rt_resize.clone();
        // replacing the slot clears the previous timer
        *pending.borrow_mut() = Timeout::new(RESIZE_DEBOUNCE_MS, move || {
            rt.borrow_mut().reinitialize();
        });
    }));

    if hover_repel {
        listeners.extend(wire_pointer(&window, &document, &canvas, &runtime));
    }

    if runtime.borrow_mut().gate.kick() == LoopCommand::Start {
        frames.resume();
    }

    Some(Mounted {
        runtime,
        _listeners: listeners,
        pending_resize,
        frames,
    })
}

fn wire_visibility(
    document: &web::Document,
    runtime: &Rc<RefCell<FieldRuntime>>,
    control: LoopControl,
) -> Option<Listener> {
    let rt = runtime.clone();
    Listener::new(document, "visibilitychange", move |_: web::Event| {
        let visible = !dom::document_hidden();
        let command = rt.borrow_mut().gate.set_visible(visible);
        match command {
            LoopCommand::Start => {
                log::debug!("[particles] tab visible; resuming");
                control.resume();
            }
            LoopCommand::Stop => {
                log::debug!("[particles] tab hidden; suspending");
                control.pause();
            }
            LoopCommand::Keep => {}
        }
    })
}

fn wire_pointer(
    window: &web::Window,
    document: &web::Document,
    canvas: &web::HtmlCanvasElement,
    runtime: &Rc<RefCell<FieldRuntime>>,
) -> Listeners {
    let mut listeners = Listeners::new();

    let rt = runtime.clone();
    let el = canvas.clone();
    listeners.extend(Listener::new(window, "mousemove", move |ev: web::MouseEvent| {
        let mut rt = rt.borrow_mut();
        if rt.pointer_throttle.admit(ev.time_stamp()) {
            let p = input::mouse_local_px(&ev, &el);
            rt.set_pointer(Some(p));
        }
    }));

    let rt = runtime.clone();
    let el = canvas.clone();
    listeners.extend(Listener::new(window, "touchmove", move |ev: web::TouchEvent| {
        let mut rt = rt.borrow_mut();
        if rt.pointer_throttle.admit(ev.time_stamp()) {
            if let Some(p) = input::touch_local_px(&ev, &el) {
                rt.set_pointer(Some(p));
            }
        }
    }));

    let rt = runtime.clone();
    listeners.extend(Listener::new(window, "touchend", move |_: web::TouchEvent| {
        rt.borrow_mut().set_pointer(None);
    }));

    if let Some(root) = document.document_element() {
        let rt = runtime.clone();
        listeners.extend(Listener::new(&root, "mouseleave", move |_: web::MouseEvent| {
            rt.borrow_mut().set_pointer(None);
        }));
    }

    listeners
}
