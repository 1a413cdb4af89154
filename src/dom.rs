use crate::core::{FontSizeResolver, Viewport};
use smallvec::SmallVec;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// An event listener registration that is removed again on drop.
pub struct Listener {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

pub type Listeners = SmallVec<[Listener; 6]>;

impl Listener {
    pub fn new<T, E, F>(target: &T, event: &'static str, handler: F) -> Option<Self>
    where
        T: AsRef<web::EventTarget>,
        E: JsCast + 'static,
        F: FnMut(E) + 'static,
    {
        Self::register(target.as_ref(), event, handler, None)
    }

    /// Register with `passive: false` so the handler may call `preventDefault`
    /// on touch events.
    pub fn new_active<T, E, F>(target: &T, event: &'static str, handler: F) -> Option<Self>
    where
        T: AsRef<web::EventTarget>,
        E: JsCast + 'static,
        F: FnMut(E) + 'static,
    {
        let opts = web::AddEventListenerOptions::new();
        opts.set_passive(false);
        Self::register(target.as_ref(), event, handler, Some(opts))
    }

    fn register<E, F>(
        target: &web::EventTarget,
        event: &'static str,
        mut handler: F,
        opts: Option<web::AddEventListenerOptions>,
    ) -> Option<Self>
    where
        E: JsCast + 'static,
        F: FnMut(E) + 'static,
    {
        let closure = Closure::wrap(Box::new(move |ev: web::Event| {
            handler(ev.unchecked_into::<E>());
        }) as Box<dyn FnMut(web::Event)>);
        let added = match &opts {
            Some(o) => target.add_event_listener_with_callback_and_add_event_listener_options(
                event,
                closure.as_ref().unchecked_ref(),
                o,
            ),
            None => target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()),
        };
        match added {
            Ok(()) => Some(Self {
                target: target.clone(),
                event,
                closure,
            }),
            Err(e) => {
                log::warn!("addEventListener({}) failed: {:?}", event, e);
                None
            }
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// A pending `setTimeout`; dropping it clears the timer.
pub struct Timeout {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn new(delay_ms: i32, callback: impl FnMut() + 'static) -> Option<Self> {
        let window = web::window()?;
        let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut()>);
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms,
            )
            .map_err(|e| log::warn!("setTimeout failed: {:?}", e))
            .ok()?;
        Some(Self {
            handle,
            _closure: closure,
        })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(w) = web::window() {
            w.clear_timeout_with_handle(self.handle);
        }
    }
}

/// Intersection observer watching one element; disconnected on drop.
pub struct VisibilityObserver {
    observer: web::IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, web::IntersectionObserver)>,
}

impl VisibilityObserver {
    pub fn observe(
        target: &web::Element,
        threshold: f64,
        mut on_change: impl FnMut(bool) + 'static,
    ) -> Option<Self> {
        let callback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: web::IntersectionObserver| {
                let last = entries
                    .iter()
                    .filter_map(|e| e.dyn_into::<web::IntersectionObserverEntry>().ok())
                    .last();
                if let Some(entry) = last {
                    on_change(entry.is_intersecting());
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, web::IntersectionObserver)>);
        let opts = web::IntersectionObserverInit::new();
        opts.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            web::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &opts)
                .map_err(|e| log::warn!("IntersectionObserver unavailable: {:?}", e))
                .ok()?;
        observer.observe(target);
        Some(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for VisibilityObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

pub fn context_2d(canvas: &web::HtmlCanvasElement) -> Option<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<web::CanvasRenderingContext2d>().ok())
}

pub fn viewport_size() -> Viewport {
    let Some(w) = web::window() else {
        return Viewport::default();
    };
    let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(width as f32, height as f32)
}

#[inline]
pub fn device_pixel_ratio() -> f64 {
    web::window()
        .map(|w| w.device_pixel_ratio())
        .filter(|dpr| dpr.is_finite() && *dpr > 0.0)
        .unwrap_or(1.0)
}

pub fn document_hidden() -> bool {
    window_document().map(|d| d.hidden()).unwrap_or(false)
}

/// Size the backing store to the viewport times devicePixelRatio and scale
/// the context so drawing happens in CSS pixels. Returns the CSS viewport.
pub fn sync_canvas_to_viewport(
    canvas: &web::HtmlCanvasElement,
    ctx: &web::CanvasRenderingContext2d,
) -> Viewport {
    let viewport = viewport_size();
    let dpr = device_pixel_ratio();
    let w_px = (viewport.width as f64 * dpr) as u32;
    let h_px = (viewport.height as f64 * dpr) as u32;
    canvas.set_width(w_px.max(1));
    canvas.set_height(h_px.max(1));
    let style = canvas.style();
    let _ = style.set_property("width", &format!("{}px", viewport.width));
    let _ = style.set_property("height", &format!("{}px", viewport.height));
    // absolute transform; a relative scale() would compound across resizes
    let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    viewport
}

pub fn computed_font_family(el: &web::Element) -> Option<String> {
    let style = web::window()?.get_computed_style(el).ok().flatten()?;
    style.get_property_value("font-family").ok()
}

/// Resolves CSS font sizes by laying out a hidden probe element.
pub struct ProbeResolver {
    document: web::Document,
}

impl ProbeResolver {
    pub fn new(document: web::Document) -> Self {
        Self { document }
    }

    fn probe(&self, css: &str) -> Option<String> {
        let window = web::window()?;
        let body = self.document.body()?;
        let span = self
            .document
            .create_element("span")
            .ok()?
            .dyn_into::<web::HtmlElement>()
            .ok()?;
        let style = span.style();
        let _ = style.set_property("font-size", css);
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("visibility", "hidden");
        body.append_child(&span).ok()?;
        let computed = window
            .get_computed_style(&span)
            .ok()
            .flatten()
            .and_then(|s| s.get_property_value("font-size").ok());
        span.remove();
        computed
    }
}

impl FontSizeResolver for ProbeResolver {
    fn resolve_px(&self, css: &str) -> Option<f32> {
        let computed = self.probe(css)?;
        let px: f32 = computed.trim().trim_end_matches("px").trim().parse().ok()?;
        (px.is_finite() && px > 0.0).then_some(px)
    }
}
