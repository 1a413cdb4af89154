use glam::Vec2;
use web_sys as web;

// ---------------- Pointer helpers ----------------

/// Client coordinates to CSS pixels relative to the element's top-left.
#[inline]
pub fn client_to_local(client_x: f64, client_y: f64, el: &web::Element) -> Vec2 {
    let rect = el.get_bounding_client_rect();
    Vec2::new(
        (client_x - rect.left()) as f32,
        (client_y - rect.top()) as f32,
    )
}

#[inline]
pub fn mouse_local_px(ev: &web::MouseEvent, el: &web::Element) -> Vec2 {
    client_to_local(ev.client_x() as f64, ev.client_y() as f64, el)
}

/// Position of the first active touch, if any.
#[inline]
pub fn touch_local_px(ev: &web::TouchEvent, el: &web::Element) -> Option<Vec2> {
    let touch = ev.touches().get(0)?;
    Some(client_to_local(
        touch.client_x() as f64,
        touch.client_y() as f64,
        el,
    ))
}
