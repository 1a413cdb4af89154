#![cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

mod core;
mod dom;
mod frame;
mod glyph;
mod input;
mod page;
mod particles;

pub use glyph::{GlyphJitterHandle, GlyphOptions};
pub use page::{mount_page, PageEffects};
pub use particles::{ParticleFieldHandle, ParticleOptions};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("portfolio-canvas starting");
    Ok(())
}
