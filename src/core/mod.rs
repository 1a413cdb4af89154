pub mod color;
pub mod constants;
pub mod font;
pub mod glyph;
pub mod particles;
pub mod schedule;

pub use color::*;
pub use font::*;
pub use glyph::*;
pub use particles::*;
pub use schedule::*;
