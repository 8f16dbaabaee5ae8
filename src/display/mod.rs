mod font;
mod pixel_buffer;
#[cfg(feature = "sdl")]
mod window;

pub use font::{
    draw_text, draw_text_bg, draw_text_centered, text_width, GLYPH_HEIGHT, GLYPH_WIDTH,
};
pub use pixel_buffer::PixelBuffer;
#[cfg(feature = "sdl")]
pub use window::{Display, InputEvent, RenderTarget};
