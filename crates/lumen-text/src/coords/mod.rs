//! Geometry value types shared by the atlas, the layout pass and the GPU sink.
//!
//! Pixel space:
//! - Origin top-left
//! - +X right, +Y down
//!
//! Texture space is normalized to `[0, 1]` on both axes with the same
//! orientation, so row 0 of the atlas image is `v = 0`.

mod uv_rect;
mod vec2;

pub use uv_rect::UvRect;
pub use vec2::Vec2;
