/// Normalized texture-space rectangle `(x0, y0)`..`(x1, y1)`.
///
/// `(x0, y0)` is the top-left texel corner, `(x1, y1)` the bottom-right.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct UvRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl UvRect {
    #[inline]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Normalizes a pixel rectangle `(x, y, w, h)` against an image of
    /// `image_w` x `image_h` pixels.
    #[inline]
    pub fn from_pixels(x: u32, y: u32, w: u32, h: u32, image_w: u32, image_h: u32) -> Self {
        let iw = image_w as f32;
        let ih = image_h as f32;
        Self {
            x0: x as f32 / iw,
            y0: y as f32 / ih,
            x1: (x + w) as f32 / iw,
            y1: (y + h) as f32 / ih,
        }
    }

    /// True when the rectangle covers no texels.
    #[inline]
    pub fn is_degenerate(self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// True when every corner lies inside `[0, 1]`.
    #[inline]
    pub fn is_normalized(self) -> bool {
        let inside = |v: f32| (0.0..=1.0).contains(&v);
        inside(self.x0) && inside(self.y0) && inside(self.x1) && inside(self.y1)
    }
}
