//! Fixed-size coverage atlas and the row packer that fills it.

use crate::coords::UvRect;
use crate::error::{FontError, FontResult};

/// Single-channel coverage image (0 = transparent, 255 = covered).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl AtlasImage {
    /// Allocates a fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixel data, `width * height` bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Coverage at `(x, y)`, or `None` outside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Sets one pixel. Writes outside the image are dropped.
    pub fn put(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.pixels[idx] = value;
        }
    }

    /// Copies a `w` x `h` row-major bitmap with its top-left at `(x, y)`,
    /// clipping against the image bounds.
    pub fn blit(&mut self, x: u32, y: u32, w: u32, h: u32, src: &[u8]) {
        let w_us = w as usize;
        for row in 0..h {
            let dst_y = y + row;
            if dst_y >= self.height {
                break;
            }
            let src_start = row as usize * w_us;
            let Some(src_row) = src.get(src_start..src_start + w_us) else {
                break;
            };
            let visible = (self.width.saturating_sub(x) as usize).min(w_us);
            if visible == 0 {
                break;
            }
            let dst_start = self.index(x, dst_y);
            self.pixels[dst_start..dst_start + visible].copy_from_slice(&src_row[..visible]);
        }
    }

    /// Number of non-zero pixels inside the given pixel rectangle.
    pub fn coverage_in(&self, x: u32, y: u32, w: u32, h: u32) -> usize {
        (y..y + h)
            .flat_map(|py| (x..x + w).map(move |px| (px, py)))
            .filter(|&(px, py)| self.get(px, py).is_some_and(|v| v != 0))
            .count()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Pixel placement of one packed bitmap.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Row-major packer with a fixed row stride.
///
/// Bitmaps go left to right with `padding` pixels between them; when the next
/// one would cross the right edge the cursor drops by `row_height` and returns
/// to column 0. Space left at the end of a row is never revisited.
#[derive(Debug, Clone)]
pub struct RowPacker {
    width: u32,
    height: u32,
    row_height: u32,
    padding: u32,
    cursor_x: u32,
    cursor_y: u32,
    rows: u32,
}

impl RowPacker {
    pub fn new(width: u32, height: u32, row_height: u32, padding: u32) -> Self {
        Self {
            width,
            height,
            row_height: row_height.max(1),
            padding,
            cursor_x: 0,
            cursor_y: 0,
            rows: 0,
        }
    }

    /// Reserves space for a `w` x `h` bitmap belonging to `code`.
    ///
    /// Fails with [`FontError::PackingOverflow`] when the bitmap is wider than
    /// the atlas, taller than a row, or its row would extend past the bottom
    /// edge. The packer is left unchanged on failure.
    pub fn place(&mut self, code: char, w: u32, h: u32) -> FontResult<Placement> {
        let overflow = || FontError::PackingOverflow {
            code,
            atlas_width: self.width,
            atlas_height: self.height,
        };

        // Rows are a fixed stride; a taller bitmap would reach into the next one.
        if w > self.width || h > self.row_height {
            return Err(overflow());
        }

        let (mut x, mut y) = (self.cursor_x, self.cursor_y);
        let mut rows = self.rows.max(1);
        if x + w + self.padding > self.width && x > 0 {
            x = 0;
            y += self.row_height;
            rows += 1;
        }

        if y + self.row_height > self.height {
            return Err(overflow());
        }

        self.cursor_x = x + w + self.padding;
        self.cursor_y = y;
        self.rows = rows;
        Ok(Placement { x, y, width: w, height: h })
    }

    /// Rows touched so far.
    #[inline]
    pub fn rows_used(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn row_height(&self) -> u32 {
        self.row_height
    }
}

/// An [`AtlasImage`] being filled by a [`RowPacker`].
#[derive(Debug, Clone)]
pub struct AtlasBuilder {
    image: AtlasImage,
    packer: RowPacker,
}

impl AtlasBuilder {
    pub fn new(width: u32, height: u32, row_height: u32, padding: u32) -> Self {
        Self {
            image: AtlasImage::new(width, height),
            packer: RowPacker::new(width, height, row_height, padding),
        }
    }

    /// Places and copies one bitmap, returning its normalized rectangle.
    ///
    /// Empty bitmaps take no space and map to a degenerate rectangle at the
    /// origin.
    pub fn insert(&mut self, code: char, w: u32, h: u32, pixels: &[u8]) -> FontResult<UvRect> {
        if w == 0 || h == 0 {
            return Ok(UvRect::default());
        }
        let p = self.packer.place(code, w, h)?;
        self.image.blit(p.x, p.y, p.width, p.height, pixels);
        Ok(UvRect::from_pixels(p.x, p.y, p.width, p.height, self.image.width, self.image.height))
    }

    #[inline]
    pub fn rows_used(&self) -> u32 {
        self.packer.rows_used()
    }

    pub fn finish(self) -> AtlasImage {
        self.image
    }
}
