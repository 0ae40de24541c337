use std::collections::HashMap;

use crate::config::is_printable;
use crate::coords::{UvRect, Vec2};

/// Atlas location and layout metrics of one character.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Glyph {
    /// Normalized atlas rectangle. Degenerate for zero-area glyphs.
    pub uv: UvRect,
    /// Pen baseline to bitmap top-left, in unscaled pixels (+Y down).
    pub offset: Vec2,
    /// Pen movement after this glyph, in unscaled pixels.
    pub advance: f32,
    /// Bitmap size in pixels.
    pub width: u32,
    pub height: u32,
}

impl Glyph {
    /// True when the glyph has no pixels to draw (e.g. space in an outline font).
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bitmap size in unscaled pixels.
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// How the table's advances were produced.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pitch {
    /// Per-glyph advances from an outline font.
    Proportional,
    /// Every glyph shares one cell and one advance.
    Fixed,
}

/// Character code to [`Glyph`] map for one loaded font.
///
/// Built once by the outline or fallback path and read-only afterwards.
/// Only printable ASCII codes are ever present.
#[derive(Debug, Clone)]
pub struct GlyphTable {
    glyphs: HashMap<char, Glyph>,
    line_height: f32,
    pitch: Pitch,
}

impl GlyphTable {
    pub(crate) fn new(pitch: Pitch, line_height: f32) -> Self {
        Self {
            glyphs: HashMap::new(),
            line_height,
            pitch,
        }
    }

    /// Records `glyph` for `ch`. Codes outside the printable range are ignored.
    pub(crate) fn insert(&mut self, ch: char, glyph: Glyph) {
        if is_printable(ch) {
            self.glyphs.insert(ch, glyph);
        } else {
            log::debug!("GlyphTable: ignoring non-printable code {:#x}", ch as u32);
        }
    }

    #[inline]
    pub fn get(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    #[inline]
    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    #[inline]
    pub fn pitch(&self) -> Pitch {
        self.pitch
    }

    /// Baseline-to-baseline distance in unscaled pixels.
    #[inline]
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Entries in code order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &Glyph)> {
        let mut codes: Vec<char> = self.glyphs.keys().copied().collect();
        codes.sort_unstable();
        codes.into_iter().filter_map(|c| self.glyphs.get(&c).map(|g| (c, g)))
    }
}
