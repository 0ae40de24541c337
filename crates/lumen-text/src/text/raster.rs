//! Outline rasterizer seam.
//!
//! The atlas builder only needs four answers from a font: how to scale it to a
//! pixel height, a coverage bitmap per code, where that bitmap sits relative to
//! the pen, and how far the pen moves. [`GlyphRasterizer`] captures exactly
//! that; [`FontdueRasterizer`] answers it with `fontdue`.

use crate::error::{FontError, FontResult};

/// Coverage bitmap for one glyph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphBitmap {
    /// Row-major, one byte per pixel, `width * height` long.
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Pen origin to the bitmap's left edge, in pixels.
    pub xoff: i32,
    /// Baseline to the bitmap's top edge, in pixels, +Y down. Negative for
    /// glyphs that rise above the baseline.
    pub yoff: i32,
}

impl GlyphBitmap {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Font-specific measurements consumed by the atlas builder.
///
/// Distances returned by [`advance_and_left_bearing`](Self::advance_and_left_bearing)
/// are in font design units; multiply by the scale from
/// [`scale_for_pixel_height`](Self::scale_for_pixel_height) to get pixels.
pub trait GlyphRasterizer {
    /// Pixels per design unit such that ascent minus descent spans
    /// `pixel_height` pixels.
    fn scale_for_pixel_height(&self, pixel_height: f32) -> f32;

    /// Rasterizes `ch` at `scale`. `None` when the font has no glyph for it.
    /// Whitespace yields `Some` with an empty bitmap.
    fn bitmap_for(&self, ch: char, scale: f32) -> Option<GlyphBitmap>;

    /// `(advance, left_side_bearing)` in design units, `None` when the font
    /// has no glyph for `ch`.
    fn advance_and_left_bearing(&self, ch: char) -> Option<(f32, f32)>;
}

/// [`GlyphRasterizer`] backed by a parsed TrueType/OpenType font.
pub struct FontdueRasterizer {
    font: fontdue::Font,
}

impl FontdueRasterizer {
    /// Parses font bytes.
    pub fn from_bytes(bytes: &[u8]) -> FontResult<Self> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(FontError::decode)?;
        if font.units_per_em() <= 0.0 {
            return Err(FontError::decode("font reports zero units per em"));
        }
        Ok(Self { font })
    }

    fn glyph_index(&self, ch: char) -> Option<u16> {
        // Index 0 is .notdef: the font has no outline for this code.
        match self.font.lookup_glyph_index(ch) {
            0 => None,
            idx => Some(idx),
        }
    }

    /// Ascent minus descent in design units.
    fn design_height(&self) -> Option<f32> {
        let upem = self.font.units_per_em();
        self.font
            .horizontal_line_metrics(upem)
            .map(|lm| lm.ascent - lm.descent)
            .filter(|h| *h > 0.0)
    }
}

impl GlyphRasterizer for FontdueRasterizer {
    fn scale_for_pixel_height(&self, pixel_height: f32) -> f32 {
        let height = self.design_height().unwrap_or_else(|| self.font.units_per_em());
        pixel_height / height
    }

    fn bitmap_for(&self, ch: char, scale: f32) -> Option<GlyphBitmap> {
        let idx = self.glyph_index(ch)?;
        // fontdue sizes by em, not by design unit.
        let px = scale * self.font.units_per_em();
        let (metrics, pixels) = self.font.rasterize_indexed(idx, px);

        // fontdue's ymin is the bitmap bottom measured upwards from the baseline.
        let height = metrics.height as i32;
        Some(GlyphBitmap {
            pixels,
            width: metrics.width as u32,
            height: metrics.height as u32,
            xoff: metrics.xmin,
            yoff: -(metrics.ymin + height),
        })
    }

    fn advance_and_left_bearing(&self, ch: char) -> Option<(f32, f32)> {
        let idx = self.glyph_index(ch)?;
        let metrics = self.font.metrics_indexed(idx, self.font.units_per_em());
        Some((metrics.advance_width, metrics.bounds.xmin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONO: &[u8] = include_bytes!("../../testdata/DejaVuSansMono.ttf");

    fn mono() -> FontdueRasterizer {
        FontdueRasterizer::from_bytes(MONO).unwrap()
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = FontdueRasterizer::from_bytes(b"definitely not a font").err();
        assert!(matches!(err, Some(FontError::DecodeFailed { path: None, .. })));
    }

    #[test]
    fn empty_bytes_fail_to_decode() {
        assert!(FontdueRasterizer::from_bytes(&[]).is_err());
    }

    #[test]
    fn empty_bitmap_detection() {
        let space = GlyphBitmap { width: 0, height: 0, ..GlyphBitmap::default() };
        assert!(space.is_empty());

        let dot = GlyphBitmap { pixels: vec![255], width: 1, height: 1, xoff: 0, yoff: -1 };
        assert!(!dot.is_empty());
    }

    // ── real font ─────────────────────────────────────────────────────────

    #[test]
    fn scale_spans_ascent_to_descent() {
        let r = mono();
        let scale = r.scale_for_pixel_height(32.0);
        let lm = r.font.horizontal_line_metrics(scale * r.font.units_per_em()).unwrap();
        assert!((lm.ascent - lm.descent - 32.0).abs() < 0.01);
    }

    #[test]
    fn capital_rises_from_the_baseline() {
        let r = mono();
        let a = r.bitmap_for('A', r.scale_for_pixel_height(32.0)).unwrap();
        assert_eq!(a.yoff, -21);
        assert!((a.yoff + a.height as i32).abs() <= 1);
        assert_eq!(a.pixels.len(), (a.width * a.height) as usize);
    }

    #[test]
    fn descender_hangs_below_the_baseline() {
        let r = mono();
        let g = r.bitmap_for('g', r.scale_for_pixel_height(32.0)).unwrap();
        assert_eq!((g.yoff, g.height), (-16, 22));
        assert!(g.yoff + g.height as i32 > 0);
    }

    #[test]
    fn space_is_empty_but_advances() {
        let r = mono();
        assert!(r.bitmap_for(' ', r.scale_for_pixel_height(32.0)).unwrap().is_empty());
        let (space, _) = r.advance_and_left_bearing(' ').unwrap();
        let (m, _) = r.advance_and_left_bearing('M').unwrap();
        // Monospace: every advance matches.
        assert!(space > 0.0 && (space - m).abs() < 1e-3);
    }

    #[test]
    fn unmapped_code_has_no_glyph() {
        let r = mono();
        assert!(r.bitmap_for('\u{1F600}', 1.0).is_none());
        assert!(r.advance_and_left_bearing('\u{1F600}').is_none());
    }
}
