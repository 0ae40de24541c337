//! String to quad geometry.
//!
//! [`layout`] and [`measure`] are both projections of one [`PenWalk`], so the
//! width reported for a string is exactly the pen travel used to draw it.
//!
//! Rules:
//! - Codes outside printable ASCII, or without a table entry, are skipped and
//!   do not move the pen.
//! - Every other code moves the pen by `advance * scale`, whether or not it
//!   has pixels.
//! - Glyphs with pixels produce one quad at `pen + offset * scale`, sized
//!   `size * scale`.

use bytemuck::{Pod, Zeroable};

use crate::config::is_printable;
use crate::coords::Vec2;
use crate::text::glyph::{Glyph, GlyphTable};

/// Vertex consumed by the GPU sink: pixel position and atlas texcoord.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct GlyphVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

/// Two counter-clockwise triangles over a quad's four vertices
/// (bottom-left, bottom-right, top-right, top-left).
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Screen-space quad for one glyph.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphQuad {
    pub ch: char,
    pub vertices: [GlyphVertex; 4],
}

impl GlyphQuad {
    fn new(ch: char, glyph: &Glyph, pen: Vec2, scale: f32) -> Self {
        let min = pen + glyph.offset * scale;
        let size = glyph.size() * scale;
        let (x0, y0) = (min.x, min.y);
        let (x1, y1) = (min.x + size.x, min.y + size.y);
        let uv = glyph.uv;

        Self {
            ch,
            vertices: [
                GlyphVertex { pos: [x0, y1], uv: [uv.x0, uv.y1] },
                GlyphVertex { pos: [x1, y1], uv: [uv.x1, uv.y1] },
                GlyphVertex { pos: [x1, y0], uv: [uv.x1, uv.y0] },
                GlyphVertex { pos: [x0, y0], uv: [uv.x0, uv.y0] },
            ],
        }
    }

    /// Top-left corner in pixels.
    #[inline]
    pub fn min(&self) -> Vec2 {
        let [x, y] = self.vertices[3].pos;
        Vec2::new(x, y)
    }

    /// Bottom-right corner in pixels.
    #[inline]
    pub fn max(&self) -> Vec2 {
        let [x, y] = self.vertices[1].pos;
        Vec2::new(x, y)
    }

    #[inline]
    pub const fn indices(&self) -> [u32; 6] {
        QUAD_INDICES
    }
}

/// A glyph reached by the pen.
#[derive(Debug, Copy, Clone)]
pub struct PenStep<'a> {
    pub ch: char,
    pub glyph: &'a Glyph,
    /// Pen position before this glyph.
    pub pen: Vec2,
    /// Scaled pen movement for this glyph.
    pub advance: f32,
}

/// Left-to-right walk over the drawable characters of a string.
pub struct PenWalk<'a, 's> {
    table: &'a GlyphTable,
    chars: std::str::Chars<'s>,
    origin: Vec2,
    travelled: f32,
    scale: f32,
}

impl<'a, 's> PenWalk<'a, 's> {
    pub fn new(table: &'a GlyphTable, text: &'s str, origin: Vec2, scale: f32) -> Self {
        Self {
            table,
            chars: text.chars(),
            origin,
            travelled: 0.0,
            scale,
        }
    }

    /// Pen travel so far, in scaled pixels.
    #[inline]
    pub fn travelled(&self) -> f32 {
        self.travelled
    }
}

impl<'a> Iterator for PenWalk<'a, '_> {
    type Item = PenStep<'a>;

    fn next(&mut self) -> Option<PenStep<'a>> {
        for ch in self.chars.by_ref() {
            if !is_printable(ch) {
                continue;
            }
            let Some(glyph) = self.table.get(ch) else { continue };

            let pen = Vec2::new(self.origin.x + self.travelled, self.origin.y);
            let advance = glyph.advance * self.scale;
            self.travelled += advance;
            return Some(PenStep { ch, glyph, pen, advance });
        }
        None
    }
}

/// Lays out `text` with the pen starting at `origin`.
///
/// For outline fonts `origin.y` is the baseline; for the fixed-pitch fallback
/// it is the top of the cell row.
pub fn layout(table: &GlyphTable, text: &str, origin: Vec2, scale: f32) -> Vec<GlyphQuad> {
    PenWalk::new(table, text, origin, scale)
        .filter(|step| !step.glyph.is_blank())
        .map(|step| GlyphQuad::new(step.ch, step.glyph, step.pen, scale))
        .collect()
}

/// Width of `text` in pixels at `scale`: the pen travel [`layout`] would use.
pub fn measure(table: &GlyphTable, text: &str, scale: f32) -> f32 {
    let mut walk = PenWalk::new(table, text, Vec2::zero(), scale);
    walk.by_ref().for_each(drop);
    walk.travelled()
}

/// Like [`layout`] but appends into `batch`. Returns the pen travel.
pub fn layout_into(
    batch: &mut QuadBatch,
    table: &GlyphTable,
    text: &str,
    origin: Vec2,
    scale: f32,
) -> f32 {
    let mut walk = PenWalk::new(table, text, origin, scale);
    for step in walk.by_ref() {
        if !step.glyph.is_blank() {
            batch.push(&GlyphQuad::new(step.ch, step.glyph, step.pen, scale));
        }
    }
    walk.travelled()
}

/// Baseline-to-baseline distance at `scale`.
#[inline]
pub fn line_height(table: &GlyphTable, scale: f32) -> f32 {
    table.line_height() * scale
}

/// Flat vertex and index arrays for any number of quads.
///
/// Indices are rebased per quad, so the arrays can be uploaded and drawn with
/// a single indexed draw.
#[derive(Debug, Clone, Default)]
pub struct QuadBatch {
    vertices: Vec<GlyphVertex>,
    indices: Vec<u32>,
}

impl QuadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, quad: &GlyphQuad) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&quad.vertices);
        self.indices.extend(quad.indices().iter().map(|i| base + i));
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    #[inline]
    pub fn vertices(&self) -> &[GlyphVertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    #[inline]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::UvRect;
    use crate::text::fallback::build_fallback;
    use crate::text::glyph::Pitch;

    /// Proportional table with hand-picked metrics.
    fn outline_table() -> GlyphTable {
        let mut t = GlyphTable::new(Pitch::Proportional, 38.0);
        t.insert('A', Glyph {
            uv: UvRect::new(0.0, 0.0, 0.25, 0.5),
            offset: Vec2::new(1.0, -20.0),
            advance: 18.0,
            width: 16,
            height: 20,
        });
        t.insert('B', Glyph {
            uv: UvRect::new(0.25, 0.0, 0.5, 0.5),
            offset: Vec2::new(2.0, -20.0),
            advance: 17.5,
            width: 14,
            height: 20,
        });
        t.insert(' ', Glyph {
            uv: UvRect::default(),
            offset: Vec2::zero(),
            advance: 8.0,
            width: 0,
            height: 0,
        });
        t
    }

    fn fallback_table() -> GlyphTable {
        build_fallback(2).1
    }

    // ── empty input ───────────────────────────────────────────────────────

    #[test]
    fn empty_text_has_no_geometry_and_no_width() {
        for table in [outline_table(), fallback_table()] {
            assert!(layout(&table, "", Vec2::new(3.0, 4.0), 2.0).is_empty());
            assert_eq!(measure(&table, "", 1.0), 0.0);
            assert_eq!(measure(&table, "", 7.5), 0.0);
        }
    }

    // ── outline metrics ───────────────────────────────────────────────────

    #[test]
    fn quad_uses_offset_and_size() {
        let table = outline_table();
        let quads = layout(&table, "A", Vec2::new(100.0, 50.0), 2.0);
        assert_eq!(quads.len(), 1);
        let q = quads[0];
        assert_eq!(q.min(), Vec2::new(102.0, 10.0));
        assert_eq!(q.max(), Vec2::new(134.0, 50.0));
        assert_eq!(q.vertices[0], GlyphVertex { pos: [102.0, 50.0], uv: [0.0, 0.5] });
        assert_eq!(q.vertices[2].uv, [0.25, 0.0]);
    }

    #[test]
    fn pen_advances_by_scaled_advance() {
        let table = outline_table();
        let quads = layout(&table, "AB", Vec2::zero(), 1.5);
        assert_eq!(quads[1].min().x, 18.0 * 1.5 + 2.0 * 1.5);
    }

    #[test]
    fn blank_glyph_advances_without_quad() {
        let table = outline_table();
        let quads = layout(&table, "A B", Vec2::zero(), 1.0);
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[1].min().x, 18.0 + 8.0 + 2.0);
        assert_eq!(measure(&table, "A B", 1.0), 18.0 + 8.0 + 17.5);
    }

    #[test]
    fn unknown_codes_are_skipped() {
        let table = outline_table();
        let quads = layout(&table, "A\u{1}B", Vec2::zero(), 1.0);
        assert_eq!(quads.len(), 2);
        assert_eq!(quads.iter().map(|q| q.ch).collect::<String>(), "AB");
        assert_eq!(measure(&table, "A\u{1}B", 1.0), 18.0 + 17.5);

        // Printable but missing from the table: skipped the same way.
        assert_eq!(measure(&table, "AzB", 1.0), 18.0 + 17.5);
        // Outside ASCII entirely.
        assert_eq!(layout(&table, "é", Vec2::zero(), 1.0).len(), 0);
    }

    // ── fallback metrics ──────────────────────────────────────────────────

    #[test]
    fn fallback_hello_measures_fifty() {
        assert_eq!(measure(&fallback_table(), "HELLO", 1.0), 50.0);
    }

    #[test]
    fn fallback_uses_fixed_cells() {
        let table = fallback_table();
        let quads = layout(&table, "a b", Vec2::new(10.0, 20.0), 2.0);
        // Space has cell pixels (transparent) in the fallback grid.
        assert_eq!(quads.len(), 3);
        for (i, q) in quads.iter().enumerate() {
            assert_eq!(q.min(), Vec2::new(10.0 + 20.0 * i as f32, 20.0));
            assert_eq!(q.max(), Vec2::new(26.0 + 20.0 * i as f32, 36.0));
        }
    }

    #[test]
    fn fallback_skips_control_codes() {
        let table = fallback_table();
        let quads = layout(&table, "A\u{1}B", Vec2::zero(), 1.0);
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[1].min().x, 10.0);
        assert_eq!(measure(&table, "A\u{1}B", 1.0), 20.0);
    }

    // ── consistency ───────────────────────────────────────────────────────

    #[test]
    fn measure_matches_layout_travel() {
        let samples = ["", "A", "AB BA", "A\u{1}\u{2}B", "zzz", "A B\tB  A"];
        for table in [outline_table(), fallback_table()] {
            for text in samples {
                for scale in [0.5, 1.0, 1.7, 3.0] {
                    let mut batch = QuadBatch::new();
                    let travelled = layout_into(&mut batch, &table, text, Vec2::zero(), scale);
                    assert_eq!(measure(&table, text, scale), travelled, "{text:?} @ {scale}");

                    let step_sum: f32 = PenWalk::new(&table, text, Vec2::zero(), scale)
                        .map(|s| s.advance)
                        .sum();
                    assert_eq!(travelled, step_sum);
                }
            }
        }
    }

    #[test]
    fn layout_is_idempotent() {
        let table = outline_table();
        let a = layout(&table, "AB A", Vec2::new(5.0, 5.0), 1.25);
        let b = layout(&table, "AB A", Vec2::new(5.0, 5.0), 1.25);
        assert_eq!(a, b);
    }

    // ── batch ─────────────────────────────────────────────────────────────

    #[test]
    fn batch_rebases_indices() {
        let table = fallback_table();
        let mut batch = QuadBatch::new();
        layout_into(&mut batch, &table, "AB", Vec2::zero(), 1.0);
        assert_eq!(batch.quad_count(), 2);
        assert_eq!(batch.indices(), &[0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
        assert_eq!(batch.vertex_bytes().len(), 8 * std::mem::size_of::<GlyphVertex>());
        assert_eq!(batch.index_bytes().len(), 12 * 4);

        batch.clear();
        assert!(batch.is_empty());
    }

    #[test]
    fn batch_matches_standalone_layout() {
        let table = outline_table();
        let mut batch = QuadBatch::new();
        layout_into(&mut batch, &table, "BA", Vec2::new(1.0, 2.0), 1.0);
        let quads = layout(&table, "BA", Vec2::new(1.0, 2.0), 1.0);
        let flat: Vec<GlyphVertex> = quads.iter().flat_map(|q| q.vertices).collect();
        assert_eq!(batch.vertices(), flat.as_slice());
    }

    #[test]
    fn line_height_scales() {
        assert_eq!(line_height(&outline_table(), 0.5), 19.0);
        assert_eq!(line_height(&fallback_table(), 2.0), 20.0);
    }
}
