//! Font selection: outline candidates first, built-in dot-matrix font last.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{FIRST_PRINTABLE, LAST_PRINTABLE, TextConfig};
use crate::coords::{UvRect, Vec2};
use crate::error::{FontError, FontResult};
use crate::text::atlas::{AtlasBuilder, AtlasImage};
use crate::text::fallback::build_fallback;
use crate::text::glyph::{Glyph, GlyphTable, Pitch};
use crate::text::layout::{self, GlyphQuad, QuadBatch};
use crate::text::raster::{FontdueRasterizer, GlyphRasterizer};

/// Which source produced the active glyph table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontState {
    /// An outline font file was decoded and packed.
    Outline { path: Option<PathBuf> },
    /// No candidate worked; the built-in font is in use.
    Fallback,
}

impl FontState {
    #[inline]
    pub fn is_fallback(&self) -> bool {
        matches!(self, FontState::Fallback)
    }
}

impl fmt::Display for FontState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontState::Outline { path: Some(path) } => write!(f, "outline font {}", path.display()),
            FontState::Outline { path: None } => f.write_str("outline font (in memory)"),
            FontState::Fallback => f.write_str("built-in 8x8 font"),
        }
    }
}

/// Atlas image plus glyph table, ready to upload and lay out.
///
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    atlas: AtlasImage,
    glyphs: GlyphTable,
    state: FontState,
}

impl LoadedFont {
    /// Tries each configured candidate in order, ending with the built-in font.
    ///
    /// Never fails: missing files, bad font data and atlas overflow only move
    /// on to the next option.
    pub fn load(config: &TextConfig) -> Self {
        for path in &config.candidate_paths {
            match Self::from_path(path, config) {
                Ok(font) => {
                    log::info!(
                        "loaded {} at {}px ({} glyphs)",
                        font.state,
                        config.pixel_height,
                        font.glyphs.len()
                    );
                    return font;
                }
                Err(e @ FontError::SourceUnavailable { .. }) => {
                    log::debug!("skipping font candidate: {e}");
                }
                Err(e) => {
                    log::warn!("skipping font candidate: {e}");
                }
            }
        }

        log::info!("no outline font available, using built-in 8x8 font");
        Self::fallback(config)
    }

    /// Loads one font file. Does not fall back.
    pub fn from_path(path: &Path, config: &TextConfig) -> FontResult<Self> {
        // Cheap existence check before reading the whole file.
        if !path.is_file() {
            return Err(FontError::SourceUnavailable {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        let bytes = std::fs::read(path).map_err(|source| FontError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        let mut font = Self::from_bytes(&bytes, config).map_err(|e| e.at_path(path))?;
        font.state = FontState::Outline { path: Some(path.to_path_buf()) };
        Ok(font)
    }

    /// Decodes in-memory font bytes. Does not fall back.
    pub fn from_bytes(bytes: &[u8], config: &TextConfig) -> FontResult<Self> {
        let rasterizer = FontdueRasterizer::from_bytes(bytes)?;
        Self::from_rasterizer(&rasterizer, config)
    }

    /// Rasterizes and packs the printable range with any rasterizer.
    pub fn from_rasterizer<R: GlyphRasterizer>(rasterizer: &R, config: &TextConfig) -> FontResult<Self> {
        let (atlas, glyphs) = build_outline_atlas(rasterizer, config)?;
        Ok(Self {
            atlas,
            glyphs,
            state: FontState::Outline { path: None },
        })
    }

    /// The built-in dot-matrix font.
    pub fn fallback(config: &TextConfig) -> Self {
        let (atlas, glyphs) = build_fallback(config.fallback_spacing);
        Self {
            atlas,
            glyphs,
            state: FontState::Fallback,
        }
    }

    #[inline]
    pub fn atlas(&self) -> &AtlasImage {
        &self.atlas
    }

    #[inline]
    pub fn glyphs(&self) -> &GlyphTable {
        &self.glyphs
    }

    #[inline]
    pub fn state(&self) -> &FontState {
        &self.state
    }

    /// See [`layout::layout`].
    pub fn layout(&self, text: &str, origin: Vec2, scale: f32) -> Vec<GlyphQuad> {
        layout::layout(&self.glyphs, text, origin, scale)
    }

    /// See [`layout::layout_into`].
    pub fn layout_into(&self, batch: &mut QuadBatch, text: &str, origin: Vec2, scale: f32) -> f32 {
        layout::layout_into(batch, &self.glyphs, text, origin, scale)
    }

    /// See [`layout::measure`].
    pub fn measure(&self, text: &str, scale: f32) -> f32 {
        layout::measure(&self.glyphs, text, scale)
    }

    /// See [`layout::line_height`].
    pub fn line_height(&self, scale: f32) -> f32 {
        layout::line_height(&self.glyphs, scale)
    }
}

/// Rasterizes codes 32..=126 at `config.pixel_height` and row-packs them into
/// a `config.atlas_width` x `config.atlas_height` atlas.
///
/// Codes the rasterizer has no glyph for are left out of the table. Fails as
/// soon as one bitmap does not fit.
pub fn build_outline_atlas<R: GlyphRasterizer>(
    rasterizer: &R,
    config: &TextConfig,
) -> FontResult<(AtlasImage, GlyphTable)> {
    let scale = rasterizer.scale_for_pixel_height(config.pixel_height);
    if !(scale.is_finite() && scale > 0.0) {
        return Err(FontError::decode(format!("unusable scale {scale} for {}px", config.pixel_height)));
    }

    let row_height = config.row_height();
    let mut builder = AtlasBuilder::new(
        config.atlas_width,
        config.atlas_height,
        row_height,
        config.glyph_padding,
    );
    let mut table = GlyphTable::new(Pitch::Proportional, row_height as f32);

    for ch in (FIRST_PRINTABLE..=LAST_PRINTABLE).filter_map(char::from_u32) {
        let Some(bitmap) = rasterizer.bitmap_for(ch, scale) else {
            log::debug!("font has no glyph for {ch:?}");
            continue;
        };
        let Some((advance, _lsb)) = rasterizer.advance_and_left_bearing(ch) else {
            continue;
        };

        let uv = if bitmap.is_empty() {
            UvRect::default()
        } else {
            builder.insert(ch, bitmap.width, bitmap.height, &bitmap.pixels)?
        };

        table.insert(ch, Glyph {
            uv,
            offset: Vec2::new(bitmap.xoff as f32, bitmap.yoff as f32),
            advance: advance * scale,
            width: if bitmap.is_empty() { 0 } else { bitmap.width },
            height: if bitmap.is_empty() { 0 } else { bitmap.height },
        });
    }

    log::debug!(
        "outline atlas packed: {}x{}, {} rows of {}px, {} glyphs",
        config.atlas_width,
        config.atlas_height,
        builder.rows_used(),
        row_height,
        table.len()
    );
    Ok((builder.finish(), table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::raster::GlyphBitmap;

    /// Monospace stand-in: every letter and digit is a solid `w` x `h` block,
    /// space is empty, and '~' is missing from the font.
    struct BlockFont {
        w: u32,
        h: u32,
    }

    impl GlyphRasterizer for BlockFont {
        fn scale_for_pixel_height(&self, pixel_height: f32) -> f32 {
            pixel_height / 1000.0
        }

        fn bitmap_for(&self, ch: char, _scale: f32) -> Option<GlyphBitmap> {
            match ch {
                '~' => None,
                ' ' => Some(GlyphBitmap::default()),
                _ => Some(GlyphBitmap {
                    pixels: vec![200; (self.w * self.h) as usize],
                    width: self.w,
                    height: self.h,
                    xoff: 1,
                    yoff: -(self.h as i32),
                }),
            }
        }

        fn advance_and_left_bearing(&self, ch: char) -> Option<(f32, f32)> {
            (ch != '~').then_some((600.0, 50.0))
        }
    }

    fn config() -> TextConfig {
        TextConfig::default().with_candidates(Vec::<PathBuf>::new())
    }

    // ── outline path ──────────────────────────────────────────────────────

    #[test]
    fn outline_rects_are_non_degenerate_and_written() {
        let font = LoadedFont::from_rasterizer(&BlockFont { w: 12, h: 20 }, &config()).unwrap();
        let atlas = font.atlas();
        assert_eq!((atlas.width(), atlas.height()), (512, 512));
        assert_eq!(font.state(), &FontState::Outline { path: None });
        assert_eq!(font.glyphs().pitch(), Pitch::Proportional);

        for (ch, g) in font.glyphs().iter() {
            if g.is_blank() {
                assert_eq!(ch, ' ');
                continue;
            }
            assert!(g.uv.x1 > g.uv.x0 && g.uv.y1 > g.uv.y0, "{ch:?}");
            assert!(g.uv.is_normalized());
            let x = (g.uv.x0 * 512.0).round() as u32;
            let y = (g.uv.y0 * 512.0).round() as u32;
            assert_eq!(atlas.coverage_in(x, y, g.width, g.height), (12 * 20) as usize);
        }
    }

    #[test]
    fn outline_metrics_are_scaled() {
        let font = LoadedFont::from_rasterizer(&BlockFont { w: 12, h: 20 }, &config()).unwrap();
        let a = font.glyphs().get('A').unwrap();
        // 600 design units at 32 / 1000 px per unit.
        assert!((a.advance - 19.2).abs() < 1e-4);
        assert_eq!(a.offset, Vec2::new(1.0, -20.0));
        assert!((font.measure("AA", 1.0) - 38.4).abs() < 1e-4);
        assert_eq!(font.line_height(1.0), 38.0);
    }

    #[test]
    fn missing_glyphs_are_absent_and_space_advances() {
        let font = LoadedFont::from_rasterizer(&BlockFont { w: 12, h: 20 }, &config()).unwrap();
        assert!(!font.glyphs().contains('~'));
        assert_eq!(font.glyphs().len(), 94);

        let space = font.glyphs().get(' ').unwrap();
        assert!(space.is_blank());
        assert!(space.uv.is_degenerate());
        assert_eq!(font.layout("A A", Vec2::zero(), 1.0).len(), 2);
    }

    #[test]
    fn oversized_glyph_set_overflows() {
        let cfg = TextConfig { atlas_width: 64, atlas_height: 64, ..config() };
        let err = LoadedFont::from_rasterizer(&BlockFont { w: 12, h: 20 }, &cfg).unwrap_err();
        assert!(matches!(err, FontError::PackingOverflow { atlas_width: 64, atlas_height: 64, .. }));
    }

    #[test]
    fn bad_scale_is_a_decode_failure() {
        struct Flat;
        impl GlyphRasterizer for Flat {
            fn scale_for_pixel_height(&self, _: f32) -> f32 {
                0.0
            }
            fn bitmap_for(&self, _: char, _: f32) -> Option<GlyphBitmap> {
                None
            }
            fn advance_and_left_bearing(&self, _: char) -> Option<(f32, f32)> {
                None
            }
        }
        assert!(matches!(
            LoadedFont::from_rasterizer(&Flat, &config()),
            Err(FontError::DecodeFailed { .. })
        ));
    }

    // ── real font ─────────────────────────────────────────────────────────

    fn mono_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/DejaVuSansMono.ttf")
    }

    #[test]
    fn bundled_font_loads_and_every_rect_holds_its_bitmap() {
        let path = mono_path();
        let cfg = TextConfig::default().with_candidates([PathBuf::from("missing.ttf"), path.clone()]);
        let font = LoadedFont::load(&cfg);
        assert_eq!(font.state(), &FontState::Outline { path: Some(path.clone()) });
        assert_eq!(font.glyphs().len(), 95);

        let rasterizer = FontdueRasterizer::from_bytes(&std::fs::read(&path).unwrap()).unwrap();
        let scale = rasterizer.scale_for_pixel_height(cfg.pixel_height);
        let atlas = font.atlas();
        for (ch, g) in font.glyphs().iter().filter(|(_, g)| !g.is_blank()) {
            let bitmap = rasterizer.bitmap_for(ch, scale).unwrap();
            let x0 = (g.uv.x0 * atlas.width() as f32).round() as u32;
            let y0 = (g.uv.y0 * atlas.height() as f32).round() as u32;
            for y in 0..g.height {
                for x in 0..g.width {
                    let expected = bitmap.pixels[(y * g.width + x) as usize];
                    assert_eq!(atlas.get(x0 + x, y0 + y), Some(expected), "{ch:?} at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn glyphs_taller_than_a_row_overflow() {
        let cfg = TextConfig { line_height_factor: 0.5, ..config() };
        let err = LoadedFont::from_path(&mono_path(), &cfg).unwrap_err();
        assert!(matches!(err, FontError::PackingOverflow { .. }));
    }

    // ── selection ─────────────────────────────────────────────────────────

    #[test]
    fn no_candidates_selects_fallback() {
        let font = LoadedFont::load(&config());
        assert!(font.state().is_fallback());
        assert_eq!(font.glyphs().len(), 95);
        assert_eq!(font.measure("HELLO", 1.0), 50.0);
    }

    #[test]
    fn missing_and_garbage_candidates_fall_through() {
        let dir = std::env::temp_dir().join(format!("lumen-text-font-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let garbage = dir.join("garbage.ttf");
        std::fs::write(&garbage, b"this is not a font").unwrap();

        let cfg = TextConfig::default().with_candidates([
            dir.join("does-not-exist.ttf"),
            dir.clone(),
            garbage.clone(),
        ]);
        let font = LoadedFont::load(&cfg);
        assert_eq!(font.state(), &FontState::Fallback);
        assert_eq!(font.atlas().width(), 128);

        let err = LoadedFont::from_path(&garbage, &cfg).unwrap_err();
        assert!(matches!(err, FontError::DecodeFailed { path: Some(ref p), .. } if *p == garbage));

        let err = LoadedFont::from_path(&dir.join("nope.ttf"), &cfg).unwrap_err();
        assert!(matches!(err, FontError::SourceUnavailable { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn loaded_font_is_shareable_after_load() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LoadedFont>();
    }

    #[test]
    fn state_display() {
        assert_eq!(FontState::Fallback.to_string(), "built-in 8x8 font");
        let s = FontState::Outline { path: Some(PathBuf::from("fonts/a.ttf")) };
        assert_eq!(s.to_string(), "outline font fonts/a.ttf");
    }
}
