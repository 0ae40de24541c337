use std::ops::RangeInclusive;
use std::path::PathBuf;

/// First printable ASCII code (space).
pub const FIRST_PRINTABLE: u32 = 32;
/// Last printable ASCII code (tilde).
pub const LAST_PRINTABLE: u32 = 126;

/// Codes the atlas and the layout pass support.
pub const PRINTABLE: RangeInclusive<u32> = FIRST_PRINTABLE..=LAST_PRINTABLE;

/// Returns `true` for codes inside [`PRINTABLE`].
#[inline]
pub fn is_printable(ch: char) -> bool {
    PRINTABLE.contains(&(ch as u32))
}

/// Side of a built-in dot-matrix cell in pixels. The stroke designs are drawn
/// on this grid, so it is not configurable.
pub const FALLBACK_CELL_SIZE: u32 = 8;

/// Font loading configuration.
///
/// The defaults reproduce a 32 px monospace HUD font packed into a 512 x 512
/// atlas. Only the candidate list is commonly overridden.
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Requested glyph height in pixels (ascent to descent).
    pub pixel_height: f32,

    /// Atlas dimensions in pixels. Fixed; glyphs that do not fit are an error.
    pub atlas_width: u32,
    pub atlas_height: u32,

    /// Row stride multiplier applied to `pixel_height`.
    pub line_height_factor: f32,

    /// Horizontal gap between packed glyphs, in pixels.
    pub glyph_padding: u32,

    /// Outline font files tried in order. The first that loads wins.
    pub candidate_paths: Vec<PathBuf>,

    /// Gap after every built-in font cell, horizontally and between lines.
    pub fallback_spacing: u32,
}

impl TextConfig {
    /// Row height used by the atlas packer.
    #[inline]
    pub fn row_height(&self) -> u32 {
        (self.pixel_height * self.line_height_factor).max(1.0) as u32
    }

    /// Replaces the candidate list.
    pub fn with_candidates<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.candidate_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pixel_height(mut self, pixel_height: f32) -> Self {
        self.pixel_height = pixel_height;
        self
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            pixel_height: 32.0,
            atlas_width: 512,
            atlas_height: 512,
            line_height_factor: 1.2,
            glyph_padding: 1,
            candidate_paths: vec![
                PathBuf::from("fonts/RobotoMono-Medium.ttf"),
                PathBuf::from("uwp/fonts/RobotoMono-Medium.ttf"),
                PathBuf::from("RobotoMono-Medium.ttf"),
            ],
            fallback_spacing: 2,
        }
    }
}
