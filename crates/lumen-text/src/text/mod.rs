//! Glyph atlas construction and text layout.
//!
//! Pipeline: [`font::LoadedFont::load`] picks a source, the outline path
//! rasterizes through [`raster`] and packs with [`atlas`], the fallback path
//! draws with [`fallback`]; both end in a [`glyph::GlyphTable`] that
//! [`layout`] turns into quads.

pub mod atlas;
pub mod fallback;
pub mod font;
pub mod glyph;
pub mod layout;
pub mod raster;

pub use atlas::{AtlasBuilder, AtlasImage, Placement, RowPacker};
pub use font::{build_outline_atlas, FontState, LoadedFont};
pub use glyph::{Glyph, GlyphTable, Pitch};
pub use layout::{
    layout, layout_into, line_height, measure, GlyphQuad, GlyphVertex, PenStep, PenWalk, QuadBatch,
    QUAD_INDICES,
};
pub use raster::{FontdueRasterizer, GlyphBitmap, GlyphRasterizer};
