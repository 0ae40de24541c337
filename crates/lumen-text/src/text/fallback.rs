//! Built-in 8x8 dot-matrix font.
//!
//! Used when no outline font can be loaded. Each printable code maps to a short
//! list of [`Stroke`]s inside an 8x8 cell; the list for every code lives in one
//! table built on first use. Lowercase letters reuse the uppercase strokes and
//! codes without a design get a hollow box so they stay visible.
//!
//! The atlas is a 16 x 8 grid of cells; code `c` sits at index `c - 32`.

use std::sync::LazyLock;

use crate::config::{FALLBACK_CELL_SIZE, FIRST_PRINTABLE, LAST_PRINTABLE, is_printable};
use crate::coords::{UvRect, Vec2};
use crate::text::atlas::AtlasImage;
use crate::text::glyph::{Glyph, GlyphTable, Pitch};

/// Cells per atlas row.
pub const GRID_COLUMNS: u32 = 16;
/// Atlas rows; 16 x 8 cells hold all 95 printable codes with one spare row.
pub const GRID_ROWS: u32 = 8;

const GLYPH_COUNT: usize = (LAST_PRINTABLE - FIRST_PRINTABLE + 1) as usize;

/// One drawing primitive inside a cell. Coordinates are cell-relative.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stroke {
    Dot { x: u8, y: u8 },
    /// Horizontal run on row `y`, columns `x0..x1`.
    Row { y: u8, x0: u8, x1: u8 },
    /// Vertical run in column `x`, rows `y0..y1`.
    Col { x: u8, y0: u8, y1: u8 },
    /// `len` pixels starting at `(x, y)`, moving one row down and `dx`
    /// columns sideways per step.
    Diag { x: u8, y: u8, len: u8, dx: i8 },
}

impl Stroke {
    /// Calls `plot` for every pixel the stroke covers.
    pub fn for_each_pixel(self, mut plot: impl FnMut(u32, u32)) {
        match self {
            Stroke::Dot { x, y } => plot(x.into(), y.into()),
            Stroke::Row { y, x0, x1 } => (x0..x1).for_each(|x| plot(x.into(), y.into())),
            Stroke::Col { x, y0, y1 } => (y0..y1).for_each(|y| plot(x.into(), y.into())),
            Stroke::Diag { x, y, len, dx } => {
                for i in 0..i32::from(len) {
                    let px = i32::from(x) + i * i32::from(dx);
                    let py = i32::from(y) + i;
                    if px >= 0 {
                        plot(px as u32, py as u32);
                    }
                }
            }
        }
    }
}

const fn dot(x: u8, y: u8) -> Stroke {
    Stroke::Dot { x, y }
}

const fn row(y: u8, x0: u8, x1: u8) -> Stroke {
    Stroke::Row { y, x0, x1 }
}

const fn col(x: u8, y0: u8, y1: u8) -> Stroke {
    Stroke::Col { x, y0, y1 }
}

const fn diag(x: u8, y: u8, len: u8, dx: i8) -> Stroke {
    Stroke::Diag { x, y, len, dx }
}

/// Hollow rectangle drawn for codes without their own design.
const BOX: &[Stroke] = &[col(1, 1, 7), col(6, 1, 7), row(1, 1, 7), row(6, 1, 7)];

/// Hand-designed glyphs. Anything printable that is not listed (and is not a
/// lowercase letter) gets [`BOX`].
const DESIGNS: &[(char, &[Stroke])] = &[
    (' ', &[]),
    // digits
    ('0', BOX),
    ('1', &[col(3, 1, 7), dot(2, 1), dot(2, 6)]),
    ('2', &[row(1, 1, 7), row(4, 1, 7), row(6, 1, 7), dot(6, 2), dot(6, 3), dot(1, 4), dot(1, 5)]),
    ('3', &[row(1, 1, 7), row(4, 1, 7), row(6, 1, 7), col(6, 2, 6)]),
    ('4', &[col(1, 1, 5), row(4, 1, 7), col(6, 1, 7)]),
    ('5', &[row(1, 1, 7), row(3, 1, 7), row(6, 1, 7), dot(1, 2), col(6, 4, 6)]),
    ('6', &[col(1, 1, 7), row(1, 1, 7), row(4, 1, 7), row(6, 1, 7), col(6, 4, 6)]),
    ('7', &[row(1, 1, 7), col(6, 2, 7)]),
    ('8', &[col(1, 1, 7), col(6, 1, 7), row(1, 1, 7), row(4, 1, 7), row(6, 1, 7)]),
    ('9', &[col(6, 1, 5), row(1, 1, 7), row(4, 1, 7), row(6, 1, 7), col(1, 4, 6)]),
    // letters
    ('A', &[col(1, 2, 7), col(6, 2, 7), row(1, 1, 7), row(4, 2, 6)]),
    ('B', &[col(1, 1, 7), row(1, 1, 6), row(4, 1, 6), row(6, 1, 6), dot(6, 2), dot(6, 3), dot(6, 5)]),
    ('C', &[col(1, 2, 6), row(1, 2, 6), row(6, 2, 6)]),
    ('D', &[col(1, 1, 7), col(6, 2, 6), row(1, 2, 6), row(6, 2, 6)]),
    ('E', &[col(1, 1, 7), row(1, 1, 7), row(4, 1, 7), row(6, 1, 7)]),
    ('G', &[col(1, 2, 6), row(1, 2, 6), row(6, 2, 6), dot(6, 4), dot(6, 5), dot(5, 4)]),
    ('H', &[col(1, 1, 7), col(6, 1, 7), row(4, 1, 7)]),
    ('I', &[col(3, 1, 7), row(1, 1, 7), row(6, 1, 7)]),
    ('L', &[col(1, 1, 7), row(6, 1, 7)]),
    ('M', &[col(1, 1, 7), col(6, 1, 7), dot(2, 2), dot(3, 3), dot(4, 3), dot(5, 2)]),
    ('N', &[col(1, 1, 7), col(6, 1, 7), diag(2, 2, 4, 1)]),
    ('O', &[col(1, 2, 6), col(6, 2, 6), row(1, 2, 6), row(6, 2, 6)]),
    ('P', &[col(1, 1, 7), row(1, 1, 6), row(4, 1, 6), dot(6, 2), dot(6, 3)]),
    ('R', &[col(1, 1, 7), row(1, 1, 6), row(4, 1, 6), dot(6, 2), dot(6, 3), dot(5, 5), dot(6, 6)]),
    ('S', &[row(1, 1, 7), row(4, 1, 7), row(6, 1, 7), dot(1, 2), dot(1, 3), dot(6, 5)]),
    ('T', &[row(1, 1, 7), col(3, 1, 7)]),
    ('U', &[col(1, 1, 6), col(6, 1, 6), row(6, 1, 7)]),
    ('V', &[col(1, 1, 5), col(6, 1, 5), dot(2, 5), dot(5, 5), dot(3, 6), dot(4, 6)]),
    ('X', &[diag(1, 1, 6, 1), diag(6, 1, 6, -1)]),
    ('Y', &[dot(3, 1), dot(4, 1), col(2, 2, 5), col(5, 2, 5), col(3, 4, 7), dot(4, 4)]),
    // punctuation
    (':', &[dot(3, 2), dot(3, 5)]),
    ('.', &[dot(3, 6), dot(4, 6)]),
    ('-', &[row(3, 2, 6)]),
    ('=', &[row(2, 1, 7), row(5, 1, 7)]),
    ('/', &[diag(5, 1, 6, -1)]),
    ('(', &[col(2, 2, 6), dot(3, 1), dot(3, 6)]),
    (')', &[col(5, 2, 6), dot(4, 1), dot(4, 6)]),
];

/// Stroke list per printable code, indexed by `code - 32`.
static STROKES: LazyLock<[&'static [Stroke]; GLYPH_COUNT]> = LazyLock::new(|| {
    let mut table = [BOX; GLYPH_COUNT];
    for &(ch, strokes) in DESIGNS {
        table[slot(ch)] = strokes;
    }
    for lower in 'a'..='z' {
        table[slot(lower)] = table[slot(lower.to_ascii_uppercase())];
    }
    table
});

#[inline]
fn slot(ch: char) -> usize {
    (ch as u32 - FIRST_PRINTABLE) as usize
}

/// Strokes drawn for `ch`. Empty for non-printable codes.
pub fn strokes(ch: char) -> &'static [Stroke] {
    if is_printable(ch) { STROKES[slot(ch)] } else { &[] }
}

/// Draws `ch` into `image` with the cell's top-left at `(cell_x, cell_y)`.
pub fn draw_glyph(image: &mut AtlasImage, cell_x: u32, cell_y: u32, ch: char) {
    for stroke in strokes(ch) {
        stroke.for_each_pixel(|x, y| image.put(cell_x + x, cell_y + y, 255));
    }
}

/// Pixel position of `ch`'s cell in the fallback atlas.
pub fn cell_origin(ch: char) -> Option<(u32, u32)> {
    if !is_printable(ch) {
        return None;
    }
    let index = ch as u32 - FIRST_PRINTABLE;
    let col = index % GRID_COLUMNS;
    let row = index / GRID_COLUMNS;
    Some((col * FALLBACK_CELL_SIZE, row * FALLBACK_CELL_SIZE))
}

/// Draws every printable code into a grid atlas and describes each cell as a
/// fixed-pitch glyph.
///
/// Every glyph has a zero offset, the cell as its size and the cell plus
/// `spacing` as its advance. Lines are spaced the same way.
pub fn build_fallback(spacing: u32) -> (AtlasImage, GlyphTable) {
    const CELL: u32 = FALLBACK_CELL_SIZE;
    let atlas_w = GRID_COLUMNS * CELL;
    let atlas_h = GRID_ROWS * CELL;
    let pitch = (CELL + spacing) as f32;
    let mut image = AtlasImage::new(atlas_w, atlas_h);
    let mut table = GlyphTable::new(Pitch::Fixed, pitch);

    for code in FIRST_PRINTABLE..=LAST_PRINTABLE {
        let Some(ch) = char::from_u32(code) else { continue };
        let Some((x, y)) = cell_origin(ch) else { continue };

        draw_glyph(&mut image, x, y, ch);
        table.insert(ch, Glyph {
            uv: UvRect::from_pixels(x, y, CELL, CELL, atlas_w, atlas_h),
            offset: Vec2::zero(),
            advance: pitch,
            width: CELL,
            height: CELL,
        });
    }

    log::debug!("fallback atlas built: {}x{}, {} glyphs", atlas_w, atlas_h, table.len());
    (image, table)
}
