//! CPU stand-in for the GPU sink: draws laid-out quads into a grayscale image
//! by nearest-sampling the atlas.

use image::{GrayImage, Luma};
use lumen_text::coords::Vec2;
use lumen_text::text::{AtlasImage, GlyphQuad, LoadedFont, Pitch};

const MARGIN: f32 = 8.0;

/// Lays out one string per line and rasterizes the quads.
pub fn render_lines(font: &LoadedFont, lines: &[String], scale: f32) -> GrayImage {
    let line_height = font.line_height(scale);
    let widest = lines
        .iter()
        .map(|l| font.measure(l, scale))
        .fold(0.0f32, f32::max);

    let width = (widest + 2.0 * MARGIN).ceil().max(1.0) as u32;
    let height = (line_height * lines.len() as f32 + 2.0 * MARGIN).ceil().max(1.0) as u32;
    let mut out = GrayImage::new(width, height);

    // Outline glyphs hang off a baseline; fallback cells hang off their top.
    let baseline_drop = match font.glyphs().pitch() {
        Pitch::Proportional => line_height * 0.8,
        Pitch::Fixed => 0.0,
    };

    for (i, line) in lines.iter().enumerate() {
        let origin = Vec2::new(MARGIN, MARGIN + line_height * i as f32 + baseline_drop);
        for quad in font.layout(line, origin, scale) {
            draw_quad(&mut out, font.atlas(), &quad);
        }
    }
    out
}

fn draw_quad(out: &mut GrayImage, atlas: &AtlasImage, quad: &GlyphQuad) {
    let min = quad.min();
    let max = quad.max();
    let [u0, v0] = quad.vertices[3].uv;
    let [u1, v1] = quad.vertices[1].uv;
    let (qw, qh) = (max.x - min.x, max.y - min.y);
    if qw <= 0.0 || qh <= 0.0 {
        return;
    }

    let x_start = min.x.floor().max(0.0) as u32;
    let y_start = min.y.floor().max(0.0) as u32;
    let x_end = (max.x.ceil().max(0.0) as u32).min(out.width());
    let y_end = (max.y.ceil().max(0.0) as u32).min(out.height());

    for py in y_start..y_end {
        let ty = ((py as f32 + 0.5 - min.y) / qh).clamp(0.0, 1.0);
        let v = v0 + (v1 - v0) * ty;
        for px in x_start..x_end {
            let tx = ((px as f32 + 0.5 - min.x) / qw).clamp(0.0, 1.0);
            let u = u0 + (u1 - u0) * tx;
            let ax = ((u * atlas.width() as f32) as u32).min(atlas.width().saturating_sub(1));
            let ay = ((v * atlas.height() as f32) as u32).min(atlas.height().saturating_sub(1));
            let coverage = atlas.get(ax, ay).unwrap_or(0);
            let dst = out.get_pixel_mut(px, py);
            *dst = Luma([dst.0[0].max(coverage)]);
        }
    }
}

/// Copies the atlas into an image for saving.
pub fn atlas_image(atlas: &AtlasImage) -> Option<GrayImage> {
    GrayImage::from_raw(atlas.width(), atlas.height(), atlas.pixels().to_vec())
}
