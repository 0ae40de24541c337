mod args;
mod preview;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_text::config::TextConfig;
use lumen_text::coords::Vec2;
use lumen_text::logging::{init_logging, LoggingConfig};
use lumen_text::text::LoadedFont;

use crate::args::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log_filter.clone(),
        ..LoggingConfig::default()
    });

    let config = config_from(&args);
    let font = LoadedFont::load(&config);
    let atlas = font.atlas();

    println!("font      {}", font.state());
    println!("glyphs    {}", font.glyphs().len());
    println!("atlas     {}x{}", atlas.width(), atlas.height());
    println!("line      {:.2}px at scale {}", font.line_height(args.scale), args.scale);

    for text in &args.texts {
        println!();
        println!("{text:?}  width {:.2}px", font.measure(text, args.scale));
        if args.geometry {
            for quad in font.layout(text, Vec2::zero(), args.scale) {
                let (min, max) = (quad.min(), quad.max());
                let uv = (quad.vertices[3].uv, quad.vertices[1].uv);
                println!(
                    "  {:?}  ({:.1}, {:.1})-({:.1}, {:.1})  uv {:?}-{:?}",
                    quad.ch, min.x, min.y, max.x, max.y, uv.0, uv.1
                );
            }
        }
    }

    if let Some(path) = &args.atlas_out {
        let img = preview::atlas_image(atlas).context("atlas buffer does not match its size")?;
        img.save(path).with_context(|| format!("writing {}", path.display()))?;
        log::info!("atlas written to {}", path.display());
    }

    if let Some(path) = &args.preview_out {
        let img = preview::render_lines(&font, &args.texts, args.scale);
        img.save(path).with_context(|| format!("writing {}", path.display()))?;
        log::info!("preview written to {}", path.display());
    }

    Ok(())
}

fn config_from(args: &Args) -> TextConfig {
    let mut config = TextConfig::default();
    if !args.fonts.is_empty() {
        config = config.with_candidates(args.fonts.iter().cloned());
    }
    if let Some(px) = args.pixel_height {
        config = config.with_pixel_height(px);
    }
    config
}
