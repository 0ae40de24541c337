use std::path::PathBuf;

use clap::Parser;

/// Loads a font the way the renderer does and reports what it produced.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "lumen-studio", version, about)]
pub struct Args {
    /// Outline font candidate, tried in order (repeatable; replaces the defaults)
    #[arg(long = "font", value_name = "PATH")]
    pub fonts: Vec<PathBuf>,

    /// Glyph pixel height [default: 32]
    #[arg(long = "size", value_name = "PX", value_parser = positive_f32)]
    pub pixel_height: Option<f32>,

    /// Layout scale for measuring and previews
    #[arg(long, default_value_t = 1.0, value_parser = positive_f32)]
    pub scale: f32,

    /// Write the glyph atlas as a grayscale PNG
    #[arg(long, value_name = "FILE")]
    pub atlas_out: Option<PathBuf>,

    /// Render every TEXT line into a grayscale PNG
    #[arg(long, value_name = "FILE")]
    pub preview_out: Option<PathBuf>,

    /// Print every quad produced for TEXT
    #[arg(long)]
    pub geometry: bool,

    /// env_logger filter, e.g. lumen_text=debug
    #[arg(long = "log", value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Strings to measure and lay out
    #[arg(value_name = "TEXT")]
    pub texts: Vec<String>,
}

fn positive_f32(s: &str) -> Result<f32, String> {
    let v: f32 = s.parse().map_err(|_| format!("{s:?} is not a number"))?;
    if !(v.is_finite() && v > 0.0) {
        return Err(format!("{s} must be a positive number"));
    }
    Ok(v)
}
