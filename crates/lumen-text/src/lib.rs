//! Lumen text.
//!
//! Builds a glyph atlas from an outline font (or a built-in 8x8 dot-matrix
//! font when none loads) and lays strings out as textured quads.
//!
//! ```no_run
//! use lumen_text::{config::TextConfig, coords::Vec2, text::LoadedFont};
//!
//! let font = LoadedFont::load(&TextConfig::default());
//! let width = font.measure("FPS: 60", 1.0);
//! let quads = font.layout("FPS: 60", Vec2::new(10.0 + width, 40.0), 1.0);
//! println!("{} quads from {}", quads.len(), font.state());
//! ```

pub mod config;
pub mod coords;
pub mod error;
pub mod logging;
pub mod render;
pub mod text;

pub use error::{FontError, FontResult};
