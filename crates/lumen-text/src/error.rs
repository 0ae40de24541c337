use std::fmt;
use std::io;
use std::path::PathBuf;

/// Reasons a font candidate could not become the active glyph table.
///
/// All variants are recoverable at the font-selection layer: the loader logs
/// them and moves on to the next candidate or to the built-in font.
#[derive(Debug)]
pub enum FontError {
    /// The candidate path is missing or could not be read.
    SourceUnavailable { path: PathBuf, source: io::Error },
    /// The bytes are not a usable outline font.
    DecodeFailed { path: Option<PathBuf>, reason: String },
    /// The glyph set does not fit the fixed-size atlas.
    PackingOverflow { code: char, atlas_width: u32, atlas_height: u32 },
}

impl FontError {
    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        Self::DecodeFailed { path: None, reason: reason.into() }
    }

    /// Attaches the candidate path to a decode error raised before the path
    /// was known.
    pub(crate) fn at_path(self, at: impl Into<PathBuf>) -> Self {
        match self {
            Self::DecodeFailed { path: None, reason } => {
                Self::DecodeFailed { path: Some(at.into()), reason }
            }
            other => other,
        }
    }
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceUnavailable { path, source } => {
                write!(f, "font source {} unavailable: {source}", path.display())
            }
            Self::DecodeFailed { path: Some(path), reason } => {
                write!(f, "failed to decode font {}: {reason}", path.display())
            }
            Self::DecodeFailed { path: None, reason } => {
                write!(f, "failed to decode font: {reason}")
            }
            Self::PackingOverflow { code, atlas_width, atlas_height } => write!(
                f,
                "glyph {code:?} does not fit the {atlas_width}x{atlas_height} atlas"
            ),
        }
    }
}

impl std::error::Error for FontError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SourceUnavailable { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type FontResult<T> = Result<T, FontError>;
