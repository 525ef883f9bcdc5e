use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlyphsmithError {
    #[error("Invalid glyph data for {character:?}: {reason}")]
    InvalidGlyphData { character: String, reason: String },

    #[error("Invalid font data: {0}")]
    InvalidFontData(String),

    #[error("Ill-constructed path")]
    BadPath,

    #[error("Glyph {glyph} could not be converted: {reason}")]
    GlyphConversion { glyph: String, reason: String },

    #[error("Error building font tables: {0}")]
    TableBuild(#[from] write_fonts::BuilderError),

    #[error("Conflicting cmap entries: {0}")]
    CmapConflict(#[from] write_fonts::tables::cmap::CmapConflict),

    #[error("Error reading compiled font: {0}")]
    Read(#[from] write_fonts::read::ReadError),

    #[error("Table {0} is missing from the compiled font")]
    MissingTable(String),

    #[error("WOFF2 compression failed: {0}")]
    Compression(String),

    #[error("IO Error: {0}")]
    IO(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
