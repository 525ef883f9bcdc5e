#![deny(clippy::unwrap_used, clippy::expect_used)]
//! Compiles generated SVG glyph outlines into installable fonts.
//!
//! Glyph records come in as [`FontData`]; [`compile_font`] assembles them
//! into a [`Font`], writes an OpenType binary and wraps it in WOFF2.
//! [`filters::optimize`] can run first to repair glyphs and add kerning.

mod common;
mod compile;
pub mod convertors;
mod error;
pub mod filters;
mod font;
mod glyph;
mod glyphnames;
mod metrics;
pub mod names;
mod shape;
pub mod svgpath;
pub mod transport;

pub use crate::{
    common::{Node, NodeType},
    compile::{compile_font, compile_optimized, CompiledFont, FileSize, FontMetadata},
    convertors::otf::CompilationOptions,
    error::GlyphsmithError,
    font::{assemble, notdef_glyph, space_glyph, Font, FontData},
    glyph::{advance_width, build_glyph, Glyph, GlyphData, GlyphList},
    glyphnames::glyph_name,
    metrics::MetricType,
    shape::{Outline, OutlinePen, Path, PathBuilder},
    transport::FontFormat,
};
use std::path::PathBuf;

/// Read a [`FontData`] JSON document
pub fn load(filename: impl Into<PathBuf>) -> Result<FontData, GlyphsmithError> {
    let pb = filename.into();
    let buffered = std::io::BufReader::new(std::fs::File::open(&pb)?);
    Ok(serde_json::from_reader(buffered)?)
}
