use crate::{
    assemble,
    convertors::{
        otf::{self, CompilationOptions},
        woff2,
    },
    filters::{KerningPair, OptimizedFontData},
    transport::{to_base64, to_data_url, FontFormat},
    FontData, GlyphsmithError,
};
use serde::Serialize;
use std::time::Instant;
#[cfg(feature = "types")]
use typeshare::typeshare;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "types", typeshare)]
pub struct FileSize {
    pub otf: usize,
    pub woff2: usize,
}

/// What the application shows about a compiled font
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "types", typeshare)]
#[serde(rename_all = "camelCase")]
pub struct FontMetadata {
    pub family_name: String,
    pub style_name: String,
    /// Glyphs in the binary, `.notdef` and any synthesized space included
    pub glyph_count: usize,
    pub file_size: FileSize,
}

/// Both binaries for one font, with their metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFont {
    pub otf: Vec<u8>,
    pub woff2: Vec<u8>,
    pub metadata: FontMetadata,
}

impl CompiledFont {
    pub fn bytes(&self, format: FontFormat) -> &[u8] {
        match format {
            FontFormat::Otf => &self.otf,
            FontFormat::Woff2 => &self.woff2,
        }
    }

    pub fn to_base64(&self, format: FontFormat) -> String {
        to_base64(self.bytes(format))
    }

    pub fn data_url(&self, format: FontFormat) -> String {
        to_data_url(self.bytes(format), format)
    }
}

fn compile_with_kerning(
    font_data: &FontData,
    kerning: &[KerningPair],
    options: &CompilationOptions,
) -> Result<CompiledFont, GlyphsmithError> {
    font_data.validate()?;
    let start = Instant::now();
    let font = assemble(font_data);
    let assembled = Instant::now();
    let otf = otf::compile(&font, kerning, options)?;
    let compiled = Instant::now();
    let woff2 = woff2::compress(&otf)?;
    let compressed = Instant::now();
    log::info!(
        "Assembled in {:.2?}, compiled in {:.2?}, compressed in {:.2?}",
        assembled - start,
        compiled - assembled,
        compressed - compiled
    );
    log::info!(
        "{} {}: {} glyphs, {} bytes OTF, {} bytes WOFF2",
        font.family_name,
        font.style_name,
        font.glyphs.len(),
        otf.len(),
        woff2.len()
    );
    let metadata = FontMetadata {
        family_name: font.family_name,
        style_name: font.style_name,
        glyph_count: font.glyphs.len(),
        file_size: FileSize {
            otf: otf.len(),
            woff2: woff2.len(),
        },
    };
    Ok(CompiledFont {
        otf,
        woff2,
        metadata,
    })
}

/// Compile generated glyph data to OTF and WOFF2.
///
/// Glyphs which cannot be converted are left out with a warning. Invalid
/// font-level data, or a failure to build the tables or to compress, is an
/// error.
pub fn compile_font(font_data: &FontData) -> Result<CompiledFont, GlyphsmithError> {
    compile_with_kerning(font_data, &[], &CompilationOptions::default())
}

/// Compile the output of [`crate::filters::optimize`], writing its kerning
/// unless the options say otherwise.
pub fn compile_optimized(
    optimized: &OptimizedFontData,
    options: &CompilationOptions,
) -> Result<CompiledFont, GlyphsmithError> {
    compile_with_kerning(&optimized.font, &optimized.kerning_pairs, options)
}
