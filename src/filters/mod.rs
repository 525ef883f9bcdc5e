//! Typographic passes run over generated glyph data before compilation.
//!
//! Every pass works on an [`OptimizedFontData`] copy; the caller's
//! [`FontData`] is never touched.
mod kerning;
mod optical;
mod repair;

pub use kerning::{generate_kerning_pairs, GenerateKerning, KerningPair, KERNING_TABLE};
pub use optical::{apply_optical_corrections, OpticalCorrections, OvershootClass, OVERSHOOT_RATIO};
pub use repair::{validate_and_fix_glyphs, ValidateAndFixGlyphs};

use crate::{FontData, GlyphsmithError};
use serde::Serialize;
#[cfg(feature = "types")]
use typeshare::typeshare;

pub trait FontFilter {
    fn apply(&self, font: &mut OptimizedFontData) -> Result<(), GlyphsmithError>;
}

/// Which passes have run over an [`OptimizedFontData`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "types", typeshare)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationsApplied {
    pub kerning: bool,
    pub optical_corrections: bool,
    pub glyph_validation: bool,
}

/// Font data after the typographic passes, with the kerning they produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "types", typeshare)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedFontData {
    #[serde(flatten)]
    pub font: FontData,
    pub kerning_pairs: Vec<KerningPair>,
    pub optimization_applied: OptimizationsApplied,
}

impl From<FontData> for OptimizedFontData {
    fn from(font: FontData) -> Self {
        OptimizedFontData {
            font,
            kerning_pairs: vec![],
            optimization_applied: OptimizationsApplied::default(),
        }
    }
}

/// Repair glyphs, run the optical pass and generate kerning, in that order.
pub fn optimize(font_data: &FontData) -> Result<OptimizedFontData, GlyphsmithError> {
    let mut optimized = OptimizedFontData::from(font_data.clone());
    let filters: [&dyn FontFilter; 3] = [
        &ValidateAndFixGlyphs,
        &OpticalCorrections,
        &GenerateKerning,
    ];
    for filter in filters {
        filter.apply(&mut optimized)?;
    }
    Ok(optimized)
}
