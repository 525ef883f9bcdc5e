use super::{FontFilter, OptimizedFontData};
use crate::{GlyphData, GlyphsmithError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
#[cfg(feature = "types")]
use typeshare::typeshare;

/// A spacing adjustment between two characters, in font units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "types", typeshare)]
pub struct KerningPair {
    pub left: char,
    pub right: char,
    pub value: i16,
}

impl KerningPair {
    pub const fn new(left: char, right: char, value: i16) -> Self {
        KerningPair { left, right, value }
    }
}

/// Classic Latin kerning pairs. Negative values tighten.
pub const KERNING_TABLE: &[KerningPair] = &[
    // Diagonals and overhangs against A
    KerningPair::new('A', 'V', -80),
    KerningPair::new('A', 'W', -60),
    KerningPair::new('A', 'Y', -80),
    KerningPair::new('A', 'T', -80),
    KerningPair::new('A', 'v', -40),
    KerningPair::new('A', 'w', -40),
    KerningPair::new('A', 'y', -40),
    KerningPair::new('V', 'A', -80),
    KerningPair::new('W', 'A', -60),
    KerningPair::new('Y', 'A', -80),
    KerningPair::new('T', 'A', -80),
    KerningPair::new('F', 'A', -60),
    KerningPair::new('P', 'A', -60),
    KerningPair::new('L', 'T', -80),
    KerningPair::new('L', 'V', -80),
    KerningPair::new('L', 'W', -60),
    KerningPair::new('L', 'Y', -80),
    KerningPair::new('L', 'y', -40),
    // Capitals over lowercase
    KerningPair::new('T', 'a', -80),
    KerningPair::new('T', 'c', -80),
    KerningPair::new('T', 'e', -80),
    KerningPair::new('T', 'o', -80),
    KerningPair::new('T', 'r', -60),
    KerningPair::new('T', 's', -60),
    KerningPair::new('T', 'u', -60),
    KerningPair::new('T', 'w', -60),
    KerningPair::new('T', 'y', -60),
    KerningPair::new('V', 'a', -60),
    KerningPair::new('V', 'e', -60),
    KerningPair::new('V', 'o', -60),
    KerningPair::new('V', 'u', -40),
    KerningPair::new('W', 'a', -40),
    KerningPair::new('W', 'e', -40),
    KerningPair::new('W', 'o', -40),
    KerningPair::new('Y', 'a', -80),
    KerningPair::new('Y', 'e', -80),
    KerningPair::new('Y', 'o', -80),
    KerningPair::new('Y', 'u', -60),
    KerningPair::new('P', 'a', -30),
    KerningPair::new('P', 'e', -30),
    KerningPair::new('P', 'o', -30),
    // Rounds against diagonals
    KerningPair::new('O', 'V', -30),
    KerningPair::new('O', 'W', -20),
    KerningPair::new('O', 'Y', -30),
    KerningPair::new('O', 'A', -30),
    KerningPair::new('O', 'T', -30),
    KerningPair::new('V', 'O', -30),
    KerningPair::new('Y', 'O', -30),
    // Punctuation after letters
    KerningPair::new('F', ',', -100),
    KerningPair::new('F', '.', -100),
    KerningPair::new('P', ',', -120),
    KerningPair::new('P', '.', -120),
    KerningPair::new('T', ',', -80),
    KerningPair::new('T', '.', -80),
    KerningPair::new('V', ',', -80),
    KerningPair::new('V', '.', -80),
    KerningPair::new('W', ',', -60),
    KerningPair::new('W', '.', -60),
    KerningPair::new('Y', ',', -100),
    KerningPair::new('Y', '.', -100),
    KerningPair::new('r', ',', -40),
    KerningPair::new('r', '.', -40),
    KerningPair::new('v', ',', -60),
    KerningPair::new('v', '.', -60),
    KerningPair::new('w', ',', -40),
    KerningPair::new('w', '.', -40),
    KerningPair::new('y', ',', -60),
    KerningPair::new('y', '.', -60),
    // Lowercase
    KerningPair::new('k', 'e', -20),
    KerningPair::new('k', 'o', -20),
    KerningPair::new('r', 'a', -20),
    KerningPair::new('v', 'a', -20),
    KerningPair::new('y', 'a', -20),
];

/// The entries of [`KERNING_TABLE`] whose characters both have a glyph.
pub fn generate_kerning_pairs(glyphs: &[GlyphData]) -> Vec<KerningPair> {
    let chars: HashSet<char> = glyphs.iter().filter_map(GlyphData::single_char).collect();
    KERNING_TABLE
        .iter()
        .filter(|pair| chars.contains(&pair.left) && chars.contains(&pair.right))
        .copied()
        .collect()
}

#[derive(Default)]
pub struct GenerateKerning;

impl GenerateKerning {
    pub fn new() -> Self {
        GenerateKerning
    }
}

impl FontFilter for GenerateKerning {
    fn apply(&self, font: &mut OptimizedFontData) -> Result<(), GlyphsmithError> {
        font.kerning_pairs = generate_kerning_pairs(&font.font.glyphs);
        log::info!("Generated {} kerning pairs", font.kerning_pairs.len());
        font.optimization_applied.kerning = true;
        Ok(())
    }
}
