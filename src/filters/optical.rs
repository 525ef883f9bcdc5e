use super::{FontFilter, OptimizedFontData};
use crate::{svgpath::bounds, GlyphData, GlyphsmithError};

/// How far round and pointed letters should overshoot the metric lines,
/// as a fraction of the em
pub const OVERSHOOT_RATIO: f64 = 0.015;

const TOP_OVERSHOOT: &[char] = &['A', 'O', 'C', 'G', 'Q', 'S', 'V', 'W', 'o', 'c', 'e', 's'];
const BOTTOM_OVERSHOOT: &[char] = &['O', 'C', 'G', 'Q', 'S', 'U', 'J', 'o', 'c', 'e', 's', 'u'];
const POINTED_TOP: &[char] = &['A', 'V', 'W'];

/// Which metric lines a letter should overshoot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OvershootClass {
    pub top: bool,
    pub bottom: bool,
    pub pointed: bool,
}

impl OvershootClass {
    pub fn of(c: char) -> Self {
        OvershootClass {
            top: TOP_OVERSHOOT.contains(&c),
            bottom: BOTTOM_OVERSHOOT.contains(&c),
            pointed: POINTED_TOP.contains(&c),
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.top || self.bottom || self.pointed)
    }
}

/// Classify glyphs for overshoot correction.
///
/// Known limitation: no outline is changed yet. Each round or pointed glyph
/// is measured and the overshoot it would receive is logged, and the glyphs
/// come back as they went in.
pub fn apply_optical_corrections(glyphs: &[GlyphData], units_per_em: u16) -> Vec<GlyphData> {
    let overshoot = units_per_em as f64 * OVERSHOOT_RATIO;
    for glyph in glyphs {
        let class = glyph.single_char().map(OvershootClass::of).unwrap_or_default();
        if class.is_empty() {
            continue;
        }
        let extent = bounds(&glyph.path);
        log::debug!(
            "{:?} is {:?}, {} units tall; overshoot of {} not applied",
            glyph.character,
            class,
            extent.height,
            overshoot
        );
    }
    glyphs.to_vec()
}

#[derive(Default)]
pub struct OpticalCorrections;

impl OpticalCorrections {
    pub fn new() -> Self {
        OpticalCorrections
    }
}

impl FontFilter for OpticalCorrections {
    fn apply(&self, font: &mut OptimizedFontData) -> Result<(), GlyphsmithError> {
        log::info!("Classifying glyphs for optical overshoot");
        font.font.glyphs = apply_optical_corrections(&font.font.glyphs, font.font.units_per_em);
        font.optimization_applied.optical_corrections = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classification() {
        assert_eq!(
            OvershootClass::of('A'),
            OvershootClass {
                top: true,
                bottom: false,
                pointed: true
            }
        );
        assert_eq!(
            OvershootClass::of('o'),
            OvershootClass {
                top: true,
                bottom: true,
                pointed: false
            }
        );
        assert!(OvershootClass::of('H').is_empty());
    }

    #[test]
    fn test_corrections_leave_glyphs_unchanged() -> Result<(), GlyphsmithError> {
        let glyphs = vec![
            GlyphData::new("O", 79, 600.0, "M0 0 C0 -10 600 -10 600 0 Z")?,
            GlyphData::new("H", 72, 600.0, "M0 0 L600 0 L600 700 Z")?,
        ];
        assert_eq!(apply_optical_corrections(&glyphs, 1000), glyphs);
        Ok(())
    }
}
