use super::{FontFilter, OptimizedFontData};
use crate::{
    svgpath::{bounds, Bounds},
    GlyphData, GlyphsmithError,
};

/// Widths above this are treated as generator mistakes
const MAX_WIDTH: f64 = 1200.0;
/// Non-space glyphs narrower than this get [`FALLBACK_WIDTH`]
const MIN_WIDTH: f64 = 100.0;
const FALLBACK_WIDTH: f64 = 250.0;
/// A width narrower than the ink grows to the ink width times this
const INK_EXPANSION: f64 = 1.1;

fn close_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with(['M', 'm']) && !trimmed.ends_with(['Z', 'z']) {
        format!("{trimmed} Z")
    } else {
        path.to_string()
    }
}

fn fix_width(glyph: &GlyphData, ink: &Bounds) -> f64 {
    let mut width = glyph.width;
    if width < ink.width {
        width = (ink.width * INK_EXPANSION).round();
    }
    if width > MAX_WIDTH {
        width = MAX_WIDTH;
    }
    if width < MIN_WIDTH && !glyph.is_space() {
        width = FALLBACK_WIDTH;
    }
    width
}

/// Close open paths and pull widths into a usable range.
///
/// Returns repaired copies; the input is left as it is.
pub fn validate_and_fix_glyphs(glyphs: &[GlyphData]) -> Vec<GlyphData> {
    glyphs
        .iter()
        .map(|glyph| {
            let path = close_path(&glyph.path);
            let width = fix_width(glyph, &bounds(&path));
            if path != glyph.path || width != glyph.width {
                log::debug!(
                    "Repaired {:?}: width {} -> {}{}",
                    glyph.character,
                    glyph.width,
                    width,
                    if path != glyph.path {
                        ", closed path"
                    } else {
                        ""
                    }
                );
            }
            GlyphData {
                path,
                width,
                ..glyph.clone()
            }
        })
        .collect()
}

#[derive(Default)]
pub struct ValidateAndFixGlyphs;

impl ValidateAndFixGlyphs {
    pub fn new() -> Self {
        ValidateAndFixGlyphs
    }
}

impl FontFilter for ValidateAndFixGlyphs {
    fn apply(&self, font: &mut OptimizedFontData) -> Result<(), GlyphsmithError> {
        log::info!("Validating {} glyphs", font.font.glyphs.len());
        font.font.glyphs = validate_and_fix_glyphs(&font.font.glyphs);
        font.optimization_applied.glyph_validation = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn fixed(c: &str, width: f64, path: &str) -> Result<GlyphData, GlyphsmithError> {
        let glyph = GlyphData::new(c, c.chars().next().map_or(0, |c| c as u32), width, path)?;
        Ok(validate_and_fix_glyphs(&[glyph]).remove(0))
    }

    #[rstest]
    #[case("M0 0 L10 10", "M0 0 L10 10 Z")]
    #[case("m0 0 l10 10 ", "m0 0 l10 10 Z")]
    #[case("M0 0 L10 10 Z", "M0 0 L10 10 Z")]
    #[case("M0 0 L10 10z", "M0 0 L10 10z")]
    #[case("L10 10", "L10 10")]
    #[case("", "")]
    fn test_close_path(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(close_path(path), expected);
    }

    #[test]
    fn test_narrow_width_grows_to_ink() -> Result<(), GlyphsmithError> {
        assert_eq!(fixed("A", 300.0, "M0 0 L500 0 Z")?.width, 550.0);
        Ok(())
    }

    #[test]
    fn test_huge_width_is_capped() -> Result<(), GlyphsmithError> {
        assert_eq!(fixed("W", 5000.0, "M0 0 L500 0 Z")?.width, 1200.0);
        assert_eq!(fixed("W", 300.0, "M0 0 L2000 0 Z")?.width, 1200.0);
        Ok(())
    }

    #[test]
    fn test_tiny_width_gets_fallback() -> Result<(), GlyphsmithError> {
        assert_eq!(fixed("i", 40.0, "M0 0 L30 0 Z")?.width, 250.0);
        assert_eq!(fixed(" ", 40.0, "")?.width, 40.0);
        Ok(())
    }

    #[test]
    fn test_width_bounds_hold() -> Result<(), GlyphsmithError> {
        for width in [-50.0, 0.0, 99.0, 100.0, 640.0, 1199.0, 1201.0, 1e9] {
            let glyph = fixed("x", width, "M0 0 L60 0 Z")?;
            assert!(glyph.width >= 100.0 && glyph.width <= 1200.0);
        }
        Ok(())
    }
}
