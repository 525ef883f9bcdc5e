use crate::{
    common::to_unsigned_font_units,
    glyphnames::glyph_name,
    shape::Outline,
    svgpath::{bounds, to_outline},
    GlyphsmithError,
};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::ops::{Deref, DerefMut};
#[cfg(feature = "types")]
use typeshare::typeshare;

/// Each side bearing is this fraction of the wider of the ink and the
/// requested width.
pub const SIDE_BEARING_RATIO: f64 = 0.05;

/// Glyph coordinates must fit in the signed 16-bit glyf coordinate space
const COORDINATE_RANGE: std::ops::RangeInclusive<f64> = (i16::MIN as f64)..=(i16::MAX as f64);

/// A glyph as it arrives from the generator: one character, its codepoint,
/// a width hint and SVG path data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "types", typeshare)]
#[serde(try_from = "RawGlyphData")]
pub struct GlyphData {
    #[serde(rename = "char")]
    pub character: String,
    pub unicode: u32,
    pub width: f64,
    pub path: String,
}

#[derive(Deserialize)]
struct RawGlyphData {
    #[serde(rename = "char")]
    character: String,
    unicode: u32,
    width: f64,
    #[serde(default)]
    path: String,
}

impl TryFrom<RawGlyphData> for GlyphData {
    type Error = GlyphsmithError;

    fn try_from(raw: RawGlyphData) -> Result<Self, Self::Error> {
        GlyphData::new(raw.character, raw.unicode, raw.width, raw.path)
    }
}

impl GlyphData {
    /// Create a validated glyph record.
    ///
    /// The character must be non-empty, the codepoint a Unicode scalar value
    /// and the width finite. Path data is not validated here.
    pub fn new(
        character: impl Into<String>,
        unicode: u32,
        width: f64,
        path: impl Into<String>,
    ) -> Result<Self, GlyphsmithError> {
        let character = character.into();
        let invalid = |reason: &str| GlyphsmithError::InvalidGlyphData {
            character: character.clone(),
            reason: reason.to_string(),
        };
        if character.is_empty() {
            return Err(invalid("character is empty"));
        }
        if char::from_u32(unicode).is_none() {
            return Err(invalid(&format!("U+{unicode:04X} is not a Unicode scalar value")));
        }
        if !width.is_finite() {
            return Err(invalid("width is not a finite number"));
        }
        Ok(GlyphData {
            character,
            unicode,
            width,
            path: path.into(),
        })
    }

    /// The character, if the record holds exactly one
    pub fn single_char(&self) -> Option<char> {
        let mut chars = self.character.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    pub fn is_space(&self) -> bool {
        self.character == " " || self.unicode == 0x20
    }
}

/// A compiled glyph: a name, a codepoint, an advance and a font-space outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "types", typeshare)]
pub struct Glyph {
    #[cfg_attr(feature = "types", typeshare(serialized_as = "String"))]
    pub name: SmolStr,
    /// Zero for glyphs which are not mapped in the cmap, such as `.notdef`
    pub unicode: u32,
    pub advance_width: u16,
    pub outline: Outline,
}

impl Glyph {
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlyphList(pub Vec<Glyph>);

impl GlyphList {
    pub fn get(&self, g: &str) -> Option<&Glyph> {
        self.0.iter().find(|&glyph| glyph.name == g)
    }

    pub fn get_by_unicode(&self, unicode: u32) -> Option<&Glyph> {
        self.0
            .iter()
            .find(|glyph| unicode != 0 && glyph.unicode == unicode)
    }

    /// Glyph index of the glyph mapped to a character
    pub fn glyph_id(&self, c: char) -> Option<usize> {
        self.0.iter().position(|glyph| glyph.unicode == c as u32)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Glyph> {
        self.0.iter()
    }
}

impl Deref for GlyphList {
    type Target = Vec<Glyph>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DerefMut for GlyphList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// The advance for a glyph whose ink is `content_width` wide: the ink plus
/// a side bearing on each side, rounded to whole units.
pub fn advance_width(content_width: f64, width_hint: f64) -> f64 {
    let side_bearing = content_width.max(width_hint) * SIDE_BEARING_RATIO;
    (content_width + 2.0 * side_bearing).round()
}

/// Turn one generated glyph into a compiled glyph.
///
/// The outline is flipped into font space using `ascender` and keeps its SVG
/// x coordinates. The advance comes from the extent of the path data, not
/// from the width hint alone. Fails if any coordinate is not finite, does
/// not fit a 16-bit glyph coordinate, or if the contours cannot be drawn.
pub fn build_glyph(data: &GlyphData, ascender: f64) -> Result<Glyph, GlyphsmithError> {
    let conversion_error = |reason: String| GlyphsmithError::GlyphConversion {
        glyph: data.character.clone(),
        reason,
    };
    let outline = to_outline(&data.path, ascender);
    if let Some(node) = outline
        .nodes()
        .find(|n| !COORDINATE_RANGE.contains(&n.x) || !COORDINATE_RANGE.contains(&n.y))
    {
        return Err(conversion_error(format!(
            "coordinate ({}, {}) is out of range",
            node.x, node.y
        )));
    }
    outline
        .to_kurbo()
        .map_err(|e| conversion_error(e.to_string()))?;

    let content = bounds(&data.path);
    let advance = advance_width(content.width, data.width);
    if !(0.0..=u16::MAX as f64).contains(&advance) {
        return Err(conversion_error(format!("advance width {advance} is out of range")));
    }

    Ok(Glyph {
        name: glyph_name(data.unicode),
        unicode: data.unicode,
        advance_width: to_unsigned_font_units(advance),
        outline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(100.0, 0.0, 110.0)]
    #[case(100.0, 200.0, 120.0)]
    #[case(0.0, 0.0, 0.0)]
    #[case(101.0, 0.0, 111.0)]
    fn test_advance_width(#[case] content: f64, #[case] hint: f64, #[case] expected: f64) {
        assert_eq!(advance_width(content, hint), expected);
    }

    #[test]
    fn test_build_glyph() -> Result<(), GlyphsmithError> {
        let data = GlyphData::new("A", 65, 600.0, "M0 0 L100 0 L100 100 Z")?;
        let glyph = build_glyph(&data, 800.0)?;
        assert_eq!(glyph.name, "A");
        assert_eq!(glyph.unicode, 65);
        // 100 + 2 * (600 * 0.05)
        assert_eq!(glyph.advance_width, 160);
        assert_eq!(glyph.outline.paths.len(), 1);
        Ok(())
    }

    #[test]
    fn test_empty_path_builds_empty_glyph() -> Result<(), GlyphsmithError> {
        let data = GlyphData::new(" ", 32, 250.0, "")?;
        let glyph = build_glyph(&data, 800.0)?;
        assert!(glyph.is_empty());
        assert_eq!(glyph.name, "space");
        // No ink, so a user-provided space advances by 10% of its width hint
        assert_eq!(glyph.advance_width, 25);
        Ok(())
    }

    #[test]
    fn test_non_finite_coordinates_fail() -> Result<(), GlyphsmithError> {
        let data = GlyphData::new("B", 66, 500.0, "M0 0 L1e400 0 L0 10 Z")?;
        assert!(matches!(
            build_glyph(&data, 800.0),
            Err(GlyphsmithError::GlyphConversion { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_huge_coordinates_fail() -> Result<(), GlyphsmithError> {
        let data = GlyphData::new("C", 67, 500.0, "M0 0 L40000 0 L0 10 Z")?;
        assert!(build_glyph(&data, 800.0).is_err());
        Ok(())
    }

    #[rstest]
    #[case("", 65, 100.0)]
    #[case("A", 0xD800, 100.0)]
    #[case("A", 0x110000, 100.0)]
    #[case("A", 65, f64::NAN)]
    #[case("A", 65, f64::INFINITY)]
    fn test_invalid_glyph_data(#[case] c: &str, #[case] unicode: u32, #[case] width: f64) {
        assert!(matches!(
            GlyphData::new(c, unicode, width, "M0 0"),
            Err(GlyphsmithError::InvalidGlyphData { .. })
        ));
    }

    #[test]
    fn test_deserialize_glyph_data() -> Result<(), GlyphsmithError> {
        let data: GlyphData =
            serde_json::from_str(r#"{"char": "a", "unicode": 97, "width": 500, "path": "M0 0"}"#)?;
        assert_eq!(data.character, "a");
        assert_eq!(data.width, 500.0);
        let invalid: Result<GlyphData, _> =
            serde_json::from_str(r#"{"char": "", "unicode": 97, "width": 500, "path": ""}"#);
        assert!(invalid.is_err());
        Ok(())
    }

    #[test]
    fn test_single_char() -> Result<(), GlyphsmithError> {
        assert_eq!(GlyphData::new("x", 120, 1.0, "")?.single_char(), Some('x'));
        assert_eq!(GlyphData::new("fi", 0xFB01, 1.0, "")?.single_char(), None);
        Ok(())
    }
}
