use crate::{
    common::to_unsigned_font_units,
    glyph::{build_glyph, Glyph, GlyphData, GlyphList},
    metrics::{
        default_ascender, default_cap_height, default_descender, default_style,
        default_units_per_em, default_x_height, DEFAULT_ASCENDER, DEFAULT_CAP_HEIGHT,
        DEFAULT_DESCENDER, DEFAULT_STYLE, DEFAULT_UNITS_PER_EM, DEFAULT_X_HEIGHT,
        UNITS_PER_EM_RANGE,
    },
    names::Names,
    shape::{Outline, OutlinePen, PathBuilder},
    GlyphsmithError,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::HashSet;
#[cfg(feature = "types")]
use typeshare::typeshare;

/// `.notdef` is this fraction of the em wide
pub const NOTDEF_WIDTH_RATIO: f64 = 0.5;
/// Stroke of the `.notdef` box, as a fraction of the em
pub const NOTDEF_STROKE_RATIO: f64 = 0.05;
/// Advance of a synthesized space, as a fraction of the em
pub const SPACE_WIDTH_RATIO: f64 = 0.25;

/// A font as it arrives from the generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "types", typeshare)]
#[serde(rename_all = "camelCase", try_from = "RawFontData")]
pub struct FontData {
    pub name: String,
    pub style: String,
    pub units_per_em: u16,
    pub ascender: f64,
    pub descender: f64,
    pub cap_height: f64,
    pub x_height: f64,
    pub glyphs: Vec<GlyphData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFontData {
    name: String,
    #[serde(default = "default_style")]
    style: String,
    #[serde(default = "default_units_per_em")]
    units_per_em: u16,
    #[serde(default = "default_ascender")]
    ascender: f64,
    #[serde(default = "default_descender")]
    descender: f64,
    #[serde(default = "default_cap_height")]
    cap_height: f64,
    #[serde(default = "default_x_height")]
    x_height: f64,
    #[serde(default)]
    glyphs: Vec<GlyphData>,
}

impl TryFrom<RawFontData> for FontData {
    type Error = GlyphsmithError;

    fn try_from(raw: RawFontData) -> Result<Self, Self::Error> {
        let font_data = FontData {
            name: raw.name,
            style: raw.style,
            units_per_em: raw.units_per_em,
            ascender: raw.ascender,
            descender: raw.descender,
            cap_height: raw.cap_height,
            x_height: raw.x_height,
            glyphs: raw.glyphs,
        };
        font_data.validate()?;
        Ok(font_data)
    }
}

impl FontData {
    /// A font with the default style and metrics
    pub fn new(name: impl Into<String>, glyphs: Vec<GlyphData>) -> Self {
        FontData {
            name: name.into(),
            style: DEFAULT_STYLE.to_string(),
            units_per_em: DEFAULT_UNITS_PER_EM,
            ascender: DEFAULT_ASCENDER,
            descender: DEFAULT_DESCENDER,
            cap_height: DEFAULT_CAP_HEIGHT,
            x_height: DEFAULT_X_HEIGHT,
            glyphs,
        }
    }

    pub fn validate(&self) -> Result<(), GlyphsmithError> {
        if self.name.trim().is_empty() {
            return Err(GlyphsmithError::InvalidFontData(
                "family name is empty".to_string(),
            ));
        }
        if !UNITS_PER_EM_RANGE.contains(&self.units_per_em) {
            return Err(GlyphsmithError::InvalidFontData(format!(
                "unitsPerEm {} is outside {:?}",
                self.units_per_em, UNITS_PER_EM_RANGE
            )));
        }
        for (metric, value) in [
            ("ascender", self.ascender),
            ("descender", self.descender),
            ("capHeight", self.cap_height),
            ("xHeight", self.x_height),
        ] {
            if !value.is_finite() {
                return Err(GlyphsmithError::InvalidFontData(format!(
                    "{metric} is not a finite number"
                )));
            }
        }
        Ok(())
    }
}

/// An assembled font, ready to be written out
#[derive(Debug, Clone)]
pub struct Font {
    pub names: Names,
    pub family_name: String,
    pub style_name: String,
    pub units_per_em: u16,
    pub version: (u16, u16),
    pub ascender: f64,
    pub descender: f64,
    pub cap_height: f64,
    pub x_height: f64,
    /// Glyph order: `.notdef` first, then a space if one was synthesized,
    /// then the input glyphs in input order
    pub glyphs: GlyphList,
    pub date: chrono::DateTime<Local>,
}

impl Font {
    pub fn glyph_names(&self) -> impl Iterator<Item = &SmolStr> {
        self.glyphs.iter().map(|g| &g.name)
    }
}

/// The "missing glyph" box: an outer rectangle the height of the ascender
/// with a counter cut out of it.
pub fn notdef_glyph(units_per_em: u16, ascender: f64) -> Glyph {
    let upm = units_per_em as f64;
    let width = upm * NOTDEF_WIDTH_RATIO;
    let stroke = upm * NOTDEF_STROKE_RATIO;
    let mut pen = PathBuilder::new();
    // Outer contour clockwise
    pen.move_to(0.0, 0.0);
    pen.line_to(0.0, ascender);
    pen.line_to(width, ascender);
    pen.line_to(width, 0.0);
    pen.close();
    // Counter anticlockwise
    pen.move_to(stroke, stroke);
    pen.line_to(width - stroke, stroke);
    pen.line_to(width - stroke, ascender - stroke);
    pen.line_to(stroke, ascender - stroke);
    pen.close();
    Glyph {
        name: SmolStr::new_static(".notdef"),
        unicode: 0,
        advance_width: to_unsigned_font_units(width),
        outline: Outline::from(pen.build()),
    }
}

/// An empty glyph for U+0020, a quarter of the em wide
pub fn space_glyph(units_per_em: u16) -> Glyph {
    Glyph {
        name: SmolStr::new_static("space"),
        unicode: 0x20,
        advance_width: to_unsigned_font_units(units_per_em as f64 * SPACE_WIDTH_RATIO),
        outline: Outline::default(),
    }
}

/// Build a font from generated glyph records.
///
/// Glyphs which fail to convert are logged and left out; one bad glyph
/// never fails the font. A glyph whose name or codepoint duplicates an
/// earlier one is dropped the same way.
pub fn assemble(font_data: &FontData) -> Font {
    let units_per_em = font_data.units_per_em;
    let mut glyphs = vec![notdef_glyph(units_per_em, font_data.ascender)];
    let synthesize_space = !font_data.glyphs.iter().any(GlyphData::is_space);
    if synthesize_space {
        log::debug!("No space in the input; adding one");
        glyphs.push(space_glyph(units_per_em));
    }

    let mut seen_names: HashSet<SmolStr> = glyphs.iter().map(|g| g.name.clone()).collect();
    let mut seen_codepoints: HashSet<u32> = glyphs.iter().map(|g| g.unicode).collect();
    for data in &font_data.glyphs {
        let glyph = match build_glyph(data, font_data.ascender) {
            Ok(glyph) => glyph,
            Err(e) => {
                log::warn!("Skipping glyph {:?}: {}", data.character, e);
                continue;
            }
        };
        if seen_names.contains(&glyph.name) || seen_codepoints.contains(&glyph.unicode) {
            log::warn!(
                "Skipping glyph {:?}: U+{:04X} ({}) is already in the font",
                data.character,
                glyph.unicode,
                glyph.name
            );
            continue;
        }
        seen_names.insert(glyph.name.clone());
        seen_codepoints.insert(glyph.unicode);
        glyphs.push(glyph);
    }
    log::info!(
        "Assembled {} with {} glyphs from {} inputs",
        font_data.name,
        glyphs.len(),
        font_data.glyphs.len()
    );

    let version = (1, 0);
    Font {
        names: Names::new(&font_data.name, &font_data.style, version),
        family_name: font_data.name.clone(),
        style_name: font_data.style.clone(),
        units_per_em,
        version,
        ascender: font_data.ascender,
        descender: font_data.descender,
        cap_height: font_data.cap_height,
        x_height: font_data.x_height,
        glyphs: GlyphList(glyphs),
        date: Local::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[allow(clippy::unwrap_used)]
    fn glyph(c: char, path: &str) -> GlyphData {
        GlyphData::new(c.to_string(), c as u32, 500.0, path).unwrap()
    }

    #[test]
    fn test_notdef_and_space_are_added() {
        let font = assemble(&FontData::new("Test", vec![glyph('A', "M0 0 L10 0 L10 10 Z")]));
        let names: Vec<&str> = font.glyph_names().map(|n| n.as_str()).collect();
        assert_eq!(names, vec![".notdef", "space", "A"]);
        assert_eq!(font.glyphs[0].advance_width, 500);
        assert_eq!(font.glyphs[1].advance_width, 250);
    }

    #[test]
    fn test_input_space_is_kept() {
        let font = assemble(&FontData::new(
            "Test",
            vec![glyph('A', "M0 0 L10 0 L10 10 Z"), glyph(' ', "")],
        ));
        let names: Vec<&str> = font.glyph_names().map(|n| n.as_str()).collect();
        assert_eq!(names, vec![".notdef", "A", "space"]);
    }

    #[test]
    fn test_bad_glyphs_are_skipped() {
        let font = assemble(&FontData::new(
            "Test",
            vec![
                glyph('A', "M0 0 L10 0 L10 10 Z"),
                glyph('B', "M0 0 L1e400 0 L0 10 Z"),
                glyph('C', "M0 0 L10 0 L10 10 Z"),
            ],
        ));
        assert_eq!(font.glyphs.len(), 4);
        assert!(font.glyphs.get("B").is_none());
        assert!(font.glyphs.get("C").is_some());
    }

    #[test]
    fn test_duplicates_are_skipped() {
        let font = assemble(&FontData::new(
            "Test",
            vec![glyph('A', "M0 0 L10 0 Z"), glyph('A', "M0 0 L20 0 Z")],
        ));
        assert_eq!(font.glyphs.len(), 3);
    }

    #[test]
    fn test_empty_input() {
        let font = assemble(&FontData::new("Test", vec![]));
        assert_eq!(font.glyphs.len(), 2);
    }

    #[test]
    fn test_notdef_shape() -> Result<(), GlyphsmithError> {
        let notdef = notdef_glyph(1000, 800.0);
        assert_eq!(notdef.outline.paths.len(), 2);
        assert!(notdef.outline.paths.iter().all(|p| p.closed));
        let bbox = notdef.outline.control_box();
        assert_eq!(bbox, Some(kurbo::Rect::new(0.0, 0.0, 500.0, 800.0)));
        // Outer contour clockwise, counter anticlockwise
        use kurbo::Shape;
        let areas: Vec<f64> = notdef
            .outline
            .contours()
            .map(|p| p.to_kurbo().map(|b| b.area()))
            .collect::<Result<_, _>>()?;
        assert!(areas[0] < 0.0);
        assert!(areas[1] > 0.0);
        Ok(())
    }

    #[test]
    fn test_font_data_defaults_from_json() -> Result<(), GlyphsmithError> {
        let font_data: FontData = serde_json::from_str(
            r#"{"name": "Theme", "glyphs": [{"char": "A", "unicode": 65, "width": 600, "path": "M0 0 L10 10"}]}"#,
        )?;
        assert_eq!(font_data.units_per_em, 1000);
        assert_eq!(font_data.ascender, 800.0);
        assert_eq!(font_data.descender, -200.0);
        assert_eq!(font_data.cap_height, 700.0);
        assert_eq!(font_data.x_height, 500.0);
        assert_eq!(font_data.style, "Regular");
        assert_eq!(font_data.glyphs.len(), 1);
        Ok(())
    }

    #[test]
    fn test_invalid_units_per_em() {
        let result: Result<FontData, _> =
            serde_json::from_str(r#"{"name": "Theme", "unitsPerEm": 8, "glyphs": []}"#);
        assert!(result.is_err());
    }
}
