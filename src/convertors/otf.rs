//! Writes an assembled [`Font`] as an OpenType binary with TrueType outlines.
use crate::{
    common::{to_font_units, to_unsigned_font_units},
    filters::KerningPair,
    metrics::MetricType,
    names::{weight_class, Names, StyleMapStyle},
    Font, Glyph, GlyphsmithError,
};
use kurbo::{BezPath, CubicBez, PathEl, Point};
use write_fonts::{
    read::FontRef,
    tables::{
        cmap::Cmap,
        glyf::{Bbox, GlyfLocaBuilder, SimpleGlyph},
        head::{Flags, Head, MacStyle},
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        kern::{Kern, Kern0, KernCoverage, KernPair},
        loca::LocaFormat,
        maxp::Maxp,
        os2::{Os2, SelectionFlags},
        post::Post,
    },
    types::{FWord, Fixed, GlyphId, LongDateTime, Tag, UfWord},
    FontBuilder,
};

/// Maximum distance, in font units, between a cubic and its quadratic
/// approximation
const CURVE_ACCURACY: f64 = 1.0;
/// Seconds between the OpenType epoch (1904) and the Unix epoch
const SECONDS_SINCE_1904: i64 = 2_082_844_800;
const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;
const VENDOR_ID: &[u8; 4] = b"NONE";

/// Options for compiling a [`Font`] to binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationOptions {
    /// Leave the `kern` table out even when kerning pairs are supplied
    pub skip_kerning: bool,
    /// Font revision, as (major, minor); written to `head` and the version string
    pub version: (u16, u16),
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self {
            skip_kerning: false,
            version: (1, 0),
        }
    }
}

/// A glyph converted to glyf form, with the horizontal metrics derived from it
struct CompiledGlyph {
    glyph: SimpleGlyph,
    advance: u16,
    /// `None` for glyphs with no contours
    bbox: Option<Bbox>,
}

impl CompiledGlyph {
    fn left_side_bearing(&self) -> i16 {
        self.bbox.map_or(0, |b| b.x_min)
    }
}

/// Replace every cubic segment with quadratics, since glyf can only store
/// the latter.
fn to_quadratic(path: &BezPath) -> BezPath {
    let mut quadratic = BezPath::new();
    let mut current = Point::ZERO;
    let mut start = Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                start = p;
                current = p;
                quadratic.move_to(p);
            }
            PathEl::LineTo(p) => {
                current = p;
                quadratic.line_to(p);
            }
            PathEl::QuadTo(p1, p2) => {
                current = p2;
                quadratic.quad_to(p1, p2);
            }
            PathEl::CurveTo(p1, p2, p3) => {
                for (_, _, quad) in CubicBez::new(current, p1, p2, p3).to_quads(CURVE_ACCURACY) {
                    quadratic.quad_to(quad.p1, quad.p2);
                }
                current = p3;
            }
            PathEl::ClosePath => {
                current = start;
                quadratic.close_path();
            }
        }
    }
    quadratic
}

fn compile_glyph(glyph: &Glyph) -> Result<CompiledGlyph, GlyphsmithError> {
    let conversion_error = |reason: String| GlyphsmithError::GlyphConversion {
        glyph: glyph.name.to_string(),
        reason,
    };
    if glyph.is_empty() {
        return Ok(CompiledGlyph {
            glyph: SimpleGlyph::default(),
            advance: glyph.advance_width,
            bbox: None,
        });
    }
    let path = to_quadratic(&glyph.outline.to_kurbo()?);
    let simple =
        SimpleGlyph::from_bezpath(&path).map_err(|e| conversion_error(format!("{e:?}")))?;
    let bbox = (!simple.contours.is_empty()).then_some(simple.bbox);
    Ok(CompiledGlyph {
        glyph: simple,
        advance: glyph.advance_width,
        bbox,
    })
}

fn font_revision((major, minor): (u16, u16)) -> Fixed {
    Fixed::from_f64(major as f64 + minor as f64 / 1000.0)
}

fn style_bits(style: Option<StyleMapStyle>) -> (SelectionFlags, MacStyle) {
    let mut selection = SelectionFlags::USE_TYPO_METRICS;
    let mut mac_style = MacStyle::empty();
    match style {
        Some(s) if s.is_bold() || s.is_italic() => {
            if s.is_bold() {
                selection |= SelectionFlags::BOLD;
                mac_style |= MacStyle::BOLD;
            }
            if s.is_italic() {
                selection |= SelectionFlags::ITALIC;
                mac_style |= MacStyle::ITALIC;
            }
        }
        _ => selection |= SelectionFlags::REGULAR,
    }
    (selection, mac_style)
}

/// Unicode range bits 0 (Basic Latin) and 1 (Latin-1 Supplement)
fn unicode_range_1(codepoints: &[u32]) -> u32 {
    let mut bits = 0;
    if codepoints.iter().any(|&c| (0x20..0x7F).contains(&c)) {
        bits |= 1 << 0;
    }
    if codepoints.iter().any(|&c| (0xA0..=0xFF).contains(&c)) {
        bits |= 1 << 1;
    }
    bits
}

fn kern_table(font: &Font, kerning: &[KerningPair]) -> Result<Option<Kern>, GlyphsmithError> {
    let mut pairs: Vec<(u16, u16, i16)> = kerning
        .iter()
        .filter_map(|pair| {
            let left = font.glyphs.glyph_id(pair.left)?;
            let right = font.glyphs.glyph_id(pair.right)?;
            Some((u16::try_from(left).ok()?, u16::try_from(right).ok()?, pair.value))
        })
        .collect();
    // Binary search in the subtable needs the pairs ordered by glyph ids
    pairs.sort_by_key(|&(l, r, _)| (l, r));
    pairs.dedup_by_key(|&mut (l, r, _)| (l, r));
    if pairs.is_empty() {
        return Ok(None);
    }
    // Each pair is six bytes and the search fields are u16 byte counts
    let too_many = || {
        GlyphsmithError::InvalidFontData(format!(
            "{} kerning pairs do not fit a kern subtable",
            pairs.len()
        ))
    };
    let n_pairs = u16::try_from(pairs.len()).map_err(|_| too_many())?;
    let pairs_size = n_pairs.checked_mul(6).ok_or_else(too_many)?;
    let entry_selector = (u16::BITS - 1 - n_pairs.leading_zeros()) as u16;
    let search_range = (1u16 << entry_selector) * 6;
    let range_shift = pairs_size - search_range;
    log::debug!("Writing {} kerning pairs", pairs.len());
    let kern0 = Kern0::new(
        KernCoverage::HORIZONTAL,
        search_range,
        entry_selector,
        range_shift,
        pairs
            .into_iter()
            .map(|(l, r, v)| KernPair::new(l, r, FWord::new(v)))
            .collect(),
    );
    Ok(Some(Kern::new(vec![kern0])))
}

/// Fill in `head.checkSumAdjustment` so the whole file sums to the magic
/// number.
fn set_checksum_adjustment(bytes: &mut [u8]) -> Result<(), GlyphsmithError> {
    let head_offset = FontRef::new(bytes)?
        .table_directory
        .table_records()
        .iter()
        .find(|record| record.tag() == Tag::new(b"head"))
        .map(|record| record.offset() as usize)
        .ok_or_else(|| GlyphsmithError::MissingTable("head".to_string()))?;
    let field = head_offset + 8..head_offset + 12;
    if bytes.len() < field.end {
        return Err(GlyphsmithError::MissingTable("head".to_string()));
    }
    bytes[field.clone()].fill(0);
    let adjustment = CHECKSUM_MAGIC.wrapping_sub(checksum(bytes));
    bytes[field].copy_from_slice(&adjustment.to_be_bytes());
    Ok(())
}

/// The OpenType table checksum: a wrapping sum of big-endian u32 words,
/// with the tail zero-padded.
pub(crate) fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

/// Compile a font to an OpenType binary.
///
/// `kerning` is written as a format 0 `kern` table unless
/// [`CompilationOptions::skip_kerning`] is set; pairs naming characters the
/// font has no glyph for are ignored.
pub fn compile(
    font: &Font,
    kerning: &[KerningPair],
    options: &CompilationOptions,
) -> Result<Vec<u8>, GlyphsmithError> {
    let compiled = font
        .glyphs
        .iter()
        .map(compile_glyph)
        .collect::<Result<Vec<_>, _>>()?;
    let num_glyphs = u16::try_from(compiled.len()).map_err(|_| {
        GlyphsmithError::InvalidFontData(format!("{} glyphs is too many", compiled.len()))
    })?;

    let mut glyf_builder = GlyfLocaBuilder::new();
    for (glyph, compiled) in font.glyphs.iter().zip(&compiled) {
        glyf_builder
            .add_glyph(&compiled.glyph)
            .map_err(|e| GlyphsmithError::GlyphConversion {
                glyph: glyph.name.to_string(),
                reason: e.to_string(),
            })?;
    }
    let (glyf, loca, loca_format) = glyf_builder.build();

    let inked: Vec<&CompiledGlyph> = compiled.iter().filter(|g| g.bbox.is_some()).collect();
    let font_bbox = inked
        .iter()
        .filter_map(|g| g.bbox)
        .reduce(Bbox::union)
        .unwrap_or_default();
    let advance_width_max = compiled.iter().map(|g| g.advance).max().unwrap_or(0);
    let min_left_side_bearing = inked.iter().map(|g| g.left_side_bearing()).min();
    let min_right_side_bearing = inked
        .iter()
        .filter_map(|g| g.bbox.map(|b| g.advance as i32 - b.x_max as i32))
        .min();
    let x_max_extent = inked.iter().filter_map(|g| g.bbox.map(|b| b.x_max)).max();

    let ascender = to_font_units(font.metric(MetricType::HheaAscender));
    let descender = to_font_units(font.metric(MetricType::HheaDescender));
    let line_gap = to_font_units(font.metric(MetricType::HheaLineGap));
    let style = StyleMapStyle::from_style_name(&font.style_name);
    let (selection, mac_style) = style_bits(style);

    let names = if options.version == font.version {
        font.names.clone()
    } else {
        Names::new(&font.family_name, &font.style_name, options.version)
    };
    let date = LongDateTime::new(font.date.timestamp() + SECONDS_SINCE_1904);

    let head = Head {
        font_revision: font_revision(options.version),
        flags: Flags::BASELINE_AT_Y_0 | Flags::LSB_AT_X_0,
        units_per_em: font.units_per_em,
        created: date,
        modified: date,
        x_min: font_bbox.x_min,
        y_min: font_bbox.y_min,
        x_max: font_bbox.x_max,
        y_max: font_bbox.y_max,
        mac_style,
        lowest_rec_ppem: 6,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
        ..Default::default()
    };

    let hhea = Hhea {
        ascender: FWord::new(ascender),
        descender: FWord::new(descender),
        line_gap: FWord::new(line_gap),
        advance_width_max: UfWord::new(advance_width_max),
        min_left_side_bearing: FWord::new(min_left_side_bearing.unwrap_or(0)),
        min_right_side_bearing: FWord::new(
            min_right_side_bearing.map_or(0, |v| v.clamp(i16::MIN as i32, i16::MAX as i32) as i16),
        ),
        x_max_extent: FWord::new(x_max_extent.unwrap_or(0)),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: num_glyphs,
    };

    let hmtx = Hmtx {
        h_metrics: compiled
            .iter()
            .map(|g| LongMetric {
                advance: g.advance,
                side_bearing: g.left_side_bearing(),
            })
            .collect(),
        left_side_bearings: vec![],
    };

    let maxp = Maxp {
        num_glyphs,
        max_points: compiled
            .iter()
            .map(|g| g.glyph.contours.iter().map(|c| c.len()).sum::<usize>() as u16)
            .max(),
        max_contours: compiled
            .iter()
            .map(|g| g.glyph.contours.len() as u16)
            .max(),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    };

    let mappings: Vec<(char, GlyphId)> = font
        .glyphs
        .iter()
        .enumerate()
        .filter(|(_, g)| g.unicode != 0)
        .filter_map(|(gid, g)| Some((char::from_u32(g.unicode)?, GlyphId::new(gid as u32))))
        .collect();
    let cmap = Cmap::from_mappings(mappings)?;

    let post = Post {
        underline_position: FWord::new(to_font_units(
            font.metric(MetricType::UnderlinePosition),
        )),
        underline_thickness: FWord::new(to_font_units(
            font.metric(MetricType::UnderlineThickness),
        )),
        ..Default::default()
    }
    .with_glyph_names(font.glyph_names().map(|n| n.as_str()));

    let codepoints: Vec<u32> = font
        .glyphs
        .iter()
        .map(|g| g.unicode)
        .filter(|&u| u != 0)
        .collect();
    let inked_advances: Vec<u16> = compiled
        .iter()
        .map(|g| g.advance)
        .filter(|&a| a > 0)
        .collect();
    let x_avg_char_width = if inked_advances.is_empty() {
        0
    } else {
        to_font_units(
            inked_advances.iter().map(|&a| a as f64).sum::<f64>() / inked_advances.len() as f64,
        )
    };
    let has_kerning = !options.skip_kerning && !kerning.is_empty();
    let os2 = Os2 {
        x_avg_char_width,
        us_weight_class: weight_class(&font.style_name),
        us_width_class: 5,
        y_subscript_x_size: to_font_units(font.metric(MetricType::SubscriptXSize)),
        y_subscript_y_size: to_font_units(font.metric(MetricType::SubscriptYSize)),
        y_subscript_y_offset: to_font_units(font.metric(MetricType::SubscriptYOffset)),
        y_superscript_x_size: to_font_units(font.metric(MetricType::SuperscriptXSize)),
        y_superscript_y_size: to_font_units(font.metric(MetricType::SuperscriptYSize)),
        y_superscript_y_offset: to_font_units(font.metric(MetricType::SuperscriptYOffset)),
        y_strikeout_size: to_font_units(font.metric(MetricType::StrikeoutSize)),
        y_strikeout_position: to_font_units(font.metric(MetricType::StrikeoutPosition)),
        ul_unicode_range_1: unicode_range_1(&codepoints),
        ach_vend_id: Tag::new(VENDOR_ID),
        fs_selection: selection,
        us_first_char_index: codepoints.iter().min().map_or(0, |&c| c.min(0xFFFF) as u16),
        us_last_char_index: codepoints.iter().max().map_or(0, |&c| c.min(0xFFFF) as u16),
        s_typo_ascender: to_font_units(font.metric(MetricType::TypoAscender)),
        s_typo_descender: to_font_units(font.metric(MetricType::TypoDescender)),
        s_typo_line_gap: to_font_units(font.metric(MetricType::TypoLineGap)),
        us_win_ascent: to_unsigned_font_units((ascender as f64).max(font_bbox.y_max as f64)),
        us_win_descent: to_unsigned_font_units(
            (-(descender as f64)).max(-(font_bbox.y_min as f64)),
        ),
        ul_code_page_range_1: Some(1),
        ul_code_page_range_2: Some(0),
        sx_height: Some(to_font_units(font.metric(MetricType::XHeight))),
        s_cap_height: Some(to_font_units(font.metric(MetricType::CapHeight))),
        us_default_char: Some(0),
        us_break_char: Some(0x20),
        us_max_context: Some(if has_kerning { 2 } else { 0 }),
        ..Default::default()
    };

    let mut builder = FontBuilder::new();
    builder
        .add_table(&head)?
        .add_table(&hhea)?
        .add_table(&maxp)?
        .add_table(&os2)?
        .add_table(&hmtx)?
        .add_table(&cmap)?
        .add_table(&loca)?
        .add_table(&glyf)?
        .add_table(&names.to_name_table())?
        .add_table(&post)?;
    if options.skip_kerning {
        log::debug!("Kerning skipped");
    } else if let Some(kern) = kern_table(font, kerning)? {
        builder.add_table(&kern)?;
    }
    let mut bytes = builder.build();
    set_checksum_adjustment(&mut bytes)?;
    log::debug!(
        "Wrote {} glyphs into {} bytes of OpenType",
        num_glyphs,
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assemble, FontData, GlyphData};
    use pretty_assertions::assert_eq;
    use write_fonts::read::TableProvider;

    fn test_font() -> Result<Font, GlyphsmithError> {
        Ok(assemble(&FontData::new(
            "Test",
            vec![
                GlyphData::new("A", 65, 600.0, "M0 0 L300 700 L600 0 Z")?,
                GlyphData::new("V", 86, 600.0, "M0 700 L300 0 L600 700 Z")?,
                GlyphData::new("O", 79, 600.0, "M0 350 C0 -50 600 -50 600 350 Z")?,
            ],
        )))
    }

    #[test]
    fn test_cubics_become_quadratics() {
        let mut cubic = BezPath::new();
        cubic.move_to((0.0, 0.0));
        cubic.curve_to((0.0, 100.0), (100.0, 100.0), (100.0, 0.0));
        cubic.close_path();
        let quadratic = to_quadratic(&cubic);
        assert!(quadratic
            .elements()
            .iter()
            .all(|el| !matches!(el, PathEl::CurveTo(..))));
        assert!(matches!(quadratic.elements().last(), Some(PathEl::ClosePath)));
        let end = quadratic.elements().iter().rev().nth(1).and_then(|el| el.end_point());
        assert_eq!(end, Some(Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_compiled_tables() -> Result<(), GlyphsmithError> {
        let font = test_font()?;
        let bytes = compile(&font, &[], &CompilationOptions::default())?;
        let binary = FontRef::new(&bytes)?;
        assert_eq!(binary.maxp()?.num_glyphs(), 5);
        assert_eq!(binary.head()?.units_per_em(), 1000);
        assert_eq!(binary.hhea()?.ascender().to_i16(), 800);
        assert_eq!(binary.hhea()?.descender().to_i16(), -200);
        assert_eq!(binary.hhea()?.number_of_h_metrics(), 5);
        let os2 = binary.os2()?;
        assert_eq!(os2.us_weight_class(), 400);
        assert_eq!(os2.sx_height(), Some(500));
        assert_eq!(os2.s_cap_height(), Some(700));
        assert_eq!(os2.us_first_char_index(), 0x20);
        assert_eq!(os2.us_last_char_index(), 86);
        assert_eq!(binary.cmap()?.map_codepoint('V'), Some(GlyphId::new(3)));
        assert!(binary.table_data(Tag::new(b"kern")).is_none());
        Ok(())
    }

    #[test]
    fn test_checksum_adjustment() -> Result<(), GlyphsmithError> {
        let bytes = compile(&test_font()?, &[], &CompilationOptions::default())?;
        assert_eq!(checksum(&bytes), CHECKSUM_MAGIC);
        Ok(())
    }

    #[test]
    fn test_kern_table() -> Result<(), GlyphsmithError> {
        let font = test_font()?;
        let pairs = [
            KerningPair::new('V', 'A', -80),
            KerningPair::new('A', 'V', -80),
            KerningPair::new('A', 'Z', -10),
        ];
        let bytes = compile(&font, &pairs, &CompilationOptions::default())?;
        let binary = FontRef::new(&bytes)?;
        assert_eq!(binary.os2()?.us_max_context(), Some(2));
        let kern = binary
            .table_data(Tag::new(b"kern"))
            .ok_or_else(|| GlyphsmithError::MissingTable("kern".to_string()))?;
        let kern: &[u8] = kern.as_ref();
        // Table header, subtable header, then two six-byte pairs: the pair
        // naming a missing glyph is dropped and the rest sorted
        assert_eq!(kern.len(), 4 + 14 + 2 * 6);
        let words: Vec<u16> = kern[18..]
            .chunks(2)
            .map(|w| u16::from_be_bytes([w[0], w[1]]))
            .collect();
        assert_eq!(words, vec![2, 3, (-80i16) as u16, 3, 2, (-80i16) as u16]);

        let skipped = compile(
            &font,
            &pairs,
            &CompilationOptions {
                skip_kerning: true,
                ..Default::default()
            },
        )?;
        assert!(FontRef::new(&skipped)?
            .table_data(Tag::new(b"kern"))
            .is_none());
        Ok(())
    }

    #[test]
    fn test_too_many_kerning_pairs() -> Result<(), GlyphsmithError> {
        // 105 glyphs make 11025 pairs, more than a subtable can index
        let chars: Vec<char> = ('\u{100}'..='\u{168}').collect();
        let glyphs = chars
            .iter()
            .map(|&c| GlyphData::new(c.to_string(), c as u32, 500.0, "M0 0 L100 0 L100 100 Z"))
            .collect::<Result<Vec<_>, _>>()?;
        let font = assemble(&FontData::new("Crowded", glyphs));
        let pairs: Vec<KerningPair> = chars
            .iter()
            .flat_map(|&l| chars.iter().map(move |&r| KerningPair::new(l, r, -5)))
            .collect();
        assert!(matches!(
            compile(&font, &pairs, &CompilationOptions::default()),
            Err(GlyphsmithError::InvalidFontData(_))
        ));
        // The same font still compiles when kerning is skipped
        let options = CompilationOptions {
            skip_kerning: true,
            ..Default::default()
        };
        assert!(compile(&font, &pairs, &options).is_ok());
        Ok(())
    }

    #[test]
    fn test_metrics_for_empty_glyph() -> Result<(), GlyphsmithError> {
        let font = test_font()?;
        let bytes = compile(&font, &[], &CompilationOptions::default())?;
        let binary = FontRef::new(&bytes)?;
        let hmtx = binary.hmtx()?;
        // space is synthesized at index 1 with no outline
        assert_eq!(hmtx.advance(GlyphId::new(1)), Some(250));
        assert_eq!(hmtx.side_bearing(GlyphId::new(1)), Some(0));
        Ok(())
    }

    #[test]
    fn test_style_bits() {
        let (selection, mac_style) = style_bits(Some(StyleMapStyle::BoldItalic));
        assert!(selection.contains(SelectionFlags::BOLD | SelectionFlags::ITALIC));
        assert!(!selection.contains(SelectionFlags::REGULAR));
        assert_eq!(mac_style, MacStyle::BOLD | MacStyle::ITALIC);
        let (selection, mac_style) = style_bits(None);
        assert!(selection.contains(SelectionFlags::REGULAR));
        assert_eq!(mac_style, MacStyle::empty());
    }
}
