use serde::{Deserialize, Serialize};
#[cfg(feature = "types")]
use typeshare::typeshare;

pub const DEFAULT_UNITS_PER_EM: u16 = 1000;
pub const DEFAULT_ASCENDER: f64 = 800.0;
pub const DEFAULT_DESCENDER: f64 = -200.0;
pub const DEFAULT_CAP_HEIGHT: f64 = 700.0;
pub const DEFAULT_X_HEIGHT: f64 = 500.0;
pub const DEFAULT_STYLE: &str = "Regular";

/// The range of em sizes OpenType allows in `head.unitsPerEm`
pub const UNITS_PER_EM_RANGE: std::ops::RangeInclusive<u16> = 16..=16384;

pub(crate) fn default_units_per_em() -> u16 {
    DEFAULT_UNITS_PER_EM
}
pub(crate) fn default_ascender() -> f64 {
    DEFAULT_ASCENDER
}
pub(crate) fn default_descender() -> f64 {
    DEFAULT_DESCENDER
}
pub(crate) fn default_cap_height() -> f64 {
    DEFAULT_CAP_HEIGHT
}
pub(crate) fn default_x_height() -> f64 {
    DEFAULT_X_HEIGHT
}
pub(crate) fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

/// Type of font metric
#[derive(Debug, Clone, Copy, PartialEq, Hash, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "types", typeshare)]
pub enum MetricType {
    /// X height
    XHeight,
    /// Cap height
    CapHeight,
    /// Design ascender, the top of the SVG em box
    Ascender,
    /// Design descender (negative)
    Descender,
    /// Ascender (to be placed in the `hhea` table)
    HheaAscender,
    /// Descender (to be placed in the `hhea` table)
    HheaDescender,
    /// Line gap (to be placed in the `hhea` table)
    HheaLineGap,
    /// Typographic Ascender (to be placed in the `OS/2` table)
    TypoAscender,
    /// Typographic Descender (to be placed in the `OS/2` table)
    TypoDescender,
    /// Typographic Line Gap (to be placed in the `OS/2` table)
    TypoLineGap,
    /// Subscript horizontal font size
    SubscriptXSize,
    /// Subscript vertical font size
    SubscriptYSize,
    /// Subscript vertical offset
    SubscriptYOffset,
    /// Superscript horizontal font size
    SuperscriptXSize,
    /// Superscript vertical font size
    SuperscriptYSize,
    /// Superscript vertical offset
    SuperscriptYOffset,
    /// Strikeout size
    StrikeoutSize,
    /// Strikeout position
    StrikeoutPosition,
    /// Underline position
    UnderlinePosition,
    /// Underline thickness
    UnderlineThickness,
}

impl MetricType {
    /// Get the name of the MetricType
    pub fn as_str(&self) -> &str {
        match self {
            MetricType::XHeight => "xHeight",
            MetricType::CapHeight => "capHeight",
            MetricType::Ascender => "ascender",
            MetricType::Descender => "descender",
            MetricType::HheaAscender => "hheaAscender",
            MetricType::HheaDescender => "hheaDescender",
            MetricType::HheaLineGap => "hheaLineGap",
            MetricType::TypoAscender => "typoAscender",
            MetricType::TypoDescender => "typoDescender",
            MetricType::TypoLineGap => "typoLineGap",
            MetricType::SubscriptXSize => "subscriptXSize",
            MetricType::SubscriptYSize => "subscriptYSize",
            MetricType::SubscriptYOffset => "subscriptYOffset",
            MetricType::SuperscriptXSize => "superscriptXSize",
            MetricType::SuperscriptYSize => "superscriptYSize",
            MetricType::SuperscriptYOffset => "superscriptYOffset",
            MetricType::StrikeoutSize => "strikeoutSize",
            MetricType::StrikeoutPosition => "strikeoutPosition",
            MetricType::UnderlinePosition => "underlinePosition",
            MetricType::UnderlineThickness => "underlineThickness",
        }
    }
}

impl crate::Font {
    /// Look up a metric, deriving the ones the source does not specify.
    ///
    /// Line metrics follow the design ascender and descender with no line
    /// gap; the rest are the usual fractions of the em.
    pub fn metric(&self, metric: MetricType) -> f64 {
        let upm = self.units_per_em as f64;
        match metric {
            MetricType::XHeight => self.x_height,
            MetricType::CapHeight => self.cap_height,
            MetricType::Ascender | MetricType::HheaAscender | MetricType::TypoAscender => {
                self.ascender
            }
            MetricType::Descender | MetricType::HheaDescender | MetricType::TypoDescender => {
                self.descender
            }
            MetricType::HheaLineGap | MetricType::TypoLineGap => 0.0,
            MetricType::SubscriptXSize | MetricType::SuperscriptXSize => upm * 0.65,
            MetricType::SubscriptYSize | MetricType::SuperscriptYSize => upm * 0.6,
            MetricType::SubscriptYOffset => upm * 0.075,
            MetricType::SuperscriptYOffset => upm * 0.35,
            MetricType::StrikeoutSize | MetricType::UnderlineThickness => upm * 0.05,
            MetricType::StrikeoutPosition => self.x_height * 0.22,
            MetricType::UnderlinePosition => upm * -0.075,
        }
    }
}
