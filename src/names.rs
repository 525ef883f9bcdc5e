use serde::{Deserialize, Serialize};
use write_fonts::{
    tables::name::{Name, NameRecord},
    types::NameId,
};

/// Windows platform, Unicode BMP encoding, US English
const WINDOWS_PLATFORM: (u16, u16, u16) = (3, 1, 0x409);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleMapStyle {
    BoldItalic,
    Bold,
    Regular,
    Italic,
}

impl StyleMapStyle {
    /// The style-linking group a style name belongs to, if it is one of the
    /// four basic styles
    pub fn from_style_name(style: &str) -> Option<Self> {
        match style.to_ascii_lowercase().replace(['-', ' '], "").as_str() {
            "regular" | "normal" | "" => Some(StyleMapStyle::Regular),
            "bold" => Some(StyleMapStyle::Bold),
            "italic" | "oblique" => Some(StyleMapStyle::Italic),
            "bolditalic" | "boldoblique" => Some(StyleMapStyle::BoldItalic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleMapStyle::BoldItalic => "Bold Italic",
            StyleMapStyle::Bold => "Bold",
            StyleMapStyle::Regular => "Regular",
            StyleMapStyle::Italic => "Italic",
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(self, StyleMapStyle::Bold | StyleMapStyle::BoldItalic)
    }

    pub fn is_italic(&self) -> bool {
        matches!(self, StyleMapStyle::Italic | StyleMapStyle::BoldItalic)
    }
}

/// The usWeightClass suggested by a style name
pub fn weight_class(style: &str) -> u16 {
    let style = style.to_ascii_lowercase().replace(['-', ' '], "");
    [
        ("extralight", 200),
        ("ultralight", 200),
        ("semibold", 600),
        ("demibold", 600),
        ("extrabold", 800),
        ("ultrabold", 800),
        ("thin", 100),
        ("light", 300),
        ("medium", 500),
        ("bold", 700),
        ("black", 900),
        ("heavy", 900),
    ]
    .iter()
    .find(|(word, _)| style.contains(word))
    .map_or(400, |(_, weight)| *weight)
}

/// A PostScript-safe version of a name: printable ASCII without spaces or
/// the characters PostScript reserves, at most 63 characters long.
pub fn postscript_name(family: &str, style: &str) -> String {
    let sanitize = |s: &str| -> String {
        s.chars()
            .filter(|c| c.is_ascii_graphic() && !"[](){}<>/%".contains(*c))
            .collect()
    };
    let family = sanitize(family);
    let style = sanitize(style);
    let mut name = if style.is_empty() {
        family
    } else {
        format!("{family}-{style}")
    };
    name.truncate(63);
    name
}

/// The strings which go into the `name` table
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Names {
    pub family_name: String,
    pub subfamily_name: String,
    pub unique_id: String,
    pub full_name: String,
    pub version: String,
    pub postscript_name: String,
    pub typographic_family: Option<String>,
    pub typographic_subfamily: Option<String>,
}

impl Names {
    /// Derive the naming for a family and style.
    ///
    /// Styles outside the four style-linked ones are folded into the legacy
    /// family name, and the typographic family and subfamily names keep the
    /// family and style apart.
    pub fn new(family: &str, style: &str, version: (u16, u16)) -> Self {
        let family = family.trim();
        let style = match style.trim() {
            "" => "Regular",
            s => s,
        };
        let version_string = format!("Version {}.{:03}", version.0, version.1);
        let postscript_name = postscript_name(family, style);
        let (family_name, subfamily_name, typographic) = match StyleMapStyle::from_style_name(style)
        {
            Some(linked) => (family.to_string(), linked.as_str().to_string(), None),
            None => (
                format!("{family} {style}"),
                StyleMapStyle::Regular.as_str().to_string(),
                Some((family.to_string(), style.to_string())),
            ),
        };
        Names {
            full_name: format!("{family} {style}"),
            unique_id: format!("{}.{:03};NONE;{}", version.0, version.1, postscript_name),
            version: version_string,
            postscript_name,
            family_name,
            subfamily_name,
            typographic_family: typographic.as_ref().map(|(f, _)| f.clone()),
            typographic_subfamily: typographic.map(|(_, s)| s),
        }
    }

    pub fn get(&self, stringid: NameId) -> Option<&str> {
        match stringid {
            NameId::FAMILY_NAME => Some(&self.family_name),
            NameId::SUBFAMILY_NAME => Some(&self.subfamily_name),
            NameId::UNIQUE_ID => Some(&self.unique_id),
            NameId::FULL_NAME => Some(&self.full_name),
            NameId::VERSION_STRING => Some(&self.version),
            NameId::POSTSCRIPT_NAME => Some(&self.postscript_name),
            NameId::TYPOGRAPHIC_FAMILY_NAME => self.typographic_family.as_deref(),
            NameId::TYPOGRAPHIC_SUBFAMILY_NAME => self.typographic_subfamily.as_deref(),
            _ => None,
        }
    }

    /// Build a `name` table with Windows English records, sorted by name ID
    pub fn to_name_table(&self) -> Name {
        let (platform_id, encoding_id, language_id) = WINDOWS_PLATFORM;
        let records = [
            NameId::FAMILY_NAME,
            NameId::SUBFAMILY_NAME,
            NameId::UNIQUE_ID,
            NameId::FULL_NAME,
            NameId::VERSION_STRING,
            NameId::POSTSCRIPT_NAME,
            NameId::TYPOGRAPHIC_FAMILY_NAME,
            NameId::TYPOGRAPHIC_SUBFAMILY_NAME,
        ]
        .into_iter()
        .filter_map(|id| {
            self.get(id).filter(|s| !s.is_empty()).map(|value| {
                NameRecord::new(
                    platform_id,
                    encoding_id,
                    language_id,
                    id,
                    value.to_string().into(),
                )
            })
        })
        .collect();
        Name::new(records)
    }
}
