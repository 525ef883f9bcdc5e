//! Helpers for handing compiled fonts to browsers and inscription payloads.
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
#[cfg(feature = "types")]
use typeshare::typeshare;

/// Bytes per base64 chunk; a multiple of three so no chunk but the last
/// carries padding
const CHUNK_SIZE: usize = 0x6000;

/// A binary font format the compiler produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "types", typeshare)]
#[serde(rename_all = "lowercase")]
pub enum FontFormat {
    Otf,
    Woff2,
}

impl FontFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            FontFormat::Otf => "font/otf",
            FontFormat::Woff2 => "font/woff2",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FontFormat::Otf => "otf",
            FontFormat::Woff2 => "woff2",
        }
    }

    /// The format a file extension names; `ttf` is accepted for sfnt output
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "otf" | "ttf" => Some(FontFormat::Otf),
            "woff2" => Some(FontFormat::Woff2),
            _ => None,
        }
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FontFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontFormat::from_extension(s).ok_or_else(|| format!("unknown font format {s:?}"))
    }
}

/// Font bytes tagged with their media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn to_blob(bytes: &[u8], format: FontFormat) -> Blob {
    Blob {
        mime_type: format.mime_type(),
        bytes: bytes.to_vec(),
    }
}

/// Standard base64 with padding, encoded a chunk at a time into one buffer.
pub fn to_base64(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(CHUNK_SIZE) {
        STANDARD.encode_string(chunk, &mut encoded);
    }
    encoded
}

/// A `data:` URL suitable for a CSS `@font-face` source
pub fn to_data_url(bytes: &[u8], format: FontFormat) -> String {
    format!("data:{};base64,{}", format.mime_type(), to_base64(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(FontFormat::Otf, "font/otf", "otf")]
    #[case(FontFormat::Woff2, "font/woff2", "woff2")]
    fn test_format_names(
        #[case] format: FontFormat,
        #[case] mime_type: &str,
        #[case] extension: &str,
    ) {
        assert_eq!(format.mime_type(), mime_type);
        assert_eq!(format.extension(), extension);
        assert_eq!(extension.parse::<FontFormat>(), Ok(format));
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(FontFormat::from_extension("TTF"), Some(FontFormat::Otf));
        assert_eq!(FontFormat::from_extension("woff"), None);
        assert!("svg".parse::<FontFormat>().is_err());
    }

    #[test]
    fn test_small_base64() {
        assert_eq!(to_base64(b""), "");
        assert_eq!(to_base64(b"f"), "Zg==");
        assert_eq!(to_base64(b"foobar"), "Zm9vYmFy");
        assert_eq!(to_base64(&[0xFF, 0xFE, 0x00]), "//4A");
    }

    #[test]
    fn test_chunked_base64_matches_one_shot() {
        for len in [CHUNK_SIZE - 1, CHUNK_SIZE, CHUNK_SIZE + 1, 3 * CHUNK_SIZE + 2] {
            let bytes: Vec<u8> = (0..len).map(|i| (i * 7 % 256) as u8).collect();
            assert_eq!(to_base64(&bytes), STANDARD.encode(&bytes), "length {len}");
        }
    }

    #[test]
    fn test_blob_and_data_url() {
        let blob = to_blob(b"wOF2", FontFormat::Woff2);
        assert_eq!(blob.mime_type, "font/woff2");
        assert_eq!(blob.bytes, b"wOF2");
        assert_eq!(
            to_data_url(b"\x00\x01\x00\x00", FontFormat::Otf),
            "data:font/otf;base64,AAEAAA=="
        );
    }
}
