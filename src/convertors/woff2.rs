//! Wraps an sfnt binary in a WOFF 2.0 container.
//!
//! Every table is stored untransformed, so decoders hand back the exact
//! bytes that went in. The concatenated table data is Brotli-compressed as
//! one stream.
use crate::GlyphsmithError;
use brotlic::CompressorWriter;
use std::io::Write as _;
use write_fonts::{read::FontRef, types::Tag};

const SIGNATURE: &[u8; 4] = b"wOF2";
const HEADER_SIZE: usize = 48;
/// Flag value saying an explicit tag follows the flags byte
const CUSTOM_TAG: u8 = 63;
/// Transform version 3 is the null transform for `glyf` and `loca`
const NULL_GLYF_TRANSFORM: u8 = 3;

/// Tags with a one-byte short form in the table directory, by index
pub const KNOWN_TAGS: [&[u8; 4]; 63] = [
    b"cmap", b"head", b"hhea", b"hmtx", b"maxp", b"name", b"OS/2", b"post", b"cvt ", b"fpgm",
    b"glyf", b"loca", b"prep", b"CFF ", b"VORG", b"EBDT", b"EBLC", b"gasp", b"hdmx", b"kern",
    b"LTSH", b"PCLT", b"VDMX", b"vhea", b"vmtx", b"BASE", b"GDEF", b"GPOS", b"GSUB", b"EBSC",
    b"JSTF", b"MATH", b"CBDT", b"CBLC", b"COLR", b"CPAL", b"SVG ", b"sbix", b"acnt", b"avar",
    b"bdat", b"bloc", b"bsln", b"cvar", b"fdsc", b"feat", b"fmtx", b"fvar", b"gvar", b"hsty",
    b"just", b"lcar", b"mort", b"morx", b"opbd", b"prop", b"trak", b"Zapf", b"Silf", b"Glat",
    b"Gloc", b"Feat", b"Sill",
];

fn round4(n: usize) -> usize {
    (n + 3) & !3
}

/// Variable-length big-endian base-128 encoding, as used for table lengths
pub(crate) fn uint_base128(mut value: u32) -> Vec<u8> {
    let mut bytes = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    bytes.reverse();
    bytes
}

fn directory_entry(tag: Tag, length: u32) -> Vec<u8> {
    let raw = tag.to_be_bytes();
    let known = KNOWN_TAGS.iter().position(|&t| *t == raw);
    let transform = if raw == *b"glyf" || raw == *b"loca" {
        NULL_GLYF_TRANSFORM << 6
    } else {
        0
    };
    let mut entry = vec![known.map_or(CUSTOM_TAG, |ix| ix as u8) | transform];
    if known.is_none() {
        entry.extend_from_slice(&raw);
    }
    entry.extend(uint_base128(length));
    entry
}

fn brotli(data: &[u8]) -> Result<Vec<u8>, GlyphsmithError> {
    let mut compressor = CompressorWriter::new(Vec::new());
    compressor
        .write_all(data)
        .map_err(|e| GlyphsmithError::Compression(e.to_string()))?;
    compressor
        .into_inner()
        .map_err(|e| GlyphsmithError::Compression(e.to_string()))
}

/// Compress an sfnt binary to WOFF2
pub fn compress(sfnt: &[u8]) -> Result<Vec<u8>, GlyphsmithError> {
    let font = FontRef::new(sfnt)?;
    let flavor = font.table_directory.sfnt_version();
    let records = font.table_directory.table_records();

    let mut directory = vec![];
    let mut stream = vec![];
    let mut total_sfnt_size = 12 + 16 * records.len();
    for record in records {
        let tag = record.tag();
        let start = record.offset() as usize;
        let data = sfnt
            .get(start..start + record.length() as usize)
            .ok_or_else(|| GlyphsmithError::MissingTable(tag.to_string()))?;
        directory.extend(directory_entry(tag, record.length()));
        stream.extend_from_slice(data);
        total_sfnt_size += round4(data.len());
    }
    let compressed = brotli(&stream)?;
    log::debug!(
        "Brotli: {} bytes of table data down to {}",
        stream.len(),
        compressed.len()
    );

    let length = round4(HEADER_SIZE + directory.len() + compressed.len());
    let mut woff = Vec::with_capacity(length);
    woff.extend_from_slice(SIGNATURE);
    woff.extend(flavor.to_be_bytes());
    woff.extend((length as u32).to_be_bytes());
    woff.extend((records.len() as u16).to_be_bytes());
    woff.extend(0u16.to_be_bytes()); // reserved
    woff.extend((total_sfnt_size as u32).to_be_bytes());
    woff.extend((compressed.len() as u32).to_be_bytes());
    woff.extend(1u16.to_be_bytes()); // majorVersion
    woff.extend(0u16.to_be_bytes()); // minorVersion
    // No metadata or private blocks: offsets and lengths all zero
    woff.extend([0u8; 20]);
    woff.extend(directory);
    woff.extend(compressed);
    woff.resize(length, 0);
    Ok(woff)
}
