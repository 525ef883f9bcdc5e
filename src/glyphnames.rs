use smol_str::{format_smolstr, SmolStr};

/// Production names for printable ASCII punctuation and symbols
const ASCII_NAMES: [(char, &str); 33] = [
    (' ', "space"),
    ('!', "exclam"),
    ('"', "quotedbl"),
    ('#', "numbersign"),
    ('$', "dollar"),
    ('%', "percent"),
    ('&', "ampersand"),
    ('\'', "quotesingle"),
    ('(', "parenleft"),
    (')', "parenright"),
    ('*', "asterisk"),
    ('+', "plus"),
    (',', "comma"),
    ('-', "hyphen"),
    ('.', "period"),
    ('/', "slash"),
    (':', "colon"),
    (';', "semicolon"),
    ('<', "less"),
    ('=', "equal"),
    ('>', "greater"),
    ('?', "question"),
    ('@', "at"),
    ('[', "bracketleft"),
    ('\\', "backslash"),
    (']', "bracketright"),
    ('^', "asciicircum"),
    ('_', "underscore"),
    ('`', "grave"),
    ('{', "braceleft"),
    ('|', "bar"),
    ('}', "braceright"),
    ('~', "asciitilde"),
];

const DIGIT_NAMES: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// The PostScript glyph name for a codepoint.
///
/// ASCII letters are named after themselves, digits and punctuation get
/// their conventional names and everything else is `uniXXXX` (or
/// `uXXXXX` outside the BMP). Distinct codepoints always produce distinct
/// names.
pub fn glyph_name(codepoint: u32) -> SmolStr {
    if let Some(c) = char::from_u32(codepoint) {
        if c.is_ascii_alphabetic() {
            return SmolStr::new(c.to_string());
        }
        if let Some(digit) = c.to_digit(10) {
            return SmolStr::new_static(DIGIT_NAMES[digit as usize]);
        }
        if let Some((_, name)) = ASCII_NAMES.iter().find(|(ch, _)| *ch == c) {
            return SmolStr::new_static(*name);
        }
    }
    if codepoint > 0xFFFF {
        format_smolstr!("u{:05X}", codepoint)
    } else {
        format_smolstr!("uni{:04X}", codepoint)
    }
}
