/// OpenType (sfnt) writer
pub mod otf;
/// WOFF 2.0 container
pub mod woff2;
