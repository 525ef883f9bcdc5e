//! SVG path data: parsing, conversion into glyph outlines and bounding boxes.
//!
//! Path strings arrive in SVG user space, with y growing downwards from the
//! top of the em box. Outlines are emitted in font space, where y grows
//! upwards from the baseline; see [`flip_y`].
mod bounds;
mod outline;
mod parser;

pub use bounds::{bounds, Bounds};
pub use outline::{draw_svg_path, flip_y, to_outline};
pub use parser::{parse, CommandKind, PathCommand};
