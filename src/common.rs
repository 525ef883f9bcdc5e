mod node;
pub use node::{Node, NodeType};

/// Round half away from zero and clamp into the `i16` coordinate space
/// that glyf and the metrics tables store.
pub(crate) fn to_font_units(value: f64) -> i16 {
    value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// As [`to_font_units`], for unsigned quantities such as advance widths.
pub(crate) fn to_unsigned_font_units(value: f64) -> u16 {
    value.round().clamp(0.0, u16::MAX as f64) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_font_unit_rounding() {
        assert_eq!(to_font_units(10.5), 11);
        assert_eq!(to_font_units(-10.5), -11);
        assert_eq!(to_font_units(1e9), i16::MAX);
        assert_eq!(to_unsigned_font_units(-3.0), 0);
        assert_eq!(to_unsigned_font_units(499.6), 500);
    }
}
