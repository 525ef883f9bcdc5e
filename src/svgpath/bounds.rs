use super::{
    outline::{absolute_segments, Segment},
    parser::parse,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in SVG space.
///
/// Control points count towards the box, so it can be larger than the ink
/// of the curve itself. That makes it a safe, cheap upper bound for spacing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// The box around a set of points; all zeros when there are none.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        let rect = points
            .into_iter()
            .filter(|p| p.is_finite())
            .fold(None::<kurbo::Rect>, |rect, p| match rect {
                Some(r) => Some(r.union_pt(p)),
                None => Some(kurbo::Rect::from_points(p, p)),
            });
        match rect {
            Some(r) => Bounds {
                min_x: r.x0,
                min_y: r.y0,
                max_x: r.x1,
                max_y: r.y1,
                width: r.width(),
                height: r.height(),
            },
            None => Bounds::default(),
        }
    }
}

/// Compute the bounds of SVG path data, without flipping it into font space.
pub fn bounds(d: &str) -> Bounds {
    Bounds::from_points(
        absolute_segments(&parse(d))
            .iter()
            .flat_map(Segment::points),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_rectangle() {
        let b = bounds("M10 20 L110 20 L110 220 L10 220 Z");
        assert_eq!(
            b,
            Bounds {
                min_x: 10.0,
                min_y: 20.0,
                max_x: 110.0,
                max_y: 220.0,
                width: 100.0,
                height: 200.0,
            }
        );
    }

    #[rstest]
    #[case(&[(0.0, 0.0)])]
    #[case(&[(10.0, 20.0), (-5.0, 40.0)])]
    #[case(&[(300.0, 700.0), (0.0, 0.0), (600.0, 0.0), (150.5, 350.25)])]
    #[case(&[(-100.0, -100.0), (-50.0, -300.0), (-75.0, -200.0)])]
    fn test_line_path_bounds(#[case] points: &[(f64, f64)]) {
        let d = points
            .iter()
            .enumerate()
            .map(|(ix, (x, y))| format!("{} {x} {y}", if ix == 0 { "M" } else { "L" }))
            .collect::<Vec<_>>()
            .join(" ");
        let b = bounds(&d);
        let xs = points.iter().map(|p| p.0);
        let ys = points.iter().map(|p| p.1);
        let min_x = xs.clone().fold(f64::INFINITY, f64::min);
        let max_x = xs.fold(f64::NEG_INFINITY, f64::max);
        let min_y = ys.clone().fold(f64::INFINITY, f64::min);
        let max_y = ys.fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(
            b,
            Bounds {
                min_x,
                min_y,
                max_x,
                max_y,
                width: max_x - min_x,
                height: max_y - min_y,
            }
        );
    }

    #[test]
    fn test_control_points_count() {
        let b = bounds("M0 0 C0 -50 100 -50 100 0");
        assert_eq!(b.min_y, -50.0);
        assert_eq!(b.height, 50.0);
    }

    #[test]
    fn test_relative_and_shorthand() {
        let b = bounds("m5 5 h10 v20 h-10 z");
        assert_eq!((b.min_x, b.max_x, b.min_y, b.max_y), (5.0, 15.0, 5.0, 25.0));
    }

    #[test]
    fn test_empty_path_has_zero_bounds() {
        assert_eq!(bounds(""), Bounds::default());
        assert_eq!(bounds("garbage"), Bounds::default());
    }

    #[test]
    fn test_non_finite_points_are_skipped() {
        let b = bounds("M0 0 L1e400 0 L10 10");
        assert_eq!(b.width, 10.0);
        assert!(b.width >= 0.0 && b.height >= 0.0);
    }
}
