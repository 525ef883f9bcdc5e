use super::parser::{parse, CommandKind, PathCommand};
use crate::shape::{Outline, OutlinePen, PathBuilder};
use kurbo::{Point, Vec2};

/// A drawing operation with every coordinate resolved to absolute SVG space
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Segment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CurveTo(Point, Point, Point),
    Close,
}

impl Segment {
    /// On-curve and control points touched by this segment
    pub(crate) fn points(&self) -> Vec<Point> {
        match *self {
            Segment::MoveTo(p) | Segment::LineTo(p) => vec![p],
            Segment::QuadTo(c, p) => vec![c, p],
            Segment::CurveTo(c1, c2, p) => vec![c1, c2, p],
            Segment::Close => vec![],
        }
    }
}

fn reflect(control: Option<Point>, about: Point) -> Point {
    control.map_or(about, |c| about + (about - c))
}

/// Resolve relative coordinates, repeated argument groups and the smooth
/// curve shorthands into plain absolute segments.
///
/// Trailing values that do not fill a whole argument group are dropped.
/// Elliptical arcs are approximated by a straight line to their endpoint.
pub(crate) fn absolute_segments(commands: &[PathCommand]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = Point::ZERO;
    let mut start = Point::ZERO;
    let mut last_control: Option<Point> = None;
    let mut previous: Option<CommandKind> = None;

    for command in commands {
        let kind = command.kind;
        let groups: Vec<&[f64]> = if kind == CommandKind::Close {
            vec![]
        } else {
            command.values.chunks_exact(kind.arity()).collect()
        };
        let emits = kind == CommandKind::Close || !groups.is_empty();
        for (ix, v) in groups.into_iter().enumerate() {
            let offset = if command.relative {
                current.to_vec2()
            } else {
                Vec2::ZERO
            };
            let at = |x: f64, y: f64| Point::new(x, y) + offset;
            match kind {
                CommandKind::MoveTo => {
                    let p = at(v[0], v[1]);
                    // Extra coordinate pairs after a move are implicit lines
                    if ix == 0 {
                        segments.push(Segment::MoveTo(p));
                        start = p;
                    } else {
                        segments.push(Segment::LineTo(p));
                    }
                    current = p;
                }
                CommandKind::LineTo => {
                    current = at(v[0], v[1]);
                    segments.push(Segment::LineTo(current));
                }
                CommandKind::HorizontalTo => {
                    current = Point::new(v[0] + offset.x, current.y);
                    segments.push(Segment::LineTo(current));
                }
                CommandKind::VerticalTo => {
                    current = Point::new(current.x, v[0] + offset.y);
                    segments.push(Segment::LineTo(current));
                }
                CommandKind::CurveTo => {
                    let c2 = at(v[2], v[3]);
                    current = at(v[4], v[5]);
                    segments.push(Segment::CurveTo(at(v[0], v[1]), c2, current));
                    last_control = Some(c2);
                }
                CommandKind::SmoothCurveTo => {
                    let follows_curve = ix > 0
                        || matches!(
                            previous,
                            Some(CommandKind::CurveTo | CommandKind::SmoothCurveTo)
                        );
                    let c1 = if follows_curve {
                        reflect(last_control, current)
                    } else {
                        current
                    };
                    let c2 = at(v[0], v[1]);
                    current = at(v[2], v[3]);
                    segments.push(Segment::CurveTo(c1, c2, current));
                    last_control = Some(c2);
                }
                CommandKind::QuadTo => {
                    let c = at(v[0], v[1]);
                    current = at(v[2], v[3]);
                    segments.push(Segment::QuadTo(c, current));
                    last_control = Some(c);
                }
                CommandKind::SmoothQuadTo => {
                    let follows_quad = ix > 0
                        || matches!(
                            previous,
                            Some(CommandKind::QuadTo | CommandKind::SmoothQuadTo)
                        );
                    let c = if follows_quad {
                        reflect(last_control, current)
                    } else {
                        current
                    };
                    current = at(v[0], v[1]);
                    segments.push(Segment::QuadTo(c, current));
                    last_control = Some(c);
                }
                CommandKind::Arc => {
                    current = at(v[5], v[6]);
                    segments.push(Segment::LineTo(current));
                }
                CommandKind::Close => {}
            }
        }
        if kind == CommandKind::Close {
            segments.push(Segment::Close);
            current = start;
        }
        // A command with no complete argument group draws nothing, so the
        // next smooth segment must not reflect across it
        previous = emits.then_some(kind);
    }
    segments
}

/// Convert an SVG y coordinate (measured down from the top of the em box)
/// into a font y coordinate (measured up from the baseline).
pub fn flip_y(y: f64, ascender: f64) -> f64 {
    ascender - y
}

/// Draw SVG path data onto a pen, flipping it into font space.
///
/// A drawing command which follows a close, or which opens the path data
/// without a move, begins a new contour at the current point.
pub fn draw_svg_path(d: &str, ascender: f64, pen: &mut impl OutlinePen) {
    let flip = |p: Point| (p.x, flip_y(p.y, ascender));
    let mut open = false;
    let mut current = Point::ZERO;
    let mut start = Point::ZERO;
    for segment in absolute_segments(&parse(d)) {
        if !open && !matches!(segment, Segment::MoveTo(_) | Segment::Close) {
            let (x, y) = flip(current);
            pen.move_to(x, y);
            open = true;
        }
        match segment {
            Segment::MoveTo(p) => {
                let (x, y) = flip(p);
                pen.move_to(x, y);
                open = true;
                current = p;
                start = p;
            }
            Segment::LineTo(p) => {
                let (x, y) = flip(p);
                pen.line_to(x, y);
                current = p;
            }
            Segment::QuadTo(c, p) => {
                let (cx, cy) = flip(c);
                let (x, y) = flip(p);
                pen.quad_to(cx, cy, x, y);
                current = p;
            }
            Segment::CurveTo(c1, c2, p) => {
                let (cx0, cy0) = flip(c1);
                let (cx1, cy1) = flip(c2);
                let (x, y) = flip(p);
                pen.curve_to(cx0, cy0, cx1, cy1, x, y);
                current = p;
            }
            Segment::Close => {
                if open {
                    pen.close();
                    open = false;
                }
                current = start;
            }
        }
    }
}

/// Convert SVG path data into a glyph outline in font units.
pub fn to_outline(d: &str, ascender: f64) -> Outline {
    let mut pen = PathBuilder::new();
    draw_svg_path(d, ascender, &mut pen);
    Outline::from(pen.build())
}
