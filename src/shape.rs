use crate::{
    common::{Node, NodeType},
    GlyphsmithError,
};
use serde::{Deserialize, Serialize};
#[cfg(feature = "types")]
use typeshare::typeshare;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "types", typeshare)]
/// A contour in a glyph
pub struct Path {
    /// A list of nodes in the path
    pub nodes: Vec<Node>,
    /// Whether the path is closed
    pub closed: bool,
}

impl Path {
    /// Converts the `Path` to a [`kurbo::BezPath`].
    ///
    /// Off-curve points left over at the end of a closed path belong to the
    /// segment which returns to the first on-curve node.
    pub fn to_kurbo(&self) -> Result<kurbo::BezPath, GlyphsmithError> {
        let mut path = kurbo::BezPath::new();
        let mut offs = Vec::new();
        let rotate = if self.closed {
            self.nodes
                .iter()
                .rev()
                .position(|pt| pt.nodetype != NodeType::OffCurve)
                .map(|idx| self.nodes.len() - 1 - idx)
                .unwrap_or(0)
        } else {
            0
        };
        let mut nodes = self
            .nodes
            .iter()
            .cycle()
            .skip(rotate)
            .take(self.nodes.len());
        // All kurbo paths (even closed ones) must start with a move_to
        let Some(start) = nodes.next() else {
            return Ok(path);
        };
        if start.nodetype == NodeType::OffCurve {
            return Err(GlyphsmithError::BadPath);
        }
        path.move_to(start.to_kurbo());
        for pt in nodes {
            push_segment(&mut path, &mut offs, pt.nodetype, pt.to_kurbo())?;
        }
        if self.closed {
            if !offs.is_empty() {
                push_segment(&mut path, &mut offs, start.nodetype, start.to_kurbo())?;
            }
            path.close_path();
        } else if !offs.is_empty() {
            return Err(GlyphsmithError::BadPath);
        }
        Ok(path)
    }
}

fn push_segment(
    path: &mut kurbo::BezPath,
    offs: &mut Vec<kurbo::Point>,
    nodetype: NodeType,
    point: kurbo::Point,
) -> Result<(), GlyphsmithError> {
    match nodetype {
        NodeType::OffCurve => offs.push(point),
        NodeType::Move | NodeType::Line => {
            if !offs.is_empty() {
                return Err(GlyphsmithError::BadPath);
            }
            if nodetype == NodeType::Move {
                path.move_to(point)
            } else {
                path.line_to(point)
            }
        }
        NodeType::Curve => {
            match offs.as_slice() {
                [p1] => path.quad_to(*p1, point),
                [p1, p2] => path.curve_to(*p1, *p2, point),
                _ => return Err(GlyphsmithError::BadPath),
            };
            offs.clear();
        }
        NodeType::QCurve => {
            if offs.is_empty() {
                path.line_to(point);
            }
            for (ix, off) in offs.iter().enumerate() {
                match offs.get(ix + 1) {
                    Some(next) => path.quad_to(*off, off.midpoint(*next)),
                    None => path.quad_to(*off, point),
                }
            }
            offs.clear();
        }
    }
    Ok(())
}

/// All the contours of one glyph, in font units
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "types", typeshare)]
pub struct Outline {
    pub paths: Vec<Path>,
}

impl Outline {
    /// True if the outline has nothing to draw
    pub fn is_empty(&self) -> bool {
        self.contours().next().is_none()
    }

    /// Paths with at least two nodes; a lone point is not a contour.
    pub fn contours(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().filter(|p| p.nodes.len() > 1)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.paths.iter().flat_map(|p| p.nodes.iter())
    }

    /// The box around every node, control points included
    pub fn control_box(&self) -> Option<kurbo::Rect> {
        self.contours()
            .flat_map(|p| p.nodes.iter())
            .map(Node::to_kurbo)
            .fold(None, |rect: Option<kurbo::Rect>, pt| {
                Some(rect.map_or(kurbo::Rect::from_points(pt, pt), |r| r.union_pt(pt)))
            })
    }

    pub fn to_kurbo(&self) -> Result<kurbo::BezPath, GlyphsmithError> {
        let mut bez = kurbo::BezPath::new();
        for path in self.contours() {
            bez.extend(path.to_kurbo()?.elements().iter().copied());
        }
        Ok(bez)
    }
}

impl From<Vec<Path>> for Outline {
    fn from(paths: Vec<Path>) -> Self {
        Outline { paths }
    }
}

/// Interface for accepting a sequence of path commands.
pub trait OutlinePen {
    /// Emit a command to begin a new subpath at (x, y).
    fn move_to(&mut self, x: f64, y: f64);

    /// Emit a line segment from the current point to (x, y).
    fn line_to(&mut self, x: f64, y: f64);

    /// Emit a quadratic bezier segment from the current point with a control
    /// point at (cx0, cy0) and ending at (x, y).
    fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64);

    /// Emit a cubic bezier segment from the current point with control
    /// points at (cx0, cy0) and (cx1, cy1) and ending at (x, y).
    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64);

    /// Emit a command to close the current subpath.
    fn close(&mut self);
}

/// A pen which builds paths
///
/// ```rust
/// use glyphsmith::{OutlinePen, PathBuilder};
/// let mut pen = PathBuilder::new();
/// pen.move_to(0.0, 0.0);
/// pen.line_to(100.0, 0.0);
/// pen.line_to(100.0, 100.0);
/// pen.close();
/// let paths = pen.build();
/// assert_eq!(paths.len(), 1);
/// assert_eq!(paths[0].nodes.len(), 3);
/// assert!(paths[0].closed);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    paths: Vec<Path>,
    current_path: Option<Path>,
}

impl PathBuilder {
    /// Create a new PathBuilder
    pub fn new() -> Self {
        Self {
            paths: Vec::new(),
            current_path: None,
        }
    }

    /// Build and return the paths
    pub fn build(self) -> Vec<Path> {
        if let Some(path) = self.current_path {
            let mut paths = self.paths;
            paths.push(path);
            return paths;
        }
        self.paths
    }

    fn current_path_mut(&mut self) -> &mut Path {
        self.current_path.get_or_insert_with(Path::default)
    }
}

impl OutlinePen for PathBuilder {
    fn move_to(&mut self, x: f64, y: f64) {
        // Start a new path if we have an existing one
        if let Some(path) = self.current_path.take() {
            self.paths.push(path);
        }
        self.current_path_mut().nodes.push(Node::new_move(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.current_path_mut().nodes.push(Node::new_line(x, y));
    }

    fn quad_to(&mut self, cx0: f64, cy0: f64, x: f64, y: f64) {
        let path = self.current_path_mut();
        path.nodes.push(Node::new_offcurve(cx0, cy0));
        path.nodes.push(Node::new_qcurve(x, y));
    }

    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64) {
        let path = self.current_path_mut();
        path.nodes.push(Node::new_offcurve(cx0, cy0));
        path.nodes.push(Node::new_offcurve(cx1, cy1));
        path.nodes.push(Node::new_curve(x, y));
    }

    fn close(&mut self) {
        if let Some(path) = self.current_path.as_mut() {
            path.closed = true;
            // A closed path has no move. If the final node brought us back
            // to the start point, drop the first node; otherwise it becomes
            // a line.
            let returns_to_start = match (path.nodes.first(), path.nodes.last()) {
                (Some(first), Some(last)) => first.x == last.x && first.y == last.y,
                _ => false,
            };
            if returns_to_start {
                path.nodes.remove(0);
            } else if let Some(first_node) = path.nodes.first_mut() {
                first_node.nodetype = NodeType::Line;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{PathEl, Point};
    use pretty_assertions::assert_eq;

    fn square() -> Vec<Path> {
        let mut pen = PathBuilder::new();
        pen.move_to(0.0, 0.0);
        pen.line_to(0.0, 100.0);
        pen.line_to(100.0, 100.0);
        pen.line_to(100.0, 0.0);
        pen.close();
        pen.build()
    }

    #[test]
    fn test_close_converts_move_to_line() {
        let paths = square();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes[0].nodetype, NodeType::Line);
        assert_eq!(paths[0].nodes.len(), 4);
    }

    #[test]
    fn test_close_drops_duplicate_start() {
        let mut pen = PathBuilder::new();
        pen.move_to(0.0, 0.0);
        pen.line_to(50.0, 0.0);
        pen.line_to(50.0, 50.0);
        pen.line_to(0.0, 0.0);
        pen.close();
        let paths = pen.build();
        assert_eq!(paths[0].nodes.len(), 3);
        assert_eq!(paths[0].nodes[0], Node::new_line(50.0, 0.0));
    }

    #[test]
    fn test_move_starts_new_path() {
        let mut pen = PathBuilder::new();
        pen.move_to(0.0, 0.0);
        pen.line_to(10.0, 0.0);
        pen.move_to(20.0, 0.0);
        pen.line_to(30.0, 0.0);
        assert_eq!(pen.build().len(), 2);
    }

    #[test]
    fn test_closed_curve_wraps_to_start() -> Result<(), GlyphsmithError> {
        let mut pen = PathBuilder::new();
        pen.move_to(0.0, 0.0);
        pen.line_to(100.0, 0.0);
        pen.curve_to(100.0, 50.0, 50.0, 100.0, 0.0, 100.0);
        pen.close();
        let path = pen.build().remove(0).to_kurbo()?;
        let elements = path.elements();
        assert_eq!(elements.first(), Some(&PathEl::MoveTo(Point::new(0.0, 100.0))));
        assert_eq!(elements.last(), Some(&PathEl::ClosePath));
        assert!(elements
            .iter()
            .all(|el| !matches!(el, PathEl::MoveTo(_)) || el == &elements[0]));
        Ok(())
    }

    #[test]
    fn test_dangling_offcurve_is_bad_path() {
        let path = Path {
            nodes: vec![Node::new_move(0.0, 0.0), Node::new_offcurve(10.0, 10.0)],
            closed: false,
        };
        assert!(matches!(path.to_kurbo(), Err(GlyphsmithError::BadPath)));
    }

    #[test]
    fn test_outline_skips_lone_points() -> Result<(), GlyphsmithError> {
        let mut paths = square();
        paths.push(Path {
            nodes: vec![Node::new_move(5.0, 5.0)],
            closed: false,
        });
        let outline = Outline::from(paths);
        assert_eq!(outline.contours().count(), 1);
        let bez = outline.to_kurbo()?;
        let moves = bez
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::MoveTo(_)))
            .count();
        assert_eq!(moves, 1);
        Ok(())
    }

    #[test]
    fn test_empty_outline() {
        assert!(Outline::default().is_empty());
        assert_eq!(Outline::default().control_box(), None);
        let outline = Outline::from(square());
        assert!(!outline.is_empty());
        assert_eq!(
            outline.control_box(),
            Some(kurbo::Rect::new(0.0, 0.0, 100.0, 100.0))
        );
    }
}
