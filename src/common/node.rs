use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum NodeType {
    Move,
    Line,
    OffCurve,
    Curve,
    QCurve,
}

/// A point in a glyph outline, in font units with y pointing up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub nodetype: NodeType,
}

impl Node {
    pub fn new_move(x: f64, y: f64) -> Self {
        Node {
            x,
            y,
            nodetype: NodeType::Move,
        }
    }

    pub fn new_line(x: f64, y: f64) -> Self {
        Node {
            x,
            y,
            nodetype: NodeType::Line,
        }
    }

    pub fn new_offcurve(x: f64, y: f64) -> Self {
        Node {
            x,
            y,
            nodetype: NodeType::OffCurve,
        }
    }

    pub fn new_curve(x: f64, y: f64) -> Self {
        Node {
            x,
            y,
            nodetype: NodeType::Curve,
        }
    }

    pub fn new_qcurve(x: f64, y: f64) -> Self {
        Node {
            x,
            y,
            nodetype: NodeType::QCurve,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_kurbo(&self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}
