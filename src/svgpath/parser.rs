use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[allow(clippy::expect_used)] // literal pattern
static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([MmLlHhVvCcSsQqTtAaZz])([^MmLlHhVvCcSsQqTtAaZz]*)").expect("valid regex")
});

#[allow(clippy::expect_used)] // literal pattern
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").expect("valid regex")
});

/// The kind of an SVG path command, irrespective of case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandKind {
    MoveTo,
    LineTo,
    HorizontalTo,
    VerticalTo,
    CurveTo,
    SmoothCurveTo,
    QuadTo,
    SmoothQuadTo,
    Arc,
    Close,
}

impl CommandKind {
    /// Number of values consumed by one repetition of this command
    pub fn arity(&self) -> usize {
        match self {
            CommandKind::MoveTo | CommandKind::LineTo | CommandKind::SmoothQuadTo => 2,
            CommandKind::HorizontalTo | CommandKind::VerticalTo => 1,
            CommandKind::CurveTo => 6,
            CommandKind::SmoothCurveTo | CommandKind::QuadTo => 4,
            CommandKind::Arc => 7,
            CommandKind::Close => 0,
        }
    }
}

/// One command letter with the numbers that followed it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathCommand {
    pub kind: CommandKind,
    /// Lowercase command letters take coordinates relative to the current point
    pub relative: bool,
    pub values: Vec<f64>,
}

impl PathCommand {
    pub fn from_letter(letter: char, values: Vec<f64>) -> Option<Self> {
        let kind = match letter.to_ascii_uppercase() {
            'M' => CommandKind::MoveTo,
            'L' => CommandKind::LineTo,
            'H' => CommandKind::HorizontalTo,
            'V' => CommandKind::VerticalTo,
            'C' => CommandKind::CurveTo,
            'S' => CommandKind::SmoothCurveTo,
            'Q' => CommandKind::QuadTo,
            'T' => CommandKind::SmoothQuadTo,
            'A' => CommandKind::Arc,
            'Z' => CommandKind::Close,
            _ => return None,
        };
        Some(PathCommand {
            kind,
            relative: letter.is_ascii_lowercase(),
            values,
        })
    }

    pub fn letter(&self) -> char {
        let letter = match self.kind {
            CommandKind::MoveTo => 'M',
            CommandKind::LineTo => 'L',
            CommandKind::HorizontalTo => 'H',
            CommandKind::VerticalTo => 'V',
            CommandKind::CurveTo => 'C',
            CommandKind::SmoothCurveTo => 'S',
            CommandKind::QuadTo => 'Q',
            CommandKind::SmoothQuadTo => 'T',
            CommandKind::Arc => 'A',
            CommandKind::Close => 'Z',
        };
        if self.relative {
            letter.to_ascii_lowercase()
        } else {
            letter
        }
    }
}

/// Split SVG path data into commands.
///
/// This is deliberately forgiving, since path data comes from a generative
/// model: anything before the first command letter is ignored, numbers may
/// be separated by commas, whitespace or nothing at all (`10-5`, `.5.5`),
/// and characters that are not part of a number are skipped. It never fails;
/// an unusable string simply produces no commands.
pub fn parse(d: &str) -> Vec<PathCommand> {
    COMMAND_RE
        .captures_iter(d)
        .filter_map(|caps| {
            let letter = caps.get(1)?.as_str().chars().next()?;
            let values = caps
                .get(2)
                .map(|args| {
                    NUMBER_RE
                        .find_iter(args.as_str())
                        .filter_map(|m| m.as_str().parse::<f64>().ok())
                        .collect()
                })
                .unwrap_or_default();
            PathCommand::from_letter(letter, values)
        })
        .collect()
}
