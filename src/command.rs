//! Primitive drawing commands recorded by [`RecordedPath`](crate::RecordedPath)
use crate::{PathSink, Point};
use std::fmt;

/// Single primitive geometry instruction with literal coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "cmd", rename_all = "lowercase"))]
pub enum Command {
    Move { to: Point },
    Line { to: Point },
    Quad { ctrl: Point, to: Point },
}

impl Command {
    pub fn move_to(x: f32, y: f32) -> Self {
        Self::Move {
            to: Point::new(x, y),
        }
    }

    pub fn line_to(x: f32, y: f32) -> Self {
        Self::Line {
            to: Point::new(x, y),
        }
    }

    pub fn quad_to(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::Quad {
            ctrl: Point::new(x1, y1),
            to: Point::new(x2, y2),
        }
    }

    /// Destination point of the command
    pub fn dst(&self) -> Point {
        match self {
            Command::Move { to } | Command::Line { to } | Command::Quad { to, .. } => *to,
        }
    }

    /// Apply command to the geometry sink
    pub fn apply(&self, sink: &mut impl PathSink) {
        match *self {
            Command::Move { to } => sink.move_to(to),
            Command::Line { to } => sink.line_to(to),
            Command::Quad { ctrl, to } => sink.quad_to(ctrl, to),
        }
    }

    /// Letter used by the command in the SVG path data
    pub fn letter(&self) -> char {
        match self {
            Command::Move { .. } => 'M',
            Command::Line { .. } => 'L',
            Command::Quad { .. } => 'Q',
        }
    }
}

/// Formats command the way it appears in SVG path data (`M1,2`, `L3,4`, `Q1,2 3,4`)
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move { to } | Command::Line { to } => write!(f, "{}{:?}", self.letter(), to),
            Command::Quad { ctrl, to } => write!(f, "Q{:?} {:?}", ctrl, to),
        }
    }
}

/// Adapter that formats a list of commands as space separated SVG path data
pub struct PathData<'a>(pub &'a [Command]);

impl fmt::Display for PathData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut commands = self.0.iter();
        if let Some(cmd) = commands.next() {
            write!(f, "{}", cmd)?;
        }
        for cmd in commands {
            write!(f, " {}", cmd)?;
        }
        Ok(())
    }
}

impl PathSink for Vec<Command> {
    fn move_to(&mut self, p: Point) {
        self.push(Command::Move { to: p });
    }

    fn line_to(&mut self, p: Point) {
        self.push(Command::Line { to: p });
    }

    fn quad_to(&mut self, p1: Point, p2: Point) {
        self.push(Command::Quad { ctrl: p1, to: p2 });
    }

    fn reset(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Command::move_to(0.0, 0.0).to_string(), "M0,0");
        assert_eq!(Command::line_to(10.0, -2.0).to_string(), "L10,-2");
        assert_eq!(Command::quad_to(1.0, 2.0, 3.0, 4.0).to_string(), "Q1,2 3,4");
        let data = [
            Command::move_to(0.0, 0.0),
            Command::quad_to(0.0, 0.0, 5.0, 0.0),
            Command::line_to(10.0, 0.0),
        ];
        assert_eq!(PathData(&data).to_string(), "M0,0 Q0,0 5,0 L10,0");
        assert_eq!(PathData(&[]).to_string(), "");
    }

    #[test]
    fn test_apply_records() {
        let cmds = [
            Command::move_to(1.0, 2.0),
            Command::line_to(3.0, 4.0),
            Command::quad_to(5.0, 6.0, 7.0, 8.0),
        ];
        let mut sink = Vec::new();
        for cmd in cmds.iter() {
            cmd.apply(&mut sink);
        }
        assert_eq!(sink, cmds);
        assert_eq!(cmds[2].dst(), Point::new(7.0, 8.0));
        PathSink::reset(&mut sink);
        assert!(sink.is_empty());
    }
}
