//! Line and quadratic bezier segments produced by replaying path commands

use crate::{BBox, Point, Scalar};
use std::fmt;

/// Maximum subdivision depth, 2^16 lines per quad is more than any stroke needs
/// and it guarantees termination for non-finite control points.
const MAX_FLATTEN_DEPTH: usize = 16;

/// Line segment curve
#[derive(Clone, Copy, PartialEq)]
pub struct Line(pub [Point; 2]);

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Line([p0, p1]) = self;
        write!(f, "Line {:?} {:?}", p0, p1)
    }
}

impl Line {
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        Self([p0.into(), p1.into()])
    }

    pub fn points(&self) -> [Point; 2] {
        self.0
    }

    pub fn start(&self) -> Point {
        self.0[0]
    }

    pub fn end(&self) -> Point {
        self.0[1]
    }

    /// Length of the line
    pub fn length(&self) -> Scalar {
        let Self([p0, p1]) = self;
        p0.dist(*p1)
    }

    /// Shortest distance from the point to any point of the line segment
    pub fn distance_to(&self, point: Point) -> Scalar {
        let Self([p0, p1]) = *self;
        let dir = p1 - p0;
        let len2 = dir.dot(dir);
        if len2 <= 0.0 {
            return point.dist(p0);
        }
        let t = ((point - p0).dot(dir) / len2).clamp(0.0, 1.0);
        point.dist(p0 + t * dir)
    }

    pub fn bbox(&self) -> BBox {
        BBox::new(self.0[0], self.0[1])
    }
}

/// Quadratic bezier curve
///
/// Polynimial form:
/// `(1 - t) ^ 2 * p0 + 2 * (1 - t) * t * p1 + t ^ 2 * p2`
#[derive(Clone, Copy, PartialEq)]
pub struct Quad(pub [Point; 3]);

impl fmt::Debug for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Quad([p0, p1, p2]) = self;
        write!(f, "Quad {:?} {:?} {:?}", p0, p1, p2)
    }
}

impl Quad {
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>, p2: impl Into<Point>) -> Self {
        Self([p0.into(), p1.into(), p2.into()])
    }

    pub fn points(&self) -> [Point; 3] {
        self.0
    }

    pub fn start(&self) -> Point {
        self.0[0]
    }

    pub fn end(&self) -> Point {
        self.0[2]
    }

    /// Evaluate curve at parameter value `t` in (0.0..=1.0)
    pub fn at(&self, t: Scalar) -> Point {
        let Self([p0, p1, p2]) = *self;
        let (t1, t_1) = (t, 1.0 - t);
        let (t2, t_2) = (t1 * t1, t_1 * t_1);
        t_2 * p0 + 2.0 * t1 * t_1 * p1 + t2 * p2
    }

    /// Flattness criteria for the quad curve
    ///
    /// Maximum distance between the curve and the line connecting its ends is
    /// `f = 1 / 4 * |2 * p1 - p0 - p2|`, this function returns `16 * f ^ 2`.
    pub fn flatness(&self) -> Scalar {
        let Self([p0, p1, p2]) = *self;
        let Point([x, y]) = 2.0 * p1 - p0 - p2;
        x * x + y * y
    }

    /// Split the curve at `t = 0.5`
    pub fn split(&self) -> (Self, Self) {
        let Self([p0, p1, p2]) = *self;
        let mid = 0.25 * (p0 + 2.0 * p1 + p2);
        (
            Self([p0, 0.5 * (p0 + p1), mid]),
            Self([mid, 0.5 * (p1 + p2), p2]),
        )
    }

    /// Control polygon bounding box, which always contains the curve
    pub fn bbox(&self) -> BBox {
        let Self([p0, p1, p2]) = *self;
        BBox::new(p0, p2).extend(p1)
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Line),
    Quad(Quad),
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Line(line) => line.fmt(f),
            Segment::Quad(quad) => quad.fmt(f),
        }
    }
}

impl Segment {
    pub fn start(&self) -> Point {
        match self {
            Segment::Line(line) => line.start(),
            Segment::Quad(quad) => quad.start(),
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Line(line) => line.end(),
            Segment::Quad(quad) => quad.end(),
        }
    }

    pub fn bbox(&self) -> BBox {
        match self {
            Segment::Line(line) => line.bbox(),
            Segment::Quad(quad) => quad.bbox(),
        }
    }

    /// Convert segment to an iterator over line segments with desired flatness
    pub fn flatten(&self, flatness: Scalar) -> SegmentFlattenIter {
        SegmentFlattenIter::new(*self, flatness)
    }
}

impl From<Line> for Segment {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Quad> for Segment {
    fn from(quad: Quad) -> Self {
        Self::Quad(quad)
    }
}

pub struct SegmentFlattenIter {
    flatness: Scalar,
    stack: Vec<(Segment, usize)>,
}

impl SegmentFlattenIter {
    pub fn new(segment: Segment, flatness: Scalar) -> Self {
        Self {
            flatness: 16.0 * flatness * flatness,
            stack: vec![(segment, 0)],
        }
    }
}

impl Iterator for SegmentFlattenIter {
    type Item = Line;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stack.pop()? {
                (Segment::Line(line), _) => return Some(line),
                (Segment::Quad(quad), depth) => {
                    // negated comparison so that NaN flatness stops subdivision
                    if !(quad.flatness() >= self.flatness) || depth >= MAX_FLATTEN_DEPTH {
                        return Some(Line([quad.start(), quad.end()]));
                    }
                    let (q0, q1) = quad.split();
                    self.stack.push((q1.into(), depth + 1));
                    self.stack.push((q0.into(), depth + 1));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn test_line_distance() {
        let line = Line::new((0.0, 0.0), (10.0, 0.0));
        assert_approx_eq!(line.distance_to(Point::new(5.0, 3.0)), 3.0);
        assert_approx_eq!(line.distance_to(Point::new(-3.0, 4.0)), 5.0);
        assert_approx_eq!(line.distance_to(Point::new(13.0, 4.0)), 5.0);

        let dot = Line::new((1.0, 1.0), (1.0, 1.0));
        assert_approx_eq!(dot.distance_to(Point::new(1.0, 3.0)), 2.0);
    }

    #[test]
    fn test_quad_flatten() {
        let quad = Quad::new((0.0, 0.0), (5.0, 10.0), (10.0, 0.0));
        let lines: Vec<_> = Segment::from(quad).flatten(0.05).collect();
        assert!(lines.len() > 4);
        assert_eq!(lines.first().unwrap().start(), quad.start());
        assert_eq!(lines.last().unwrap().end(), quad.end());
        for pair in lines.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
        // apex of the curve
        assert_approx_eq!(quad.at(0.5).y(), 5.0);
    }

    #[test]
    fn test_flatten_non_finite_terminates() {
        let quad = Quad::new((0.0, 0.0), (Scalar::NAN, 1.0), (Scalar::INFINITY, 0.0));
        assert_eq!(Segment::from(quad).flatten(0.05).count(), 1);

        let quad = Quad::new((0.0, 0.0), (1e30, 1e30), (2.0, 0.0));
        let count = Segment::from(quad).flatten(0.05).count();
        assert!(count <= 1 << MAX_FLATTEN_DEPTH);
    }
}
