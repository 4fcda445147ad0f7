use crate::{BBox, Command, Line, Point, Quad, Scalar, Segment};
use std::fmt;

/// flatness of 0.05px gives good accuracy tradeoff
pub const DEFAULT_FLATNESS: Scalar = 0.05;

/// Geometry backend driven by path commands, similar to Canvas/Cairo interface.
pub trait PathSink {
    /// Start new sub-path at the point
    fn move_to(&mut self, p: Point);

    /// Add line from the current position to the point
    fn line_to(&mut self, p: Point);

    /// Add quadratic bezier curve with control point `p1` ending at `p2`
    fn quad_to(&mut self, p1: Point, p2: Point);

    /// Clear all geometry
    fn reset(&mut self);
}

/// Collection of segments where end of each segments conisides with the start of the next one.
#[derive(Clone, PartialEq)]
pub struct SubPath {
    start: Point,
    segments: Vec<Segment>,
}

impl fmt::Debug for SubPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Start {:?}", self.start)?;
        for segment in self.segments.iter() {
            writeln!(f, "{:?}", segment)?;
        }
        writeln!(f, "End")
    }
}

impl SubPath {
    pub fn start(&self) -> Point {
        self.start
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Convert sub-path to lines, sub-path without segments is a single degenerate line
    pub fn flatten(&self, flatness: Scalar) -> Box<dyn Iterator<Item = Line> + '_> {
        if self.segments.is_empty() {
            Box::new(std::iter::once(Line::new(self.start, self.start)))
        } else {
            Box::new(
                self.segments
                    .iter()
                    .flat_map(move |segment| segment.flatten(flatness)),
            )
        }
    }

    pub fn bbox(&self, init: Option<BBox>) -> BBox {
        self.segments
            .iter()
            .fold(BBox::new(self.start, self.start), |bbox, seg| {
                bbox.union(seg.bbox())
            })
            .union_opt(init)
    }
}

/// Live stroke geometry, built incrementally from path commands
///
/// Every issued segment is kept, including zero length ones, so a tap still
/// produces visible geometry once stroked with round caps.
#[derive(Clone, Default, PartialEq)]
pub struct Outline {
    position: Point,
    subpaths: Vec<SubPath>,
}

impl fmt::Debug for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subpaths.is_empty() {
            write!(f, "Empty")?;
        } else {
            for subpath in self.subpaths.iter() {
                subpath.fmt(f)?
            }
        }
        Ok(())
    }
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    /// Current position, where next segment starts
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    pub fn segments_count(&self) -> usize {
        self.subpaths
            .iter()
            .fold(0usize, |acc, subpath| acc + subpath.segments().len())
    }

    /// Bounding box of the control points of the outline
    pub fn bbox(&self) -> Option<BBox> {
        self.subpaths
            .iter()
            .fold(None, |bbox, subpath| Some(subpath.bbox(bbox)))
    }

    /// Convert outline to an iterator over line segments
    pub fn flatten(&self, flatness: Scalar) -> impl Iterator<Item = Line> + '_ {
        self.subpaths
            .iter()
            .flat_map(move |subpath| subpath.flatten(flatness))
    }

    fn push(&mut self, segment: Segment) {
        if self.subpaths.is_empty() {
            // drawing without initial move starts at the origin
            self.subpaths.push(SubPath {
                start: self.position,
                segments: Vec::new(),
            });
        }
        self.position = segment.end();
        if let Some(subpath) = self.subpaths.last_mut() {
            subpath.segments.push(segment);
        }
    }
}

impl PathSink for Outline {
    fn move_to(&mut self, p: Point) {
        self.position = p;
        self.subpaths.push(SubPath {
            start: p,
            segments: Vec::new(),
        });
    }

    fn line_to(&mut self, p: Point) {
        self.push(Line::new(self.position, p).into());
    }

    fn quad_to(&mut self, p1: Point, p2: Point) {
        self.push(Quad::new(self.position, p1, p2).into());
    }

    fn reset(&mut self) {
        self.position = Point::default();
        self.subpaths.clear();
    }
}

/// Path that records every mutation into its command log
///
/// The geometry backend is only reachable immutably, commands are the sole
/// write entry points, so replaying [`RecordedPath::commands`] into a fresh
/// backend always reproduces the live geometry.
#[derive(Clone, Default, PartialEq)]
pub struct RecordedPath<G = Outline> {
    geometry: G,
    commands: Vec<Command>,
}

impl<G: fmt::Debug> fmt::Debug for RecordedPath<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordedPath")
            .field("commands", &crate::PathData(&self.commands).to_string())
            .finish()
    }
}

impl<G: PathSink + Default> RecordedPath<G> {
    /// Create empty path
    pub fn new() -> Self {
        Self {
            geometry: G::default(),
            commands: Vec::new(),
        }
    }

    /// Create path by replaying commands into a fresh backend
    pub fn from_commands<'a>(commands: impl IntoIterator<Item = &'a Command>) -> Self {
        let mut path = Self::new();
        path.replay(commands);
        path
    }
}

impl<G: PathSink> RecordedPath<G> {
    /// Create empty path with provided backend, backend is reset first
    pub fn with_geometry(mut geometry: G) -> Self {
        geometry.reset();
        Self {
            geometry,
            commands: Vec::new(),
        }
    }

    pub fn move_to(&mut self, p: impl Into<Point>) -> &mut Self {
        self.apply(Command::Move { to: p.into() })
    }

    pub fn line_to(&mut self, p: impl Into<Point>) -> &mut Self {
        self.apply(Command::Line { to: p.into() })
    }

    pub fn quad_to(&mut self, p1: impl Into<Point>, p2: impl Into<Point>) -> &mut Self {
        self.apply(Command::Quad {
            ctrl: p1.into(),
            to: p2.into(),
        })
    }

    /// Clear command log and geometry
    pub fn reset(&mut self) {
        self.commands.clear();
        self.geometry.reset();
    }

    /// Reset path and apply every command in order
    pub fn replay<'a>(&mut self, commands: impl IntoIterator<Item = &'a Command>) {
        self.reset();
        for cmd in commands {
            self.apply(*cmd);
        }
    }

    /// Recorded commands in the order they were issued
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn apply(&mut self, cmd: Command) -> &mut Self {
        self.commands.push(cmd);
        cmd.apply(&mut self.geometry);
        self
    }
}
