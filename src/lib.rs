//! Vector recorder for freehand drawings.
//!
//! Main features:
//!  - Strokes recorded as replayable logs of move/line/quad commands
//!  - Drawing scene with gesture state machine, undo and redo
//!  - Lossless SVG document encoding and decoding
//!  - Anti-aliased raster export
//!
#![deny(warnings)]

mod color;
mod command;
mod config;
mod curve;
mod geometry;
mod image;
mod path;
mod render;
mod scene;
pub mod svg;
mod utils;

pub use color::{ColorError, RGBA, linear_to_srgb, srgb_to_linear};
pub use command::{Command, PathData};
#[cfg(feature = "serde")]
pub use config::ConfigError;
pub use config::SceneConfig;
pub use curve::{Line, Quad, Segment, SegmentFlattenIter};
pub use geometry::{BBox, EPSILON, Point, Scalar, scalar_fmt};
#[cfg(feature = "png")]
pub use image::write_png;
pub use image::{Image, ImageMut, ImageOwned, Shape, Size, to_rgba_bytes};
pub use path::{DEFAULT_FLATNESS, Outline, PathSink, RecordedPath, SubPath};
pub use render::render;
pub use scene::{DrawingScene, ERASER_MIN_WIDTH, SceneListener, Stroke, StrokeStyle};
#[cfg(feature = "serde")]
pub use scene::{SceneState, StrokeState};
pub use svg::{SvgDocument, SvgError, SvgStroke};
