//! Drawing scene, finished strokes with undo history and the gesture state machine
use crate::{
    Point, RGBA, RecordedPath, Scalar, SceneConfig,
    svg::{self, SvgDocument, SvgError},
};
use std::fmt;

/// Eraser strokes are never thinner than this
pub const ERASER_MIN_WIDTH: Scalar = 20.0;

/// Paint attributes of a single stroke
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StrokeStyle {
    pub color: RGBA,
    pub width: Scalar,
    /// Stroke paints with the scene background
    pub eraser: bool,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: RGBA::BLACK,
            width: 5.0,
            eraser: false,
        }
    }
}

impl StrokeStyle {
    pub fn new(color: RGBA, width: Scalar) -> Self {
        Self {
            color,
            width,
            eraser: false,
        }
    }

    /// Width used for painting, eraser is clamped to [`ERASER_MIN_WIDTH`]
    pub fn effective_width(&self) -> Scalar {
        if self.eraser {
            self.width.max(ERASER_MIN_WIDTH)
        } else {
            self.width
        }
    }
}

/// Recorded path with its paint style
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stroke {
    path: RecordedPath,
    style: StrokeStyle,
}

impl Stroke {
    pub fn new(path: RecordedPath, style: StrokeStyle) -> Self {
        Self { path, style }
    }

    pub fn path(&self) -> &RecordedPath {
        &self.path
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }
}

/// Observer of the scene changes
pub trait SceneListener {
    /// Number of finished strokes has changed (commit, undo, redo, clear, load)
    fn strokes_changed(&mut self, count: usize);

    /// Redo history became (un)available
    fn redo_changed(&mut self, available: bool) {
        let _ = available;
    }
}

impl<F: FnMut(usize)> SceneListener for F {
    fn strokes_changed(&mut self, count: usize) {
        self(count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Drawing {
        start: Point,
        prev: Point,
        /// second pointer went down, the rest of the gesture is ignored
        multitouch: bool,
    },
}

/// Ordered finished strokes plus the stroke being drawn
///
/// Insertion order of the finished strokes is both z-order and undo order.
/// The current stroke is never part of the finished strokes, it is moved there
/// once by [`DrawingScene::end`] and replaced by a fresh path with a copy of
/// its style.
pub struct DrawingScene {
    finished: Vec<Stroke>,
    undone: Vec<Stroke>,
    current: Stroke,
    background: RGBA,
    gesture: Gesture,
    listener: Option<Box<dyn SceneListener + Send>>,
}

impl fmt::Debug for DrawingScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawingScene")
            .field("background", &self.background)
            .field("finished", &self.finished)
            .field("undone", &self.undone.len())
            .field("current", &self.current)
            .field("gesture", &self.gesture)
            .finish()
    }
}

impl Default for DrawingScene {
    fn default() -> Self {
        Self::new(&SceneConfig::default())
    }
}

impl DrawingScene {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            finished: Vec::new(),
            undone: Vec::new(),
            current: Stroke::new(RecordedPath::new(), config.brush()),
            background: config.background,
            gesture: Gesture::Idle,
            listener: None,
        }
    }

    /// Attach listener notified about changes of finished strokes
    pub fn with_listener(mut self, listener: impl SceneListener + Send + 'static) -> Self {
        self.set_listener(listener);
        self
    }

    pub fn set_listener(&mut self, listener: impl SceneListener + Send + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Start a gesture at the point, ignored while a gesture is active
    pub fn begin(&mut self, x: Scalar, y: Scalar) {
        if self.is_drawing() {
            tracing::trace!(x, y, "begin ignored, gesture is active");
            return;
        }
        let p = Point::new(x, y);
        self.current.path.reset();
        self.current.path.move_to(p);
        self.gesture = Gesture::Drawing {
            start: p,
            prev: p,
            multitouch: false,
        };
        if !self.undone.is_empty() {
            self.undone.clear();
            self.notify_redo(false);
        }
    }

    /// Continue active gesture with a midpoint smoothed quad
    pub fn extend(&mut self, x: Scalar, y: Scalar) {
        match &mut self.gesture {
            Gesture::Drawing {
                prev,
                multitouch: false,
                ..
            } => {
                let p = Point::new(x, y);
                self.current.path.quad_to(*prev, prev.mid(p));
                *prev = p;
            }
            _ => tracing::trace!(x, y, "extend ignored"),
        }
    }

    /// Finish active gesture and commit current stroke
    ///
    /// A gesture that never moved is closed with a tiny zigzag so it is
    /// visible as a dot.
    pub fn end(&mut self) {
        let Gesture::Drawing {
            start,
            prev,
            multitouch,
        } = self.gesture
        else {
            tracing::trace!("end ignored, no active gesture");
            return;
        };
        if !multitouch {
            let path = &mut self.current.path;
            path.line_to(prev);
            if prev == start {
                let Point([x, y]) = prev;
                path.line_to((x, y + 2.0))
                    .line_to((x + 1.0, y + 2.0))
                    .line_to((x + 1.0, y));
            }
        }
        self.gesture = Gesture::Idle;
        let style = self.current.style;
        let stroke = std::mem::replace(
            &mut self.current,
            Stroke::new(RecordedPath::new(), style),
        );
        tracing::debug!(
            commands = stroke.path.commands().len(),
            multitouch,
            "stroke committed"
        );
        self.finished.push(stroke);
        self.notify_strokes();
    }

    /// Another pointer went down during the active gesture
    pub fn pointer_added(&mut self) {
        if let Gesture::Drawing { multitouch, .. } = &mut self.gesture {
            *multitouch = true;
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.gesture, Gesture::Drawing { .. })
    }

    /// Style of the current stroke, copied to the following strokes
    pub fn style(&self) -> &StrokeStyle {
        &self.current.style
    }

    pub fn set_color(&mut self, color: RGBA) {
        self.current.style.color = color;
    }

    pub fn set_width(&mut self, width: Scalar) {
        self.current.style.width = width;
    }

    pub fn set_eraser(&mut self, eraser: bool) {
        self.current.style.eraser = eraser;
    }

    pub fn background(&self) -> RGBA {
        self.background
    }

    pub fn set_background(&mut self, background: RGBA) {
        self.background = background;
    }

    /// Remove the last finished stroke, current stroke is not affected
    pub fn undo(&mut self) {
        let Some(stroke) = self.finished.pop() else {
            return;
        };
        self.undone.push(stroke);
        tracing::debug!(strokes = self.finished.len(), "undo");
        self.notify_strokes();
        if self.undone.len() == 1 {
            self.notify_redo(true);
        }
    }

    /// Restore the most recently undone stroke
    pub fn redo(&mut self) {
        let Some(stroke) = self.undone.pop() else {
            return;
        };
        self.finished.push(stroke);
        tracing::debug!(strokes = self.finished.len(), "redo");
        self.notify_strokes();
        if self.undone.is_empty() {
            self.notify_redo(false);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.finished.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Drop all strokes and history, this can not be undone
    pub fn clear(&mut self) {
        self.reset_strokes();
        tracing::debug!("scene cleared");
        self.notify_strokes();
    }

    /// Finished strokes in z-order
    pub fn strokes(&self) -> &[Stroke] {
        &self.finished
    }

    /// Stroke being drawn
    pub fn current(&self) -> &Stroke {
        &self.current
    }

    /// Finished strokes followed by the current one, in drawing order
    pub fn layers(&self) -> impl Iterator<Item = &Stroke> {
        self.finished.iter().chain(std::iter::once(&self.current))
    }

    /// Replace scene content with the document strokes
    pub fn load_document(&mut self, doc: &SvgDocument) {
        self.reset_strokes();
        if let Some(background) = doc.background {
            self.background = background;
        }
        self.finished = doc
            .strokes
            .iter()
            .map(|stroke| Stroke::new(RecordedPath::from_commands(&stroke.commands), stroke.style))
            .collect();
        tracing::debug!(strokes = self.finished.len(), "document loaded");
        self.notify_strokes();
    }

    /// Decode document and load it, scene is untouched if decoding fails
    pub fn load_svg(&mut self, text: &str) -> Result<(), SvgError> {
        let doc = svg::decode(text)?;
        self.load_document(&doc);
        Ok(())
    }

    /// Encode finished strokes as SVG document
    pub fn to_svg(&self, width: u32, height: u32) -> String {
        svg::encode(self, width, height)
    }

    fn reset_strokes(&mut self) {
        let had_redo = !self.undone.is_empty();
        self.finished.clear();
        self.undone.clear();
        self.current.path.reset();
        self.gesture = Gesture::Idle;
        if had_redo {
            self.notify_redo(false);
        }
    }

    fn notify_strokes(&mut self) {
        let count = self.finished.len();
        if let Some(listener) = self.listener.as_mut() {
            listener.strokes_changed(count);
        }
    }

    fn notify_redo(&mut self, available: bool) {
        if let Some(listener) = self.listener.as_mut() {
            listener.redo_changed(available);
        }
    }
}

#[cfg(feature = "serde")]
mod state {
    use super::*;
    use crate::Command;
    use serde::{Deserialize, Serialize};

    /// Stroke as it is stored in the instance state
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct StrokeState {
        pub commands: Vec<Command>,
        pub style: StrokeStyle,
    }

    /// Serializable snapshot of the scene, independent of the SVG codec
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct SceneState {
        pub background: RGBA,
        /// Style of the next stroke
        pub brush: StrokeStyle,
        pub strokes: Vec<StrokeState>,
    }

    impl DrawingScene {
        pub fn save_state(&self) -> SceneState {
            SceneState {
                background: self.background,
                brush: self.current.style,
                strokes: self
                    .finished
                    .iter()
                    .map(|stroke| StrokeState {
                        commands: stroke.path.commands().to_vec(),
                        style: stroke.style,
                    })
                    .collect(),
            }
        }

        /// Replace scene content with the saved state
        pub fn restore_state(&mut self, state: &SceneState) {
            self.reset_strokes();
            self.background = state.background;
            self.current.style = state.brush;
            self.finished = state
                .strokes
                .iter()
                .map(|stroke| {
                    Stroke::new(RecordedPath::from_commands(&stroke.commands), stroke.style)
                })
                .collect();
            tracing::debug!(strokes = self.finished.len(), "state restored");
            self.notify_strokes();
        }
    }
}

#[cfg(feature = "serde")]
pub use state::{SceneState, StrokeState};
