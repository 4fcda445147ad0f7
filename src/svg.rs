//! SVG document codec
//!
//! Supports the subset of SVG produced by [`encode`]:
//! ```text
//! <svg width="W" height="H" xmlns="http://www.w3.org/2000/svg">
//! <rect width="W" height="H" fill="#RRGGBB"/>
//! <path d="M x,y L x,y Q x1,y1 x2,y2 ..." fill="none" stroke="#RRGGBB" stroke-width="N" stroke-linecap="round"/>
//! </svg>
//! ```
//! Path data is tokenized by whitespace, only `M`, `L` and `Q` commands are
//! understood, tokens starting with any other character are skipped. The
//! document must be well-formed XML, unknown elements are ignored.
use crate::{Command, DrawingScene, PathData, Point, RGBA, Scalar, StrokeStyle, scalar_fmt};
use std::{
    fmt,
    io::{Read, Write},
    str::FromStr,
};

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Stroke as it is stored in the document
#[derive(Debug, Clone, PartialEq)]
pub struct SvgStroke {
    pub commands: Vec<Command>,
    pub style: StrokeStyle,
}

/// Parsed (or to be written) SVG document
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub width: u32,
    pub height: u32,
    /// Background color, `None` if document has no background rectangle
    pub background: Option<RGBA>,
    pub strokes: Vec<SvgStroke>,
}

impl SvgDocument {
    /// Capture finished strokes of the scene
    pub fn from_scene(scene: &DrawingScene, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Some(scene.background()),
            strokes: scene
                .strokes()
                .iter()
                .map(|stroke| SvgStroke {
                    commands: stroke.path().commands().to_vec(),
                    style: *stroke.style(),
                })
                .collect(),
        }
    }

    /// Parse document from its textual representation
    pub fn parse(text: &str) -> Result<Self, SvgError> {
        decode(text)
    }

    /// Load document from the reader
    pub fn load(mut input: impl Read) -> Result<Self, SvgError> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        decode(&text)
    }

    /// Save document into the writer
    pub fn save(&self, mut out: impl Write) -> std::io::Result<()> {
        write!(out, "{}", self)
    }
}

impl fmt::Display for SvgDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_svg(
            f,
            self.width,
            self.height,
            self.background,
            self.strokes
                .iter()
                .map(|stroke| (stroke.commands.as_slice(), &stroke.style)),
        )
    }
}

impl FromStr for SvgDocument {
    type Err = SvgError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        decode(text)
    }
}

/// Encode finished strokes of the scene as SVG document of the provided size
pub fn encode(scene: &DrawingScene, width: u32, height: u32) -> String {
    let _span = tracing::debug_span!("[svg:encode]", strokes = scene.strokes().len()).entered();
    let mut out = String::new();
    let strokes = scene
        .strokes()
        .iter()
        .map(|stroke| (stroke.path().commands(), stroke.style()));
    // writing into a String never fails
    let _ = write_svg(&mut out, width, height, Some(scene.background()), strokes);
    out
}

fn write_svg<'a>(
    out: &mut impl fmt::Write,
    width: u32,
    height: u32,
    background: Option<RGBA>,
    strokes: impl Iterator<Item = (&'a [Command], &'a StrokeStyle)>,
) -> fmt::Result {
    writeln!(
        out,
        r#"<svg width="{width}" height="{height}" xmlns="{SVG_NAMESPACE}">"#
    )?;
    if let Some(background) = background {
        writeln!(
            out,
            r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
            background.to_hex_rgb()
        )?;
    }
    for (commands, style) in strokes {
        write!(out, r#"<path d="{}" fill="none" stroke=""#, PathData(commands))?;
        if style.eraser {
            out.write_str("none")?;
        } else {
            out.write_str(&style.color.to_hex_rgb())?;
        }
        out.write_str(r#"" stroke-width=""#)?;
        scalar_fmt(out, style.width)?;
        writeln!(out, r#"" stroke-linecap="round"/>"#)?;
    }
    writeln!(out, "</svg>")
}

/// Decode SVG document
///
/// Decoding is all-or-nothing, either the complete document is returned or
/// an error describing the first violation.
pub fn decode(text: &str) -> Result<SvgDocument, SvgError> {
    let _span = tracing::debug_span!("[svg:decode]", bytes = text.len()).entered();
    let result = decode_document(text);
    match &result {
        Ok(doc) => tracing::debug!(strokes = doc.strokes.len(), "document decoded"),
        Err(error) => tracing::debug!(%error, "document rejected"),
    }
    result
}

fn decode_document(text: &str) -> Result<SvgDocument, SvgError> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let xml = roxmltree::Document::parse_with_options(text, options)?;
    let root = xml.root_element();
    if root.tag_name().name() != "svg" {
        return Err(SvgError::MissingRoot);
    }
    let width = parse_size(root, "svg", "width")?;
    let height = parse_size(root, "svg", "height")?;

    let mut background = None;
    let mut strokes = Vec::new();
    for node in root.descendants().skip(1).filter(|node| node.is_element()) {
        match node.tag_name().name() {
            "svg" => {
                return Err(SvgError::DuplicateRoot {
                    offset: node.range().start,
                });
            }
            "rect" => {
                if background.is_some() {
                    return Err(SvgError::DuplicateBackground {
                        offset: node.range().start,
                    });
                }
                parse_size(node, "rect", "width")?;
                parse_size(node, "rect", "height")?;
                background = Some(parse_color(attr(node, "rect", "fill")?)?);
            }
            "path" => {
                let commands = parse_path_data(attr(node, "path", "d")?)?;
                let stroke = attr(node, "path", "stroke")?;
                let width = attr(node, "path", "stroke-width")?;
                let width = width
                    .trim()
                    .parse::<Scalar>()
                    .map_err(|_| SvgError::InvalidWidth {
                        value: width.to_string(),
                    })?;
                let style = if stroke.trim() == "none" {
                    StrokeStyle {
                        color: RGBA::default(),
                        width,
                        eraser: true,
                    }
                } else {
                    StrokeStyle {
                        color: parse_color(stroke)?,
                        width,
                        eraser: false,
                    }
                };
                strokes.push(SvgStroke { commands, style });
            }
            name => tracing::trace!(name, "skipping unsupported element"),
        }
    }
    Ok(SvgDocument {
        width,
        height,
        background,
        strokes,
    })
}

fn attr<'a>(
    node: roxmltree::Node<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str, SvgError> {
    node.attribute(attribute)
        .ok_or(SvgError::MissingAttribute { element, attribute })
}

fn parse_size(
    node: roxmltree::Node<'_, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<u32, SvgError> {
    let value = attr(node, element, attribute)?;
    match value.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(SvgError::InvalidSize {
            attribute,
            value: value.to_string(),
        }),
    }
}

fn parse_color(value: &str) -> Result<RGBA, SvgError> {
    value.parse().map_err(|_| SvgError::InvalidColor {
        value: value.to_string(),
    })
}

/// Parse path data produced by the encoder
///
/// `M` and `L` tokens carry a single `x,y` pair, `Q` token carries the control
/// point and consumes the next token as the end point.
pub fn parse_path_data(data: &str) -> Result<Vec<Command>, SvgError> {
    let mut commands = Vec::new();
    let mut tokens = data.split_whitespace();
    while let Some(token) = tokens.next() {
        match token.as_bytes().first() {
            Some(b'M') => commands.push(Command::Move {
                to: parse_pair(&token[1..])?,
            }),
            Some(b'L') => commands.push(Command::Line {
                to: parse_pair(&token[1..])?,
            }),
            Some(b'Q') => {
                let ctrl = parse_pair(&token[1..])?;
                let end = tokens.next().ok_or_else(|| SvgError::IncompleteQuad {
                    token: token.to_string(),
                })?;
                commands.push(Command::Quad {
                    ctrl,
                    to: parse_pair(end)?,
                });
            }
            _ => tracing::trace!(token, "skipping unknown path command"),
        }
    }
    Ok(commands)
}

// parse `x,y` pair
fn parse_pair(token: &str) -> Result<Point, SvgError> {
    let error = || SvgError::InvalidCoordinate {
        token: token.to_string(),
    };
    let (x, y) = token.split_once(',').ok_or_else(error)?;
    let x = x.trim().parse::<Scalar>().map_err(|_| error())?;
    let y = y.trim().parse::<Scalar>().map_err(|_| error())?;
    Ok(Point::new(x, y))
}

/// Error while decoding SVG document
#[derive(Debug)]
pub enum SvgError {
    /// Document is not well-formed XML
    Xml(roxmltree::Error),
    /// Root element is not `<svg>`
    MissingRoot,
    /// Nested `<svg>` element
    DuplicateRoot { offset: usize },
    /// Required attribute is absent
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    /// Size is not a positive integer
    InvalidSize {
        attribute: &'static str,
        value: String,
    },
    /// Only single background `<rect>` is supported
    DuplicateBackground { offset: usize },
    /// Color is not in `#RRGGBB(AA)` format
    InvalidColor { value: String },
    /// Stroke width is not a number
    InvalidWidth { value: String },
    /// Path data token does not contain `x,y` pair
    InvalidCoordinate { token: String },
    /// `Q` token is not followed by the end point token
    IncompleteQuad { token: String },
    /// IO error propagated while reading input stream
    IoError(std::io::Error),
}

impl fmt::Display for SvgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SvgError::*;
        match self {
            Xml(error) => write!(f, "malformed document: {error}"),
            MissingRoot => write!(f, "<svg> root element expected"),
            DuplicateRoot { offset } => write!(f, "nested <svg> element at byte {offset}"),
            MissingAttribute { element, attribute } => {
                write!(f, "<{element}> is missing `{attribute}` attribute")
            }
            InvalidSize { attribute, value } => {
                write!(f, "`{attribute}` must be a positive integer: {value:?}")
            }
            DuplicateBackground { offset } => {
                write!(f, "unsupported SVG, second <rect> at byte {offset}")
            }
            InvalidColor { value } => write!(f, "invalid color: {value:?}"),
            InvalidWidth { value } => write!(f, "invalid stroke width: {value:?}"),
            InvalidCoordinate { token } => write!(f, "invalid path coordinate: {token:?}"),
            IncompleteQuad { token } => write!(f, "quad {token:?} is missing end point"),
            IoError(error) => write!(f, "{error}"),
        }
    }
}

impl From<roxmltree::Error> for SvgError {
    fn from(error: roxmltree::Error) -> Self {
        Self::Xml(error)
    }
}

impl From<std::io::Error> for SvgError {
    fn from(error: std::io::Error) -> Self {
        Self::IoError(error)
    }
}

impl From<SvgError> for std::io::Error {
    fn from(error: SvgError) -> Self {
        match error {
            SvgError::IoError(error) => error,
            _ => Self::new(std::io::ErrorKind::InvalidData, error),
        }
    }
}

impl std::error::Error for SvgError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SvgError::Xml(error) => Some(error),
            SvgError::IoError(error) => Some(error),
            _ => None,
        }
    }
}
