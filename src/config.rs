//! Scene configuration snapshot
use crate::{RGBA, Scalar, StrokeStyle};

/// Defaults used by a freshly created [`DrawingScene`](crate::DrawingScene)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SceneConfig {
    pub brush_color: RGBA,
    pub brush_width: Scalar,
    pub background: RGBA,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let brush = StrokeStyle::default();
        Self {
            brush_color: brush.color,
            brush_width: brush.width,
            background: RGBA::WHITE,
        }
    }
}

impl SceneConfig {
    /// Style of the first stroke
    pub fn brush(&self) -> StrokeStyle {
        StrokeStyle::new(self.brush_color, self.brush_width)
    }
}

#[cfg(feature = "serde")]
impl SceneConfig {
    /// Read configuration from JSON, missing fields take default values
    pub fn from_json(reader: impl std::io::Read) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read configuration from JSON file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        Self::from_json(std::io::BufReader::new(file))
    }
}

#[cfg(feature = "serde")]
#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    IoError(std::io::Error),
}

#[cfg(feature = "serde")]
impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(error) => write!(f, "invalid configuration: {error}"),
            ConfigError::IoError(error) => write!(f, "{error}"),
        }
    }
}

#[cfg(feature = "serde")]
impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(error) => Some(error),
            ConfigError::IoError(error) => Some(error),
        }
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}

#[cfg(feature = "serde")]
impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        Self::IoError(error)
    }
}

#[cfg(feature = "serde")]
impl From<ConfigError> for std::io::Error {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::IoError(error) => error,
            ConfigError::Json(error) => error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.brush_color, RGBA::BLACK);
        assert_eq!(config.brush_width, 5.0);
        assert_eq!(config.background, RGBA::WHITE);
        assert!(!config.brush().eraser);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() -> Result<(), ConfigError> {
        let config = SceneConfig::from_json(r##"{"brush_color": "#ff0000", "brush_width": 2.5}"##.as_bytes())?;
        assert_eq!(config.brush_color, RGBA::new(255, 0, 0, 255));
        assert_eq!(config.brush_width, 2.5);
        assert_eq!(config.background, RGBA::WHITE);

        assert_eq!(SceneConfig::from_json("{}".as_bytes())?, SceneConfig::default());
        assert!(matches!(
            SceneConfig::from_json(r#"{"background": "white"}"#.as_bytes()),
            Err(ConfigError::Json(_))
        ));
        Ok(())
    }
}
