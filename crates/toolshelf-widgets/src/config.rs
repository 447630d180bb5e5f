#![forbid(unsafe_code)]

//! Toolbar options as data.
//!
//! [`ToolbarConfig`] gathers every option of a [`DragDropToolbar`] so hosts
//! can ship them in a file instead of wiring setters by hand.
//!
//! ```toml
//! keep_source_action = true
//! trash = true
//! max_columns = 4
//! orientation = "vertical"
//!
//! [glyph_size]
//! width = 4
//! height = 2
//! ```
//!
//! Every field has a default, so a partial file only overrides what it names.
//!
//! [`DragDropToolbar`]: crate::toolbar::DragDropToolbar

use std::path::Path;

use serde::{Deserialize, Serialize};
use toolshelf_core::geometry::{Orientation, Size};
use toolshelf_core::gesture::DEFAULT_DRAG_THRESHOLD;

/// Largest accepted `max_columns`.
pub const MAX_COLUMNS_LIMIT: usize = 256;

/// All toolbar options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarConfig {
    /// Leave a token in the palette after it is added to the active side.
    pub keep_source_action: bool,
    /// Put newly added actions straight onto the active side.
    pub immediately_add_source_action: bool,
    /// Keep the palette in name order.
    pub sort_source_action: bool,
    /// Clicking a checkable action flips its checked state.
    pub toggle_checkable_actions: bool,
    /// Draw a border around checked actions.
    pub border_checkable_actions: bool,
    /// Only one checked action shows a border at a time.
    pub exclusive_checkable_actions: bool,
    /// Show a trash slot on the active side.
    pub trash: bool,
    /// Tokens per line on both sides; `0` is unbounded.
    pub max_columns: usize,
    /// Size forced onto image glyphs; `None` keeps the provider's size.
    pub glyph_size: Option<Size>,
    pub orientation: Orientation,
    /// Manhattan distance that turns a press into a drag.
    pub drag_threshold: u16,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            keep_source_action: false,
            immediately_add_source_action: false,
            sort_source_action: false,
            toggle_checkable_actions: true,
            border_checkable_actions: true,
            exclusive_checkable_actions: false,
            trash: false,
            max_columns: 0,
            glyph_size: None,
            orientation: Orientation::Horizontal,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }
}

impl ToolbarConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check option ranges and combinations.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_columns > MAX_COLUMNS_LIMIT {
            errors.push(format!(
                "max_columns must be <= {MAX_COLUMNS_LIMIT}, got {}",
                self.max_columns
            ));
        }

        if let Some(size) = self.glyph_size
            && size.is_empty()
        {
            errors.push(format!(
                "glyph_size must be non-empty, got {}x{}",
                size.width, size.height
            ));
        }

        if self.exclusive_checkable_actions && !self.border_checkable_actions {
            errors.push(
                "exclusive_checkable_actions requires border_checkable_actions".into(),
            );
        }

        errors
    }

    /// `self` if it validates, otherwise every message as one error.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading a [`ToolbarConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_validates_clean() {
        let errors = ToolbarConfig::default().validate();
        assert!(errors.is_empty(), "default should validate: {errors:?}");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ToolbarConfig::from_toml_str(
            r#"
keep_source_action = true
max_columns = 4
orientation = "vertical"

[glyph_size]
width = 4
height = 2
"#,
        )
        .unwrap();
        assert!(config.keep_source_action);
        assert_eq!(config.max_columns, 4);
        assert_eq!(config.orientation, Orientation::Vertical);
        assert_eq!(config.glyph_size, Some(Size::new(4, 2)));
        assert_eq!(config.drag_threshold, DEFAULT_DRAG_THRESHOLD);
        assert!(config.toggle_checkable_actions);
    }

    #[test]
    fn json_round_trips() {
        let config = ToolbarConfig {
            trash: true,
            sort_source_action: true,
            ..ToolbarConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ToolbarConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn toml_file_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "trash = true").unwrap();
        let config = ToolbarConfig::from_toml_file(file.path()).unwrap();
        assert!(config.trash);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ToolbarConfig::from_json_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let err = ToolbarConfig::from_toml_str("max_columns = \"four\"").unwrap_err();
        assert!(err.to_string().starts_with("TOML parse error"));
    }

    #[test]
    fn validate_catches_bad_combinations() {
        let config = ToolbarConfig {
            max_columns: 1000,
            glyph_size: Some(Size::new(0, 2)),
            border_checkable_actions: false,
            exclusive_checkable_actions: true,
            ..ToolbarConfig::default()
        };
        let errors = config.clone().validate();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("max_columns")));
        assert!(errors.iter().any(|e| e.contains("glyph_size")));
        assert!(matches!(
            config.validated(),
            Err(ConfigError::Validation(list)) if list.len() == 3
        ));
    }
}
