use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::context::ApplicationContext;
use crate::error::ConfigError;

/// Host session settings.
///
/// Missing fields fall back to their defaults, so an empty JSON object is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Directory texture paths are resolved against.
    pub asset_root: PathBuf,
    /// Initial foreground color.
    pub foreground: Color,
    /// Initial background color.
    pub background: Color,
    /// Refuse to register a tool whose texture is already in use.
    pub reject_duplicate_textures: bool,
    /// Fail module loading when a tool declares no setup widgets.
    pub require_setup_widgets: bool,
    /// Largest width or height a widget may have.
    pub max_widget_extent: usize,
    /// Number of decoded sprites kept in memory.
    pub sprite_cache_size: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        let context = ApplicationContext::default();
        Self {
            asset_root: PathBuf::from("assets"),
            foreground: context.fg_color,
            background: context.bg_color,
            reject_duplicate_textures: true,
            require_setup_widgets: false,
            max_widget_extent: 4096,
            sprite_cache_size: 64,
        }
    }
}

impl HostConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    pub fn initial_context(&self) -> ApplicationContext {
        ApplicationContext {
            fg_color: self.foreground,
            bg_color: self.background,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        assert_eq!(HostConfig::from_json_str("{}").unwrap(), HostConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = HostConfig::from_json_str(
            r##"{"asset_root": "/opt/paint", "foreground": "#FF0000", "require_setup_widgets": true}"##,
        )
        .unwrap();
        assert_eq!(config.asset_root, PathBuf::from("/opt/paint"));
        assert_eq!(config.initial_context().fg_color, Color::RED);
        assert_eq!(config.background, Color::WHITE);
        assert!(config.require_setup_widgets);
        assert!(config.reject_duplicate_textures);
    }

    #[test]
    fn test_bad_color_is_an_error() {
        assert!(matches!(
            HostConfig::from_json_str(r#"{"foreground": "red"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.json");
        fs::write(&path, r#"{"max_widget_extent": 64}"#).unwrap();
        assert_eq!(HostConfig::load(&path).unwrap().max_widget_extent, 64);
        assert!(matches!(
            HostConfig::load(dir.path().join("missing.json")),
            Err(ConfigError::Read(_))
        ));
    }
}
