use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::canvas::DEFAULT_POINT_SIZE;
use crate::error::AnnotateError;
use crate::history::DEFAULT_DEPTH;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassConfig {
    pub name: String,
    /// `#rrggbb`
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_classes")]
    pub classes: Vec<ClassConfig>,
    /// Corner handle radius, in image pixels.
    #[serde(default = "default_point_size")]
    pub point_size: f32,
    /// Fill opacity of boxes, 0..=1.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default = "default_line_width")]
    pub line_width: f32,
    #[serde(default = "default_undo_depth")]
    pub undo_depth: usize,
    #[serde(default = "default_true")]
    pub autosave: bool,
}

fn default_classes() -> Vec<ClassConfig> {
    [("object", "#ff0000"), ("person", "#00c000"), ("vehicle", "#0060ff")]
        .into_iter()
        .map(|(name, color)| ClassConfig {
            name: name.to_string(),
            color: color.to_string(),
        })
        .collect()
}

fn default_point_size() -> f32 {
    DEFAULT_POINT_SIZE
}

fn default_opacity() -> f32 {
    0.3
}

fn default_line_width() -> f32 {
    3.0
}

fn default_undo_depth() -> usize {
    DEFAULT_DEPTH
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            classes: default_classes(),
            point_size: default_point_size(),
            opacity: default_opacity(),
            line_width: default_line_width(),
            undo_depth: default_undo_depth(),
            autosave: true,
        }
    }
}

impl AppConfig {
    pub fn class_names(&self) -> Vec<String> {
        self.classes.iter().map(|c| c.name.clone()).collect()
    }

    pub fn colormap(&self) -> Result<HashMap<String, egui::Color32>, AnnotateError> {
        self.classes
            .iter()
            .map(|c| {
                let color = egui::Color32::from_hex(&c.color).map_err(|_| {
                    AnnotateError::InvalidColor {
                        class: c.name.clone(),
                        color: c.color.clone(),
                    }
                })?;
                Ok((c.name.clone(), color))
            })
            .collect()
    }
}

/// Default location: `<config dir>/box-annotate/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("box-annotate").join("config.toml"))
}

/// Load configuration, falling back to defaults when the file is absent.
/// A file that exists but doesn't parse, or names an invalid color, is an error.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, AnnotateError> {
    let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
        log::warn!("no config directory available, using defaults");
        return Ok(AppConfig::default());
    };
    if !path.exists() {
        log::warn!("config {} not found, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|source| AnnotateError::Io {
        path: path.clone(),
        source,
    })?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|source| AnnotateError::Config { path, source })?;
    config.colormap()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "point_size = 8.0\n\n[[classes]]\nname = \"cat\"\ncolor = \"#112233\"\n",
        )
        .unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.point_size, 8.0);
        assert_eq!(config.opacity, 0.3);
        assert_eq!(config.class_names(), vec!["cat".to_string()]);
        assert_eq!(
            config.colormap().unwrap()["cat"],
            egui::Color32::from_rgb(0x11, 0x22, 0x33)
        );
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[[classes]]\nname = \"cat\"\ncolor = \"red\"\n").unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(AnnotateError::InvalidColor { .. })
        ));
    }

    #[test]
    fn test_bad_toml_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "point_size = [").unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(AnnotateError::Config { .. })
        ));
    }
}
