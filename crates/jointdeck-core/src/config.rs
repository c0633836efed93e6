use std::collections::HashMap;
use std::path::PathBuf;

use bevy::prelude::Resource;
use serde::Deserialize;

use crate::color::ColorSpec;
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// UpAxis
// ---------------------------------------------------------------------------

/// Which axis of the robot description points up, e.g. `+Z` or `-Y`.
///
/// URDF models are conventionally Z-up; the scene rotates the robot root so
/// the configured axis lands on the renderer's +Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum UpAxis {
    PosX,
    NegX,
    PosY,
    NegY,
    #[default]
    PosZ,
    NegZ,
}

impl UpAxis {
    /// Unit vector `[x, y, z]` of this axis in the robot's own frame.
    #[must_use]
    pub const fn unit(self) -> [f32; 3] {
        match self {
            Self::PosX => [1.0, 0.0, 0.0],
            Self::NegX => [-1.0, 0.0, 0.0],
            Self::PosY => [0.0, 1.0, 0.0],
            Self::NegY => [0.0, -1.0, 0.0],
            Self::PosZ => [0.0, 0.0, 1.0],
            Self::NegZ => [0.0, 0.0, -1.0],
        }
    }
}

impl std::str::FromStr for UpAxis {
    type Err = ConfigError;

    /// Accepts an optional sign followed by an axis letter, case-insensitive:
    /// `"+Z"`, `"z"`, `"-y"`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, axis) = match trimmed.strip_prefix(['+', '-']) {
            Some(rest) => (trimmed.starts_with('-'), rest),
            None => (false, trimmed),
        };
        match (axis.to_ascii_lowercase().as_str(), negative) {
            ("x", false) => Ok(Self::PosX),
            ("x", true) => Ok(Self::NegX),
            ("y", false) => Ok(Self::PosY),
            ("y", true) => Ok(Self::NegY),
            ("z", false) => Ok(Self::PosZ),
            ("z", true) => Ok(Self::NegZ),
            _ => Err(ConfigError::InvalidUpAxis(s.into())),
        }
    }
}

impl TryFrom<String> for UpAxis {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// ViewerConfig
// ---------------------------------------------------------------------------

/// Main viewer configuration.
///
/// Mirrors the attribute surface of the viewer: where the robot description
/// comes from, how `package://` mesh references resolve, scene orientation,
/// and the display toggles.
#[derive(Debug, Clone, PartialEq, Deserialize, Resource)]
pub struct ViewerConfig {
    /// Ordered URDF source candidates. The first one that loads wins; the
    /// chain failing entirely is a fatal load error.
    #[serde(default)]
    pub sources: Vec<PathBuf>,

    /// Named roots for `package://<name>/...` mesh references.
    #[serde(default)]
    pub packages: HashMap<String, PathBuf>,

    /// Fallback root for `package://` references with no named entry.
    #[serde(default)]
    pub package_root: Option<PathBuf>,

    /// Up axis of the robot description (default: `+Z`).
    #[serde(default)]
    pub up: UpAxis,

    /// Cast shadows and show the ground plane that catches them.
    #[serde(default = "default_true")]
    pub display_shadow: bool,

    /// Reapply every joint pose each frame instead of only on change.
    #[serde(default)]
    pub auto_redraw: bool,

    /// Ambient light color, in any accepted color shape. `None` keeps the
    /// default white ambient.
    #[serde(default)]
    pub ambient_color: Option<ColorSpec>,

    /// Show the joint side panel.
    #[serde(default = "default_true")]
    pub show_panel: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            packages: HashMap::default(),
            package_root: None,
            up: UpAxis::default(),
            display_shadow: true,
            auto_redraw: false,
            ambient_color: None,
            show_panel: true,
        }
    }
}

impl ViewerConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        Ok(())
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- UpAxis parsing ----

    #[test]
    fn up_axis_parses_signed_and_unsigned() {
        assert_eq!("+Z".parse::<UpAxis>().unwrap(), UpAxis::PosZ);
        assert_eq!("Z".parse::<UpAxis>().unwrap(), UpAxis::PosZ);
        assert_eq!("z".parse::<UpAxis>().unwrap(), UpAxis::PosZ);
        assert_eq!("-Y".parse::<UpAxis>().unwrap(), UpAxis::NegY);
        assert_eq!("-y".parse::<UpAxis>().unwrap(), UpAxis::NegY);
        assert_eq!("+x".parse::<UpAxis>().unwrap(), UpAxis::PosX);
    }

    #[test]
    fn up_axis_rejects_garbage() {
        assert!("".parse::<UpAxis>().is_err());
        assert!("+W".parse::<UpAxis>().is_err());
        assert!("zz".parse::<UpAxis>().is_err());
        assert!("+".parse::<UpAxis>().is_err());
    }

    #[test]
    fn up_axis_unit_vectors() {
        assert_eq!(UpAxis::PosZ.unit(), [0.0, 0.0, 1.0]);
        assert_eq!(UpAxis::NegY.unit(), [0.0, -1.0, 0.0]);
        assert_eq!(UpAxis::NegX.unit(), [-1.0, 0.0, 0.0]);
    }

    #[test]
    fn up_axis_default_is_pos_z() {
        assert_eq!(UpAxis::default(), UpAxis::PosZ);
    }

    // ---- ViewerConfig defaults ----

    #[test]
    fn config_default_values() {
        let cfg = ViewerConfig::default();
        assert!(cfg.sources.is_empty());
        assert!(cfg.packages.is_empty());
        assert!(cfg.package_root.is_none());
        assert_eq!(cfg.up, UpAxis::PosZ);
        assert!(cfg.display_shadow);
        assert!(!cfg.auto_redraw);
        assert!(cfg.ambient_color.is_none());
        assert!(cfg.show_panel);
    }

    // ---- ViewerConfig validate ----

    #[test]
    fn config_validate_requires_sources() {
        let cfg = ViewerConfig::default();
        assert!(matches!(cfg.validate(), Err(ConfigError::NoSources)));
    }

    #[test]
    fn config_validate_ok_with_source() {
        let cfg = ViewerConfig {
            sources: vec![PathBuf::from("robot.urdf")],
            ..ViewerConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    // ---- TOML deserialization ----

    #[test]
    fn config_toml_deserialization() {
        let toml_str = r#"
            sources = ["robots/arm.urdf", "fallback/arm.urdf"]
            up = "-Y"
            display_shadow = false
            auto_redraw = true
            ambient_color = "0.5 0.5 0.5 1.0"
            show_panel = false

            [packages]
            arm_description = "assets/arm_description"
        "#;
        let cfg: ViewerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.sources.len(), 2);
        assert_eq!(cfg.sources[0], PathBuf::from("robots/arm.urdf"));
        assert_eq!(
            cfg.packages["arm_description"],
            PathBuf::from("assets/arm_description")
        );
        assert_eq!(cfg.up, UpAxis::NegY);
        assert!(!cfg.display_shadow);
        assert!(cfg.auto_redraw);
        assert_eq!(
            cfg.ambient_color,
            Some(ColorSpec::Text("0.5 0.5 0.5 1.0".into()))
        );
        assert!(!cfg.show_panel);
    }

    #[test]
    fn config_toml_defaults() {
        let cfg: ViewerConfig = toml::from_str(r#"sources = ["a.urdf"]"#).unwrap();
        assert_eq!(cfg.up, UpAxis::PosZ);
        assert!(cfg.display_shadow);
        assert!(!cfg.auto_redraw);
        assert!(cfg.ambient_color.is_none());
    }

    #[test]
    fn config_toml_ambient_color_array_shape() {
        let cfg: ViewerConfig =
            toml::from_str("sources = [\"a.urdf\"]\nambient_color = [1.0, 0.5, 0.25]").unwrap();
        assert_eq!(
            cfg.ambient_color,
            Some(ColorSpec::Channels(vec![1.0, 0.5, 0.25]))
        );
    }

    #[test]
    fn config_toml_invalid_up_axis() {
        let result: Result<ViewerConfig, _> = toml::from_str(r#"up = "sideways""#);
        assert!(result.is_err());
    }

    // ---- from_file ----

    #[test]
    fn config_from_file() {
        let dir = std::env::temp_dir().join("jointdeck_test_config");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("viewer.toml");
        std::fs::write(
            &path,
            r#"
            sources = ["robot.urdf"]
            up = "+Y"
        "#,
        )
        .unwrap();

        let cfg = ViewerConfig::from_file(&path).unwrap();
        assert_eq!(cfg.sources, vec![PathBuf::from("robot.urdf")]);
        assert_eq!(cfg.up, UpAxis::PosY);

        // Cleanup
        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_dir(&dir);
    }

    #[test]
    fn config_from_file_without_sources_is_invalid() {
        let dir = std::env::temp_dir().join("jointdeck_test_config_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.toml");
        std::fs::write(&path, "display_shadow = true").unwrap();

        let result = ViewerConfig::from_file(&path);
        assert!(matches!(result, Err(ConfigError::NoSources)));

        // Cleanup
        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_dir(&dir);
    }

    #[test]
    fn config_from_file_not_found() {
        let result = ViewerConfig::from_file("/nonexistent/viewer.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
