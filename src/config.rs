//! Viewer options with TOML file support.
//!
//! Every section uses `#[serde(default)]`, so a partial file (for example
//! only a `[pacing]` table) fills everything else from the defaults.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::simulation::DemoKind;

/// Top-level options container
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowOptions,
    pub pacing: PacingOptions,
    pub camera: CameraOptions,
    /// Demo loaded before the first frame
    pub startup_demo: DemoKind,
    pub keybindings: KeybindingOptions,
}

impl ViewerConfig {
    /// Loads options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, EngineError> {
        match path {
            Some(path) => {
                log::info!("loading options from {}", path.display());
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Saves options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "Particle Engine".to_owned(),
            width: 1024,
            height: 768,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PacingOptions {
    /// Frame rate the loop sleeps toward (0 = unlimited)
    pub target_fps: u32,
    /// Turn off to run as fast as the renderer allows
    pub limit_frame_rate: bool,
    /// Present in FIFO mode. Paused frames skip the sleep, so this is what
    /// holds their rate.
    pub vsync: bool,
}

impl Default for PacingOptions {
    fn default() -> Self {
        Self {
            target_fps: 60,
            limit_frame_rate: true,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraOptions {
    /// Default (and reset) camera position
    pub position: [f32; 3],
    /// Default (and reset) look-at point
    pub target: [f32; 3],
    /// World units per wheel notch per second
    pub zoom_speed: f32,
    /// World units per dragged pixel per second
    pub pan_speed: f32,
    /// Time step used to integrate camera input each tick, independent of
    /// the measured frame duration
    pub fixed_dt: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 30.0],
            target: [0.0, 0.0, 0.0],
            zoom_speed: 60.0,
            pan_speed: 3.0,
            fixed_dt: 1.0 / 60.0,
            fov_y: std::f32::consts::FRAC_PI_2,
            aspect: 1.0,
            z_near: 0.1,
            z_far: 60.0,
        }
    }
}

/// Engine-level actions that can be bound to keys.
///
/// Serialized as `snake_case` strings:
/// ```toml
/// [keybindings.actions]
/// KeyP = "toggle_pause"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    TogglePause,
    Step,
    ResetCamera,
    ToggleParticles,
    ReloadDemo,
    Quit,
}

/// Key bindings, keyed by winit `KeyCode` names (`"KeyP"`, `"Numpad1"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeybindingOptions {
    /// Key → engine action
    pub actions: BTreeMap<String, KeyAction>,
    /// Key → demo to switch to
    pub demo_select: BTreeMap<String, DemoKind>,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let actions = BTreeMap::from([
            ("KeyP".to_owned(), KeyAction::TogglePause),
            ("KeyS".to_owned(), KeyAction::Step),
            ("KeyC".to_owned(), KeyAction::ResetCamera),
            ("KeyT".to_owned(), KeyAction::ToggleParticles),
            ("KeyR".to_owned(), KeyAction::ReloadDemo),
            ("Escape".to_owned(), KeyAction::Quit),
        ]);

        let mut demo_select = BTreeMap::new();
        for (i, kind) in DemoKind::ALL.iter().enumerate() {
            demo_select.insert(format!("Numpad{}", i + 1), *kind);
            demo_select.insert(format!("Digit{}", i + 1), *kind);
        }

        Self {
            actions,
            demo_select,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_toml() {
        let config = ViewerConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ViewerConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml_str = r#"
startup_demo = "galaxy_n_body"

[pacing]
target_fps = 30
"#;
        let config: ViewerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.pacing.target_fps, 30);
        assert!(config.pacing.limit_frame_rate);
        assert!(config.pacing.vsync);
        assert_eq!(config.startup_demo, DemoKind::GalaxyNBody);
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.camera.position, [0.0, 0.0, 30.0]);
    }

    #[test]
    fn test_default_bindings_cover_every_demo() {
        let bindings = KeybindingOptions::default();
        assert_eq!(bindings.demo_select.get("Numpad1"), Some(&DemoKind::Fluid));
        assert_eq!(
            bindings.demo_select.get("Numpad7"),
            Some(&DemoKind::TransitionBlend)
        );
        assert_eq!(bindings.actions.get("KeyP"), Some(&KeyAction::TogglePause));
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join("particle-engine-config-test");
        let path = dir.join("viewer.toml");
        let mut config = ViewerConfig::default();
        config.pacing.limit_frame_rate = false;
        config.save(&path).unwrap();

        let loaded = ViewerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = ViewerConfig::load(Path::new("/nonexistent/viewer.toml")).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
