//! Application Settings
//!
//! Every tunable of the portfolio scene lives here: renderer knobs, the light
//! rig and fog, the avatar asset and its clips, camera rig constants, and the
//! decorative props. Defaults reproduce the shipped scene exactly, so a missing
//! settings file is never an error.
//!
//! Settings are plain JSON (`serde_json`). Unknown fields are rejected, missing
//! fields fall back to their defaults.
//!
//! ```rust,ignore
//! use journey::settings::Settings;
//!
//! // Reads the file named by `JOURNEY_SETTINGS`, or the defaults.
//! let settings = Settings::from_env()?;
//! ```

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{JourneyError, Result};
use crate::experience::journey::Waypoint;

/// Environment variable naming an optional JSON settings file.
pub const SETTINGS_ENV_VAR: &str = "JOURNEY_SETTINGS";

// ---------------------------------------------------------------------------
// Root
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub render: RenderSettings,
    pub experience: ExperienceSettings,
}

impl Settings {
    /// Loads and validates settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                JourneyError::AssetNotFound(path.display().to_string())
            } else {
                JourneyError::IoError(e)
            }
        })?;
        let settings = Self::from_json(&text)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parses and validates settings from a JSON string.
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads the file named by [`SETTINGS_ENV_VAR`], or returns the defaults
    /// when the variable is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(SETTINGS_ENV_VAR) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => {
                log::info!("{SETTINGS_ENV_VAR} not set, using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Rejects values the scene cannot run with.
    pub fn validate(&self) -> Result<()> {
        let exp = &self.experience;

        let positive = [
            ("experience.fade_duration", exp.fade_duration),
            ("experience.avatar_scale", exp.avatar_scale),
            ("experience.camera.smoothing_rate", exp.camera.smoothing_rate),
            ("experience.hover_scale", exp.hover_scale),
            ("experience.props.size", exp.props.size),
            ("render.fov", self.render.fov),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(JourneyError::InvalidSettings(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if self.render.fog.far <= self.render.fog.near {
            return Err(JourneyError::InvalidSettings(format!(
                "render.fog.far ({}) must exceed render.fog.near ({})",
                self.render.fog.far, self.render.fog.near
            )));
        }

        if !self.render.shadow_map_size.is_power_of_two() {
            return Err(JourneyError::InvalidSettings(format!(
                "render.shadow_map_size must be a power of two, got {}",
                self.render.shadow_map_size
            )));
        }

        if let Some(waypoints) = &exp.waypoints
            && waypoints.is_empty()
        {
            return Err(JourneyError::InvalidSettings(
                "experience.waypoints must hold at least one waypoint".into(),
            ));
        }

        for hex in [&self.render.background, &self.render.fog.color] {
            if crate::utils::color::parse_hex(hex).is_none() {
                return Err(JourneyError::InvalidSettings(format!(
                    "`{hex}` is not a #rrggbb colour"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

/// GPU adapter preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerMode {
    LowPower,
    #[default]
    HighPerformance,
}

impl From<PowerMode> for wgpu::PowerPreference {
    fn from(mode: PowerMode) -> Self {
        match mode {
            PowerMode::LowPower => wgpu::PowerPreference::LowPower,
            PowerMode::HighPerformance => wgpu::PowerPreference::HighPerformance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FogSettings {
    /// `#rrggbb`
    pub color: String,
    pub near: f32,
    pub far: f32,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            color: "#f0f4f8".into(),
            near: 15.0,
            far: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    pub vsync: bool,
    pub power_preference: PowerMode,
    /// Edge length of the directional shadow map, in texels.
    pub shadow_map_size: u32,
    /// Half extent of the orthographic shadow frustum, in world units.
    pub shadow_extent: f32,
    /// `#rrggbb`
    pub background: String,
    pub fog: FogSettings,
    pub ambient_intensity: f32,
    pub sun_position: [f32; 3],
    pub sun_intensity: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            vsync: true,
            power_preference: PowerMode::HighPerformance,
            shadow_map_size: 2048,
            shadow_extent: 16.0,
            background: "#f0f4f8".into(),
            fog: FogSettings::default(),
            ambient_intensity: 1.5,
            sun_position: [5.0, 10.0, 7.0],
            sun_intensity: 2.5,
            fov: 50.0,
            near: 0.1,
            far: 200.0,
        }
    }
}

impl RenderSettings {
    #[must_use]
    pub fn sun_position(&self) -> Vec3 {
        Vec3::from_array(self.sun_position)
    }
}

// ---------------------------------------------------------------------------
// Experience
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraRigSettings {
    /// Exponential smoothing rate, per second.
    pub smoothing_rate: f32,
    pub overview_position: [f32; 3],
    /// Camera offset from the focused waypoint.
    pub focus_offset: [f32; 3],
    /// Height the look-at target is raised to (overview) or by (focused).
    pub look_lift: f32,
}

impl Default for CameraRigSettings {
    fn default() -> Self {
        Self {
            smoothing_rate: 1.5,
            overview_position: [0.0, 5.0, 12.0],
            focus_offset: [2.0, 2.5, 4.0],
            look_lift: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PropSettings {
    pub count: usize,
    pub seed: u64,
    pub size: f32,
}

impl Default for PropSettings {
    fn default() -> Self {
        Self {
            count: 10,
            seed: 42,
            size: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperienceSettings {
    pub model_path: PathBuf,
    pub avatar_position: [f32; 3],
    pub avatar_scale: f32,
    pub idle_clip: String,
    pub hero_clip: String,
    /// Cross-fade window between clips, in seconds.
    pub fade_duration: f32,
    pub camera: CameraRigSettings,
    /// Marker scale while hovered.
    pub hover_scale: f32,
    pub props: PropSettings,
    /// Replaces the built-in journey when present.
    pub waypoints: Option<Vec<Waypoint>>,
}

impl Default for ExperienceSettings {
    fn default() -> Self {
        use crate::experience::journey::{HERO_DROP_CLIP, IDLE_CLIP};
        Self {
            model_path: PathBuf::from("assets/akash - idle.glb"),
            avatar_position: [0.0, -1.8, 2.0],
            avatar_scale: 1.8,
            idle_clip: IDLE_CLIP.into(),
            hero_clip: HERO_DROP_CLIP.into(),
            fade_duration: 0.5,
            camera: CameraRigSettings::default(),
            hover_scale: 1.2,
            props: PropSettings::default(),
            waypoints: None,
        }
    }
}

impl ExperienceSettings {
    #[must_use]
    pub fn avatar_position(&self) -> Vec3 {
        Vec3::from_array(self.avatar_position)
    }

    /// The configured journey, or the built-in one.
    #[must_use]
    pub fn journey(&self) -> Vec<Waypoint> {
        self.waypoints
            .clone()
            .unwrap_or_else(crate::experience::journey::default_journey)
    }
}
