//! Propagation configuration and the explosion preset catalog.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bitflags::bitflags;
use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::enums::{PropagationMode, ShapeKind, TileKind};

pub const BUILTIN_PRESETS: &str = include_str!("data/presets.json");

bitflags! {
    /// Tile layers that stop a blast.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ObstacleLayers: u8 {
        const WALLS = 1 << 0;
        const CLOSED_DOORS = 1 << 1;
        const WINDOWS = 1 << 2;
    }
}

impl Default for ObstacleLayers {
    fn default() -> Self {
        ObstacleLayers::WALLS | ObstacleLayers::CLOSED_DOORS
    }
}

impl ObstacleLayers {
    /// Whether a tile of `kind` stops a ray on these layers.
    pub fn blocks(self, kind: TileKind) -> bool {
        match kind {
            TileKind::Wall => self.contains(ObstacleLayers::WALLS),
            TileKind::DoorClosed => self.contains(ObstacleLayers::CLOSED_DOORS),
            TileKind::Window => self.contains(ObstacleLayers::WINDOWS),
            TileKind::Space | TileKind::Floor | TileKind::DoorOpen => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse preset catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read preset catalog from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("duplicate preset id {id}")]
    Duplicate { id: String },
    #[error("unknown preset {id}")]
    UnknownPreset { id: String },
}

/// Immutable description of one explosion or pulse.
///
/// Created once per triggering action and read-only for the lifetime of
/// the propagation it starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationEvent {
    /// Cell the blast is centered on.
    pub origin: IVec2,
    /// Radius in tiles.
    pub radius: f32,
    pub shape: ShapeKind,
    pub mode: PropagationMode,
    /// Radius misses by up to a quarter of itself.
    pub unstable_radius: bool,
    /// Damage at the center.
    pub damage: i32,
    /// Widens the falloff so boundary cells still take damage.
    pub min_damage: i32,
    /// Shake reaches `shake_distance * radius` tiles.
    pub shake_distance: f32,
    /// Overlay lifetime at the edge (seconds).
    pub min_effect_duration: f32,
    /// Overlay lifetime at the center (seconds).
    pub max_effect_duration: f32,
    pub obstacles: ObstacleLayers,
}

impl Default for PropagationEvent {
    fn default() -> Self {
        Self {
            origin: IVec2::ZERO,
            radius: DEFAULT_RADIUS,
            shape: ShapeKind::default(),
            mode: PropagationMode::default(),
            unstable_radius: false,
            damage: DEFAULT_DAMAGE,
            min_damage: DEFAULT_MIN_DAMAGE,
            shake_distance: DEFAULT_SHAKE_DISTANCE,
            min_effect_duration: DEFAULT_MIN_EFFECT_DURATION,
            max_effect_duration: DEFAULT_MAX_EFFECT_DURATION,
            obstacles: ObstacleLayers::default(),
        }
    }
}

impl PropagationEvent {
    /// Default explosion centered on `origin`.
    pub fn at(origin: IVec2) -> Self {
        Self {
            origin,
            ..Default::default()
        }
    }

    /// Default pulse centered on `origin`.
    pub fn emp_at(origin: IVec2) -> Self {
        Self {
            origin,
            mode: PropagationMode::Emp,
            ..Default::default()
        }
    }

    pub fn with_origin(mut self, origin: IVec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_shape(mut self, shape: ShapeKind) -> Self {
        self.shape = shape;
        self
    }

    pub fn is_emp(&self) -> bool {
        self.mode == PropagationMode::Emp
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.damage < 0 {
            return Err(ConfigError::Invalid {
                field: "damage",
                reason: format!("must be >= 0, got {}", self.damage),
            });
        }
        if !self.radius.is_finite() || !(0.0..=MAX_RADIUS).contains(&self.radius) {
            return Err(ConfigError::Invalid {
                field: "radius",
                reason: format!("must be within 0..={MAX_RADIUS}, got {}", self.radius),
            });
        }
        if (self.radius + self.radius) + self.min_damage as f32 <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "min_damage",
                reason: format!(
                    "2 * radius + min_damage must be > 0, got radius {} and min_damage {}",
                    self.radius, self.min_damage
                ),
            });
        }
        if !self.shake_distance.is_finite() || self.shake_distance < 0.0 {
            return Err(ConfigError::Invalid {
                field: "shake_distance",
                reason: format!("must be finite and >= 0, got {}", self.shake_distance),
            });
        }
        if self.min_effect_duration.is_nan() || self.min_effect_duration < 0.0 {
            return Err(ConfigError::Invalid {
                field: "min_effect_duration",
                reason: format!("must be >= 0, got {}", self.min_effect_duration),
            });
        }
        if self.max_effect_duration.is_nan()
            || self.max_effect_duration < self.min_effect_duration
        {
            return Err(ConfigError::Invalid {
                field: "max_effect_duration",
                reason: format!(
                    "must be >= min_effect_duration ({}), got {}",
                    self.min_effect_duration, self.max_effect_duration
                ),
            });
        }
        Ok(())
    }
}

/// Named explosion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplosionPreset {
    pub id: String,
    #[serde(flatten)]
    pub event: PropagationEvent,
}

/// Catalog of named presets (grenades, bombs, pulses).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetCatalog {
    pub version: u32,
    pub presets: Vec<ExplosionPreset>,
}

impl PresetCatalog {
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_PRESETS).expect("builtin preset catalog should parse")
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let catalog: PresetCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&contents)?;
        tracing::info!(
            target: "blastwave::config",
            path = %path.display(),
            presets = catalog.presets.len(),
            "presets.loaded=file"
        );
        Ok(catalog)
    }

    /// Copy of the named preset, centered on `origin`.
    pub fn instantiate(&self, id: &str, origin: IVec2) -> Result<PropagationEvent, ConfigError> {
        self.presets
            .iter()
            .find(|preset| preset.id == id)
            .map(|preset| preset.event.clone().with_origin(origin))
            .ok_or_else(|| ConfigError::UnknownPreset { id: id.to_string() })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|preset| preset.id.as_str())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for preset in &self.presets {
            if !seen.insert(preset.id.as_str()) {
                return Err(ConfigError::Duplicate {
                    id: preset.id.clone(),
                });
            }
            preset.event.validate()?;
        }
        Ok(())
    }
}
