//! Enumeration types used throughout the engine.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Footprint policy for a propagation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Every cell within Euclidean distance `radius`.
    #[default]
    Circle,
    /// Every cell within Chebyshev distance `radius`.
    Square,
    /// Center row and column only.
    Cross,
    /// Every cell within Manhattan distance `radius`.
    Diamond,
    /// Circle with a deterministically wobbled edge.
    Jagged,
    /// Explicit offsets relative to the origin.
    Custom(Vec<IVec2>),
}

/// What a propagation does to the cells it reaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropagationMode {
    /// Kinetic/thermal blast: occluded by walls, damages and heats.
    #[default]
    Normal,
    /// Electromagnetic pulse: passes through walls, disables devices.
    Emp,
}

impl PropagationMode {
    /// Overlay spawned on cells reached in this mode.
    pub fn overlay(self) -> OverlayKind {
        match self {
            PropagationMode::Normal => OverlayKind::Fire,
            PropagationMode::Emp => OverlayKind::Emp,
        }
    }

    /// Sound played at the origin when triggered.
    pub fn sound(self) -> SoundClip {
        match self {
            PropagationMode::Normal => SoundClip::Explosion,
            PropagationMode::Emp => SoundClip::EmpPulse,
        }
    }
}

/// Transient marker on the effects layer of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OverlayKind {
    Fire,
    Emp,
}

impl OverlayKind {
    /// Overlay tile name as the tile layer knows it.
    pub fn name(self) -> &'static str {
        match self {
            OverlayKind::Fire => "Fire",
            OverlayKind::Emp => "EMPEffect",
        }
    }
}

/// How an attack was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    Bomb,
}

/// What kind of harm an attack does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageKind {
    Brute,
    Burn,
}

/// Capability filter for registry lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Has vitals (crew, animals).
    Living,
    /// Has structural integrity (machines, items, furniture).
    Damageable,
    /// Reacts to EMP.
    EmpAffectable,
}

/// Lifecycle of a single propagation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropagationPhase {
    #[default]
    Created,
    ShapeGenerated,
    Iterating,
    AwaitingOverlays,
    Complete,
}

/// Audio clip requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundClip {
    Explosion,
    EmpPulse,
}

/// Structural tile on the base layer of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Space,
    Floor,
    Wall,
    Window,
    DoorOpen,
    DoorClosed,
}

impl TileKind {
    /// Integrity a fresh tile of this kind starts with.
    pub fn max_integrity(self) -> f32 {
        use crate::constants::*;
        match self {
            TileKind::Space => 0.0,
            TileKind::Floor => FLOOR_INTEGRITY,
            TileKind::Wall => WALL_INTEGRITY,
            TileKind::Window => WINDOW_INTEGRITY,
            TileKind::DoorOpen | TileKind::DoorClosed => DOOR_INTEGRITY,
        }
    }

    /// What is left once this tile's integrity runs out.
    pub fn destroyed_into(self) -> TileKind {
        match self {
            TileKind::Wall | TileKind::Window | TileKind::DoorOpen | TileKind::DoorClosed => {
                TileKind::Floor
            }
            TileKind::Floor | TileKind::Space => TileKind::Space,
        }
    }
}

/// Item trait tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemTrait {
    EmpResistant,
    Conductive,
}
