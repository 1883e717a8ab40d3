//! Events emitted by the engine for hosts, audio and tests.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Observable side effects of propagations, drained by the host every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EffectEvent {
    /// A propagation generated its shape and started iterating.
    Started {
        propagation_id: u32,
        origin: IVec2,
        mode: PropagationMode,
        cell_count: usize,
    },
    /// Damage applied to a living thing or an object.
    /// `entity` is the registry handle in its bit form.
    Damaged {
        propagation_id: u32,
        entity: u64,
        amount: i32,
        living: bool,
    },
    /// Damage applied to the tile layer.
    TileDamaged {
        propagation_id: u32,
        cell: IVec2,
        amount: i32,
    },
    /// EMP handler invoked on an entity.
    Pulsed {
        propagation_id: u32,
        entity: u64,
        strength: i32,
    },
    /// Overlay placed on a cell.
    OverlayPlaced {
        cell: IVec2,
        kind: OverlayKind,
        duration_secs: f32,
    },
    /// Overlay timer elapsed and the overlay was removed.
    OverlayExpired { cell: IVec2, kind: OverlayKind },
    /// Longest overlay of a propagation elapsed; the propagation is gone.
    Completed { propagation_id: u32 },
}

/// Fire-and-forget audio/visual feedback for the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeedbackEvent {
    /// Play a clip at a grid position.
    PlayAtPosition { clip: SoundClip, position: IVec2 },
    /// Shake cameras within `distance` tiles of `position`.
    Shake {
        position: IVec2,
        intensity: u8,
        distance: i32,
    },
}
