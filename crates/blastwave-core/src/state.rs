//! Engine snapshot: the complete observable state handed to the host each tick.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{EffectEvent, FeedbackEvent};
use crate::types::SimTime;

/// Everything a host needs to render or replay the current tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub time: SimTime,
    pub propagations: Vec<PropagationView>,
    pub overlays: Vec<OverlayView>,
    pub entities: Vec<EntityView>,
    /// Tiles worn below full integrity or exposed to a hotspot.
    pub scarred_tiles: Vec<TileView>,
    pub effect_events: Vec<EffectEvent>,
    pub feedback_events: Vec<FeedbackEvent>,
}

/// A propagation that has not completed yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationView {
    pub id: u32,
    pub origin: IVec2,
    pub mode: PropagationMode,
    pub phase: PropagationPhase,
    /// Radius after instability jitter.
    pub radius: f32,
    pub cell_count: usize,
    /// Seconds the propagation waits on its longest overlay.
    pub max_duration_secs: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayView {
    pub cell: IVec2,
    pub kind: OverlayKind,
    pub remaining_secs: f32,
}

/// An entity with at least one effect sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    /// Registry handle in its bit form.
    pub entity: u64,
    /// None while stored in a container.
    pub position: Option<IVec2>,
    pub health: Option<f32>,
    pub integrity: Option<f32>,
    pub emp_pulses: u32,
    pub disabled_secs: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileView {
    pub cell: IVec2,
    pub kind: TileKind,
    pub integrity: f32,
    pub hotspot: Option<f32>,
}
