//! Collaborator interfaces consumed by the propagation engine.
//!
//! The engine never reaches for globals: the tile layer, the occlusion
//! raycaster and the entity registry are injected through these traits.
//! Implementations must tolerate sequential, non-reentrant calls from a
//! single propagation at a time.

use glam::IVec2;

use crate::config::ObstacleLayers;
use crate::enums::{AttackKind, Capability, DamageKind, OverlayKind};
use crate::types::EntityHandle;

/// Grid/tile layer of the world the propagation happens in.
pub trait TileService {
    /// Whether `cell` lies on this grid at all.
    fn contains(&self, cell: IVec2) -> bool;

    /// Whether an overlay of `kind` is currently on `cell`'s effects layer.
    fn has_overlay(&self, cell: IVec2, kind: OverlayKind) -> bool;

    fn add_overlay(&mut self, cell: IVec2, kind: OverlayKind);

    /// Remove every overlay of `kind` from `cell`.
    fn remove_overlays_of_kind(&mut self, cell: IVec2, kind: OverlayKind);

    /// Wear down the structural tile at `cell`. Off-grid cells are ignored.
    fn apply_tile_damage(&mut self, cell: IVec2, amount: i32, attack: AttackKind);

    /// Expose a hotspot of `temperature` kelvin to the gas at `cell`.
    fn heat_atmosphere(&mut self, cell: IVec2, temperature: f32);
}

/// Straight-line raycasts over obstacle layers.
pub trait OcclusionQuery {
    /// Cast from `from` toward `to` for at most `max_distance` tiles.
    /// Returns true if an obstacle in `obstacles` was hit before the target.
    fn cast(&self, from: IVec2, to: IVec2, max_distance: f32, obstacles: ObstacleLayers) -> bool;
}

/// Everything that can occupy a cell: crew, machines, items.
pub trait EntityRegistry {
    /// Distinct entities at `cell` with `capability`.
    /// With `include_stored`, items inside containers standing on `cell` count too.
    fn entities_at(
        &self,
        cell: IVec2,
        capability: Capability,
        include_stored: bool,
    ) -> Vec<EntityHandle>;

    /// Damage sink selected by `sink` (`Living` vitals or `Damageable` integrity).
    /// Returns false if the entity is gone or has no such sink.
    fn apply_damage(
        &mut self,
        entity: EntityHandle,
        sink: Capability,
        amount: i32,
        attack: AttackKind,
        damage: DamageKind,
    ) -> bool;

    /// EMP sink. Returns false if the entity is gone or has no EMP handler.
    fn on_emp(&mut self, entity: EntityHandle, strength: i32) -> bool;

    /// Items held in the entity's storage, empty if it has none.
    fn contained_items(&self, entity: EntityHandle) -> Vec<EntityHandle>;

    /// Resistant machines or items tagged `EmpResistant`.
    fn is_emp_resistant(&self, entity: EntityHandle) -> bool;
}
