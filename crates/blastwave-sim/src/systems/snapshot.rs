//! Snapshot system: queries the world, tiles and scheduler and builds an `EngineSnapshot`.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use blastwave_core::components::*;
use blastwave_core::events::{EffectEvent, FeedbackEvent};
use blastwave_core::state::*;
use blastwave_core::types::SimTime;
use blastwave_grid::TileMap;

use crate::overlay::OverlayScheduler;
use crate::propagation::Propagation;

/// Build a complete snapshot from the current engine state.
pub fn build_snapshot(
    world: &World,
    tiles: &TileMap,
    overlays: &OverlayScheduler,
    propagations: &[Propagation],
    time: &SimTime,
    effect_events: Vec<EffectEvent>,
    feedback_events: Vec<FeedbackEvent>,
) -> EngineSnapshot {
    EngineSnapshot {
        time: *time,
        propagations: build_propagations(propagations),
        overlays: build_overlays(overlays),
        entities: build_entities(world),
        scarred_tiles: build_scarred_tiles(tiles),
        effect_events,
        feedback_events,
    }
}

fn build_propagations(propagations: &[Propagation]) -> Vec<PropagationView> {
    let mut views: Vec<PropagationView> = propagations
        .iter()
        .map(|p| PropagationView {
            id: p.id,
            origin: p.event().origin,
            mode: p.event().mode,
            phase: p.phase(),
            radius: p.radius(),
            cell_count: p.cells().len(),
            max_duration_secs: p.max_duration(),
        })
        .collect();

    views.sort_by_key(|v| v.id);
    views
}

fn build_overlays(overlays: &OverlayScheduler) -> Vec<OverlayView> {
    overlays
        .timers()
        .iter()
        .map(|t| OverlayView {
            cell: t.cell,
            kind: t.kind,
            remaining_secs: t.remaining_secs,
        })
        .collect()
}

/// Every entity that can take damage or a pulse, ordered by handle.
fn build_entities(world: &World) -> Vec<EntityView> {
    let mut views: Vec<EntityView> = world
        .iter()
        .filter(|e| e.has::<Vitals>() || e.has::<Integrity>() || e.has::<EmpReceiver>())
        .map(|e| {
            let receiver = e.get::<&EmpReceiver>().map(|r| *r).unwrap_or_default();
            EntityView {
                entity: e.entity().to_bits().get(),
                position: e.get::<&GridPosition>().map(|p| p.0),
                health: e.get::<&Vitals>().map(|v| v.health),
                integrity: e.get::<&Integrity>().map(|i| i.current),
                emp_pulses: receiver.pulses,
                disabled_secs: receiver.disabled_secs,
            }
        })
        .collect();

    views.sort_by_key(|v| v.entity);
    views
}

fn build_scarred_tiles(tiles: &TileMap) -> Vec<TileView> {
    tiles
        .cells()
        .filter(|(_, tile)| tile.hotspot.is_some() || tile.integrity < tile.kind.max_integrity())
        .map(|(cell, tile)| TileView {
            cell,
            kind: tile.kind,
            integrity: tile.integrity,
            hotspot: tile.hotspot,
        })
        .collect()
}
