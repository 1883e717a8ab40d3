//! One in-flight area effect, from shape generation to completion.

use glam::IVec2;

use blastwave_core::config::PropagationEvent;
use blastwave_core::constants::EXPLOSION_HOTSPOT_TEMPERATURE;
use blastwave_core::enums::{PropagationMode, PropagationPhase};
use blastwave_core::events::EffectEvent;
use blastwave_core::services::{EntityRegistry, OcclusionQuery, TileService};
use blastwave_core::types::cell_distance;
use blastwave_grid::{is_past_wall, shape};

use crate::dispatch::{self, EventDedup};
use crate::falloff;
use crate::overlay::OverlayScheduler;

/// A triggered propagation event and its progress.
#[derive(Debug, Clone)]
pub struct Propagation {
    pub id: u32,
    event: PropagationEvent,
    /// Radius after instability jitter.
    radius: f32,
    phase: PropagationPhase,
    cells: Vec<IVec2>,
    dedup: EventDedup,
    /// Longest overlay this propagation actually placed.
    max_duration: f32,
    waited_secs: f32,
}

impl Propagation {
    pub fn new(id: u32, event: PropagationEvent, radius: f32) -> Self {
        Self {
            id,
            event,
            radius,
            phase: PropagationPhase::Created,
            cells: Vec::new(),
            dedup: EventDedup::default(),
            max_duration: 0.0,
            waited_secs: 0.0,
        }
    }

    pub fn phase(&self) -> PropagationPhase {
        self.phase
    }

    pub fn event(&self) -> &PropagationEvent {
        &self.event
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn cells(&self) -> &[IVec2] {
        &self.cells
    }

    pub fn max_duration(&self) -> f32 {
        self.max_duration
    }

    pub fn affected_entities(&self) -> usize {
        self.dedup.affected()
    }

    /// Generate the footprint once. Later calls return the cached cell count.
    pub fn generate_shape(&mut self) -> usize {
        if self.phase == PropagationPhase::Created {
            self.cells = shape::generate(&self.event.shape, self.event.origin, self.radius as i32);
            self.phase = PropagationPhase::ShapeGenerated;
        }
        self.cells.len()
    }

    /// Walk every cell in emission order and apply the effect.
    ///
    /// Within a cell, occlusion is checked before damage and damage is applied
    /// before the overlay is placed. Leaves the propagation waiting on its
    /// longest overlay.
    pub fn iterate<T, R>(
        &mut self,
        tiles: &mut T,
        registry: &mut R,
        overlays: &mut OverlayScheduler,
        events: &mut Vec<EffectEvent>,
    ) where
        T: TileService + OcclusionQuery,
        R: EntityRegistry + ?Sized,
    {
        if self.phase != PropagationPhase::ShapeGenerated {
            return;
        }
        self.phase = PropagationPhase::Iterating;

        let origin = self.event.origin;
        let overlay = self.event.mode.overlay();
        let cells = std::mem::take(&mut self.cells);

        for &cell in &cells {
            let distance = cell_distance(origin, cell);
            let damage = falloff::damage(distance, self.event.damage, self.radius, self.event.min_damage);
            let raw = falloff::duration(
                cell,
                origin,
                self.radius,
                self.event.min_effect_duration,
                self.event.max_effect_duration,
            );
            let duration = falloff::normalize_duration(
                raw,
                self.event.min_effect_duration,
                self.event.max_effect_duration,
            );

            match self.event.mode {
                PropagationMode::Emp => {
                    if damage > 0 {
                        dispatch::dispatch_emp(registry, cell, damage, &mut self.dedup, self.id, events);
                    }
                }
                PropagationMode::Normal => {
                    if !is_past_wall(&*tiles, origin, cell, distance, self.event.obstacles) {
                        continue;
                    }
                    tiles.heat_atmosphere(cell, EXPLOSION_HOTSPOT_TEMPERATURE);
                    if damage > 0 {
                        dispatch::dispatch_normal(
                            registry,
                            tiles,
                            cell,
                            damage,
                            &mut self.dedup,
                            self.id,
                            events,
                        );
                    }
                }
            }

            if let Some(issued) = overlays.place_and_expire(tiles, cell, overlay, duration) {
                self.max_duration = self.max_duration.max(issued);
                events.push(EffectEvent::OverlayPlaced {
                    cell,
                    kind: overlay,
                    duration_secs: issued,
                });
            }
        }

        self.cells = cells;
        self.phase = PropagationPhase::AwaitingOverlays;
    }

    /// Let `dt` seconds pass. Returns true once the longest overlay has elapsed.
    pub fn wait(&mut self, dt: f32) -> bool {
        match self.phase {
            PropagationPhase::AwaitingOverlays => {
                self.waited_secs += dt;
                if self.waited_secs >= self.max_duration {
                    self.phase = PropagationPhase::Complete;
                }
            }
            PropagationPhase::Complete => {}
            _ => return false,
        }
        self.phase == PropagationPhase::Complete
    }
}
