//! Propagation engine: the core of the crate.
//!
//! `PropagationEngine` owns the tile map, the hecs world, the overlay
//! scheduler and every in-flight propagation. Triggering runs the cell walk
//! synchronously; overlay lifetimes and completion waits elapse as the host
//! calls `tick`. Completely headless, enabling deterministic testing.

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use blastwave_core::config::{ConfigError, PropagationEvent};
use blastwave_core::constants::TICK_RATE;
use blastwave_core::events::{EffectEvent, FeedbackEvent};
use blastwave_core::services::TileService;
use blastwave_core::state::EngineSnapshot;
use blastwave_core::types::SimTime;
use blastwave_grid::TileMap;
use glam::IVec2;

use crate::falloff;
use crate::overlay::OverlayScheduler;
use crate::propagation::Propagation;
use crate::systems;

/// Why a trigger was dropped before any cell was touched.
#[derive(Debug, Error)]
pub enum PropagationError {
    #[error("origin {origin} is not on the grid")]
    OffGrid { origin: IVec2 },
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Configuration for starting a new engine.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Ticks per simulated second.
    pub tick_rate: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate: TICK_RATE,
        }
    }
}

/// The propagation engine. Owns the world, the tiles and all effect state.
pub struct PropagationEngine {
    world: World,
    tiles: TileMap,
    overlays: OverlayScheduler,
    time: SimTime,
    dt: f32,
    rng: ChaCha8Rng,
    active: Vec<Propagation>,
    next_propagation_id: u32,
    despawn_buffer: Vec<hecs::Entity>,
    effect_events: Vec<EffectEvent>,
    feedback_events: Vec<FeedbackEvent>,
}

impl PropagationEngine {
    /// Create an engine over `tiles` with an empty world.
    pub fn new(config: SimConfig, tiles: TileMap) -> Self {
        Self {
            world: World::new(),
            tiles,
            overlays: OverlayScheduler::new(),
            time: SimTime::default(),
            dt: 1.0 / config.tick_rate.max(1) as f32,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            active: Vec::new(),
            next_propagation_id: 0,
            despawn_buffer: Vec::new(),
            effect_events: Vec::new(),
            feedback_events: Vec::new(),
        }
    }

    /// Set off a propagation event.
    ///
    /// Feedback is emitted and every cell is processed before this returns.
    /// Returns the propagation id, or `None` if the event was dropped
    /// (off-grid origin or invalid parameters).
    pub fn trigger(&mut self, event: PropagationEvent) -> Option<u32> {
        match self.try_trigger(event) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::debug!(target: "blastwave::propagation", error = %err, "propagation.dropped");
                None
            }
        }
    }

    /// Like [`trigger`](Self::trigger), but reports why an event was dropped.
    pub fn try_trigger(&mut self, event: PropagationEvent) -> Result<u32, PropagationError> {
        event.validate()?;
        if !self.tiles.contains(event.origin) {
            return Err(PropagationError::OffGrid {
                origin: event.origin,
            });
        }

        let id = self.next_propagation_id;
        self.next_propagation_id += 1;

        self.feedback_events.push(FeedbackEvent::PlayAtPosition {
            clip: event.mode.sound(),
            position: event.origin,
        });
        self.feedback_events.push(FeedbackEvent::Shake {
            position: event.origin,
            intensity: falloff::shake_intensity(event.damage),
            distance: (event.shake_distance * event.radius) as i32,
        });

        let radius = if event.unstable_radius {
            falloff::jitter_radius(event.radius, &mut self.rng)
        } else {
            event.radius
        };

        let mut propagation = Propagation::new(id, event, radius);
        let cell_count = propagation.generate_shape();
        self.effect_events.push(EffectEvent::Started {
            propagation_id: id,
            origin: propagation.event().origin,
            mode: propagation.event().mode,
            cell_count,
        });
        tracing::debug!(
            target: "blastwave::propagation",
            id,
            x = propagation.event().origin.x,
            y = propagation.event().origin.y,
            mode = ?propagation.event().mode,
            radius,
            cell_count,
            "propagation.started"
        );

        propagation.iterate(
            &mut self.tiles,
            &mut self.world,
            &mut self.overlays,
            &mut self.effect_events,
        );
        tracing::debug!(
            target: "blastwave::propagation",
            id,
            affected = propagation.affected_entities(),
            wait_secs = propagation.max_duration(),
            "propagation.iterated"
        );

        self.active.push(propagation);
        Ok(id)
    }

    /// Advance the engine by one tick and return the resulting snapshot.
    ///
    /// Events emitted since the previous tick (including those from
    /// `trigger`) are drained into the snapshot.
    pub fn tick(&mut self) -> EngineSnapshot {
        self.run_systems();
        self.time.advance_by(self.dt as f64);

        let effect_events = std::mem::take(&mut self.effect_events);
        let feedback_events = std::mem::take(&mut self.feedback_events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.tiles,
            &self.overlays,
            &self.active,
            &self.time,
            effect_events,
            feedback_events,
        )
    }

    /// Tick until no propagation or overlay is left, at most `max_ticks` times.
    /// Returns the snapshots of every tick run.
    pub fn run_until_idle(&mut self, max_ticks: u32) -> Vec<EngineSnapshot> {
        let mut snapshots = Vec::new();
        for _ in 0..max_ticks {
            if self.is_idle() {
                break;
            }
            snapshots.push(self.tick());
        }
        snapshots
    }

    /// Whether nothing is pending: no propagation waiting, no overlay burning.
    pub fn is_idle(&self) -> bool {
        self.active.is_empty() && self.overlays.is_empty()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Seconds per tick.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for spawning and editing entities.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn tiles(&self) -> &TileMap {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut TileMap {
        &mut self.tiles
    }

    pub fn overlays(&self) -> &OverlayScheduler {
        &self.overlays
    }

    /// Propagations that have not completed yet.
    pub fn active(&self) -> &[Propagation] {
        &self.active
    }

    /// Events emitted since the last tick, not yet drained.
    pub fn pending_effects(&self) -> &[EffectEvent] {
        &self.effect_events
    }

    pub fn pending_feedback(&self) -> &[FeedbackEvent] {
        &self.feedback_events
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Overlay timers
        for (cell, kind) in self.overlays.advance(&mut self.tiles, self.dt) {
            self.effect_events.push(EffectEvent::OverlayExpired { cell, kind });
        }
        // 2. Completion waits
        let dt = self.dt;
        let effect_events = &mut self.effect_events;
        self.active.retain_mut(|propagation| {
            if !propagation.wait(dt) {
                return true;
            }
            effect_events.push(EffectEvent::Completed {
                propagation_id: propagation.id,
            });
            tracing::debug!(target: "blastwave::propagation", id = propagation.id, "propagation.complete");
            false
        });
        // 3. EMP recovery
        systems::emp_recovery::run(&mut self.world, self.dt);
        // 4. Cleanup (destroyed objects)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }
}
