//! Propagation engine for BLASTWAVE.
//!
//! Owns the hecs world and the tile map, walks blast shapes cell by cell,
//! and advances overlay lifetimes at a fixed tick rate.

pub mod dispatch;
pub mod engine;
pub mod falloff;
pub mod overlay;
pub mod propagation;
pub mod systems;
pub mod world_setup;

pub use blastwave_core as core;
pub use engine::{PropagationEngine, PropagationError, SimConfig};
