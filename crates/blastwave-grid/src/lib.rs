//! Grid layer for BLASTWAVE.
//!
//! Tile map with integrity, overlays and atmosphere hotspots,
//! line-of-sight occlusion over obstacle layers, and blast shape generation.

pub use blastwave_core as core;

pub mod grid;
pub mod los;
pub mod shape;

// Re-export key types for convenience.
pub use grid::{GridError, Tile, TileMap};
pub use los::is_past_wall;
pub use shape::generate as generate_shape;
