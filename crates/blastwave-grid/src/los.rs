//! Line-of-sight occlusion over tile obstacle layers.
//!
//! Uses stepped ray traversal: the ray is sampled every
//! `OCCLUSION_SAMPLE_STEP` tiles and each sampled cell is tested
//! against the selected obstacle layers.

use glam::IVec2;

use blastwave_core::config::ObstacleLayers;
use blastwave_core::constants::OCCLUSION_SAMPLE_STEP;
use blastwave_core::services::OcclusionQuery;
use blastwave_core::types::{cell_at, cell_center};

use crate::grid::TileMap;

/// Cast a ray from `from` toward `to` over `map`, up to `max_distance` tiles.
///
/// Returns true if a tile on one of the `obstacles` layers lies on the ray
/// strictly between the two endpoints. The origin and target cells never
/// occlude themselves, so a wall can still be hit by the blast that stops
/// behind it.
pub fn ray_hits(
    map: &TileMap,
    from: IVec2,
    to: IVec2,
    max_distance: f32,
    obstacles: ObstacleLayers,
) -> bool {
    let start = cell_center(from);
    let delta = cell_center(to) - start;
    let length = delta.length();

    if length < OCCLUSION_SAMPLE_STEP || obstacles.is_empty() {
        return false; // Adjacent or same cell, nothing in between
    }

    let reach = length.min(max_distance.max(0.0));
    let dir = delta / length;
    let num_samples = (reach / OCCLUSION_SAMPLE_STEP).ceil() as usize;

    for i in 1..=num_samples {
        let t = (i as f32 * OCCLUSION_SAMPLE_STEP).min(reach);
        let cell = cell_at(start + dir * t);
        if cell == from || cell == to {
            continue;
        }
        if obstacles.blocks(map.kind_at(cell)) {
            return true;
        }
    }

    false
}

/// Whether a blast from `center` reaches `target` unobstructed.
pub fn is_past_wall(
    occlusion: &impl OcclusionQuery,
    center: IVec2,
    target: IVec2,
    max_distance: f32,
    obstacles: ObstacleLayers,
) -> bool {
    !occlusion.cast(center, target, max_distance, obstacles)
}
