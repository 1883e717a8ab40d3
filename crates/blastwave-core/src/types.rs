//! Fundamental grid and simulation types.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Handle to anything the entity registry knows about.
pub type EntityHandle = hecs::Entity;

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick lasting `dt` seconds.
    pub fn advance_by(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

/// Euclidean distance between two cells, in tiles.
pub fn cell_distance(a: IVec2, b: IVec2) -> f32 {
    a.as_vec2().distance(b.as_vec2())
}

/// Manhattan distance between two cells, in tiles.
pub fn manhattan(a: IVec2, b: IVec2) -> i32 {
    let d = (a - b).abs();
    d.x + d.y
}

/// Center of a cell in continuous grid space.
pub fn cell_center(cell: IVec2) -> Vec2 {
    cell.as_vec2()
}

/// Cell that contains a continuous grid-space point.
pub fn cell_at(point: Vec2) -> IVec2 {
    point.round().as_ivec2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_distance_axis_and_diagonal() {
        assert_eq!(cell_distance(IVec2::ZERO, IVec2::new(3, 0)), 3.0);
        let diag = cell_distance(IVec2::new(1, 1), IVec2::new(4, 5));
        assert!((diag - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(IVec2::new(-2, 3), IVec2::new(1, -1)), 7);
    }

    #[test]
    fn test_cell_at_rounds_to_nearest() {
        assert_eq!(cell_at(Vec2::new(1.4, -0.6)), IVec2::new(1, -1));
        assert_eq!(cell_at(cell_center(IVec2::new(5, 7))), IVec2::new(5, 7));
    }

    #[test]
    fn test_sim_time_advance() {
        let mut t = SimTime::default();
        let dt = 1.0 / crate::constants::TICK_RATE as f64;
        for _ in 0..crate::constants::TICK_RATE {
            t.advance_by(dt);
        }
        assert_eq!(t.tick, crate::constants::TICK_RATE as u64);
        assert!((t.elapsed_secs - 1.0).abs() < 1e-9);

        t.advance_by(0.5);
        assert_eq!(t.tick, crate::constants::TICK_RATE as u64 + 1);
        assert!((t.elapsed_secs - 1.5).abs() < 1e-9);
    }
}
