//! Timed effect overlays (fire, EMP sparks) on the tile layer.
//!
//! The scheduler owns one timer per placed overlay. Timers count down as the
//! engine ticks; when one runs out its overlay is removed from the tile.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use blastwave_core::enums::OverlayKind;
use blastwave_core::services::TileService;

/// A placed overlay and the time it has left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayTimer {
    pub cell: IVec2,
    pub kind: OverlayKind,
    pub remaining_secs: f32,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayScheduler {
    timers: Vec<OverlayTimer>,
}

impl OverlayScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `kind` on `cell` and remove it again after `duration` seconds.
    ///
    /// Returns `None` without touching anything if the cell already shows
    /// that overlay or lies off the grid. Otherwise returns the duration the
    /// overlay was issued for.
    pub fn place_and_expire(
        &mut self,
        tiles: &mut impl TileService,
        cell: IVec2,
        kind: OverlayKind,
        duration: f32,
    ) -> Option<f32> {
        if !tiles.contains(cell) || tiles.has_overlay(cell, kind) {
            return None;
        }
        let duration = duration.max(0.0);
        tiles.add_overlay(cell, kind);
        self.timers.push(OverlayTimer {
            cell,
            kind,
            remaining_secs: duration,
        });
        Some(duration)
    }

    /// Count every timer down by `dt` and lift the overlays that ran out.
    ///
    /// Returns the expired (cell, kind) pairs in placement order.
    pub fn advance(&mut self, tiles: &mut impl TileService, dt: f32) -> Vec<(IVec2, OverlayKind)> {
        let mut expired = Vec::new();
        self.timers.retain_mut(|timer| {
            timer.remaining_secs -= dt;
            if timer.remaining_secs <= 0.0 {
                tiles.remove_overlays_of_kind(timer.cell, timer.kind);
                expired.push((timer.cell, timer.kind));
                false
            } else {
                true
            }
        });
        expired
    }

    /// Lift an overlay before its timer runs out. Returns false if none was scheduled.
    pub fn force_expire(&mut self, tiles: &mut impl TileService, cell: IVec2, kind: OverlayKind) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| !(t.cell == cell && t.kind == kind));
        if self.timers.len() == before {
            return false;
        }
        tiles.remove_overlays_of_kind(cell, kind);
        true
    }

    pub fn timers(&self) -> &[OverlayTimer] {
        &self.timers
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blastwave_core::constants::DT;
    use blastwave_core::enums::TileKind;
    use blastwave_grid::TileMap;

    fn map() -> TileMap {
        TileMap::filled(IVec2::ZERO, 8, 8, TileKind::Floor)
    }

    #[test]
    fn test_place_twice_gives_one_overlay_and_one_expiry() {
        let mut tiles = map();
        let mut scheduler = OverlayScheduler::new();
        let cell = IVec2::new(2, 2);

        assert_eq!(scheduler.place_and_expire(&mut tiles, cell, OverlayKind::Fire, 0.1), Some(0.1));
        assert_eq!(scheduler.place_and_expire(&mut tiles, cell, OverlayKind::Fire, 0.2), None);
        assert_eq!(tiles.overlay_count(OverlayKind::Fire), 1);

        let mut expirations = Vec::new();
        for _ in 0..10 {
            expirations.extend(scheduler.advance(&mut tiles, DT));
        }
        assert_eq!(expirations, vec![(cell, OverlayKind::Fire)]);
        assert_eq!(tiles.overlay_count(OverlayKind::Fire), 0);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_different_kinds_coexist() {
        let mut tiles = map();
        let mut scheduler = OverlayScheduler::new();
        let cell = IVec2::new(1, 1);
        assert!(scheduler.place_and_expire(&mut tiles, cell, OverlayKind::Fire, 0.1).is_some());
        assert!(scheduler.place_and_expire(&mut tiles, cell, OverlayKind::Emp, 0.5).is_some());

        // Fire goes first, the longer EMP overlay stays.
        let mut ticks = 0;
        while tiles.has_overlay(cell, OverlayKind::Fire) {
            scheduler.advance(&mut tiles, DT);
            ticks += 1;
        }
        assert!(ticks <= 4);
        assert!(tiles.has_overlay(cell, OverlayKind::Emp));
    }

    #[test]
    fn test_zero_duration_expires_next_advance() {
        let mut tiles = map();
        let mut scheduler = OverlayScheduler::new();
        assert_eq!(
            scheduler.place_and_expire(&mut tiles, IVec2::ZERO, OverlayKind::Fire, 0.0),
            Some(0.0)
        );
        assert!(tiles.has_overlay(IVec2::ZERO, OverlayKind::Fire));
        assert_eq!(scheduler.advance(&mut tiles, DT).len(), 1);
        assert!(!tiles.has_overlay(IVec2::ZERO, OverlayKind::Fire));
    }

    #[test]
    fn test_off_grid_placement_is_not_issued() {
        let mut tiles = map();
        let mut scheduler = OverlayScheduler::new();
        assert_eq!(
            scheduler.place_and_expire(&mut tiles, IVec2::new(-1, 0), OverlayKind::Fire, 0.2),
            None
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_force_expire() {
        let mut tiles = map();
        let mut scheduler = OverlayScheduler::new();
        let cell = IVec2::new(3, 3);
        scheduler.place_and_expire(&mut tiles, cell, OverlayKind::Emp, 5.0);

        assert!(scheduler.force_expire(&mut tiles, cell, OverlayKind::Emp));
        assert!(!tiles.has_overlay(cell, OverlayKind::Emp));
        assert!(!scheduler.force_expire(&mut tiles, cell, OverlayKind::Emp));
        assert!(scheduler.advance(&mut tiles, DT).is_empty());
    }
}
