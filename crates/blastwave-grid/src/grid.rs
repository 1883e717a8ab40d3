//! TileMap: bounded tile grid with integrity, effect overlays and hotspots.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use blastwave_core::config::ObstacleLayers;
use blastwave_core::enums::{AttackKind, OverlayKind, TileKind};
use blastwave_core::services::{OcclusionQuery, TileService};

use crate::los;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("unknown tile glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("map has no rows")]
    Empty,
}

/// Tile grid header metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridHeader {
    /// Cell coordinate of the first tile (lowest x, lowest y).
    pub origin: IVec2,
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

/// One cell of the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    /// Remaining structural integrity of `kind`.
    pub integrity: f32,
    /// Effect overlays currently on this cell.
    pub overlays: Vec<OverlayKind>,
    /// Hottest hotspot the gas here has been exposed to (kelvin).
    pub hotspot: Option<f32>,
}

impl Tile {
    pub fn new(kind: TileKind) -> Self {
        Self {
            kind,
            integrity: kind.max_integrity(),
            overlays: Vec::new(),
            hotspot: None,
        }
    }
}

/// Bounded tile grid. Row-major, row 0 at `origin.y`.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    pub header: GridHeader,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Create a map filled with a single tile kind.
    pub fn filled(origin: IVec2, width: u32, height: u32, kind: TileKind) -> Self {
        Self {
            header: GridHeader {
                origin,
                width,
                height,
            },
            tiles: vec![Tile::new(kind); (width * height) as usize],
        }
    }

    /// Parse a map from text, one line per row starting at `origin.y`.
    ///
    /// Glyphs: `.` floor, `#` wall, `=` window, `D` closed door,
    /// `d` open door, ` ` or `_` space. Leading/trailing blank lines are ignored.
    pub fn from_ascii(origin: IVec2, text: &str) -> Result<Self, GridError> {
        let rows: Vec<&str> = text
            .lines()
            .skip_while(|line| line.trim().is_empty())
            .collect();
        let rows: Vec<&str> = {
            let end = rows
                .iter()
                .rposition(|line| !line.trim().is_empty())
                .map_or(0, |i| i + 1);
            rows[..end].to_vec()
        };
        if rows.is_empty() {
            return Err(GridError::Empty);
        }

        let width = rows[0].chars().count();
        let mut tiles = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(GridError::RaggedRow {
                    row,
                    found,
                    expected: width,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                let kind = match glyph {
                    '.' => TileKind::Floor,
                    '#' => TileKind::Wall,
                    '=' => TileKind::Window,
                    'D' => TileKind::DoorClosed,
                    'd' => TileKind::DoorOpen,
                    ' ' | '_' => TileKind::Space,
                    other => {
                        return Err(GridError::UnknownGlyph {
                            glyph: other,
                            row,
                            col,
                        })
                    }
                };
                tiles.push(Tile::new(kind));
            }
        }

        Ok(Self {
            header: GridHeader {
                origin,
                width: width as u32,
                height: rows.len() as u32,
            },
            tiles,
        })
    }

    /// Flat index of a cell, None if off the grid.
    fn index(&self, cell: IVec2) -> Option<usize> {
        let local = cell - self.header.origin;
        if local.x < 0
            || local.y < 0
            || local.x >= self.header.width as i32
            || local.y >= self.header.height as i32
        {
            return None;
        }
        Some(local.y as usize * self.header.width as usize + local.x as usize)
    }

    pub fn tile(&self, cell: IVec2) -> Option<&Tile> {
        self.index(cell).map(|i| &self.tiles[i])
    }

    pub fn tile_mut(&mut self, cell: IVec2) -> Option<&mut Tile> {
        self.index(cell).map(move |i| &mut self.tiles[i])
    }

    /// Tile kind at `cell`; everything off the grid is space.
    pub fn kind_at(&self, cell: IVec2) -> TileKind {
        self.tile(cell).map_or(TileKind::Space, |t| t.kind)
    }

    /// Replace the tile at `cell` with a fresh one of `kind`, keeping overlays.
    pub fn set_kind(&mut self, cell: IVec2, kind: TileKind) {
        if let Some(tile) = self.tile_mut(cell) {
            tile.kind = kind;
            tile.integrity = kind.max_integrity();
        }
    }

    /// Open or close a door. Non-door tiles are left alone.
    pub fn set_door_open(&mut self, cell: IVec2, open: bool) {
        if let Some(tile) = self.tile_mut(cell) {
            tile.kind = match (tile.kind, open) {
                (TileKind::DoorClosed, true) => TileKind::DoorOpen,
                (TileKind::DoorOpen, false) => TileKind::DoorClosed,
                (kind, _) => kind,
            };
        }
    }

    pub fn hotspot_at(&self, cell: IVec2) -> Option<f32> {
        self.tile(cell).and_then(|t| t.hotspot)
    }

    /// Number of overlays of `kind` anywhere on the map.
    pub fn overlay_count(&self, kind: OverlayKind) -> usize {
        self.tiles
            .iter()
            .map(|t| t.overlays.iter().filter(|&&o| o == kind).count())
            .sum()
    }

    /// Iterate all cells with their tiles.
    pub fn cells(&self) -> impl Iterator<Item = (IVec2, &Tile)> {
        let width = self.header.width as usize;
        let origin = self.header.origin;
        self.tiles.iter().enumerate().map(move |(i, tile)| {
            let cell = origin + IVec2::new((i % width) as i32, (i / width) as i32);
            (cell, tile)
        })
    }
}

impl TileService for TileMap {
    fn contains(&self, cell: IVec2) -> bool {
        self.index(cell).is_some()
    }

    fn has_overlay(&self, cell: IVec2, kind: OverlayKind) -> bool {
        self.tile(cell).is_some_and(|t| t.overlays.contains(&kind))
    }

    fn add_overlay(&mut self, cell: IVec2, kind: OverlayKind) {
        if let Some(tile) = self.tile_mut(cell) {
            tile.overlays.push(kind);
        }
    }

    fn remove_overlays_of_kind(&mut self, cell: IVec2, kind: OverlayKind) {
        if let Some(tile) = self.tile_mut(cell) {
            tile.overlays.retain(|&o| o != kind);
        }
    }

    fn apply_tile_damage(&mut self, cell: IVec2, amount: i32, attack: AttackKind) {
        let Some(tile) = self.tile_mut(cell) else {
            return;
        };
        if tile.kind == TileKind::Space || amount <= 0 {
            return;
        }

        tile.integrity -= amount as f32;
        if tile.integrity <= 0.0 {
            let before = tile.kind;
            tile.kind = before.destroyed_into();
            tile.integrity = tile.kind.max_integrity();
            tracing::debug!(
                target: "blastwave::grid",
                x = cell.x,
                y = cell.y,
                ?attack,
                from = ?before,
                to = ?tile.kind,
                "tile.destroyed"
            );
        }
    }

    fn heat_atmosphere(&mut self, cell: IVec2, temperature: f32) {
        if let Some(tile) = self.tile_mut(cell) {
            if tile.kind == TileKind::Space {
                return; // Nothing to burn in vacuum
            }
            tile.hotspot = Some(tile.hotspot.map_or(temperature, |t| t.max(temperature)));
        }
    }
}

impl OcclusionQuery for TileMap {
    fn cast(&self, from: IVec2, to: IVec2, max_distance: f32, obstacles: ObstacleLayers) -> bool {
        los::ray_hits(self, from, to, max_distance, obstacles)
    }
}
