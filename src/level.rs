//! Tile map loading
//!
//! A [`TileMapDef`] is the serialized form of a level's collision layer: a
//! row-major grid of raw cell values plus a mapping from raw values to tile
//! ids. Loading it into a [`World`] creates one immovable tile body per
//! mapped non-empty cell and returns a [`TileGrid`] that maps grid
//! coordinates back to body handles for broad-phase queries.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::shape::Shape;
use crate::tile::TileId;
use crate::world::{BodyHandle, World};

#[derive(Debug, thiserror::Error)]
pub enum TileMapError {
    #[error("cell count {cells} does not match {cols}x{rows}")]
    DimensionMismatch { cells: usize, cols: u32, rows: u32 },
    #[error("tile map has no cells")]
    EmptyGrid,
    #[error("tile size {width}x{height} is not positive")]
    BadCellSize { width: f32, height: f32 },
    #[error("malformed tile map: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized collision layer. `cells` is row-major, `tile_ids` maps raw
/// cell values to entries of the tile table; unmapped non-zero values fall
/// back to the raw value itself so plain id grids work without a mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMapDef {
    pub cols: u32,
    pub rows: u32,
    pub tile_width: f32,
    pub tile_height: f32,
    pub cells: Vec<i32>,
    #[serde(default)]
    pub tile_ids: HashMap<i32, i32>,
}

impl TileMapDef {
    pub fn from_json(json: &str) -> Result<Self, TileMapError> {
        let def: TileMapDef = serde_json::from_str(json)?;
        def.validate()?;
        Ok(def)
    }

    pub fn validate(&self) -> Result<(), TileMapError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(TileMapError::EmptyGrid);
        }
        // Widened multiply: claimed dimensions come from untrusted data
        let expected = self.cols as u64 * self.rows as u64;
        if self.cells.len() as u64 != expected {
            return Err(TileMapError::DimensionMismatch {
                cells: self.cells.len(),
                cols: self.cols,
                rows: self.rows,
            });
        }
        if !(self.tile_width > 0.0) || !(self.tile_height > 0.0) {
            return Err(TileMapError::BadCellSize {
                width: self.tile_width,
                height: self.tile_height,
            });
        }
        Ok(())
    }

    fn tile_id(&self, raw: i32) -> TileId {
        let mapped = self.tile_ids.get(&raw).copied().unwrap_or(raw);
        TileId::from_raw(mapped)
    }
}

/// Grid of tile body handles created from a [`TileMapDef`], indexed by
/// column and row. Cells that mapped to empty hold no handle.
#[derive(Debug, Clone)]
pub struct TileGrid {
    cols: u32,
    rows: u32,
    tile_width: f32,
    tile_height: f32,
    origin: Vec2,
    handles: Vec<Option<BodyHandle>>,
}

impl TileGrid {
    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn handle_at(&self, col: u32, row: u32) -> Option<BodyHandle> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.handles[row as usize * self.cols as usize + col as usize]
    }

    /// All tile body handles, for building pair lists.
    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.handles.iter().filter_map(|h| *h)
    }

    /// Handles of cells whose area intersects the world-space rectangle from
    /// `min` to `max`. The usual broad phase for a moving body: query its
    /// bounding box, pair it with the result.
    pub fn cells_overlapping(&self, min: Vec2, max: Vec2) -> impl Iterator<Item = BodyHandle> + '_ {
        let col_lo = ((min.x - self.origin.x) / self.tile_width).floor().max(0.0) as u32;
        let row_lo = ((min.y - self.origin.y) / self.tile_height).floor().max(0.0) as u32;
        let col_hi =
            (((max.x - self.origin.x) / self.tile_width).floor().max(-1.0) as i64).min(self.cols as i64 - 1);
        let row_hi =
            (((max.y - self.origin.y) / self.tile_height).floor().max(-1.0) as i64).min(self.rows as i64 - 1);

        (row_lo as i64..=row_hi)
            .flat_map(move |row| (col_lo as i64..=col_hi).map(move |col| (col, row)))
            .filter_map(move |(col, row)| self.handle_at(col as u32, row as u32))
    }
}

impl World {
    /// Instantiate a tile map: one immovable tile body per mapped non-empty
    /// cell, centered in its cell, with `origin` at the map's top-left
    /// corner.
    pub fn load_tile_map(
        &mut self,
        def: &TileMapDef,
        origin: Vec2,
    ) -> Result<TileGrid, TileMapError> {
        def.validate()?;

        let mut handles = Vec::with_capacity(def.cells.len());
        let mut created = 0usize;
        for row in 0..def.rows {
            for col in 0..def.cols {
                let raw = def.cells[row as usize * def.cols as usize + col as usize];
                let id = def.tile_id(raw);
                if id == TileId::EMPTY {
                    handles.push(None);
                    continue;
                }
                let center = origin
                    + Vec2::new(
                        (col as f32 + 0.5) * def.tile_width,
                        (row as f32 + 0.5) * def.tile_height,
                    );
                let body =
                    Body::immovable(Shape::tile(id, def.tile_width, def.tile_height), center);
                handles.push(Some(self.create_body(body)));
                created += 1;
            }
        }
        log::debug!("loaded tile map: {}x{} cells, {created} solid", def.cols, def.rows);

        Ok(TileGrid {
            cols: def.cols,
            rows: def.rows,
            tile_width: def.tile_width,
            tile_height: def.tile_height,
            origin,
            handles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Bounds;
    use crate::world::WorldConfig;

    fn small_def() -> TileMapDef {
        TileMapDef {
            cols: 3,
            rows: 2,
            tile_width: 32.0,
            tile_height: 32.0,
            cells: vec![0, 1, 2, 1, 0, 0],
            tile_ids: HashMap::new(),
        }
    }

    fn world() -> World {
        World::new(WorldConfig { gravity: 0.2, bounds: Bounds::new(0.0, 0.0, 640.0, 480.0) })
    }

    #[test]
    fn test_load_creates_bodies_at_cell_centers() {
        let mut w = world();
        let grid = w.load_tile_map(&small_def(), Vec2::ZERO).expect("valid map");
        assert_eq!(w.len(), 3);
        assert!(grid.handle_at(0, 0).is_none());

        let h = grid.handle_at(1, 0).expect("solid cell");
        let b = w.body(h).expect("live");
        assert_eq!(b.pos(), Vec2::new(48.0, 16.0));
        assert!(b.immovable);

        // Out of range is None, not a panic
        assert!(grid.handle_at(3, 0).is_none());
        assert!(grid.handle_at(0, 2).is_none());
    }

    #[test]
    fn test_load_honors_origin_and_mapping() {
        let mut w = world();
        let mut def = small_def();
        // Raw value 9 means a 45 degree slope in this map's palette
        def.cells = vec![9, 0, 0, 0, 0, 0];
        def.tile_ids.insert(9, 2);
        let grid = w.load_tile_map(&def, Vec2::new(100.0, 200.0)).expect("valid map");

        let h = grid.handle_at(0, 0).expect("mapped cell");
        let b = w.body(h).expect("live");
        assert_eq!(b.pos(), Vec2::new(116.0, 216.0));
        match b.shape {
            Shape::Tile(t) => assert_eq!(t.id(), TileId::from_raw(2)),
            other => panic!("expected tile shape, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_errors() {
        let mut def = small_def();
        def.cells.pop();
        assert!(matches!(def.validate(), Err(TileMapError::DimensionMismatch { .. })));

        let mut def = small_def();
        def.rows = 0;
        def.cells.clear();
        assert!(matches!(def.validate(), Err(TileMapError::EmptyGrid)));

        let mut def = small_def();
        def.tile_width = 0.0;
        assert!(matches!(def.validate(), Err(TileMapError::BadCellSize { .. })));

        // Dimensions whose product overflows u32 must be rejected, not panic
        let def = TileMapDef {
            cols: 70_000,
            rows: 70_000,
            tile_width: 32.0,
            tile_height: 32.0,
            cells: Vec::new(),
            tile_ids: HashMap::new(),
        };
        assert!(matches!(def.validate(), Err(TileMapError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "cols": 2, "rows": 1,
            "tile_width": 16.0, "tile_height": 16.0,
            "cells": [1, 0]
        }"#;
        let def = TileMapDef::from_json(json).expect("valid json");
        assert_eq!(def.cols, 2);
        assert!(def.tile_ids.is_empty());

        assert!(matches!(TileMapDef::from_json("{"), Err(TileMapError::Json(_))));

        let bad = r#"{"cols": 2, "rows": 1, "tile_width": 16.0,
                      "tile_height": 16.0, "cells": [1]}"#;
        assert!(matches!(
            TileMapDef::from_json(bad),
            Err(TileMapError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_cells_overlapping() {
        let mut w = world();
        let mut def = small_def();
        def.cells = vec![1; 6];
        let grid = w.load_tile_map(&def, Vec2::ZERO).expect("valid map");

        // Box covering the first two columns of row 0
        let hits: Vec<_> = grid.cells_overlapping(Vec2::new(4.0, 4.0), Vec2::new(40.0, 20.0)).collect();
        assert_eq!(hits.len(), 2);
        assert!(hits.contains(&grid.handle_at(0, 0).expect("cell")));
        assert!(hits.contains(&grid.handle_at(1, 0).expect("cell")));

        // Query fully off the grid
        assert_eq!(
            grid.cells_overlapping(Vec2::new(-50.0, -50.0), Vec2::new(-10.0, -10.0)).count(),
            0
        );
        assert_eq!(
            grid.cells_overlapping(Vec2::new(200.0, 0.0), Vec2::new(300.0, 10.0)).count(),
            0
        );
    }

    #[test]
    fn test_grid_handles_iterate_solid_cells() {
        let mut w = world();
        let grid = w.load_tile_map(&small_def(), Vec2::ZERO).expect("valid map");
        assert_eq!(grid.handles().count(), 3);
    }
}
