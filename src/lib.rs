//! slopebox - arcade-style 2D collision engine
//!
//! Boxes and circles against each other and against a grid of sloped tiles,
//! resolved with Verlet-style motion: velocity is always `pos - prev`, and
//! every response is a position correction plus a displacement of the
//! previous position.
//!
//! Core modules:
//! - `tile`: The 34-entry tile id table and its collision families
//! - `shape`: Verlet motion state and the box/circle/tile shapes
//! - `body`: Bodies, integration, and the collision response primitive
//! - `narrow`: Pure shape-vs-tile projection for every tile family
//! - `pairs`: Pair dispatch, box-vs-box, and body-vs-body response
//! - `world`: Body arena and the fixed simulation step
//! - `level`: Tile map loading from serialized grids
//!
//! Coordinates are screen-style: x grows right, y grows down, so gravity is
//! positive y. The step is deterministic: the same world and the same pair
//! list produce bit-identical results.

pub mod body;
pub mod level;
pub mod narrow;
pub mod pairs;
pub mod shape;
pub mod tile;
pub mod world;

pub use body::{Body, Facing, Touching};
pub use level::{TileGrid, TileMapDef, TileMapError};
pub use narrow::{Projection, Resolution, project_box_tile, project_circle_tile};
pub use pairs::{overlap, separate};
pub use shape::{Bounds, Shape, TileShape, VerletPoint};
pub use tile::{TileFamily, TileId};
pub use world::{BodyHandle, World, WorldConfig};

/// Engine tuning constants
pub mod consts {
    /// Per-step downward acceleration applied to bodies at gravity scale 1
    pub const DEFAULT_GRAVITY: f32 = 0.2;
    /// Velocity retained per step (1.0 = no damping)
    pub const DEFAULT_DRAG: f32 = 1.0;
    /// Fraction of tangential velocity removed on contact
    pub const DEFAULT_FRICTION: f32 = 0.05;
    /// Restitution applied to the normal velocity on contact
    pub const DEFAULT_BOUNCE: f32 = 0.3;
    /// Hard cap on body speed in units per step
    pub const DEFAULT_MAX_SPEED: f32 = 8.0;
    /// Number of entries in the tile id table
    pub const TILE_ID_COUNT: usize = 34;
}
