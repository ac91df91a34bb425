//! Narrow phase: shape-vs-tile projection
//!
//! Resolvers are pure: they take positions and a [`TileShape`] and return an
//! optional [`Projection`] (push vector plus contact normal), never touching
//! body state. The caller decides whether to apply the push or just test for
//! overlap.
//!
//! Every resolver starts from the same axial broad phase: per-axis
//! penetration of the two bounding boxes, with the shallower axis as the
//! fallback escape route. Sloped families then compare that axial escape
//! against projection along the slope normal and take the shorter one.

mod box_tile;
mod circle_tile;

use glam::Vec2;

use crate::shape::TileShape;
use crate::tile::TileFamily;

/// How a contact was resolved, for callers that care about the escape route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Pushed out along a bounding-box axis.
    Axis,
    /// Pushed out along a slope, arc, or vertex direction.
    Other,
}

/// A resolved contact: the displacement that separates the shapes and the
/// unit surface normal at the contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub push: Vec2,
    pub normal: Vec2,
    pub kind: Resolution,
}

impl Projection {
    /// Axial push; the normal is the push direction.
    pub(crate) fn axis(push: Vec2) -> Self {
        Self { push, normal: push.normalize_or_zero(), kind: Resolution::Axis }
    }

    /// Axial push with an explicit normal (used when the push can be zero
    /// length but the contact direction is known).
    pub(crate) fn axis_n(push: Vec2, normal: Vec2) -> Self {
        Self { push, normal, kind: Resolution::Axis }
    }

    pub(crate) fn other(push: Vec2, normal: Vec2) -> Self {
        Self { push, normal, kind: Resolution::Other }
    }
}

/// Project an axis-aligned box out of a tile. `pos`/`half` describe the box,
/// `tile_pos` is the tile center. Returns `None` when they do not overlap or
/// the box sits entirely in the tile's empty region.
pub fn project_box_tile(
    pos: Vec2,
    half: Vec2,
    tile_pos: Vec2,
    tile: &TileShape,
) -> Option<Projection> {
    if tile.family() == TileFamily::Empty {
        return None;
    }

    let d = pos - tile_pos;
    let px = (tile.half().x + half.x) - d.x.abs();
    if px <= 0.0 {
        return None;
    }
    let py = (tile.half().y + half.y) - d.y.abs();
    if py <= 0.0 {
        return None;
    }

    // Cheaper single-axis escape, signed to push away from the tile center.
    // Ties go to X.
    let axial = if px <= py {
        Vec2::new(if d.x < 0.0 { -px } else { px }, 0.0)
    } else {
        Vec2::new(0.0, if d.y < 0.0 { -py } else { py })
    };

    match tile.family() {
        TileFamily::Empty => None,
        TileFamily::Full => Some(Projection::axis(axial)),
        TileFamily::Diagonal45 => box_tile::diagonal45(pos, half, tile_pos, tile, axial),
        TileFamily::Diagonal22Small => box_tile::diagonal22_small(pos, half, tile_pos, tile, axial),
        TileFamily::Diagonal22Big => box_tile::diagonal22_big(pos, half, tile_pos, tile, axial),
        TileFamily::Diagonal67Small => box_tile::diagonal67_small(pos, half, tile_pos, tile, axial),
        TileFamily::Diagonal67Big => box_tile::diagonal67_big(pos, half, tile_pos, tile, axial),
        TileFamily::Concave => box_tile::concave(pos, half, tile_pos, tile, axial),
        TileFamily::Convex => box_tile::convex(pos, half, tile_pos, tile, axial),
        TileFamily::Half => box_tile::half(pos, half, tile_pos, tile, axial),
    }
}

/// Circle-vs-tile context shared by the family resolvers: unsigned per-axis
/// penetrations, the voronoi region of the circle center relative to the
/// tile (`oh`/`ov` in `{-1, 0, 1}`), and the signed axial escape candidate.
pub(crate) struct CircleCtx {
    pub pos: Vec2,
    pub radius: f32,
    pub px: f32,
    pub py: f32,
    pub oh: f32,
    pub ov: f32,
    pub axial: Vec2,
}

/// Project a circle out of a tile. The circle center's voronoi region
/// relative to the tile cell picks between face, slope, and vertex handling
/// inside each family resolver.
pub fn project_circle_tile(
    pos: Vec2,
    radius: f32,
    tile_pos: Vec2,
    tile: &TileShape,
) -> Option<Projection> {
    if tile.family() == TileFamily::Empty {
        return None;
    }

    let d = pos - tile_pos;
    let px = (tile.half().x + radius) - d.x.abs();
    if px <= 0.0 {
        return None;
    }
    let py = (tile.half().y + radius) - d.y.abs();
    if py <= 0.0 {
        return None;
    }

    let oh = if d.x < -tile.half().x {
        -1.0
    } else if d.x > tile.half().x {
        1.0
    } else {
        0.0
    };
    let ov = if d.y < -tile.half().y {
        -1.0
    } else if d.y > tile.half().y {
        1.0
    } else {
        0.0
    };

    let axial = if px <= py {
        Vec2::new(if d.x < 0.0 { -px } else { px }, 0.0)
    } else {
        Vec2::new(0.0, if d.y < 0.0 { -py } else { py })
    };

    let ctx = CircleCtx { pos, radius, px, py, oh, ov, axial };

    match tile.family() {
        TileFamily::Empty => None,
        TileFamily::Full => circle_tile::full(&ctx, tile_pos, tile),
        TileFamily::Diagonal45 => circle_tile::diagonal45(&ctx, tile_pos, tile),
        TileFamily::Diagonal22Small => circle_tile::diagonal22_small(&ctx, tile_pos, tile),
        TileFamily::Diagonal22Big => circle_tile::diagonal22_big(&ctx, tile_pos, tile),
        TileFamily::Diagonal67Small => circle_tile::diagonal67_small(&ctx, tile_pos, tile),
        TileFamily::Diagonal67Big => circle_tile::diagonal67_big(&ctx, tile_pos, tile),
        TileFamily::Concave => circle_tile::concave(&ctx, tile_pos, tile),
        TileFamily::Convex => circle_tile::convex(&ctx, tile_pos, tile),
        TileFamily::Half => circle_tile::half(&ctx, tile_pos, tile),
    }
}

/// Shared by the sloped-family resolvers: take the axial escape when it is
/// no longer than the slope projection (ties favor axial), otherwise push
/// along the slope normal.
pub(crate) fn slope_or_axis(axial: Vec2, slope_push: Vec2, normal: Vec2) -> Projection {
    if axial.length_squared() <= slope_push.length_squared() {
        Projection::axis(axial)
    } else {
        Projection::other(slope_push, normal)
    }
}
