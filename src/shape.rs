//! Collision shapes and Verlet motion state
//!
//! Bodies carry their geometry by value: an axis-aligned box, a circle, or a
//! tile (a box-sized cell whose solid region is picked by a [`TileId`]).
//! Motion is stored as a position/previous-position pair; velocity is never a
//! field, it is always `pos - prev`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tile::{TileFamily, TileId};

/// Verlet motion state: current and previous position. One integration step
/// advances `pos` and leaves the old position behind in `prev`, so velocity
/// is implicit and every velocity change is expressed by displacing `prev`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerletPoint {
    pub pos: Vec2,
    pub prev: Vec2,
}

impl VerletPoint {
    /// At rest at `pos` (zero implicit velocity).
    pub fn at(pos: Vec2) -> Self {
        Self { pos, prev: pos }
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.pos - self.prev
    }

    /// One fixed step: damp the implicit velocity by `drag`, add gravity.
    pub fn integrate(&mut self, drag: f32, gravity: f32) {
        let saved = self.pos;
        self.pos += self.velocity() * drag + Vec2::new(0.0, gravity);
        self.prev = saved;
    }

    /// Move both points, leaving velocity unchanged.
    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
        self.prev += delta;
    }

    /// Flip the implicit velocity in place.
    pub fn reverse(&mut self) {
        self.prev = self.pos + self.velocity();
    }

    /// Cap the implicit speed at `max`, keeping direction. Encoded by moving
    /// `prev` toward `pos` so the Verlet invariant holds.
    pub fn clamp_speed(&mut self, max: f32) {
        let v = self.velocity();
        let speed = v.length();
        if speed > max {
            self.prev = self.pos - v * (max / speed);
        }
    }
}

/// World-space rectangle, top-left anchored (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Geometry of a grid tile: a cell-sized box whose solid region is one of
/// the nine collision families. Sloped families only make sense in square
/// cells; a non-square sloped tile falls back to width for both extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileShape {
    half: Vec2,
    id: TileId,
    family: TileFamily,
    sign: Vec2,
    normal: Vec2,
}

impl TileShape {
    pub fn new(id: TileId, width: f32, height: f32) -> Self {
        let family = id.family();
        let mut half = Vec2::new(width * 0.5, height * 0.5);
        if family.requires_square() && (width - height).abs() > f32::EPSILON {
            log::warn!(
                "sloped tile {} in non-square cell {width}x{height}, using width for both",
                id.get()
            );
            half.y = half.x;
        }
        Self { half, id, family, sign: id.sign(), normal: id.slope_normal() }
    }

    #[inline]
    pub fn half(&self) -> Vec2 {
        self.half
    }

    #[inline]
    pub fn id(&self) -> TileId {
        self.id
    }

    #[inline]
    pub fn family(&self) -> TileFamily {
        self.family
    }

    #[inline]
    pub fn sign(&self) -> Vec2 {
        self.sign
    }

    /// Unit normal of the slanted face (zero for families without one).
    #[inline]
    pub fn slope_normal(&self) -> Vec2 {
        self.normal
    }
}

/// The collision shape of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Box { half: Vec2 },
    Circle { radius: f32 },
    Tile(TileShape),
}

impl Shape {
    pub fn aabb(half_width: f32, half_height: f32) -> Self {
        Shape::Box { half: Vec2::new(half_width, half_height) }
    }

    pub fn circle(radius: f32) -> Self {
        Shape::Circle { radius }
    }

    pub fn tile(id: TileId, width: f32, height: f32) -> Self {
        Shape::Tile(TileShape::new(id, width, height))
    }

    /// Half extents of the bounding box, for broad phase and edge queries.
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        match self {
            Shape::Box { half } => *half,
            Shape::Circle { radius } => Vec2::splat(*radius),
            Shape::Tile(t) => t.half(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_carries_velocity() {
        let mut p = VerletPoint { pos: Vec2::new(10.0, 0.0), prev: Vec2::new(8.0, 0.0) };
        p.integrate(1.0, 0.0);
        // velocity (2, 0) carries forward unchanged with drag 1, no gravity
        assert_eq!(p.pos, Vec2::new(12.0, 0.0));
        assert_eq!(p.prev, Vec2::new(10.0, 0.0));
        assert_eq!(p.velocity(), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_integrate_applies_drag_and_gravity() {
        let mut p = VerletPoint { pos: Vec2::new(0.0, 10.0), prev: Vec2::new(0.0, 6.0) };
        p.integrate(0.5, 0.2);
        assert_eq!(p.pos, Vec2::new(0.0, 12.2));
        assert_eq!(p.prev, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_translate_preserves_velocity() {
        let mut p = VerletPoint { pos: Vec2::new(1.0, 2.0), prev: Vec2::new(0.0, 0.0) };
        let v = p.velocity();
        p.translate(Vec2::new(5.0, -3.0));
        assert_eq!(p.velocity(), v);
        assert_eq!(p.pos, Vec2::new(6.0, -1.0));
    }

    #[test]
    fn test_reverse_flips_velocity() {
        let mut p = VerletPoint { pos: Vec2::new(3.0, 0.0), prev: Vec2::new(1.0, 0.0) };
        p.reverse();
        assert_eq!(p.velocity(), Vec2::new(-2.0, 0.0));
        assert_eq!(p.pos, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_clamp_speed() {
        let mut p = VerletPoint { pos: Vec2::new(10.0, 0.0), prev: Vec2::ZERO };
        p.clamp_speed(4.0);
        assert_eq!(p.pos, Vec2::new(10.0, 0.0));
        assert!((p.velocity().length() - 4.0).abs() < 1e-5);
        assert!(p.velocity().x > 0.0);

        // Under the cap: untouched
        let mut slow = VerletPoint { pos: Vec2::new(1.0, 0.0), prev: Vec2::ZERO };
        slow.clamp_speed(4.0);
        assert_eq!(slow.velocity(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_bounds_edges() {
        let b = Bounds::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(b.right(), 110.0);
        assert_eq!(b.bottom(), 70.0);
    }

    #[test]
    fn test_nonsquare_sloped_tile_falls_back_to_width() {
        let t = TileShape::new(TileId::from_raw(2), 32.0, 16.0);
        assert_eq!(t.half(), Vec2::splat(16.0));
        // Full and half tiles keep their aspect
        let f = TileShape::new(TileId::FULL, 32.0, 16.0);
        assert_eq!(f.half(), Vec2::new(16.0, 8.0));
        let h = TileShape::new(TileId::from_raw(30), 32.0, 16.0);
        assert_eq!(h.half(), Vec2::new(16.0, 8.0));
    }

    #[test]
    fn test_shape_half_extents() {
        assert_eq!(Shape::aabb(4.0, 6.0).half_extents(), Vec2::new(4.0, 6.0));
        assert_eq!(Shape::circle(5.0).half_extents(), Vec2::splat(5.0));
        assert_eq!(Shape::tile(TileId::FULL, 16.0, 16.0).half_extents(), Vec2::splat(8.0));
    }
}
