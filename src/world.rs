//! World: body storage and step orchestration
//!
//! Bodies live in a generational arena so handles stay cheap to copy and a
//! destroyed slot can be reused without stale handles resolving to the new
//! occupant. `step` runs the fixed phases in arena order, so two worlds fed
//! the same bodies and pair list stay bit-identical.

#[cfg(test)]
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::consts::DEFAULT_GRAVITY;
use crate::pairs;
use crate::shape::Bounds;

/// Handle to a body in a [`World`]. Stale after the body is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

/// World-level tuning: gravity and the playfield rectangle that bodies with
/// `collide_world_bounds` are kept inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub gravity: f32,
    pub bounds: Bounds,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { gravity: DEFAULT_GRAVITY, bounds: Bounds::new(0.0, 0.0, 800.0, 600.0) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot {
    generation: u32,
    body: Option<Body>,
}

/// Owns every body and runs the simulation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub gravity: f32,
    pub bounds: Bounds,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            gravity: config.gravity,
            bounds: config.bounds,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn create_body(&mut self, body: Body) -> BodyHandle {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.body = Some(body);
                BodyHandle { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, body: Some(body) });
                BodyHandle { index, generation: 0 }
            }
        }
    }

    /// Remove a body. The slot's generation bumps so the old handle goes
    /// stale. Destroying twice is a no-op.
    pub fn destroy_body(&mut self, handle: BodyHandle) {
        if let Some(slot) = self.slots.get_mut(handle.index as usize)
            && slot.generation == handle.generation
            && slot.body.take().is_some()
        {
            slot.generation += 1;
            self.free.push(handle.index);
        }
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.body.as_ref())
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.body.as_mut())
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.body.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.body.is_none())
    }

    /// Live bodies with their handles, in arena order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.body
                .as_ref()
                .map(|b| (BodyHandle { index: i as u32, generation: s.generation }, b))
        })
    }

    /// Borrow two distinct live bodies mutably. None if either handle is
    /// stale or both point at the same slot.
    fn pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut Body, &mut Body)> {
        if a.index == b.index {
            return None;
        }
        let (lo, hi, swapped) =
            if a.index < b.index { (a, b, false) } else { (b, a, true) };
        let (left, right) = self.slots.split_at_mut(hi.index as usize);
        let lo_slot = left.get_mut(lo.index as usize)?;
        let hi_slot = right.first_mut()?;
        if lo_slot.generation != lo.generation || hi_slot.generation != hi.generation {
            return None;
        }
        let lo_body = lo_slot.body.as_mut()?;
        let hi_body = hi_slot.body.as_mut()?;
        if swapped { Some((hi_body, lo_body)) } else { Some((lo_body, hi_body)) }
    }

    /// Resolve one pair by handle. Stale handles report no contact.
    pub fn separate(&mut self, a: BodyHandle, b: BodyHandle) -> bool {
        match self.pair_mut(a, b) {
            Some((body_a, body_b)) => pairs::separate(body_a, body_b),
            None => false,
        }
    }

    /// Overlap test by handle, touching neither body.
    pub fn overlap(&self, a: BodyHandle, b: BodyHandle) -> bool {
        match (self.body(a), self.body(b)) {
            (Some(body_a), Some(body_b)) => pairs::overlap(body_a, body_b),
            _ => false,
        }
    }

    /// Advance one fixed step: integrate every live body in arena order,
    /// resolve the given pairs in list order, then finalize facing. The pair
    /// list is the caller's broad phase; order changes results, so callers
    /// wanting determinism must feed a stable list.
    pub fn step(&mut self, collision_pairs: &[(BodyHandle, BodyHandle)]) {
        let gravity = self.gravity;
        let bounds = self.bounds;
        for slot in &mut self.slots {
            if let Some(body) = slot.body.as_mut() {
                body.pre_update(gravity, &bounds);
            }
        }

        let mut resolved = 0usize;
        for &(a, b) in collision_pairs {
            if self.separate(a, b) {
                resolved += 1;
            }
        }
        log::trace!("step: {} of {} pairs resolved", resolved, collision_pairs.len());

        for slot in &mut self.slots {
            if let Some(body) = slot.body.as_mut() {
                body.post_update();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;
    use crate::tile::TileId;

    fn world() -> World {
        World::new(WorldConfig { gravity: 0.2, bounds: Bounds::new(0.0, 0.0, 640.0, 480.0) })
    }

    #[test]
    fn test_handles_resolve_and_go_stale() {
        let mut w = world();
        let h = w.create_body(Body::new(Shape::circle(4.0), Vec2::new(10.0, 10.0)));
        assert!(w.body(h).is_some());
        assert_eq!(w.len(), 1);

        w.destroy_body(h);
        assert!(w.body(h).is_none());
        assert!(w.is_empty());

        // Slot reuse bumps the generation: the old handle stays dead
        let h2 = w.create_body(Body::new(Shape::circle(4.0), Vec2::ZERO));
        assert!(w.body(h).is_none());
        assert!(w.body(h2).is_some());
        assert_ne!(h, h2);
    }

    #[test]
    fn test_double_destroy_is_noop() {
        let mut w = world();
        let h = w.create_body(Body::new(Shape::circle(4.0), Vec2::ZERO));
        w.destroy_body(h);
        w.destroy_body(h);
        let h2 = w.create_body(Body::new(Shape::circle(4.0), Vec2::ZERO));
        assert_eq!(w.len(), 1);
        assert!(w.body(h2).is_some());
    }

    #[test]
    fn test_step_applies_gravity() {
        let mut w = world();
        let h = w.create_body(Body::new(Shape::circle(4.0), Vec2::new(100.0, 100.0)));
        w.step(&[]);
        let b = w.body(h).expect("live");
        assert!(b.pos().y > 100.0);
        let v = b.velocity();
        assert_eq!(v.x, 0.0);
        assert!((v.y - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_stale_pair_reports_false() {
        let mut w = world();
        let a = w.create_body(Body::new(Shape::aabb(8.0, 8.0), Vec2::ZERO));
        let b = w.create_body(Body::new(Shape::aabb(8.0, 8.0), Vec2::new(4.0, 0.0)));
        assert!(w.overlap(a, b));
        w.destroy_body(b);
        assert!(!w.overlap(a, b));
        assert!(!w.separate(a, b));
        assert!(!w.separate(a, a));
    }

    #[test]
    fn test_step_resolves_listed_pairs() {
        let mut w = world();
        let floor =
            w.create_body(Body::immovable(Shape::tile(TileId::FULL, 32.0, 32.0), Vec2::new(100.0, 116.0)));
        let mut ball = Body::new(Shape::circle(8.0), Vec2::new(100.0, 94.0));
        ball.bounce = 0.0;
        ball.friction = 0.0;
        let ball_h = w.create_body(ball);

        // Let it fall onto the tile for a few steps
        for _ in 0..20 {
            w.step(&[(ball_h, floor)]);
        }
        let b = w.body(ball_h).expect("live");
        // Resting on the tile top at y = 100 minus the radius
        assert!((b.pos().y - 92.0).abs() < 0.5);
        assert!(b.touching.down);
    }

    #[test]
    fn test_identical_runs_are_bit_identical() {
        use rand::Rng;
        use rand_pcg::Pcg32;

        let build = || {
            let mut rng = Pcg32::new(0xcafe_f00d, 0xa02_bdbf_7bb3_c0a7);
            let mut w = world();
            let mut handles = Vec::new();
            for _ in 0..16 {
                let pos = Vec2::new(rng.random_range(50.0..590.0), rng.random_range(50.0..430.0));
                let mut b = Body::new(Shape::aabb(8.0, 8.0), pos);
                b.collide_world_bounds = true;
                b.set_velocity(Vec2::new(
                    rng.random_range(-3.0..3.0),
                    rng.random_range(-3.0..3.0),
                ));
                handles.push(w.create_body(b));
            }
            let mut pairs = Vec::new();
            for i in 0..handles.len() {
                for j in (i + 1)..handles.len() {
                    pairs.push((handles[i], handles[j]));
                }
            }
            (w, handles, pairs)
        };

        let (mut w1, handles1, pairs1) = build();
        let (mut w2, _, pairs2) = build();
        for _ in 0..120 {
            w1.step(&pairs1);
            w2.step(&pairs2);
        }
        for h in handles1 {
            let b1 = w1.body(h).expect("live");
            let b2 = w2.body(h).expect("live");
            assert_eq!(b1.pos(), b2.pos());
            assert_eq!(b1.velocity(), b2.velocity());
        }
    }

    #[test]
    fn test_pair_order_is_applied_in_sequence() {
        // Same bodies, different pair order: both runs are valid but the
        // outcomes differ, which is exactly why the list order is part of
        // the contract
        let mut w = world();
        let a = w.create_body(Body::new(Shape::aabb(8.0, 8.0), Vec2::new(100.0, 100.0)));
        let b = w.create_body(Body::new(Shape::aabb(8.0, 8.0), Vec2::new(110.0, 100.0)));
        let c = w.create_body(Body::new(Shape::aabb(8.0, 8.0), Vec2::new(120.0, 100.0)));
        let mut w2 = w.clone();

        w.step(&[(a, b), (b, c)]);
        w2.step(&[(b, c), (a, b)]);

        let pos_a = |w: &World| w.body(a).map(|b| b.pos());
        assert_ne!(pos_a(&w), pos_a(&w2));
    }
}
