//! Rigid body: shape, motion state, and the collision response primitive
//!
//! All position correction funnels through [`Body::report_collision_vs_world`]:
//! the caller hands it a push vector and a contact normal, and the body splits
//! its implicit velocity into normal and tangential parts to apply bounce and
//! friction. Pushing `pos` while adjusting `prev` is the only way velocity
//! ever changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::shape::{Bounds, Shape, VerletPoint};

/// Which sides of the body touched something during the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Touching {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Touching {
    pub fn none(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }
}

/// Dominant movement direction, updated after each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
}

/// A dynamic or static collision body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub shape: Shape,
    pub point: VerletPoint,
    /// Velocity retained per step, 1.0 = no damping.
    pub drag: f32,
    /// Fraction of tangential velocity removed on contact.
    pub friction: f32,
    /// Restitution: 0 kills normal velocity, 1 reflects it fully.
    pub bounce: f32,
    /// Multiplier on world gravity, 0 to float.
    pub gravity_scale: f32,
    /// Hard cap on speed in units per step.
    pub max_speed: f32,
    /// Immovable bodies never receive position corrections from pairs.
    pub immovable: bool,
    /// Keep this body inside the world bounds.
    pub collide_world_bounds: bool,
    pub touching: Touching,
    pub was_touching: Touching,
    pub facing: Facing,
}

impl Body {
    pub fn new(shape: Shape, pos: Vec2) -> Self {
        Self {
            shape,
            point: VerletPoint::at(pos),
            drag: DEFAULT_DRAG,
            friction: DEFAULT_FRICTION,
            bounce: DEFAULT_BOUNCE,
            gravity_scale: 1.0,
            max_speed: DEFAULT_MAX_SPEED,
            immovable: false,
            collide_world_bounds: false,
            touching: Touching::default(),
            was_touching: Touching::default(),
            facing: Facing::None,
        }
    }

    /// A static tile or wall: immovable, unaffected by gravity.
    pub fn immovable(shape: Shape, pos: Vec2) -> Self {
        let mut body = Self::new(shape, pos);
        body.immovable = true;
        body.gravity_scale = 0.0;
        body
    }

    // Read accessors

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.point.pos
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.point.pos.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.point.pos.y
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.point.velocity()
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity().length()
    }

    /// Heading in radians, screen convention (positive y is down).
    #[inline]
    pub fn angle(&self) -> f32 {
        let v = self.velocity();
        v.y.atan2(v.x)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.shape.half_extents().x * 2.0
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.shape.half_extents().y * 2.0
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.point.pos.x - self.shape.half_extents().x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.point.pos.x + self.shape.half_extents().x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.point.pos.y - self.shape.half_extents().y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.point.pos.y + self.shape.half_extents().y
    }

    /// Set the implicit velocity directly by displacing `prev`.
    pub fn set_velocity(&mut self, v: Vec2) {
        self.point.prev = self.point.pos - v;
    }

    /// Begin-of-step phase: roll touch flags over, integrate, clamp speed,
    /// and push back inside the world bounds. Tile bodies are static cells
    /// and skip all of it.
    pub fn pre_update(&mut self, gravity: f32, bounds: &Bounds) {
        if matches!(self.shape, Shape::Tile(_)) {
            return;
        }
        self.was_touching = self.touching;
        self.touching = Touching::default();

        self.point.integrate(self.drag, gravity * self.gravity_scale);
        self.point.clamp_speed(self.max_speed);

        if self.collide_world_bounds {
            self.collide_bounds(bounds);
        }
    }

    /// End-of-step phase: derive facing from the resolved velocity.
    pub fn post_update(&mut self) {
        let v = self.velocity();
        self.facing = if v.x < 0.0 {
            Facing::Left
        } else if v.x > 0.0 {
            Facing::Right
        } else {
            Facing::None
        };
        if v.y < 0.0 {
            self.facing = Facing::Up;
        } else if v.y > 0.0 {
            self.facing = Facing::Down;
        }
    }

    fn collide_bounds(&mut self, bounds: &Bounds) {
        let half = self.shape.half_extents();
        let pos = self.point.pos;

        let px = bounds.x - (pos.x - half.x);
        if px > 0.0 {
            self.report_collision_vs_world(Vec2::new(px, 0.0), Vec2::new(1.0, 0.0));
        } else {
            let px = bounds.right() - (pos.x + half.x);
            if px < 0.0 {
                self.report_collision_vs_world(Vec2::new(px, 0.0), Vec2::new(-1.0, 0.0));
            }
        }

        let pos = self.point.pos;
        let py = bounds.y - (pos.y - half.y);
        if py > 0.0 {
            self.report_collision_vs_world(Vec2::new(0.0, py), Vec2::new(0.0, 1.0));
        } else {
            let py = bounds.bottom() - (pos.y + half.y);
            if py < 0.0 {
                self.report_collision_vs_world(Vec2::new(0.0, py), Vec2::new(0.0, -1.0));
            }
        }
    }

    /// Apply a collision against immovable geometry. `push` moves the body
    /// out of penetration; `normal` is the unit contact normal pointing away
    /// from the surface. Bounce and friction fire only when the body is
    /// moving into the surface (`v . n < 0`); a separating body is displaced
    /// without any velocity change.
    pub fn report_collision_vs_world(&mut self, push: Vec2, normal: Vec2) {
        let v = self.point.velocity();
        let dp = v.dot(normal);

        let (bounce_imp, friction_imp) = if dp < 0.0 {
            let n_comp = normal * dp;
            let t_comp = v - n_comp;
            if normal.x > 0.0 {
                self.touching.left = true;
            }
            if normal.x < 0.0 {
                self.touching.right = true;
            }
            if normal.y > 0.0 {
                self.touching.up = true;
            }
            if normal.y < 0.0 {
                self.touching.down = true;
            }
            (n_comp * (1.0 + self.bounce), t_comp * self.friction)
        } else {
            (Vec2::ZERO, Vec2::ZERO)
        };

        self.point.pos += push;
        self.point.prev += push + bounce_imp + friction_imp;
    }
}
