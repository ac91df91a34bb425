//! Body-pair collision: dispatch, box-vs-box projection, and response
//!
//! [`separate`] resolves a pair in place; [`overlap`] runs the same geometry
//! without touching either body. Supported pairs are box-box, box-tile and
//! circle-tile; anything else reports no contact. Tile roles are normalized
//! so resolvers always see the tile second.

use glam::Vec2;

use crate::body::Body;
use crate::narrow::{Projection, project_box_tile, project_circle_tile};
use crate::shape::Shape;

/// Resolve a colliding pair, applying position corrections and impulses.
/// Returns true when a contact was resolved.
pub fn separate(a: &mut Body, b: &mut Body) -> bool {
    match (a.shape, b.shape) {
        (Shape::Box { half: ha }, Shape::Box { half: hb }) => {
            match project_box_box(a.pos(), ha, b.pos(), hb) {
                Some(p) => {
                    report_collision_vs_body(a, b, p.push, p.normal);
                    true
                }
                None => false,
            }
        }
        (Shape::Box { half }, Shape::Tile(t)) => {
            apply_tile(a, project_box_tile(a.pos(), half, b.pos(), &t))
        }
        (Shape::Tile(t), Shape::Box { half }) => {
            apply_tile(b, project_box_tile(b.pos(), half, a.pos(), &t))
        }
        (Shape::Circle { radius }, Shape::Tile(t)) => {
            apply_tile(a, project_circle_tile(a.pos(), radius, b.pos(), &t))
        }
        (Shape::Tile(t), Shape::Circle { radius }) => {
            apply_tile(b, project_circle_tile(b.pos(), radius, a.pos(), &t))
        }
        _ => false,
    }
}

/// Side-effect-free overlap test using the same dispatch as [`separate`].
pub fn overlap(a: &Body, b: &Body) -> bool {
    match (a.shape, b.shape) {
        (Shape::Box { half: ha }, Shape::Box { half: hb }) => {
            project_box_box(a.pos(), ha, b.pos(), hb).is_some()
        }
        (Shape::Box { half }, Shape::Tile(t)) => {
            project_box_tile(a.pos(), half, b.pos(), &t).is_some()
        }
        (Shape::Tile(t), Shape::Box { half }) => {
            project_box_tile(b.pos(), half, a.pos(), &t).is_some()
        }
        (Shape::Circle { radius }, Shape::Tile(t)) => {
            project_circle_tile(a.pos(), radius, b.pos(), &t).is_some()
        }
        (Shape::Tile(t), Shape::Circle { radius }) => {
            project_circle_tile(b.pos(), radius, a.pos(), &t).is_some()
        }
        _ => false,
    }
}

fn apply_tile(mover: &mut Body, projection: Option<Projection>) -> bool {
    match projection {
        Some(p) => {
            mover.report_collision_vs_world(p.push, p.normal);
            true
        }
        None => false,
    }
}

/// Minimum-axis projection of box A out of box B. Ties favor X.
fn project_box_box(pos_a: Vec2, half_a: Vec2, pos_b: Vec2, half_b: Vec2) -> Option<Projection> {
    let d = pos_a - pos_b;
    let px = (half_a.x + half_b.x) - d.x.abs();
    if px <= 0.0 {
        return None;
    }
    let py = (half_a.y + half_b.y) - d.y.abs();
    if py <= 0.0 {
        return None;
    }
    let push = if px <= py {
        Vec2::new(if d.x < 0.0 { -px } else { px }, 0.0)
    } else {
        Vec2::new(0.0, if d.y < 0.0 { -py } else { py })
    };
    Some(Projection::axis(push))
}

/// Split a pair contact between two bodies. `push` would move A fully clear
/// of B; `normal` points from B toward A. Who actually moves depends on the
/// immovable flags, and velocities are reversed only for bodies moving into
/// the contact.
fn report_collision_vs_body(a: &mut Body, b: &mut Body, push: Vec2, normal: Vec2) {
    // Entry velocities: pushing pos alone would skew the implicit velocity,
    // so the reversal works from the values before any correction.
    let va = a.velocity();
    let vb = b.velocity();
    let closing_a = va.dot(normal) < 0.0;
    let closing_b = vb.dot(-normal) < 0.0;

    if a.immovable && b.immovable {
        // Neither should move; split the correction without touching
        // velocities so overlapping statics drift apart over several steps
        a.point.translate(push * 0.5);
        b.point.translate(-push * 0.5);
    } else if !a.immovable && !b.immovable {
        a.point.pos += push * 0.5;
        b.point.pos -= push * 0.5;
        if closing_a {
            a.set_velocity(-va);
        } else {
            a.set_velocity(va);
        }
        if closing_b {
            b.set_velocity(-vb);
        } else {
            b.set_velocity(vb);
        }
    } else if b.immovable {
        a.point.pos += push;
        a.set_velocity(if closing_a { -va } else { va });
    } else {
        b.point.pos -= push;
        b.set_velocity(if closing_b { -vb } else { vb });
    }
}
