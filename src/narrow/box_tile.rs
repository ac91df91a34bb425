//! Box-vs-tile family resolvers
//!
//! Each resolver receives the box (center and half extents), the tile, and
//! the signed axial escape candidate computed by the broad phase. The deepest
//! box corner toward the tile's solid region (`pos - sign * half`) drives the
//! slope and arc tests.

use glam::Vec2;

use super::{Projection, slope_or_axis};
use crate::shape::TileShape;

const FRAC_1_SQRT_2: f32 = std::f32::consts::FRAC_1_SQRT_2;

pub(crate) fn diagonal45(
    pos: Vec2,
    half: Vec2,
    tile_pos: Vec2,
    t: &TileShape,
    axial: Vec2,
) -> Option<Projection> {
    let n = t.slope_normal();
    let o = (pos - t.sign() * half) - tile_pos;
    let dp = o.dot(n);
    if dp >= 0.0 {
        return None;
    }
    Some(slope_or_axis(axial, n * -dp, n))
}

pub(crate) fn diagonal22_small(
    pos: Vec2,
    half: Vec2,
    tile_pos: Vec2,
    t: &TileShape,
    axial: Vec2,
) -> Option<Projection> {
    let s = t.sign();
    let n = t.slope_normal();

    // Deepest box edge must reach past the tile's mid line into the solid
    // half before any contact is possible.
    let pen_y = tile_pos.y - (pos.y - s.y * half.y);
    if pen_y * s.y <= 0.0 {
        return None;
    }

    let slope_point = tile_pos + Vec2::new(s.x * t.half().x, -s.y * t.half().y);
    let o = (pos - s * half) - slope_point;
    let dp = o.dot(n);
    if dp >= 0.0 {
        return None;
    }

    let slope_push = n * -dp;
    let a_y = pen_y.abs();
    let face = Projection::other(Vec2::new(0.0, pen_y), Vec2::new(0.0, pen_y / a_y));

    // Three escape routes: the mid-line cap, the axial escape, the slope.
    if axial.length_squared() < slope_push.length_squared() {
        if a_y < axial.length() {
            Some(face)
        } else {
            Some(Projection::axis(axial))
        }
    } else if a_y < slope_push.length() {
        Some(face)
    } else {
        Some(Projection::other(slope_push, n))
    }
}

pub(crate) fn diagonal22_big(
    pos: Vec2,
    half: Vec2,
    tile_pos: Vec2,
    t: &TileShape,
    axial: Vec2,
) -> Option<Projection> {
    let s = t.sign();
    let n = t.slope_normal();
    let slope_point = tile_pos + Vec2::new(-s.x * t.half().x, s.y * t.half().y);
    let o = (pos - s * half) - slope_point;
    let dp = o.dot(n);
    if dp >= 0.0 {
        return None;
    }
    Some(slope_or_axis(axial, n * -dp, n))
}

pub(crate) fn diagonal67_small(
    pos: Vec2,
    half: Vec2,
    tile_pos: Vec2,
    t: &TileShape,
    axial: Vec2,
) -> Option<Projection> {
    let s = t.sign();
    let n = t.slope_normal();

    let pen_x = tile_pos.x - (pos.x - s.x * half.x);
    if pen_x * s.x <= 0.0 {
        return None;
    }

    let slope_point = tile_pos + Vec2::new(-s.x * t.half().x, s.y * t.half().y);
    let o = (pos - s * half) - slope_point;
    let dp = o.dot(n);
    if dp >= 0.0 {
        return None;
    }

    let slope_push = n * -dp;
    let a_x = pen_x.abs();
    let face = Projection::other(Vec2::new(pen_x, 0.0), Vec2::new(pen_x / a_x, 0.0));

    if axial.length_squared() < slope_push.length_squared() {
        if a_x < axial.length() {
            Some(face)
        } else {
            Some(Projection::axis(axial))
        }
    } else if a_x < slope_push.length() {
        Some(face)
    } else {
        Some(Projection::other(slope_push, n))
    }
}

pub(crate) fn diagonal67_big(
    pos: Vec2,
    half: Vec2,
    tile_pos: Vec2,
    t: &TileShape,
    axial: Vec2,
) -> Option<Projection> {
    let s = t.sign();
    let n = t.slope_normal();
    let slope_point = tile_pos + Vec2::new(s.x * t.half().x, -s.y * t.half().y);
    let o = (pos - s * half) - slope_point;
    let dp = o.dot(n);
    if dp >= 0.0 {
        return None;
    }
    Some(slope_or_axis(axial, n * -dp, n))
}

pub(crate) fn convex(
    pos: Vec2,
    half: Vec2,
    tile_pos: Vec2,
    t: &TileShape,
    axial: Vec2,
) -> Option<Projection> {
    let s = t.sign();
    // Arc center sits in the corner opposite the bulge.
    let o = (pos - s * half) - (tile_pos - s * t.half());
    if s.x * o.x < 0.0 || s.y * o.y < 0.0 {
        // Deepest corner is outside the arc quadrant: plain tile behavior.
        return Some(Projection::axis(axial));
    }
    let rad = 2.0 * t.half().x;
    let len = o.length();
    let pen = rad - len;
    if pen <= 0.0 {
        return None;
    }
    let dir = if len > 0.0 { o / len } else { s * FRAC_1_SQRT_2 };
    Some(Projection::other(dir * pen, dir))
}

pub(crate) fn concave(
    pos: Vec2,
    half: Vec2,
    tile_pos: Vec2,
    t: &TileShape,
    axial: Vec2,
) -> Option<Projection> {
    let s = t.sign();
    // Arc center sits in the corner the empty quarter disc is cut from.
    let o = (tile_pos + s * t.half()) - (pos - s * half);
    let rad = 2.0 * t.half().x;
    let len = o.length();
    let pen = len - rad;
    if pen <= 0.0 {
        return None;
    }
    if axial.length_squared() < pen * pen {
        Some(Projection::axis(axial))
    } else {
        let dir = o / len;
        Some(Projection::other(dir * pen, dir))
    }
}

pub(crate) fn half(
    pos: Vec2,
    half: Vec2,
    tile_pos: Vec2,
    t: &TileShape,
    axial: Vec2,
) -> Option<Projection> {
    let s = t.sign();
    let o = (pos - s * half) - tile_pos;
    let dp = o.dot(s);
    if dp >= 0.0 {
        return None;
    }
    Some(slope_or_axis(axial, s * -dp, s))
}
