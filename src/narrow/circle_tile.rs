//! Circle-vs-tile family resolvers
//!
//! The voronoi region of the circle center (`oh`/`ov` from the broad phase)
//! picks the feature to resolve against: the cell interior tests the slope or
//! arc directly, edge regions test the neighboring face or the slope's end
//! vertex, corner regions test the tile corner. Corners fully inside a
//! family's empty quadrant are excluded up front so a circle can slide along
//! a run of slopes without snagging.

use glam::Vec2;

use super::{CircleCtx, Projection, slope_or_axis};
use crate::shape::TileShape;

const FRAC_1_SQRT_2: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Push the circle off a point feature. `fallback` is the push direction for
/// a center sitting exactly on the vertex.
fn vertex_push(o: Vec2, radius: f32, fallback: Vec2) -> Option<Projection> {
    let len = o.length();
    if len == 0.0 {
        return Some(Projection::other(fallback * radius, fallback));
    }
    let pen = radius - len;
    if pen > 0.0 {
        let dir = o / len;
        Some(Projection::other(dir * pen, dir))
    } else {
        None
    }
}

/// Full-face push for a circle in a horizontal edge region.
fn face_x(c: &CircleCtx) -> Projection {
    Projection::axis_n(Vec2::new(c.px * c.oh, 0.0), Vec2::new(c.oh, 0.0))
}

/// Full-face push for a circle in a vertical edge region.
fn face_y(c: &CircleCtx) -> Projection {
    Projection::axis_n(Vec2::new(0.0, c.py * c.ov), Vec2::new(0.0, c.ov))
}

/// Corner region: excluded when the corner lies in the family's empty
/// quadrant, otherwise a vertex test against the tile corner.
fn corner(c: &CircleCtx, tile_pos: Vec2, t: &TileShape) -> Option<Projection> {
    let s = t.sign();
    if s.x * c.oh + s.y * c.ov > 0.0 {
        return None;
    }
    let vertex = tile_pos + Vec2::new(c.oh * t.half().x, c.ov * t.half().y);
    vertex_push(c.pos - vertex, c.radius, Vec2::new(c.oh, c.ov) * FRAC_1_SQRT_2)
}

/// Edge region on the slope-tip side: resolve against the slope face or,
/// past its end, the end vertex. `vertex_side_negative` selects which sign of
/// the perp product means the vertex region for this edge.
fn slope_or_vertex(
    c: &CircleCtx,
    vertex: Vec2,
    t: &TileShape,
    vertex_side_negative: bool,
) -> Option<Projection> {
    let s = t.sign();
    let n = t.slope_normal();
    let o = c.pos - vertex;
    let side = (o.y * n.x - o.x * n.y) * s.x * s.y;
    let in_vertex_region = if vertex_side_negative { side < 0.0 } else { side > 0.0 };
    if in_vertex_region {
        vertex_push(o, c.radius, n)
    } else {
        let pen = c.radius - o.dot(n).abs();
        if pen > 0.0 {
            Some(Projection::other(n * pen, n))
        } else {
            None
        }
    }
}

fn slope_or_vertex_h(c: &CircleCtx, tile_pos: Vec2, t: &TileShape) -> Option<Projection> {
    let vertex = tile_pos + Vec2::new(c.oh * t.half().x, -t.sign().y * t.half().y);
    slope_or_vertex(c, vertex, t, true)
}

fn slope_or_vertex_v(c: &CircleCtx, tile_pos: Vec2, t: &TileShape) -> Option<Projection> {
    let vertex = tile_pos + Vec2::new(-t.sign().x * t.half().x, c.ov * t.half().y);
    slope_or_vertex(c, vertex, t, false)
}

/// Horizontal edge region where only the vertical half of the side face is
/// solid: face push alongside the solid half, vertex test past the mid-edge.
fn half_edge_h(c: &CircleCtx, tile_pos: Vec2, t: &TileShape) -> Option<Projection> {
    let s = t.sign();
    let d = c.pos - tile_pos;
    if d.y * s.y < 0.0 {
        Some(face_x(c))
    } else {
        let vertex = tile_pos + Vec2::new(c.oh * t.half().x, 0.0);
        vertex_push(c.pos - vertex, c.radius, Vec2::new(c.oh, 0.0))
    }
}

/// Vertical counterpart of [`half_edge_h`].
fn half_edge_v(c: &CircleCtx, tile_pos: Vec2, t: &TileShape) -> Option<Projection> {
    let s = t.sign();
    let d = c.pos - tile_pos;
    if d.x * s.x < 0.0 {
        Some(face_y(c))
    } else {
        let vertex = tile_pos + Vec2::new(0.0, c.ov * t.half().y);
        vertex_push(c.pos - vertex, c.radius, Vec2::new(0.0, c.ov))
    }
}

pub(crate) fn full(c: &CircleCtx, tile_pos: Vec2, t: &TileShape) -> Option<Projection> {
    match (c.oh == 0.0, c.ov == 0.0) {
        (true, true) => Some(Projection::axis(c.axial)),
        (false, true) => Some(face_x(c)),
        (true, false) => Some(face_y(c)),
        (false, false) => corner(c, tile_pos, t),
    }
}

pub(crate) fn diagonal45(c: &CircleCtx, tile_pos: Vec2, t: &TileShape) -> Option<Projection> {
    let s = t.sign();
    let n = t.slope_normal();
    match (c.oh == 0.0, c.ov == 0.0) {
        (true, true) => {
            // Innermost circle point vs the diagonal through the center
            let o = (c.pos - n * c.radius) - tile_pos;
            let dp = o.dot(n);
            if dp < 0.0 {
                Some(slope_or_axis(c.axial, n * -dp, n))
            } else {
                None
            }
        }
        (false, true) => {
            if c.oh == -s.x {
                Some(face_x(c))
            } else {
                slope_or_vertex_h(c, tile_pos, t)
            }
        }
        (true, false) => {
            if c.ov == -s.y {
                Some(face_y(c))
            } else {
                slope_or_vertex_v(c, tile_pos, t)
            }
        }
        (false, false) => corner(c, tile_pos, t),
    }
}

pub(crate) fn diagonal22_small(
    c: &CircleCtx,
    tile_pos: Vec2,
    t: &TileShape,
) -> Option<Projection> {
    let s = t.sign();
    // The whole half above the slope's low edge is empty
    if s.y * c.ov > 0.0 {
        return None;
    }
    let n = t.slope_normal();
    match (c.oh == 0.0, c.ov == 0.0) {
        (true, true) => {
            let slope_point = tile_pos + Vec2::new(s.x * t.half().x, -s.y * t.half().y);
            let o = (c.pos - n * c.radius) - slope_point;
            let dp = o.dot(n);
            if dp < 0.0 {
                Some(slope_or_axis(c.axial, n * -dp, n))
            } else {
                None
            }
        }
        (false, true) => {
            if c.oh == -s.x {
                half_edge_h(c, tile_pos, t)
            } else {
                slope_or_vertex_h(c, tile_pos, t)
            }
        }
        (true, false) => Some(face_y(c)),
        (false, false) => corner(c, tile_pos, t),
    }
}

pub(crate) fn diagonal22_big(c: &CircleCtx, tile_pos: Vec2, t: &TileShape) -> Option<Projection> {
    let s = t.sign();
    let n = t.slope_normal();
    match (c.oh == 0.0, c.ov == 0.0) {
        (true, true) => {
            let slope_point = tile_pos + Vec2::new(-s.x * t.half().x, s.y * t.half().y);
            let o = (c.pos - n * c.radius) - slope_point;
            let dp = o.dot(n);
            if dp < 0.0 {
                Some(slope_or_axis(c.axial, n * -dp, n))
            } else {
                None
            }
        }
        (false, true) => {
            if c.oh == -s.x {
                Some(face_x(c))
            } else {
                half_edge_h(c, tile_pos, t)
            }
        }
        (true, false) => {
            if c.ov == -s.y {
                Some(face_y(c))
            } else {
                slope_or_vertex_v(c, tile_pos, t)
            }
        }
        (false, false) => corner(c, tile_pos, t),
    }
}

pub(crate) fn diagonal67_small(
    c: &CircleCtx,
    tile_pos: Vec2,
    t: &TileShape,
) -> Option<Projection> {
    let s = t.sign();
    // The whole half past the slope's low edge is empty
    if s.x * c.oh > 0.0 {
        return None;
    }
    let n = t.slope_normal();
    match (c.oh == 0.0, c.ov == 0.0) {
        (true, true) => {
            let slope_point = tile_pos + Vec2::new(-s.x * t.half().x, s.y * t.half().y);
            let o = (c.pos - n * c.radius) - slope_point;
            let dp = o.dot(n);
            if dp < 0.0 {
                Some(slope_or_axis(c.axial, n * -dp, n))
            } else {
                None
            }
        }
        (false, true) => Some(face_x(c)),
        (true, false) => {
            if c.ov == -s.y {
                half_edge_v(c, tile_pos, t)
            } else {
                slope_or_vertex_v(c, tile_pos, t)
            }
        }
        (false, false) => corner(c, tile_pos, t),
    }
}

pub(crate) fn diagonal67_big(c: &CircleCtx, tile_pos: Vec2, t: &TileShape) -> Option<Projection> {
    let s = t.sign();
    let n = t.slope_normal();
    match (c.oh == 0.0, c.ov == 0.0) {
        (true, true) => {
            let slope_point = tile_pos + Vec2::new(s.x * t.half().x, -s.y * t.half().y);
            let o = (c.pos - n * c.radius) - slope_point;
            let dp = o.dot(n);
            if dp < 0.0 {
                Some(slope_or_axis(c.axial, n * -dp, n))
            } else {
                None
            }
        }
        (false, true) => {
            if c.oh == -s.x {
                Some(face_x(c))
            } else {
                slope_or_vertex_h(c, tile_pos, t)
            }
        }
        (true, false) => {
            if c.ov == -s.y {
                Some(face_y(c))
            } else {
                half_edge_v(c, tile_pos, t)
            }
        }
        (false, false) => corner(c, tile_pos, t),
    }
}

pub(crate) fn convex(c: &CircleCtx, tile_pos: Vec2, t: &TileShape) -> Option<Projection> {
    let s = t.sign();
    let h = t.half();

    // Faces and the corner backing the arc behave like a full tile
    if c.ov == 0.0 && c.oh == -s.x {
        return Some(face_x(c));
    }
    if c.oh == 0.0 && c.ov == -s.y {
        return Some(face_y(c));
    }
    if c.oh == -s.x && c.ov == -s.y {
        let vertex = tile_pos + Vec2::new(c.oh * h.x, c.ov * h.y);
        return vertex_push(c.pos - vertex, c.radius, Vec2::new(c.oh, c.ov) * FRAC_1_SQRT_2);
    }

    let o = c.pos - (tile_pos - s * h);
    if c.oh == 0.0 && c.ov == 0.0 && (s.x * o.x < 0.0 || s.y * o.y < 0.0) {
        // Center inside the cell but behind the arc quadrant
        return Some(Projection::axis(c.axial));
    }
    let len = o.length();
    let pen = (2.0 * h.x + c.radius) - len;
    if pen > 0.0 {
        let dir = if len > 0.0 { o / len } else { s * FRAC_1_SQRT_2 };
        Some(Projection::other(dir * pen, dir))
    } else {
        None
    }
}

pub(crate) fn concave(c: &CircleCtx, tile_pos: Vec2, t: &TileShape) -> Option<Projection> {
    let s = t.sign();
    let h = t.half();
    let rad = 2.0 * h.x;
    let arc_center = tile_pos + s * h;

    match (c.oh == 0.0, c.ov == 0.0) {
        (true, true) => {
            let o = arc_center - c.pos;
            let len = o.length();
            let pen = (len + c.radius) - rad;
            if pen <= 0.0 || len == 0.0 {
                return None;
            }
            Some(slope_or_axis(c.axial, (o / len) * pen, o / len))
        }
        (false, true) => {
            if c.oh == -s.x {
                Some(face_x(c))
            } else {
                concave_arc(c, arc_center, rad)
            }
        }
        (true, false) => {
            if c.ov == -s.y {
                Some(face_y(c))
            } else {
                concave_arc(c, arc_center, rad)
            }
        }
        (false, false) => corner(c, tile_pos, t),
    }
}

fn concave_arc(c: &CircleCtx, arc_center: Vec2, rad: f32) -> Option<Projection> {
    let o = arc_center - c.pos;
    let len = o.length();
    let pen = (len + c.radius) - rad;
    if pen > 0.0 && len > 0.0 {
        let dir = o / len;
        Some(Projection::other(dir * pen, dir))
    } else {
        None
    }
}

pub(crate) fn half(c: &CircleCtx, tile_pos: Vec2, t: &TileShape) -> Option<Projection> {
    let s = t.sign();
    // Everything on the empty side of the flat face is out of reach
    if c.oh * s.x + c.ov * s.y > 0.0 {
        return None;
    }
    match (c.oh == 0.0, c.ov == 0.0) {
        (true, true) => {
            let o = (c.pos - s * c.radius) - tile_pos;
            let dp = o.dot(s);
            if dp < 0.0 {
                Some(slope_or_axis(c.axial, s * -dp, s))
            } else {
                None
            }
        }
        (false, true) => {
            if s.x != 0.0 {
                // Opposite the flat face: the whole side is solid
                Some(face_x(c))
            } else {
                half_edge_h(c, tile_pos, t)
            }
        }
        (true, false) => {
            if s.y != 0.0 {
                Some(face_y(c))
            } else {
                half_edge_v(c, tile_pos, t)
            }
        }
        (false, false) => corner(c, tile_pos, t),
    }
}
