//! Tile classification
//!
//! Level data encodes solid geometry as integer tile ids in `0..34`. Each id
//! reduces to one of nine canonical collision families (plus Empty), together
//! with a sign vector selecting the orientation within the family and, for
//! sloped families, the unit normal of the slanted face. The whole mapping is
//! a single immutable table; narrow-phase code never recomputes it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TILE_ID_COUNT;

/// Canonical collision family of a tile id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileFamily {
    /// No collision geometry.
    Empty,
    /// Fully solid square.
    Full,
    /// 45 degree slope (corner-to-corner diagonal).
    Diagonal45,
    /// Quarter-circle cutout (solid sliver outside the arc).
    Concave,
    /// Quarter-circle bulge (solid disk sector).
    Convex,
    /// Shallow slope, lower piece of a 1:2 rise-run pair.
    Diagonal22Small,
    /// Shallow slope, upper piece of a 1:2 rise-run pair.
    Diagonal22Big,
    /// Steep slope, lower piece of a 2:1 rise-run pair.
    Diagonal67Small,
    /// Steep slope, upper piece of a 2:1 rise-run pair.
    Diagonal67Big,
    /// Half-solid square, flat face through the tile center.
    Half,
}

impl TileFamily {
    /// True for every family whose geometry depends on the tile being square.
    pub fn requires_square(self) -> bool {
        !matches!(self, TileFamily::Empty | TileFamily::Full | TileFamily::Half)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TileFamily::Empty => "empty",
            TileFamily::Full => "full",
            TileFamily::Diagonal45 => "45deg",
            TileFamily::Concave => "concave",
            TileFamily::Convex => "convex",
            TileFamily::Diagonal22Small => "22deg-small",
            TileFamily::Diagonal22Big => "22deg-big",
            TileFamily::Diagonal67Small => "67deg-small",
            TileFamily::Diagonal67Big => "67deg-big",
            TileFamily::Half => "half",
        }
    }
}

/// A validated tile id in `0..34`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(u8);

impl TileId {
    pub const EMPTY: TileId = TileId(0);
    pub const FULL: TileId = TileId(1);

    /// Clamp an arbitrary integer into the table: ids below zero become
    /// Empty, ids past the end become Full. Level data authored against a
    /// different tileset is a content bug, not a crash.
    pub fn from_raw(raw: i32) -> Self {
        if raw < 0 {
            log::warn!("tile id {raw} below range, clamping to empty");
            TileId::EMPTY
        } else if raw >= TILE_ID_COUNT as i32 {
            log::warn!("tile id {raw} past table end, clamping to full");
            TileId::FULL
        } else {
            TileId(raw as u8)
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn family(self) -> TileFamily {
        TILE_TABLE[self.0 as usize].family
    }

    /// Orientation of the solid part within the family. Components are in
    /// `{-1, 0, 1}`; both are zero for Full/Empty, exactly one is zero for
    /// Half tiles.
    pub fn sign(self) -> Vec2 {
        let g = &TILE_TABLE[self.0 as usize];
        Vec2::new(g.sign_x, g.sign_y)
    }

    /// Unit normal of the slanted face, or zero for families without one
    /// (Empty, Full, Concave, Convex).
    pub fn slope_normal(self) -> Vec2 {
        let g = &TILE_TABLE[self.0 as usize];
        Vec2::new(g.normal_x, g.normal_y)
    }
}

struct TileGeometry {
    family: TileFamily,
    sign_x: f32,
    sign_y: f32,
    normal_x: f32,
    normal_y: f32,
}

const FRAC_1_SQRT_2: f32 = std::f32::consts::FRAC_1_SQRT_2;
/// 1/sqrt(5) and 2/sqrt(5): the shallow and steep faces rise-run 1:2.
const INV_SQRT_5: f32 = 0.447_213_6;
const TWO_INV_SQRT_5: f32 = 0.894_427_2;

const fn plain(family: TileFamily, sx: f32, sy: f32) -> TileGeometry {
    TileGeometry { family, sign_x: sx, sign_y: sy, normal_x: 0.0, normal_y: 0.0 }
}

const fn deg45(sx: f32, sy: f32) -> TileGeometry {
    TileGeometry {
        family: TileFamily::Diagonal45,
        sign_x: sx,
        sign_y: sy,
        normal_x: sx * FRAC_1_SQRT_2,
        normal_y: sy * FRAC_1_SQRT_2,
    }
}

const fn deg22(family: TileFamily, sx: f32, sy: f32) -> TileGeometry {
    TileGeometry {
        family,
        sign_x: sx,
        sign_y: sy,
        normal_x: sx * INV_SQRT_5,
        normal_y: sy * TWO_INV_SQRT_5,
    }
}

const fn deg67(family: TileFamily, sx: f32, sy: f32) -> TileGeometry {
    TileGeometry {
        family,
        sign_x: sx,
        sign_y: sy,
        normal_x: sx * TWO_INV_SQRT_5,
        normal_y: sy * INV_SQRT_5,
    }
}

const fn half(sx: f32, sy: f32) -> TileGeometry {
    TileGeometry { family: TileFamily::Half, sign_x: sx, sign_y: sy, normal_x: sx, normal_y: sy }
}

/// The 34-entry tile table. Level content encodes ids against this exact
/// layout, so the ordering and sign conventions are load-bearing: within each
/// family the four orientations cycle (+x,-y), (-x,-y), (-x,+y), (+x,+y),
/// and half tiles run bottom, top, left, right.
const TILE_TABLE: [TileGeometry; TILE_ID_COUNT] = [
    // 0-1: empty, full
    plain(TileFamily::Empty, 0.0, 0.0),
    plain(TileFamily::Full, 0.0, 0.0),
    // 2-5: 45 degree slopes
    deg45(1.0, -1.0),
    deg45(-1.0, -1.0),
    deg45(-1.0, 1.0),
    deg45(1.0, 1.0),
    // 6-9: concave quarter circles
    plain(TileFamily::Concave, 1.0, -1.0),
    plain(TileFamily::Concave, -1.0, -1.0),
    plain(TileFamily::Concave, -1.0, 1.0),
    plain(TileFamily::Concave, 1.0, 1.0),
    // 10-13: convex quarter circles
    plain(TileFamily::Convex, 1.0, -1.0),
    plain(TileFamily::Convex, -1.0, -1.0),
    plain(TileFamily::Convex, -1.0, 1.0),
    plain(TileFamily::Convex, 1.0, 1.0),
    // 14-17: 22.5 degree slopes, small piece
    deg22(TileFamily::Diagonal22Small, 1.0, -1.0),
    deg22(TileFamily::Diagonal22Small, -1.0, -1.0),
    deg22(TileFamily::Diagonal22Small, -1.0, 1.0),
    deg22(TileFamily::Diagonal22Small, 1.0, 1.0),
    // 18-21: 22.5 degree slopes, big piece
    deg22(TileFamily::Diagonal22Big, 1.0, -1.0),
    deg22(TileFamily::Diagonal22Big, -1.0, -1.0),
    deg22(TileFamily::Diagonal22Big, -1.0, 1.0),
    deg22(TileFamily::Diagonal22Big, 1.0, 1.0),
    // 22-25: 67.5 degree slopes, small piece
    deg67(TileFamily::Diagonal67Small, 1.0, -1.0),
    deg67(TileFamily::Diagonal67Small, -1.0, -1.0),
    deg67(TileFamily::Diagonal67Small, -1.0, 1.0),
    deg67(TileFamily::Diagonal67Small, 1.0, 1.0),
    // 26-29: 67.5 degree slopes, big piece
    deg67(TileFamily::Diagonal67Big, 1.0, -1.0),
    deg67(TileFamily::Diagonal67Big, -1.0, -1.0),
    deg67(TileFamily::Diagonal67Big, -1.0, 1.0),
    deg67(TileFamily::Diagonal67Big, 1.0, 1.0),
    // 30-33: half tiles (solid bottom, top, left, right)
    half(0.0, -1.0),
    half(0.0, 1.0),
    half(1.0, 0.0),
    half(-1.0, 0.0),
];

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_family_table_layout() {
        let expected: [(std::ops::Range<u8>, TileFamily); 10] = [
            (0..1, TileFamily::Empty),
            (1..2, TileFamily::Full),
            (2..6, TileFamily::Diagonal45),
            (6..10, TileFamily::Concave),
            (10..14, TileFamily::Convex),
            (14..18, TileFamily::Diagonal22Small),
            (18..22, TileFamily::Diagonal22Big),
            (22..26, TileFamily::Diagonal67Small),
            (26..30, TileFamily::Diagonal67Big),
            (30..34, TileFamily::Half),
        ];
        for (range, family) in expected {
            for id in range {
                assert_eq!(TileId::from_raw(id as i32).family(), family, "id {id}");
            }
        }
    }

    #[test]
    fn test_sign_cycle() {
        // Every 4-wide family group cycles (+,-), (-,-), (-,+), (+,+)
        for base in [2u8, 6, 10, 14, 18, 22, 26] {
            assert_eq!(TileId(base).sign(), Vec2::new(1.0, -1.0));
            assert_eq!(TileId(base + 1).sign(), Vec2::new(-1.0, -1.0));
            assert_eq!(TileId(base + 2).sign(), Vec2::new(-1.0, 1.0));
            assert_eq!(TileId(base + 3).sign(), Vec2::new(1.0, 1.0));
        }
    }

    #[test]
    fn test_slope_normals_are_unit_length() {
        for id in 0..TILE_ID_COUNT as i32 {
            let n = TileId::from_raw(id).slope_normal();
            if n != Vec2::ZERO {
                assert!((n.length() - 1.0).abs() < 1e-5, "id {id}: {n:?}");
            }
        }
    }

    #[test]
    fn test_normal_literals() {
        // 45deg: sign / sqrt(2)
        let n = TileId::from_raw(2).slope_normal();
        assert!((n.x - FRAC_1_SQRT_2).abs() < 1e-6);
        assert!((n.y + FRAC_1_SQRT_2).abs() < 1e-6);
        // 22deg: (1, 2) / sqrt(5), shallow
        let n = TileId::from_raw(17).slope_normal();
        assert!((n.x - INV_SQRT_5).abs() < 1e-6);
        assert!((n.y - TWO_INV_SQRT_5).abs() < 1e-6);
        // 67deg: (2, 1) / sqrt(5), steep
        let n = TileId::from_raw(22).slope_normal();
        assert!((n.x - TWO_INV_SQRT_5).abs() < 1e-6);
        assert!((n.y + INV_SQRT_5).abs() < 1e-6);
        // half tiles: normal equals the (axis-aligned) sign
        for id in 30..34 {
            let t = TileId::from_raw(id);
            assert_eq!(t.slope_normal(), t.sign());
        }
    }

    #[test]
    fn test_out_of_range_clamps() {
        assert_eq!(TileId::from_raw(-1), TileId::EMPTY);
        assert_eq!(TileId::from_raw(-999), TileId::EMPTY);
        assert_eq!(TileId::from_raw(34), TileId::FULL);
        assert_eq!(TileId::from_raw(1000), TileId::FULL);
    }

    proptest! {
        #[test]
        fn prop_signs_in_range(raw in 0i32..34) {
            let id = TileId::from_raw(raw);
            let s = id.sign();
            prop_assert!([-1.0, 0.0, 1.0].contains(&s.x));
            prop_assert!([-1.0, 0.0, 1.0].contains(&s.y));
        }

        #[test]
        fn prop_one_zero_sign_component_only_for_half(raw in 0i32..34) {
            let id = TileId::from_raw(raw);
            let s = id.sign();
            let exactly_one_zero = (s.x == 0.0) != (s.y == 0.0);
            prop_assert_eq!(exactly_one_zero, id.family() == TileFamily::Half);
        }
    }
}
