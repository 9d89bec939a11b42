//! Axial hex bucketing for the spatial index.

use bevy::math::{DVec2, IVec2, Vec2};

/// Layout coefficients `(x weight of q, x weight of r, y weight of r)`.
/// The y weight of q is one.
const LAYOUT_QX: f64 = 2.0 / 3.0;
const LAYOUT_RX: f64 = -1.0 / 3.0;
const LAYOUT_RY: f64 = 0.577_350_269_189_625_8;

/// Cells scanned by a zombie looking for a target, in scan order, relative to
/// its own cell. Only five of the six ring neighbours plus one opposite
/// diagonal are visited: `(-1, +1)` and `(+1, -1)` are never scanned.
pub const SEARCH_PATTERN: [IVec2; 7] = [
    IVec2::new(0, 0),
    IVec2::new(0, -1),
    IVec2::new(0, 1),
    IVec2::new(1, 0),
    IVec2::new(-1, 0),
    IVec2::new(1, 1),
    IVec2::new(-1, -1),
];

/// Axial cell containing `position` for hexes of size `scale`. Coordinates
/// are rounded half to even.
pub fn hex_cell(position: Vec2, scale: f32) -> IVec2 {
    let p: DVec2 = position.as_dvec2() / scale as f64;
    let q = (LAYOUT_QX * p.x + p.y) * 2.0;
    let r = (LAYOUT_RX * p.x + LAYOUT_RY * p.y) * 2.0;
    IVec2::new(q.round_ties_even() as i32, r.round_ties_even() as i32)
}

/// 32-bit bucket key for a cell. Distinct cells may share a key, in which case
/// their occupants share a bucket.
#[inline]
pub fn cell_key(cell: IVec2) -> u32 {
    (cell.x as u32)
        .wrapping_mul(0x83B5_8237)
        .wrapping_add((cell.y as u32).wrapping_mul(0x833E_3E29))
        .wrapping_add(0xA47D_5C5D)
}

/// Bucket keys scanned from `origin`, in [`SEARCH_PATTERN`] order. Cell
/// coordinates wrap at the `i32` boundary like the key hash does.
pub fn search_keys(origin: IVec2) -> [u32; 7] {
    SEARCH_PATTERN.map(|offset| cell_key(origin.wrapping_add(offset)))
}

/// Inverse of the bucketing transform: the position whose unrounded axial
/// coordinates are exactly `(q, r)`.
#[cfg(test)]
pub(crate) fn axial_to_position(q: f64, r: f64, scale: f32) -> Vec2 {
    let a = q * 0.5;
    let b = r * 0.5;
    let det = LAYOUT_QX * LAYOUT_RY - LAYOUT_RX;
    let x = (a * LAYOUT_RY - b) / det;
    let y = (LAYOUT_QX * b - LAYOUT_RX * a) / det;
    (DVec2::new(x, y) * scale as f64).as_vec2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_origin_cell() {
        assert_eq!(hex_cell(Vec2::ZERO, 10.0), IVec2::ZERO);
        assert_eq!(hex_cell(Vec2::new(0.1, 0.0), 10.0), IVec2::ZERO);
        assert_eq!(hex_cell(Vec2::new(1.0, 0.0), 10.0), IVec2::ZERO);
    }

    #[test]
    fn distant_point_leaves_search_pattern() {
        let cell = hex_cell(Vec2::new(5.0, 5.0), 10.0);
        assert_eq!(cell, IVec2::new(2, 0));
        assert!(!SEARCH_PATTERN.contains(&cell));
    }

    #[test]
    fn axial_inverse_round_trips_cell_centres() {
        for q in -3..=3 {
            for r in -3..=3 {
                let position = axial_to_position(q as f64, r as f64, 4.0);
                assert_eq!(hex_cell(position, 4.0), IVec2::new(q, r));
            }
        }
    }

    #[test]
    fn pattern_skips_two_diagonals() {
        assert!(!SEARCH_PATTERN.contains(&IVec2::new(-1, 1)));
        assert!(!SEARCH_PATTERN.contains(&IVec2::new(1, -1)));
        let keys = search_keys(IVec2::new(4, -2));
        assert_eq!(keys[0], cell_key(IVec2::new(4, -2)));
        assert_eq!(keys[6], cell_key(IVec2::new(3, -3)));
    }

    #[test]
    fn saturated_cells_wrap_instead_of_overflowing() {
        let edge = IVec2::new(i32::MAX, i32::MIN);
        let keys = search_keys(edge);
        assert_eq!(keys[3], cell_key(IVec2::new(i32::MIN, i32::MIN)));
        assert_eq!(keys[6], cell_key(IVec2::new(i32::MAX - 1, i32::MAX)));
        assert_eq!(hex_cell(Vec2::new(1.0e12, 0.0), 10.0).x, i32::MAX);
    }

    #[test]
    fn cell_key_is_stable() {
        assert_eq!(cell_key(IVec2::ZERO), 0xA47D_5C5D);
        assert_eq!(
            cell_key(IVec2::new(1, 0)),
            0x83B5_8237u32.wrapping_add(0xA47D_5C5D)
        );
    }
}
