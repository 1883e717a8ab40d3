//! Blast shape generation.
//!
//! Produces the ordered set of cells a propagation covers. Output is
//! x-major, then y ascending, and stable for fixed inputs.

use std::collections::HashSet;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use blastwave_core::constants::{JAGGED_RADIUS_ERROR, MAX_RADIUS};
use blastwave_core::enums::ShapeKind;

/// Angular sectors a jagged edge is split into.
const JAGGED_SECTORS: usize = 16;

/// Shapes never reach past this, whatever radius is asked for. Leaves room
/// for unstable jitter on top of the largest valid event radius.
pub const MAX_SHAPE_RADIUS: i32 = 2 * MAX_RADIUS as i32;

/// Cells covered by `shape` around `center` with integer `radius`.
///
/// Never empty: radius 0 (or less) yields at least the center cell.
/// Radii above [`MAX_SHAPE_RADIUS`] are clamped to it.
pub fn generate(shape: &ShapeKind, center: IVec2, radius: i32) -> Vec<IVec2> {
    let r = radius.clamp(0, MAX_SHAPE_RADIUS);

    let cells = match shape {
        ShapeKind::Circle => square_scan(center, r, |d| d.x * d.x + d.y * d.y <= r * r),
        ShapeKind::Square => square_scan(center, r, |_| true),
        ShapeKind::Cross => square_scan(center, r, |d| d.x == 0 || d.y == 0),
        ShapeKind::Diamond => square_scan(center, r, |d| d.x.abs() + d.y.abs() <= r),
        ShapeKind::Jagged => {
            let edge = jagged_edge(center, r);
            square_scan(center, r + jagged_slack(r), |d| {
                if d == IVec2::ZERO {
                    return true;
                }
                let sector = sector_of(d);
                d.as_vec2().length() <= edge[sector]
            })
        }
        ShapeKind::Custom(offsets) => {
            let mut seen = HashSet::new();
            offsets
                .iter()
                .filter(|offset| seen.insert(**offset))
                .map(|offset| center + *offset)
                .collect()
        }
    };

    if cells.is_empty() {
        vec![center]
    } else {
        cells
    }
}

/// Scan the bounding square of radius `r` and keep offsets passing `keep`.
fn square_scan(center: IVec2, r: i32, keep: impl Fn(IVec2) -> bool) -> Vec<IVec2> {
    let mut cells = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
    for x in -r..=r {
        for y in -r..=r {
            let offset = IVec2::new(x, y);
            if keep(offset) {
                cells.push(center + offset);
            }
        }
    }
    cells
}

/// Extra scan margin so outward-jittered sectors are not clipped.
fn jagged_slack(r: i32) -> i32 {
    (r as f32 * JAGGED_RADIUS_ERROR).ceil() as i32
}

/// Per-sector radius for a jagged edge, seeded from the inputs.
fn jagged_edge(center: IVec2, r: i32) -> [f32; JAGGED_SECTORS] {
    let seed = (((center.x as u32 as u64) << 32) | (center.y as u32 as u64))
        ^ (r as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let spread = r as f32 * JAGGED_RADIUS_ERROR;

    let mut edge = [r as f32; JAGGED_SECTORS];
    if spread > 0.0 {
        for radius in edge.iter_mut() {
            *radius += rng.gen_range(-spread..=spread);
        }
    }
    edge
}

fn sector_of(offset: IVec2) -> usize {
    let angle = (offset.y as f32).atan2(offset.x as f32).rem_euclid(std::f32::consts::TAU);
    let sector = (angle / std::f32::consts::TAU * JAGGED_SECTORS as f32) as usize;
    sector.min(JAGGED_SECTORS - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force_disk(center: IVec2, r: i32) -> HashSet<IVec2> {
        let mut cells = HashSet::new();
        for x in -(r + 2)..=(r + 2) {
            for y in -(r + 2)..=(r + 2) {
                let d = IVec2::new(x, y);
                if d.as_vec2().length() <= r as f32 {
                    cells.insert(center + d);
                }
            }
        }
        cells
    }

    #[test]
    fn test_circle_is_exact_disk_without_duplicates() {
        let center = IVec2::new(3, -7);
        for r in 1..=8 {
            let cells = generate(&ShapeKind::Circle, center, r);
            let unique: HashSet<IVec2> = cells.iter().copied().collect();
            assert_eq!(unique.len(), cells.len(), "duplicates at radius {r}");
            assert_eq!(unique, brute_force_disk(center, r), "wrong disk at radius {r}");
        }
    }

    #[test]
    fn test_circle_radius_four_cell_count() {
        // Gauss circle problem: N(4) = 49.
        assert_eq!(generate(&ShapeKind::Circle, IVec2::ZERO, 4).len(), 49);
    }

    #[test]
    fn test_radius_zero_yields_center() {
        let center = IVec2::new(5, 5);
        for shape in [
            ShapeKind::Circle,
            ShapeKind::Square,
            ShapeKind::Cross,
            ShapeKind::Diamond,
            ShapeKind::Jagged,
            ShapeKind::Custom(Vec::new()),
        ] {
            assert_eq!(generate(&shape, center, 0), vec![center], "{shape:?}");
        }
        assert_eq!(generate(&ShapeKind::Circle, center, -3), vec![center]);
    }

    #[test]
    fn test_huge_radius_is_clamped() {
        let capped = generate(&ShapeKind::Square, IVec2::ZERO, MAX_SHAPE_RADIUS);
        let side = 2 * MAX_SHAPE_RADIUS as usize + 1;
        assert_eq!(capped.len(), side * side);
        for radius in [50_000, i32::MAX] {
            assert_eq!(generate(&ShapeKind::Square, IVec2::ZERO, radius), capped);
        }
        let circle = generate(&ShapeKind::Circle, IVec2::ZERO, i32::MAX);
        assert_eq!(circle, generate(&ShapeKind::Circle, IVec2::ZERO, MAX_SHAPE_RADIUS));
        assert!(generate(&ShapeKind::Jagged, IVec2::ZERO, i32::MAX).len() > 1);
    }

    #[test]
    fn test_square_and_cross_and_diamond_counts() {
        assert_eq!(generate(&ShapeKind::Square, IVec2::ZERO, 2).len(), 25);
        assert_eq!(generate(&ShapeKind::Cross, IVec2::ZERO, 2).len(), 9);
        assert_eq!(generate(&ShapeKind::Diamond, IVec2::ZERO, 2).len(), 13);
    }

    #[test]
    fn test_order_is_x_major_then_y() {
        let cells = generate(&ShapeKind::Square, IVec2::ZERO, 1);
        assert_eq!(cells[0], IVec2::new(-1, -1));
        assert_eq!(cells[1], IVec2::new(-1, 0));
        assert_eq!(cells[3], IVec2::new(0, -1));
        assert_eq!(cells[8], IVec2::new(1, 1));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let center = IVec2::new(-4, 9);
        for shape in [ShapeKind::Circle, ShapeKind::Jagged] {
            assert_eq!(generate(&shape, center, 6), generate(&shape, center, 6));
        }
    }

    #[test]
    fn test_jagged_stays_near_circle() {
        let center = IVec2::ZERO;
        let r = 8;
        let cells = generate(&ShapeKind::Jagged, center, r);
        let unique: HashSet<IVec2> = cells.iter().copied().collect();
        assert_eq!(unique.len(), cells.len());
        assert!(cells.contains(&center));

        let max = r as f32 * (1.0 + JAGGED_RADIUS_ERROR);
        for cell in &cells {
            assert!(cell.as_vec2().length() <= max + 1e-4, "{cell} too far out");
        }
        // Everything well inside the minimum edge is always covered.
        let min = r as f32 * (1.0 - JAGGED_RADIUS_ERROR);
        for cell in brute_force_disk(center, min.floor() as i32) {
            assert!(unique.contains(&cell), "{cell} missing from jagged core");
        }
    }

    #[test]
    fn test_custom_offsets_dedup_in_order() {
        let shape = ShapeKind::Custom(vec![
            IVec2::new(1, 0),
            IVec2::ZERO,
            IVec2::new(1, 0),
            IVec2::new(0, 2),
        ]);
        let center = IVec2::new(10, 10);
        assert_eq!(
            generate(&shape, center, 3),
            vec![IVec2::new(11, 10), IVec2::new(10, 10), IVec2::new(10, 12)]
        );
    }
}
