//! Falloff math: distance from the origin to damage and overlay duration.
//!
//! Pure functions, no ECS dependency.

use glam::IVec2;
use rand::Rng;

use blastwave_core::constants::{SHAKE_DAMAGE_DIVISOR, UNSTABLE_RADIUS_ERROR};
use blastwave_core::types::manhattan;

/// Damage at `distance` tiles from the origin.
///
/// `base * (1 - 2d / (2r + min_damage))`, truncated toward zero. Non-positive
/// results mean no damage. `min_damage` widens the denominator so the outer
/// ring of small blasts still hurts.
pub fn damage(distance: f32, base: i32, radius: f32, min_damage: i32) -> i32 {
    let effect = 1.0 - ((distance + distance) / ((radius + radius) + min_damage as f32));
    (base as f32 * effect) as i32
}

/// Raw overlay duration for `pos`, scaled between `low` (edge) and `high` (center).
///
/// Uses Manhattan distance over a `2 * radius` span, so diagonal cells near
/// the edge can fall below `low`. A zero radius divides zero by zero at the
/// center and yields NaN; pass the result through [`normalize_duration`].
pub fn duration(pos: IVec2, center: IVec2, radius: f32, low: f32, high: f32) -> f32 {
    let percentage = manhattan(center, pos) as f32 / (radius + radius);
    let reversed_percentage = (1.0 - percentage) * 100.0;
    (reversed_percentage * (high - low) / 100.0) + low
}

/// NaN becomes 0 (no lingering effect); anything else is clamped into `[low, high]`.
pub fn normalize_duration(raw: f32, low: f32, high: f32) -> f32 {
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(low, high)
    }
}

/// Radius of an unstable blast: off by up to a quarter in either direction.
pub fn jitter_radius(radius: f32, rng: &mut impl Rng) -> f32 {
    let error = radius * UNSTABLE_RADIUS_ERROR;
    if error <= 0.0 {
        return radius.max(0.0);
    }
    (radius + rng.gen_range(-error..=error)).max(0.0)
}

/// Camera shake intensity for a blast of `damage`.
pub fn shake_intensity(damage: i32) -> u8 {
    (damage / SHAKE_DAMAGE_DIVISOR).clamp(u8::MIN as i32, u8::MAX as i32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_damage_at_center_is_full() {
        assert_eq!(damage(0.0, 150, 4.0, 2), 150);
    }

    #[test]
    fn test_damage_at_radius_keeps_min_damage_margin() {
        // 150 * (1 - 8/10) is 29.99998 in f32, truncated to 29
        assert_eq!(damage(4.0, 150, 4.0, 2), 29);
        // Without the margin the edge takes nothing.
        assert_eq!(damage(4.0, 150, 4.0, 0), 0);
    }

    #[test]
    fn test_damage_truncates_toward_zero() {
        // 150 * (1 - 2/10) = 120, 150 * (1 - 2*1.5/10) = 105
        assert_eq!(damage(1.0, 150, 4.0, 2), 120);
        assert_eq!(damage(1.5, 150, 4.0, 2), 105);
        // 100 * (1 - 2*sqrt(2)/10) = 71.7 -> 71
        assert_eq!(damage(2f32.sqrt(), 100, 4.0, 2), 71);
    }

    #[test]
    fn test_damage_beyond_reach_is_non_positive() {
        assert!(damage(6.0, 150, 4.0, 2) <= 0);
    }

    #[test]
    fn test_damage_degenerate_is_zero() {
        // 0 / 0 -> NaN, saturating cast -> 0
        assert_eq!(damage(0.0, 150, 0.0, 0), 0);
        assert_eq!(damage(0.0, 150, 0.0, 2), 150);
    }

    #[test]
    fn test_duration_center_and_edge() {
        let c = IVec2::ZERO;
        let center = duration(c, c, 4.0, 0.05, 0.25);
        assert!((center - 0.25).abs() < 1e-6);
        // Manhattan 8 over span 8 -> exactly the low limit.
        let corner = duration(IVec2::new(4, 4), c, 4.0, 0.05, 0.25);
        assert!((corner - 0.05).abs() < 1e-6);
        // Manhattan 4 over span 8 -> halfway.
        let edge = duration(IVec2::new(4, 0), c, 4.0, 0.05, 0.25);
        assert!((edge - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_duration_non_increasing_with_distance() {
        let c = IVec2::new(2, 3);
        let mut previous = f32::INFINITY;
        for step in 0..=4 {
            let d = duration(c + IVec2::new(step, 0), c, 4.0, 0.05, 0.25);
            assert!(d <= previous, "duration increased at step {step}");
            previous = d;
        }
        let mut previous = f32::INFINITY;
        for step in 0..=4 {
            let d = duration(c + IVec2::new(step, step), c, 4.0, 0.05, 0.25);
            assert!(d <= previous, "diagonal duration increased at step {step}");
            previous = d;
        }
    }

    #[test]
    fn test_duration_zero_radius_is_nan_until_normalized() {
        let raw = duration(IVec2::ZERO, IVec2::ZERO, 0.0, 0.05, 0.25);
        assert!(raw.is_nan());
        assert_eq!(normalize_duration(raw, 0.05, 0.25), 0.0);
    }

    #[test]
    fn test_normalize_clamps_into_limits() {
        assert_eq!(normalize_duration(-0.1, 0.05, 0.25), 0.05);
        assert_eq!(normalize_duration(0.9, 0.05, 0.25), 0.25);
        assert_eq!(normalize_duration(0.1, 0.05, 0.25), 0.1);
    }

    #[test]
    fn test_jitter_stays_within_quarter() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let r = jitter_radius(8.0, &mut rng);
            assert!((6.0..=10.0).contains(&r), "{r}");
        }
        assert_eq!(jitter_radius(0.0, &mut rng), 0.0);
    }

    #[test]
    fn test_jitter_is_seed_deterministic() {
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..10 {
            assert_eq!(jitter_radius(4.0, &mut a), jitter_radius(4.0, &mut b));
        }
    }

    #[test]
    fn test_shake_intensity_clamps() {
        assert_eq!(shake_intensity(150), 30);
        assert_eq!(shake_intensity(4), 0);
        assert_eq!(shake_intensity(5000), 255);
        assert_eq!(shake_intensity(-20), 0);
    }
}
