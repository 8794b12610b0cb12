//! Wheel geometry: slice widths, angle wrapping and the angle → item mapping.
//!
//! Angles are radians, unbounded, and grow clockwise. The pointer sits at the
//! top of the wheel. Slice `i` covers the wrapped angles
//! `[i * width, (i + 1) * width)`, so the item under the pointer for any angle
//! is [`winner_at`].

use std::f64::consts::TAU;

/// Angular width of one sector.
#[inline]
pub fn slice_width(item_count: usize) -> f64 {
    TAU / item_count.max(1) as f64
}

/// Wrap an unbounded angle into `[0, 2π)`.
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Index of the item under the pointer at `angle`. Returns 0 for an empty wheel.
pub fn winner_at(angle: f64, item_count: usize) -> usize {
    if item_count == 0 {
        return 0;
    }
    let slot = (wrap_angle(angle) / slice_width(item_count)).floor() as usize;
    slot % item_count
}

/// Wrapped angle at the middle of slice `index`.
#[inline]
pub fn slice_center(index: usize, item_count: usize) -> f64 {
    (index as f64 + 0.5) * slice_width(item_count)
}

/// Forward rotation from `start` that ends on the wrapped angle `landing`
/// after `full_turns` complete revolutions.
pub fn rotation_to(start: f64, landing: f64, full_turns: u32) -> f64 {
    (landing - start).rem_euclid(TAU) + f64::from(full_turns) * TAU
}
