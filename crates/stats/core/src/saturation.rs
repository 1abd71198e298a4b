//! Saturating `i32` arithmetic shared by every aggregation path.
//!
//! Results that would leave the `i32` range are clamped to `i32::MIN` or
//! `i32::MAX`. There is no overflow flag: once a value is clamped, later
//! arithmetic continues from the clamped value.

/// Adds `delta` to `base`, clamping on overflow.
#[inline]
pub const fn add(base: i32, delta: i32) -> i32 {
    match base.checked_add(delta) {
        Some(sum) => sum,
        None if delta < 0 => i32::MIN,
        None => i32::MAX,
    }
}

/// Subtracts `delta` from `base`, clamping on overflow.
#[inline]
pub const fn sub(base: i32, delta: i32) -> i32 {
    match base.checked_sub(delta) {
        Some(diff) => diff,
        None if delta < 0 => i32::MAX,
        None => i32::MIN,
    }
}

/// Change between two observed values, clamped to the `i32` range.
#[inline]
pub const fn delta(old: i32, new: i32) -> i32 {
    sub(new, old)
}

/// Left fold of [`add`] starting at zero.
///
/// Each step clamps independently, so the result equals what incremental
/// additions in the same order would produce.
pub fn sum<I>(values: I) -> i32
where
    I: IntoIterator<Item = i32>,
{
    values.into_iter().fold(0, add)
}
