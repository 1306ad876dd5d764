//! Grid arithmetic shared by the fills.
//!
//! Grids are anchored to multiples of their pitch so that neighbouring
//! layers line up. That needs floor semantics for negative coordinates,
//! which `%` on `f64` does not give.

/// Remainder with the sign of `step` (`step > 0`).
#[inline]
pub fn floor_mod(value: f64, step: f64) -> f64 {
    value.rem_euclid(step)
}

/// Largest multiple of `step` not above `value`.
#[inline]
pub fn grid_start(value: f64, step: f64) -> f64 {
    value - floor_mod(value, step)
}

/// Index of the grid cell holding `value`.
///
/// The remainder is removed first and the quotient snapped to the nearest
/// integer, so the division itself cannot round a cell low.
#[inline]
pub fn floor_div(value: f64, step: f64) -> f64 {
    ((value - floor_mod(value, step)) / step).round()
}

/// Most grid lines a single walk may take along one axis.
pub const MAX_GRID_STEPS: f64 = 1.0e6;

/// Number of `step`s from `start` to `end`, or `None` when the walk would
/// stall or run away.
///
/// A step too small to move either end in `f64` never advances the loop,
/// and one that is merely tiny would take longer than any plot is worth.
pub fn grid_steps(start: f64, end: f64, step: f64) -> Option<f64> {
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    if start + step == start || end + step == end {
        return None;
    }
    let steps = ((end - start) / step).ceil().max(0.0);
    (steps.is_finite() && steps <= MAX_GRID_STEPS).then_some(steps)
}
