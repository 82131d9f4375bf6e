//=========================================================================
// Waveform Helpers
//=========================================================================
//
// Pure arithmetic shared by the counter variants.
//
//=========================================================================

/// Wraps `value` into `[min, min + range)`.
///
/// Small overshoots (the per-frame case) are folded back by repeated
/// subtraction/addition; anything spanning more than one period falls back
/// to a Euclidean remainder. A non-positive `range` collapses to `min`.
pub(super) fn wrap_half_open(value: f32, min: f32, range: f32) -> f32 {
    if range <= 0.0 {
        return min;
    }

    let max = min + range;
    let mut v = value;

    if v >= max + range || v < min - range {
        v = min + (v - min).rem_euclid(range);
    } else {
        while v >= max {
            v -= range;
        }
        while v < min {
            v += range;
        }
    }

    // Rounding can land a hair on the excluded bound.
    if v >= max || v < min {
        min
    } else {
        v
    }
}

/// Triangle wave over an unfolded coordinate.
///
/// `phase` is expected in `[0, 2 * range)`; the output is
/// `min + |phase - range|`, so `phase == 0` maps to `min + range` and
/// `phase == range` maps to `min`.
pub(super) fn triangle(phase: f32, min: f32, range: f32) -> f32 {
    min + (phase - range).abs()
}

/// Inverse of [`triangle`] on the `phase >= range` half.
///
/// On that half the output moves with the sign of the rate, so a counter
/// re-seeded here heads in the direction its rate points.
pub(super) fn unfold(value: f32, min: f32, range: f32) -> f32 {
    wrap_half_open(range + (value - min), 0.0, 2.0 * range)
}

//=========================================================================
// Unit Tests
//=========================================================================
