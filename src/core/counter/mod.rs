//=========================================================================
// Counters
//=========================================================================
//
// Time-driven scalar generators used to animate sprite properties.
//
// Variants:
//   Constant         value never changes
//   Looping          sawtooth over [min, max)   (max exclusive)
//   PingPong         triangle over [min, max]   (max inclusive)
//   PingPongStepped  triangle, rounded to whole steps
//   Once             ramps to the bound it travels towards, then sticks
//
// Contract:
//   reset(min, max, value) validates and re-derives internal phase
//   advance(dt) steps by `rate * dt` and returns the new value
//
// Looping never yields its maximum; PingPong and Once do.
//
//=========================================================================

//=== Module Declarations =================================================

mod waveform;

//=== Internal Dependencies ===============================================

use crate::core::error::CounterError;
use waveform::{triangle, unfold, wrap_half_open};

//=== CounterKind =========================================================

/// Waveform selected for a [`Counter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    Constant,
    Looping,
    PingPong,
    PingPongStepped,
    Once,
}

//=== Counter =============================================================

/// Stateful scalar generator advanced once per frame.
///
/// `advance` takes `&mut self`: a counter has exactly one driver.
///
/// # Examples
///
/// ```
/// use spritestep::core::counter::Counter;
///
/// let mut frame = Counter::looping(0.0, 10.0, 0.0, 5.0)?;
/// assert_eq!(frame.advance(1.0), 5.0);
/// assert_eq!(frame.advance(1.0), 0.0);
/// # Ok::<(), spritestep::core::error::CounterError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    kind: CounterKind,
    min: f32,
    max: f32,
    value: f32,
    rate: f32,

    /// Unfolded triangle coordinate in `[0, 2 * (max - min))`.
    phase: f32,

    /// Once: the bound in the direction of travel has been reached.
    finished: bool,
}

impl Counter {
    //--- Construction -----------------------------------------------------

    /// Creates a counter of any kind.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError`] if the bounds are inverted, `value` lies
    /// outside them, or any argument is not finite.
    pub fn new(
        kind: CounterKind,
        min: f32,
        max: f32,
        value: f32,
        rate: f32,
    ) -> Result<Self, CounterError> {
        if !rate.is_finite() {
            return Err(CounterError::NotFinite);
        }

        let mut counter = Self {
            kind,
            min,
            max,
            value,
            rate,
            phase: 0.0,
            finished: false,
        };
        counter.reset(min, max, value)?;
        Ok(counter)
    }

    /// A counter that always yields `value`.
    pub fn constant(value: f32) -> Self {
        Self {
            kind: CounterKind::Constant,
            min: value,
            max: value,
            value,
            rate: 0.0,
            phase: 0.0,
            finished: false,
        }
    }

    pub fn looping(min: f32, max: f32, value: f32, rate: f32) -> Result<Self, CounterError> {
        Self::new(CounterKind::Looping, min, max, value, rate)
    }

    pub fn ping_pong(min: f32, max: f32, value: f32, rate: f32) -> Result<Self, CounterError> {
        Self::new(CounterKind::PingPong, min, max, value, rate)
    }

    pub fn ping_pong_stepped(
        min: f32,
        max: f32,
        value: f32,
        rate: f32,
    ) -> Result<Self, CounterError> {
        Self::new(CounterKind::PingPongStepped, min, max, value, rate)
    }

    pub fn once(min: f32, max: f32, value: f32, rate: f32) -> Result<Self, CounterError> {
        Self::new(CounterKind::Once, min, max, value, rate)
    }

    //--- Configuration ----------------------------------------------------

    /// Re-seeds bounds and value, keeping kind and rate.
    ///
    /// Ping-pong phase is unfolded again from `value` so the next `advance`
    /// continues from `value` in the direction of the current rate.
    ///
    /// # Errors
    ///
    /// Rejects inverted bounds, an out-of-bounds value and non-finite
    /// input; the counter is left untouched in that case.
    pub fn reset(&mut self, min: f32, max: f32, value: f32) -> Result<(), CounterError> {
        if !(min.is_finite() && max.is_finite() && value.is_finite()) {
            return Err(CounterError::NotFinite);
        }
        if min > max {
            return Err(CounterError::InvertedBounds { min, max });
        }
        if value < min || value > max {
            return Err(CounterError::ValueOutOfBounds { min, max, value });
        }

        self.min = min;
        self.max = max;
        self.value = value;
        self.finished = false;
        self.phase = match self.kind {
            CounterKind::PingPong | CounterKind::PingPongStepped => {
                unfold(value, min, max - min)
            }
            _ => 0.0,
        };

        Ok(())
    }

    /// Changes the signed rate (units per second).
    ///
    /// Flipping the sign reverses a ping-pong in place. A finished `Once`
    /// counter stays finished.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::NotFinite`] for NaN or infinite rates.
    pub fn set_rate(&mut self, rate: f32) -> Result<(), CounterError> {
        if !rate.is_finite() {
            return Err(CounterError::NotFinite);
        }

        self.rate = rate;
        Ok(())
    }

    //--- Stepping ---------------------------------------------------------

    /// Advances by `delta_seconds` and returns the new value.
    pub fn advance(&mut self, delta_seconds: f32) -> f32 {
        let step = self.rate * delta_seconds;

        self.value = match self.kind {
            CounterKind::Constant => self.value,
            CounterKind::Looping => wrap_half_open(self.value + step, self.min, self.range()),
            CounterKind::PingPong => self.advance_triangle(step),
            CounterKind::PingPongStepped => {
                self.advance_triangle(step).round().clamp(self.min, self.max)
            }
            CounterKind::Once => self.advance_once(step),
        };

        self.value
    }

    fn advance_triangle(&mut self, step: f32) -> f32 {
        let range = self.range();
        self.phase = wrap_half_open(self.phase + step, 0.0, 2.0 * range);
        triangle(self.phase, self.min, range).clamp(self.min, self.max)
    }

    fn advance_once(&mut self, step: f32) -> f32 {
        if self.finished {
            return self.value;
        }

        let v = self.value + step;
        if self.rate > 0.0 && v >= self.max {
            self.finished = true;
            self.max
        } else if self.rate < 0.0 && v <= self.min {
            self.finished = true;
            self.min
        } else {
            v.clamp(self.min, self.max)
        }
    }

    //--- Queries ----------------------------------------------------------

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn kind(&self) -> CounterKind {
        self.kind
    }

    #[inline]
    pub fn min(&self) -> f32 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    #[inline]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// `true` once a `Once` counter has reached its bound.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline]
    fn range(&self) -> f32 {
        self.max - self.min
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
