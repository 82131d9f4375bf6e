//=========================================================================
// Error Types
//=========================================================================
//
// Recoverable configuration errors.
//
// Thread-affinity and lifecycle contract violations are not represented
// here: they are caller defects and panic at the call site.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== CounterError ========================================================

/// Rejected counter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CounterError {
    /// `min` is greater than `max`.
    #[error("counter bounds inverted: min {min} > max {max}")]
    InvertedBounds { min: f32, max: f32 },

    /// The starting value lies outside `[min, max]`.
    #[error("counter value {value} outside [{min}, {max}]")]
    ValueOutOfBounds { min: f32, max: f32, value: f32 },

    /// A bound, value or rate is NaN or infinite.
    #[error("counter parameter is not finite")]
    NotFinite,
}

//=========================================================================
// Unit Tests
//=========================================================================
