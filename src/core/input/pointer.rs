//=========================================================================
// Input Pointer
//=========================================================================
//
// State of a single touch point / pointer.
//
// Two instances exist per pointer id:
//   producer side (UI thread)   → update() inside the slot mutex, side A
//   consumer side (loop thread) → copy_from() inside the slot mutex, side B
//
// The consumer only ever sees a (x, y, pressed) triple written by one
// update() call.
//
//=========================================================================

//=== InputPointer ========================================================

/// Position and press state of one pointer, in screen-normalized
/// coordinates (`0.0..=1.0` on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputPointer {
    x: f32,
    y: f32,
    pressed: bool,
    just_released: bool,
}

impl InputPointer {
    //--- Construction -----------------------------------------------------

    pub const fn new() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            pressed: false,
            just_released: false,
        }
    }

    //--- Writes -----------------------------------------------------------

    /// Producer-side write.
    ///
    /// `just_released` becomes `true` exactly when this write turns a
    /// pressed pointer into a released one.
    pub fn update(&mut self, x: f32, y: f32, pressed: bool) {
        self.just_released = self.pressed && !pressed;
        self.x = x;
        self.y = y;
        self.pressed = pressed;
    }

    /// Consumer-side snapshot of `other`.
    ///
    /// Copies the triple as a unit. `just_released` is derived from this
    /// instance's previous press state, so it fires on the first snapshot
    /// after a release and clears on the next one.
    pub fn copy_from(&mut self, other: &InputPointer) {
        self.just_released = self.pressed && !other.pressed;
        self.x = other.x;
        self.y = other.y;
        self.pressed = other.pressed;
    }

    //--- Queries ----------------------------------------------------------

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    #[inline]
    pub fn just_released(&self) -> bool {
        self.just_released
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
