//=========================================================================
// Pointer Mapper
//=========================================================================
//
// Converts Winit mouse/touch events into pointer slot writes.
//
// Architecture:
//   Winit Events → PointerMapper → PointerSample → GameLoopHandle::update_pointer
//
// Positions are normalized against the current surface size and clamped
// into 0..1. The mouse always writes slot 0; each active touch is pinned
// to the first free slot until it ends. Touches beyond the pool are
// dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};
use winit::{
    event::{ElementState, MouseButton, TouchPhase},
    keyboard::{Key, NamedKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::POINTER_COUNT;

//=== PointerSample =======================================================

/// One producer write for the pointer pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PointerSample {
    pub(crate) slot: usize,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) pressed: bool,
}

//=== PointerMapper =======================================================

const MOUSE_SLOT: usize = 0;

pub(crate) struct PointerMapper {
    surface: (f32, f32),
    mouse: (f32, f32),
    mouse_pressed: bool,
    touches: [Option<u64>; POINTER_COUNT],
}

impl PointerMapper {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            surface: (0.0, 0.0),
            mouse: (0.0, 0.0),
            mouse_pressed: false,
            touches: [None; POINTER_COUNT],
        }
    }

    /// Surface size in physical pixels used for normalization.
    pub(crate) fn set_surface(&mut self, width: u32, height: u32) {
        self.surface = (width as f32, height as f32);
    }

    //--- Mouse ------------------------------------------------------------

    pub(crate) fn mouse_moved(&mut self, x: f64, y: f64) -> PointerSample {
        self.mouse = self.normalize(x, y);
        self.mouse_sample()
    }

    /// Only the left button drives a pointer.
    pub(crate) fn mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
    ) -> Option<PointerSample> {
        if button != MouseButton::Left {
            return None;
        }
        self.mouse_pressed = state == ElementState::Pressed;
        Some(self.mouse_sample())
    }

    //--- Touch ------------------------------------------------------------

    pub(crate) fn touch(&mut self, id: u64, phase: TouchPhase, x: f64, y: f64) -> Option<PointerSample> {
        let (x, y) = self.normalize(x, y);

        let slot = match phase {
            TouchPhase::Started => {
                let Some(slot) = self.touches.iter().position(Option::is_none) else {
                    debug!(target: "platform", "Touch {} dropped, all {} slots busy", id, POINTER_COUNT);
                    return None;
                };
                self.touches[slot] = Some(id);
                slot
            }
            TouchPhase::Moved | TouchPhase::Ended | TouchPhase::Cancelled => {
                self.slot_of(id)?
            }
        };

        let pressed = matches!(phase, TouchPhase::Started | TouchPhase::Moved);
        if !pressed {
            self.touches[slot] = None;
        }

        trace!(target: "platform", "Touch {} {:?} on slot {}", id, phase, slot);
        Some(PointerSample {
            slot,
            x,
            y,
            pressed,
        })
    }

    //--- Internal Helpers -------------------------------------------------

    fn slot_of(&self, id: u64) -> Option<usize> {
        self.touches.iter().position(|touch| *touch == Some(id))
    }

    fn mouse_sample(&self) -> PointerSample {
        PointerSample {
            slot: MOUSE_SLOT,
            x: self.mouse.0,
            y: self.mouse.1,
            pressed: self.mouse_pressed,
        }
    }

    fn normalize(&self, x: f64, y: f64) -> (f32, f32) {
        let (width, height) = self.surface;
        if width <= 0.0 || height <= 0.0 {
            return (0.0, 0.0);
        }
        (
            (x as f32 / width).clamp(0.0, 1.0),
            (y as f32 / height).clamp(0.0, 1.0),
        )
    }
}

//=== Back Button =========================================================

/// Escape and the hardware/browser back keys act as the back button.
pub(crate) fn is_back_key(key: &Key, state: ElementState, repeat: bool) -> bool {
    state == ElementState::Pressed
        && !repeat
        && matches!(
            key,
            Key::Named(NamedKey::Escape | NamedKey::BrowserBack | NamedKey::GoBack)
        )
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> PointerMapper {
        let mut mapper = PointerMapper::new();
        mapper.set_surface(800, 400);
        mapper
    }

    //=====================================================================
    // Mouse
    //=====================================================================

    #[test]
    fn mouse_positions_are_normalized() {
        let mut mapper = mapper();
        let sample = mapper.mouse_moved(400.0, 100.0);

        assert_eq!(sample.slot, 0);
        assert_eq!((sample.x, sample.y), (0.5, 0.25));
        assert!(!sample.pressed);
    }

    #[test]
    fn positions_outside_surface_are_clamped() {
        let mut mapper = mapper();
        let sample = mapper.mouse_moved(-20.0, 900.0);
        assert_eq!((sample.x, sample.y), (0.0, 1.0));
    }

    #[test]
    fn left_button_drives_press_state() {
        let mut mapper = mapper();
        mapper.mouse_moved(80.0, 40.0);

        let down = mapper
            .mouse_button(MouseButton::Left, ElementState::Pressed)
            .expect("left button maps");
        assert!(down.pressed);
        assert_eq!((down.x, down.y), (0.1, 0.1));

        assert!(mapper.mouse_moved(160.0, 40.0).pressed, "drag keeps pressed");

        let up = mapper
            .mouse_button(MouseButton::Left, ElementState::Released)
            .expect("left button maps");
        assert!(!up.pressed);
    }

    #[test]
    fn other_buttons_are_ignored() {
        let mut mapper = mapper();
        assert_eq!(mapper.mouse_button(MouseButton::Right, ElementState::Pressed), None);
    }

    #[test]
    fn zero_surface_maps_to_origin() {
        let mut mapper = PointerMapper::new();
        let sample = mapper.mouse_moved(10.0, 10.0);
        assert_eq!((sample.x, sample.y), (0.0, 0.0));
    }

    //=====================================================================
    // Touch
    //=====================================================================

    #[test]
    fn touches_take_free_slots_in_order() {
        let mut mapper = mapper();

        let first = mapper.touch(7, TouchPhase::Started, 0.0, 0.0).unwrap();
        let second = mapper.touch(9, TouchPhase::Started, 0.0, 0.0).unwrap();

        assert_eq!(first.slot, 0);
        assert_eq!(second.slot, 1);
        assert!(first.pressed && second.pressed);
    }

    #[test]
    fn touch_keeps_slot_until_released() {
        let mut mapper = mapper();
        mapper.touch(3, TouchPhase::Started, 0.0, 0.0);
        mapper.touch(4, TouchPhase::Started, 0.0, 0.0);

        let moved = mapper.touch(4, TouchPhase::Moved, 400.0, 200.0).unwrap();
        assert_eq!(moved.slot, 1);
        assert_eq!((moved.x, moved.y), (0.5, 0.5));

        let ended = mapper.touch(3, TouchPhase::Ended, 0.0, 0.0).unwrap();
        assert_eq!(ended.slot, 0);
        assert!(!ended.pressed);

        let reused = mapper.touch(5, TouchPhase::Started, 0.0, 0.0).unwrap();
        assert_eq!(reused.slot, 0, "freed slot is reused");
    }

    #[test]
    fn touches_beyond_pool_are_dropped() {
        let mut mapper = mapper();
        for id in 0..POINTER_COUNT as u64 {
            assert!(mapper.touch(id, TouchPhase::Started, 0.0, 0.0).is_some());
        }
        assert_eq!(mapper.touch(99, TouchPhase::Started, 0.0, 0.0), None);
        assert_eq!(mapper.touch(99, TouchPhase::Moved, 0.0, 0.0), None);
    }

    #[test]
    fn cancelled_touch_releases_slot() {
        let mut mapper = mapper();
        mapper.touch(1, TouchPhase::Started, 0.0, 0.0);

        let cancelled = mapper.touch(1, TouchPhase::Cancelled, 0.0, 0.0).unwrap();
        assert!(!cancelled.pressed);
        assert_eq!(mapper.touch(1, TouchPhase::Moved, 0.0, 0.0), None);
    }

    //=====================================================================
    // Back Button
    //=====================================================================

    #[test]
    fn escape_press_is_back() {
        let escape = Key::Named(NamedKey::Escape);
        assert!(is_back_key(&escape, ElementState::Pressed, false));
        assert!(!is_back_key(&escape, ElementState::Released, false));
        assert!(!is_back_key(&escape, ElementState::Pressed, true));
    }

    #[test]
    fn other_keys_are_not_back() {
        assert!(is_back_key(&Key::Named(NamedKey::GoBack), ElementState::Pressed, false));
        assert!(!is_back_key(&Key::Named(NamedKey::Enter), ElementState::Pressed, false));
    }
}
