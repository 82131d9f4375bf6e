//=========================================================================
// Host Bridge Interface
//=========================================================================
//
// Contracts between the game loop and the collaborators it does not own:
// the rendering backend, the persisted settings store, the party that
// owns the game's lifetime, and the host's UI-thread wakeup.
//
// The loop only calls into these; it never implements rendering, file
// I/O or window management itself.
//
//=========================================================================

//=== RenderBackend =======================================================

/// Rendering backend driven by the loop thread.
///
/// Per-element draw primitives are the backend's own inherent API: scenario
/// elements receive the concrete backend type `R` and call it directly.
pub trait RenderBackend: Send + 'static {
    /// Clears the frame before any element draws.
    fn clear_frame(&mut self);

    /// Signals that every element has drawn and the frame can be presented.
    fn frame_complete(&mut self);

    /// The render surface exists (again) with the given size in pixels.
    fn surface_available(&mut self, _width: u32, _height: u32) {}

    /// The render surface went away; GPU-side resources are gone with it.
    fn surface_lost(&mut self) {}
}

//=== SettingsStore =======================================================

/// Key/bit persisted values such as the high score or control mode.
///
/// Writes only mark the store dirty; nothing touches disk until `flush`.
pub trait SettingsStore: Send {
    fn read(&self, key: &str) -> Option<i64>;

    /// Stores `value` under `key` and marks the store dirty.
    fn write(&mut self, key: &str, value: i64);

    fn is_dirty(&self) -> bool;

    /// Persists dirty values. Called by the loop when interaction is lost.
    fn flush(&mut self);
}

//=== GameObserver ========================================================

/// Owner of the game's lifetime, told once when the game terminates.
///
/// Invoked on the UI thread.
pub trait GameObserver: Send + Sync {
    fn on_game_terminated(&self);
}

impl<F> GameObserver for F
where
    F: Fn() + Send + Sync,
{
    fn on_game_terminated(&self) {
        self()
    }
}

//=== UiWaker =============================================================

/// Nudges the host's UI thread to call
/// [`GameLoopHandle::run_ui_tasks`](crate::core::game_loop::GameLoopHandle::run_ui_tasks).
///
/// Called from whichever thread posted the task.
pub trait UiWaker: Send + Sync {
    fn wake(&self);
}

impl<F> UiWaker for F
where
    F: Fn() + Send + Sync,
{
    fn wake(&self) {
        self()
    }
}
