//=========================================================================
// Frame Context
//=========================================================================
//
// Loop-thread view handed to scenarios and elements while they run.
//
// Everything a scenario may touch during a frame goes through here:
// elapsed time, the consumer-side pointer snapshot, the backend, the
// pending-scenario slot, termination and settings.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::lifecycle::{replace_pending, ScenarioLifecycle};
use crate::core::game_loop::GameLoopHandle;
use crate::core::host_bridge::{RenderBackend, SettingsStore};
use crate::core::input::{InputPointer, POINTER_COUNT};

//=== FrameContext ========================================================

/// Per-frame access to loop-owned state.
pub struct FrameContext<'a, R: RenderBackend> {
    delta_seconds: f32,
    pointers: &'a [InputPointer; POINTER_COUNT],
    renderer: &'a mut R,
    pending: &'a mut Option<ScenarioLifecycle<R>>,
    handle: &'a GameLoopHandle<R>,
    settings: Option<&'a mut (dyn SettingsStore + 'static)>,
}

impl<'a, R: RenderBackend> FrameContext<'a, R> {
    pub(crate) fn new(
        delta_seconds: f32,
        pointers: &'a [InputPointer; POINTER_COUNT],
        renderer: &'a mut R,
        pending: &'a mut Option<ScenarioLifecycle<R>>,
        handle: &'a GameLoopHandle<R>,
        settings: Option<&'a mut (dyn SettingsStore + 'static)>,
    ) -> Self {
        Self {
            delta_seconds,
            pointers,
            renderer,
            pending,
            handle,
            settings,
        }
    }

    //--- Time & Input -----------------------------------------------------

    /// Clamped time since the previous frame; `0.0` outside frame steps
    /// (e.g. while handling the back button).
    #[inline]
    pub fn delta_seconds(&self) -> f32 {
        self.delta_seconds
    }

    /// Consumer snapshot of pointer `id`, taken at the start of this frame.
    pub fn pointer(&self, id: usize) -> Option<&InputPointer> {
        self.pointers.get(id)
    }

    pub fn pointers(&self) -> &[InputPointer; POINTER_COUNT] {
        self.pointers
    }

    //--- Collaborators ----------------------------------------------------

    pub fn renderer(&mut self) -> &mut R {
        &mut *self.renderer
    }

    pub fn settings(&mut self) -> Option<&mut (dyn SettingsStore + 'static)> {
        self.settings.as_deref_mut()
    }

    //--- Flow Control -----------------------------------------------------

    /// Requests a swap to `next` once the current frame finishes.
    ///
    /// A scenario still waiting in the pending slot is destroyed.
    pub fn set_next_scenario(&mut self, next: ScenarioLifecycle<R>) {
        replace_pending(self.pending, next);
    }

    pub fn has_pending_scenario(&self) -> bool {
        self.pending.is_some()
    }

    /// Ends the game; the request is carried to the UI thread.
    pub fn terminate(&self) {
        self.handle.terminate();
    }

    pub fn handle(&self) -> &GameLoopHandle<R> {
        self.handle
    }
}
