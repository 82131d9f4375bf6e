//=========================================================================
// Game Loop Handle
//=========================================================================
//
// UI-thread side of the game loop.
//
// Architecture:
// ```text
//   UI thread                              Loop thread
//   GameLoopHandle ─┐                 ┌─ GameLoop
//                   ├─ Arc<LoopShared> ┤
//   (clones)  ──────┘   flags          └─ reads flags, drains commands
//                        pointer pool
//                        command sender ──────► command inbox
//                        UI request queue ◄──── terminate() off the UI thread
// ```
//
// The handle never touches scenario state. Lifecycle work is turned into
// commands and performed by the loop thread at its next frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::affinity::ThreadAffinity;
use super::command::LoopCommand;
use super::GameLoop;
use crate::core::host_bridge::{GameObserver, RenderBackend, UiWaker};
use crate::core::input::PointerPool;

//=== UiRequest ===========================================================

/// Work that must run on the UI thread, posted from elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UiRequest {
    Terminate,
}

//=== LoopShared ==========================================================

fn pack_surface(width: u32, height: u32) -> u64 {
    (u64::from(width) << 32) | u64::from(height)
}

fn unpack_surface(packed: u64) -> (u32, u32) {
    ((packed >> 32) as u32, packed as u32)
}

/// State visible to both threads.
pub(crate) struct LoopShared<R: RenderBackend> {
    pub(crate) affinity: ThreadAffinity,
    pub(crate) pointers: PointerPool,
    running: AtomicBool,
    terminated: AtomicBool,
    interactive: AtomicBool,
    accepting: AtomicBool,
    surface_known: AtomicBool,
    surface: AtomicU64,
    commands: Sender<LoopCommand<R>>,
    ui_sender: Sender<UiRequest>,
    ui_receiver: Receiver<UiRequest>,
    observer: Option<Box<dyn GameObserver>>,
    waker: Option<Box<dyn UiWaker>>,
}

impl<R: RenderBackend> LoopShared<R> {
    /// Must be called on the thread that will play the UI role.
    pub(crate) fn new(
        commands: Sender<LoopCommand<R>>,
        observer: Option<Box<dyn GameObserver>>,
        waker: Option<Box<dyn UiWaker>>,
    ) -> Self {
        let (ui_sender, ui_receiver) = unbounded();
        Self {
            affinity: ThreadAffinity::bind_ui_to_current(),
            pointers: PointerPool::new(),
            running: AtomicBool::new(false),
            terminated: AtomicBool::new(false),
            interactive: AtomicBool::new(false),
            accepting: AtomicBool::new(true),
            surface_known: AtomicBool::new(false),
            surface: AtomicU64::new(0),
            commands,
            ui_sender,
            ui_receiver,
            observer,
            waker,
        }
    }
}

//=== GameLoopHandle ======================================================

/// Cloneable UI-thread entry points into a running [`GameLoop`].
///
/// Every method except [`terminate`](Self::terminate) and the queries
/// panics when called off the UI thread.
pub struct GameLoopHandle<R: RenderBackend> {
    pub(crate) shared: Arc<LoopShared<R>>,
}

impl<R: RenderBackend> Clone for GameLoopHandle<R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R: RenderBackend> GameLoopHandle<R> {
    pub(crate) fn new(shared: Arc<LoopShared<R>>) -> Self {
        Self { shared }
    }

    //--- Input ------------------------------------------------------------

    /// Producer write of pointer `id` (normalized coordinates).
    ///
    /// Returns `false` for ids outside the pool; the sample is dropped.
    #[track_caller]
    pub fn update_pointer(&self, id: usize, x: f32, y: f32, pressed: bool) -> bool {
        self.shared.affinity.assert_ui_thread("update_pointer");
        self.shared.pointers.publish(id, x, y, pressed)
    }

    //--- Host Lifecycle ---------------------------------------------------

    /// The surface is going away. Loss work is queued only if the game
    /// was interactive.
    #[track_caller]
    pub fn on_player_interaction_lost(&self) {
        self.shared.affinity.assert_ui_thread("on_player_interaction_lost");
        if !self.shared.interactive.swap(false, Ordering::SeqCst) {
            trace!(target: "game_loop", "Interaction already lost");
            return;
        }
        info!(target: "game_loop", "Player interaction lost");
        self.send(LoopCommand::InteractionLost);
    }

    /// The surface is (again) available with the given size; resumes
    /// processing.
    #[track_caller]
    pub fn on_player_interaction_regained(&self, width: u32, height: u32) {
        self.shared
            .affinity
            .assert_ui_thread("on_player_interaction_regained");

        let packed = pack_surface(width, height);
        let previous = self.shared.surface.swap(packed, Ordering::SeqCst);
        let was_known = self.shared.surface_known.swap(true, Ordering::SeqCst);
        let surface_changed = !was_known || previous != packed;
        self.shared.interactive.store(true, Ordering::SeqCst);

        info!(
            target: "game_loop",
            "Player interaction regained at {}x{} (surface changed: {})",
            width,
            height,
            surface_changed
        );
        self.send(LoopCommand::InteractionRegained {
            width,
            height,
            surface_changed,
        });
        self.resume_processing();
    }

    /// Stops frame processing until resumed.
    #[track_caller]
    pub fn pause_processing(&self) {
        self.shared.affinity.assert_ui_thread("pause_processing");
        if self.shared.running.swap(false, Ordering::SeqCst) {
            debug!(target: "game_loop", "Processing paused");
        }
    }

    /// Restarts frame processing; ignored after termination.
    #[track_caller]
    pub fn resume_processing(&self) {
        self.shared.affinity.assert_ui_thread("resume_processing");
        if self.shared.terminated.load(Ordering::SeqCst) {
            return;
        }
        if !self.shared.running.swap(true, Ordering::SeqCst) {
            debug!(target: "game_loop", "Processing resumed");
        }
    }

    /// Queues the active scenario's back handler for the next frame.
    #[track_caller]
    pub fn on_back_pressed(&self) {
        self.shared.affinity.assert_ui_thread("on_back_pressed");
        if self.is_terminated() {
            return;
        }
        self.send(LoopCommand::BackPressed);
    }

    //--- Deferred Work ----------------------------------------------------

    /// Runs `action` on the loop thread at the start of its next frame.
    ///
    /// Returns `false` if the loop was terminated; the action is dropped.
    #[track_caller]
    pub fn schedule_for_next_frame<F>(&self, action: F) -> bool
    where
        F: FnOnce(&mut GameLoop<R>) + Send + 'static,
    {
        self.shared.affinity.assert_ui_thread("schedule_for_next_frame");
        if !self.shared.accepting.load(Ordering::SeqCst) {
            debug!(target: "game_loop", "Deferred action dropped; loop is detached");
            return false;
        }
        self.send(LoopCommand::Deferred(Box::new(action)))
    }

    fn send(&self, command: LoopCommand<R>) -> bool {
        match self.shared.commands.send(command) {
            Ok(()) => true,
            Err(err) => {
                warn!(target: "game_loop", "Loop is gone, {:?} dropped", err.into_inner());
                false
            }
        }
    }

    //--- Termination ------------------------------------------------------

    /// Ends the game. Callable from any thread.
    ///
    /// Off the UI thread the request is queued for [`run_ui_tasks`] and the
    /// host is woken. On the UI thread the loop stops, the deferred queue is
    /// detached and the observer is told, exactly once.
    ///
    /// [`run_ui_tasks`]: Self::run_ui_tasks
    pub fn terminate(&self) {
        if !self.shared.affinity.is_ui_thread() {
            debug!(target: "game_loop", "Terminate requested off the UI thread, posting");
            // The receiver lives in `shared`, so this cannot fail.
            let _ = self.shared.ui_sender.send(UiRequest::Terminate);
            if let Some(waker) = &self.shared.waker {
                waker.wake();
            }
            return;
        }

        if self.shared.terminated.swap(true, Ordering::SeqCst) {
            return;
        }
        self.shared.running.store(false, Ordering::SeqCst);
        self.shared.accepting.store(false, Ordering::SeqCst);
        info!(target: "game_loop", "Game terminated");

        if let Some(observer) = &self.shared.observer {
            observer.on_game_terminated();
        }
    }

    /// Runs requests posted to the UI thread. Returns how many ran.
    #[track_caller]
    pub fn run_ui_tasks(&self) -> usize {
        self.shared.affinity.assert_ui_thread("run_ui_tasks");
        let mut handled = 0;
        while let Ok(request) = self.shared.ui_receiver.try_recv() {
            match request {
                UiRequest::Terminate => self.terminate(),
            }
            handled += 1;
        }
        handled
    }

    //--- Query API --------------------------------------------------------

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    pub fn is_terminated(&self) -> bool {
        self.shared.terminated.load(Ordering::SeqCst)
    }

    pub fn is_interactive(&self) -> bool {
        self.shared.interactive.load(Ordering::SeqCst)
    }

    /// Last surface size reported by the host.
    pub fn surface_size(&self) -> Option<(u32, u32)> {
        if !self.shared.surface_known.load(Ordering::SeqCst) {
            return None;
        }
        Some(unpack_surface(self.shared.surface.load(Ordering::SeqCst)))
    }

    pub fn has_pending_ui_tasks(&self) -> bool {
        !self.shared.ui_receiver.is_empty()
    }
}

impl<R: RenderBackend> fmt::Debug for GameLoopHandle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameLoopHandle")
            .field("running", &self.is_running())
            .field("terminated", &self.is_terminated())
            .field("interactive", &self.is_interactive())
            .field("surface", &self.surface_size())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
