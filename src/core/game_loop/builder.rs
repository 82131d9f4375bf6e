//=========================================================================
// Game Loop Builder
//=========================================================================
//
// Fluent configuration for a [`GameLoop`] and its UI-side handle.
//
// ```text
//     GameLoopBuilder ──prepare(initial)──> (GameLoop, GameLoopHandle)
//         ├─ with_max_frame_delta()            loop thread   UI thread
//         ├─ with_min_frame_delta()
//         ├─ with_commands_per_frame()
//         ├─ with_clock()
//         ├─ with_settings()
//         ├─ with_observer()
//         └─ with_waker()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::unbounded;
use log::info;

//=== Internal Dependencies ===============================================

use super::clock::{
    Clock, FrameTimer, MonotonicClock, DEFAULT_MAX_FRAME_DELTA, DEFAULT_MIN_FRAME_DELTA,
};
use super::command::{CommandInbox, DEFAULT_COMMANDS_PER_FRAME};
use super::handle::{GameLoopHandle, LoopShared};
use super::GameLoop;
use crate::core::host_bridge::{GameObserver, RenderBackend, SettingsStore, UiWaker};
use crate::core::scenario::ScenarioLifecycle;

//=== GameLoopBuilder =====================================================

/// Builder for a [`GameLoop`].
///
/// # Default Values
///
/// - **Max frame delta**: 50 ms (longer gaps are clamped)
/// - **Min frame delta**: 1 ms (shorter gaps skip the frame)
/// - **Commands per frame**: 256
/// - **Clock**: [`MonotonicClock`]
///
/// # Examples
///
/// ```
/// use spritestep::prelude::*;
/// # struct Title { elements: ElementList<HeadlessRenderer> }
/// # impl Scenario<HeadlessRenderer> for Title {
/// #     fn initialize(&mut self, _resources: ResourceBag) {}
/// #     fn elements_mut(&mut self) -> &mut ElementList<HeadlessRenderer> { &mut self.elements }
/// # }
///
/// let initial = ScenarioLifecycle::new(Title { elements: ElementList::new() });
/// let (mut game_loop, handle) = GameLoopBuilder::new(HeadlessRenderer::new())
///     .with_settings(MemorySettings::new())
///     .prepare(initial);
///
/// assert_eq!(game_loop.step_one_frame(), FrameOutcome::Paused);
/// handle.on_player_interaction_regained(800, 600);
/// assert!(handle.is_running());
/// ```
pub struct GameLoopBuilder<R: RenderBackend> {
    renderer: R,
    clock: Option<Box<dyn Clock>>,
    max_frame_delta: Duration,
    min_frame_delta: Duration,
    commands_per_frame: usize,
    settings: Option<Box<dyn SettingsStore>>,
    observer: Option<Box<dyn GameObserver>>,
    waker: Option<Box<dyn UiWaker>>,
}

impl<R: RenderBackend> GameLoopBuilder<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            clock: None,
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
            min_frame_delta: DEFAULT_MIN_FRAME_DELTA,
            commands_per_frame: DEFAULT_COMMANDS_PER_FRAME,
            settings: None,
            observer: None,
            waker: None,
        }
    }

    /// Longest step a single frame may simulate.
    ///
    /// Default: 50 ms
    ///
    /// # Panics
    ///
    /// Panics if `max` is zero or below the minimum frame delta.
    pub fn with_max_frame_delta(mut self, max: Duration) -> Self {
        assert!(!max.is_zero(), "Max frame delta must be positive");
        assert!(
            max >= self.min_frame_delta,
            "Max frame delta {:?} is below min frame delta {:?}",
            max,
            self.min_frame_delta
        );
        self.max_frame_delta = max;
        self
    }

    /// Gaps shorter than this skip the frame.
    ///
    /// Default: 1 ms
    ///
    /// # Panics
    ///
    /// Panics if `min` exceeds the maximum frame delta.
    pub fn with_min_frame_delta(mut self, min: Duration) -> Self {
        assert!(
            min <= self.max_frame_delta,
            "Min frame delta {:?} exceeds max frame delta {:?}",
            min,
            self.max_frame_delta
        );
        self.min_frame_delta = min;
        self
    }

    /// Caps how many queued commands one frame processes.
    ///
    /// Default: 256
    ///
    /// # Panics
    ///
    /// Panics if `count == 0`.
    pub fn with_commands_per_frame(mut self, count: usize) -> Self {
        assert!(count > 0, "Commands per frame must be positive");
        self.commands_per_frame = count;
        self
    }

    /// Replaces the wall clock, e.g. with a [`ManualClock`](super::ManualClock).
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn with_settings(mut self, settings: impl SettingsStore + 'static) -> Self {
        self.settings = Some(Box::new(settings));
        self
    }

    /// Told once, on the UI thread, when the game terminates.
    pub fn with_observer(mut self, observer: impl GameObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Wakes the host UI thread when work is posted for it.
    pub fn with_waker(mut self, waker: impl UiWaker + 'static) -> Self {
        self.waker = Some(Box::new(waker));
        self
    }

    /// One-time setup. The calling thread becomes the UI thread.
    ///
    /// The returned loop starts paused; the first
    /// [`on_player_interaction_regained`](GameLoopHandle::on_player_interaction_regained)
    /// installs `initial` and starts processing.
    pub fn prepare(self, initial: ScenarioLifecycle<R>) -> (GameLoop<R>, GameLoopHandle<R>) {
        info!(
            target: "game_loop",
            "Preparing game loop (initial: {}, max delta: {:?}, min delta: {:?})",
            initial.name(),
            self.max_frame_delta,
            self.min_frame_delta
        );

        let (sender, receiver) = unbounded();
        let shared = Arc::new(LoopShared::new(sender, self.observer, self.waker));
        let handle = GameLoopHandle::new(shared);

        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(MonotonicClock::new()));
        let timer = FrameTimer::new(clock, self.min_frame_delta, self.max_frame_delta);
        let inbox = CommandInbox::new(receiver, self.commands_per_frame);

        let game_loop = GameLoop::new(
            handle.clone(),
            inbox,
            timer,
            self.renderer,
            self.settings,
            initial,
        );
        (game_loop, handle)
    }
}

//=========================================================================
// Tests
//=========================================================================
