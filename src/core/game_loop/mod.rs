//=========================================================================
// Game Loop
//=========================================================================
//
// Orchestrates scenarios, frame pacing and pointer handoff between the
// UI thread and the loop thread.
//
// Responsibilities:
// - Step the active scenario once per frame with a clamped delta
// - Copy producer pointer state into the loop's snapshot every frame
// - Apply UI-thread lifecycle work (surface loss/regain, back button)
// - Swap in the pending scenario at frame boundaries
//
// Frame (step_one_frame):
//   1. paused?              → apply surface loss/regain only, return
//   2. drain commands       → held work first, then new commands
//   3. tick timer           → clamp to max delta, skip below min delta
//   4. snapshot pointers    → one TwoThreadMutex per slot, side B
//   5. process_and_draw     → active scenario, then frame_complete
//   6. install pending      → old one unloaded + destroyed
//
//=========================================================================

//=== Module Declarations =================================================

mod affinity;
mod builder;
mod clock;
mod command;
mod handle;

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::fmt;

use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use crate::core::host_bridge::{RenderBackend, SettingsStore};
use crate::core::input::{InputPointer, POINTER_COUNT};
use crate::core::scenario::{replace_pending, FrameContext, ScenarioLifecycle};
use command::{CommandInbox, LoopCommand};
use clock::FrameTimer;

//=== Public API ==========================================================

pub use builder::GameLoopBuilder;
pub use clock::{
    Clock, ManualClock, MonotonicClock, DEFAULT_MAX_FRAME_DELTA, DEFAULT_MIN_FRAME_DELTA,
};
pub use command::{DeferredAction, DEFAULT_COMMANDS_PER_FRAME};
pub use handle::GameLoopHandle;

//=== FrameOutcome ========================================================

/// What a call to [`GameLoop::step_one_frame`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Processing is paused or the game terminated.
    Paused,
    /// Too little time passed; carried over into the next frame.
    Skipped,
    /// A frame ran with this (clamped) delta.
    Stepped { delta_seconds: f32 },
}

//=== GameLoop ============================================================

/// Loop-thread half of the game loop. Created by
/// [`GameLoopBuilder::prepare`].
///
/// Every method panics when called from a thread other than the one that
/// made the first loop-side call.
pub struct GameLoop<R: RenderBackend> {
    handle: GameLoopHandle<R>,
    inbox: CommandInbox<R>,
    command_buffer: Vec<LoopCommand<R>>,
    held: VecDeque<LoopCommand<R>>,
    timer: FrameTimer,
    consumers: [InputPointer; POINTER_COUNT],
    renderer: R,
    settings: Option<Box<dyn SettingsStore>>,
    initial: Option<ScenarioLifecycle<R>>,
    active: Option<ScenarioLifecycle<R>>,
    pending: Option<ScenarioLifecycle<R>>,
    surface_ready: bool,
    frame_index: u64,
}

impl<R: RenderBackend> GameLoop<R> {
    pub(crate) fn new(
        handle: GameLoopHandle<R>,
        inbox: CommandInbox<R>,
        timer: FrameTimer,
        renderer: R,
        settings: Option<Box<dyn SettingsStore>>,
        initial: ScenarioLifecycle<R>,
    ) -> Self {
        Self {
            handle,
            inbox,
            command_buffer: Vec::new(),
            held: VecDeque::new(),
            timer,
            consumers: [InputPointer::new(); POINTER_COUNT],
            renderer,
            settings,
            initial: Some(initial),
            active: None,
            pending: None,
            surface_ready: false,
            frame_index: 0,
        }
    }

    //--- Frame ------------------------------------------------------------

    /// Runs one frame.
    ///
    /// While paused only surface loss and regain are applied, so a lost
    /// surface is released promptly. Deferred actions and back presses are
    /// held for the next running frame and dropped once terminated.
    #[track_caller]
    pub fn step_one_frame(&mut self) -> FrameOutcome {
        self.handle.shared.affinity.assert_loop_thread("step_one_frame");

        //--- Step 1: Paused ------------------------------------------------
        if !self.handle.is_running() {
            self.apply_lifecycle_commands();
            return FrameOutcome::Paused;
        }

        //--- Step 2: Commands ---------------------------------------------
        self.run_commands();

        //--- Step 3: Timing -----------------------------------------------
        let Some(delta_seconds) = self.timer.tick() else {
            trace!(target: "game_loop", "Frame skipped, under minimum delta");
            return FrameOutcome::Skipped;
        };

        //--- Step 4: Pointer snapshot -------------------------------------
        self.handle.shared.pointers.snapshot_into(&mut self.consumers);

        //--- Step 5: Process, draw, present -------------------------------
        if let Some(active) = self.active.as_mut() {
            let mut ctx = FrameContext::new(
                delta_seconds,
                &self.consumers,
                &mut self.renderer,
                &mut self.pending,
                &self.handle,
                self.settings.as_deref_mut(),
            );
            active.process_and_draw_frame(&mut ctx);
        }
        self.renderer.frame_complete();

        //--- Step 6: Scenario swap ----------------------------------------
        self.install_pending();

        self.frame_index += 1;
        FrameOutcome::Stepped { delta_seconds }
    }

    /// Records `next` for installation at the end of the current frame.
    ///
    /// A scenario already waiting is destroyed without being installed.
    #[track_caller]
    pub fn set_next_scenario(&mut self, next: ScenarioLifecycle<R>) {
        self.handle.shared.affinity.assert_loop_thread("set_next_scenario");
        replace_pending(&mut self.pending, next);
    }

    /// Ends the game; see [`GameLoopHandle::terminate`].
    pub fn terminate(&self) {
        self.handle.terminate();
    }

    /// Applies outstanding surface loss, then unloads and destroys every
    /// scenario. Returns the backend.
    #[track_caller]
    pub fn shutdown(mut self) -> R {
        self.handle.shared.affinity.assert_loop_thread("shutdown");
        info!(target: "game_loop", "Shutting down after {} frames", self.frame_index);

        let mut commands = std::mem::take(&mut self.command_buffer);
        self.inbox.collect_all(&mut commands);
        for command in commands {
            if let LoopCommand::InteractionLost = command {
                self.handle_interaction_lost();
            }
        }
        self.held.clear();

        if let Some(mut active) = self.active.take() {
            active.unload(&mut self.renderer);
            active.destroy();
        }
        if let Some(pending) = self.pending.take() {
            pending.destroy();
        }
        if let Some(initial) = self.initial.take() {
            initial.destroy();
        }
        if let Some(settings) = self.settings.as_mut() {
            if settings.is_dirty() {
                settings.flush();
            }
        }
        self.renderer
    }

    //--- Commands ---------------------------------------------------------

    fn run_commands(&mut self) {
        let mut commands = std::mem::take(&mut self.command_buffer);
        self.inbox.collect(&mut commands);

        while let Some(command) = self.held.pop_front() {
            self.apply(command);
        }
        for command in commands.drain(..) {
            self.apply(command);
        }

        self.command_buffer = commands;
    }

    fn apply_lifecycle_commands(&mut self) {
        let mut commands = std::mem::take(&mut self.command_buffer);
        self.inbox.collect(&mut commands);

        let terminated = self.handle.is_terminated();
        if terminated && !self.held.is_empty() {
            debug!(target: "game_loop", "Dropping {} held commands after termination", self.held.len());
            self.held.clear();
        }
        for command in commands.drain(..) {
            if command.is_lifecycle() {
                self.apply(command);
            } else if terminated {
                debug!(target: "game_loop", "{:?} dropped after termination", command);
            } else {
                self.held.push_back(command);
            }
        }

        self.command_buffer = commands;
    }

    fn apply(&mut self, command: LoopCommand<R>) {
        trace!(target: "game_loop", "Applying {:?}", command);
        match command {
            LoopCommand::Deferred(action) => action(self),
            LoopCommand::InteractionLost => self.handle_interaction_lost(),
            LoopCommand::InteractionRegained {
                width,
                height,
                surface_changed,
            } => self.handle_interaction_regained(width, height, surface_changed),
            LoopCommand::BackPressed => self.handle_back_pressed(),
        }
    }

    //--- Lifecycle Work ---------------------------------------------------

    fn handle_interaction_lost(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.notify_interaction_lost();
        }

        if self.handle.is_terminated() {
            if let Some(mut active) = self.active.take() {
                active.unload(&mut self.renderer);
                active.destroy();
            }
            if let Some(pending) = self.pending.take() {
                pending.destroy();
            }
        } else if let Some(active) = self.active.as_mut() {
            active.unload(&mut self.renderer);
        }

        if let Some(settings) = self.settings.as_mut() {
            settings.flush();
        }
        self.renderer.surface_lost();
        self.surface_ready = false;
    }

    fn handle_interaction_regained(&mut self, width: u32, height: u32, surface_changed: bool) {
        self.renderer.surface_available(width, height);
        self.surface_ready = true;

        if self.handle.is_terminated() {
            debug!(target: "game_loop", "Surface regained after termination, scenarios left alone");
            return;
        }

        if surface_changed {
            if let Some(initial) = self.initial.take() {
                debug!(target: "game_loop", "Promoting initial scenario {}", initial.name());
                self.retire_active();
                self.active = Some(initial);
            } else if let Some(active) = self.active.as_mut() {
                debug!(target: "game_loop", "Surface changed, reloading {}", active.name());
                active.unload(&mut self.renderer);
            }
        }

        if let Some(active) = self.active.as_mut() {
            active.load(&mut self.renderer);
            active.notify_interaction_regained();
        }
        self.timer.rebase();
    }

    fn handle_back_pressed(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let mut ctx = FrameContext::new(
            0.0,
            &self.consumers,
            &mut self.renderer,
            &mut self.pending,
            &self.handle,
            self.settings.as_deref_mut(),
        );
        active.on_back_pressed(&mut ctx);
    }

    //--- Scenario Swap ----------------------------------------------------

    fn install_pending(&mut self) {
        let Some(mut next) = self.pending.take() else {
            return;
        };

        if let Some(initial) = self.initial.take() {
            debug!(target: "game_loop", "Initial scenario {} superseded", initial.name());
            initial.destroy();
        }
        self.retire_active();

        info!(target: "game_loop", "Installing scenario {}", next.name());
        next.initialize();
        if self.surface_ready {
            next.load(&mut self.renderer);
        }
        self.active = Some(next);
    }

    fn retire_active(&mut self) {
        if let Some(mut old) = self.active.take() {
            old.unload(&mut self.renderer);
            old.destroy();
        }
    }

    //--- Query API --------------------------------------------------------

    pub fn handle(&self) -> &GameLoopHandle<R> {
        &self.handle
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Consumer pointer snapshot from the last stepped frame.
    pub fn pointers(&self) -> &[InputPointer; POINTER_COUNT] {
        &self.consumers
    }

    pub fn active_scenario(&self) -> Option<&ScenarioLifecycle<R>> {
        self.active.as_ref()
    }

    pub fn has_pending_scenario(&self) -> bool {
        self.pending.is_some()
    }

    pub fn settings_mut(&mut self) -> Option<&mut (dyn SettingsStore + 'static)> {
        self.settings.as_deref_mut()
    }

    /// Number of frames that ran to completion.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl<R: RenderBackend> fmt::Debug for GameLoop<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameLoop")
            .field("handle", &self.handle)
            .field("active", &self.active)
            .field("pending", &self.pending)
            .field("surface_ready", &self.surface_ready)
            .field("frame_index", &self.frame_index)
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host_bridge::{HeadlessRenderer, MemorySettings};
    use crate::core::scenario::{ElementList, FrameElement, ResourceBag, Scenario};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    type Journal = Arc<Mutex<Vec<String>>>;

    //--- Fixtures ---------------------------------------------------------

    #[derive(Default)]
    struct Probe {
        deltas: Vec<f32>,
        pointers: Vec<InputPointer>,
    }

    struct ProbeElement {
        probe: Arc<Mutex<Probe>>,
    }

    impl FrameElement<HeadlessRenderer> for ProbeElement {
        fn step(&mut self, ctx: &mut FrameContext<'_, HeadlessRenderer>) {
            let mut probe = self.probe.lock().unwrap();
            probe.deltas.push(ctx.delta_seconds());
            probe.pointers.push(*ctx.pointer(0).unwrap());
        }

        fn draw(&mut self, _renderer: &mut HeadlessRenderer) {}
    }

    struct Screen {
        label: &'static str,
        journal: Journal,
        elements: ElementList<HeadlessRenderer>,
    }

    impl Screen {
        fn new(label: &'static str, journal: &Journal) -> Self {
            Self {
                label,
                journal: Arc::clone(journal),
                elements: ElementList::new(),
            }
        }

        fn with_probe(mut self, probe: &Arc<Mutex<Probe>>) -> Self {
            self.elements.push(ProbeElement {
                probe: Arc::clone(probe),
            });
            self
        }

        fn record(&self, event: &str) {
            self.journal
                .lock()
                .unwrap()
                .push(format!("{} {}", self.label, event));
        }
    }

    impl Scenario<HeadlessRenderer> for Screen {
        fn initialize(&mut self, _resources: ResourceBag) {
            self.record("initialize");
        }

        fn load(&mut self, _renderer: &mut HeadlessRenderer) {
            self.record("load");
        }

        fn unload(&mut self, _renderer: &mut HeadlessRenderer) {
            self.record("unload");
        }

        fn destroy(&mut self) {
            self.record("destroy");
        }

        fn elements_mut(&mut self) -> &mut ElementList<HeadlessRenderer> {
            &mut self.elements
        }

        fn on_player_interaction_lost(&mut self) {
            self.record("lost");
        }

        fn on_player_interaction_regained(&mut self) {
            self.record("regained");
        }
    }

    fn lifecycle(screen: Screen) -> ScenarioLifecycle<HeadlessRenderer> {
        ScenarioLifecycle::new(screen)
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal.lock().unwrap().clone()
    }

    fn clear(journal: &Journal) {
        journal.lock().unwrap().clear();
    }

    struct Rig {
        game_loop: GameLoop<HeadlessRenderer>,
        handle: GameLoopHandle<HeadlessRenderer>,
        clock: ManualClock,
        journal: Journal,
        probe: Arc<Mutex<Probe>>,
        terminations: Arc<AtomicUsize>,
    }

    /// Prepared loop whose initial scenario is installed and loaded.
    fn running_rig() -> Rig {
        let clock = ManualClock::new();
        let journal = Journal::default();
        let probe = Arc::new(Mutex::new(Probe::default()));
        let terminations = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&terminations);
        let (mut game_loop, handle) = GameLoopBuilder::new(HeadlessRenderer::new())
            .with_clock(clock.clone())
            .with_settings(MemorySettings::new())
            .with_observer(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .prepare(lifecycle(Screen::new("title", &journal).with_probe(&probe)));

        handle.on_player_interaction_regained(800, 600);
        assert_eq!(game_loop.step_one_frame(), FrameOutcome::Skipped);

        Rig {
            game_loop,
            handle,
            clock,
            journal,
            probe,
            terminations,
        }
    }

    fn assert_delta(outcome: FrameOutcome, expected: f32) {
        match outcome {
            FrameOutcome::Stepped { delta_seconds } => assert!(
                (delta_seconds - expected).abs() < 1e-6,
                "expected delta {}, got {}",
                expected,
                delta_seconds
            ),
            other => panic!("expected a stepped frame, got {:?}", other),
        }
    }

    //=====================================================================
    // Preparation & Pacing
    //=====================================================================

    #[test]
    fn prepared_loop_starts_paused() {
        let journal = Journal::default();
        let (mut game_loop, handle) = GameLoopBuilder::new(HeadlessRenderer::new())
            .with_clock(ManualClock::new())
            .prepare(lifecycle(Screen::new("title", &journal)));

        assert!(!handle.is_running());
        assert_eq!(game_loop.step_one_frame(), FrameOutcome::Paused);
        assert_eq!(game_loop.renderer().clears(), 0);
        assert!(game_loop.active_scenario().is_none());
        assert!(entries(&journal).is_empty());
    }

    #[test]
    fn first_regain_promotes_initial_scenario() {
        let rig = running_rig();

        let active = rig.game_loop.active_scenario().expect("initial installed");
        assert!(active.is_loaded());
        assert_eq!(rig.game_loop.renderer().surface(), Some((800, 600)));
        assert_eq!(
            entries(&rig.journal),
            vec!["title initialize", "title load", "title regained"]
        );
    }

    #[test]
    fn regular_frame_steps_elements() {
        let mut rig = running_rig();

        rig.clock.advance(Duration::from_millis(16));
        assert_delta(rig.game_loop.step_one_frame(), 0.016);

        assert_eq!(rig.game_loop.renderer().clears(), 1);
        assert_eq!(rig.game_loop.renderer().frames_completed(), 1);
        assert_eq!(rig.game_loop.frame_index(), 1);
        assert_eq!(rig.probe.lock().unwrap().deltas.len(), 1);
    }

    #[test]
    fn long_gap_is_clamped_to_fifty_millis() {
        let mut rig = running_rig();

        rig.clock.advance(Duration::from_millis(200));
        assert_delta(rig.game_loop.step_one_frame(), 0.050);

        let seen = rig.probe.lock().unwrap().deltas.clone();
        assert_eq!(seen.len(), 1);
        assert!((seen[0] - 0.050).abs() < 1e-6, "element saw {}", seen[0]);
    }

    #[test]
    fn sub_millisecond_gap_skips_frame() {
        let mut rig = running_rig();

        rig.clock.advance(Duration::from_micros(400));
        assert_eq!(rig.game_loop.step_one_frame(), FrameOutcome::Skipped);
        assert_eq!(rig.game_loop.renderer().frames_completed(), 0);
        assert!(rig.probe.lock().unwrap().deltas.is_empty());
    }

    #[test]
    fn paused_loop_is_noop_until_resumed() {
        let mut rig = running_rig();

        rig.handle.pause_processing();
        rig.clock.advance(Duration::from_millis(16));
        assert_eq!(rig.game_loop.step_one_frame(), FrameOutcome::Paused);
        assert_eq!(rig.game_loop.renderer().frames_completed(), 0);

        rig.handle.resume_processing();
        assert_delta(rig.game_loop.step_one_frame(), 0.016);
    }

    //=====================================================================
    // Pointer Handoff
    //=====================================================================

    #[test]
    fn pointer_update_visible_next_frame() {
        let mut rig = running_rig();

        assert!(rig.handle.update_pointer(0, 0.5, 0.25, true));
        rig.clock.advance(Duration::from_millis(16));
        rig.game_loop.step_one_frame();

        let seen = rig.probe.lock().unwrap().pointers[0];
        assert_eq!(seen.position(), (0.5, 0.25));
        assert!(seen.is_pressed());
    }

    #[test]
    fn release_is_reported_once() {
        let mut rig = running_rig();

        rig.handle.update_pointer(0, 0.1, 0.1, true);
        rig.clock.advance(Duration::from_millis(16));
        rig.game_loop.step_one_frame();

        rig.handle.update_pointer(0, 0.1, 0.1, false);
        rig.clock.advance(Duration::from_millis(16));
        rig.game_loop.step_one_frame();
        assert!(rig.game_loop.pointers()[0].just_released());

        rig.clock.advance(Duration::from_millis(16));
        rig.game_loop.step_one_frame();
        assert!(!rig.game_loop.pointers()[0].just_released());
    }

    #[test]
    fn unknown_pointer_id_is_ignored() {
        let rig = running_rig();
        assert!(!rig.handle.update_pointer(POINTER_COUNT, 0.5, 0.5, true));
    }

    //=====================================================================
    // Deferred Actions
    //=====================================================================

    #[test]
    fn deferred_action_runs_once_at_next_frame() {
        let mut rig = running_rig();
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&runs);
        assert!(rig.handle.schedule_for_next_frame(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        rig.clock.advance(Duration::from_millis(16));
        rig.game_loop.step_one_frame();
        rig.clock.advance(Duration::from_millis(16));
        rig.game_loop.step_one_frame();

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn deferred_action_waits_while_paused() {
        let mut rig = running_rig();
        let runs = Arc::new(AtomicUsize::new(0));

        rig.handle.pause_processing();
        let counter = Arc::clone(&runs);
        rig.handle.schedule_for_next_frame(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        rig.game_loop.step_one_frame();
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        rig.handle.resume_processing();
        rig.game_loop.step_one_frame();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn back_press_waits_while_paused() {
        let mut rig = running_rig();

        rig.handle.pause_processing();
        rig.handle.on_back_pressed();
        assert_eq!(rig.game_loop.step_one_frame(), FrameOutcome::Paused);
        assert!(!rig.handle.is_terminated());
        assert_eq!(rig.terminations.load(Ordering::SeqCst), 0);

        rig.handle.resume_processing();
        rig.clock.advance(Duration::from_millis(16));
        rig.game_loop.step_one_frame();
        assert!(rig.handle.is_terminated());
        assert_eq!(rig.terminations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn held_work_is_dropped_after_termination() {
        let mut rig = running_rig();
        let runs = Arc::new(AtomicUsize::new(0));

        rig.handle.pause_processing();
        let counter = Arc::clone(&runs);
        assert!(rig.handle.schedule_for_next_frame(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        rig.handle.on_back_pressed();
        assert_eq!(rig.game_loop.step_one_frame(), FrameOutcome::Paused);

        rig.handle.terminate();
        assert_eq!(rig.game_loop.step_one_frame(), FrameOutcome::Paused);
        rig.game_loop.shutdown();

        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(rig.terminations.load(Ordering::SeqCst), 1);
    }

    //=====================================================================
    // Scenario Swap
    //=====================================================================

    #[test]
    fn pending_scenario_installs_after_frame() {
        let mut rig = running_rig();
        clear(&rig.journal);

        rig.game_loop
            .set_next_scenario(lifecycle(Screen::new("play", &rig.journal)));
        assert!(rig.game_loop.has_pending_scenario());

        rig.clock.advance(Duration::from_millis(16));
        rig.game_loop.step_one_frame();

        assert!(!rig.game_loop.has_pending_scenario());
        assert_eq!(
            entries(&rig.journal),
            vec![
                "title unload",
                "title destroy",
                "play initialize",
                "play load"
            ]
        );
        // Old scenario drew this frame before the swap.
        assert_eq!(rig.probe.lock().unwrap().deltas.len(), 1);
    }

    #[test]
    fn replacing_pending_destroys_discarded_one() {
        let mut rig = running_rig();
        clear(&rig.journal);

        rig.game_loop
            .set_next_scenario(lifecycle(Screen::new("first", &rig.journal)));
        rig.game_loop
            .set_next_scenario(lifecycle(Screen::new("second", &rig.journal)));

        assert_eq!(entries(&rig.journal), vec!["first destroy"]);
    }

    #[test]
    fn scenario_switch_from_element() {
        struct Switcher {
            next: Option<ScenarioLifecycle<HeadlessRenderer>>,
        }

        impl FrameElement<HeadlessRenderer> for Switcher {
            fn step(&mut self, ctx: &mut FrameContext<'_, HeadlessRenderer>) {
                if let Some(next) = self.next.take() {
                    ctx.set_next_scenario(next);
                }
            }

            fn draw(&mut self, _renderer: &mut HeadlessRenderer) {}
        }

        let journal = Journal::default();
        let mut title = Screen::new("title", &journal);
        title.elements.push(Switcher {
            next: Some(lifecycle(Screen::new("play", &journal))),
        });

        let clock = ManualClock::new();
        let (mut game_loop, handle) = GameLoopBuilder::new(HeadlessRenderer::new())
            .with_clock(clock.clone())
            .prepare(lifecycle(title));
        handle.on_player_interaction_regained(320, 240);
        clock.advance(Duration::from_millis(16));
        game_loop.step_one_frame();

        let active = game_loop.active_scenario().expect("play installed");
        assert!(active.name().contains("Screen"));
        assert!(entries(&journal).ends_with(&[
            "title unload".to_owned(),
            "title destroy".to_owned(),
            "play initialize".to_owned(),
            "play load".to_owned(),
        ]));
    }

    //=====================================================================
    // Interaction Lost / Regained
    //=====================================================================

    #[test]
    fn interaction_lost_unloads_and_flushes() {
        let mut rig = running_rig();
        clear(&rig.journal);

        rig.game_loop
            .settings_mut()
            .expect("settings configured")
            .write("high_score", 42);
        rig.handle.pause_processing();
        rig.handle.on_player_interaction_lost();
        assert_eq!(rig.game_loop.step_one_frame(), FrameOutcome::Paused);

        assert_eq!(entries(&rig.journal), vec!["title lost", "title unload"]);
        assert!(!rig.game_loop.settings_mut().unwrap().is_dirty());
        assert_eq!(rig.game_loop.renderer().surface(), None);
        assert_eq!(rig.game_loop.renderer().surface_losses(), 1);
    }

    #[test]
    fn interaction_lost_twice_queues_once() {
        let mut rig = running_rig();
        clear(&rig.journal);

        rig.handle.on_player_interaction_lost();
        rig.handle.on_player_interaction_lost();
        rig.clock.advance(Duration::from_millis(16));
        rig.game_loop.step_one_frame();

        assert_eq!(entries(&rig.journal), vec!["title lost", "title unload"]);
    }

    #[test]
    fn regain_with_same_size_reloads_only_if_needed() {
        let mut rig = running_rig();
        clear(&rig.journal);

        rig.handle.on_player_interaction_lost();
        rig.handle.on_player_interaction_regained(800, 600);
        rig.game_loop.step_one_frame();

        assert_eq!(
            entries(&rig.journal),
            vec!["title lost", "title unload", "title load", "title regained"]
        );
    }

    #[test]
    fn regain_with_new_size_forces_reload() {
        let mut rig = running_rig();
        clear(&rig.journal);

        rig.handle.on_player_interaction_regained(1024, 768);
        rig.game_loop.step_one_frame();

        assert_eq!(
            entries(&rig.journal),
            vec!["title unload", "title load", "title regained"]
        );
        assert_eq!(rig.handle.surface_size(), Some((1024, 768)));
    }

    #[test]
    fn first_regain_at_maximum_size_promotes_initial_scenario() {
        let journal = Journal::default();
        let (mut game_loop, handle) = GameLoopBuilder::new(HeadlessRenderer::new())
            .with_clock(ManualClock::new())
            .prepare(lifecycle(Screen::new("title", &journal)));

        handle.on_player_interaction_regained(u32::MAX, u32::MAX);
        game_loop.step_one_frame();

        assert!(game_loop.active_scenario().expect("initial installed").is_loaded());
        assert_eq!(handle.surface_size(), Some((u32::MAX, u32::MAX)));
    }

    #[test]
    fn regain_resets_frame_baseline() {
        let mut rig = running_rig();

        rig.clock.advance(Duration::from_secs(5));
        rig.handle.on_player_interaction_regained(800, 600);
        rig.clock.advance(Duration::from_millis(10));
        rig.game_loop.step_one_frame();
        rig.clock.advance(Duration::from_millis(10));

        assert_delta(rig.game_loop.step_one_frame(), 0.010);
    }

    //=====================================================================
    // Termination
    //=====================================================================

    #[test]
    fn terminate_notifies_observer_once() {
        let mut rig = running_rig();

        rig.handle.terminate();
        rig.handle.terminate();
        rig.game_loop.terminate();

        assert!(rig.handle.is_terminated());
        assert!(!rig.handle.is_running());
        assert_eq!(rig.terminations.load(Ordering::SeqCst), 1);

        rig.clock.advance(Duration::from_millis(16));
        assert_eq!(rig.game_loop.step_one_frame(), FrameOutcome::Paused);
    }

    #[test]
    fn terminated_loop_rejects_deferred_work_and_resume() {
        let rig = running_rig();

        rig.handle.terminate();
        rig.handle.resume_processing();

        assert!(!rig.handle.is_running());
        assert!(!rig.handle.schedule_for_next_frame(|_| {}));
    }

    #[test]
    fn terminate_off_ui_thread_is_posted() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let terminations = Arc::new(AtomicUsize::new(0));
        let journal = Journal::default();

        let wake_counter = Arc::clone(&wakes);
        let term_counter = Arc::clone(&terminations);
        let (_game_loop, handle) = GameLoopBuilder::new(HeadlessRenderer::new())
            .with_clock(ManualClock::new())
            .with_waker(move || {
                wake_counter.fetch_add(1, Ordering::SeqCst);
            })
            .with_observer(move || {
                term_counter.fetch_add(1, Ordering::SeqCst);
            })
            .prepare(lifecycle(Screen::new("title", &journal)));

        let remote = handle.clone();
        thread::spawn(move || remote.terminate())
            .join()
            .expect("terminate is callable from any thread");

        assert!(!handle.is_terminated(), "termination waits for the UI thread");
        assert_eq!(wakes.load(Ordering::SeqCst), 1);
        assert!(handle.has_pending_ui_tasks());

        assert_eq!(handle.run_ui_tasks(), 1);
        assert!(handle.is_terminated());
        assert_eq!(terminations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn loss_after_termination_destroys_scenario() {
        let mut rig = running_rig();
        clear(&rig.journal);

        rig.handle.terminate();
        rig.handle.on_player_interaction_lost();
        rig.game_loop.step_one_frame();

        assert_eq!(
            entries(&rig.journal),
            vec!["title lost", "title unload", "title destroy"]
        );
        assert!(rig.game_loop.active_scenario().is_none());
    }

    #[test]
    fn regain_after_termination_leaves_initial_scenario_alone() {
        let journal = Journal::default();
        let (mut game_loop, handle) = GameLoopBuilder::new(HeadlessRenderer::new())
            .with_clock(ManualClock::new())
            .prepare(lifecycle(Screen::new("title", &journal)));

        handle.terminate();
        handle.on_player_interaction_regained(800, 600);
        assert_eq!(game_loop.step_one_frame(), FrameOutcome::Paused);

        assert!(game_loop.active_scenario().is_none());
        assert!(entries(&journal).is_empty());
        assert_eq!(game_loop.renderer().surface(), Some((800, 600)));
    }

    #[test]
    fn back_press_defaults_to_terminate() {
        let mut rig = running_rig();

        rig.handle.on_back_pressed();
        rig.clock.advance(Duration::from_millis(16));
        rig.game_loop.step_one_frame();

        assert!(rig.handle.is_terminated());
        assert_eq!(rig.terminations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn shutdown_destroys_everything() {
        let mut rig = running_rig();
        rig.game_loop
            .set_next_scenario(lifecycle(Screen::new("next", &rig.journal)));
        clear(&rig.journal);

        let renderer = rig.game_loop.shutdown();

        assert_eq!(
            entries(&rig.journal),
            vec!["title unload", "title destroy", "next destroy"]
        );
        assert_eq!(renderer.clears(), 0);
    }

    //=====================================================================
    // Thread Affinity
    //=====================================================================

    #[test]
    fn ui_operation_off_ui_thread_panics() {
        let rig = running_rig();
        let remote = rig.handle.clone();

        let result = thread::spawn(move || remote.pause_processing()).join();
        assert!(result.is_err(), "pause_processing must reject foreign threads");
    }

    #[test]
    fn loop_operation_off_loop_thread_panics() {
        let rig = running_rig();
        let mut game_loop = rig.game_loop;

        let result = thread::spawn(move || {
            game_loop.step_one_frame();
        })
        .join();
        assert!(result.is_err(), "step_one_frame must stay on its first thread");
    }
}
