//=========================================================================
// Scenario Lifecycle
//=========================================================================
//
// State machine wrapped around every scenario the loop owns.
//
//   Created ──initialize()──► Initialized ──load()──► Loaded
//      │                                               ▲  │
//      └──────────────load() initializes first─────────┘  │ unload()
//                                                         ▼
//                                                      Unloaded ──load()──► Loaded
//
//   destroy(self) from any state; the value is consumed, so nothing can
//   touch a destroyed scenario afterwards.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{FrameContext, ResourceBag, Scenario};
use crate::core::host_bridge::RenderBackend;

//=== LifecycleState ======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Initialized,
    Loaded,
    Unloaded,
}

//=== ScenarioLifecycle ===================================================

/// A scenario together with its lifecycle state and pending resources.
pub struct ScenarioLifecycle<R: RenderBackend> {
    scenario: Box<dyn Scenario<R>>,
    state: LifecycleState,
    initial_resources: Option<ResourceBag>,
    torn_down: bool,
}

impl<R: RenderBackend> ScenarioLifecycle<R> {
    pub fn new<S>(scenario: S) -> Self
    where
        S: Scenario<R> + 'static,
    {
        Self {
            scenario: Box::new(scenario),
            state: LifecycleState::Created,
            initial_resources: None,
            torn_down: false,
        }
    }

    /// Attaches the bag handed to [`Scenario::initialize`].
    ///
    /// # Panics
    /// If the scenario was already initialized.
    pub fn with_resources(mut self, resources: ResourceBag) -> Self {
        assert!(
            self.state == LifecycleState::Created,
            "with_resources: scenario {} is already initialized",
            self.scenario.name()
        );
        self.initial_resources = Some(resources);
        self
    }

    //--- Transitions ------------------------------------------------------

    /// Runs one-time initialization. Returns `false` if it already ran.
    ///
    /// The resource bag is moved into the scenario and is gone afterwards,
    /// whether or not the scenario took anything from it.
    pub fn initialize(&mut self) -> bool {
        if self.state != LifecycleState::Created {
            return false;
        }
        let resources = self.initial_resources.take().unwrap_or_default();
        debug!(target: "scenario", "Initializing {}", self.scenario.name());
        self.scenario.initialize(resources);
        self.state = LifecycleState::Initialized;
        true
    }

    /// Acquires render resources; no-op when already loaded.
    pub fn load(&mut self, renderer: &mut R) {
        match self.state {
            LifecycleState::Loaded => return,
            LifecycleState::Created => {
                self.initialize();
            }
            LifecycleState::Initialized | LifecycleState::Unloaded => {}
        }
        debug!(target: "scenario", "Loading {}", self.scenario.name());
        self.scenario.load(renderer);
        self.state = LifecycleState::Loaded;
    }

    /// Releases render resources; no-op unless loaded.
    pub fn unload(&mut self, renderer: &mut R) {
        if self.state != LifecycleState::Loaded {
            return;
        }
        debug!(target: "scenario", "Unloading {}", self.scenario.name());
        self.scenario.unload(renderer);
        self.state = LifecycleState::Unloaded;
    }

    /// Releases the scenario, its elements and any unconsumed resources.
    pub fn destroy(mut self) {
        self.tear_down();
    }

    fn tear_down(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if self.state == LifecycleState::Loaded {
            warn!(
                target: "scenario",
                "Destroying {} while still loaded; render resources were not released",
                self.scenario.name()
            );
        }
        debug!(target: "scenario", "Destroying {}", self.scenario.name());
        self.scenario.destroy();
        self.scenario.elements_mut().clear();
        self.initial_resources = None;
    }

    //--- Frame Work -------------------------------------------------------

    /// Clears the frame, then steps and draws each element in order.
    ///
    /// Returns `false` without touching the backend unless loaded.
    pub fn process_and_draw_frame(&mut self, ctx: &mut FrameContext<'_, R>) -> bool {
        if self.state != LifecycleState::Loaded {
            return false;
        }
        ctx.renderer().clear_frame();
        self.scenario.elements_mut().process_and_draw(ctx);
        true
    }

    pub fn on_back_pressed(&mut self, ctx: &mut FrameContext<'_, R>) {
        self.scenario.on_back_pressed(ctx);
    }

    pub fn notify_interaction_lost(&mut self) {
        self.scenario.on_player_interaction_lost();
    }

    pub fn notify_interaction_regained(&mut self) {
        self.scenario.on_player_interaction_regained();
    }

    //--- Query API --------------------------------------------------------

    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.state == LifecycleState::Loaded
    }

    pub fn name(&self) -> &str {
        self.scenario.name()
    }
}

impl<R: RenderBackend> Drop for ScenarioLifecycle<R> {
    fn drop(&mut self) {
        self.tear_down();
    }
}

impl<R: RenderBackend> fmt::Debug for ScenarioLifecycle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioLifecycle")
            .field("scenario", &self.scenario.name())
            .field("state", &self.state)
            .field("has_resources", &self.initial_resources.is_some())
            .finish()
    }
}

//=== Pending Slot ========================================================

/// Puts `next` into the pending slot, destroying whatever was waiting.
pub(crate) fn replace_pending<R: RenderBackend>(
    slot: &mut Option<ScenarioLifecycle<R>>,
    next: ScenarioLifecycle<R>,
) {
    debug!(target: "scenario", "Scheduling {} as next scenario", next.name());
    if let Some(discarded) = slot.replace(next) {
        debug!(
            target: "scenario",
            "Pending scenario {} superseded before install",
            discarded.name()
        );
        discarded.destroy();
    }
}

//=========================================================================
// Tests
//=========================================================================
