//=========================================================================
// Scenario System
//=========================================================================
//
// Self-contained game screens and the lifecycle the loop drives them
// through.
//
// Architecture:
//   GameLoop
//     ├─ active:  ScenarioLifecycle ─► Box<dyn Scenario> ─► ElementList
//     └─ pending: ScenarioLifecycle (installed at the next frame boundary)
//
// Flow:
//   step_one_frame() → process_and_draw_frame() → FrameElement::step/draw
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::host_bridge::RenderBackend;

//=== Module Declarations =================================================

mod context;
mod element;
mod lifecycle;
mod resource_bag;

//=== Public API ==========================================================

pub use context::FrameContext;
pub use element::{ElementList, FrameElement};
pub use lifecycle::{LifecycleState, ScenarioLifecycle};
pub use resource_bag::ResourceBag;

pub(crate) use lifecycle::replace_pending;

//=== Scenario Trait ======================================================

/// A game screen owning its elements and render resources.
///
/// Every hook runs on the loop thread. Only `initialize` and
/// `elements_mut` are required:
///
/// ```rust
/// # use spritestep::prelude::*;
/// struct Title {
///     elements: ElementList<HeadlessRenderer>,
/// }
///
/// impl Scenario<HeadlessRenderer> for Title {
///     fn initialize(&mut self, _resources: ResourceBag) {}
///
///     fn elements_mut(&mut self) -> &mut ElementList<HeadlessRenderer> {
///         &mut self.elements
///     }
/// }
/// ```
pub trait Scenario<R: RenderBackend>: Send {
    /// One-time setup. The bag is dropped afterwards whatever is left in it.
    fn initialize(&mut self, resources: ResourceBag);

    /// Acquires render resources (textures, buffers). May run many times.
    fn load(&mut self, _renderer: &mut R) {}

    /// Releases what `load` acquired.
    fn unload(&mut self, _renderer: &mut R) {}

    /// Final cleanup before the scenario is dropped.
    fn destroy(&mut self) {}

    fn elements_mut(&mut self) -> &mut ElementList<R>;

    fn on_player_interaction_lost(&mut self) {}

    fn on_player_interaction_regained(&mut self) {}

    /// Back button handler. Default ends the game.
    fn on_back_pressed(&mut self, ctx: &mut FrameContext<'_, R>) {
        ctx.terminate();
    }

    /// Name used in log output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
