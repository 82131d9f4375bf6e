//=========================================================================
// spritestep: Library Root
//
// Two-thread game loop core for touch-driven 2D sprite games.
//
// Responsibilities:
// - Expose the platform-independent core (`core`): pointer handoff,
//   animation counters, scenario lifecycle and the game loop itself
// - Provide an optional Winit host (`Engine`) that plays the UI-thread
//   role and runs the loop on its own thread
// - Keep the Winit integration (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use spritestep::prelude::*;
//
// fn main() -> Result<(), EngineError> {
//     let initial = ScenarioLifecycle::new(MyTitleScreen::new());
//     EngineBuilder::new()
//         .build()
//         .run(GameLoopBuilder::new(MyRenderer::new()), initial)
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds everything that runs without a window and is what tests,
// tools and custom hosts drive directly.
//
pub mod core;
pub mod logging;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the Winit event handling and is not part of the
// public API surface. `engine` wires it to a game loop.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineError};
