//=========================================================================
// Game Loop Core
//
// Platform-independent systems driven by the loop thread and fed by the
// UI thread.
//
// Responsibilities:
// - Hand pointer input from the UI thread to the loop thread without OS
//   locks (`sync`, `input`)
// - Advance time-driven animation values (`counter`)
// - Drive scenarios through their lifecycle (`scenario`)
// - Pace frames and apply UI-thread lifecycle work (`game_loop`)
//
// Notes:
// Nothing in here opens windows or talks to a GPU. Those concerns are
// reached through the collaborator traits in `host_bridge`; the optional
// winit host lives outside `core`.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod counter;
pub mod error;
pub mod game_loop;
pub mod host_bridge;
pub mod input;
pub mod scenario;
pub mod sync;

//=== Public API ==========================================================

pub use counter::{Counter, CounterKind};
pub use error::CounterError;
pub use game_loop::{FrameOutcome, GameLoop, GameLoopBuilder, GameLoopHandle};
pub use host_bridge::{GameObserver, RenderBackend, SettingsStore, UiWaker};
pub use input::{InputPointer, POINTER_COUNT};
pub use scenario::{FrameContext, FrameElement, ResourceBag, Scenario, ScenarioLifecycle};
