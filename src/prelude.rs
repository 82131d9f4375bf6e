//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use spritestep::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Host runtime
pub use crate::engine::{Engine, EngineBuilder, EngineError};
pub use crate::logging::{init_logging, LoggingConfig};

// Game loop
pub use crate::core::game_loop::{
    Clock, FrameOutcome, GameLoop, GameLoopBuilder, GameLoopHandle, ManualClock, MonotonicClock,
};

// Scenarios
pub use crate::core::scenario::{
    ElementList, FrameContext, FrameElement, LifecycleState, ResourceBag, Scenario,
    ScenarioLifecycle,
};

// Collaborators
pub use crate::core::host_bridge::{
    GameObserver, HeadlessRenderer, MemorySettings, RenderBackend, SettingsStore, UiWaker,
};

// Input and animation
pub use crate::core::counter::{Counter, CounterKind};
pub use crate::core::error::CounterError;
pub use crate::core::input::{InputPointer, POINTER_COUNT};
