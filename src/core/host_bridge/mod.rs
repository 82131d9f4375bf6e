//=========================================================================
// Host Bridge
//=========================================================================
//
// Bridges the game loop with the collaborators it drives but does not
// implement (rendering, settings persistence, lifetime owner, UI wakeup).
//
// Components:
// - `interface`: the collaborator traits (the contract)
// - `headless`: surface-less implementations for tests and tools
//
//=========================================================================

//=== Module Declarations =================================================

mod headless;
mod interface;

//=== Public API ==========================================================

pub use headless::{HeadlessRenderer, MemorySettings};
pub use interface::{GameObserver, RenderBackend, SettingsStore, UiWaker};
