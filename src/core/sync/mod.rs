//=========================================================================
// Synchronization Primitives
//=========================================================================
//
// Lock-free building blocks shared by the UI and loop threads.
//
// Components:
// - `two_thread_mutex`: Peterson mutual exclusion for two fixed sides
//
//=========================================================================

//=== Module Declarations =================================================

mod two_thread_mutex;

//=== Public API ==========================================================

pub use two_thread_mutex::{Side, TwoThreadGuard, TwoThreadMutex};
