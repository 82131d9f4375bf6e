//=========================================================================
// Pointer Input
//=========================================================================
//
// Fixed pool of touch/pointer slots shared between the UI thread and the
// loop thread.
//
// Architecture:
// ```text
//   UI thread                        Loop thread
//   publish(id, x, y, pressed)       snapshot_into(&mut consumers)
//        │                                  │
//        └──► slot[id]: TwoThreadMutex ◄────┘
//               (side A)    (side B)
// ```
//
// Every slot has its own mutex, so different fingers never contend with
// each other; the only contention is one producer write against one
// consumer copy of the same slot.
//
//=========================================================================

//=== Module Declarations =================================================

mod pointer;

//=== External Dependencies ===============================================

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::sync::{Side, TwoThreadMutex};

//=== Public API ==========================================================

pub use pointer::InputPointer;

/// Number of simultaneously tracked pointers.
pub const POINTER_COUNT: usize = 4;

/// Side used by the thread that writes pointer state.
pub const PRODUCER_SIDE: Side = Side::A;

/// Side used by the thread that snapshots pointer state.
pub const CONSUMER_SIDE: Side = Side::B;

//=== PointerPool =========================================================

/// Producer-side pointer slots, one [`TwoThreadMutex`] per pointer id.
#[derive(Debug, Default)]
pub struct PointerPool {
    slots: [TwoThreadMutex<InputPointer>; POINTER_COUNT],
}

impl PointerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the producer copy of pointer `id`.
    ///
    /// Returns `false` (and drops the sample) for ids outside the pool.
    pub fn publish(&self, id: usize, x: f32, y: f32, pressed: bool) -> bool {
        let Some(slot) = self.slots.get(id) else {
            warn!(target: "input", "Pointer id {} outside pool of {}, ignored", id, POINTER_COUNT);
            return false;
        };

        trace!(target: "input", "Pointer {} → ({:.3}, {:.3}) pressed={}", id, x, y, pressed);
        slot.lock(PRODUCER_SIDE).update(x, y, pressed);
        true
    }

    /// Copies every producer slot into the matching consumer instance.
    pub fn snapshot_into(&self, consumers: &mut [InputPointer; POINTER_COUNT]) {
        for (slot, consumer) in self.slots.iter().zip(consumers.iter_mut()) {
            let producer = slot.lock(CONSUMER_SIDE);
            consumer.copy_from(&producer);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
