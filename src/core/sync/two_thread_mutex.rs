//=========================================================================
// Two-Thread Mutex
//=========================================================================
//
// Peterson-style mutual exclusion between exactly two fixed sides.
//
// Protocol:
//   lock(side)   → want[side] = true
//                → turn = other(side)
//                → spin while want[other] && turn == other
//   unlock(side) → want[side] = false
//
// Guarantees mutual exclusion and starvation freedom for two contenders.
// Waiting is a busy spin (spin_loop hint + periodic yield); nothing here
// ever parks on an OS primitive, so critical sections must stay a handful
// of field copies.
//
// All flag/turn accesses are SeqCst: Peterson needs the store to `turn`
// to be ordered before the load of the other side's `want`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::UnsafeCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::thread;

//=== Side ================================================================

/// One of the two fixed identities allowed to contend for a
/// [`TwoThreadMutex`].
///
/// In the game loop, side `A` is the producer (UI thread writing pointer
/// state) and side `B` is the consumer (loop thread taking snapshots).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Returns the opposite side.
    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    #[inline]
    fn as_turn(self) -> u8 {
        self.index() as u8
    }
}

//=== TwoThreadMutex ======================================================

/// Busy-wait mutual exclusion for exactly two threads.
///
/// Each thread locks through its own [`Side`]. A side may be held by only
/// one thread at a time; locking a side that is already held means a third
/// participant showed up, which the algorithm cannot handle, so it panics.
///
/// # Examples
///
/// ```
/// use spritestep::core::sync::{Side, TwoThreadMutex};
///
/// let cell = TwoThreadMutex::new(0u32);
/// *cell.lock(Side::A) += 1;
/// assert_eq!(*cell.lock(Side::B), 1);
/// ```
pub struct TwoThreadMutex<T> {
    want: [AtomicBool; 2],
    turn: AtomicU8,
    data: UnsafeCell<T>,
}

// SAFETY: access to `data` only happens through a guard, and at most one
// guard exists at a time (per-side exclusivity via `want.swap`, cross-side
// exclusivity via Peterson's protocol).
unsafe impl<T: Send> Send for TwoThreadMutex<T> {}
unsafe impl<T: Send> Sync for TwoThreadMutex<T> {}

impl<T> TwoThreadMutex<T> {
    /// Yield to the scheduler after this many spins.
    const SPINS_BEFORE_YIELD: u32 = 64;

    //--- Construction -----------------------------------------------------

    pub fn new(data: T) -> Self {
        Self {
            want: [AtomicBool::new(false), AtomicBool::new(false)],
            turn: AtomicU8::new(Side::A.as_turn()),
            data: UnsafeCell::new(data),
        }
    }

    //--- Locking ----------------------------------------------------------

    /// Enters the critical section as `side`, spinning until the other side
    /// leaves or hands over its turn.
    ///
    /// # Panics
    ///
    /// Panics if `side` is already held (a third contender).
    pub fn lock(&self, side: Side) -> TwoThreadGuard<'_, T> {
        let me = side.index();
        let other = side.other();

        if self.want[me].swap(true, Ordering::SeqCst) {
            panic!(
                "TwoThreadMutex side {:?} is already held; only two threads may contend",
                side
            );
        }

        self.turn.store(other.as_turn(), Ordering::SeqCst);

        let mut spins = 0u32;
        while self.want[other.index()].load(Ordering::SeqCst)
            && self.turn.load(Ordering::SeqCst) == other.as_turn()
        {
            spins += 1;
            if spins % Self::SPINS_BEFORE_YIELD == 0 {
                thread::yield_now();
            } else {
                std::hint::spin_loop();
            }
        }

        TwoThreadGuard { mutex: self, side }
    }

    /// Returns `true` while `side` is inside (or waiting for) the
    /// critical section.
    pub fn is_held(&self, side: Side) -> bool {
        self.want[side.index()].load(Ordering::SeqCst)
    }

    /// Mutable access without locking; `&mut self` proves no guard exists.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }

    fn unlock(&self, side: Side) {
        self.want[side.index()].store(false, Ordering::SeqCst);
    }
}

impl<T: Default> Default for TwoThreadMutex<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for TwoThreadMutex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoThreadMutex")
            .field("a_held", &self.is_held(Side::A))
            .field("b_held", &self.is_held(Side::B))
            .finish_non_exhaustive()
    }
}

//=== TwoThreadGuard ======================================================

/// RAII guard for a [`TwoThreadMutex`] critical section.
///
/// Leaves the section (clears the side's `want` flag) on drop.
pub struct TwoThreadGuard<'a, T> {
    mutex: &'a TwoThreadMutex<T>,
    side: Side,
}

impl<T> TwoThreadGuard<'_, T> {
    pub fn side(&self) -> Side {
        self.side
    }
}

impl<T> Deref for TwoThreadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the guard is proof of exclusive access.
        unsafe { &*self.mutex.data.get() }
    }
}

impl<T> DerefMut for TwoThreadGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the guard is proof of exclusive access.
        unsafe { &mut *self.mutex.data.get() }
    }
}

impl<T> Drop for TwoThreadGuard<'_, T> {
    fn drop(&mut self) {
        self.mutex.unlock(self.side);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
