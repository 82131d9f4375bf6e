//=========================================================================
// Thread Affinity
//=========================================================================
//
// Records which OS threads play the UI and loop roles and rejects calls
// made from anywhere else.
//
// The UI thread is whoever prepared the loop. The loop thread is bound by
// the first loop-side call; one thread may play both roles.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::OnceLock;
use std::thread::{self, ThreadId};

use log::debug;

//=== ThreadAffinity ======================================================

#[derive(Debug)]
pub(crate) struct ThreadAffinity {
    ui: ThreadId,
    game_loop: OnceLock<ThreadId>,
}

impl ThreadAffinity {
    /// Binds the UI role to the calling thread.
    pub(crate) fn bind_ui_to_current() -> Self {
        Self {
            ui: thread::current().id(),
            game_loop: OnceLock::new(),
        }
    }

    pub(crate) fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.ui
    }

    #[track_caller]
    pub(crate) fn assert_ui_thread(&self, operation: &str) {
        assert!(
            self.is_ui_thread(),
            "{} must be called on the UI thread ({:?}), called from {:?}",
            operation,
            self.ui,
            thread::current().id()
        );
    }

    /// Binds the loop role on first use, then checks every later call.
    #[track_caller]
    pub(crate) fn assert_loop_thread(&self, operation: &str) {
        let current = thread::current().id();
        let bound = *self.game_loop.get_or_init(|| {
            debug!(target: "game_loop", "Loop thread bound to {:?}", current);
            current
        });
        assert!(
            bound == current,
            "{} must be called on the loop thread ({:?}), called from {:?}",
            operation,
            bound,
            current
        );
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn preparing_thread_is_ui_thread() {
        let affinity = ThreadAffinity::bind_ui_to_current();
        assert!(affinity.is_ui_thread());
        affinity.assert_ui_thread("test");
    }

    #[test]
    fn same_thread_may_hold_both_roles() {
        let affinity = ThreadAffinity::bind_ui_to_current();
        affinity.assert_loop_thread("step");
        affinity.assert_ui_thread("pause");
        affinity.assert_loop_thread("step");
    }

    #[test]
    fn ui_call_from_other_thread_panics() {
        let affinity = Arc::new(ThreadAffinity::bind_ui_to_current());
        let remote = Arc::clone(&affinity);

        let result = thread::spawn(move || remote.assert_ui_thread("pause")).join();
        assert!(result.is_err(), "foreign thread must be rejected");
    }

    #[test]
    fn loop_role_stays_with_first_caller() {
        let affinity = Arc::new(ThreadAffinity::bind_ui_to_current());
        let remote = Arc::clone(&affinity);

        thread::spawn(move || remote.assert_loop_thread("step"))
            .join()
            .expect("first loop call binds");

        let result = thread::spawn({
            let remote = Arc::clone(&affinity);
            move || remote.assert_loop_thread("step")
        })
        .join();
        assert!(result.is_err(), "second thread must not take the loop role");
    }
}
