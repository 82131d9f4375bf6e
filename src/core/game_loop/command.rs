//=========================================================================
// Loop Commands
//=========================================================================
//
// Work posted by the UI thread for the loop thread.
//
// Architecture:
//   GameLoopHandle ──Sender<LoopCommand>──► CommandInbox ──collect()──► GameLoop
//
// Collection is bounded per frame so a flooding producer cannot starve
// frame stepping; the rest waits for the next frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::GameLoop;
use crate::core::host_bridge::RenderBackend;

//=== LoopCommand =========================================================

/// One-shot closure run on the loop thread at the start of a frame.
pub type DeferredAction<R> = Box<dyn FnOnce(&mut GameLoop<R>) + Send>;

pub(crate) enum LoopCommand<R: RenderBackend> {
    /// User work from `schedule_for_next_frame`.
    Deferred(DeferredAction<R>),
    InteractionLost,
    InteractionRegained {
        width: u32,
        height: u32,
        surface_changed: bool,
    },
    BackPressed,
}

impl<R: RenderBackend> LoopCommand<R> {
    /// Surface loss and regain, applied even while paused or terminated.
    /// Everything else runs scenario or user code and waits for a running
    /// frame.
    pub(crate) fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            LoopCommand::InteractionLost | LoopCommand::InteractionRegained { .. }
        )
    }
}

impl<R: RenderBackend> fmt::Debug for LoopCommand<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopCommand::Deferred(_) => f.write_str("Deferred(..)"),
            LoopCommand::InteractionLost => f.write_str("InteractionLost"),
            LoopCommand::InteractionRegained {
                width,
                height,
                surface_changed,
            } => f
                .debug_struct("InteractionRegained")
                .field("width", width)
                .field("height", height)
                .field("surface_changed", surface_changed)
                .finish(),
            LoopCommand::BackPressed => f.write_str("BackPressed"),
        }
    }
}

//=== CommandInbox ========================================================

/// Default cap on commands taken from the channel per frame.
pub const DEFAULT_COMMANDS_PER_FRAME: usize = 256;

pub(crate) struct CommandInbox<R: RenderBackend> {
    receiver: Receiver<LoopCommand<R>>,
    per_frame: usize,
}

impl<R: RenderBackend> CommandInbox<R> {
    pub(crate) fn new(receiver: Receiver<LoopCommand<R>>, per_frame: usize) -> Self {
        Self {
            receiver,
            per_frame,
        }
    }

    /// Moves up to the per-frame cap of queued commands into `out`.
    pub(crate) fn collect(&self, out: &mut Vec<LoopCommand<R>>) -> usize {
        let mut drained = 0;

        while drained < self.per_frame {
            match self.receiver.try_recv() {
                Ok(command) => {
                    out.push(command);
                    drained += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if drained >= self.per_frame {
            warn!(
                target: "game_loop",
                "Command backlog: took {} commands this frame, {} still queued",
                drained,
                self.receiver.len()
            );
        }

        drained
    }

    /// Moves every queued command into `out`, ignoring the cap.
    pub(crate) fn collect_all(&self, out: &mut Vec<LoopCommand<R>>) -> usize {
        let before = out.len();
        out.extend(self.receiver.try_iter());
        out.len() - before
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
