//=========================================================================
// Platform Subsystem
//
// Plays the UI-thread role for the game loop on top of Winit.
//
// Architecture:
// ```text
//  Main Thread (UI):                    Loop Thread:
//  ┌────────────────────────────┐       ┌──────────────────────┐
//  │  Winit Event Loop          │       │  GameLoop            │
//  │   ↓                        │       │   step_one_frame()   │
//  │  PointerMapper             │       │   ↓                  │
//  │   ↓ update_pointer()  ─────┼─slots─┼─► pointer snapshot   │
//  │  resumed / suspended       │       │                      │
//  │   ↓ interaction lost / ────┼─cmds──┼─► lifecycle work     │
//  │     regained               │       │                      │
//  │  user_event(UiWake) ◄──────┼─wake──┼── terminate()        │
//  │   ↓ run_ui_tasks()         │       └──────────────────────┘
//  └────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **resumed/suspended = surface lifecycle**: a resume reports the
//   surface size (regained), a suspend pauses and reports the loss
// - **Resize = regained with new size**: forces the scenario to reload
//   against the new surface
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`, which is also
//   the thread that prepared the loop
//
//=========================================================================

//=== Submodules ==========================================================

mod pointer_mapper;

//=== External Crates =====================================================

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::game_loop::GameLoopHandle;
use crate::core::host_bridge::RenderBackend;
use pointer_mapper::{is_back_key, PointerMapper, PointerSample};

//=== UiWake ==============================================================

/// User event that nudges the Winit loop to run posted UI tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UiWake;

//=== WindowConfig ========================================================

#[derive(Debug, Clone)]
pub(crate) struct WindowConfig {
    pub(crate) title: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

//=== Platform ============================================================

/// Window owner and UI-thread driver of a [`GameLoopHandle`].
///
/// This type is not moved off the main thread; the loop thread is reached
/// only through the handle.
pub(crate) struct Platform<R: RenderBackend> {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,
    config: WindowConfig,
    handle: GameLoopHandle<R>,
    pointers: PointerMapper,
}

impl<R: RenderBackend> Platform<R> {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens lazily in `resumed()`.
    pub(crate) fn new(handle: GameLoopHandle<R>, config: WindowConfig) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            config,
            handle,
            pointers: PointerMapper::new(),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn publish(&self, sample: PointerSample) {
        self.handle
            .update_pointer(sample.slot, sample.x, sample.y, sample.pressed);
    }

    fn surface_regained(&mut self, width: u32, height: u32) {
        self.pointers.set_surface(width, height);
        self.handle.on_player_interaction_regained(width, height);
    }

    fn exit_if_terminated(&self, event_loop: &ActiveEventLoop) {
        if self.handle.is_terminated() && !event_loop.exiting() {
            info!(target: "platform", "Game terminated, leaving event loop");
            event_loop.exit();
        }
    }
}

//=== Winit Integration ===================================================

impl<R: RenderBackend> ApplicationHandler<UiWake> for Platform<R> {
    /// Startup or mobile resume: (re)creates the window and reports the
    /// surface to the loop.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = WindowAttributes::default()
                .with_title(self.config.title.clone())
                .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

            match event_loop.create_window(attrs) {
                Ok(window) => {
                    info!(
                        target: "platform",
                        "Window created: {}x{} @ {}x DPI",
                        window.inner_size().width,
                        window.inner_size().height,
                        window.scale_factor()
                    );
                    self.window = Some(window);
                }
                Err(e) => {
                    error!(target: "platform", "Window creation failed: {}", e);
                    self.handle.terminate();
                    event_loop.exit();
                    return;
                }
            }
        }

        if let Some(size) = self.window.as_ref().map(Window::inner_size) {
            self.surface_regained(size.width, size.height);
        }
    }

    /// Mobile suspend: the surface is about to go away.
    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        debug!(target: "platform", "Suspended, releasing surface");
        self.handle.pause_processing();
        self.handle.on_player_interaction_lost();
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, _event: UiWake) {
        let handled = self.handle.run_ui_tasks();
        trace!(target: "platform", "Ran {} posted UI tasks", handled);
        self.exit_if_terminated(event_loop);
    }

    /// Handles per-window events.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.handle.terminate();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if self.handle.is_interactive() {
                    self.surface_regained(size.width, size.height);
                } else {
                    self.pointers.set_surface(size.width, size.height);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let sample = self.pointers.mouse_moved(position.x, position.y);
                self.publish(sample);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(sample) = self.pointers.mouse_button(*button, *state) {
                    self.publish(sample);
                }
            }

            WindowEvent::Touch(touch) => {
                let sample =
                    self.pointers
                        .touch(touch.id, touch.phase, touch.location.x, touch.location.y);
                if let Some(sample) = sample {
                    self.publish(sample);
                }
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if is_back_key(&key_event.logical_key, key_event.state, key_event.repeat) {
                    debug!(target: "platform", "Back pressed");
                    self.handle.on_back_pressed();
                }
            }

            _ => {
                // Focus, redraw, scale changes: nothing for the loop.
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_if_terminated(event_loop);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
