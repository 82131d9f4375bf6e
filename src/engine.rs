//=========================================================================
// Engine
//
// Optional desktop/mobile host that wires a prepared game loop to Winit.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run(game, initial)──>  [Runtime]
//         │                          │
//         ├─ with_target_fps()       ├─ prepares the loop on this thread (UI)
//         ├─ with_title()            ├─ spawns the paced loop thread
//         ├─ with_window_size()      ├─ runs the platform event loop
//         └─ with_logging()          └─ joins the loop thread on exit
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use thiserror::Error;
use winit::error::EventLoopError;
use winit::event_loop::{EventLoop, EventLoopProxy};

//=== Internal Dependencies ===============================================

use crate::core::game_loop::{GameLoop, GameLoopBuilder};
use crate::core::host_bridge::{RenderBackend, UiWaker};
use crate::core::scenario::ScenarioLifecycle;
use crate::logging::{init_logging, LoggingConfig};
use crate::platform::{Platform, UiWake, WindowConfig};

//=== EngineError =========================================================

/// Host runtime failures.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The Winit event loop could not be created or failed while running.
    #[error("event loop error: {0}")]
    EventLoop(#[from] EventLoopError),

    /// The OS refused to start the loop thread.
    #[error("failed to spawn loop thread: {0}")]
    LoopThreadSpawn(#[from] std::io::Error),

    /// The loop thread panicked.
    #[error("loop thread panicked")]
    LoopThreadPanicked,
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Target FPS**: 60.0 (loop thread pacing)
/// - **Title**: "spritestep"
/// - **Window size**: 800x600 logical pixels
/// - **Logging**: `env_logger` with RUST_LOG or info
///
/// # Examples
///
/// ```no_run
/// use spritestep::prelude::*;
/// # struct Title { elements: ElementList<HeadlessRenderer> }
/// # impl Scenario<HeadlessRenderer> for Title {
/// #     fn initialize(&mut self, _resources: ResourceBag) {}
/// #     fn elements_mut(&mut self) -> &mut ElementList<HeadlessRenderer> { &mut self.elements }
/// # }
///
/// let initial = ScenarioLifecycle::new(Title { elements: ElementList::new() });
/// EngineBuilder::new()
///     .with_target_fps(120.0)
///     .with_title("Sprites")
///     .build()
///     .run(GameLoopBuilder::new(HeadlessRenderer::new()), initial)?;
/// # Ok::<(), spritestep::EngineError>(())
/// ```
pub struct EngineBuilder {
    target_fps: f64,
    title: String,
    window_size: (u32, u32),
    logging: Option<LoggingConfig>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            target_fps: 60.0,
            title: "spritestep".to_owned(),
            window_size: (800, 600),
            logging: Some(LoggingConfig::default()),
        }
    }

    /// Sets how often the loop thread steps a frame.
    ///
    /// The frame delta itself comes from the loop's clock; this only paces
    /// the thread so it does not spin.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `fps` is not a positive finite number.
    pub fn with_target_fps(mut self, fps: f64) -> Self {
        assert!(fps.is_finite() && fps > 0.0, "Target FPS must be positive, got {}", fps);
        self.target_fps = fps;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial inner window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be non-zero, got {}x{}", width, height);
        self.window_size = (width, height);
        self
    }

    /// Logger setup performed by `run`; `None` leaves logging to the caller.
    pub fn with_logging(mut self, logging: Option<LoggingConfig>) -> Self {
        self.logging = logging;
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            target_fps: self.target_fps,
            window: WindowConfig {
                title: self.title,
                width: self.window_size.0,
                height: self.window_size.1,
            },
            logging: self.logging,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Winit host runtime.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread = UI thread)
///   ├─► GameLoop (Loop Thread @ target FPS)
///   │     └─► active scenario, pointer snapshot, lifecycle work
///   │
///   └─► Platform (Winit Event Loop)
///         └─► window, pointer input, suspend/resume, back key
/// ```
pub struct Engine {
    target_fps: f64,
    window: WindowConfig,
    logging: Option<LoggingConfig>,
}

impl Engine {
    /// Runs the game and blocks until it terminates.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the Winit event loop and its wakeup proxy
    /// 2. Prepares the game loop on this thread, which becomes the UI thread
    /// 3. Spawns the loop thread
    /// 4. Runs the platform event loop until the game terminates
    /// 5. Joins the loop thread, which shuts the loop down
    pub fn run<R: RenderBackend>(
        self,
        game: GameLoopBuilder<R>,
        initial: ScenarioLifecycle<R>,
    ) -> Result<(), EngineError> {
        if let Some(logging) = self.logging {
            init_logging(logging);
        }
        info!("Starting engine runtime (target FPS: {})", self.target_fps);

        //--- 1. Event loop ------------------------------------------------
        let event_loop = EventLoop::<UiWake>::with_user_event().build()?;
        let waker = ProxyWaker {
            proxy: Mutex::new(event_loop.create_proxy()),
        };

        //--- 2. Prepare ---------------------------------------------------
        let (game_loop, handle) = game.with_waker(waker).prepare(initial);

        //--- 3. Loop thread -----------------------------------------------
        let loop_thread = spawn_loop_thread(game_loop, self.target_fps)?;
        info!("Loop thread spawned");

        //--- 4. Platform --------------------------------------------------
        let mut platform = Platform::new(handle.clone(), self.window);
        let platform_result = event_loop.run_app(&mut platform);
        info!("Platform event loop exited");

        //--- 5. Cleanup ---------------------------------------------------
        handle.terminate();
        let joined = loop_thread.join();

        if let Err(e) = &platform_result {
            error!("Platform error: {}", e);
        }
        platform_result?;

        match joined {
            Ok(()) => {
                info!("Engine shutdown complete");
                Ok(())
            }
            Err(_) => {
                error!("Loop thread panicked");
                Err(EngineError::LoopThreadPanicked)
            }
        }
    }
}

//=== Loop Thread =========================================================

/// Steps the loop at `target_fps` until termination, then shuts it down.
fn spawn_loop_thread<R: RenderBackend>(
    mut game_loop: GameLoop<R>,
    target_fps: f64,
) -> std::io::Result<thread::JoinHandle<()>> {
    let frame_duration = Duration::from_secs_f64(1.0 / target_fps);

    thread::Builder::new()
        .name("spritestep-loop".to_owned())
        .spawn(move || {
            loop {
                let frame_start = Instant::now();

                game_loop.step_one_frame();
                if game_loop.handle().is_terminated() {
                    debug!("Loop thread observed termination");
                    break;
                }

                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
            game_loop.shutdown();
        })
}

//=== ProxyWaker ==========================================================

struct ProxyWaker {
    proxy: Mutex<EventLoopProxy<UiWake>>,
}

impl UiWaker for ProxyWaker {
    fn wake(&self) {
        let Ok(proxy) = self.proxy.lock() else {
            warn!("Wake proxy poisoned, UI wakeup skipped");
            return;
        };
        if proxy.send_event(UiWake).is_err() {
            debug!("Event loop closed, UI wakeup dropped");
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
