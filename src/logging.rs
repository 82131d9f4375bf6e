//=========================================================================
// Logging
//=========================================================================
//
// One-time installation of the `env_logger` backend behind the `log`
// facade used everywhere else.
//
// Filter precedence: explicit config → RUST_LOG → info.
//
// Targets used by the crate: "game_loop", "scenario", "input",
// "platform", "render", "settings".
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Once;

use log::{debug, LevelFilter};

//=== LoggingConfig =======================================================

/// Logger configuration.
///
/// `env_filter` uses `env_logger` syntax, e.g. `"info"` or
/// `"spritestep=debug,winit=warn"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

//=== init_logging ========================================================

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored, as is a logger
/// installed by someone else first.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(LevelFilter::Info);
        }

        builder.write_style(config.write_style);

        if builder.try_init().is_ok() {
            debug!("Logging initialized");
        }
    });
}

//=========================================================================
// Unit Tests
//=========================================================================
