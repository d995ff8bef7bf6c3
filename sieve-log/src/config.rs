//! Environment-driven logging configuration.

use crate::{Format, Level};
use once_cell::sync::Lazy;
use std::env;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Warn as u8);

static CONFIG: Lazy<LogConfig> = Lazy::new(|| {
    let config = LogConfig::from_env();
    DEBUG_ENABLED.store(config.debug, Ordering::SeqCst);
    LOG_LEVEL.store(config.level as u8, Ordering::SeqCst);
    config
});

/// Logging configuration, read once from `SIEVE_*` variables.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `SIEVE_DEBUG`
    pub debug: bool,
    /// `SIEVE_LOG_LEVEL`, warn unless debug is on
    pub level: Level,
    /// `SIEVE_LOG_FORMAT`
    pub format: Format,
    /// `SIEVE_LOG_COLOR`
    pub color: bool,
    /// `SIEVE_LOG_TIMESTAMPS`
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Warn,
            format: Format::Json,
            color: false,
            timestamps: true,
        }
    }
}

fn flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

impl LogConfig {
    /// Build the configuration from the environment.
    ///
    /// A validation library is quiet by default: only warnings and errors
    /// are written unless `SIEVE_DEBUG` or `SIEVE_LOG_LEVEL` says otherwise.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let debug = flag("SIEVE_DEBUG").unwrap_or(defaults.debug);

        let level = env::var("SIEVE_LOG_LEVEL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(if debug { Level::Debug } else { defaults.level });

        let format = env::var("SIEVE_LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.format);

        let color = flag("SIEVE_LOG_COLOR")
            .unwrap_or_else(|| env::var("NO_COLOR").is_err() && env::var("TERM").is_ok());

        Self {
            debug,
            level,
            format,
            color,
            timestamps: flag("SIEVE_LOG_TIMESTAMPS").unwrap_or(defaults.timestamps),
        }
    }
}

/// Force the lazy configuration now instead of on the first record.
pub fn init() {
    Lazy::force(&CONFIG);
}

/// The process configuration.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

/// Whether debug mode is on.
#[inline]
pub fn is_debug_enabled() -> bool {
    init();
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Whether records at `level` are written.
#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    init();
    level != Level::Off && level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

/// Current minimum level.
pub fn current_level() -> Level {
    init();
    Level::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Change the minimum level at runtime.
pub fn set_level(level: Level) {
    init();
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Toggle debug mode at runtime; turning it on lowers the level to debug.
pub fn set_debug(enabled: bool) {
    init();
    DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    if enabled && current_level() > Level::Debug {
        set_level(Level::Debug);
    }
}
