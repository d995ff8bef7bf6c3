//! Logging for the sieve workspace.
//!
//! Thin, zero-cost-when-disabled macros driven by `SIEVE_*` environment
//! variables. Records go to stderr (pretty, compact or JSON lines) or are
//! forwarded to the `log` facade so a host application keeps control of
//! its own logger.
//!
//! ```rust
//! use sieve_log::{debug, warn};
//!
//! let field = "email";
//! debug!("validating {}", field);
//! warn!(target: "sieve::registry", "unknown validator '{}'", "nope");
//! ```
//!
//! # Environment
//!
//! - `SIEVE_DEBUG=1` - enable debug records
//! - `SIEVE_LOG_LEVEL=trace|debug|info|warn|error|off`
//! - `SIEVE_LOG_FORMAT=pretty|compact|json|facade`
//! - `SIEVE_LOG_COLOR=1|0`
//! - `SIEVE_LOG_TIMESTAMPS=1|0`

mod config;
mod level;
mod output;

pub use config::{
    config, current_level, init, is_debug_enabled, is_level_enabled, set_debug, set_level,
    LogConfig,
};
pub use level::{Format, Level};
#[doc(hidden)]
pub use output::log;

/// Log at trace level.
#[macro_export]
macro_rules! trace {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Trace) {
            $crate::log($crate::Level::Trace, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Trace) {
            $crate::log($crate::Level::Trace, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log at debug level; also written whenever `SIEVE_DEBUG` is on.
#[macro_export]
macro_rules! debug {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_debug_enabled() || $crate::is_level_enabled($crate::Level::Debug) {
            $crate::log($crate::Level::Debug, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_debug_enabled() || $crate::is_level_enabled($crate::Level::Debug) {
            $crate::log($crate::Level::Debug, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log at info level.
#[macro_export]
macro_rules! info {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Info) {
            $crate::log($crate::Level::Info, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Info) {
            $crate::log($crate::Level::Info, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log at warn level.
#[macro_export]
macro_rules! warn {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Warn) {
            $crate::log($crate::Level::Warn, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Warn) {
            $crate::log($crate::Level::Warn, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log at error level.
#[macro_export]
macro_rules! error {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Error) {
            $crate::log($crate::Level::Error, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Error) {
            $crate::log($crate::Level::Error, module_path!(), &format!($($arg)+));
        }
    };
}

#[cfg(feature = "tracing")]
pub mod tracing_compat {
    //! A `tracing` subscriber honouring the sieve level.

    use super::*;

    /// Subscriber filtered at the configured level unless `RUST_LOG` is set.
    pub fn subscriber() -> impl tracing::Subscriber {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::{fmt, EnvFilter};

        let directive = match current_level() {
            Level::Off => "off".to_string(),
            level => level.as_str().to_lowercase(),
        };

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(config().color))
    }
}
