//! Record writers.

use crate::{config, is_level_enabled, Format, Level, LogConfig};
use std::io::Write;

/// Write one record. Used by the macros; call them instead.
#[doc(hidden)]
pub fn log(level: Level, target: &str, message: &str) {
    if !is_level_enabled(level) {
        return;
    }

    let config = config();

    match config.format {
        Format::Pretty => write_pretty(level, target, message, config),
        Format::Compact => write_compact(level, target, message, config),
        Format::Json => write_json(level, target, message),
        Format::Facade => forward(level, target, message),
    }
}

fn write_pretty(level: Level, target: &str, message: &str, config: &LogConfig) {
    let mut stderr = std::io::stderr().lock();

    if config.timestamps {
        let now = chrono::Local::now();
        let _ = write!(stderr, "{} ", now.format("%Y-%m-%d %H:%M:%S%.3f"));
    }

    #[cfg(feature = "color")]
    {
        if config.color {
            let _ = write!(stderr, "{:5} ", level.colored());
        } else {
            let _ = write!(stderr, "{:5} ", level.as_str());
        }
    }
    #[cfg(not(feature = "color"))]
    let _ = write!(stderr, "{:5} ", level.as_str());

    if !target.is_empty() {
        let _ = write!(stderr, "[{}] ", target);
    }

    let _ = writeln!(stderr, "{}", message);
}

fn write_compact(level: Level, target: &str, message: &str, config: &LogConfig) {
    let mut stderr = std::io::stderr().lock();

    if config.timestamps {
        let _ = write!(stderr, "{} ", chrono::Local::now().format("%H:%M:%S"));
    }

    let letter = level.as_str().chars().next().unwrap_or('?');
    if target.is_empty() {
        let _ = writeln!(stderr, "{} {}", letter, message);
    } else {
        let _ = writeln!(stderr, "{} {}: {}", letter, target, message);
    }
}

#[cfg(feature = "json")]
fn write_json(level: Level, target: &str, message: &str) {
    #[derive(serde::Serialize)]
    struct Record<'a> {
        timestamp: String,
        level: &'a str,
        target: &'a str,
        message: &'a str,
    }

    let record = Record {
        timestamp: chrono::Utc::now().to_rfc3339(),
        level: level.as_str(),
        target,
        message,
    };

    if let Ok(line) = serde_json::to_string(&record) {
        eprintln!("{}", line);
    }
}

#[cfg(not(feature = "json"))]
fn write_json(level: Level, target: &str, message: &str) {
    // Without serde the structured format degrades to compact lines.
    write_compact(level, target, message, config());
}

fn forward(level: Level, target: &str, message: &str) {
    if let Some(level) = level.to_log_level() {
        log::log!(target: target, level, "{}", message);
    }
}
