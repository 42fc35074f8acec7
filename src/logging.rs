use std::fs::OpenOptions;

use log::LevelFilter;
use simplelog::{ColorChoice, Config as Format, TermLogger, TerminalMode, WriteLogger};

use crate::config::{LogConfig, expand_path};

/// Map a configured level name to a filter; unknown names fall back to `warn`.
pub fn level_filter(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or(LevelFilter::Warn)
}

/// Install the global logger: append to `config.file` when set, stderr otherwise.
/// Best-effort: failures are silently ignored (logging must never block parsing).
pub fn init(config: &LogConfig) {
    let level = level_filter(&config.level);
    if level == LevelFilter::Off {
        return;
    }

    if !config.file.is_empty() {
        let path = expand_path(&config.file);
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
            let _ = WriteLogger::init(level, Format::default(), file);
            return;
        }
    }

    let _ = TermLogger::init(
        level,
        Format::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}
