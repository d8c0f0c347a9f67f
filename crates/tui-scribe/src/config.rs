//! Optional JSON configuration.
//!
//! Read from the path in `SCRIBE_CONFIG`, or from `scribe.json` in the
//! working directory when present. Anything unreadable or malformed falls
//! back to the defaults.

use scribe_core::DEFAULT_TAB_WIDTH;
use serde_json::Value;
use std::path::PathBuf;
use std::{env, fs};
use tracing::warn;

/// How many times a dirty buffer asks for Ctrl-Q again before quitting.
const DEFAULT_QUIT_CONFIRM_TIMES: u32 = 3;

/// Front-end configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Tab width in cells.
    pub tab_width: usize,
    /// Quit confirmations required while the buffer is dirty.
    pub quit_confirm_times: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            quit_confirm_times: DEFAULT_QUIT_CONFIRM_TIMES,
        }
    }
}

/// Loads the configuration, falling back to defaults on any failure.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    match fs::read_to_string(&path) {
        Ok(text) => parse(&text).unwrap_or_else(|| {
            warn!(path = %path.display(), "malformed config, using defaults");
            Config::default()
        }),
        Err(err) => {
            warn!(path = %path.display(), %err, "unreadable config, using defaults");
            Config::default()
        }
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os("SCRIBE_CONFIG") {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from("scribe.json");
    local.exists().then_some(local)
}

fn parse(text: &str) -> Option<Config> {
    let value: Value = serde_json::from_str(text).ok()?;
    let mut config = Config::default();

    if let Some(n) = value.get("tab_width").and_then(Value::as_u64) {
        if n >= 1 {
            config.tab_width = n as usize;
        }
    }
    if let Some(n) = value.get("quit_confirm_times").and_then(Value::as_u64) {
        config.quit_confirm_times = n as u32;
    }

    Some(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides_fields() {
        let config = parse(r#"{ "tab_width": 4, "quit_confirm_times": 1 }"#).expect("parse");
        assert_eq!(config.tab_width, 4);
        assert_eq!(config.quit_confirm_times, 1);
    }

    #[test]
    fn test_parse_keeps_defaults_for_missing_fields() {
        let config = parse(r#"{ "tab_width": 2 }"#).expect("parse");
        assert_eq!(config.tab_width, 2);
        assert_eq!(
            config.quit_confirm_times,
            Config::default().quit_confirm_times
        );
    }

    #[test]
    fn test_parse_rejects_zero_tab_width() {
        let config = parse(r#"{ "tab_width": 0 }"#).expect("parse");
        assert_eq!(config.tab_width, DEFAULT_TAB_WIDTH);
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert_eq!(parse("not json"), None);
    }
}
