//! DucaPowr - Engine configuration
//!
//! Defaults, overridden by `DUCAPOWR_*` environment variables, overridden by
//! command-line flags, overridden at runtime by the `sd` command.

use std::env;
use std::path::PathBuf;

use log::warn;

use crate::search::MAX_DEPTH;

pub const DEFAULT_DEPTH: u32 = 4;

pub const DEPTH_ENV: &str = "DUCAPOWR_DEPTH";
pub const QUOTES_ENV: &str = "DUCAPOWR_QUOTES";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Search depth in plies, always within `1..=MAX_DEPTH`.
    pub depth: u32,
    /// Lines sent to the opponent on resignation.
    pub quotes_path: Option<PathBuf>,
}

impl EngineConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = EngineConfig::default();
        if let Some(text) = lookup(DEPTH_ENV) {
            match text.trim().parse::<u32>() {
                Ok(depth) => config.set_depth(depth),
                Err(_) => warn!("ignoring {}={:?}: not a depth", DEPTH_ENV, text),
            }
        }
        if let Some(path) = lookup(QUOTES_ENV) {
            if !path.is_empty() {
                config.quotes_path = Some(PathBuf::from(path));
            }
        }
        config
    }

    /// Set the search depth, clamped to `1..=MAX_DEPTH`.
    pub fn set_depth(&mut self, depth: u32) {
        let clamped = depth.clamp(1, MAX_DEPTH);
        if clamped != depth {
            warn!("depth {} out of range, using {}", depth, clamped);
        }
        self.depth = clamped;
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            depth: DEFAULT_DEPTH,
            quotes_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| vars.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
    }

    #[test]
    fn defaults() {
        let config = EngineConfig::from_lookup(lookup(&[]));
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.depth, 4);
        assert_eq!(config.quotes_path, None);
    }

    #[test]
    fn environment_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            (DEPTH_ENV, "6"),
            (QUOTES_ENV, "/tmp/quotes.txt"),
        ]));
        assert_eq!(config.depth, 6);
        assert_eq!(config.quotes_path, Some(PathBuf::from("/tmp/quotes.txt")));
    }

    #[test]
    fn bad_depth_is_ignored_and_range_is_clamped() {
        assert_eq!(EngineConfig::from_lookup(lookup(&[(DEPTH_ENV, "deep")])).depth, DEFAULT_DEPTH);
        assert_eq!(EngineConfig::from_lookup(lookup(&[(DEPTH_ENV, "0")])).depth, 1);
        assert_eq!(EngineConfig::from_lookup(lookup(&[(DEPTH_ENV, "99")])).depth, MAX_DEPTH);
    }
}
