//! Startup configuration
//!
//! Built once from defaults, command-line flags (see [`crate::cli`]) and an
//! environment override for the statistics path. Nothing is persisted and
//! nothing changes after the bar window is created.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::constants::{defaults, env as env_vars, wireless};

/// Screen border the bar hugs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Edge {
    Top,
    Left,
    Bottom,
    #[default]
    Right,
}

impl Edge {
    /// Select an edge from the first character of `arg`.
    /// Anything unrecognized yields `None` so the caller keeps its default.
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg.chars().next()? {
            't' => Some(Edge::Top),
            'b' => Some(Edge::Bottom),
            'l' => Some(Edge::Left),
            'r' => Some(Edge::Right),
            _ => None,
        }
    }

    /// Top and bottom bars run along the x axis
    pub fn is_horizontal(self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Edge::Top => "top",
            Edge::Left => "left",
            Edge::Bottom => "bottom",
            Edge::Right => "right",
        };
        f.write_str(name)
    }
}

/// Immutable settings for the lifetime of the process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub interface: String,
    pub edge: Edge,
    /// Thickness of the bar in pixels (always >= 1)
    pub bar_width: u16,
    /// Delay between polls (always >= 1s)
    pub poll_interval: Duration,
    pub always_on_top: bool,
    pub wireless_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interface: defaults::INTERFACE.to_string(),
            edge: Edge::default(),
            bar_width: defaults::BAR_WIDTH,
            poll_interval: Duration::from_secs(defaults::POLL_INTERVAL_SECS),
            always_on_top: false,
            wireless_path: PathBuf::from(wireless::PROC_PATH),
        }
    }
}

impl Config {
    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(path) = get(env_vars::WIRELESS_PATH) {
            debug!(path = %path, "Overriding wireless statistics path from environment");
            self.wireless_path = PathBuf::from(path);
        }
    }
}
