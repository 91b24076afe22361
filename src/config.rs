//! Application-level configuration loading, including the team-name catalogue.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use rand::Rng;
use serde::Deserialize;
use tracing::{info, warn};

use crate::state::{
    gesture::LONG_PRESS_THRESHOLD,
    match_state::MatchNames,
    reset::{RESET_POLL_INTERVAL, RESET_THRESHOLD},
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "RALLY_BOARD_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Pair of opposing team names sharing a theme.
pub struct NamePair {
    /// Theme both names come from.
    pub theme: String,
    /// Name given to the team starting at end A.
    pub name_a: String,
    /// Name given to the team starting at end B.
    pub name_b: String,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    debug: bool,
    long_press: Duration,
    reset_hold: Duration,
    reset_poll: Duration,
    names: Vec<NamePair>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        names = app_config.names.len(),
                        debug = app_config.debug,
                        "loaded scoreboard config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Whether debug controls (simulated buttons) are enabled.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Minimum press duration classified as a hold.
    pub fn long_press(&self) -> Duration {
        self.long_press
    }

    /// Minimum two-button hold that wipes the match.
    pub fn reset_hold(&self) -> Duration {
        self.reset_hold
    }

    /// Cadence of the two-button reset check.
    pub fn reset_poll(&self) -> Duration {
        self.reset_poll
    }

    /// Draw a name pair at random, avoiding the pair at index `previous`.
    ///
    /// Returns the index drawn alongside the names so callers can pass it back
    /// on the next draw.
    pub fn pick_names<R: Rng>(
        &self,
        rng: &mut R,
        previous: Option<usize>,
    ) -> (usize, MatchNames) {
        let count = self.names.len();
        let index = match previous {
            Some(last) if count > 1 && last < count => {
                // Draw among the other entries, skipping over the previous one.
                let drawn = rng.random_range(0..count - 1);
                if drawn >= last { drawn + 1 } else { drawn }
            }
            _ => rng.random_range(0..count),
        };
        let pair = &self.names[index];
        (
            index,
            MatchNames {
                name_a: pair.name_a.clone(),
                name_b: pair.name_b.clone(),
                theme: pair.theme.clone(),
            },
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            long_press: LONG_PRESS_THRESHOLD,
            reset_hold: RESET_THRESHOLD,
            reset_poll: RESET_POLL_INTERVAL,
            names: default_names(),
        }
    }
}

#[cfg(test)]
impl AppConfig {
    /// Default configuration with debug controls enabled.
    pub(crate) fn debug_for_tests() -> Self {
        Self {
            debug: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    debug: bool,
    long_press_ms: Option<u64>,
    reset_hold_ms: Option<u64>,
    reset_poll_ms: Option<u64>,
    #[serde(default)]
    team_names: Vec<RawNamePair>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        let names = if value.team_names.is_empty() {
            defaults.names
        } else {
            value.team_names.into_iter().map(Into::into).collect()
        };
        Self {
            debug: value.debug,
            long_press: value
                .long_press_ms
                .map_or(defaults.long_press, Duration::from_millis),
            reset_hold: value
                .reset_hold_ms
                .map_or(defaults.reset_hold, Duration::from_millis),
            reset_poll: value
                .reset_poll_ms
                .filter(|ms| *ms > 0)
                .map_or(defaults.reset_poll, Duration::from_millis),
            names,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of a single name pair inside the configuration file.
struct RawNamePair {
    theme: String,
    a: String,
    b: String,
}

impl From<RawNamePair> for NamePair {
    fn from(value: RawNamePair) -> Self {
        Self {
            theme: value.theme,
            name_a: value.a,
            name_b: value.b,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in name catalogue shipped with the binary.
fn default_names() -> Vec<NamePair> {
    [
        ("Lord of the Rings", "Fellowship", "Mordor"),
        ("Star Wars", "Jedi", "Sith"),
        ("Star Trek", "Federation", "Klingon"),
        ("Harry Potter", "Dumbledore's Army", "Death Eaters"),
        ("Doctor Who", "The Doctor", "Dalek"),
        ("X-Men", "X-Men", "Brotherhood"),
        ("Matrix", "Zion", "Machine"),
        ("Firefly", "Serenity", "Alliance"),
        ("Supernatural", "Winchester", "Demons"),
    ]
    .into_iter()
    .map(|(theme, a, b)| NamePair {
        theme: theme.into(),
        name_a: a.into(),
        name_b: b.into(),
    })
    .collect()
}
