//! Server configuration from environment variables.
//!
//! HOST (default 0.0.0.0), PORT (default 8080), SCORING_MODE (score_based or
//! symbolic_result, default score_based), STATIC_DIR (default static).

use crate::models::ScoringMode;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Used for competitions created without an explicit `scoringMode`.
    pub scoring_mode: ScoringMode,
    pub static_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            scoring_mode: ScoringMode::default(),
            static_dir: default_static_dir(),
        }
    }
}

impl Config {
    /// Read the configuration; unparsable values fall back to defaults with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = match lookup("PORT") {
            Some(p) => p.parse().unwrap_or_else(|_| {
                log::warn!("Invalid PORT {:?}, using {}", p, default_port());
                default_port()
            }),
            None => default_port(),
        };
        let scoring_mode = match lookup("SCORING_MODE") {
            Some(mode) => mode.parse().unwrap_or_else(|e| {
                log::warn!("{}, using score_based", e);
                ScoringMode::ScoreBased
            }),
            None => ScoringMode::default(),
        };
        Self {
            host: lookup("HOST").unwrap_or_else(default_host),
            port,
            scoring_mode,
            static_dir: lookup("STATIC_DIR").unwrap_or_else(default_static_dir),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "static".to_string()
}
