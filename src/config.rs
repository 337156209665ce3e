use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Optional settings file, read from the working directory.
pub const CONFIG_FILE: &str = "planet-at-risk.json";
const ENV_API_KEY: &str = "GEMINI_API_KEY";
const ENV_DATA_DIR: &str = "PLANET_DATA_DIR";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Everything the dashboard needs from outside: where data lives, how to
/// reach the model, and the forecast horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub gemini: GeminiConfig,
    pub forecast: ForecastConfig,
    /// Delay between revealed characters of an AI answer.
    pub reveal_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            gemini: GeminiConfig::default(),
            forecast: ForecastConfig::default(),
            reveal_interval_ms: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.0-flash-lite".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub first_year: i32,
    pub last_year: i32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            first_year: 2025,
            last_year: 2040,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Read [`CONFIG_FILE`] if present, then apply `.env` and environment
    /// overrides. A broken file is reported and replaced by defaults.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();

        let path = Path::new(CONFIG_FILE);
        let mut config = if path.exists() {
            match Self::from_file(path) {
                Ok(c) => c,
                Err(e) => {
                    log::error!("Ignoring {CONFIG_FILE}: {e:#}");
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).context("parsing config JSON")
    }

    /// Fill an empty API key and override the data directory from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        if self.gemini.api_key.trim().is_empty() {
            if let Some(key) = non_empty(ENV_API_KEY) {
                self.gemini.api_key = key;
            }
        }
        if let Some(dir) = non_empty(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
    }

    pub fn dataset_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_match_dashboard() {
        let c = AppConfig::default();
        assert_eq!(c.data_dir, PathBuf::from("data"));
        assert_eq!(c.forecast.first_year, 2025);
        assert_eq!(c.forecast.last_year, 2040);
        assert_eq!(c.gemini.model, "gemini-2.0-flash-lite");
        assert_eq!(c.reveal_interval_ms, 20);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"forecast": {{"last_year": 2050}}, "gemini": {{"api_key": "abc"}}}}"#).unwrap();

        let c = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(c.forecast.first_year, 2025);
        assert_eq!(c.forecast.last_year, 2050);
        assert_eq!(c.gemini.api_key, "abc");
        assert_eq!(c.gemini.model, "gemini-2.0-flash-lite");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(AppConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn env_fills_blank_key_and_overrides_dir() {
        let env: HashMap<&str, &str> =
            HashMap::from([("GEMINI_API_KEY", " secret "), ("PLANET_DATA_DIR", "/srv/climate")]);
        let mut c = AppConfig::default();
        c.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(c.gemini.api_key, "secret");
        assert_eq!(c.dataset_path("a.csv"), PathBuf::from("/srv/climate/a.csv"));
    }

    #[test]
    fn explicit_key_wins_over_env() {
        let mut c = AppConfig::default();
        c.gemini.api_key = "from-file".into();
        c.apply_env(|_| Some("from-env".into()));
        assert_eq!(c.gemini.api_key, "from-file");
    }
}
