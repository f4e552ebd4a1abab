use crate::error::Result;
use crate::language::{default_languages, LanguageEntry};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Pause before every request, in seconds.
pub const DEFAULT_REQUEST_DELAY_SECS: u64 = 5;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "DESC_TRANSLATE_MODEL";
pub const DELAY_ENV: &str = "DESC_TRANSLATE_DELAY_SECS";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Empty when unset; the API decides whether that is an auth failure.
    pub gemini_api_key: String,
    pub model: String,
    pub request_delay_secs: u64,
    pub languages: Vec<LanguageEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            request_delay_secs: DEFAULT_REQUEST_DELAY_SECS,
            languages: default_languages(),
        }
    }
}

impl Config {
    /// Defaults, then the user config file, then the process environment.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path();
        Self::load_from(path.as_deref(), |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`] with an explicit file and environment lookup.
    pub fn load_from<F>(config_path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                let contents = std::fs::read_to_string(path)?;
                match toml::from_str::<Config>(&contents) {
                    Ok(file_config) => {
                        debug!("Loaded config from {}", path.display());
                        config = file_config;
                    }
                    Err(e) => warn!("Ignoring malformed config {}: {}", path.display(), e),
                }
            }
        }

        config.apply_env(lookup);
        Ok(config)
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV) {
            self.gemini_api_key = key;
        }
        if let Some(model) = lookup(MODEL_ENV) {
            if !model.trim().is_empty() {
                self.model = model.trim().to_string();
            }
        }
        if let Some(delay) = lookup(DELAY_ENV) {
            match delay.trim().parse() {
                Ok(secs) => self.request_delay_secs = secs,
                Err(_) => warn!("Ignoring invalid {}: {}", DELAY_ENV, delay),
            }
        }
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_secs(self.request_delay_secs)
    }

    pub fn has_api_key(&self) -> bool {
        !self.gemini_api_key.is_empty()
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("desc-translate").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gemini_api_key, "");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.request_delay(), Duration::from_secs(5));
        assert_eq!(config.languages, vec![LanguageEntry::new("de", "German")]);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_missing_api_key_is_empty_string() {
        let config = Config::load_from(None, env(&[])).unwrap();
        assert_eq!(config.gemini_api_key, "");
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::load_from(
            None,
            env(&[
                ("GEMINI_API_KEY", "test-key"),
                ("DESC_TRANSLATE_MODEL", "gemini-1.5-pro"),
                ("DESC_TRANSLATE_DELAY_SECS", "0"),
            ]),
        )
        .unwrap();
        assert_eq!(config.gemini_api_key, "test-key");
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.request_delay_secs, 0);
    }

    #[test]
    fn test_invalid_delay_env_is_ignored() {
        let config =
            Config::load_from(None, env(&[("DESC_TRANSLATE_DELAY_SECS", "soon")])).unwrap();
        assert_eq!(config.request_delay_secs, DEFAULT_REQUEST_DELAY_SECS);
    }

    #[test]
    fn test_file_then_env_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
gemini_api_key = "file-key"
model = "file-model"

[[languages]]
code = "fr"
name = "French"

[[languages]]
code = "ja"
name = "Japanese"
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(&path), env(&[("GEMINI_API_KEY", "env-key")])).unwrap();
        assert_eq!(config.gemini_api_key, "env-key");
        assert_eq!(config.model, "file-model");
        assert_eq!(config.request_delay_secs, DEFAULT_REQUEST_DELAY_SECS);
        assert_eq!(
            config.languages,
            vec![
                LanguageEntry::new("fr", "French"),
                LanguageEntry::new("ja", "Japanese")
            ]
        );
    }

    #[test]
    fn test_invalid_language_code_in_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
model = "file-model"

[[languages]]
code = ""
name = "German"
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(&path), env(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [not toml").unwrap();

        let config = Config::load_from(Some(&path), env(&[])).unwrap();
        assert_eq!(config, Config::default());
    }
}
