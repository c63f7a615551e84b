//! Settings -- API credentials and endpoints from environment and config file.
//!
//! Credentials are sourced only from the environment or `sandcheck.toml`,
//! never from literals in code.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const ENV_API_KEY: &str = "SANDCHECK_API_KEY";
pub const ENV_API_URL: &str = "SANDCHECK_API_URL";
pub const ENV_TARGET: &str = "SANDCHECK_TARGET";

const DEFAULT_BASE_URL: &str = "https://api.sandboxes.dev";
const CONFIG_FILE: &str = "sandcheck.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    /// Optional target environment/region forwarded to the service.
    pub target: Option<String>,
}

/// On-disk overlay. Every field optional; environment wins over file.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_key: Option<String>,
    base_url: Option<String>,
    target: Option<String>,
}

impl Settings {
    /// Resolve settings: `sandcheck.toml` (if present) overlaid by the
    /// environment. Fails when no API key is configured anywhere.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let file = if config_path.exists() {
            let raw = std::fs::read_to_string(config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str::<FileSettings>(&raw)
                .with_context(|| format!("invalid config in {}", config_path.display()))?
        } else {
            FileSettings::default()
        };

        let api_key = env_var(ENV_API_KEY).or(file.api_key);
        let Some(api_key) = api_key else {
            bail!("{ENV_API_KEY} is not set and no api_key found in {CONFIG_FILE}");
        };

        let base_url = env_var(ENV_API_URL)
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let target = env_var(ENV_TARGET).or(file.target);

        Ok(Self {
            api_key,
            base_url,
            target,
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_settings_parse() {
        let raw = r#"
            api_key = "key-from-file"
            base_url = "https://example.test"
        "#;
        let parsed: FileSettings = toml::from_str(raw).unwrap();
        assert_eq!(parsed.api_key.as_deref(), Some("key-from-file"));
        assert_eq!(parsed.base_url.as_deref(), Some("https://example.test"));
        assert!(parsed.target.is_none());
    }

    #[test]
    fn test_load_from_file_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sandcheck.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "api_key = \"file-key\"").unwrap();

        // Note: assumes SANDCHECK_* are unset in the test environment.
        if std::env::var(ENV_API_KEY).is_ok() {
            return;
        }
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.api_key, "file-key");
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_missing_key_fails() {
        if std::env::var(ENV_API_KEY).is_ok() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains(ENV_API_KEY));
    }
}
