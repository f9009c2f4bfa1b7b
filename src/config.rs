use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::tui::{KeyMap, Theme, ThemeVariant};

pub const ENV_API_URL: &str = "BIZCTL_API_URL";
pub const ENV_API_TOKEN: &str = "BIZCTL_API_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub tui: TuiSettings,
    #[serde(default)]
    pub keys: KeySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// PostgREST root, e.g. `https://data.example.com`
    pub base_url: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
    /// Bearer token; prefer the environment variable over storing it here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiSettings {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Spinner / redraw interval while idle
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeySettings {
    #[serde(default = "default_quit_key")]
    pub quit: String,
    #[serde(default = "default_next_section_key")]
    pub next_section: String,
    #[serde(default = "default_prev_section_key")]
    pub prev_section: String,
}

fn default_table() -> String {
    "proposals".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_theme() -> String {
    "mocha".to_string()
}

fn default_tick_ms() -> u64 {
    120
}

fn default_quit_key() -> String {
    "ctrl+c".to_string()
}

fn default_next_section_key() -> String {
    "tab".to_string()
}

fn default_prev_section_key() -> String {
    "shift+tab".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            table: default_table(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for TuiSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl Default for KeySettings {
    fn default() -> Self {
        Self {
            quit: default_quit_key(),
            next_section: default_next_section_key(),
            prev_section: default_prev_section_key(),
        }
    }
}

/// Directory holding config.toml and settings.toml
pub fn config_dir() -> Result<PathBuf> {
    let dir = if cfg!(target_os = "linux") {
        dirs::config_dir()
            .context("Failed to get XDG config directory")?
            .join("bizctl")
    } else {
        dirs::home_dir()
            .context("Failed to get home directory")?
            .join(".bizctl")
    };

    if !dir.exists() {
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create config directory: {:?}", dir))?;
        info!("Created config directory: {:?}", dir);
    }

    Ok(dir)
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    pub fn settings_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("settings.toml"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("bizctl.log"))
    }

    /// Load config.toml (written with defaults when absent) and apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::get_config_path()?;
        let mut config = Self::load_from(&path)?;
        if !path.exists() {
            config.save()?;
        }
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", path);

        if !path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::get_config_path()?;
        debug!("Saving config to: {:?}", path);

        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        fs::write(&path, content).with_context(|| format!("Failed to write config file: {:?}", path))?;

        info!("Config saved successfully");
        Ok(())
    }

    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            debug!("Using {} from environment", ENV_API_URL);
            self.api.base_url = Some(url);
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.trim().is_empty()) {
            debug!("Using {} from environment", ENV_API_TOKEN);
            self.api.token = Some(token);
        }
    }

    pub fn base_url(&self) -> Result<&str> {
        self.api
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .with_context(|| {
                format!(
                    "No data API configured: set api.base_url in config.toml or {}",
                    ENV_API_URL
                )
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs.max(1))
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tui.tick_ms.max(16))
    }

    pub fn keymap(&self) -> Result<KeyMap> {
        Ok(KeyMap {
            quit: self.keys.quit.parse().context("Invalid keys.quit")?,
            next_section: self.keys.next_section.parse().context("Invalid keys.next_section")?,
            prev_section: self.keys.prev_section.parse().context("Invalid keys.prev_section")?,
        })
    }

    pub fn theme(&self) -> Result<Theme> {
        let variant: ThemeVariant = self.tui.theme.parse().context("Invalid tui.theme")?;
        Ok(Theme::new(variant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "https://data.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url().unwrap(), "https://data.example.com");
        assert_eq!(config.api.table, "proposals");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.tui.theme, "mocha");
        assert_eq!(config.keys.quit, "ctrl+c");
    }

    #[test]
    fn test_missing_base_url_is_an_error() {
        let err = Config::default().base_url().unwrap_err();
        assert!(err.to_string().contains(ENV_API_URL));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::default();
        config.api.base_url = Some("https://file.example.com".into());
        config.apply_env_overrides(|key| match key {
            ENV_API_URL => Some("https://env.example.com".into()),
            ENV_API_TOKEN => Some("secret".into()),
            _ => None,
        });

        assert_eq!(config.base_url().unwrap(), "https://env.example.com");
        assert_eq!(config.api.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let mut config = Config::default();
        config.apply_env_overrides(|_| Some("  ".into()));
        assert!(config.api.base_url.is_none());
        assert!(config.api.token.is_none());
    }

    #[test]
    fn test_keymap_parses_defaults() {
        let keymap = Config::default().keymap().unwrap();
        assert_eq!(keymap.quit.code, KeyCode::Char('c'));
        assert_eq!(keymap.quit.modifiers, KeyModifiers::CONTROL);
        assert_eq!(keymap.prev_section.code, KeyCode::BackTab);
    }

    #[test]
    fn test_bad_keymap_and_theme_rejected() {
        let mut config = Config::default();
        config.keys.quit = "hyper+z".into();
        assert!(config.keymap().is_err());

        config.tui.theme = "neon".into();
        assert!(config.theme().is_err());
    }

    #[test]
    fn test_load_from_missing_path_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.api.base_url.is_none());
    }
}
