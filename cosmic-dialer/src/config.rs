//! Dialer Configuration
//!
//! Configuration management for the COSMIC dialer, stored as TOML under
//! `~/.config/cosmic/cosmic-dialer/dialer.toml`.

use anyhow::{Context, Result};
use cosmic_dialer_core::source::DEFAULT_PAGE_SIZE;
use cosmic_dialer_core::{CallTimings, DialerError, ThemeVariant};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "dialer.toml";

/// Dialer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Contact list configuration
    #[serde(default)]
    pub contacts: ContactsConfig,

    /// Call timing and audio configuration
    #[serde(default)]
    pub call: CallConfig,

    /// Appearance configuration
    #[serde(default)]
    pub appearance: AppearanceConfig,

    /// Storage paths
    #[serde(default)]
    pub paths: PathConfig,
}

/// Contact list configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactsConfig {
    /// JSON page to read contacts from (built-in sample list if unset)
    #[serde(default)]
    pub source_path: Option<PathBuf>,

    /// Number of contacts per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Minimum time the refresh indicator stays visible, in milliseconds
    #[serde(default = "default_refresh_delay")]
    pub refresh_delay_ms: u64,
}

/// Call configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallConfig {
    /// Seconds a call may stay connecting before it fails
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Seconds the failure message stays on screen
    #[serde(default = "default_failure_display")]
    pub failure_display_secs: u64,

    /// Seconds between hang-up and leaving the call screen with native audio
    #[serde(default = "default_end_delay_native")]
    pub end_delay_native_secs: u64,

    /// Seconds between hang-up and leaving the call screen without native audio
    #[serde(default = "default_end_delay_fallback")]
    pub end_delay_fallback_secs: u64,

    /// Play ringback and end tones
    ///
    /// When disabled, calls connect immediately and hang-up vibrates instead.
    #[serde(default = "default_true")]
    pub native_audio: bool,

    /// Simulated time until the ringback tone is ready, in milliseconds
    #[serde(default = "default_ringback_latency")]
    pub ringback_latency_ms: u64,
}

/// Appearance configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppearanceConfig {
    /// Initial theme (light or dark)
    #[serde(default)]
    pub theme: ThemeVariant,
}

/// Storage paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    /// Configuration directory
    pub config_dir: PathBuf,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_refresh_delay() -> u64 {
    2000
}

fn default_connect_timeout() -> u64 {
    60
}

fn default_failure_display() -> u64 {
    3
}

fn default_end_delay_native() -> u64 {
    2
}

fn default_end_delay_fallback() -> u64 {
    5
}

fn default_ringback_latency() -> u64 {
    1500
}

fn default_true() -> bool {
    true
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            source_path: None,
            page_size: default_page_size(),
            refresh_delay_ms: default_refresh_delay(),
        }
    }
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            failure_display_secs: default_failure_display(),
            end_delay_native_secs: default_end_delay_native(),
            end_delay_fallback_secs: default_end_delay_fallback(),
            native_audio: true,
            ringback_latency_ms: default_ringback_latency(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contacts: ContactsConfig::default(),
            call: CallConfig::default(),
            appearance: AppearanceConfig::default(),
            paths: PathConfig::default(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("cosmic")
        .join("cosmic-dialer")
}

impl ContactsConfig {
    /// Get refresh delay as Duration
    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }
}

impl CallConfig {
    /// Get simulated ringback latency as Duration
    pub fn ringback_latency(&self) -> Duration {
        Duration::from_millis(self.ringback_latency_ms)
    }

    /// Build session timings from the configured values
    pub fn timings(&self) -> CallTimings {
        CallTimings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            failure_display: Duration::from_secs(self.failure_display_secs),
            end_delay_native: Duration::from_secs(self.end_delay_native_secs),
            end_delay_fallback: Duration::from_secs(self.end_delay_fallback_secs),
            ..CallTimings::default()
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&default_config_dir())
    }

    /// Load configuration from a directory, creating default if not found
    pub fn load_from(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config
                .validate()
                .with_context(|| format!("Invalid config file {}", config_path.display()))?;
            // Saved back to the file it was read from
            config.paths.config_dir = config_dir.to_path_buf();
            Ok(config)
        } else {
            let mut config = Config::default();
            config.paths.config_dir = config_dir.to_path_buf();
            config.save()?;
            tracing::info!("Created default configuration at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.paths.config_dir).context("Failed to create config directory")?;

        let config_path = self.config_path();
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    pub fn config_path(&self) -> PathBuf {
        self.paths.config_dir.join(CONFIG_FILE)
    }

    fn validate(&self) -> cosmic_dialer_core::Result<()> {
        if self.contacts.page_size == 0 {
            return Err(DialerError::configuration("contacts.page_size must be at least 1"));
        }
        if self.call.connect_timeout_secs == 0 {
            return Err(DialerError::configuration(
                "call.connect_timeout_secs must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.contacts.page_size, 20);
        assert_eq!(config.contacts.refresh_delay(), Duration::from_secs(2));
        assert!(config.call.native_audio);
        assert_eq!(config.call.timings(), CallTimings::default());
        assert_eq!(config.appearance.theme, ThemeVariant::Light);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();

        let config = Config::load_from(dir.path()).unwrap();
        assert!(dir.path().join("dialer.toml").exists());
        assert_eq!(config.paths.config_dir, dir.path());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let contents = format!(
            "[call]\nnative_audio = false\nconnect_timeout_secs = 30\n\n\
             [appearance]\ntheme = \"dark\"\n\n\
             [paths]\nconfig_dir = {:?}\n",
            dir.path()
        );
        fs::write(dir.path().join("dialer.toml"), contents).unwrap();

        let config = Config::load_from(dir.path()).unwrap();
        assert!(!config.call.native_audio);
        assert_eq!(config.call.timings().connect_timeout, Duration::from_secs(30));
        assert_eq!(config.call.end_delay_fallback_secs, 5);
        assert_eq!(config.appearance.theme, ThemeVariant::Dark);
        assert_eq!(config.contacts.page_size, 20);
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("dialer.toml"), "[contacts]\npage_size = 0\n").unwrap();

        let error = Config::load_from(dir.path()).unwrap_err();
        let cause = error.downcast_ref::<DialerError>().unwrap();
        assert!(matches!(cause, DialerError::Configuration(_)));
        assert!(cause.to_string().contains("contacts.page_size"));
    }

    #[test]
    fn test_rejects_zero_connect_timeout() {
        let mut config = Config::default();
        config.call.connect_timeout_secs = 0;

        let error = config.validate().unwrap_err();
        assert!(matches!(error, DialerError::Configuration(_)));
    }

    #[test]
    fn test_file_without_paths_section() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("dialer.toml"),
            "[contacts]\npage_size = 5\n\n[call]\nnative_audio = false\n",
        )
        .unwrap();

        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.contacts.page_size, 5);
        assert!(!config.call.native_audio);
        assert_eq!(config.paths.config_dir, dir.path());
        assert_eq!(config.config_path(), dir.path().join("dialer.toml"));
    }
}
