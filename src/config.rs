//! Configuration loading and validation.
//!
//! Loaded from `$SOULCANVAS_CONFIG_PATH` or `~/.soulcanvas/config.toml`.
//! A missing file yields defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::calendar::solar::{SolarTermCalendar, DEFAULT_UTC_OFFSET_MINUTES};
use crate::calendar::HourBoundary;

/// Env var naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SOULCANVAS_CONFIG_PATH";

/// Largest UTC offset accepted, in minutes (UTC+14:00).
const MAX_UTC_OFFSET_MINUTES: u32 = 840;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote inference service.
    pub gemini: GeminiConfig,
    /// Calendar conversion.
    pub calendar: CalendarConfig,
    /// Image stage.
    pub image: ImageConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Gemini endpoints, models and credential lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API base URL, without trailing slash.
    pub base_url: String,
    /// Model for the structured text call.
    pub text_model: String,
    /// Model for the image call.
    pub image_model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Calendar conversion settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Day-pillar rollover convention.
    pub hour_boundary: HourBoundary,
    /// UTC offset of the civil birth time, in minutes.
    pub utc_offset_minutes: i32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            hour_boundary: HourBoundary::default(),
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }
}

impl CalendarConfig {
    /// Build the calendar adapter these settings describe.
    pub fn calendar(&self) -> SolarTermCalendar {
        SolarTermCalendar::new(self.hour_boundary, self.utc_offset_minutes)
    }
}

/// Image stage settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Append the locally derived negative constraints to the model's prompt.
    pub append_constraints: bool,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for daily-rotated JSON logs; console only when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

// Default value functions for serde

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_owned()
}
fn default_text_model() -> String {
    "gemini-2.5-flash".to_owned()
}
fn default_image_model() -> String {
    "imagen-4.0-generate-001".to_owned()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_owned()
}
fn default_log_level() -> String {
    "info".to_owned()
}

impl Config {
    /// Load configuration with precedence: env vars > TOML file > defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the merged configuration is invalid.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using a custom env resolver (for testing).
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let path = match env(CONFIG_PATH_ENV) {
            Some(p) => PathBuf::from(p),
            None => config_dir()?.join("config.toml"),
        };
        let mut config = load_config(&path)?;
        config.apply_overrides(env);
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function for testability (avoids unsafe `set_var` in tests).
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("SOULCANVAS_GEMINI_BASE_URL") {
            self.gemini.base_url = v;
        }
        if let Some(v) = env("SOULCANVAS_TEXT_MODEL") {
            self.gemini.text_model = v;
        }
        if let Some(v) = env("SOULCANVAS_IMAGE_MODEL") {
            self.gemini.image_model = v;
        }
        if let Some(v) = env("SOULCANVAS_HOUR_BOUNDARY") {
            match v.parse() {
                Ok(boundary) => self.calendar.hour_boundary = boundary,
                Err(_) => tracing::warn!(
                    var = "SOULCANVAS_HOUR_BOUNDARY",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("SOULCANVAS_UTC_OFFSET_MINUTES") {
            match v.parse() {
                Ok(n) => self.calendar.utc_offset_minutes = n,
                Err(_) => tracing::warn!(
                    var = "SOULCANVAS_UTC_OFFSET_MINUTES",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("SOULCANVAS_LOG_LEVEL") {
            self.logging.level = v;
        }
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        let base = url::Url::parse(&self.gemini.base_url)
            .with_context(|| format!("invalid gemini.base_url {:?}", self.gemini.base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("gemini.base_url must be http or https, got {}", base.scheme());
        }
        if self.gemini.text_model.trim().is_empty() || self.gemini.image_model.trim().is_empty() {
            anyhow::bail!("gemini.text_model and gemini.image_model must be non-empty");
        }
        if self.calendar.utc_offset_minutes.unsigned_abs() > MAX_UTC_OFFSET_MINUTES {
            anyhow::bail!(
                "calendar.utc_offset_minutes {} is outside ±{MAX_UTC_OFFSET_MINUTES}",
                self.calendar.utc_offset_minutes
            );
        }
        Ok(())
    }
}

/// Load a config file, returning defaults when it does not exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            tracing::debug!(path = %path.display(), "loading config from file");
            toml::from_str(&contents)
                .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(anyhow::anyhow!(
            "failed to read config at {}: {e}",
            path.display()
        )),
    }
}

/// Resolve the default config directory (`~/.soulcanvas/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".soulcanvas"))
}
