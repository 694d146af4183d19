//! Configuration management for guestbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use chrono::{FixedOffset, Locale};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::controller::GuestbookOptions;
use crate::error::{Error, Result};
use crate::persistence::DEFAULT_SLOT_KEY;
use crate::surface::NoticeTiming;
use crate::view::{ViewOptions, DEFAULT_TIMESTAMP_FORMAT};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "guestbook";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "guestbook.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `GUESTBOOK_`, nested with `__`)
/// 2. TOML config file at `~/.config/guestbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Display configuration.
    pub display: DisplayConfig,
    /// Notice configuration.
    pub notice: NoticeConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/guestbook/guestbook.db`
    pub database_path: Option<PathBuf>,
    /// Name of the slot holding the guest sequence.
    pub slot_key: String,
}

/// Display-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// strftime format for row timestamps.
    pub timestamp_format: String,
    /// Fixed UTC offset in minutes for displayed times.
    /// Unset means the local time zone.
    pub utc_offset_minutes: Option<i32>,
    /// Locale for month and day names, such as `id_ID` or `id-ID`.
    /// Unset means English names.
    pub locale: Option<String>,
}

/// Notice-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    /// Delay before the thank-you notice appears, in milliseconds.
    pub show_delay_ms: u64,
    /// How long the notice stays visible, in milliseconds.
    pub dismiss_after_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            utc_offset_minutes: None,
            locale: None,
        }
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            show_delay_ms: 100,
            dismiss_after_ms: 3000,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("GUESTBOOK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.slot_key.trim().is_empty() {
            return Err(Error::config_validation("slot_key must not be empty"));
        }

        if self.display.timestamp_format.is_empty()
            || StrftimeItems::new(&self.display.timestamp_format)
                .any(|item| matches!(item, Item::Error))
        {
            return Err(Error::config_validation(format!(
                "invalid timestamp_format: {:?}",
                self.display.timestamp_format
            )));
        }

        if let Some(minutes) = self.display.utc_offset_minutes {
            if offset_from_minutes(minutes).is_none() {
                return Err(Error::config_validation(format!(
                    "utc_offset_minutes ({minutes}) must be within one day of UTC"
                )));
            }
        }

        if let Some(name) = &self.display.locale {
            if parse_locale(name).is_none() {
                return Err(Error::config_validation(format!("unknown locale: {name:?}")));
            }
        }

        if self.notice.dismiss_after_ms == 0 {
            return Err(Error::config_validation(
                "dismiss_after_ms must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the display offset, if one is configured and valid.
    #[must_use]
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        self.display.utc_offset_minutes.and_then(offset_from_minutes)
    }

    /// Get the display locale, if one is configured and known.
    #[must_use]
    pub fn locale(&self) -> Option<Locale> {
        self.display.locale.as_deref().and_then(parse_locale)
    }

    /// Get the view options for rendering rows.
    #[must_use]
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            timestamp_format: self.display.timestamp_format.clone(),
            utc_offset: self.utc_offset(),
            locale: self.locale(),
        }
    }

    /// Get the notice timing.
    #[must_use]
    pub fn notice_timing(&self) -> NoticeTiming {
        NoticeTiming {
            show_after: Duration::from_millis(self.notice.show_delay_ms),
            dismiss_after: Duration::from_millis(self.notice.dismiss_after_ms),
        }
    }

    /// Get the controller options derived from this configuration.
    #[must_use]
    pub fn guestbook_options(&self) -> GuestbookOptions {
        GuestbookOptions {
            view: self.view_options(),
            notice: self.notice_timing(),
        }
    }
}

fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}

/// Accepts both `id_ID` and the BCP 47 style `id-ID`.
fn parse_locale(name: &str) -> Option<Locale> {
    Locale::try_from(name.trim().replace('-', "_").as_str()).ok()
}
