use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::WidgetError;

pub const APP_DIR: &str = "trellis";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoCompleteConfig {
    /// Idle time after the last keystroke before a query runs
    pub delay_ms: u64,
    /// Maximum number of suggestions shown
    pub limit: usize,
    /// Write suggestions back with entities decoded
    pub allow_dirty: bool,
    pub enabled: bool,
    /// Word list file, one entry per line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_list: Option<PathBuf>,
    /// External command run with the search text as last argument
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub query_timeout_ms: u64,
}

impl Default for AutoCompleteConfig {
    fn default() -> Self {
        Self {
            delay_ms: 200,
            limit: 50,
            allow_dirty: true,
            enabled: true,
            word_list: None,
            command: None,
            query_timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatePickerConfig {
    /// 0 = Sunday .. 6 = Saturday
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_start_day: Option<u8>,
    /// strftime pattern for the month header, e.g. "%B %Y"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_format: Option<String>,
    /// Seven names, Sunday first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimePickerConfig {
    pub is_24hr: bool,
    pub minute_interval: u32,
}

impl Default for TimePickerConfig {
    fn default() -> Self {
        Self {
            is_24hr: false,
            minute_interval: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecimalConfig {
    pub precision: u32,
    pub min: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Format as typed on a cash machine keypad
    pub atm: bool,
}

impl Default for DecimalConfig {
    fn default() -> Self {
        Self {
            precision: 2,
            min: 0.0,
            max: None,
            atm: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegerPickerConfig {
    pub min: i64,
    pub max: i64,
    pub step: i64,
}

impl Default for IntegerPickerConfig {
    fn default() -> Self {
        Self {
            min: 1,
            max: 10,
            step: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub min: f64,
    pub max: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { min: 0.0, max: 100.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub autocomplete: AutoCompleteConfig,

    #[serde(default)]
    pub date_picker: DatePickerConfig,

    #[serde(default)]
    pub time_picker: TimePickerConfig,

    #[serde(default)]
    pub decimal: DecimalConfig,

    #[serde(default)]
    pub integer_picker: IntegerPickerConfig,

    #[serde(default)]
    pub progress: ProgressConfig,
}

impl AppConfig {
    /// Directory holding config.toml and theme.conf
    pub fn config_dir() -> Result<PathBuf, WidgetError> {
        let dir = dirs::config_dir().ok_or(WidgetError::NoConfigDir)?.join(APP_DIR);

        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(dir)
    }

    fn default_path() -> Result<PathBuf, WidgetError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load from the default location, creating the file when missing.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load from `path` or the default location. Unreadable or invalid
    /// files produce the defaults; only a missing file is written back.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!("{}, using defaults", e);
                    return Ok(AppConfig::default());
                }
            },
        };

        if path.exists() {
            match Self::read(&path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("{}, using defaults", e);
                    return Ok(AppConfig::default());
                }
            }
        }

        let config = AppConfig::default();
        if let Err(e) = config.save_to(&path) {
            tracing::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, WidgetError> {
        let content = std::fs::read_to_string(path).map_err(|source| WidgetError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.sanitize();
        Ok(config)
    }

    /// Save to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)?;
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), WidgetError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| WidgetError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replace values the widgets cannot work with.
    fn sanitize(&mut self) {
        if let Some(day) = self.date_picker.week_start_day {
            if day > 6 {
                tracing::warn!("week_start_day {} out of range, using locale default", day);
                self.date_picker.week_start_day = None;
            }
        }
        if self.time_picker.minute_interval == 0 || self.time_picker.minute_interval > 60 {
            tracing::warn!(
                "minute_interval {} out of range, using 1",
                self.time_picker.minute_interval
            );
            self.time_picker.minute_interval = 1;
        }
        if self.integer_picker.step <= 0 {
            tracing::warn!("integer_picker.step must be positive, using 1");
            self.integer_picker.step = 1;
        }
        if self.autocomplete.command.as_deref().is_some_and(|c| c.trim().is_empty()) {
            self.autocomplete.command = None;
        }
    }
}
