//! Configuration loading helpers.

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::constants::DEFAULT_SLOT_FACTOR;
use crate::error::IndexError;
use crate::schema::TableKind;

/// Errors returned by configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error while reading config files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Invalid value for a key.
    #[error("invalid value for {key}: {value}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Raw value string.
        value: String,
    },
    /// Unknown configuration key.
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    /// Missing required configuration field.
    #[error("missing required field: {0}")]
    MissingField(String),
    /// Table kind name with no key schema.
    #[error(transparent)]
    UnsupportedKind(#[from] IndexError),
}

/// Top-level configuration schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlatkeyConfig {
    /// Table configuration.
    pub table: Option<TableSpec>,
}

impl FlatkeyConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load configuration from the `FLATKEY_CONFIG` env var (if set), then
    /// apply `FLATKEY__section__field` overrides.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let config_path = env::var("FLATKEY_CONFIG").ok();
        let mut config = match config_path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment overrides in-place.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        for (key, value) in env::vars() {
            if !key.starts_with("FLATKEY__") {
                continue;
            }
            let path = key["FLATKEY__".len()..].to_ascii_lowercase();
            let parts: Vec<&str> = path.split("__").collect();
            let value = value.trim().to_string();

            match parts.as_slice() {
                ["table", "kind"] => {
                    self.table_mut().kind = Some(value);
                }
                ["table", "capacity"] => {
                    self.table_mut().capacity = Some(parse_value(&key, &value)?);
                }
                ["table", "slot_factor"] => {
                    self.table_mut().slot_factor = Some(parse_value(&key, &value)?);
                }
                _ => return Err(ConfigError::UnknownKey(key)),
            }
        }

        Ok(())
    }

    /// Resolve the table section, if present.
    pub fn table_options(&self) -> Result<Option<TableOptions>, ConfigError> {
        match self.table.as_ref() {
            Some(spec) => Ok(Some(spec.resolve()?)),
            None => Ok(None),
        }
    }

    fn table_mut(&mut self) -> &mut TableSpec {
        self.table.get_or_insert_with(TableSpec::default)
    }
}

/// Table configuration from TOML/env.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableSpec {
    /// Table kind name ("MarketData", "Trades", ...).
    pub kind: Option<String>,
    /// Record capacity.
    pub capacity: Option<usize>,
    /// Slots allocated per record of capacity.
    pub slot_factor: Option<usize>,
}

impl TableSpec {
    fn resolve(&self) -> Result<TableOptions, ConfigError> {
        let kind = self
            .kind
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField("table.kind".into()))?;
        let kind = TableKind::from_str(kind)?;
        let capacity = self
            .capacity
            .ok_or_else(|| ConfigError::MissingField("table.capacity".into()))?;
        let slot_factor = self.slot_factor.unwrap_or(DEFAULT_SLOT_FACTOR);
        if slot_factor == 0 {
            return Err(ConfigError::InvalidValue {
                key: "table.slot_factor".into(),
                value: "0".into(),
            });
        }
        Ok(TableOptions {
            kind,
            capacity,
            slot_factor,
        })
    }
}

/// Resolved table options.
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Table kind.
    pub kind: TableKind,
    /// Record capacity.
    pub capacity: usize,
    /// Slots allocated per record of capacity.
    pub slot_factor: usize,
}

impl TableOptions {
    /// Slot array length these options produce, clamped to the two entries
    /// the engine requires.
    pub fn slot_count(&self) -> usize {
        (self.capacity * self.slot_factor).max(2)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
