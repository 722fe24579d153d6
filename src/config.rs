//! Bridge configuration, loadable from YAML or JSON.
//!
//! ```yaml
//! text_length: 512
//! engine: InnoDB
//! charset: utf8mb4
//! strict: true
//! ```

use crate::convert::{TypeMapper, DEFAULT_TEXT_LENGTH};
use crate::dialect::MySqlDialect;
use crate::error::BridgeError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Largest length accepted for a MySQL VARCHAR
pub const MAX_TEXT_LENGTH: u32 = 65_535;

/// Settings shared by text-mode conversion and structure-mode migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Length of the VARCHAR emitted for SQLite TEXT
    pub text_length: u32,
    /// Storage engine for generated MySQL tables
    pub engine: String,
    /// Default charset for generated MySQL tables
    pub charset: String,
    /// Treat lossy type conversions as errors
    pub strict: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            text_length: DEFAULT_TEXT_LENGTH,
            engine: "InnoDB".to_string(),
            charset: "utf8".to_string(),
            strict: false,
        }
    }
}

impl BridgeConfig {
    /// Load from a file; `.json` is parsed as JSON, anything else as YAML
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let config: BridgeConfig = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml_ng::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config: BridgeConfig = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BridgeError> {
        if !(1..=MAX_TEXT_LENGTH).contains(&self.text_length) {
            return Err(BridgeError::InvalidConfig(format!(
                "text_length must be between 1 and {}, got {}",
                MAX_TEXT_LENGTH, self.text_length
            )));
        }
        for (field, value) in [("engine", &self.engine), ("charset", &self.charset)] {
            if !is_identifier(value) {
                return Err(BridgeError::InvalidConfig(format!(
                    "{} must be a bare identifier, got {:?}",
                    field, value
                )));
            }
        }
        Ok(())
    }

    pub fn type_mapper(&self) -> TypeMapper {
        TypeMapper::new(self.text_length)
    }

    pub fn mysql_dialect(&self) -> MySqlDialect {
        MySqlDialect::new(&self.engine, &self.charset)
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
