//! Ledger configuration (`config.toml` in the data directory)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{LedgerError, Result};
use crate::report::currency::CurrencyFormat;
use crate::report::digest::DEFAULT_HEADING;

pub const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_DIR_NAME: &str = ".fleetledger";

/// Statement and digest wording.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub title: String,
    pub subtitle: String,
    /// Saved statements are named `<file_prefix>_<yyyymmdd>.html`
    pub file_prefix: String,
    pub digest_heading: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Trusty Yellow Cabs".to_string(),
            subtitle: "Monthly Statement".to_string(),
            file_prefix: "taxi_report".to_string(),
            digest_heading: DEFAULT_HEADING.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AccessConfig {
    /// Owner PIN; unset leaves the ledger unlocked
    pub pin: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LedgerConfig {
    pub currency: CurrencyFormat,
    pub report: ReportConfig,
    pub access: AccessConfig,
}

impl LedgerConfig {
    /// Loads `<data_dir>/config.toml`, falling back to defaults when the
    /// file does not exist.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
            .map_err(|e| LedgerError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// `~/.fleetledger` unless overridden.
pub fn resolve_data_dir(override_dir: Option<PathBuf>) -> Result<PathBuf> {
    match override_dir {
        Some(dir) => Ok(dir),
        None => dirs::home_dir()
            .map(|home| home.join(DEFAULT_DIR_NAME))
            .ok_or_else(|| LedgerError::Config("could not determine home directory".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::currency::Grouping;

    #[test]
    fn test_empty_config_is_default() {
        let config = LedgerConfig::parse("").unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.currency.symbol, "₹");
        assert!(config.access.pin.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = LedgerConfig::parse(
            r#"
            [currency]
            symbol = "Rs. "
            grouping = "western"

            [report]
            title = "City Cabs"

            [access]
            pin = "2468"
            "#,
        )
        .unwrap();

        assert_eq!(config.currency.symbol, "Rs. ");
        assert_eq!(config.currency.grouping, Grouping::Western);
        assert_eq!(config.report.title, "City Cabs");
        assert_eq!(config.report.subtitle, "Monthly Statement");
        assert_eq!(config.access.pin.as_deref(), Some("2468"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = LedgerConfig::load(dir.path()).unwrap();
        assert_eq!(config, LedgerConfig::default());
    }

    #[test]
    fn test_load_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[currency\nsymbol=").unwrap();
        assert!(matches!(LedgerConfig::load(dir.path()), Err(LedgerError::Config(_))));
    }
}
