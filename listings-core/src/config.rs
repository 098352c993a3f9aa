//! Pipeline configuration.
//!
//! Every constant the pipeline depends on (source location, output names,
//! package metadata, column names) lives here so tests and alternate runs can
//! substitute them. The defaults reproduce the published NYSE/other listings
//! package. A TOML file may override any subset of the keys.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// HTTPS mirror of `ftp://ftp.nasdaqtrader.com/symboldirectory/otherlisted.txt`.
pub const DEFAULT_SOURCE_URL: &str = "https://www.nasdaqtrader.com/dynamic/SymDir/otherlisted.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Where the listing is fetched from: `http(s)://`, `file://`, or a bare path.
    pub source_url: String,

    /// Field delimiter of the source listing.
    pub delimiter: char,

    /// Directory (relative to the run root) the CSV tables are written to.
    pub output_dir: String,

    /// Path (relative to the run root) of the data package descriptor.
    pub datapackage_path: String,

    pub package_name: String,
    pub package_title: String,
    pub license: String,

    /// File stem of the primary-exchange table.
    pub primary_table: String,

    /// File stem of the table holding every cleaned listing.
    pub all_table: String,

    /// Exchange code selecting rows for the primary-exchange table.
    pub primary_exchange: String,

    /// Identifier column candidates, first match wins.
    pub identifier_columns: Vec<String>,

    pub security_name_column: String,
    pub test_issue_column: String,
    pub exchange_column: String,
    pub company_name_column: String,

    /// `Test Issue` value marking a real (non-test) listing.
    pub non_test_marker: String,

    /// Company name is the security name up to the first occurrence of this.
    pub name_separator: char,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.into(),
            delimiter: '|',
            output_dir: "data".into(),
            datapackage_path: "datapackage.json".into(),
            package_name: "nyse-other-listings".into(),
            package_title: "NYSE and Other Listings".into(),
            license: String::new(),
            primary_table: "nyse-listed".into(),
            all_table: "other-listed".into(),
            primary_exchange: "N".into(),
            identifier_columns: vec!["ACT Symbol".into(), "Symbol".into()],
            security_name_column: "Security Name".into(),
            test_issue_column: "Test Issue".into(),
            exchange_column: "Exchange".into(),
            company_name_column: "Company Name".into(),
            non_test_marker: "N".into(),
            name_separator: '-',
        }
    }
}

impl PipelineConfig {
    /// Load a config from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Relative path of a table's CSV file, as written into the descriptor.
    pub fn table_path(&self, name: &str) -> String {
        let dir = self.output_dir.trim_end_matches('/');
        if dir.is_empty() {
            format!("{name}.csv")
        } else {
            format!("{dir}/{name}.csv")
        }
    }
}
