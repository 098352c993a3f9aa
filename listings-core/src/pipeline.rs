//! The listing pipeline: fetch → parse → clean → split → serialize → describe.
//!
//! A single blocking pass with no retries. Each stage fails with its own error
//! type, wrapped in [`PipelineError`] so callers can tell which stage broke.
//! Output already written by earlier stages is left on disk when a later stage
//! fails.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clean::clean;
use crate::config::PipelineConfig;
use crate::export::{save_tables, ExportError};
use crate::package::{describe, infer_column_types, write_datapackage, FieldType, PackageError};
use crate::source::{source_for, FetchError, ListingSource};
use crate::split::{identifier_column, split};
use crate::table::{creation_time, parse_listing, ParseError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    #[error("describe failed: {0}")]
    Describe(#[from] PackageError),
}

/// Row count and location of one written table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub rows: usize,
    pub path: PathBuf,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Data rows in the fetched listing, trailer included.
    pub rows_parsed: usize,
    /// Rows that survived the test-issue filter.
    pub rows_kept: usize,
    pub tables: Vec<TableSummary>,
    pub datapackage: PathBuf,
    /// Upstream `File Creation Time` trailer, when present.
    pub created_at: Option<NaiveDateTime>,
    /// BLAKE3 hex digest of the fetched text.
    pub snapshot_hash: String,
}

pub struct Pipeline {
    config: PipelineConfig,
    source: Box<dyn ListingSource>,
    root: PathBuf,
}

impl Pipeline {
    /// Build a pipeline that reads from `config.source_url` and writes under
    /// the current directory.
    pub fn from_config(config: PipelineConfig) -> Result<Self, PipelineError> {
        let source = source_for(&config.source_url)?;
        Ok(Self::new(config, source))
    }

    pub fn new(config: PipelineConfig, source: Box<dyn ListingSource>) -> Self {
        Self {
            config,
            source,
            root: PathBuf::from("."),
        }
    }

    /// Write outputs under `root` instead of the current directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        let cfg = &self.config;

        info!(source = self.source.name(), "fetching listing");
        let text = self.source.fetch()?;
        let snapshot_hash = blake3::hash(text.as_bytes()).to_hex().to_string();
        debug!(bytes = text.len(), hash = %snapshot_hash, "fetched listing");

        let raw = parse_listing(&text, cfg.delimiter)?;
        identifier_column(&raw, cfg)?;
        raw.require_column(&cfg.exchange_column)?;
        let rows_parsed = raw.len();

        let created_at = creation_time(&raw);
        match created_at {
            Some(ts) => info!(rows = rows_parsed, created_at = %ts, "parsed listing"),
            None => warn!(rows = rows_parsed, "listing has no file creation time trailer"),
        }

        // Types come from the whole parsed listing; the derived company name is text.
        let mut column_types = infer_column_types(&raw);
        column_types.insert(cfg.company_name_column.clone(), FieldType::String);

        let cleaned = clean(raw, cfg)?;
        let rows_kept = cleaned.len();
        info!(
            kept = rows_kept,
            dropped = rows_parsed - rows_kept,
            "removed test issues"
        );

        let outputs = split(cleaned, cfg)?;
        let paths = save_tables(&outputs, &self.root.join(&cfg.output_dir))?;

        let tables: Vec<TableSummary> = outputs
            .iter()
            .zip(paths)
            .map(|(out, path)| TableSummary {
                name: out.name.clone(),
                rows: out.table.len(),
                path,
            })
            .collect();
        for t in &tables {
            info!(table = %t.name, rows = t.rows, path = %t.path.display(), "wrote table");
        }

        let package = describe(&outputs, &column_types, cfg);
        let datapackage = self.root.join(&cfg.datapackage_path);
        write_datapackage(&package, &datapackage)?;
        info!(
            path = %datapackage.display(),
            resources = package.resources.len(),
            "wrote data package"
        );

        Ok(RunSummary {
            rows_parsed,
            rows_kept,
            tables,
            datapackage,
            created_at,
            snapshot_hash,
        })
    }
}
