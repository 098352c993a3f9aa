//! CSV export of output tables.
//!
//! Tables are written with a header row, in the table's own column order, with
//! no index column. Values are written verbatim; the `csv` writer quotes only
//! fields that need it (embedded commas, quotes, newlines).

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::split::OutputTable;
use crate::table::Table;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Serialize a table as CSV text.
pub fn export_csv(table: &Table) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        wtr.write_record(table.columns())?;
        for row in table.rows() {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
    }
    // Input was all UTF-8 strings, so the output is too.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write a table to `path`, overwriting any existing file.
pub fn write_table_csv(table: &Table, path: &Path) -> Result<(), ExportError> {
    let wrap = |source: csv::Error| ExportError::Write {
        path: path.display().to_string(),
        source,
    };

    let mut wtr = csv::Writer::from_path(path).map_err(wrap)?;
    wtr.write_record(table.columns()).map_err(wrap)?;
    for row in table.rows() {
        wtr.write_record(row).map_err(wrap)?;
    }
    wtr.flush().map_err(|e| wrap(e.into()))?;
    Ok(())
}

/// Write every table to `<dir>/<name>.csv`, creating `dir` if needed.
///
/// Returns the written paths in table order. Files already written stay in
/// place if a later table fails.
pub fn save_tables(tables: &[OutputTable], dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.display().to_string(),
        source,
    })?;

    let mut written = Vec::with_capacity(tables.len());
    for out in tables {
        let path = dir.join(format!("{}.csv", out.name));
        write_table_csv(&out.table, &path)?;
        tracing::debug!(path = %path.display(), rows = out.table.len(), "wrote table");
        written.push(path);
    }
    Ok(written)
}
