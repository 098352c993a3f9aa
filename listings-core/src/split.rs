//! Partition the cleaned listing into the published output tables.

use crate::config::PipelineConfig;
use crate::table::{ParseError, Table};

/// A table destined for `<output_dir>/<name>.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTable {
    pub name: String,
    pub table: Table,
}

/// Name of the identifier column: the first configured candidate present.
pub fn identifier_column<'a>(
    table: &Table,
    config: &'a PipelineConfig,
) -> Result<&'a str, ParseError> {
    config
        .identifier_columns
        .iter()
        .find(|c| table.column_index(c).is_some())
        .map(String::as_str)
        .ok_or_else(|| ParseError::MissingColumn(config.identifier_columns.join(" or ")))
}

/// Split a cleaned table into `[primary-exchange, all-other]`.
///
/// The primary table is the cleaned rows on the primary exchange, projected
/// onto the identifier and company name. The all-other table is the cleaned
/// table unchanged.
pub fn split(cleaned: Table, config: &PipelineConfig) -> Result<Vec<OutputTable>, ParseError> {
    let id_idx = cleaned.require_column(identifier_column(&cleaned, config)?)?;
    let company_idx = cleaned.require_column(&config.company_name_column)?;
    let exchange_idx = cleaned.require_column(&config.exchange_column)?;

    let primary = cleaned
        .clone()
        .filter(|row| row[exchange_idx] == config.primary_exchange)
        .select(&[id_idx, company_idx]);

    Ok(vec![
        OutputTable {
            name: config.primary_table.clone(),
            table: primary,
        },
        OutputTable {
            name: config.all_table.clone(),
            table: cleaned,
        },
    ])
}
