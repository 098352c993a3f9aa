//! Data package descriptor (`datapackage.json`).
//!
//! Describes each output table as a resource with a field-level schema. Field
//! types are inferred from the values: any non-numeric value makes a column
//! `string`, otherwise it is `number`. Types are taken from the listing as
//! parsed, before any rows are filtered, so a column keeps its type even when
//! an output table ends up with no rows.
//!
//! The document is written with alphabetically sorted keys and four-space
//! indentation so regenerated files diff cleanly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::config::PipelineConfig;
use crate::split::OutputTable;
use crate::table::Table;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("failed to serialize data package: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub path: String,
    pub format: String,
    pub mediatype: String,
    pub schema: Schema,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPackage {
    pub name: String,
    pub title: String,
    pub license: String,
    pub resources: Vec<Resource>,
}

/// A value counts as numeric if it parses as a finite float.
///
/// `NaN` and `inf` are rejected so tickers spelled that way stay strings.
fn is_numeric(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(f64::is_finite)
        .unwrap_or(false)
}

/// Field types keyed by column name.
pub type ColumnTypes = BTreeMap<String, FieldType>;

/// Infer the type of a column from its values. Blank cells are missing values
/// and never make a column textual, so an all-blank or empty column is a
/// number column.
pub fn infer_field_type<'a, I>(values: I) -> FieldType
where
    I: IntoIterator<Item = &'a str>,
{
    if values
        .into_iter()
        .any(|v| !v.trim().is_empty() && !is_numeric(v))
    {
        FieldType::String
    } else {
        FieldType::Number
    }
}

/// Type of every column in `table`, inferred over all of its rows.
pub fn infer_column_types(table: &Table) -> ColumnTypes {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), infer_field_type(table.column_values(i))))
        .collect()
}

/// Field-level schema for a table, one field per column in column order.
pub fn infer_schema(table: &Table) -> Schema {
    schema_with_types(table, &ColumnTypes::new())
}

/// Like [`infer_schema`], but columns named in `types` take that type instead
/// of one inferred from this table's values.
pub fn schema_with_types(table: &Table, types: &ColumnTypes) -> Schema {
    let fields = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| Field {
            name: name.clone(),
            description: String::new(),
            field_type: types
                .get(name)
                .copied()
                .unwrap_or_else(|| infer_field_type(table.column_values(i))),
        })
        .collect();
    Schema { fields }
}

fn describe_table(out: &OutputTable, types: &ColumnTypes, config: &PipelineConfig) -> Resource {
    Resource {
        name: out.name.clone(),
        path: config.table_path(&out.name),
        format: "csv".into(),
        mediatype: "text/csv".into(),
        schema: schema_with_types(&out.table, types),
    }
}

/// Build the package descriptor for the output tables, in table order.
///
/// `types` usually comes from [`infer_column_types`] over the parsed listing;
/// columns it does not name are inferred from the output table itself.
pub fn describe(
    tables: &[OutputTable],
    types: &ColumnTypes,
    config: &PipelineConfig,
) -> DataPackage {
    DataPackage {
        name: config.package_name.clone(),
        title: config.package_title.clone(),
        license: config.license.clone(),
        resources: tables
            .iter()
            .map(|t| describe_table(t, types, config))
            .collect(),
    }
}

/// Render the descriptor as JSON with sorted keys and four-space indentation.
pub fn to_json(package: &DataPackage) -> Result<String, PackageError> {
    // serde_json::Value maps are ordered by key, which sorts every object.
    let value = serde_json::to_value(package)?;

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the descriptor to `path`, replacing any previous version.
pub fn write_datapackage(package: &DataPackage, path: &Path) -> Result<(), PackageError> {
    let json = to_json(package)?;
    std::fs::write(path, json).map_err(|source| PackageError::Write {
        path: path.display().to_string(),
        source,
    })
}
