//! Listings Core — fetch, clean and publish the NASDAQ Trader "other listed"
//! symbol directory.
//!
//! This crate contains the whole batch transform:
//! - Configuration with the published package's defaults
//! - Listing sources (HTTP, local file) behind a trait
//! - A string-typed table model with filter / derive / reorder / project
//! - Cleaning (test-issue filter, company-name derivation)
//! - Splitting into the NYSE-only and all-other tables
//! - CSV export and the `datapackage.json` descriptor
//! - The `Pipeline` tying the stages together with typed errors

pub mod clean;
pub mod config;
pub mod export;
pub mod package;
pub mod pipeline;
pub mod source;
pub mod split;
pub mod table;

pub use clean::{clean, company_name};
pub use config::{ConfigError, PipelineConfig, DEFAULT_SOURCE_URL};
pub use export::{export_csv, save_tables, write_table_csv, ExportError};
pub use package::{
    describe, infer_column_types, infer_field_type, infer_schema, schema_with_types,
    write_datapackage, ColumnTypes, DataPackage, Field, FieldType, PackageError, Resource, Schema,
};
pub use pipeline::{Pipeline, PipelineError, RunSummary, TableSummary};
pub use source::{source_for, FetchError, FileSource, HttpSource, ListingSource};
pub use split::{identifier_column, split, OutputTable};
pub use table::{creation_time, parse_listing, ParseError, Table};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn data_types_are_send_sync() {
        assert_send::<Table>();
        assert_sync::<Table>();
        assert_send::<OutputTable>();
        assert_sync::<OutputTable>();
        assert_send::<DataPackage>();
        assert_sync::<DataPackage>();
        assert_send::<PipelineConfig>();
        assert_sync::<PipelineConfig>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<PipelineError>();
        assert_sync::<PipelineError>();
    }
}
