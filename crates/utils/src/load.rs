//! Reference table loading.

use std::path::Path;

use peerscan_primitives::{MetricScheme, MetricVector, ReferenceTable, StockRecord};
use polars::prelude::*;
use tracing::debug;

use crate::UtilsError;

/// Column names for the code and sector of each row.
///
/// Metric columns are named by [`MetricScheme::column`].
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Stock code column.
    pub code_column: String,
    /// Sector column.
    pub sector_column: String,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self { code_column: "Kode".to_string(), sector_column: "Sub Sektor".to_string() }
    }
}

/// Read a comma-delimited reference file with a header row.
///
/// # Errors
/// Returns an error if the file cannot be parsed or lacks a required column.
pub fn read_reference_csv<M: MetricScheme>(
    path: impl AsRef<Path>,
    schema: &TableSchema,
) -> Result<ReferenceTable<M>, UtilsError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()?;

    debug!(path = %path.as_ref().display(), rows = df.height(), "read reference file");
    reference_table_from_frame(&df, schema)
}

/// Build a reference table from a DataFrame.
///
/// Metric columns are cast to `Float64`. Rows with a null code or sector, or
/// a null or non-finite metric, are skipped. Row order is preserved and
/// sector labels are kept verbatim.
///
/// # Arguments
/// * `df` - Input frame with code, sector and metric columns
/// * `schema` - Code and sector column names
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if a required column is absent, or a
/// polars error if a metric column cannot be cast to a number.
pub fn reference_table_from_frame<M: MetricScheme>(
    df: &DataFrame,
    schema: &TableSchema,
) -> Result<ReferenceTable<M>, UtilsError> {
    let codes = string_column(df, &schema.code_column)?;
    let sectors = string_column(df, &schema.sector_column)?;

    let metrics = M::ALL
        .iter()
        .map(|m| {
            require_column(df, m.column())?;
            let cast = df.column(m.column())?.cast(&DataType::Float64)?;
            Ok(cast.f64()?.clone())
        })
        .collect::<Result<Vec<_>, UtilsError>>()?;

    let mut records = Vec::with_capacity(df.height());
    let mut skipped = 0usize;

    for i in 0..df.height() {
        let (Some(code), Some(sector)) = (codes.get(i), sectors.get(i)) else {
            skipped += 1;
            continue;
        };
        let values: Option<Vec<f64>> =
            metrics.iter().map(|ca| ca.get(i).filter(|v| v.is_finite())).collect();
        let Some(vector) = values.and_then(MetricVector::<M>::try_from_values) else {
            skipped += 1;
            continue;
        };
        records.push(StockRecord::new(code.into(), sector.into(), vector));
    }

    if skipped > 0 {
        debug!(skipped, kept = records.len(), "skipped incomplete reference rows");
    }

    Ok(ReferenceTable::new(records))
}

fn require_column(df: &DataFrame, name: &str) -> Result<(), UtilsError> {
    match df.get_column_index(name) {
        Some(_) => Ok(()),
        None => Err(UtilsError::MissingColumn(name.to_string())),
    }
}

fn string_column(df: &DataFrame, name: &str) -> Result<StringChunked, UtilsError> {
    require_column(df, name)?;
    let cast = df.column(name)?.cast(&DataType::String)?;
    Ok(cast.str()?.clone())
}
