//! Delimited survey table ingestion and export.
//!
//! Survey extracts ship as tab-separated files with a header row and thousands of columns. The
//! whole table (or a chosen subset of columns) is loaded into memory as a [`DataSet`].

use std::io::{Read, Write};
use std::path::Path;

use crate::error::{CodebookError, CodebookResult};
use crate::types::{DataSet, DataType, Schema, Value};

use super::observability::{IngestionContext, ObserverOptions, SourceKind};

/// Options for [`ingest_table_from_path`].
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Field delimiter. Defaults to tab.
    pub delimiter: u8,
    /// Columns to load, in output order. `None` loads every column in file order.
    pub columns: Option<Vec<String>>,
    /// Type every loaded column is parsed as. Defaults to [`DataType::Float64`].
    pub data_type: DataType,
    /// Observer/alert settings.
    pub observe: ObserverOptions,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            columns: None,
            data_type: DataType::Float64,
            observe: ObserverOptions::default(),
        }
    }
}

/// Read only the header row of a delimited file.
pub fn read_header(path: impl AsRef<Path>, delimiter: u8) -> CodebookResult<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_path(path)?;
    Ok(rdr.headers()?.iter().map(str::to_owned).collect())
}

/// Load a delimited table from disk.
///
/// Rules:
///
/// - The file must have a header row.
/// - Every column in `options.columns` must be present (order can differ from the file).
/// - Blank (or whitespace-only) cells become [`Value::Null`].
pub fn ingest_table_from_path(
    path: impl AsRef<Path>,
    options: &TableOptions,
) -> CodebookResult<DataSet> {
    let path = path.as_ref();
    let ctx = IngestionContext {
        path: path.to_path_buf(),
        kind: SourceKind::Table,
    };

    let result = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .from_path(path)
        .map_err(CodebookError::from)
        .and_then(|mut rdr| {
            ingest_table_from_reader(&mut rdr, options.columns.as_deref(), options.data_type)
        });

    options.observe.report(&ctx, &result, DataSet::row_count);
    result
}

/// Load a table from an existing reader, selecting `columns` (or all columns) as `data_type`.
pub fn ingest_table_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    columns: Option<&[String]>,
    data_type: DataType,
) -> CodebookResult<DataSet> {
    let schema = match columns {
        Some(cols) => Schema::uniform(cols.iter().cloned(), data_type),
        None => Schema::uniform(rdr.headers()?.iter(), data_type),
    };
    ingest_with_schema(rdr, &schema)
}

/// Load a table from an existing reader using an explicit schema.
pub fn ingest_with_schema<R: Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> CodebookResult<DataSet> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> file column indexes (allows re-ordered or subset columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(CodebookError::SchemaMismatch {
                    message: format!(
                        "missing required column '{}' ({} columns in header)",
                        field.name,
                        headers.len()
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based for users, and the header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = record.get(idx).unwrap_or("");
            row.push(parse_typed_value(user_row, &field.name, field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: DataType,
    raw: &str,
) -> CodebookResult<Value> {
    let trimmed = raw.trim();
    if is_missing_token(trimmed) {
        return Ok(Value::Null);
    }

    let parse_error = |message: String| CodebookError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(|f| if f.is_nan() { Value::Null } else { Value::Float64(f) })
            .map_err(|e| parse_error(e.to_string())),
    }
}

/// Cell texts read as missing: blank and the usual NA/NaN spellings of survey exports.
const MISSING_TOKENS: &[&str] = &["NA", "N/A", "NaN", "nan", "NULL", "null", "-NaN", "-nan"];

fn is_missing_token(cell: &str) -> bool {
    cell.is_empty() || MISSING_TOKENS.contains(&cell)
}

/// Write a dataset as a delimited file with a header row.
pub fn write_table(dataset: &DataSet, path: impl AsRef<Path>, delimiter: u8) -> CodebookResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;
    write_table_to(&mut wtr, dataset)
}

/// Write a dataset to an existing writer. [`Value::Null`] is written as an empty cell.
pub fn write_table_to<W: Write>(wtr: &mut csv::Writer<W>, dataset: &DataSet) -> CodebookResult<()> {
    wtr.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(format_value))?;
    }
    wtr.flush()?;
    Ok(())
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Int64(v) => v.to_string(),
        Value::Float64(v) if v.fract() == 0.0 && v.is_finite() => format!("{v:.0}"),
        Value::Float64(v) => v.to_string(),
        Value::Utf8(s) => s.clone(),
    }
}
