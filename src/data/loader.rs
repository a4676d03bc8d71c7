use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type, Int64Type};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{
    COL_BOXES, COL_COUNTRY, COL_DATE, COL_MONTH, COL_PRODUCT, COL_VALUE, COL_YEAR,
    REQUIRED_COLUMNS, SalesDataset, SalesRecord,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the Portuguese column names (primary format)
/// * `.json`    – `[{ "Data": ..., "Ano": ..., ... }, ...]`
/// * `.parquet` – same column names, any integer/float/date/string widths
pub fn load_file(path: &Path) -> Result<SalesDataset> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()).into());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    };

    if dataset.is_empty() {
        log::warn!("{} contains no sales rows", path.display());
    }

    let inconsistent = dataset.inconsistent_period_count();
    if inconsistent > 0 {
        log::warn!(
            "{inconsistent} of {} rows have '{COL_YEAR}'/'{COL_MONTH}' \
             that disagree with '{COL_DATE}'",
            dataset.len()
        );
    }

    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Cells – format-independent view of one field
// ---------------------------------------------------------------------------

/// A single raw field, borrowed from whichever reader produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Cell<'a> {
    Text(&'a str),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    /// A JSON value of a type no sales field can hold (boolean, array, object).
    Other(&'static str),
    Null,
}

/// Build a record from the seven cells in [`REQUIRED_COLUMNS`] order.
/// `row` is 1-based and only used for error messages.
fn record_from_cells(row: usize, cells: [Cell<'_>; 7]) -> Result<SalesRecord, LoadError> {
    let [date, year, month, country, product, value, boxes] = cells;

    let year = cell_integer(row, COL_YEAR, year)?;
    let year = i32::try_from(year)
        .map_err(|_| invalid(row, COL_YEAR, format!("{year} is out of range")))?;

    let month = cell_integer(row, COL_MONTH, month)?;
    if !(1..=12).contains(&month) {
        return Err(invalid(row, COL_MONTH, format!("{month} is not a month")));
    }

    let boxes = cell_integer(row, COL_BOXES, boxes)?;
    let boxes_shipped =
        u64::try_from(boxes).map_err(|_| invalid(row, COL_BOXES, format!("{boxes} is negative")))?;

    Ok(SalesRecord {
        date: cell_date(row, date)?,
        year,
        month: month as u32,
        country: cell_text(row, COL_COUNTRY, country)?,
        product: cell_text(row, COL_PRODUCT, product)?,
        value: cell_float(row, COL_VALUE, value)?,
        boxes_shipped,
    })
}

fn invalid(row: usize, column: &'static str, message: String) -> LoadError {
    LoadError::InvalidValue { row, column, message }
}

fn cell_date(row: usize, cell: Cell<'_>) -> Result<NaiveDate, LoadError> {
    match cell {
        Cell::Date(d) => Ok(d),
        Cell::Text(s) if s.trim().is_empty() => Err(LoadError::EmptyCell { row, column: COL_DATE }),
        Cell::Text(s) => parse_date(s)
            .ok_or_else(|| invalid(row, COL_DATE, format!("'{s}' is not a recognised date"))),
        // Numeric dates are epoch milliseconds, as written by `DataFrame.to_json`.
        Cell::Int(ms) => DateTime::from_timestamp_millis(ms)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| invalid(row, COL_DATE, format!("{ms} is not a valid timestamp"))),
        Cell::Float(f) => Err(invalid(row, COL_DATE, format!("{f} is not a date"))),
        Cell::Other(kind) => {
            Err(invalid(row, COL_DATE, format!("expected a date, got JSON {kind}")))
        }
        Cell::Null => Err(LoadError::EmptyCell { row, column: COL_DATE }),
    }
}

fn cell_integer(row: usize, column: &'static str, cell: Cell<'_>) -> Result<i64, LoadError> {
    let from_float = |f: f64| {
        if f.is_finite() && f.fract() == 0.0 {
            Ok(f as i64)
        } else {
            Err(invalid(row, column, format!("{f} is not a whole number")))
        }
    };
    match cell {
        Cell::Int(i) => Ok(i),
        Cell::Float(f) => from_float(f),
        Cell::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(LoadError::EmptyCell { row, column });
            }
            match s.parse::<i64>() {
                Ok(i) => Ok(i),
                Err(_) => match s.parse::<f64>() {
                    Ok(f) => from_float(f),
                    Err(_) => Err(invalid(row, column, format!("'{s}' is not a number"))),
                },
            }
        }
        Cell::Date(d) => Err(invalid(row, column, format!("expected a number, got date {d}"))),
        Cell::Other(kind) => {
            Err(invalid(row, column, format!("expected a number, got JSON {kind}")))
        }
        Cell::Null => Err(LoadError::EmptyCell { row, column }),
    }
}

fn cell_float(row: usize, column: &'static str, cell: Cell<'_>) -> Result<f64, LoadError> {
    let value = match cell {
        Cell::Int(i) => i as f64,
        Cell::Float(f) => f,
        Cell::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(LoadError::EmptyCell { row, column });
            }
            s.parse::<f64>()
                .map_err(|_| invalid(row, column, format!("'{s}' is not a number")))?
        }
        Cell::Date(d) => {
            return Err(invalid(row, column, format!("expected a number, got date {d}")));
        }
        Cell::Other(kind) => {
            return Err(invalid(row, column, format!("expected a number, got JSON {kind}")));
        }
        Cell::Null => return Err(LoadError::EmptyCell { row, column }),
    };
    if !value.is_finite() {
        return Err(invalid(row, column, format!("{value} is not finite")));
    }
    Ok(value)
}

fn cell_text(row: usize, column: &'static str, cell: Cell<'_>) -> Result<String, LoadError> {
    match cell {
        Cell::Text(s) if s.trim().is_empty() => Err(LoadError::EmptyCell { row, column }),
        Cell::Text(s) => Ok(s.trim().to_string()),
        Cell::Null => Err(LoadError::EmptyCell { row, column }),
        Cell::Other(kind) => Err(invalid(row, column, format!("expected text, got JSON {kind}"))),
        other => Err(invalid(row, column, format!("expected text, got {other:?}"))),
    }
}

/// Parse an ISO or day-first date, with or without a time component.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y/%m/%d %H:%M:%S",
    ];
    const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Strip whitespace and a UTF-8 BOM that spreadsheet exports put on the
/// first header.
fn normalize_header(name: &str) -> &str {
    name.trim().trim_start_matches('\u{feff}').trim()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the column names in [`REQUIRED_COLUMNS`],
/// in any order. Extra columns are ignored.
fn load_csv(path: &Path) -> Result<SalesDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;

    let headers: HashMap<String, usize> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .enumerate()
        .map(|(i, h)| (normalize_header(h).to_string(), i))
        .collect();

    let mut indices = [0usize; 7];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = *headers.get(name).ok_or(LoadError::MissingColumn(name))?;
    }

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = row_no + 1;
        let record = result.with_context(|| format!("CSV row {row}"))?;
        let cells = indices.map(|i| Cell::Text(record.get(i).unwrap_or("")));
        records.push(record_from_cells(row, cells)?);
    }

    Ok(SalesDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Data": "2023-01-15",
///     "Ano": 2023,
///     "Mes": 1,
///     "País": "USA",
///     "Produto": "Chocolate Amargo",
///     "Valor": 100.0,
///     "Caixas Enviadas": 10
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<SalesDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, rec) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {row} is not a JSON object"))?;

        let mut cells = [Cell::Null; 7];
        for (cell, name) in cells.iter_mut().zip(REQUIRED_COLUMNS) {
            let value = obj.get(name).ok_or(LoadError::MissingColumn(name))?;
            *cell = json_to_cell(value);
        }
        records.push(record_from_cells(row, cells)?);
    }

    Ok(SalesDataset::from_records(records))
}

fn json_to_cell(val: &JsonValue) -> Cell<'_> {
    match val {
        JsonValue::String(s) => Cell::Text(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Cell::Int(i)
            } else {
                Cell::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::Null => Cell::Null,
        JsonValue::Bool(_) => Cell::Other("boolean"),
        JsonValue::Array(_) => Cell::Other("array"),
        JsonValue::Object(_) => Cell::Other("object"),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing sales rows.
///
/// Works with files written by **Pandas** (`df.to_parquet()`), **Polars**
/// and the bundled `generate_sample` binary.
fn load_parquet(path: &Path) -> Result<SalesDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    let mut indices = [0usize; 7];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = schema
            .index_of(name)
            .map_err(|_| LoadError::MissingColumn(name))?;
    }

    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let mut columns = Vec::with_capacity(indices.len());
        for (&idx, name) in indices.iter().zip(REQUIRED_COLUMNS) {
            columns.push(ColumnCells::new(batch.column(idx), name)?);
        }

        for i in 0..batch.num_rows() {
            let row = records.len() + 1;
            let mut cells = [Cell::Null; 7];
            for (cell, column) in cells.iter_mut().zip(&columns) {
                *cell = column.cell(i);
            }
            records.push(record_from_cells(row, cells)?);
        }
    }

    Ok(SalesDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

/// An Arrow column normalised to one of four physical types.
enum ColumnCells {
    Text(StringArray),
    Int(Int64Array),
    Float(Float64Array),
    Date(Date32Array),
}

impl ColumnCells {
    fn new(col: &ArrayRef, name: &str) -> Result<Self> {
        let cast_to = |ty: DataType| {
            cast(col, &ty).with_context(|| format!("casting column '{name}' to {ty:?}"))
        };
        let cells = match col.data_type() {
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
                ColumnCells::Text(cast_to(DataType::Utf8)?.as_string::<i32>().clone())
            }
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => {
                ColumnCells::Int(cast_to(DataType::Int64)?.as_primitive::<Int64Type>().clone())
            }
            DataType::Float16 | DataType::Float32 | DataType::Float64 => {
                let floats = cast_to(DataType::Float64)?;
                ColumnCells::Float(floats.as_primitive::<Float64Type>().clone())
            }
            DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
                ColumnCells::Date(cast_to(DataType::Date32)?.as_primitive::<Date32Type>().clone())
            }
            other => bail!("Column '{name}' has unsupported type {other:?}"),
        };
        Ok(cells)
    }

    fn cell(&self, row: usize) -> Cell<'_> {
        match self {
            ColumnCells::Text(arr) if arr.is_valid(row) => Cell::Text(arr.value(row)),
            ColumnCells::Int(arr) if arr.is_valid(row) => Cell::Int(arr.value(row)),
            ColumnCells::Float(arr) if arr.is_valid(row) => Cell::Float(arr.value(row)),
            ColumnCells::Date(arr) if arr.is_valid(row) => {
                arr.value_as_date(row).map(Cell::Date).unwrap_or(Cell::Null)
            }
            _ => Cell::Null,
        }
    }
}
