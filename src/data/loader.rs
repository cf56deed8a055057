use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Date32Array, Date64Array, Float64Array, Int64Array,
};
use arrow::compute::cast;
use arrow::datatypes::{DataType, TimeUnit};
use arrow::datatypes::{
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType,
};
use chrono::{NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, RequiredColumns, SaleRecord, SalesTable};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Schema and data problems that make a dataset unusable.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),
    #[error("row {row}: '{value}' is not a valid date")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: '{value}' is not a valid non-negative sale amount")]
    InvalidAmount { row: usize, value: String },
    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least `Date, Category, Region, Total Sale`
/// * `.json`    – `[{ "Date": "...", "Category": "...", ... }, ...]`
/// * `.parquet` – same columns, `Date` as a date, timestamp or string column
pub fn load_file(path: &Path) -> Result<SalesTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} sales rows from {} with columns {:?}",
        table.len(),
        path.display(),
        table.columns
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Row assembly shared by every format
// ---------------------------------------------------------------------------

/// Turn a row of typed cells into a [`SaleRecord`], normalising the date
/// cell and validating the amount.
fn build_record(
    required: &RequiredColumns,
    mut cells: Vec<CellValue>,
    row: usize,
) -> Result<SaleRecord, LoadError> {
    let date = match &cells[required.date] {
        CellValue::Date(d) => *d,
        other => {
            let text = other.to_string();
            parse_date(&text).ok_or(LoadError::InvalidDate { row, value: text })?
        }
    };
    cells[required.date] = CellValue::Date(date);

    let total_sale = cells[required.total_sale]
        .as_f64()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| LoadError::InvalidAmount {
            row,
            value: cells[required.total_sale].to_string(),
        })?;

    Ok(SaleRecord {
        date,
        category: cells[required.category].to_field(),
        region: cells[required.region].to_field(),
        total_sale,
        cells,
    })
}

/// Parse the calendar formats found in exported sales sheets.
/// Any time-of-day part is dropped.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

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

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one sale per record.
fn load_csv(path: &Path) -> Result<SalesTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let required = RequiredColumns::locate(&columns).map_err(LoadError::MissingColumn)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells: Vec<CellValue> = (0..columns.len())
            .map(|i| CellValue::infer(record.get(i).unwrap_or("")))
            .collect();
        records.push(build_record(&required, cells, row_no)?);
    }

    Ok(SalesTable::new(columns, required, records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Date": "2024-01-01", "Category": "Electronics", "Region": "North", "Total Sale": 100.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<SalesTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut objects = Vec::with_capacity(rows.len());
    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in rows.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }
    let required = RequiredColumns::locate(&columns).map_err(LoadError::MissingColumn)?;

    let mut records = Vec::with_capacity(objects.len());
    for (row_no, obj) in objects.into_iter().enumerate() {
        let cells = columns
            .iter()
            .map(|col| obj.get(col).map_or(CellValue::Null, json_to_cell))
            .collect();
        records.push(build_record(&required, cells, row_no)?);
    }

    Ok(SalesTable::new(columns, required, records))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::infer(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of sales.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); `Date` may be stored as a date,
/// a timestamp or a string. Columns are cast to the handful of Arrow types
/// [`extract_cell`] reads, see [`cell_type`].
fn load_parquet(path: &Path) -> Result<SalesTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let schema = Arc::clone(builder.schema());
    let columns: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    let required = RequiredColumns::locate(&columns).map_err(LoadError::MissingColumn)?;
    let targets = schema
        .fields()
        .iter()
        .map(|f| {
            cell_type(f.data_type()).ok_or_else(|| LoadError::UnsupportedColumnType {
                column: f.name().clone(),
                data_type: f.data_type().to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let arrays = batch
            .columns()
            .iter()
            .zip(&targets)
            .map(|(col, target)| {
                if col.data_type() == target {
                    Ok(Arc::clone(col))
                } else {
                    cast(col, target)
                }
            })
            .collect::<Result<Vec<ArrayRef>, _>>()
            .context("casting parquet columns")?;
        for row in 0..batch.num_rows() {
            let cells = arrays.iter().map(|col| extract_cell(col, row)).collect();
            let row_no = records.len();
            records.push(build_record(&required, cells, row_no)?);
        }
    }

    Ok(SalesTable::new(columns, required, records))
}

/// The Arrow type a column is cast to before extraction, or `None` when no
/// [`CellValue`] can hold it.
fn cell_type(data_type: &DataType) -> Option<DataType> {
    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => Some(DataType::Utf8),
        // pandas categoricals
        DataType::Dictionary(_, values) => cell_type(values),
        DataType::Boolean
        | DataType::Date32
        | DataType::Date64
        | DataType::Timestamp(_, _)
        | DataType::Null => Some(data_type.clone()),
        DataType::Decimal128(_, _) | DataType::Decimal256(_, _) => Some(DataType::Float64),
        t if t.is_integer() => Some(DataType::Int64),
        t if t.is_floating() => Some(DataType::Float64),
        _ => None,
    }
}

/// Extract a single cell from a column already cast by [`cell_type`].
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let date = |d: Option<NaiveDate>| d.map_or(CellValue::Null, CellValue::Date);
    let datetime = |dt: Option<NaiveDateTime>| dt.map_or(CellValue::Null, |dt| CellValue::Date(dt.date()));

    match col.data_type() {
        // Text is typed the same way as a CSV field.
        DataType::Utf8 => CellValue::infer(col.as_string::<i32>().value(row)),
        DataType::Int64 => match col.as_any().downcast_ref::<Int64Array>() {
            Some(arr) => CellValue::Integer(arr.value(row)),
            None => CellValue::Null,
        },
        DataType::Float64 => match col.as_any().downcast_ref::<Float64Array>() {
            Some(arr) => CellValue::Float(arr.value(row)),
            None => CellValue::Null,
        },
        DataType::Boolean => match col.as_any().downcast_ref::<BooleanArray>() {
            Some(arr) => CellValue::Bool(arr.value(row)),
            None => CellValue::Null,
        },
        DataType::Date32 => date(
            col.as_any()
                .downcast_ref::<Date32Array>()
                .and_then(|arr| arr.value_as_date(row)),
        ),
        DataType::Date64 => date(
            col.as_any()
                .downcast_ref::<Date64Array>()
                .and_then(|arr| arr.value_as_date(row)),
        ),
        DataType::Timestamp(unit, _) => datetime(match unit {
            TimeUnit::Second => col.as_primitive::<TimestampSecondType>().value_as_datetime(row),
            TimeUnit::Millisecond => col
                .as_primitive::<TimestampMillisecondType>()
                .value_as_datetime(row),
            TimeUnit::Microsecond => col
                .as_primitive::<TimestampMicrosecondType>()
                .value_as_datetime(row),
            TimeUnit::Nanosecond => col
                .as_primitive::<TimestampNanosecondType>()
                .value_as_datetime(row),
        }),
        _ => CellValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::export::to_csv_bytes;
    use crate::data::model::fixtures::date;
    use arrow::array::StringArray;
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    fn write_parquet(dir: &tempfile::TempDir, batch: &RecordBatch) -> std::path::PathBuf {
        let path = dir.path().join("sales.parquet");
        let file = std::fs::File::create(&path).expect("create parquet");
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).expect("writer");
        writer.write(batch).expect("write batch");
        writer.close().expect("close writer");
        path
    }

    /// Export `table` to CSV and load it back.
    fn reload_export(dir: &tempfile::TempDir, table: &SalesTable) -> SalesTable {
        let bytes = to_csv_bytes(table).expect("encode");
        load_file(&write(dir, "export.csv", std::str::from_utf8(&bytes).expect("utf-8")))
            .expect("reload export")
    }

    #[test]
    fn loads_csv_with_extra_columns() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write(
            &dir,
            "sales.csv",
            "Order ID,Date,Category,Region,Total Sale,Customer\n\
             1,2024-01-01,Electronics,North,100,Asha\n\
             2,2024-01-02,Clothing,South,49.5,\"Rao, K.\"\n",
        );

        let table = load_file(&path).expect("load csv");
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns[5], "Customer");
        assert_eq!(table.required.date, 1);

        let first = &table.records[0];
        assert_eq!(first.date, date(2024, 1, 1));
        assert_eq!(first.category, "Electronics");
        assert_eq!(first.total_sale, 100.0);
        assert_eq!(first.cells[0], CellValue::Integer(1));
        assert_eq!(first.cells[1], CellValue::Date(date(2024, 1, 1)));
        assert_eq!(table.records[1].cells[5], CellValue::String("Rao, K.".into()));
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write(&dir, "sales.csv", "Date,Category,Total Sale\n2024-01-01,Toys,5\n");

        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::MissingColumn("Region"))
        ));
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(load_file(&dir.path().join("absent.csv")).is_err());
    }

    #[test]
    fn unparseable_date_reports_row() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write(
            &dir,
            "sales.csv",
            "Date,Category,Region,Total Sale\n2024-01-01,Toys,East,5\nyesterday,Toys,East,5\n",
        );

        let err = load_file(&path).unwrap_err();
        match err.downcast_ref::<LoadError>() {
            Some(LoadError::InvalidDate { row, value }) => {
                assert_eq!(*row, 1);
                assert_eq!(value, "yesterday");
            }
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }

    #[test]
    fn negative_amount_is_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write(&dir, "sales.csv", "Date,Category,Region,Total Sale\n2024-01-01,Toys,East,-5\n");

        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::InvalidAmount { row: 0, .. })
        ));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write(&dir, "sales.xlsx", "");

        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn loads_json_records() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write(
            &dir,
            "sales.json",
            r#"[
                {"Date": "2024-03-05 10:30:00", "Category": "Books", "Region": "West", "Total Sale": 12},
                {"Date": "2024-03-06", "Category": "Books", "Region": "East", "Total Sale": 8.25, "Note": "₹ promo"}
            ]"#,
        );

        let table = load_file(&path).expect("load json");
        assert_eq!(table.columns, vec!["Date", "Category", "Region", "Total Sale", "Note"]);
        assert_eq!(table.records[0].date, date(2024, 3, 5));
        assert_eq!(table.records[0].cells[4], CellValue::Null);
        assert_eq!(table.records[1].total_sale, 8.25);
        assert_eq!(table.records[1].cells[4], CellValue::String("₹ promo".into()));
    }

    #[test]
    fn json_text_cells_survive_export() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write(
            &dir,
            "sales.json",
            r#"[
                {"Date": "2024-01-01", "Category": "Toys", "Region": "East", "Total Sale": 5.5,
                 "Zip": "00123", "Note": "", "Shipped": "2024-01-03", "Paid": "true"}
            ]"#,
        );

        let table = load_file(&path).expect("load json");
        let cells = &table.records[0].cells;
        assert_eq!(cells[4], CellValue::Integer(123));
        assert_eq!(cells[5], CellValue::Null);
        assert_eq!(cells[6], CellValue::Date(date(2024, 1, 3)));
        assert_eq!(cells[7], CellValue::Bool(true));
        assert_eq!(reload_export(&dir, &table), table);
    }

    #[test]
    fn loads_parquet_with_date32_column() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Date", DataType::Date32, false),
            Field::new("Category", DataType::Utf8, false),
            Field::new("Region", DataType::Utf8, false),
            Field::new("Total Sale", DataType::Float64, false),
        ]));
        // 19723 days after the epoch is 2024-01-01.
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Date32Array::from(vec![19723, 19724])),
                Arc::new(StringArray::from(vec!["Electronics", "Clothing"])),
                Arc::new(StringArray::from(vec!["North", "South"])),
                Arc::new(Float64Array::from(vec![100.0, 50.0])),
            ],
        )
        .expect("record batch");

        let dir = tempfile::tempdir().expect("temp dir");
        let table = load_file(&write_parquet(&dir, &batch)).expect("load parquet");
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].date, date(2024, 1, 1));
        assert_eq!(table.records[1].region, "South");
        assert_eq!(table.records[1].total_sale, 50.0);
    }

    #[test]
    fn parquet_columns_are_cast_to_cell_types() {
        use arrow::array::{Decimal128Array, DictionaryArray, Int16Array, UInt32Array};
        use arrow::datatypes::Int8Type;

        let category: DictionaryArray<Int8Type> = vec!["Electronics", "Clothing"].into_iter().collect();
        let price = Decimal128Array::from(vec![12350_i128, 500])
            .with_precision_and_scale(10, 2)
            .expect("decimal");
        let schema = Arc::new(Schema::new(vec![
            Field::new("Date", DataType::Utf8, false),
            Field::new("Category", category.data_type().clone(), false),
            Field::new("Region", DataType::Utf8, false),
            Field::new("Total Sale", DataType::UInt32, false),
            Field::new("Quantity", DataType::Int16, false),
            Field::new("Unit Price", DataType::Decimal128(10, 2), false),
            Field::new("Zip", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["2024-01-01", "2024-01-02"])),
                Arc::new(category),
                Arc::new(StringArray::from(vec!["North", "South"])),
                Arc::new(UInt32Array::from(vec![100, 50])),
                Arc::new(Int16Array::from(vec![3, 1])),
                Arc::new(price),
                Arc::new(StringArray::from(vec!["00123", "560001"])),
            ],
        )
        .expect("record batch");

        let dir = tempfile::tempdir().expect("temp dir");
        let table = load_file(&write_parquet(&dir, &batch)).expect("load parquet");
        let first = &table.records[0];
        assert_eq!(first.date, date(2024, 1, 1));
        assert_eq!(first.category, "Electronics");
        assert_eq!(table.records[1].category, "Clothing");
        assert_eq!(first.total_sale, 100.0);
        assert_eq!(
            first.cells[3..],
            [
                CellValue::Integer(100),
                CellValue::Integer(3),
                CellValue::Float(123.5),
                CellValue::Integer(123),
            ]
        );
        assert_eq!(reload_export(&dir, &table), table);
    }

    #[test]
    fn unreadable_parquet_column_is_rejected() {
        use arrow::array::BinaryArray;

        let schema = Arc::new(Schema::new(vec![
            Field::new("Date", DataType::Date32, false),
            Field::new("Category", DataType::Utf8, false),
            Field::new("Region", DataType::Utf8, false),
            Field::new("Total Sale", DataType::Float64, false),
            Field::new("Receipt", DataType::Binary, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Date32Array::from(vec![19723])),
                Arc::new(StringArray::from(vec!["Books"])),
                Arc::new(StringArray::from(vec!["West"])),
                Arc::new(Float64Array::from(vec![12.0])),
                Arc::new(BinaryArray::from(vec![&b"\x00\x01"[..]])),
            ],
        )
        .expect("record batch");

        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_file(&write_parquet(&dir, &batch)).unwrap_err();
        match err.downcast_ref::<LoadError>() {
            Some(LoadError::UnsupportedColumnType { column, .. }) => assert_eq!(column, "Receipt"),
            other => panic!("expected UnsupportedColumnType, got {other:?}"),
        }
    }

    #[test]
    fn bundled_sample_data_matches_generator() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/ecommerce_sales_data.csv");
        let table = load_file(&path).expect("load sample data");
        assert_eq!(table.len(), 1000);
        assert_eq!(table.columns.len(), 8);

        let first = &table.records[0];
        assert_eq!(first.cells[0], CellValue::Integer(1));
        assert_eq!(first.date, date(2024, 2, 23));
        assert_eq!(first.category, "Electronics");
        assert_eq!(first.region, "East");
        assert_eq!(first.total_sale, 10609.36);
        assert!(table
            .records
            .iter()
            .all(|r| (date(2024, 1, 1)..=date(2024, 3, 30)).contains(&r.date)));
    }

    #[test]
    fn parse_date_accepts_common_layouts() {
        let expected = Some(date(2024, 2, 29));
        assert_eq!(parse_date("2024-02-29"), expected);
        assert_eq!(parse_date("2024/02/29"), expected);
        assert_eq!(parse_date("02/29/2024"), expected);
        assert_eq!(parse_date("2024-02-29T23:59:59"), expected);
        assert_eq!(parse_date("2023-02-29"), None);
    }
}
