use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::Dataset;
use crate::error::DataError;

// ---------------------------------------------------------------------------
// RawTable – what every format reader produces
// ---------------------------------------------------------------------------

/// An untyped table of cells as text. Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an event catalogue from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one event per line (the primary format)
/// * `.json`    – `[{ "magnitude": 5.1, "depth_km": 10, ... }, ...]`
/// * `.parquet` – flat columns, as written by `df.to_parquet()`
pub fn load_file(path: &Path) -> Result<Dataset, DataError> {
    let table = read_table(path).map_err(|e| DataError::load(path, &e))?;
    Dataset::from_table(path, table)
}

fn read_table(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)
        }
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read CSV text with a header row. Every row must have as many fields as the
/// header.
pub fn read_csv<R: Read>(source: R) -> Result<RawTable> {
    let mut reader = csv::Reader::from_reader(source);
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { columns, rows })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "datetime": "2020-01-05 23:59:00", "magnitude": 5.1, "depth_km": 10,
///     "latitude": 7.1, "longitude": 126.6, "region": "Davao Oriental" },
///   ...
/// ]
/// ```
///
/// Columns are the union of keys in first-seen order; a record lacking a key
/// gets an empty cell.
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(RawTable { columns, rows })
}

fn json_to_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Values are rendered with Arrow's display formatting, so timestamps come
/// out as ISO-8601 and floats keep their shortest round-trip form.
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    read_parquet(file, PARQUET_BATCH_SIZE)
}

/// Rows decoded per record batch.
const PARQUET_BATCH_SIZE: usize = 1024;

fn read_parquet(file: std::fs::File, batch_size: usize) -> Result<RawTable> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder
        .with_batch_size(batch_size)
        .build()
        .context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            // Row numbers count across batches, from the start of the file.
            let row_no = rows.len();
            let mut cells = Vec::with_capacity(batch.num_columns());
            for col in batch.columns() {
                if col.is_null(row) {
                    cells.push(String::new());
                    continue;
                }
                let cell = array_value_to_string(col.as_ref(), row)
                    .with_context(|| format!("Row {row_no}: formatting parquet value"))?;
                cells.push(cell);
            }
            rows.push(cells);
        }
    }

    Ok(RawTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::NamedTempFile;

    fn temp_with_suffix(suffix: &str, content: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(content).expect("Failed to write temp file");
        file.flush().unwrap();
        file
    }

    #[test]
    fn csv_keeps_header_order_and_quoted_cells() {
        let text = "region,magnitude,depth_km\n\"Sarangani, Davao Occidental\",4.2,33\n";
        let table = read_csv(text.as_bytes()).unwrap();
        assert_eq!(table.columns, vec!["region", "magnitude", "depth_km"]);
        assert_eq!(table.rows[0][0], "Sarangani, Davao Occidental");
    }

    #[test]
    fn csv_ragged_row_is_rejected() {
        let text = "magnitude,depth_km\n4.2,33\n5.0\n";
        assert!(read_csv(text.as_bytes()).is_err());
    }

    #[test]
    fn load_file_missing_path_is_load_error() {
        let err = load_file(Path::new("/nonexistent/quakes.csv")).unwrap_err();
        assert!(matches!(err, DataError::Load { .. }));
    }

    #[test]
    fn load_file_unknown_extension_is_load_error() {
        let file = temp_with_suffix(".xlsx", b"whatever");
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn load_file_csv_without_depth_is_schema_error() {
        let file = temp_with_suffix(".csv", b"magnitude,region\n4.0,Abra\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, DataError::Schema { column: "depth_km", .. }));
    }

    #[test]
    fn json_records_union_columns() {
        let json = br#"[
            {"magnitude": 4.5, "depth_km": 12, "region": "Surigao"},
            {"magnitude": 3.1, "depth_km": 7.5, "latitude": 9.8}
        ]"#;
        let file = temp_with_suffix(".json", json);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.columns, vec!["magnitude", "depth_km", "region", "latitude"]);
        assert_eq!(ds.events[0].region.as_deref(), Some("Surigao"));
        assert_eq!(ds.events[1].region, None);
        assert_eq!(ds.events[1].latitude, Some(9.8));
        assert_eq!(ds.events[1].depth_km, 7.5);
    }

    #[test]
    fn json_non_array_is_load_error() {
        let file = temp_with_suffix(".json", br#"{"magnitude": 1}"#);
        assert!(matches!(load_file(file.path()), Err(DataError::Load { .. })));
    }

    #[test]
    fn parquet_flat_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("magnitude", DataType::Float64, true),
            Field::new("depth_km", DataType::Float64, false),
            Field::new("region", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![Some(5.5), None])),
                Arc::new(Float64Array::from(vec![10.0, 22.5])),
                Arc::new(StringArray::from(vec![Some("Batangas"), None])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.as_file().try_clone().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.events[0].magnitude, 5.5);
        assert!(ds.events[1].magnitude.is_nan());
        assert_eq!(ds.events[1].depth_km, 22.5);
        assert_eq!(ds.events[0].region.as_deref(), Some("Batangas"));
        assert_eq!(ds.events[1].region, None);
    }

    #[test]
    fn parquet_rows_stay_in_order_across_batches() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("magnitude", DataType::Float64, false),
            Field::new("depth_km", DataType::Float64, false),
        ]));
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.as_file().try_clone().unwrap(), schema.clone(), None).unwrap();
        for chunk in [[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]] {
            let batch = RecordBatch::try_new(
                schema.clone(),
                vec![
                    Arc::new(Float64Array::from(chunk.to_vec())),
                    Arc::new(Float64Array::from(vec![10.0, 20.0])),
                ],
            )
            .unwrap();
            writer.write(&batch).unwrap();
        }
        writer.close().unwrap();

        let table = read_parquet(std::fs::File::open(file.path()).unwrap(), 2).unwrap();
        assert_eq!(table.columns, vec!["magnitude", "depth_km"]);
        let magnitudes: Vec<f64> = table.rows.iter().map(|r| r[0].parse().unwrap()).collect();
        assert_eq!(magnitudes, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
