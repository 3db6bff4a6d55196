use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{
    LaunchDataset, LaunchRecord, LoadError, Outcome, COL_BOOSTER_CATEGORY, COL_CLASS,
    COL_LAUNCH_SITE, COL_PAYLOAD_MASS, REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one launch per line (the dashboard default)
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – flat columns named like the CSV headers
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    };
    dataset.with_context(|| format!("loading launch records from {}", path.display()))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// Parse CSV launch records from any reader.
/// Columns beyond [`REQUIRED_COLUMNS`] are ignored.
pub fn read_csv<R: Read>(input: R) -> Result<LaunchDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let [site_idx, payload_idx, class_idx, booster_idx] = column_indices(&headers)?;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        records.push(LaunchRecord {
            launch_site: cell(site_idx).to_string(),
            payload_mass_kg: parse_payload(cell(payload_idx), row_no)?,
            outcome: parse_outcome(cell(class_idx), row_no)?,
            booster_category: cell(booster_idx).to_string(),
        });
    }

    Ok(LaunchDataset::from_records(records)?)
}

/// Positions of the required columns, in [`REQUIRED_COLUMNS`] order.
fn column_indices(headers: &[String]) -> Result<[usize; 4], LoadError> {
    let mut indices = [0usize; 4];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))?;
    }
    Ok(indices)
}

fn parse_payload(s: &str, row: usize) -> Result<f64, LoadError> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LoadError::InvalidValue {
            row,
            column: COL_PAYLOAD_MASS.to_string(),
            value: s.to_string(),
        })
}

fn parse_outcome(s: &str, row: usize) -> Result<Outcome, LoadError> {
    Outcome::parse(s).ok_or_else(|| LoadError::InvalidClass {
        row,
        value: s.to_string(),
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<LaunchDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 525.0,
///     "class": 0,
///     "Booster Version Category": "v1.0"
///   },
///   ...
/// ]
/// ```
pub fn parse_json(text: &str) -> Result<LaunchDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let rows = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let payload = json_field(obj, COL_PAYLOAD_MASS)?;
        let payload_mass_kg = match payload {
            JsonValue::Number(n) => n.as_f64().ok_or_else(|| invalid(i, COL_PAYLOAD_MASS, payload))?,
            JsonValue::String(s) => parse_payload(s, i)?,
            other => return Err(invalid(i, COL_PAYLOAD_MASS, other).into()),
        };

        let class = json_field(obj, COL_CLASS)?;
        let outcome = match class {
            JsonValue::Number(n) => n.as_f64().and_then(Outcome::from_class),
            JsonValue::String(s) => Outcome::parse(s),
            _ => None,
        }
        .ok_or_else(|| LoadError::InvalidClass {
            row: i,
            value: class.to_string(),
        })?;

        records.push(LaunchRecord {
            launch_site: json_text(obj, COL_LAUNCH_SITE, i)?,
            payload_mass_kg,
            outcome,
            booster_category: json_text(obj, COL_BOOSTER_CATEGORY, i)?,
        });
    }

    Ok(LaunchDataset::from_records(records)?)
}

fn json_field<'a>(obj: &'a Map<String, JsonValue>, column: &str) -> Result<&'a JsonValue, LoadError> {
    obj.get(column)
        .ok_or_else(|| LoadError::MissingColumn(column.to_string()))
}

fn json_text(obj: &Map<String, JsonValue>, column: &str, row: usize) -> Result<String, LoadError> {
    match json_field(obj, column)? {
        JsonValue::String(s) => Ok(s.clone()),
        other => Err(invalid(row, column, other)),
    }
}

fn invalid(row: usize, column: &str, value: &JsonValue) -> LoadError {
    LoadError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the launch table.
///
/// Expected schema:
/// - `Launch Site`, `Booster Version Category`: Utf8 / LargeUtf8
/// - `Payload Mass (kg)`: Float64, Float32, Int64 or Int32
/// - `class`: any of the numeric types above, holding 0 or 1
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut columns = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for name in REQUIRED_COLUMNS {
            let idx = schema
                .index_of(name)
                .map_err(|_| LoadError::MissingColumn(name.to_string()))?;
            columns.push(batch.column(idx));
        }
        let (site_col, payload_col, class_col, booster_col) =
            (columns[0], columns[1], columns[2], columns[3]);

        for i in 0..batch.num_rows() {
            let row = records.len();

            let payload_mass_kg = numeric_value(payload_col, i)
                .filter(|v| v.is_finite())
                .ok_or_else(|| LoadError::InvalidValue {
                    row,
                    column: COL_PAYLOAD_MASS.to_string(),
                    value: cell_debug(payload_col, i),
                })?;

            let outcome = numeric_value(class_col, i)
                .and_then(Outcome::from_class)
                .ok_or_else(|| LoadError::InvalidClass {
                    row,
                    value: cell_debug(class_col, i),
                })?;

            records.push(LaunchRecord {
                launch_site: string_value(site_col, i, COL_LAUNCH_SITE, row)?,
                payload_mass_kg,
                outcome,
                booster_category: string_value(booster_col, i, COL_BOOSTER_CATEGORY, row)?,
            });
        }
    }

    Ok(LaunchDataset::from_records(records)?)
}

// -- Parquet / Arrow helpers --

/// Read a numeric cell as `f64`; `None` for nulls and non-numeric columns.
fn numeric_value(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        _ => None,
    }
}

fn string_value(col: &Arc<dyn Array>, i: usize, column: &str, row: usize) -> Result<String, LoadError> {
    if !col.is_null(i) {
        match col.data_type() {
            DataType::Utf8 => {
                if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                    return Ok(s.value(i).to_string());
                }
            }
            DataType::LargeUtf8 => return Ok(col.as_string::<i64>().value(i).to_string()),
            _ => {}
        }
    }
    Err(LoadError::InvalidValue {
        row,
        column: column.to_string(),
        value: cell_debug(col, i),
    })
}

fn cell_debug(col: &Arc<dyn Array>, row: usize) -> String {
    if col.is_null(row) {
        "<null>".to_string()
    } else {
        format!("<{:?}>", col.data_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    const CSV: &str = "\
Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category
1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0
2,CCAFS LC-40,0,525.0,F9 v1.0  B0004,v1.0
3,VAFB SLC-4E,1,9600.0,F9 FT B1029.1,FT
4,KSC LC-39A,1,2490.0,F9 FT B1031.1,FT
";

    fn downcast(err: &anyhow::Error) -> Option<&LoadError> {
        err.chain().find_map(|e| e.downcast_ref::<LoadError>())
    }

    #[test]
    fn csv_loads_records_and_summary() {
        let ds = read_csv(CSV.as_bytes()).unwrap();

        assert_eq!(ds.len(), 4);
        assert_eq!(ds.sites, vec!["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A"]);
        assert_eq!(ds.min_payload, 0.0);
        assert_eq!(ds.max_payload, 9600.0);
        assert_eq!(ds.records[2].outcome, Outcome::Success);
        assert_eq!(ds.records[2].booster_category, "FT");
    }

    #[test]
    fn csv_missing_column_is_schema_error() {
        let csv = "Launch Site,class,Booster Version Category\nA,1,FT\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(
            downcast(&err),
            Some(&LoadError::MissingColumn(COL_PAYLOAD_MASS.to_string()))
        );
    }

    #[test]
    fn csv_bad_class_names_the_row() {
        let csv = "Launch Site,class,Payload Mass (kg),Booster Version Category\nA,1,10,FT\nA,3,20,FT\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(
            downcast(&err),
            Some(&LoadError::InvalidClass {
                row: 1,
                value: "3".to_string()
            })
        );
    }

    #[test]
    fn csv_bad_payload_is_rejected() {
        let csv = "Launch Site,class,Payload Mass (kg),Booster Version Category\nA,1,heavy,FT\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            downcast(&err),
            Some(LoadError::InvalidValue { row: 0, .. })
        ));
    }

    #[test]
    fn csv_header_only_is_empty_error() {
        let csv = "Launch Site,class,Payload Mass (kg),Booster Version Category\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(downcast(&err), Some(&LoadError::Empty));
    }

    #[test]
    fn json_records_load() {
        let json = r#"[
            {"Launch Site": "A", "Payload Mass (kg)": 500, "class": 1, "Booster Version Category": "FT"},
            {"Launch Site": "B", "Payload Mass (kg)": 1200.5, "class": 0.0, "Booster Version Category": "B4"}
        ]"#;
        let ds = parse_json(json).unwrap();

        assert_eq!(ds.sites, vec!["A", "B"]);
        assert_eq!(ds.max_payload, 1200.5);
        assert_eq!(ds.records[1].outcome, Outcome::Failure);
    }

    #[test]
    fn json_missing_field_is_schema_error() {
        let json = r#"[{"Launch Site": "A", "class": 1, "Booster Version Category": "FT"}]"#;
        let err = parse_json(json).unwrap_err();
        assert_eq!(
            downcast(&err),
            Some(&LoadError::MissingColumn(COL_PAYLOAD_MASS.to_string()))
        );
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("launches.xlsx")).unwrap_err();
        assert_eq!(
            downcast(&err),
            Some(&LoadError::UnsupportedExtension("xlsx".to_string()))
        );
    }

    #[test]
    fn missing_file_fails() {
        assert!(load_file(Path::new("definitely/not/here.csv")).is_err());
    }

    #[test]
    fn parquet_round_trip_through_file() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_LAUNCH_SITE, DataType::Utf8, false),
            Field::new(COL_CLASS, DataType::Int64, false),
            Field::new(COL_PAYLOAD_MASS, DataType::Float64, false),
            Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "B", "A"])),
                Arc::new(Int64Array::from(vec![1, 0, 1])),
                Arc::new(Float64Array::from(vec![100.0, 2000.0, 3500.0])),
                Arc::new(StringArray::from(vec!["FT", "v1.1", "FT"])),
            ],
        )
        .unwrap();

        let path = std::env::temp_dir().join(format!(
            "launch-dash-loader-{}.parquet",
            std::process::id()
        ));
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.sites, vec!["A", "B"]);
        assert_eq!(ds.booster_categories, vec!["FT", "v1.1"]);
        assert_eq!(ds.min_payload, 100.0);
        assert_eq!(ds.max_payload, 3500.0);
        assert_eq!(ds.records[1].outcome, Outcome::Failure);
    }
}
