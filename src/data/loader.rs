use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use super::model::{SaleRecord, SalesDataset};

// ---------------------------------------------------------------------------
// Expected schema
// ---------------------------------------------------------------------------

const GENRE: &str = "Genre";
const PLATFORM: &str = "Platform";
const YEAR: &str = "Year";
const NA_SALES: &str = "NA_Sales";
const EU_SALES: &str = "EU_Sales";
const JP_SALES: &str = "JP_Sales";
const GLOBAL_SALES: &str = "Global_Sales";

/// The one real failure mode: a source file without the expected columns.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the vgsales column names
/// * `.json`    – records-oriented array (`df.to_json(orient='records')`)
/// * `.parquet` – flat columns matching the same schema
pub fn load_file(path: &Path) -> Result<SalesDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<SalesDataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// Parse CSV from any reader.  Header row must contain the expected columns;
/// extra columns (Rank, Name, Publisher, …) are ignored.
fn read_csv<R: std::io::Read>(input: R) -> Result<SalesDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let column = |name: &'static str| -> Result<usize, SchemaError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(SchemaError::MissingColumn(name))
    };
    let genre_idx = column(GENRE)?;
    let platform_idx = column(PLATFORM)?;
    let year_idx = column(YEAR)?;
    let na_idx = column(NA_SALES)?;
    let eu_idx = column(EU_SALES)?;
    let jp_idx = column(JP_SALES)?;
    let global_idx = column(GLOBAL_SALES)?;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        records.push(SaleRecord {
            genre: record.get(genre_idx).unwrap_or("").to_string(),
            platform: record.get(platform_idx).unwrap_or("").to_string(),
            year: parse_year(record.get(year_idx).unwrap_or("")),
            na_sales: parse_sales(record.get(na_idx).unwrap_or(""), row_no, NA_SALES)?,
            eu_sales: parse_sales(record.get(eu_idx).unwrap_or(""), row_no, EU_SALES)?,
            jp_sales: parse_sales(record.get(jp_idx).unwrap_or(""), row_no, JP_SALES)?,
            global_sales: parse_sales(record.get(global_idx).unwrap_or(""), row_no, GLOBAL_SALES)?,
        });
    }

    Ok(SalesDataset::from_records(records))
}

/// The vgsales CSV writes unknown years as `N/A`; some exports leave the cell
/// empty or format the year as a float (`2006.0`).
fn parse_year(s: &str) -> Option<i32> {
    let t = s.trim();
    if t.is_empty() || t.eq_ignore_ascii_case("n/a") {
        return None;
    }
    t.parse::<i32>()
        .ok()
        .or_else(|| t.parse::<f64>().ok().map(|y| y as i32))
}

fn parse_sales(s: &str, row: usize, col: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Genre": "Action",
///     "Platform": "PS4",
///     "Year": 2014,
///     "NA_Sales": 1.2,
///     "EU_Sales": 0.9,
///     "JP_Sales": 0.1,
///     "Global_Sales": 2.4
///   },
///   ...
/// ]
/// ```
#[derive(Debug, Deserialize)]
struct JsonRecord {
    #[serde(rename = "Genre")]
    genre: String,
    #[serde(rename = "Platform")]
    platform: String,
    #[serde(rename = "Year", default)]
    year: Option<f64>,
    #[serde(rename = "NA_Sales")]
    na_sales: f64,
    #[serde(rename = "EU_Sales")]
    eu_sales: f64,
    #[serde(rename = "JP_Sales")]
    jp_sales: f64,
    #[serde(rename = "Global_Sales")]
    global_sales: f64,
}

fn load_json(path: &Path) -> Result<SalesDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<SalesDataset> {
    let raw: Vec<JsonRecord> = serde_json::from_str(text).context("parsing JSON")?;

    let records = raw
        .into_iter()
        .map(|r| SaleRecord {
            genre: r.genre,
            platform: r.platform,
            year: r.year.map(|y| y as i32),
            na_sales: r.na_sales,
            eu_sales: r.eu_sales,
            jp_sales: r.jp_sales,
            global_sales: r.global_sales,
        })
        .collect();

    Ok(SalesDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat sales columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): strings may be Utf8 or LargeUtf8,
/// years Int32/Int64/Float64, sales Float32/Float64.
fn load_parquet(path: &Path) -> Result<SalesDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &'static str| -> Result<usize, SchemaError> {
            schema
                .index_of(name)
                .map_err(|_| SchemaError::MissingColumn(name))
        };
        let genre_col = batch.column(column(GENRE)?);
        let platform_col = batch.column(column(PLATFORM)?);
        let year_col = batch.column(column(YEAR)?);
        let na_col = batch.column(column(NA_SALES)?);
        let eu_col = batch.column(column(EU_SALES)?);
        let jp_col = batch.column(column(JP_SALES)?);
        let global_col = batch.column(column(GLOBAL_SALES)?);

        for row in 0..batch.num_rows() {
            records.push(SaleRecord {
                genre: string_value(genre_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{GENRE}'"))?,
                platform: string_value(platform_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{PLATFORM}'"))?,
                year: year_value(year_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{YEAR}'"))?,
                na_sales: f64_value(na_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{NA_SALES}'"))?,
                eu_sales: f64_value(eu_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{EU_SALES}'"))?,
                jp_sales: f64_value(jp_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{JP_SALES}'"))?,
                global_sales: f64_value(global_col, row)
                    .with_context(|| format!("Row {row}: failed to read '{GLOBAL_SALES}'"))?,
            });
        }
    }

    Ok(SalesDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn string_value(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in string column");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            Ok(arr.value(row).to_string())
        }
        other => bail!("Expected string column, got {other:?}"),
    }
}

fn f64_value(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in numeric column");
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            Ok(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            Ok(arr.value(row) as f64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            Ok(arr.value(row) as f64)
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            Ok(arr.value(row) as f64)
        }
        other => bail!("Expected numeric column, got {other:?}"),
    }
}

fn year_value(col: &Arc<dyn Array>, row: usize) -> Result<Option<i32>> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            Ok(Some(arr.value(row) as i32))
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            Ok(Some(arr.value(row)))
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            let v = arr.value(row);
            Ok(v.is_finite().then(|| v as i32))
        }
        other => bail!("Expected integer year column, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Rank,Name,Platform,Year,Genre,NA_Sales,EU_Sales,JP_Sales,Global_Sales
1,Wii Sports,Wii,2006,Sports,41.49,29.02,3.77,82.74
2,Super Mario Bros.,NES,1985,Platform,29.08,3.58,6.81,40.24
3,Dota Clone,PC,N/A,Strategy,0.01,0.02,0.0,0.03
";

    #[test]
    fn csv_parses_rows_and_ignores_extra_columns() {
        let ds = read_csv(CSV.as_bytes()).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0].genre, "Sports");
        assert_eq!(ds.records[0].platform, "Wii");
        assert_eq!(ds.records[0].year, Some(2006));
        assert_eq!(ds.records[0].global_sales, 82.74);
        assert_eq!(ds.genres.len(), 3);
        assert_eq!(ds.year_range, Some((1985, 2006)));
    }

    #[test]
    fn unknown_year_parses_as_none() {
        let ds = read_csv(CSV.as_bytes()).unwrap();
        assert_eq!(ds.records[2].year, None);
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let csv = "Genre,Platform,Year\nSports,Wii,2006\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("missing required column 'NA_Sales'"));
    }

    #[test]
    fn non_numeric_sales_cell_is_an_error() {
        let csv = "\
Genre,Platform,Year,NA_Sales,EU_Sales,JP_Sales,Global_Sales
Sports,Wii,2006,oops,1.0,1.0,2.0
";
        assert!(read_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn json_records_round_into_the_dataset() {
        let text = r#"[
            {"Genre":"Action","Platform":"PS4","Year":2014,"NA_Sales":1.2,"EU_Sales":0.9,"JP_Sales":0.1,"Global_Sales":2.4},
            {"Genre":"Puzzle","Platform":"DS","Year":null,"NA_Sales":0.3,"EU_Sales":0.2,"JP_Sales":0.5,"Global_Sales":1.0}
        ]"#;
        let ds = parse_json(text).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].year, Some(2014));
        assert_eq!(ds.records[1].year, None);
        assert_eq!(ds.records[1].jp_sales, 0.5);
    }
}
