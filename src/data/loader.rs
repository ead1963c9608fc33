use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{Column, SalaryDataset, SalaryRecord};
use crate::config::DataSource;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// A loaded dataset plus the number of rows that could not be parsed.
#[derive(Debug)]
pub struct LoadReport {
    pub dataset: SalaryDataset,
    pub dropped_rows: usize,
}

impl LoadReport {
    fn new(records: Vec<SalaryRecord>, dropped_rows: usize) -> Self {
        if dropped_rows > 0 {
            log::warn!("Dropped {dropped_rows} malformed rows");
        }
        LoadReport {
            dataset: SalaryDataset::from_records(records),
            dropped_rows,
        }
    }
}

/// Supported payload formats, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
    Parquet,
}

impl DataFormat {
    /// Detect the format of a path or URL. Query strings and fragments are
    /// ignored; a location without an extension is read as CSV.
    pub fn detect(location: &str) -> Result<Self, LoadError> {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "" | "csv" => Ok(DataFormat::Csv),
            "json" => Ok(DataFormat::Json),
            "parquet" | "pq" => Ok(DataFormat::Parquet),
            _ => Err(LoadError::UnsupportedFormat(location.to_string())),
        }
    }
}

/// Load the dataset from its configured source. Performs at most one network
/// request and never retries.
pub fn load(source: &DataSource, timeout: Duration) -> Result<LoadReport, LoadError> {
    let report = match source {
        DataSource::Url(url) => fetch_url(url, timeout)?,
        DataSource::File(path) => load_file(path)?,
    };
    log::info!(
        "Loaded {} salary records from {source} ({} dropped)",
        report.dataset.len(),
        report.dropped_rows
    );
    Ok(report)
}

/// Fetch and parse a remote dataset.
pub fn fetch_url(url: &str, timeout: Duration) -> Result<LoadReport, LoadError> {
    let format = DataFormat::detect(url)?;
    let network = |source| LoadError::Network {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(network)?;
    log::debug!("GET {url}");
    let body = client
        .get(url)
        .send()
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.bytes())
        .map_err(network)?;

    match format {
        DataFormat::Csv => parse_csv(&body[..]),
        DataFormat::Json => parse_json(&body[..]),
        DataFormat::Parquet => parse_parquet(body),
    }
}

/// Parse a local dataset file, dispatching by extension.
pub fn load_file(path: &Path) -> Result<LoadReport, LoadError> {
    let format = DataFormat::detect(&path.to_string_lossy())?;
    let io = |source| LoadError::Io {
        path: path.display().to_string(),
        source,
    };

    match format {
        DataFormat::Csv => parse_csv(std::fs::File::open(path).map_err(io)?),
        DataFormat::Json => parse_json(&std::fs::read(path).map_err(io)?),
        DataFormat::Parquet => parse_parquet(std::fs::File::open(path).map_err(io)?),
    }
}

// ---------------------------------------------------------------------------
// Row validation
// ---------------------------------------------------------------------------

/// One row as published, before validation. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "ano")]
    year: f64,
    #[serde(rename = "senioridade")]
    seniority: String,
    #[serde(rename = "contrato")]
    contract_type: String,
    #[serde(rename = "tamanho_empresa")]
    company_size: String,
    #[serde(rename = "cargo")]
    role_title: String,
    #[serde(rename = "remoto")]
    remote_type: String,
    #[serde(rename = "residencia_iso3")]
    residence_country_code: String,
    #[serde(rename = "usd")]
    salary_usd: f64,
}

impl RawRecord {
    /// `None` for a non-integral year or a negative / non-finite salary.
    fn validate(self) -> Option<SalaryRecord> {
        if !self.year.is_finite() || self.year.fract() != 0.0 {
            return None;
        }
        if !self.salary_usd.is_finite() || self.salary_usd < 0.0 {
            return None;
        }
        Some(SalaryRecord {
            year: self.year as i64,
            seniority: self.seniority,
            contract_type: self.contract_type,
            company_size: self.company_size,
            role_title: self.role_title,
            remote_type: self.remote_type,
            residence_country_code: self.residence_country_code,
            salary_usd: self.salary_usd,
        })
    }
}

fn require_columns(headers: &[&str]) -> Result<(), LoadError> {
    for column in Column::ALL {
        if !headers.contains(&column.header()) {
            return Err(LoadError::MissingColumn(column.header()));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Header row naming the columns; rows that fail to deserialize or validate
/// are dropped and counted.
pub fn parse_csv<R: Read>(reader: R) -> Result<LoadReport, LoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    require_columns(&headers.iter().map(String::as_str).collect::<Vec<_>>())?;

    let mut records = Vec::new();
    let mut dropped = 0;
    for (row_no, result) in reader.deserialize::<RawRecord>().enumerate() {
        match result.map(RawRecord::validate) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {
                log::debug!("CSV row {row_no}: invalid values");
                dropped += 1;
            }
            Err(e) => {
                log::debug!("CSV row {row_no}: {e}");
                dropped += 1;
            }
        }
    }

    Ok(LoadReport::new(records, dropped))
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "ano": 2024, "senioridade": "senior", "cargo": "Data Engineer", "usd": 150000, ... },
///   ...
/// ]
/// ```
pub fn parse_json(bytes: &[u8]) -> Result<LoadReport, LoadError> {
    let rows: Vec<JsonValue> = serde_json::from_slice(bytes)?;

    if let Some(first) = rows.first().and_then(JsonValue::as_object) {
        require_columns(&first.keys().map(String::as_str).collect::<Vec<_>>())?;
    }

    let mut records = Vec::with_capacity(rows.len());
    let mut dropped = 0;
    for (row_no, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<RawRecord>(row).map(RawRecord::validate) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => dropped += 1,
            Err(e) => {
                log::debug!("JSON row {row_no}: {e}");
                dropped += 1;
            }
        }
    }

    Ok(LoadReport::new(records, dropped))
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Parquet file with one column per attribute. Works with files written by
/// both Pandas and Polars: strings may be Utf8 or LargeUtf8, numbers any of
/// Int32/Int64/Float32/Float64.
pub fn parse_parquet<T: ChunkReader + 'static>(input: T) -> Result<LoadReport, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(input)?;

    // Resolve columns from the file schema so a file without row groups
    // still fails on a missing column.
    let mut indices = Vec::with_capacity(Column::ALL.len());
    for column in Column::ALL {
        let idx = builder
            .schema()
            .index_of(column.header())
            .map_err(|_| LoadError::MissingColumn(column.header()))?;
        indices.push(idx);
    }

    let mut records = Vec::new();
    let mut dropped = 0;

    for batch in builder.build()? {
        let batch = batch.map_err(|e| LoadError::Parquet(e.into()))?;
        let columns: Vec<_> = indices.iter().map(|&idx| batch.column(idx)).collect();

        for row in 0..batch.num_rows() {
            match raw_from_arrow(&columns, row).and_then(RawRecord::validate) {
                Some(record) => records.push(record),
                None => dropped += 1,
            }
        }
    }

    Ok(LoadReport::new(records, dropped))
}

/// `columns` follows `Column::ALL` order.
fn raw_from_arrow(columns: &[&Arc<dyn Array>], row: usize) -> Option<RawRecord> {
    Some(RawRecord {
        year: number_at(columns[0], row)?,
        seniority: text_at(columns[1], row)?,
        contract_type: text_at(columns[2], row)?,
        company_size: text_at(columns[3], row)?,
        role_title: text_at(columns[4], row)?,
        remote_type: text_at(columns[5], row)?,
        residence_country_code: text_at(columns[6], row)?,
        salary_usd: number_at(columns[7], row)?,
    })
}

fn text_at(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|s| s.value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => None,
    }
}

fn number_at(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use arrow::array::ArrayRef;
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    const SAMPLE: &str = "\
ano,senioridade,contrato,tamanho_empresa,cargo,remoto,residencia_iso3,usd,moeda
2024,senior,integral,media,Data Engineer,remoto,USA,150000,USD
2023,junior,integral,grande,Data Analyst,presencial,BRA,30000.5,BRL
2024,pleno,freelancer,pequena,Data Scientist,hibrido,DEU,90000,EUR
";

    #[test]
    fn parses_csv_with_extra_columns() {
        let report = parse_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(report.dropped_rows, 0);
        let ds = report.dataset;
        assert_eq!(ds.len(), 3);
        let first = &ds.records()[0];
        assert_eq!(first.year, 2024);
        assert_eq!(first.role_title, "Data Engineer");
        assert_eq!(first.residence_country_code, "USA");
        assert_eq!(ds.records()[1].salary_usd, 30000.5);
        assert!(ds
            .unique_values(Column::ContractType)
            .contains(&CellValue::from("freelancer")));
    }

    #[test]
    fn malformed_rows_are_dropped_and_counted() {
        let csv = "\
ano,senioridade,contrato,tamanho_empresa,cargo,remoto,residencia_iso3,usd
2024,senior,integral,media,Data Engineer,remoto,USA,not-a-number
2024.5,senior,integral,media,Data Engineer,remoto,USA,100
2024,senior,integral,media,Data Engineer,remoto,USA,-5
2024,senior,integral,media,Data Engineer,remoto,USA,100
2025.0,senior,integral,media,Data Engineer,remoto,USA,200
";
        let report = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(report.dropped_rows, 3);
        assert_eq!(report.dataset.len(), 2);
        assert_eq!(report.dataset.records()[1].year, 2025);
    }

    #[test]
    fn missing_column_is_a_load_error() {
        let csv = "ano,senioridade,contrato,tamanho_empresa,cargo,remoto,usd\n";
        assert!(matches!(
            parse_csv(csv.as_bytes()),
            Err(LoadError::MissingColumn("residencia_iso3"))
        ));
    }

    #[test]
    fn parses_records_json() {
        let json = br#"[
            {"ano": 2024, "senioridade": "senior", "contrato": "integral", "tamanho_empresa": "media",
             "cargo": "Data Engineer", "remoto": "remoto", "residencia_iso3": "USA", "usd": 120000},
            {"ano": 2024, "senioridade": "senior", "contrato": "integral", "tamanho_empresa": "media",
             "cargo": "Data Engineer", "remoto": "remoto", "residencia_iso3": "USA", "usd": null}
        ]"#;
        let report = parse_json(json).unwrap();
        assert_eq!(report.dataset.len(), 1);
        assert_eq!(report.dropped_rows, 1);
        assert_eq!(report.dataset.records()[0].salary_usd, 120000.0);
    }

    #[test]
    fn json_must_be_an_array() {
        assert!(matches!(parse_json(b"{}"), Err(LoadError::Json(_))));
    }

    #[test]
    fn format_detection() {
        assert_eq!(
            DataFormat::detect("https://example.org/data/salaries.csv").unwrap(),
            DataFormat::Csv
        );
        assert_eq!(
            DataFormat::detect("https://example.org/s.PARQUET?token=1").unwrap(),
            DataFormat::Parquet
        );
        assert_eq!(DataFormat::detect("local/rows.json").unwrap(), DataFormat::Json);
        assert_eq!(
            DataFormat::detect("https://example.org/api/salaries?download=1").unwrap(),
            DataFormat::Csv
        );
        assert!(matches!(
            DataFormat::detect("https://example.org/data/notes.txt"),
            Err(LoadError::UnsupportedFormat(_))
        ));
    }

    fn write_parquet(name: &str, columns: Vec<(&str, ArrayRef)>) -> std::path::PathBuf {
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("salary_dashboard_{stamp}_{name}"));
        let batch = RecordBatch::try_from_iter(columns).expect("build batch");
        let file = std::fs::File::create(&path).expect("create parquet file");
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).expect("parquet writer");
        if batch.num_rows() > 0 {
            writer.write(&batch).expect("write batch");
        }
        writer.close().expect("close parquet writer");
        path
    }

    fn salary_columns(rows: usize) -> Vec<(&'static str, ArrayRef)> {
        let text = |v: &str| -> ArrayRef { Arc::new(StringArray::from(vec![v; rows])) };
        vec![
            ("ano", Arc::new(Int64Array::from(vec![2024; rows])) as ArrayRef),
            ("senioridade", text("senior")),
            ("contrato", text("integral")),
            ("tamanho_empresa", text("media")),
            ("cargo", text("Data Engineer")),
            ("remoto", text("remoto")),
            ("residencia_iso3", text("USA")),
            ("usd", Arc::new(Float64Array::from(vec![1000.0; rows])) as ArrayRef),
        ]
    }

    #[test]
    fn parses_parquet_file() {
        let path = write_parquet("ok.parquet", salary_columns(3));
        let report = load_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(report.dataset.len(), 3);
        assert_eq!(report.dropped_rows, 0);
        assert_eq!(report.dataset.records()[0].year, 2024);
        assert_eq!(report.dataset.records()[2].salary_usd, 1000.0);
    }

    #[test]
    fn parquet_without_rows_still_checks_columns() {
        let columns = salary_columns(0)
            .into_iter()
            .filter(|(name, _)| *name != "usd")
            .collect();
        let path = write_parquet("empty.parquet", columns);
        let result = load_file(&path);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(LoadError::MissingColumn("usd"))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_file(Path::new("/nonexistent/salaries.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
