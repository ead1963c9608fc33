use thiserror::Error;

use super::model::Column;

/// Failure to obtain the dataset at startup. Fatal: there is no dashboard
/// without data.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("unsupported dataset format: {0}")]
    UnsupportedFormat(String),
}

/// Reference to a column the schema cannot serve. Signals a programming
/// defect rather than a data condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' is not numeric")]
    NotNumeric(Column),

    #[error("column '{0}' is not filterable")]
    NotFilterable(Column),
}
