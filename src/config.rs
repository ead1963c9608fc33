use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Published salary dataset.
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/vqrca/dashboard_salarios_dados/refs/heads/main/dados-imersao-final.csv";

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => f.write_str(url),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Engine settings for one dashboard session.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: DataSource,
    /// Applies to the whole dataset request.
    pub request_timeout: Duration,
    /// Rows in the "top roles" ranking.
    pub top_n: usize,
    pub histogram_buckets: usize,
    /// Role used by the per-country chart and the mean/median indicator.
    pub focus_role: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Url(DEFAULT_DATASET_URL.to_string()),
            request_timeout: Duration::from_secs(30),
            top_n: 10,
            histogram_buckets: 30,
            focus_role: "Data Scientist".to_string(),
        }
    }
}
