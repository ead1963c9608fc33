//! Salary dashboard engine: loads the salary dataset and derives the
//! filtered rows, KPIs and chart aggregates the UI renders.

pub mod config;
pub mod dashboard;
pub mod data;
pub mod state;

pub use config::{DashboardConfig, DataSource};
pub use dashboard::Dashboard;
pub use state::AppState;
