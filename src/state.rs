use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::data::filter::FilterSelection;
use crate::data::model::{CellValue, Column, SalaryDataset};
use crate::data::SchemaError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// `dashboard` is recomputed by every mutating method, so it always reflects
/// the current `filters`.
pub struct AppState {
    dataset: SalaryDataset,
    config: DashboardConfig,
    filters: FilterSelection,
    dashboard: Dashboard,
    /// Error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Take ownership of a loaded dataset with every filter value selected.
    pub fn new(dataset: SalaryDataset, config: DashboardConfig) -> Result<Self, SchemaError> {
        let filters = FilterSelection::all(&dataset);
        let dashboard = Dashboard::compute(&dataset, &filters, &config)?;
        Ok(Self {
            dataset,
            config,
            filters,
            dashboard,
            status_message: None,
        })
    }

    pub fn dataset(&self) -> &SalaryDataset {
        &self.dataset
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Recompute the dashboard after a filter change.
    pub fn refresh(&mut self) -> Result<(), SchemaError> {
        self.dashboard = Dashboard::compute(&self.dataset, &self.filters, &self.config)?;
        Ok(())
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: Column, value: &CellValue) -> Result<(), SchemaError> {
        self.filters.toggle(&self.dataset, column, value)?;
        self.refresh()
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: Column) -> Result<(), SchemaError> {
        self.filters.select_all(&self.dataset, column)?;
        self.refresh()
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: Column) -> Result<(), SchemaError> {
        self.filters.select_none(column)?;
        self.refresh()
    }

    /// Restore the default selection (everything).
    pub fn reset_filters(&mut self) -> Result<(), SchemaError> {
        self.filters = FilterSelection::all(&self.dataset);
        self.refresh()
    }
}
