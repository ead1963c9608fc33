use std::collections::BTreeMap;

use crate::config::DashboardConfig;
use crate::data::aggregate::{
    compute_kpis, group_mean_by_key, histogram_buckets, mean_vs_median, proportions,
    top_n_by_mean, value_counts, GroupMean, HistogramBucket, Kpis, MeanMedian, SortOrder,
};
use crate::data::filter::{apply_filters, FilterSelection, FilteredView};
use crate::data::model::{CellValue, Column, SalaryDataset, SalaryRecord};
use crate::data::SchemaError;

/// Everything the renderer draws for one filter selection.
///
/// Empty collections and `None` mean "no data" for that element; the renderer
/// shows a notice instead of a chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dashboard {
    /// Dataset indices of the filtered rows, in dataset order.
    pub rows: Vec<usize>,
    pub kpis: Kpis,
    /// Ascending by mean, ready for a horizontal bar chart.
    pub top_roles: Vec<GroupMean>,
    pub salary_histogram: Vec<HistogramBucket>,
    /// Remote-type shares, most frequent first.
    pub remote_split: Vec<(CellValue, f64)>,
    /// Mean salary of the focus role per residence country.
    pub focus_country_means: BTreeMap<CellValue, f64>,
    pub focus_indicator: Option<MeanMedian>,
}

impl Dashboard {
    /// Recompute every derived output from scratch.
    pub fn compute(
        dataset: &SalaryDataset,
        selection: &FilterSelection,
        config: &DashboardConfig,
    ) -> Result<Self, SchemaError> {
        let view = apply_filters(dataset, selection);
        Self::from_view(view, config)
    }

    pub fn from_view(view: FilteredView<'_>, config: &DashboardConfig) -> Result<Self, SchemaError> {
        let focus_role = config.focus_role.as_str();
        let is_focus = |r: &SalaryRecord| r.role_title == focus_role;

        let dashboard = Dashboard {
            kpis: compute_kpis(&view),
            top_roles: top_n_by_mean(
                &view,
                Column::RoleTitle,
                Column::SalaryUsd,
                config.top_n,
                SortOrder::Ascending,
            )?,
            salary_histogram: histogram_buckets(&view, Column::SalaryUsd, config.histogram_buckets)?,
            remote_split: proportions(&value_counts(&view, Column::RemoteType)),
            focus_country_means: group_mean_by_key(
                &view,
                is_focus,
                Column::ResidenceCountryCode,
                Column::SalaryUsd,
            )?,
            focus_indicator: mean_vs_median(&view, is_focus, Column::SalaryUsd)?,
            rows: view.into_indices(),
        };

        log::debug!(
            "Recomputed dashboard: {} rows, {} role bars, {} buckets",
            dashboard.rows.len(),
            dashboard.top_roles.len(),
            dashboard.salary_histogram.len()
        );
        Ok(dashboard)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;

    fn dataset() -> SalaryDataset {
        let mut records = vec![
            record(2024, "senior", "Data Scientist", 200.0),
            record(2024, "junior", "Data Scientist", 100.0),
            record(2023, "senior", "Data Engineer", 300.0),
            record(2023, "pleno", "Data Analyst", 60.0),
        ];
        records[1].residence_country_code = "BRA".to_string();
        records[3].remote_type = "presencial".to_string();
        SalaryDataset::from_records(records)
    }

    #[test]
    fn full_selection_populates_everything() {
        let ds = dataset();
        let config = DashboardConfig::default();
        let dash = Dashboard::compute(&ds, &FilterSelection::all(&ds), &config).unwrap();

        assert_eq!(dash.rows, vec![0, 1, 2, 3]);
        assert_eq!(dash.kpis.count, 4);
        assert_eq!(dash.kpis.top_role, "Data Scientist");
        assert_eq!(dash.top_roles.len(), 3);
        assert_eq!(dash.top_roles.last().unwrap().group, CellValue::from("Data Engineer"));
        assert_eq!(dash.salary_histogram.len(), 30);
        assert_eq!(dash.remote_split[0], (CellValue::from("remoto"), 0.75));
        assert_eq!(dash.focus_country_means.len(), 2);
        assert_eq!(dash.focus_indicator.as_ref().unwrap().mean, 150.0);
    }

    #[test]
    fn excluding_all_seniorities_leaves_no_data() {
        let ds = dataset();
        let mut selection = FilterSelection::all(&ds);
        selection.select_none(Column::Seniority).unwrap();
        let dash = Dashboard::compute(&ds, &selection, &DashboardConfig::default()).unwrap();

        assert!(dash.is_empty());
        assert_eq!(dash.kpis, Kpis::default());
        assert!(dash.top_roles.is_empty());
        assert!(dash.salary_histogram.is_empty());
        assert!(dash.remote_split.is_empty());
        assert!(dash.focus_country_means.is_empty());
        assert!(dash.focus_indicator.is_none());
    }

    #[test]
    fn focus_role_absent_after_filtering() {
        let ds = dataset();
        let mut selection = FilterSelection::all(&ds);
        selection
            .set_allowed(&ds, Column::Year, [CellValue::Integer(2023)])
            .unwrap();
        let dash = Dashboard::compute(&ds, &selection, &DashboardConfig::default()).unwrap();

        assert_eq!(dash.rows, vec![2, 3]);
        assert!(dash.focus_country_means.is_empty());
        assert!(dash.focus_indicator.is_none());
        assert!(!dash.top_roles.is_empty());
    }
}
