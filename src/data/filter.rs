use std::collections::{BTreeMap, BTreeSet};

use super::error::SchemaError;
use super::model::{CellValue, Column, SalaryDataset, SalaryRecord};

// ---------------------------------------------------------------------------
// FilterSelection: which values are allowed per filterable column
// ---------------------------------------------------------------------------

/// Per-column selection state: filterable column → set of allowed values.
///
/// Every filterable column always has an entry. An empty set means nothing
/// is selected for that column, which hides every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    allowed: BTreeMap<Column, BTreeSet<CellValue>>,
}

impl FilterSelection {
    /// A selection that allows nothing.
    pub fn none() -> Self {
        Self {
            allowed: Column::FILTERABLE
                .into_iter()
                .map(|c| (c, BTreeSet::new()))
                .collect(),
        }
    }

    /// Every distinct value selected in every column (the UI default).
    pub fn all(dataset: &SalaryDataset) -> Self {
        Self {
            allowed: Column::FILTERABLE
                .into_iter()
                .map(|c| (c, dataset.unique_values(c).clone()))
                .collect(),
        }
    }

    /// Allowed values for `column`.
    pub fn allowed(&self, column: Column) -> Result<&BTreeSet<CellValue>, SchemaError> {
        self.allowed
            .get(&column)
            .ok_or(SchemaError::NotFilterable(column))
    }

    /// Replace the allowed set of `column`. Values never observed in the
    /// dataset are discarded so the selection stays a subset of it.
    pub fn set_allowed(
        &mut self,
        dataset: &SalaryDataset,
        column: Column,
        values: impl IntoIterator<Item = CellValue>,
    ) -> Result<(), SchemaError> {
        let slot = self.slot(column)?;
        let known = dataset.unique_values(column);
        *slot = values.into_iter().filter(|v| known.contains(v)).collect();
        Ok(())
    }

    /// Flip a single value. Returns whether it is selected afterwards.
    pub fn toggle(
        &mut self,
        dataset: &SalaryDataset,
        column: Column,
        value: &CellValue,
    ) -> Result<bool, SchemaError> {
        let slot = self.slot(column)?;
        if slot.remove(value) {
            return Ok(false);
        }
        if dataset.unique_values(column).contains(value) {
            slot.insert(value.clone());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Select every distinct value of `column`.
    pub fn select_all(&mut self, dataset: &SalaryDataset, column: Column) -> Result<(), SchemaError> {
        *self.slot(column)? = dataset.unique_values(column).clone();
        Ok(())
    }

    /// Deselect every value of `column`.
    pub fn select_none(&mut self, column: Column) -> Result<(), SchemaError> {
        self.slot(column)?.clear();
        Ok(())
    }

    /// Conjunctive membership test over all filterable columns.
    pub fn matches(&self, record: &SalaryRecord) -> bool {
        self.allowed
            .iter()
            .all(|(column, allowed)| allowed.iter().any(|v| record.holds(*column, v)))
    }

    fn slot(&mut self, column: Column) -> Result<&mut BTreeSet<CellValue>, SchemaError> {
        self.allowed
            .get_mut(&column)
            .ok_or(SchemaError::NotFilterable(column))
    }
}

// ---------------------------------------------------------------------------
// FilteredView: the records passing the current selection
// ---------------------------------------------------------------------------

/// Ordered subsequence of a dataset, kept as row indices.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a SalaryDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// The whole dataset, unfiltered.
    pub fn full(dataset: &'a SalaryDataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Records in dataset order.
    pub fn records(&self) -> impl Iterator<Item = &'a SalaryRecord> + '_ {
        let dataset = self.dataset;
        self.indices.iter().filter_map(move |&i| dataset.get(i))
    }

    /// Narrow the view further with an extra predicate.
    pub fn restrict(&self, predicate: impl Fn(&SalaryRecord) -> bool) -> FilteredView<'a> {
        let dataset = self.dataset;
        FilteredView {
            dataset,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| dataset.get(i).is_some_and(&predicate))
                .collect(),
        }
    }
}

/// Sorted distinct values of `column`, used to populate filter option lists.
pub fn distinct_values(dataset: &SalaryDataset, column: Column) -> &BTreeSet<CellValue> {
    dataset.unique_values(column)
}

/// Return the records passing every column filter of `selection`.
///
/// A record passes when its value in each filterable column lies in that
/// column's allowed set. Any empty set therefore empties the view.
pub fn apply_filters<'a>(dataset: &'a SalaryDataset, selection: &FilterSelection) -> FilteredView<'a> {
    let indices = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| selection.matches(record))
        .map(|(i, _)| i)
        .collect();
    FilteredView { dataset, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;

    fn dataset() -> SalaryDataset {
        SalaryDataset::from_records(vec![
            record(2023, "junior", "Data Analyst", 50.0),
            record(2024, "senior", "Data Engineer", 150.0),
            record(2024, "junior", "Data Scientist", 90.0),
            record(2025, "pleno", "Data Analyst", 70.0),
        ])
    }

    #[test]
    fn identity_selection_keeps_everything() {
        let ds = dataset();
        let view = apply_filters(&ds, &FilterSelection::all(&ds));
        assert_eq!(view.indices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn empty_column_set_empties_the_view() {
        let ds = dataset();
        let mut selection = FilterSelection::all(&ds);
        selection.select_none(Column::Seniority).unwrap();
        assert!(apply_filters(&ds, &selection).is_empty());
        assert!(apply_filters(&ds, &FilterSelection::none()).is_empty());
    }

    #[test]
    fn filters_combine_conjunctively() {
        let ds = dataset();
        let mut selection = FilterSelection::all(&ds);
        selection
            .set_allowed(&ds, Column::Year, [CellValue::Integer(2024)])
            .unwrap();
        selection
            .set_allowed(&ds, Column::Seniority, [CellValue::from("junior")])
            .unwrap();
        let view = apply_filters(&ds, &selection);
        assert_eq!(view.indices(), &[2]);
        assert_eq!(view.records().next().unwrap().role_title, "Data Scientist");
    }

    #[test]
    fn unknown_values_are_dropped_from_selection() {
        let ds = dataset();
        let mut selection = FilterSelection::all(&ds);
        selection
            .set_allowed(&ds, Column::Year, [CellValue::Integer(1999), CellValue::Integer(2023)])
            .unwrap();
        let allowed = selection.allowed(Column::Year).unwrap();
        assert_eq!(allowed.len(), 1);
        assert!(allowed.contains(&CellValue::Integer(2023)));
    }

    #[test]
    fn toggle_flips_membership() {
        let ds = dataset();
        let mut selection = FilterSelection::all(&ds);
        let pleno = CellValue::from("pleno");
        assert!(!selection.toggle(&ds, Column::Seniority, &pleno).unwrap());
        assert_eq!(apply_filters(&ds, &selection).len(), 3);
        assert!(selection.toggle(&ds, Column::Seniority, &pleno).unwrap());
        assert_eq!(apply_filters(&ds, &selection).len(), 4);
    }

    #[test]
    fn non_filterable_columns_are_rejected() {
        let ds = dataset();
        let mut selection = FilterSelection::all(&ds);
        assert_eq!(
            selection.select_none(Column::RoleTitle),
            Err(SchemaError::NotFilterable(Column::RoleTitle))
        );
        assert!(selection.allowed(Column::SalaryUsd).is_err());
    }

    #[test]
    fn restrict_narrows_within_view() {
        let ds = dataset();
        let view = FilteredView::full(&ds);
        let analysts = view.restrict(|r| r.role_title == "Data Analyst");
        assert_eq!(analysts.indices(), &[0, 3]);
        assert!(view.restrict(|_| false).is_empty());
    }

    #[test]
    fn distinct_values_are_ascending() {
        let ds = dataset();
        let years: Vec<_> = distinct_values(&ds, Column::Year).iter().cloned().collect();
        assert_eq!(
            years,
            vec![CellValue::Integer(2023), CellValue::Integer(2024), CellValue::Integer(2025)]
        );
    }
}
