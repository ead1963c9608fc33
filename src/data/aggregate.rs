use std::collections::{BTreeMap, HashMap};

use super::error::SchemaError;
use super::filter::FilteredView;
use super::model::{CellValue, Column, SalaryRecord};

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Headline metrics of a filtered view.
///
/// On an empty view every numeric field is `0` and `top_role` is the empty
/// string. These are display sentinels, not statistics: the mean and mode of
/// an empty set are undefined.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Kpis {
    pub mean_salary: f64,
    pub max_salary: f64,
    pub count: usize,
    /// Most frequent role title. Ties go to the first title in sorted order.
    pub top_role: String,
}

pub fn compute_kpis(view: &FilteredView<'_>) -> Kpis {
    if view.is_empty() {
        return Kpis::default();
    }

    let mut sum = 0.0;
    let mut max = f64::NEG_INFINITY;
    let mut roles: BTreeMap<&str, usize> = BTreeMap::new();
    for record in view.records() {
        sum += record.salary_usd;
        max = max.max(record.salary_usd);
        *roles.entry(record.role_title.as_str()).or_default() += 1;
    }

    // BTreeMap iterates in sorted order and only a strictly larger count
    // replaces the current best.
    let mut top_role = "";
    let mut top_count = 0;
    for (role, count) in roles {
        if count > top_count {
            top_role = role;
            top_count = count;
        }
    }

    Kpis {
        mean_salary: sum / view.len() as f64,
        max_salary: max,
        count: view.len(),
        top_role: top_role.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Mean of a numeric column within one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub group: CellValue,
    pub mean: f64,
}

#[derive(Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Per-group means in first-seen group order.
fn grouped_means<'a>(
    records: impl Iterator<Item = &'a SalaryRecord>,
    group_column: Column,
    value_column: Column,
) -> Vec<GroupMean> {
    let mut slots: HashMap<CellValue, usize> = HashMap::new();
    let mut groups: Vec<(CellValue, Accumulator)> = Vec::new();

    for record in records {
        let Some(value) = record.number(value_column) else {
            continue;
        };
        let key = record.value(group_column);
        let slot = match slots.get(&key) {
            Some(&slot) => slot,
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push((key, Accumulator::default()));
                groups.len() - 1
            }
        };
        groups[slot].1.push(value);
    }

    groups
        .into_iter()
        .map(|(group, acc)| GroupMean {
            group,
            mean: acc.mean(),
        })
        .collect()
}

/// The `n` groups with the largest mean of `value_column`.
///
/// Output length is `min(n, distinct groups)`. Equal means keep the order in
/// which their groups first appear in the view, both when picking the top `n`
/// and in the returned sequence.
pub fn top_n_by_mean(
    view: &FilteredView<'_>,
    group_column: Column,
    value_column: Column,
    n: usize,
    order: SortOrder,
) -> Result<Vec<GroupMean>, SchemaError> {
    value_column.require_numeric()?;

    let mut means = grouped_means(view.records(), group_column, value_column);
    // Stable sorts.
    means.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    means.truncate(n);
    if order == SortOrder::Ascending {
        means.sort_by(|a, b| a.mean.total_cmp(&b.mean));
    }
    Ok(means)
}

/// Restrict the view with `predicate`, then average `value_column` per group.
///
/// Returns an empty map when nothing matches; callers render that as
/// "no data for this slice".
pub fn group_mean_by_key(
    view: &FilteredView<'_>,
    predicate: impl Fn(&SalaryRecord) -> bool,
    group_column: Column,
    value_column: Column,
) -> Result<BTreeMap<CellValue, f64>, SchemaError> {
    value_column.require_numeric()?;

    let slice = view.restrict(predicate);
    Ok(grouped_means(slice.records(), group_column, value_column)
        .into_iter()
        .map(|g| (g.group, g.mean))
        .collect())
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Half-open range `[start, end)`; the last bucket also includes `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBucket {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBucket {
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width binning of `value_column` over its observed min/max.
///
/// An empty view (or `bucket_count == 0`) yields no buckets. When every value
/// is identical a single zero-width bucket holds all rows.
pub fn histogram_buckets(
    view: &FilteredView<'_>,
    value_column: Column,
    bucket_count: usize,
) -> Result<Vec<HistogramBucket>, SchemaError> {
    value_column.require_numeric()?;

    let values: Vec<f64> = view
        .records()
        .filter_map(|r| r.number(value_column))
        .collect();
    if values.is_empty() || bucket_count == 0 {
        return Ok(Vec::new());
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range <= 0.0 {
        return Ok(vec![HistogramBucket {
            start: min,
            end: max,
            count: values.len(),
        }]);
    }

    let width = range / bucket_count as f64;
    let mut buckets: Vec<HistogramBucket> = (0..bucket_count)
        .map(|i| HistogramBucket {
            start: min + width * i as f64,
            end: if i + 1 == bucket_count {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for v in values {
        let idx = (((v - min) / width) as usize).min(bucket_count - 1);
        buckets[idx].count += 1;
    }
    Ok(buckets)
}

// ---------------------------------------------------------------------------
// Frequencies
// ---------------------------------------------------------------------------

/// Frequency table of `column` over the view.
pub fn value_counts(view: &FilteredView<'_>, column: Column) -> BTreeMap<CellValue, usize> {
    let mut counts = BTreeMap::new();
    for record in view.records() {
        *counts.entry(record.value(column)).or_default() += 1;
    }
    counts
}

/// Turn counts into fractions of their total, most frequent first.
/// Equal counts stay in key order.
pub fn proportions(counts: &BTreeMap<CellValue, usize>) -> Vec<(CellValue, f64)> {
    let total: usize = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }
    let mut shares: Vec<(CellValue, usize)> =
        counts.iter().map(|(v, &c)| (v.clone(), c)).collect();
    shares.sort_by(|a, b| b.1.cmp(&a.1));
    shares
        .into_iter()
        .map(|(v, c)| (v, c as f64 / total as f64))
        .collect()
}

// ---------------------------------------------------------------------------
// Mean vs median
// ---------------------------------------------------------------------------

/// Mean and median of a numeric slice, for the single-number indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct MeanMedian {
    pub mean: f64,
    pub median: f64,
    pub count: usize,
}

impl MeanMedian {
    /// `(mean - median) / median`; `None` when the median is zero.
    pub fn relative_delta(&self) -> Option<f64> {
        (self.median != 0.0).then(|| (self.mean - self.median) / self.median)
    }
}

/// Mean and median of `value_column` over the records matching `predicate`.
/// `None` when nothing matches.
pub fn mean_vs_median(
    view: &FilteredView<'_>,
    predicate: impl Fn(&SalaryRecord) -> bool,
    value_column: Column,
) -> Result<Option<MeanMedian>, SchemaError> {
    value_column.require_numeric()?;

    let mut values: Vec<f64> = view
        .restrict(predicate)
        .records()
        .filter_map(|r| r.number(value_column))
        .collect();
    if values.is_empty() {
        return Ok(None);
    }

    values.sort_by(f64::total_cmp);
    let n = values.len();
    let median = if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    };
    let mean = values.iter().sum::<f64>() / n as f64;

    Ok(Some(MeanMedian {
        mean,
        median,
        count: n,
    }))
}
