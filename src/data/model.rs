use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use super::error::SchemaError;

// ---------------------------------------------------------------------------
// Column – the fixed schema of a salary record
// ---------------------------------------------------------------------------

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

/// One attribute of a [`SalaryRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Year,
    Seniority,
    ContractType,
    CompanySize,
    RoleTitle,
    RemoteType,
    ResidenceCountryCode,
    SalaryUsd,
}

impl Column {
    /// Every column, in source order.
    pub const ALL: [Column; 8] = [
        Column::Year,
        Column::Seniority,
        Column::ContractType,
        Column::CompanySize,
        Column::RoleTitle,
        Column::RemoteType,
        Column::ResidenceCountryCode,
        Column::SalaryUsd,
    ];

    /// Columns exposed as sidebar filters.
    pub const FILTERABLE: [Column; 4] = [
        Column::Year,
        Column::Seniority,
        Column::ContractType,
        Column::CompanySize,
    ];

    /// Semantic attribute name.
    pub fn name(self) -> &'static str {
        match self {
            Column::Year => "year",
            Column::Seniority => "seniority",
            Column::ContractType => "contract_type",
            Column::CompanySize => "company_size",
            Column::RoleTitle => "role_title",
            Column::RemoteType => "remote_type",
            Column::ResidenceCountryCode => "residence_country_code",
            Column::SalaryUsd => "salary_usd",
        }
    }

    /// Header name used by the published dataset.
    pub fn header(self) -> &'static str {
        match self {
            Column::Year => "ano",
            Column::Seniority => "senioridade",
            Column::ContractType => "contrato",
            Column::CompanySize => "tamanho_empresa",
            Column::RoleTitle => "cargo",
            Column::RemoteType => "remoto",
            Column::ResidenceCountryCode => "residencia_iso3",
            Column::SalaryUsd => "usd",
        }
    }

    /// Human readable label for widgets and table headers.
    pub fn label(self) -> &'static str {
        match self {
            Column::Year => "Year",
            Column::Seniority => "Seniority",
            Column::ContractType => "Contract type",
            Column::CompanySize => "Company size",
            Column::RoleTitle => "Role",
            Column::RemoteType => "Work arrangement",
            Column::ResidenceCountryCode => "Country",
            Column::SalaryUsd => "Salary (USD)",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::Year => ColumnKind::Integer,
            Column::SalaryUsd => ColumnKind::Float,
            _ => ColumnKind::Text,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self.kind(), ColumnKind::Integer | ColumnKind::Float)
    }

    pub fn is_filterable(self) -> bool {
        Column::FILTERABLE.contains(&self)
    }

    /// Fail with [`SchemaError::NotNumeric`] unless the column holds numbers.
    pub fn require_numeric(self) -> Result<Self, SchemaError> {
        if self.is_numeric() {
            Ok(self)
        } else {
            Err(SchemaError::NotNumeric(self))
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts either the semantic name (`salary_usd`) or the dataset header (`usd`).
impl FromStr for Column {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .into_iter()
            .find(|c| c.name() == s || c.header() == s)
            .ok_or_else(|| SchemaError::UnknownColumn(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A typed cell value.
/// Used as a key in `BTreeMap` / `BTreeSet` / `HashMap`, so it is `Ord + Hash`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

// -- Manual Eq/Ord so CellValue can live in ordered sets --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                CellValue::Integer(_) => 0,
                CellValue::Float(_) => 1,
                CellValue::Text(_) => 2,
            }
        }
        match (self, other) {
            (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
            (CellValue::Float(a), CellValue::Float(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

// ---------------------------------------------------------------------------
// SalaryRecord – one row of the source table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SalaryRecord {
    pub year: i64,
    pub seniority: String,
    pub contract_type: String,
    pub company_size: String,
    pub role_title: String,
    pub remote_type: String,
    /// ISO3 country code.
    pub residence_country_code: String,
    pub salary_usd: f64,
}

impl SalaryRecord {
    /// Read one column as a typed cell.
    pub fn value(&self, column: Column) -> CellValue {
        match column {
            Column::Year => CellValue::Integer(self.year),
            Column::SalaryUsd => CellValue::Float(self.salary_usd),
            text => CellValue::Text(self.text(text).unwrap_or_default().to_string()),
        }
    }

    /// Borrow a text column without cloning. `None` for numeric columns.
    pub fn text(&self, column: Column) -> Option<&str> {
        let s = match column {
            Column::Seniority => &self.seniority,
            Column::ContractType => &self.contract_type,
            Column::CompanySize => &self.company_size,
            Column::RoleTitle => &self.role_title,
            Column::RemoteType => &self.remote_type,
            Column::ResidenceCountryCode => &self.residence_country_code,
            Column::Year | Column::SalaryUsd => return None,
        };
        Some(s)
    }

    /// Whether `column` holds `value`, compared without allocating.
    pub fn holds(&self, column: Column, value: &CellValue) -> bool {
        match (column, value) {
            (Column::Year, CellValue::Integer(y)) => self.year == *y,
            (Column::SalaryUsd, CellValue::Float(v)) => self.salary_usd.total_cmp(v).is_eq(),
            (_, CellValue::Text(s)) => self.text(column) == Some(s.as_str()),
            _ => false,
        }
    }

    /// Read a numeric column. `None` for text columns.
    pub fn number(&self, column: Column) -> Option<f64> {
        match column {
            Column::Year => Some(self.year as f64),
            Column::SalaryUsd => Some(self.salary_usd),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SalaryDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed distinct values per column.
///
/// Built once by the loader and never mutated afterwards; every derived view
/// borrows it.
#[derive(Debug, Clone, Default)]
pub struct SalaryDataset {
    records: Vec<SalaryRecord>,
    unique_values: BTreeMap<Column, BTreeSet<CellValue>>,
}

impl SalaryDataset {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<SalaryRecord>) -> Self {
        let mut unique_values: BTreeMap<Column, BTreeSet<CellValue>> =
            Column::ALL.into_iter().map(|c| (c, BTreeSet::new())).collect();

        for record in &records {
            for (column, values) in unique_values.iter_mut() {
                values.insert(record.value(*column));
            }
        }

        SalaryDataset {
            records,
            unique_values,
        }
    }

    pub fn records(&self) -> &[SalaryRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&SalaryRecord> {
        self.records.get(index)
    }

    /// Sorted distinct values observed in `column`.
    pub fn unique_values(&self, column: Column) -> &BTreeSet<CellValue> {
        // Every column is seeded in `from_records`.
        static EMPTY: BTreeSet<CellValue> = BTreeSet::new();
        self.unique_values.get(&column).unwrap_or(&EMPTY)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::SalaryRecord;

    pub fn record(year: i64, seniority: &str, role: &str, salary: f64) -> SalaryRecord {
        SalaryRecord {
            year,
            seniority: seniority.to_string(),
            contract_type: "integral".to_string(),
            company_size: "media".to_string(),
            role_title: role.to_string(),
            remote_type: "remoto".to_string(),
            residence_country_code: "USA".to_string(),
            salary_usd: salary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;

    #[test]
    fn column_parses_semantic_and_header_names() {
        assert_eq!("salary_usd".parse::<Column>().unwrap(), Column::SalaryUsd);
        assert_eq!("usd".parse::<Column>().unwrap(), Column::SalaryUsd);
        assert_eq!("residencia_iso3".parse::<Column>().unwrap(), Column::ResidenceCountryCode);
        assert!(matches!(
            "bonus".parse::<Column>(),
            Err(SchemaError::UnknownColumn(name)) if name == "bonus"
        ));
    }

    #[test]
    fn unique_values_are_sorted_per_column() {
        let ds = SalaryDataset::from_records(vec![
            record(2024, "senior", "Data Engineer", 10.0),
            record(2021, "junior", "Data Analyst", 20.0),
            record(2024, "pleno", "Data Engineer", 30.0),
        ]);
        let years: Vec<_> = ds.unique_values(Column::Year).iter().cloned().collect();
        assert_eq!(years, vec![CellValue::Integer(2021), CellValue::Integer(2024)]);

        let seniority: Vec<_> = ds
            .unique_values(Column::Seniority)
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(seniority, vec!["junior", "pleno", "senior"]);
    }

    #[test]
    fn empty_dataset_has_empty_value_sets() {
        let ds = SalaryDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.unique_values(Column::RoleTitle).is_empty());
    }

    #[test]
    fn record_accessors_respect_column_kind() {
        let r = record(2023, "senior", "ML Engineer", 1500.5);
        assert_eq!(r.number(Column::SalaryUsd), Some(1500.5));
        assert_eq!(r.number(Column::RoleTitle), None);
        assert_eq!(r.text(Column::RoleTitle), Some("ML Engineer"));
        assert_eq!(r.text(Column::Year), None);
        assert_eq!(r.value(Column::Year), CellValue::Integer(2023));
    }

    #[test]
    fn holds_agrees_with_value() {
        let r = record(2023, "senior", "ML Engineer", 1500.5);
        for column in Column::ALL {
            assert!(r.holds(column, &r.value(column)), "{column}");
        }
        assert!(!r.holds(Column::Seniority, &CellValue::from("junior")));
        assert!(!r.holds(Column::Year, &CellValue::Integer(2024)));
        // Type mismatches never match.
        assert!(!r.holds(Column::Year, &CellValue::from("2023")));
        assert!(!r.holds(Column::RoleTitle, &CellValue::Integer(2023)));
    }
}
