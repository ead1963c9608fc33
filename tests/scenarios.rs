use salary_dashboard::data::aggregate::{compute_kpis, group_mean_by_key};
use salary_dashboard::data::filter::{apply_filters, FilterSelection};
use salary_dashboard::data::loader::parse_csv;
use salary_dashboard::data::model::Column;
use salary_dashboard::{AppState, Dashboard, DashboardConfig};

fn constant_rows(salaries: &[u32]) -> String {
    let mut csv = String::from("ano,senioridade,contrato,tamanho_empresa,cargo,remoto,residencia_iso3,usd\n");
    for s in salaries {
        csv.push_str(&format!("2024,senior,integral,media,Data Engineer,remoto,USA,{s}\n"));
    }
    csv
}

#[test]
fn five_row_identity_scenario() {
    let report = parse_csv(constant_rows(&[100, 200, 300, 400, 500]).as_bytes()).expect("parse csv");
    let ds = report.dataset;
    let kpis = compute_kpis(&apply_filters(&ds, &FilterSelection::all(&ds)));
    assert_eq!(kpis.mean_salary, 300.0);
    assert_eq!(kpis.max_salary, 500.0);
    assert_eq!(kpis.count, 5);
}

#[test]
fn excluding_every_seniority_shows_no_data_everywhere() {
    let ds = parse_csv(constant_rows(&[100, 200, 300]).as_bytes())
        .expect("parse csv")
        .dataset;
    let mut state = AppState::new(ds, DashboardConfig::default()).expect("initial dashboard");
    state.select_none(Column::Seniority).expect("seniority is filterable");

    let dash = state.dashboard();
    assert_eq!(dash.kpis.mean_salary, 0.0);
    assert_eq!(dash.kpis.max_salary, 0.0);
    assert_eq!(dash.kpis.count, 0);
    assert_eq!(dash.kpis.top_role, "");
    assert!(dash.top_roles.is_empty());
    assert!(dash.salary_histogram.is_empty());
    assert!(dash.remote_split.is_empty());
    assert!(dash.focus_country_means.is_empty());
}

#[test]
fn geographic_slice_for_missing_role_is_empty() {
    let ds = parse_csv(constant_rows(&[100, 200]).as_bytes())
        .expect("parse csv")
        .dataset;
    let view = apply_filters(&ds, &FilterSelection::all(&ds));
    let means = group_mean_by_key(
        &view,
        |r| r.role_title == "Data Scientist",
        Column::ResidenceCountryCode,
        Column::SalaryUsd,
    )
    .expect("salary is numeric");
    assert!(means.is_empty());

    let dash = Dashboard::compute(&ds, &FilterSelection::all(&ds), &DashboardConfig::default())
        .expect("dashboard");
    assert!(dash.focus_country_means.is_empty());
    assert!(dash.focus_indicator.is_none());
    assert_eq!(dash.kpis.count, 2);
}

#[test]
fn unknown_column_names_are_schema_errors() {
    assert!("bonus".parse::<Column>().is_err());
    assert_eq!("cargo".parse::<Column>(), Ok(Column::RoleTitle));
    assert_eq!(
        "ano".parse::<Column>().map(|c| c.is_filterable()),
        Ok(true)
    );
}
