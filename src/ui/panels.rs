use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use salary_dashboard::data::aggregate::Kpis;
use salary_dashboard::data::model::Column;
use salary_dashboard::data::SchemaError;
use salary_dashboard::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for column in Column::FILTERABLE {
                // Clone so state can be mutated inside the loop.
                let all_values = state.dataset().unique_values(column).clone();
                let n_selected = state
                    .filters()
                    .allowed(column)
                    .map(|s| s.len())
                    .unwrap_or_default();
                let header_text = format!("{}  ({n_selected}/{})", column.label(), all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(column.name())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                let result = state.select_all(column);
                                report(state, result);
                            }
                            if ui.small_button("None").clicked() {
                                let result = state.select_none(column);
                                report(state, result);
                            }
                        });

                        for val in &all_values {
                            let mut checked = state
                                .filters()
                                .allowed(column)
                                .is_ok_and(|s| s.contains(val));
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                let result = state.toggle_filter_value(column, val);
                                report(state, result);
                            }
                        }
                    });
            }

            ui.separator();
            if ui.button("Reset filters").clicked() {
                let result = state.reset_filters();
                report(state, result);
            }
        });
}

fn report(state: &mut AppState, result: Result<(), SchemaError>) {
    match result {
        Ok(()) => state.status_message = None,
        Err(e) => {
            log::error!("Filter update rejected: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with row counts.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("Data salaries dashboard");
        ui.separator();
        ui.label(format!(
            "{} records loaded, {} visible",
            thousands(state.dataset().len() as u64),
            thousands(state.dashboard().rows.len() as u64)
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// KPI row
// ---------------------------------------------------------------------------

/// Four headline metrics, annual salary in USD.
pub fn kpi_row(ui: &mut Ui, kpis: &Kpis) {
    ui.heading("Overall metrics (annual salary, USD)");
    ui.columns(4, |cols| {
        metric(&mut cols[0], "Mean salary", &usd(kpis.mean_salary));
        metric(&mut cols[1], "Max salary", &usd(kpis.max_salary));
        metric(&mut cols[2], "Records", &thousands(kpis.count as u64));
        metric(&mut cols[3], "Most frequent role", &kpis.top_role);
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(label).small());
        ui.label(RichText::new(value).heading().strong());
    });
}

/// Warning shown in place of a chart with nothing to draw.
pub fn no_data(ui: &mut Ui, message: &str) {
    ui.label(RichText::new(format!("⚠ {message}")).color(Color32::YELLOW));
}

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// `1234567` → `"1,234,567"`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole-dollar amount: `1234.6` → `"$1,235"`.
pub fn usd(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}${}", thousands(rounded.abs() as u64))
}
