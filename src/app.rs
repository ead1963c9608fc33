use eframe::egui::{self, ScrollArea, Ui};

use salary_dashboard::AppState;

use salary_dashboard::data::model::Column;

use crate::color::{ChartTheme, ColorMap};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalaryDashboardApp {
    pub state: AppState,
    pub theme: ChartTheme,
    remote_colors: ColorMap,
}

impl SalaryDashboardApp {
    pub fn new(state: AppState, theme: ChartTheme) -> Self {
        let remote_colors = ColorMap::new(state.dataset().unique_values(Column::RemoteType));
        Self {
            state,
            theme,
            remote_colors,
        }
    }
}

impl eframe::App for SalaryDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    dashboard(ui, &self.state, &self.theme, &self.remote_colors);
                });
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState, theme: &ChartTheme, remote_colors: &ColorMap) {
    let dash = state.dashboard();
    let focus_role = state.config().focus_role.as_str();

    panels::kpi_row(ui, &dash.kpis);
    ui.separator();

    ui.heading("Charts");
    ui.columns(2, |cols| {
        plot::top_roles_chart(&mut cols[0], &dash.top_roles, theme);
        plot::salary_histogram(&mut cols[1], &dash.salary_histogram, theme);
    });
    ui.add_space(8.0);
    ui.columns(2, |cols| {
        plot::remote_donut(&mut cols[0], &dash.remote_split, remote_colors, theme);
        table::country_means(&mut cols[1], focus_role, &dash.focus_country_means, theme);
    });
    ui.add_space(8.0);
    plot::mean_median_indicator(ui, focus_role, dash.focus_indicator.as_ref(), theme);

    ui.separator();
    table::data_table(ui, state.dataset(), &dash.rows);
}
