mod app;
mod color;
mod ui;

use anyhow::Context;
use app::SalaryDashboardApp;
use color::ChartTheme;
use eframe::egui;
use salary_dashboard::data::loader;
use salary_dashboard::{AppState, DashboardConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::default();
    let report = loader::load(&config.source, config.request_timeout)
        .with_context(|| format!("loading salary dataset from {}", config.source))?;
    let state = AppState::new(report.dataset, config).context("computing initial dashboard")?;
    let theme = ChartTheme::default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Salaries Dashboard",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(theme.visuals());
            Ok(Box::new(SalaryDashboardApp::new(state, theme)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
