use std::collections::BTreeMap;

use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use salary_dashboard::data::model::{CellValue, Column, SalaryDataset};

use super::panels::no_data;
use crate::color::ChartTheme;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Mean salary by country, shaded on a continuous scale
// ---------------------------------------------------------------------------

pub fn country_means(ui: &mut Ui, role: &str, means: &BTreeMap<CellValue, f64>, theme: &ChartTheme) {
    ui.strong(format!("Mean {role} salary by country"));
    if means.is_empty() {
        no_data(ui, &format!("No {role} data to show on the map."));
        return;
    }

    let min = means.values().copied().fold(f64::INFINITY, f64::min);
    let max = means.values().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut rows: Vec<(&CellValue, f64)> = means.iter().map(|(k, &v)| (k, v)).collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));

    ui.push_id("country_means", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(260.0)
            .column(TableColumn::exact(60.0))
            .column(TableColumn::exact(24.0))
            .column(TableColumn::remainder())
            .header(ROW_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong("Country");
                });
                header.col(|_| {});
                header.col(|ui| {
                    ui.strong("Mean salary (USD)");
                });
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let (country, mean) = rows[row.index()];
                    row.col(|ui| {
                        ui.label(country.to_string());
                    });
                    row.col(|ui| {
                        let (rect, _) = ui.allocate_exact_size(egui::vec2(16.0, 12.0), egui::Sense::hover());
                        ui.painter().rect_filled(rect, 2.0, theme.scale(mean, min, max));
                    });
                    row.col(|ui| {
                        ui.label(format!("${mean:.2}"));
                    });
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Detailed data table of the filtered rows
// ---------------------------------------------------------------------------

pub fn data_table(ui: &mut Ui, dataset: &SalaryDataset, rows: &[usize]) {
    ui.heading("Detailed data");
    if rows.is_empty() {
        no_data(ui, "No records match the current filters.");
        return;
    }

    ui.push_id("data_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(400.0)
            .columns(TableColumn::auto().at_least(70.0), Column::ALL.len())
            .header(ROW_HEIGHT, |mut header| {
                for column in Column::ALL {
                    header.col(|ui| {
                        ui.label(RichText::new(column.label()).strong());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let Some(record) = dataset.get(rows[row.index()]) else {
                        return;
                    };
                    for column in Column::ALL {
                        row.col(|ui| {
                            ui.label(record.value(column).to_string());
                        });
                    }
                });
            });
    });
}
