use std::f64::consts::TAU;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Polygon};

use salary_dashboard::data::aggregate::{GroupMean, HistogramBucket, MeanMedian};
use salary_dashboard::data::model::CellValue;

use super::panels::{no_data, usd};
use crate::color::{ChartTheme, ColorMap};

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Top roles: horizontal bars, ascending so the largest ends on top
// ---------------------------------------------------------------------------

pub fn top_roles_chart(ui: &mut Ui, roles: &[GroupMean], theme: &ChartTheme) {
    ui.strong("Top roles by mean salary");
    if roles.is_empty() {
        no_data(ui, "No data to show in the roles chart.");
        return;
    }

    let labels: Vec<String> = roles.iter().map(|g| g.group.to_string()).collect();
    let bars: Vec<Bar> = roles
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new(i as f64, g.mean)
                .name(g.group.to_string())
                .fill(theme.bar_color)
                .width(0.7)
        })
        .collect();

    Plot::new("top_roles_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Mean annual salary (USD)")
        .y_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

// ---------------------------------------------------------------------------
// Salary histogram
// ---------------------------------------------------------------------------

pub fn salary_histogram(ui: &mut Ui, buckets: &[HistogramBucket], theme: &ChartTheme) {
    ui.strong("Annual salary distribution");
    if buckets.is_empty() {
        no_data(ui, "No data to show in the distribution chart.");
        return;
    }

    let bars: Vec<Bar> = buckets
        .iter()
        .map(|b| {
            Bar::new(b.midpoint(), b.count as f64)
                .width(b.width().max(1.0))
                .name(format!("{} – {}", usd(b.start), usd(b.end)))
                .fill(theme.bar_color)
        })
        .collect();

    Plot::new("salary_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Salary band (USD)")
        .y_axis_label("Records")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Remote-type donut
// ---------------------------------------------------------------------------

/// Annulus sector from `start` to `end` (radians), split into one quad per
/// arc step. Each quad is convex; the whole sector is not, and egui fills
/// polygons as convex shapes.
fn donut_slice(start: f64, end: f64, inner: f64, outer: f64) -> Vec<Vec<[f64; 2]>> {
    let steps = (((end - start).abs() / TAU) * 128.0).ceil().max(2.0) as usize;
    let at = |radius: f64, i: usize| -> [f64; 2] {
        let angle = start + (end - start) * i as f64 / steps as f64;
        [radius * angle.cos(), radius * angle.sin()]
    };
    (0..steps)
        .map(|i| vec![at(outer, i), at(outer, i + 1), at(inner, i + 1), at(inner, i)])
        .collect()
}

/// `colors` is built from the full dataset so each arrangement keeps its
/// colour while filters change.
pub fn remote_donut(ui: &mut Ui, shares: &[(CellValue, f64)], colors: &ColorMap, theme: &ChartTheme) {
    ui.strong("Work arrangement split");
    if shares.is_empty() {
        no_data(ui, "No data to show in the work arrangement chart.");
        return;
    }

    // Start at 12 o'clock, run clockwise.
    let mut angle = TAU / 4.0;

    Plot::new("remote_donut")
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for (value, share) in shares {
                let end = angle - share * TAU;
                let name = format!("{value} ({:.1}%)", share * 100.0);
                let color = colors.color_for(value);
                // Pieces share a name so the legend shows one entry per slice.
                for piece in donut_slice(end, angle, theme.donut_hole, 1.0) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(piece))
                            .name(&name)
                            .fill_color(color)
                            .stroke(Stroke::new(0.5, color)),
                    );
                }
                angle = end;
            }
        });
}

// ---------------------------------------------------------------------------
// Mean vs median indicator
// ---------------------------------------------------------------------------

pub fn mean_median_indicator(ui: &mut Ui, role: &str, indicator: Option<&MeanMedian>, theme: &ChartTheme) {
    ui.strong(format!("Global mean salary – {role}"));
    let Some(mm) = indicator else {
        no_data(ui, &format!("No {role} data to show in the indicator."));
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(format!("${:.2}", mm.mean)).size(32.0).color(theme.accent));
        if let Some(delta) = mm.relative_delta() {
            let (arrow, color) = if delta >= 0.0 {
                ("▲", Color32::GREEN)
            } else {
                ("▼", Color32::RED)
            };
            ui.label(RichText::new(format!("{arrow} {:.1}%", delta * 100.0)).color(color));
        }
    });
    ui.label(
        RichText::new(format!("vs median ${:.2} over {} records", mm.median, mm.count)).color(theme.muted),
    );
}
