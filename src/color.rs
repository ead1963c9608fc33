use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::{Color32, Visuals};
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use salary_dashboard::data::model::CellValue;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Categorical mapping: cell value → Color32
// ---------------------------------------------------------------------------

/// Maps distinct values of a categorical column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(values: &BTreeSet<CellValue>) -> Self {
        let palette = generate_palette(values.len());
        ColorMap {
            mapping: values.iter().cloned().zip(palette).collect(),
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Continuous scale
// ---------------------------------------------------------------------------

/// Viridis anchor colours, dark to bright.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Sample the viridis scale at `t` in `[0, 1]`, interpolating in linear RGB.
pub fn viridis(t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 0.0 };
    let scaled = t * (VIRIDIS.len() - 1) as f32;
    let lo = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let factor = scaled - lo as f32;

    let anchor = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    };
    let mixed = anchor(VIRIDIS[lo]).mix(anchor(VIRIDIS[lo + 1]), factor);
    to_color32(Srgb::from_linear(mixed))
}

// ---------------------------------------------------------------------------
// Theme handed to the renderer
// ---------------------------------------------------------------------------

/// Presentation settings for the charts.
#[derive(Debug, Clone)]
pub struct ChartTheme {
    pub dark_mode: bool,
    /// Bars of the top roles chart and histogram.
    pub bar_color: Color32,
    pub accent: Color32,
    pub muted: Color32,
    /// Inner radius of the donut as a fraction of the outer radius.
    pub donut_hole: f64,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            dark_mode: true,
            bar_color: Color32::from_rgb(0, 114, 255),
            accent: Color32::from_rgb(0, 198, 255),
            muted: Color32::GRAY,
            donut_hole: 0.5,
        }
    }
}

impl ChartTheme {
    pub fn visuals(&self) -> Visuals {
        if self.dark_mode {
            Visuals::dark()
        } else {
            Visuals::light()
        }
    }

    /// Colour for `value` on a scale spanning `[min, max]`.
    pub fn scale(&self, value: f64, min: f64, max: f64) -> Color32 {
        if max > min {
            viridis((value - min) / (max - min))
        } else {
            viridis(1.0)
        }
    }
}
