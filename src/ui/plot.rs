use std::collections::BTreeMap;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points,
};

use crate::data::model::SalesDataset;
use crate::data::stats::{sales_by_category, sales_by_year};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render the 2×2 chart grid in the central panel.
pub fn charts_grid(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to explore sales  (File → Open…)");
            });
            return;
        }
    };

    let axis_name = state.category_axis.to_string().to_lowercase();
    let chart_height = (ui.available_height() / 2.0 - 28.0).max(120.0);

    ui.columns(2, |cols| {
        {
            let ui = &mut cols[0];
            ui.strong(format!("Total global sales by {axis_name}"));
            category_totals_chart(ui, state, dataset, chart_height);
            ui.strong(format!("Global sales distribution by {axis_name}"));
            category_box_plot(ui, state, dataset, chart_height);
        }
        {
            let ui = &mut cols[1];
            ui.strong("NA vs EU sales");
            region_scatter(ui, state, dataset, chart_height);
            ui.strong("Global sales by year");
            yearly_line(ui, state, dataset, chart_height);
        }
    });
}

fn category_color(state: &AppState, value: &str) -> Color32 {
    state
        .color_map
        .as_ref()
        .map(|cm| cm.color_for(value))
        .unwrap_or(Color32::LIGHT_BLUE)
}

/// Sorted category values on a 0..n integer axis, with a formatter mapping
/// tick positions back to names.
fn category_labels(state: &AppState, dataset: &SalesDataset) -> Vec<String> {
    dataset
        .unique_values(state.category_axis)
        .iter()
        .cloned()
        .collect()
}

fn label_formatter(labels: Vec<String>) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels
            .get(rounded as usize)
            .cloned()
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

/// Bar chart: summed global sales per category.
fn category_totals_chart(ui: &mut Ui, state: &AppState, dataset: &SalesDataset, height: f32) {
    let sums = sales_by_category(dataset, &state.visible_indices, state.category_axis);
    let labels = category_labels(state, dataset);

    let bars: Vec<Bar> = labels
        .iter()
        .enumerate()
        .map(|(i, cat)| {
            let total = sums.get(cat).copied().unwrap_or(0.0);
            Bar::new(i as f64, total)
                .width(0.7)
                .name(cat)
                .fill(category_color(state, cat))
        })
        .collect();

    Plot::new("category_totals")
        .height(height)
        .y_axis_label("Global sales (M)")
        .x_axis_formatter(label_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Scatter: NA vs EU sales, coloured by category, radius scaled by global sales.
fn region_scatter(ui: &mut Ui, state: &AppState, dataset: &SalesDataset, height: f32) {
    Plot::new("region_scatter")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("NA sales (M)")
        .y_axis_label("EU sales (M)")
        .show(ui, |plot_ui| {
            for &i in &state.visible_indices {
                let rec = &dataset.records[i];
                let cat = state.category_axis.value_of(rec);
                let radius = (rec.global_sales.sqrt() * 2.0).clamp(1.5, 12.0) as f32;

                plot_ui.points(
                    Points::new(vec![[rec.na_sales, rec.eu_sales]])
                        .color(category_color(state, cat))
                        .radius(radius)
                        .name(cat),
                );
            }
        });
}

/// Box plot: distribution of global sales per category.
fn category_box_plot(ui: &mut Ui, state: &AppState, dataset: &SalesDataset, height: f32) {
    let mut per_category: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for &i in &state.visible_indices {
        let rec = &dataset.records[i];
        per_category
            .entry(state.category_axis.value_of(rec))
            .or_default()
            .push(rec.global_sales);
    }

    let labels = category_labels(state, dataset);
    let mut boxes = Vec::new();
    for (pos, cat) in labels.iter().enumerate() {
        let Some(values) = per_category.get_mut(cat.as_str()) else {
            continue;
        };
        values.sort_by(|a, b| a.total_cmp(b));

        let min = values[0];
        let max = *values.last().unwrap();
        let spread = BoxSpread::new(
            min,
            percentile(values, 0.25),
            percentile(values, 0.5),
            percentile(values, 0.75),
            max,
        );

        let color = category_color(state, cat);
        boxes.push(
            BoxElem::new(pos as f64, spread)
                .name(cat)
                .fill(color.gamma_multiply(0.4))
                .stroke(Stroke::new(1.0, color)),
        );
    }

    Plot::new("category_box_plot")
        .height(height)
        .y_axis_label("Global sales (M)")
        .x_axis_formatter(label_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes));
        });
}

/// Line: global sales summed per release year.
fn yearly_line(ui: &mut Ui, state: &AppState, dataset: &SalesDataset, height: f32) {
    let by_year = sales_by_year(dataset, &state.visible_indices);
    let points: PlotPoints = by_year
        .iter()
        .map(|(&year, &total)| [year as f64, total])
        .collect();

    Plot::new("yearly_totals")
        .height(height)
        .x_axis_label("Year")
        .y_axis_label("Global sales (M)")
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).color(Color32::LIGHT_BLUE).width(1.5));
        });
}

/// Linearly interpolated percentile of an ascending-sorted slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = p * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let t = idx - lo as f64;
        sorted[lo] * (1.0 - t) + sorted[hi] * t
    }
}
