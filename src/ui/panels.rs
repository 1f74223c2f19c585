use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::CategoryColumn;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let sections = match &state.dataset {
        Some(ds) => [
            (CategoryColumn::Genre, ds.genres.clone()),
            (CategoryColumn::Platform, ds.platforms.clone()),
        ],
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    let mut selection_changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Category-axis selector ----
            ui.strong("Category axis");
            egui::ComboBox::from_id_salt("category_axis")
                .selected_text(state.category_axis.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for col in [CategoryColumn::Genre, CategoryColumn::Platform] {
                        if ui
                            .selectable_label(state.category_axis == col, col.to_string())
                            .clicked()
                        {
                            state.set_category_axis(col);
                        }
                    }
                });
            ui.separator();

            // ---- Per-column filter widgets (collapsible) ----
            for (col, all_values) in &sections {
                let selected_now = match col {
                    CategoryColumn::Genre => &state.filters.genres,
                    CategoryColumn::Platform => &state.filters.platforms,
                };
                let header_text =
                    format!("{col}  ({}/{})", selected_now.len(), all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col.to_string())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        // Select all / none buttons
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(*col);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(*col);
                            }
                        });

                        for val in all_values {
                            // Show colour swatch when this is the category axis
                            let mut text = RichText::new(val);
                            if state.category_axis == *col {
                                if let Some(cm) = &state.color_map {
                                    text = text.color(cm.color_for(val));
                                }
                            }

                            let selected = match col {
                                CategoryColumn::Genre => &mut state.filters.genres,
                                CategoryColumn::Platform => &mut state.filters.platforms,
                            };
                            let mut checked = selected.contains(val);
                            if ui.checkbox(&mut checked, text).changed() {
                                if checked {
                                    selected.insert(val.clone());
                                } else {
                                    selected.remove(val);
                                }
                                selection_changed = true;
                            }
                        }
                    });
            }
        });

    // Recompute the filtered view and stats after any checkbox change.
    if selection_changed {
        state.refilter();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} matching filters",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Bottom panel – statistics table
// ---------------------------------------------------------------------------

/// Render the two-column metric table for the current filtered view.
pub fn stats_panel(ui: &mut Ui, state: &AppState) {
    let Some(stats) = &state.stats else {
        return;
    };

    ui.strong("Summary statistics");
    ui.add_space(2.0);

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(200.0))
        .column(Column::remainder())
        .body(|mut body| {
            let mut metric = |label: &str, value: String| {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(label);
                    });
                    row.col(|ui| {
                        ui.monospace(value);
                    });
                });
            };

            metric("Total global sales (M)", format_value(stats.total_sales));
            metric("Mean global sales (M)", format_value(stats.mean_sales));
            metric("NA/EU sales correlation", format_value(stats.correlation));
            metric(
                "Correlation strength",
                stats.correlation_label.to_string(),
            );
            metric(
                "Top genre",
                stats.top_genre.clone().unwrap_or_else(|| "n/a".to_string()),
            );
            metric(
                "Top platform",
                stats
                    .top_platform
                    .clone()
                    .unwrap_or_else(|| "n/a".to_string()),
            );
        });
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "n/a".to_string()
    } else {
        format!("{v:.2}")
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records ({} genres, {} platforms)",
                    dataset.len(),
                    dataset.genres.len(),
                    dataset.platforms.len()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
