use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, init_filter_state, FilterState, SelectionSet};
use crate::data::model::{CategoryColumn, SalesDataset};
use crate::data::stats::{compute_stats, SalesStats};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<SalesDataset>,

    /// Current genre/platform selections.
    pub filters: FilterState,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Statistics over the filtered view, recomputed on every filter change.
    pub stats: Option<SalesStats>,

    /// Which categorical column drives the category charts and point colours.
    pub category_axis: CategoryColumn,

    /// Colour map over the active category column.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            stats: None,
            category_axis: CategoryColumn::Genre,
            color_map: None,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset, initialise filters, stats, and colours.
    pub fn set_dataset(&mut self, dataset: SalesDataset) {
        self.filters = init_filter_state(&dataset);
        self.visible_indices = (0..dataset.len()).collect();
        self.stats = Some(compute_stats(&dataset, &self.visible_indices));
        self.color_map = Some(ColorMap::new(dataset.unique_values(self.category_axis)));

        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Recompute the filtered view and its statistics after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filters);
            self.stats = Some(compute_stats(ds, &self.visible_indices));
        }
    }

    /// Switch the category axis and rebuild the colour map.
    pub fn set_category_axis(&mut self, column: CategoryColumn) {
        self.category_axis = column;
        if let Some(ds) = &self.dataset {
            self.color_map = Some(ColorMap::new(ds.unique_values(column)));
        }
    }

    /// Toggle a single value in a column's selection.
    pub fn toggle_filter_value(&mut self, column: CategoryColumn, value: &str) {
        let selected = self.selection_mut(column);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: CategoryColumn) {
        if let Some(ds) = &self.dataset {
            let all = ds.unique_values(column).clone();
            *self.selection_mut(column) = all;
            self.refilter();
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: CategoryColumn) {
        self.selection_mut(column).clear();
        self.refilter();
    }

    fn selection_mut(&mut self, column: CategoryColumn) -> &mut SelectionSet {
        match column {
            CategoryColumn::Genre => &mut self.filters.genres,
            CategoryColumn::Platform => &mut self.filters.platforms,
        }
    }
}
