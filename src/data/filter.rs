use std::collections::BTreeSet;

use super::model::SalesDataset;

// ---------------------------------------------------------------------------
// Filter predicate: which category values are selected per column
// ---------------------------------------------------------------------------

/// Set of active values for one categorical column.
pub type SelectionSet = BTreeSet<String>;

/// Current filter selections for the two categorical columns.
///
/// A row passes only if its value is a member of the corresponding set, so an
/// empty set matches no rows and values absent from the dataset simply match
/// nothing. Neither case is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub genres: SelectionSet,
    pub platforms: SelectionSet,
}

/// Initialise a [`FilterState`] with all values selected (i.e., show everything).
pub fn init_filter_state(dataset: &SalesDataset) -> FilterState {
    FilterState {
        genres: dataset.genres.clone(),
        platforms: dataset.platforms.clone(),
    }
}

/// Return indices of records that pass both column filters, in source order.
///
/// A record passes when its genre is in `filters.genres` AND its platform is
/// in `filters.platforms`.
pub fn filtered_indices(dataset: &SalesDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            filters.genres.contains(&rec.genre) && filters.platforms.contains(&rec.platform)
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{SaleRecord, SalesDataset};

    fn rec(genre: &str, platform: &str) -> SaleRecord {
        SaleRecord {
            genre: genre.to_string(),
            platform: platform.to_string(),
            year: Some(2010),
            na_sales: 1.0,
            eu_sales: 1.0,
            jp_sales: 0.0,
            global_sales: 2.0,
        }
    }

    fn dataset() -> SalesDataset {
        SalesDataset::from_records(vec![
            rec("Action", "PS4"),
            rec("Sports", "PC"),
            rec("Action", "PC"),
            rec("Racing", "PS4"),
        ])
    }

    fn selection(values: &[&str]) -> SelectionSet {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn rows_must_match_both_columns() {
        let ds = dataset();
        let filters = FilterState {
            genres: selection(&["Action"]),
            platforms: selection(&["PC"]),
        };
        assert_eq!(filtered_indices(&ds, &filters), vec![2]);
    }

    #[test]
    fn disjoint_single_value_selections_yield_empty_result() {
        let ds = dataset();
        let filters = FilterState {
            genres: selection(&["Sports"]),
            platforms: selection(&["PS4"]),
        };
        assert!(filtered_indices(&ds, &filters).is_empty());
    }

    #[test]
    fn empty_selection_matches_no_rows() {
        let ds = dataset();
        let filters = FilterState {
            genres: SelectionSet::new(),
            platforms: selection(&["PS4", "PC"]),
        };
        assert!(filtered_indices(&ds, &filters).is_empty());
    }

    #[test]
    fn out_of_vocabulary_values_are_ignored() {
        let ds = dataset();
        let filters = FilterState {
            genres: selection(&["Action", "Puzzle"]),
            platforms: selection(&["PS4", "Dreamcast"]),
        };
        assert_eq!(filtered_indices(&ds, &filters), vec![0]);
    }

    #[test]
    fn source_order_is_preserved() {
        let ds = dataset();
        let filters = init_filter_state(&ds);
        assert_eq!(filtered_indices(&ds, &filters), vec![0, 1, 2, 3]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = dataset();
        let filters = FilterState {
            genres: selection(&["Action", "Racing"]),
            platforms: selection(&["PS4"]),
        };

        let once = filtered_indices(&ds, &filters);
        let filtered_records: Vec<_> = once.iter().map(|&i| ds.records[i].clone()).collect();

        let refiltered = SalesDataset::from_records(filtered_records.clone());
        let twice = filtered_indices(&refiltered, &filters);

        let twice_records: Vec<_> = twice.iter().map(|&i| refiltered.records[i].clone()).collect();
        assert_eq!(filtered_records, twice_records);
    }

    #[test]
    fn enlarging_a_selection_only_adds_rows() {
        let ds = dataset();
        let narrow = FilterState {
            genres: selection(&["Action"]),
            platforms: selection(&["PS4", "PC"]),
        };
        let wide = FilterState {
            genres: selection(&["Action", "Sports"]),
            platforms: selection(&["PS4", "PC"]),
        };

        let narrow_rows = filtered_indices(&ds, &narrow);
        let wide_rows = filtered_indices(&ds, &wide);
        assert!(narrow_rows.iter().all(|i| wide_rows.contains(i)));
    }
}
