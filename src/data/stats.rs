use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;

use super::model::{CategoryColumn, SalesDataset};

// ---------------------------------------------------------------------------
// CorrelationLabel – qualitative reading of the coefficient
// ---------------------------------------------------------------------------

/// Three-way classification of the NA/EU correlation strength.
///
/// Thresholds are literal: `r > 0.7` is strong, `0.4 < r <= 0.7` is moderate,
/// everything else (including NaN and negative values) is weak or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationLabel {
    StrongPositive,
    Moderate,
    WeakOrNone,
}

impl CorrelationLabel {
    pub fn classify(r: f64) -> Self {
        if r > 0.7 {
            CorrelationLabel::StrongPositive
        } else if r > 0.4 {
            CorrelationLabel::Moderate
        } else {
            CorrelationLabel::WeakOrNone
        }
    }
}

impl fmt::Display for CorrelationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationLabel::StrongPositive => write!(f, "strong positive"),
            CorrelationLabel::Moderate => write!(f, "moderate"),
            CorrelationLabel::WeakOrNone => write!(f, "weak or none"),
        }
    }
}

// ---------------------------------------------------------------------------
// SalesStats – descriptive statistics over the filtered rows
// ---------------------------------------------------------------------------

/// Summary statistics for one filtered view of the dataset.
///
/// Degenerate inputs (no rows, zero variance) produce NaN / `None` sentinels
/// rather than errors.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesStats {
    /// Pearson correlation between NA and EU sales; NaN when undefined.
    pub correlation: f64,
    pub correlation_label: CorrelationLabel,
    /// Sum of global sales; 0.0 for an empty view.
    pub total_sales: f64,
    /// Mean of global sales; NaN for an empty view.
    pub mean_sales: f64,
    /// Genre with the highest summed global sales.
    pub top_genre: Option<String>,
    /// Platform with the highest summed global sales.
    pub top_platform: Option<String>,
}

/// Compute the statistics table for the filtered view given by `indices`.
pub fn compute_stats(dataset: &SalesDataset, indices: &[usize]) -> SalesStats {
    let na: Vec<f64> = indices.iter().map(|&i| dataset.records[i].na_sales).collect();
    let eu: Vec<f64> = indices.iter().map(|&i| dataset.records[i].eu_sales).collect();
    let correlation = pearson(&na, &eu);

    let total_sales: f64 = indices
        .iter()
        .map(|&i| dataset.records[i].global_sales)
        .sum();
    let mean_sales = if indices.is_empty() {
        f64::NAN
    } else {
        total_sales / indices.len() as f64
    };

    SalesStats {
        correlation,
        correlation_label: CorrelationLabel::classify(correlation),
        total_sales,
        mean_sales,
        top_genre: top_category(dataset, indices, CategoryColumn::Genre),
        top_platform: top_category(dataset, indices, CategoryColumn::Platform),
    }
}

// ---------------------------------------------------------------------------
// Group aggregations (shared with the charts)
// ---------------------------------------------------------------------------

/// Sum global sales per value of the given categorical column.
///
/// Groups appear in first-encountered row order, which also fixes the
/// tie-break for [`compute_stats`]'s top-category fields.
pub fn sales_by_category(
    dataset: &SalesDataset,
    indices: &[usize],
    column: CategoryColumn,
) -> IndexMap<String, f64> {
    let mut sums: IndexMap<String, f64> = IndexMap::new();
    for &i in indices {
        let rec = &dataset.records[i];
        *sums.entry(column.value_of(rec).to_string()).or_insert(0.0) += rec.global_sales;
    }
    sums
}

/// Sum global sales per release year, sorted by year.
/// Records without a year are skipped.
pub fn sales_by_year(dataset: &SalesDataset, indices: &[usize]) -> BTreeMap<i32, f64> {
    let mut sums: BTreeMap<i32, f64> = BTreeMap::new();
    for &i in indices {
        let rec = &dataset.records[i];
        if let Some(year) = rec.year {
            *sums.entry(year).or_insert(0.0) += rec.global_sales;
        }
    }
    sums
}

fn top_category(
    dataset: &SalesDataset,
    indices: &[usize],
    column: CategoryColumn,
) -> Option<String> {
    sales_by_category(dataset, indices, column)
        .into_iter()
        // Strict comparison keeps the first-encountered group on ties.
        .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
        .map(|(category, _)| category)
}

// ---------------------------------------------------------------------------
// Pearson correlation
// ---------------------------------------------------------------------------

/// Pearson correlation coefficient between two equally long samples.
///
/// Returns NaN for fewer than two observations or (near-)zero variance in
/// either sample, instead of dividing by zero.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }

    let mut sum_x = 0.0_f64;
    let mut sum_y = 0.0_f64;
    let mut sum_xy = 0.0_f64;
    let mut sum_x2 = 0.0_f64;
    let mut sum_y2 = 0.0_f64;
    for i in 0..n {
        sum_x += x[i];
        sum_y += y[i];
        sum_xy += x[i] * y[i];
        sum_x2 += x[i] * x[i];
        sum_y2 += y[i] * y[i];
    }

    let n_f = n as f64;
    let cov = sum_xy - sum_x * sum_y / n_f;
    let var_x = sum_x2 - sum_x * sum_x / n_f;
    let var_y = sum_y2 - sum_y * sum_y / n_f;

    let denom = (var_x * var_y).sqrt();
    if !denom.is_finite() || denom < f64::EPSILON {
        f64::NAN
    } else {
        (cov / denom).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filtered_indices, FilterState};
    use crate::data::model::{SaleRecord, SalesDataset};

    fn rec(genre: &str, platform: &str, year: i32, na: f64, eu: f64, global: f64) -> SaleRecord {
        SaleRecord {
            genre: genre.to_string(),
            platform: platform.to_string(),
            year: Some(year),
            na_sales: na,
            eu_sales: eu,
            jp_sales: 0.0,
            global_sales: global,
        }
    }

    fn all_indices(ds: &SalesDataset) -> Vec<usize> {
        (0..ds.len()).collect()
    }

    #[test]
    fn worked_example_with_action_ps4_selection() {
        let ds = SalesDataset::from_records(vec![
            rec("Action", "PS4", 2010, 1.0, 1.0, 2.0),
            rec("Action", "PS4", 2011, 2.0, 2.0, 4.0),
            rec("Sports", "PC", 2010, 0.0, 5.0, 5.0),
        ]);
        let filters = FilterState {
            genres: ["Action".to_string()].into(),
            platforms: ["PS4".to_string()].into(),
        };

        let indices = filtered_indices(&ds, &filters);
        assert_eq!(indices, vec![0, 1]);

        let stats = compute_stats(&ds, &indices);
        assert_eq!(stats.total_sales, 6.0);
        assert_eq!(stats.mean_sales, 3.0);
        assert!((stats.correlation - 1.0).abs() < 1e-12);
        assert_eq!(stats.correlation_label, CorrelationLabel::StrongPositive);
        assert_eq!(stats.top_genre.as_deref(), Some("Action"));
        assert_eq!(stats.top_platform.as_deref(), Some("PS4"));
    }

    #[test]
    fn label_thresholds_are_literal() {
        assert_eq!(
            CorrelationLabel::classify(0.71),
            CorrelationLabel::StrongPositive
        );
        // exact boundaries fall into the weaker class
        assert_eq!(CorrelationLabel::classify(0.7), CorrelationLabel::Moderate);
        assert_eq!(CorrelationLabel::classify(0.5), CorrelationLabel::Moderate);
        assert_eq!(CorrelationLabel::classify(0.4), CorrelationLabel::WeakOrNone);
        assert_eq!(CorrelationLabel::classify(0.0), CorrelationLabel::WeakOrNone);
        assert_eq!(
            CorrelationLabel::classify(f64::NAN),
            CorrelationLabel::WeakOrNone
        );
    }

    #[test]
    fn strong_negative_correlation_is_labelled_weak_or_none() {
        let ds = SalesDataset::from_records(vec![
            rec("Action", "PS4", 2010, 1.0, 3.0, 1.0),
            rec("Action", "PS4", 2011, 2.0, 2.0, 1.0),
            rec("Action", "PS4", 2012, 3.0, 1.0, 1.0),
        ]);
        let stats = compute_stats(&ds, &all_indices(&ds));
        assert!((stats.correlation + 1.0).abs() < 1e-12);
        assert_eq!(stats.correlation_label, CorrelationLabel::WeakOrNone);
    }

    #[test]
    fn correlation_stays_within_bounds() {
        let ds = SalesDataset::from_records(vec![
            rec("Action", "PS4", 2010, 1.0, 0.4, 1.0),
            rec("Action", "PS4", 2011, 2.5, 1.9, 1.0),
            rec("Sports", "PC", 2012, 0.3, 0.9, 1.0),
            rec("Racing", "PC", 2013, 4.1, 2.2, 1.0),
        ]);
        let stats = compute_stats(&ds, &all_indices(&ds));
        assert!(stats.correlation >= -1.0 && stats.correlation <= 1.0);
    }

    #[test]
    fn empty_view_yields_sentinels() {
        let ds = SalesDataset::from_records(vec![rec("Action", "PS4", 2010, 1.0, 1.0, 2.0)]);
        let stats = compute_stats(&ds, &[]);

        assert_eq!(stats.total_sales, 0.0);
        assert!(stats.mean_sales.is_nan());
        assert!(stats.correlation.is_nan());
        assert_eq!(stats.correlation_label, CorrelationLabel::WeakOrNone);
        assert_eq!(stats.top_genre, None);
        assert_eq!(stats.top_platform, None);
    }

    #[test]
    fn single_row_has_undefined_correlation() {
        let ds = SalesDataset::from_records(vec![rec("Action", "PS4", 2010, 1.0, 1.0, 2.0)]);
        let stats = compute_stats(&ds, &[0]);
        assert!(stats.correlation.is_nan());
        assert_eq!(stats.total_sales, 2.0);
        assert_eq!(stats.mean_sales, 2.0);
    }

    #[test]
    fn zero_variance_column_has_undefined_correlation() {
        let ds = SalesDataset::from_records(vec![
            rec("Action", "PS4", 2010, 1.0, 0.5, 1.0),
            rec("Action", "PS4", 2011, 1.0, 2.5, 1.0),
            rec("Action", "PS4", 2012, 1.0, 4.5, 1.0),
        ]);
        let stats = compute_stats(&ds, &all_indices(&ds));
        assert!(stats.correlation.is_nan());
    }

    #[test]
    fn top_category_tie_goes_to_first_encountered_group() {
        let ds = SalesDataset::from_records(vec![
            rec("Sports", "PC", 2010, 0.0, 0.0, 3.0),
            rec("Action", "PS4", 2010, 0.0, 0.0, 3.0),
        ]);
        let stats = compute_stats(&ds, &all_indices(&ds));
        assert_eq!(stats.top_genre.as_deref(), Some("Sports"));
        assert_eq!(stats.top_platform.as_deref(), Some("PC"));
    }

    #[test]
    fn group_sums_accumulate_per_category_and_year() {
        let ds = SalesDataset::from_records(vec![
            rec("Action", "PS4", 2010, 0.0, 0.0, 2.0),
            rec("Action", "PC", 2011, 0.0, 0.0, 4.0),
            rec("Sports", "PC", 2010, 0.0, 0.0, 5.0),
        ]);
        let indices = all_indices(&ds);

        let by_genre = sales_by_category(&ds, &indices, CategoryColumn::Genre);
        assert_eq!(by_genre.get("Action"), Some(&6.0));
        assert_eq!(by_genre.get("Sports"), Some(&5.0));

        let by_year = sales_by_year(&ds, &indices);
        assert_eq!(by_year.get(&2010), Some(&7.0));
        assert_eq!(by_year.get(&2011), Some(&4.0));
    }
}
