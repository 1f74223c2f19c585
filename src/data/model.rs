use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// SaleRecord – one row of the sales table
// ---------------------------------------------------------------------------

/// A single sales record (one row of the source table).
///
/// The column set is fixed and validated once at the loading boundary, so
/// downstream code never inspects types at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub genre: String,
    pub platform: String,
    /// Release year; `None` when the source cell is empty or `N/A`.
    pub year: Option<i32>,
    /// Regional sales, in millions of units.
    pub na_sales: f64,
    pub eu_sales: f64,
    pub jp_sales: f64,
    pub global_sales: f64,
}

// ---------------------------------------------------------------------------
// CategoryColumn – the two filterable/groupable columns
// ---------------------------------------------------------------------------

/// The categorical columns a record can be filtered or grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryColumn {
    Genre,
    Platform,
}

impl CategoryColumn {
    /// The value of this column in the given record.
    pub fn value_of<'a>(&self, record: &'a SaleRecord) -> &'a str {
        match self {
            CategoryColumn::Genre => &record.genre,
            CategoryColumn::Platform => &record.platform,
        }
    }
}

impl fmt::Display for CategoryColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryColumn::Genre => write!(f, "Genre"),
            CategoryColumn::Platform => write!(f, "Platform"),
        }
    }
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed category indices.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    /// All records (rows), in source order.
    pub records: Vec<SaleRecord>,
    /// Sorted set of unique genre values.
    pub genres: BTreeSet<String>,
    /// Sorted set of unique platform values.
    pub platforms: BTreeSet<String>,
    /// Min/max year over records that have one.
    pub year_range: Option<(i32, i32)>,
}

impl SalesDataset {
    /// Build category indices from the loaded records.
    pub fn from_records(records: Vec<SaleRecord>) -> Self {
        let mut genres = BTreeSet::new();
        let mut platforms = BTreeSet::new();
        let mut year_range: Option<(i32, i32)> = None;

        for rec in &records {
            genres.insert(rec.genre.clone());
            platforms.insert(rec.platform.clone());
            if let Some(y) = rec.year {
                year_range = Some(match year_range {
                    Some((lo, hi)) => (lo.min(y), hi.max(y)),
                    None => (y, y),
                });
            }
        }

        SalesDataset {
            records,
            genres,
            platforms,
            year_range,
        }
    }

    /// Sorted unique values of the given categorical column.
    pub fn unique_values(&self, column: CategoryColumn) -> &BTreeSet<String> {
        match column {
            CategoryColumn::Genre => &self.genres,
            CategoryColumn::Platform => &self.platforms,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(genre: &str, platform: &str, year: Option<i32>) -> SaleRecord {
        SaleRecord {
            genre: genre.to_string(),
            platform: platform.to_string(),
            year,
            na_sales: 0.0,
            eu_sales: 0.0,
            jp_sales: 0.0,
            global_sales: 0.0,
        }
    }

    #[test]
    fn from_records_collects_unique_categories_and_year_range() {
        let ds = SalesDataset::from_records(vec![
            rec("Action", "PS4", Some(2014)),
            rec("Sports", "PC", Some(2010)),
            rec("Action", "PC", None),
        ]);

        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.genres.iter().collect::<Vec<_>>(),
            vec!["Action", "Sports"]
        );
        assert_eq!(ds.platforms.iter().collect::<Vec<_>>(), vec!["PC", "PS4"]);
        assert_eq!(ds.year_range, Some((2010, 2014)));
    }

    #[test]
    fn year_range_is_none_when_no_record_has_a_year() {
        let ds = SalesDataset::from_records(vec![rec("Action", "PS4", None)]);
        assert_eq!(ds.year_range, None);
    }
}
