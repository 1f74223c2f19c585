/// Data layer: core types, loading, filtering, and statistics.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SalesDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SalesDataset  │  Vec<SaleRecord>, category indices
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply category selections → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  aggregates + correlation over the filtered view
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
