/// Data layer: loading, typing, filtering, preview, and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable (cells as text)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  RawTable → Dataset (typed Events, source columns)
///   └──────────┘
///        │   cached per path by `store`
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec → ordered predicates → FilteredView
///   └──────────┘
///        │
///        ├──► preview   first N rows as a Grid
///        └──► export    all rows back to CSV
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod preview;
pub mod store;
pub mod timestamp;
