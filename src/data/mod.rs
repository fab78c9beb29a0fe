/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RecordSet (cached per path)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year / continent / selection → borrowed row views
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  views → scatter, time series, means, density, table
///   └───────────┘
/// ```
///
/// `pipeline` runs filter + aggregate for one `FilterState`.

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
