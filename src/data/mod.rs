/// Data layer: launch table, loading, filtering and chart models.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → LaunchDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ LaunchDataset │  Vec<LaunchRecord>, sites, payload bounds
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  site + payload window → record indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  chart    │  indices → PieChart / ScatterChart
///   └──────────┘
/// ```

pub mod chart;
pub mod filter;
pub mod loader;
pub mod model;
