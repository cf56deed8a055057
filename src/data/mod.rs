/// Data layer: core types, loading, filtering, aggregation and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SalesTable (Date normalised)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range ∧ category ∧ region → filtered SalesTable
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌───────────┐  ┌──────────┐
///   │ aggregate  │  │  export   │  metrics + series / CSV bytes
///   └───────────┘  └──────────┘
///        │              │
///        └──── pipeline ┘  one DashboardView per selection
/// ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod grid;
pub mod loader;
pub mod model;
pub mod pipeline;
