/// Data layer: loading, cleaning, filtering and aggregation.
///
/// Architecture:
/// ```text
///  metadata.csv / .json ──► metadata_sample.csv (written once)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  first N rows → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  defaults, dates, year, word count → PaperTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year range + journal → filtered PaperTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  per-year, top journals, top sources, title corpus
///   └───────────┘
/// ```
///
/// `pipeline` ties loader and cleaner together behind a caller-owned memo.

pub mod aggregate;
pub mod clean;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
