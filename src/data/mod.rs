/// Data layer: core types, loading, and read-only views over the table.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → EarthquakeDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ EarthquakeDataset │  Vec<EarthquakeRecord>, source header
///   └──────────────────┘
///        │
///        ├──► filter   earthquakes within a radius → indices
///        └──► summary  histogram, max magnitude per degree
/// ```

pub mod loader;
pub mod model;
pub mod filter;
pub mod summary;
