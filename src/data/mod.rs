/// Data layer: core types, loading, and extraction.
///
/// Architecture:
/// ```text
///   data/*.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable (or a warning)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ RawTable  │  headers + text cells, read-only
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ extract   │  entity filter + coercion → CanonicalSeries
///   └──────────┘
/// ```

pub mod extract;
pub mod loader;
pub mod model;
