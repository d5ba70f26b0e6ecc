/// Data layer: core types and loading.
///
/// Architecture:
/// ```text
///  .csv / .json / remote fallback
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate schema → Dataset (cached per source)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, group/week/user indices, immutable
///   └──────────┘
///        │
///        ▼
///   agg / quartile / chart   derive fresh values per view evaluation
/// ```
pub mod loader;
pub mod model;
