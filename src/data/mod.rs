/// Data layer: input model and the bloom derivation.
///
/// Architecture:
/// ```text
///  widgets (region / dates / index)
///        │
///        ▼
///   ┌─────────┐
///   │  model   │  presets, BoundingBox, DateRange, VegIndex, IndexScale
///   └─────────┘
///        │
///        ▼
///   ┌─────────┐
///   │  bloom   │  pairwise masked-difference specs over a lazy query
///   └─────────┘
/// ```
pub mod bloom;
pub mod model;
