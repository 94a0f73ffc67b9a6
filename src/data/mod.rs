/// Data layer: core types, parsing, serialization, validation, filtering.
///
/// Architecture:
/// ```text
///  .vot / .xml / .votable
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  XML envelope → element tree → SpectralDocument
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ SpectralDocument  │  params, fields, ordered samples
///   └──────────────────┘
///     │          │
///     ▼          ▼
///   ┌──────────┐  ┌──────────┐
///   │ validate  │  │  writer   │  invariant checks / canonical XML, CSV, JSON
///   └──────────┘  └──────────┘
///
///  directories of documents load into a SpectralCollection, which the
///  filter module narrows by parameter value.
/// ```
pub mod filter;
pub mod loader;
pub mod model;
pub mod validate;
pub mod writer;
