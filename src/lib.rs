//! Reader, validator and writer for SpeX Prism spectral-library documents.
//!
//! Each document is one astronomical spectrum stored in a tabular XML
//! format: descriptive header parameters (curation, provenance, units,
//! column definitions) plus a two-column table of (wavelength, flux) rows
//! ordered by increasing wavelength.
//!
//! The parse is a one-shot, synchronous, fully local operation. Parsed
//! documents are immutable and safe to share across any number of readers.

pub mod data;
pub mod error;

pub use data::filter::{FilterState, filtered_indices, init_filter_state};
pub use data::loader::{load_dir, load_file, parse_votable};
pub use data::model::{
    CollectionEntry, DataKind, Field, MetadataValue, Param, Sample, SpectralCollection,
    SpectralDocument,
};
pub use data::validate::validate;
pub use data::writer::{export_csv, export_json, write_votable, write_votable_file};
pub use error::FormatError;
