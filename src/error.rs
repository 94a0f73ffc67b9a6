use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// FormatError – schema / structure violations in spectral-library documents
// ---------------------------------------------------------------------------

/// Everything that can go wrong while reading, validating or exporting a
/// spectral-library document. Each variant carries a human-readable location
/// hint (element name, row/column index, or byte offset).
#[derive(Debug, Error)]
pub enum FormatError {
    /// File could not be read or written.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The XML envelope itself is malformed (unbalanced tags, bad entities).
    #[error("malformed XML near byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// The file extension is not one of the recognized document extensions.
    #[error("unsupported file extension '.{extension}'")]
    UnsupportedExtension { extension: String },

    /// A required element is absent from its parent.
    #[error("<{location}>: required element <{element}> is missing")]
    MissingElement {
        location: &'static str,
        element: &'static str,
    },

    /// A required attribute is absent from an element.
    #[error("<{element}>: required attribute '{attribute}' is missing")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// A FIELD declares a datatype outside the supported subset.
    #[error("<FIELD name=\"{name}\">: unsupported datatype '{datatype}'")]
    UnsupportedDatatype { name: String, datatype: String },

    /// A PARAM value does not parse as its declared datatype.
    #[error("<PARAM name=\"{name}\">: '{value}' is not a valid {datatype}")]
    BadParamValue {
        name: String,
        value: String,
        datatype: String,
    },

    /// The table does not declare the expected number of columns.
    #[error("expected {expected} FIELD declarations, found {found}")]
    FieldCount { expected: usize, found: usize },

    /// A column is declared with a non-floating-point datatype.
    #[error("<FIELD name=\"{name}\">: expected a floating-point column, found '{datatype}'")]
    NonNumericField { name: String, datatype: String },

    /// A row has the wrong number of cells.
    #[error("row {row}: expected {expected} cells, found {found}")]
    CellCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A cell does not parse as a floating-point number.
    #[error("row {row}, column {column} ({name}): '{value}' is not a number")]
    BadCell {
        row: usize,
        column: usize,
        name: String,
        value: String,
    },

    /// The spectral axis is not strictly increasing.
    #[error("row {row}: wavelength {value} does not increase past {previous}")]
    NonMonotonicWavelength {
        row: usize,
        previous: f64,
        value: f64,
    },

    /// A flux cell holds NaN or an infinity.
    #[error("row {row}: flux {value} is not finite")]
    NonFiniteFlux { row: usize, value: f64 },

    /// CSV export failed.
    #[error("CSV export: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    /// JSON export failed.
    #[error("JSON export: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },
}
