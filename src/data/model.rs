use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MetadataValue – a single typed parameter value
// ---------------------------------------------------------------------------

/// A dynamically-typed metadata value, covering the parameter datatypes that
/// occur in spectral-library headers.
/// Using `BTreeMap` / `BTreeSet` downstream so `MetadataValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put MetadataValue in BTreeSet --

impl Eq for MetadataValue {}

impl PartialOrd for MetadataValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MetadataValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use MetadataValue::*;
        fn discriminant(v: &MetadataValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for MetadataValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            MetadataValue::String(s) => s.hash(state),
            MetadataValue::Integer(i) => i.hash(state),
            MetadataValue::Float(f) => f.to_bits().hash(state),
            MetadataValue::Bool(b) => b.hash(state),
            MetadataValue::Null => {}
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{s}"),
            MetadataValue::Integer(i) => write!(f, "{i}"),
            MetadataValue::Float(v) => write!(f, "{v}"),
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::Null => write!(f, "<null>"),
        }
    }
}

impl MetadataValue {
    /// Try to interpret the value as an `f64` (used for SI conversion
    /// factors and other numeric parameters).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Float(v) => Some(*v),
            MetadataValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Borrow the value as a string when it holds text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// DataKind – the declared datatype of a PARAM or FIELD
// ---------------------------------------------------------------------------

/// Datatype subset used by spectral-library documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataKind {
    Float,
    Double,
    Int,
    Char,
}

impl DataKind {
    /// Parse a declared datatype attribute. Returns `None` for anything
    /// outside the supported subset.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "float" => Some(DataKind::Float),
            "double" => Some(DataKind::Double),
            "int" => Some(DataKind::Int),
            "char" => Some(DataKind::Char),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Float => "float",
            DataKind::Double => "double",
            DataKind::Int => "int",
            DataKind::Char => "char",
        }
    }

    /// Whether cells of this kind hold floating-point numbers.
    pub fn is_floating(&self) -> bool {
        matches!(self, DataKind::Float | DataKind::Double)
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Param – one named metadata parameter
// ---------------------------------------------------------------------------

/// A key/value metadata entry from the document header: curation info,
/// provenance, axis identifiers, unit conversion factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: MetadataValue,
    pub datatype: Option<DataKind>,
    pub unit: Option<String>,
    pub ucd: Option<String>,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Field – one column descriptor
// ---------------------------------------------------------------------------

/// Describes a table column: identifier, name, unit, UCD semantic tag,
/// datatype and free-text description. A conforming spectral document has
/// exactly two: the wavelength column followed by the flux column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: Option<String>,
    pub name: String,
    pub unit: Option<String>,
    pub ucd: Option<String>,
    pub datatype: DataKind,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Sample – one (wavelength, flux) row
// ---------------------------------------------------------------------------

/// One table row: wavelength in the spectral axis unit (Angstrom), flux in
/// the flux axis unit (erg/cm²/s/Å).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub wavelength: f64,
    pub flux: f64,
}

// ---------------------------------------------------------------------------
// SpectralDocument – one parsed dataset
// ---------------------------------------------------------------------------

/// A complete parsed spectral-library entry: header parameters, the two
/// column descriptors and the ordered rows. Immutable once parsed; safe to
/// share across any number of readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralDocument {
    /// Header parameters in document order (curation group first).
    pub params: Vec<Param>,
    /// Column descriptors in declaration order: wavelength, then flux.
    pub fields: Vec<Field>,
    /// Table rows in document order.
    pub samples: Vec<Sample>,
}

impl SpectralDocument {
    /// Look up a header parameter by name. Lookup is case-insensitive;
    /// published files are inconsistent about casing.
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    fn param_str(&self, name: &str) -> Option<&str> {
        self.param(name).and_then(|p| p.value.as_str())
    }

    fn param_f64(&self, name: &str) -> Option<f64> {
        self.param(name).and_then(|p| p.value.as_f64())
    }

    /// Dataset title.
    pub fn title(&self) -> Option<&str> {
        self.param_str("DatasetTitle")
            .or_else(|| self.param_str("Title"))
    }

    /// Collection the dataset belongs to.
    pub fn collection(&self) -> Option<&str> {
        self.param_str("Collection")
    }

    /// Publisher named in the curation group.
    pub fn publisher(&self) -> Option<&str> {
        self.param_str("Publisher")
    }

    /// Curation contact name.
    pub fn contact_name(&self) -> Option<&str> {
        self.param_str("ContactName")
            .or_else(|| self.param_str("Contact"))
    }

    /// Curation contact email.
    pub fn contact_email(&self) -> Option<&str> {
        self.param_str("ContactEmail")
    }

    /// Spectral type label (e.g. "L5", "M8").
    pub fn spectral_type(&self) -> Option<&str> {
        self.param_str("SpectralType")
    }

    /// Identifier of the spectral axis column.
    pub fn spectral_axis(&self) -> Option<&str> {
        self.param_str("SpectralAxis")
    }

    /// Identifier of the flux axis column.
    pub fn flux_axis(&self) -> Option<&str> {
        self.param_str("FluxAxis")
    }

    /// Multiplier converting wavelength values to SI (meters).
    pub fn spectral_si(&self) -> Option<f64> {
        self.param_f64("SpectralSI")
    }

    /// Multiplier converting flux values to SI (W/m³).
    pub fn flux_si(&self) -> Option<f64> {
        self.param_f64("FluxSI")
    }

    /// Display unit of the wavelength column.
    pub fn spectral_units(&self) -> Option<&str> {
        self.fields.first().and_then(|f| f.unit.as_deref())
    }

    /// Display unit of the flux column.
    pub fn flux_units(&self) -> Option<&str> {
        self.fields.get(1).and_then(|f| f.unit.as_deref())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Restartable iterator over the rows; each call starts again from the
    /// first sample.
    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// First row, if any.
    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    /// Last row, if any.
    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }
}

// ---------------------------------------------------------------------------
// SpectralCollection – a set of documents loaded from disk
// ---------------------------------------------------------------------------

/// One document plus the path it was loaded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub path: PathBuf,
    pub document: SpectralDocument,
}

/// A loaded set of spectral documents with a pre-computed parameter index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectralCollection {
    /// All loaded entries, ordered by path.
    pub entries: Vec<CollectionEntry>,
    /// Ordered list of parameter names seen anywhere in the collection.
    pub param_names: Vec<String>,
    /// For each parameter name the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<MetadataValue>>,
}

impl SpectralCollection {
    /// Build the parameter index from the loaded entries.
    pub fn from_entries(entries: Vec<CollectionEntry>) -> Self {
        let mut param_names_set: BTreeSet<String> = BTreeSet::new();
        let mut unique_values: BTreeMap<String, BTreeSet<MetadataValue>> = BTreeMap::new();

        for entry in &entries {
            for param in &entry.document.params {
                param_names_set.insert(param.name.clone());
                unique_values
                    .entry(param.name.clone())
                    .or_default()
                    .insert(param.value.clone());
            }
        }
        let param_names: Vec<String> = param_names_set.into_iter().collect();
        SpectralCollection {
            entries,
            param_names,
            unique_values,
        }
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
