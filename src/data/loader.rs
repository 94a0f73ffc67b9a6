use std::fs;
use std::path::Path;

use log::warn;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::model::{
    CollectionEntry, DataKind, Field, MetadataValue, Param, Sample, SpectralCollection,
    SpectralDocument,
};
use crate::error::FormatError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a spectral document from a file. Dispatch by extension.
///
/// Recognized extensions: `.vot`, `.xml`, `.votable`.
pub fn load_file(path: &Path) -> Result<SpectralDocument, FormatError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "vot" | "xml" | "votable" => {
            let text = fs::read_to_string(path).map_err(|source| FormatError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_votable(&text)
        }
        other => Err(FormatError::UnsupportedExtension {
            extension: other.to_string(),
        }),
    }
}

/// Load every recognized document in a directory into a collection.
///
/// Files that fail to parse are skipped with a logged warning; a single
/// corrupt entry must not hide the rest of the library.
pub fn load_dir(dir: &Path) -> Result<SpectralCollection, FormatError> {
    let read = fs::read_dir(dir).map_err(|source| FormatError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for dir_entry in read {
        let dir_entry = dir_entry.map_err(|source| FormatError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir_entry.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if !matches!(ext.as_str(), "vot" | "xml" | "votable") {
            continue;
        }
        match load_file(&path) {
            Ok(document) => entries.push(CollectionEntry { path, document }),
            Err(e) => warn!("skipping {}: {e}", path.display()),
        }
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(SpectralCollection::from_entries(entries))
}

/// Parse a spectral-library document from its XML text.
///
/// The parse runs in two stages: the envelope is read into a generic
/// element tree, then the header parameters, column descriptors and rows
/// are extracted into the typed model.
pub fn parse_votable(text: &str) -> Result<SpectralDocument, FormatError> {
    let root = parse_tree(text)?;
    let resource = find_resource(&root)?;
    let table = resource
        .child("TABLE")
        .ok_or(FormatError::MissingElement {
            location: "RESOURCE",
            element: "TABLE",
        })?;

    let params = extract_params(resource)?;
    let fields = extract_fields(table)?;
    let samples = extract_rows(table, &fields)?;

    Ok(SpectralDocument {
        params,
        fields,
        samples,
    })
}

/// Best-effort typing for a parameter value without a declared datatype.
pub fn guess_param_value(s: &str) -> MetadataValue {
    if s.is_empty() {
        return MetadataValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return MetadataValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return MetadataValue::Float(f);
    }
    if s == "true" || s == "false" {
        return MetadataValue::Bool(s == "true");
    }
    MetadataValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// XML element tree
// ---------------------------------------------------------------------------

/// A generic XML element: tag name, attributes, child elements and the
/// concatenated (trimmed) character data.
#[derive(Debug, Clone)]
struct XmlElement {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

fn xml_error(position: u64, source: impl Into<quick_xml::Error>) -> FormatError {
    FormatError::Xml {
        position,
        source: source.into(),
    }
}

fn element_from(start: &BytesStart<'_>, position: u64) -> Result<XmlElement, FormatError> {
    let name = String::from_utf8_lossy(start.name().local_name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| xml_error(position, e))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| xml_error(position, e))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(XmlElement {
        name,
        attrs,
        children: Vec::new(),
        text: String::new(),
    })
}

/// Read the whole envelope into a tree of [`XmlElement`]s.
fn parse_tree(text: &str) -> Result<XmlElement, FormatError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event() {
            Err(source) => return Err(xml_error(position, source)),
            Ok(Event::Start(start)) => {
                stack.push(element_from(&start, position)?);
            }
            Ok(Event::Empty(start)) => {
                let element = element_from(&start, position)?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                // The reader rejects mismatched end tags, so the stack top
                // is always the element being closed.
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Ok(Event::Text(t)) => {
                let unescaped = t.unescape().map_err(|e| xml_error(position, e))?;
                push_text(&mut stack, &unescaped);
            }
            Ok(Event::CData(t)) => {
                let raw = String::from_utf8_lossy(&t.into_inner()).into_owned();
                push_text(&mut stack, &raw);
            }
            Ok(Event::Eof) => break,
            // Declarations, comments and processing instructions carry no data.
            Ok(_) => {}
        }
    }

    root.ok_or(FormatError::MissingElement {
        location: "document",
        element: "RESOURCE",
    })
}

fn attach(stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        // Keep the first top-level element; anything after it is ignored.
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn push_text(stack: &mut [XmlElement], text: &str) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    if let Some(top) = stack.last_mut() {
        if !top.text.is_empty() {
            top.text.push(' ');
        }
        top.text.push_str(trimmed);
    }
}

// ---------------------------------------------------------------------------
// Envelope extraction
// ---------------------------------------------------------------------------

/// The document root is `<RESOURCE type="results">`; files in the wild may
/// wrap it in a `<VOTABLE>` envelope, so descend one level when present.
fn find_resource(root: &XmlElement) -> Result<&XmlElement, FormatError> {
    if root.name == "RESOURCE" {
        return Ok(root);
    }
    if root.name == "VOTABLE" {
        return root.child("RESOURCE").ok_or(FormatError::MissingElement {
            location: "VOTABLE",
            element: "RESOURCE",
        });
    }
    Err(FormatError::MissingElement {
        location: "document",
        element: "RESOURCE",
    })
}

/// Collect `<PARAM>`s in document order from the resource and its table,
/// including those nested inside `<GROUP>` blocks (the curation group).
fn extract_params(resource: &XmlElement) -> Result<Vec<Param>, FormatError> {
    let mut params = Vec::new();
    collect_params(resource, &mut params)?;
    Ok(params)
}

fn collect_params(element: &XmlElement, out: &mut Vec<Param>) -> Result<(), FormatError> {
    for child in &element.children {
        match child.name.as_str() {
            "PARAM" => out.push(param_from(child)?),
            // DATA holds only rows; everything else may nest PARAMs.
            "DATA" => {}
            _ => collect_params(child, out)?,
        }
    }
    Ok(())
}

fn param_from(element: &XmlElement) -> Result<Param, FormatError> {
    let name = element
        .attr("name")
        .ok_or(FormatError::MissingAttribute {
            element: "PARAM",
            attribute: "name",
        })?
        .to_string();
    let raw_value = element.attr("value").ok_or(FormatError::MissingAttribute {
        element: "PARAM",
        attribute: "value",
    })?;

    let datatype = match element.attr("datatype") {
        Some(s) => Some(
            DataKind::parse(s).ok_or_else(|| FormatError::UnsupportedDatatype {
                name: name.clone(),
                datatype: s.to_string(),
            })?,
        ),
        None => None,
    };

    let value = match datatype {
        Some(kind @ (DataKind::Float | DataKind::Double)) => MetadataValue::Float(
            raw_value
                .parse::<f64>()
                .map_err(|_| FormatError::BadParamValue {
                    name: name.clone(),
                    value: raw_value.to_string(),
                    datatype: kind.to_string(),
                })?,
        ),
        Some(DataKind::Int) => MetadataValue::Integer(raw_value.parse::<i64>().map_err(|_| {
            FormatError::BadParamValue {
                name: name.clone(),
                value: raw_value.to_string(),
                datatype: DataKind::Int.to_string(),
            }
        })?),
        Some(DataKind::Char) => MetadataValue::String(raw_value.to_string()),
        None => guess_param_value(raw_value),
    };

    Ok(Param {
        name,
        value,
        datatype,
        unit: element.attr("unit").map(str::to_string),
        ucd: element.attr("ucd").map(str::to_string),
        description: description_of(element),
    })
}

/// Extract the column descriptors and check the two-column floating layout:
/// wavelength first, flux second.
fn extract_fields(table: &XmlElement) -> Result<Vec<Field>, FormatError> {
    let mut fields = Vec::new();
    for element in table.children_named("FIELD") {
        let name = element
            .attr("name")
            .ok_or(FormatError::MissingAttribute {
                element: "FIELD",
                attribute: "name",
            })?
            .to_string();
        let datatype_attr = element.attr("datatype").ok_or(FormatError::MissingAttribute {
            element: "FIELD",
            attribute: "datatype",
        })?;
        let datatype =
            DataKind::parse(datatype_attr).ok_or_else(|| FormatError::UnsupportedDatatype {
                name: name.clone(),
                datatype: datatype_attr.to_string(),
            })?;

        fields.push(Field {
            id: element.attr("ID").map(str::to_string),
            name,
            unit: element.attr("unit").map(str::to_string),
            ucd: element.attr("ucd").map(str::to_string),
            datatype,
            description: description_of(element),
        });
    }

    if fields.len() != 2 {
        return Err(FormatError::FieldCount {
            expected: 2,
            found: fields.len(),
        });
    }
    for field in &fields {
        if !field.datatype.is_floating() {
            return Err(FormatError::NonNumericField {
                name: field.name.clone(),
                datatype: field.datatype.to_string(),
            });
        }
    }

    Ok(fields)
}

fn description_of(element: &XmlElement) -> Option<String> {
    element
        .child("DESCRIPTION")
        .map(|d| d.text.clone())
        .filter(|t| !t.is_empty())
}

// ---------------------------------------------------------------------------
// Row extraction
// ---------------------------------------------------------------------------

/// Materialize `<DATA><TABLEDATA>` rows into typed samples. Cell text is
/// parsed as generic floating point; no fixed precision is assumed.
fn extract_rows(table: &XmlElement, fields: &[Field]) -> Result<Vec<Sample>, FormatError> {
    let data = table.child("DATA").ok_or(FormatError::MissingElement {
        location: "TABLE",
        element: "DATA",
    })?;
    let tabledata = data.child("TABLEDATA").ok_or(FormatError::MissingElement {
        location: "DATA",
        element: "TABLEDATA",
    })?;

    let mut samples = Vec::new();
    for (row, tr) in tabledata.children_named("TR").enumerate() {
        let cells: Vec<&XmlElement> = tr.children_named("TD").collect();
        if cells.len() != fields.len() {
            return Err(FormatError::CellCount {
                row,
                expected: fields.len(),
                found: cells.len(),
            });
        }

        let mut parsed = [0.0f64; 2];
        for (column, cell) in cells.iter().enumerate() {
            let text = cell.text.trim();
            parsed[column] = text.parse::<f64>().map_err(|_| FormatError::BadCell {
                row,
                column,
                name: fields[column].name.clone(),
                value: text.to_string(),
            })?;
        }

        samples.push(Sample {
            wavelength: parsed[0],
            flux: parsed[1],
        });
    }

    Ok(samples)
}
