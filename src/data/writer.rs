use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use quick_xml::escape::escape;

use super::model::{Param, SpectralDocument};
use crate::error::FormatError;

// ---------------------------------------------------------------------------
// Canonical document serialization
// ---------------------------------------------------------------------------

/// Parameter names that belong to the curation group and are emitted inside
/// `<GROUP name="Curation">`.
const CURATION_PARAMS: [&str; 4] = ["Publisher", "ContactName", "ContactEmail", "Collection"];

/// Serialize a document to the canonical layout: UTF-8 XML declaration,
/// root `<RESOURCE type="results">` containing one `<TABLE>` with the
/// curation group, the remaining parameters, the two column declarations
/// and the `<TABLEDATA>` rows.
pub fn write_votable(document: &SpectralDocument) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<RESOURCE type=\"results\">\n");
    out.push_str("  <TABLE>\n");

    let (curation, general): (Vec<&Param>, Vec<&Param>) = document
        .params
        .iter()
        .partition(|p| CURATION_PARAMS.iter().any(|c| p.name.eq_ignore_ascii_case(c)));

    if !curation.is_empty() {
        out.push_str("    <GROUP name=\"Curation\">\n");
        for param in &curation {
            write_param(&mut out, param, "      ");
        }
        out.push_str("    </GROUP>\n");
    }
    for param in &general {
        write_param(&mut out, param, "    ");
    }

    for field in &document.fields {
        out.push_str("    <FIELD");
        if let Some(id) = &field.id {
            let _ = write!(out, " ID=\"{}\"", escape(id));
        }
        let _ = write!(out, " name=\"{}\"", escape(&field.name));
        if let Some(unit) = &field.unit {
            let _ = write!(out, " unit=\"{}\"", escape(unit));
        }
        if let Some(ucd) = &field.ucd {
            let _ = write!(out, " ucd=\"{}\"", escape(ucd));
        }
        let _ = write!(out, " datatype=\"{}\"", field.datatype);
        match &field.description {
            Some(description) => {
                out.push_str(">\n");
                let _ = write!(
                    out,
                    "      <DESCRIPTION>{}</DESCRIPTION>\n",
                    escape(description)
                );
                out.push_str("    </FIELD>\n");
            }
            None => out.push_str("/>\n"),
        }
    }

    out.push_str("    <DATA>\n      <TABLEDATA>\n");
    for sample in document.samples() {
        let _ = write!(
            out,
            "        <TR><TD>{}</TD><TD>{}</TD></TR>\n",
            format_wavelength(sample.wavelength),
            format_flux(sample.flux)
        );
    }
    out.push_str("      </TABLEDATA>\n    </DATA>\n");

    out.push_str("  </TABLE>\n");
    out.push_str("</RESOURCE>\n");
    out
}

/// Serialize to a file.
pub fn write_votable_file(document: &SpectralDocument, path: &Path) -> Result<(), FormatError> {
    fs::write(path, write_votable(document)).map_err(|source| FormatError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_param(out: &mut String, param: &Param, indent: &str) {
    out.push_str(indent);
    out.push_str("<PARAM");
    let _ = write!(out, " name=\"{}\"", escape(&param.name));
    if let Some(datatype) = param.datatype {
        let _ = write!(out, " datatype=\"{datatype}\"");
    }
    if let Some(unit) = &param.unit {
        let _ = write!(out, " unit=\"{}\"", escape(unit));
    }
    if let Some(ucd) = &param.ucd {
        let _ = write!(out, " ucd=\"{}\"", escape(ucd));
    }
    let _ = write!(out, " value=\"{}\"", escape(&param.value.to_string()));
    match &param.description {
        Some(description) => {
            out.push_str(">\n");
            let _ = write!(
                out,
                "{indent}  <DESCRIPTION>{}</DESCRIPTION>\n",
                escape(description)
            );
            let _ = write!(out, "{indent}</PARAM>\n");
        }
        None => out.push_str("/>\n"),
    }
}

// ---------------------------------------------------------------------------
// Numeric formatting
// ---------------------------------------------------------------------------

/// Wavelengths are written with 5 decimal places, the precision the
/// collection's data carries.
pub fn format_wavelength(value: f64) -> String {
    format!("{value:.5}")
}

/// Flux is written in scientific notation using the shortest form that
/// parses back to the same value, so serialization is lossless.
pub fn format_flux(value: f64) -> String {
    format!("{value:e}")
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Export the table as two-column CSV, headed by the column names.
pub fn export_csv(document: &SpectralDocument) -> Result<String, FormatError> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        let header: Vec<&str> = document.fields.iter().map(|f| f.name.as_str()).collect();
        writer
            .write_record(&header)
            .map_err(|source| FormatError::Csv { source })?;
        for sample in document.samples() {
            writer
                .write_record([
                    format_wavelength(sample.wavelength),
                    format_flux(sample.flux),
                ])
                .map_err(|source| FormatError::Csv { source })?;
        }
        writer.flush().map_err(|source| FormatError::Csv {
            source: csv::Error::from(source),
        })?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Export the whole document (parameters, fields, rows) as pretty JSON.
pub fn export_json(document: &SpectralDocument) -> Result<String, FormatError> {
    serde_json::to_string_pretty(document).map_err(|source| FormatError::Json { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wavelength_keeps_five_decimals() {
        assert_eq!(format_wavelength(6491.85), "6491.85000");
        assert_eq!(format_wavelength(25575.9), "25575.90000");
    }

    #[test]
    fn flux_round_trips_exactly() {
        for value in [0.0199495, 0.0138007, 1.0, 3.2e-17] {
            let text = format_flux(value);
            assert_eq!(text.parse::<f64>().unwrap(), value);
        }
    }

    #[test]
    fn flux_is_scientific_notation() {
        assert!(format_flux(0.0199495).contains('e'));
    }
}
