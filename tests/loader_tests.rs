use std::path::Path;

use prismvot::{DataKind, FormatError, Sample, load_file, parse_votable};

const SAMPLE: &str = include_str!("fixtures/sample.vot");

#[test]
fn parses_header_params() {
    let document = parse_votable(SAMPLE).unwrap();

    assert_eq!(document.params.len(), 11);
    assert_eq!(document.collection(), Some("SpeX Prism Library"));
    assert_eq!(document.publisher(), Some("SpeX Prism Library"));
    assert_eq!(document.contact_name(), Some("Library Curator"));
    assert_eq!(document.contact_email(), Some("curator@example.org"));
    assert_eq!(document.title(), Some("2MASS J0036+1821 prism spectrum"));
    assert_eq!(document.spectral_type(), Some("L3.5"));
    assert_eq!(document.spectral_axis(), Some("WAVELENGTH"));
    assert_eq!(document.flux_axis(), Some("FLUX"));
    assert_eq!(document.spectral_si(), Some(1e-10));
    assert_eq!(document.flux_si(), Some(1e7));
}

#[test]
fn parses_field_declarations() {
    let document = parse_votable(SAMPLE).unwrap();

    assert_eq!(document.fields.len(), 2);

    let wavelength = &document.fields[0];
    assert_eq!(wavelength.name, "WAVELENGTH");
    assert_eq!(wavelength.id.as_deref(), Some("WAVELENGTH"));
    assert_eq!(wavelength.unit.as_deref(), Some("Angstrom"));
    assert_eq!(wavelength.ucd.as_deref(), Some("em.wl"));
    assert_eq!(wavelength.datatype, DataKind::Float);
    assert_eq!(
        wavelength.description.as_deref(),
        Some("Wavelength in Angstrom")
    );

    let flux = &document.fields[1];
    assert_eq!(flux.name, "FLUX");
    assert_eq!(flux.unit.as_deref(), Some("erg/cm2/s/A"));

    assert_eq!(document.spectral_units(), Some("Angstrom"));
    assert_eq!(document.flux_units(), Some("erg/cm2/s/A"));
}

#[test]
fn returns_reference_first_and_last_rows() {
    let document = parse_votable(SAMPLE).unwrap();

    assert_eq!(document.len(), 12);
    assert_eq!(
        document.first(),
        Some(&Sample {
            wavelength: 6491.85,
            flux: 0.0199495,
        })
    );
    assert_eq!(
        document.last(),
        Some(&Sample {
            wavelength: 25575.9,
            flux: 0.0138007,
        })
    );
}

#[test]
fn sample_iteration_is_restartable() {
    let document = parse_votable(SAMPLE).unwrap();

    let first_pass: Vec<Sample> = document.samples().copied().collect();
    let second_pass: Vec<Sample> = document.samples().copied().collect();
    assert_eq!(first_pass, second_pass);
    assert_eq!(first_pass.len(), 12);
}

#[test]
fn accepts_votable_wrapper() {
    let wrapped = r#"<VOTABLE version="1.1"><RESOURCE type="results"><TABLE>
        <FIELD name="WAVELENGTH" unit="Angstrom" datatype="float"/>
        <FIELD name="FLUX" datatype="float"/>
        <DATA><TABLEDATA>
          <TR><TD>6000.0</TD><TD>0.01</TD></TR>
          <TR><TD>6100.0</TD><TD>0.02</TD></TR>
        </TABLEDATA></DATA></TABLE></RESOURCE></VOTABLE>"#;

    let document = parse_votable(wrapped).unwrap();
    assert_eq!(document.len(), 2);
    assert_eq!(document.fields[0].name, "WAVELENGTH");
}

#[test]
fn accepts_empty_tabledata() {
    let empty = r#"<RESOURCE type="results"><TABLE>
        <FIELD name="WAVELENGTH" datatype="float"/>
        <FIELD name="FLUX" datatype="float"/>
        <DATA><TABLEDATA></TABLEDATA></DATA></TABLE></RESOURCE>"#;

    let document = parse_votable(empty).unwrap();
    assert!(document.is_empty());
    assert_eq!(document.first(), None);
}

#[test]
fn load_file_reads_fixture() {
    let document = load_file(Path::new("tests/fixtures/sample.vot")).unwrap();
    assert_eq!(document.len(), 12);
}

#[test]
fn load_file_rejects_unknown_extension() {
    let err = load_file(Path::new("spectrum.txt")).unwrap_err();
    assert!(matches!(
        err,
        FormatError::UnsupportedExtension { extension } if extension == "txt"
    ));
}

// ---------------------------------------------------------------------------
// Malformed input
// ---------------------------------------------------------------------------

#[test]
fn rejects_missing_table() {
    let err = parse_votable(r#"<RESOURCE type="results"></RESOURCE>"#).unwrap_err();
    assert!(matches!(
        err,
        FormatError::MissingElement {
            location: "RESOURCE",
            element: "TABLE",
        }
    ));
}

#[test]
fn rejects_missing_tabledata() {
    let doc = r#"<RESOURCE type="results"><TABLE>
        <FIELD name="WAVELENGTH" datatype="float"/>
        <FIELD name="FLUX" datatype="float"/>
        <DATA></DATA></TABLE></RESOURCE>"#;
    let err = parse_votable(doc).unwrap_err();
    assert!(matches!(
        err,
        FormatError::MissingElement {
            location: "DATA",
            element: "TABLEDATA",
        }
    ));
}

#[test]
fn rejects_wrong_field_count() {
    let doc = r#"<RESOURCE type="results"><TABLE>
        <FIELD name="WAVELENGTH" datatype="float"/>
        <DATA><TABLEDATA></TABLEDATA></DATA></TABLE></RESOURCE>"#;
    let err = parse_votable(doc).unwrap_err();
    assert!(matches!(
        err,
        FormatError::FieldCount {
            expected: 2,
            found: 1,
        }
    ));
}

#[test]
fn rejects_non_floating_field() {
    let doc = r#"<RESOURCE type="results"><TABLE>
        <FIELD name="WAVELENGTH" datatype="float"/>
        <FIELD name="FLUX" datatype="int"/>
        <DATA><TABLEDATA></TABLEDATA></DATA></TABLE></RESOURCE>"#;
    let err = parse_votable(doc).unwrap_err();
    assert!(matches!(
        err,
        FormatError::NonNumericField { ref name, .. } if name == "FLUX"
    ));
}

#[test]
fn rejects_unsupported_datatype() {
    let doc = r#"<RESOURCE type="results"><TABLE>
        <FIELD name="WAVELENGTH" datatype="boolean"/>
        <FIELD name="FLUX" datatype="float"/>
        <DATA><TABLEDATA></TABLEDATA></DATA></TABLE></RESOURCE>"#;
    let err = parse_votable(doc).unwrap_err();
    assert!(matches!(
        err,
        FormatError::UnsupportedDatatype { ref datatype, .. } if datatype == "boolean"
    ));
}

#[test]
fn rejects_field_without_name() {
    let doc = r#"<RESOURCE type="results"><TABLE>
        <FIELD datatype="float"/>
        <FIELD name="FLUX" datatype="float"/>
        <DATA><TABLEDATA></TABLEDATA></DATA></TABLE></RESOURCE>"#;
    let err = parse_votable(doc).unwrap_err();
    assert!(matches!(
        err,
        FormatError::MissingAttribute {
            element: "FIELD",
            attribute: "name",
        }
    ));
}

#[test]
fn rejects_non_numeric_cell_with_location() {
    let doc = r#"<RESOURCE type="results"><TABLE>
        <FIELD name="WAVELENGTH" datatype="float"/>
        <FIELD name="FLUX" datatype="float"/>
        <DATA><TABLEDATA>
          <TR><TD>6000.0</TD><TD>0.01</TD></TR>
          <TR><TD>6100.0</TD><TD>not-a-number</TD></TR>
        </TABLEDATA></DATA></TABLE></RESOURCE>"#;
    let err = parse_votable(doc).unwrap_err();
    match err {
        FormatError::BadCell {
            row,
            column,
            ref name,
            ref value,
        } => {
            assert_eq!(row, 1);
            assert_eq!(column, 1);
            assert_eq!(name, "FLUX");
            assert_eq!(value, "not-a-number");
        }
        other => panic!("expected BadCell, got {other:?}"),
    }
    // The rendered message carries the location hint.
    let doc2 = r#"<RESOURCE type="results"><TABLE>
        <FIELD name="WAVELENGTH" datatype="float"/>
        <FIELD name="FLUX" datatype="float"/>
        <DATA><TABLEDATA>
          <TR><TD>abc</TD><TD>0.01</TD></TR>
        </TABLEDATA></DATA></TABLE></RESOURCE>"#;
    let message = parse_votable(doc2).unwrap_err().to_string();
    assert!(message.contains("row 0"));
    assert!(message.contains("WAVELENGTH"));
}

#[test]
fn rejects_mismatched_cell_count() {
    let doc = r#"<RESOURCE type="results"><TABLE>
        <FIELD name="WAVELENGTH" datatype="float"/>
        <FIELD name="FLUX" datatype="float"/>
        <DATA><TABLEDATA>
          <TR><TD>6000.0</TD></TR>
        </TABLEDATA></DATA></TABLE></RESOURCE>"#;
    let err = parse_votable(doc).unwrap_err();
    assert!(matches!(
        err,
        FormatError::CellCount {
            row: 0,
            expected: 2,
            found: 1,
        }
    ));
}

#[test]
fn rejects_malformed_xml() {
    let err = parse_votable(r#"<RESOURCE type="results"><TABLE></RESOURCE>"#).unwrap_err();
    assert!(matches!(err, FormatError::Xml { .. }));
}
