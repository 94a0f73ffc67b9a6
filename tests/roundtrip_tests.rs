use prismvot::{parse_votable, write_votable};

const SAMPLE: &str = include_str!("fixtures/sample.vot");

#[test]
fn serialization_preserves_fields_and_rows() {
    let document = parse_votable(SAMPLE).unwrap();
    let written = write_votable(&document);
    let reparsed = parse_votable(&written).unwrap();

    assert_eq!(reparsed.fields, document.fields);
    assert_eq!(reparsed.samples, document.samples);
}

#[test]
fn serialization_preserves_params() {
    let document = parse_votable(SAMPLE).unwrap();
    let reparsed = parse_votable(&write_votable(&document)).unwrap();

    assert_eq!(reparsed, document);
}

#[test]
fn row_count_matches_tr_elements() {
    let document = parse_votable(SAMPLE).unwrap();
    let written = write_votable(&document);

    assert_eq!(written.matches("<TR>").count(), document.len());
}

#[test]
fn wavelengths_are_written_with_five_decimals() {
    let document = parse_votable(SAMPLE).unwrap();
    let written = write_votable(&document);

    assert!(written.contains("<TD>6491.85000</TD>"));
    assert!(written.contains("<TD>25575.90000</TD>"));
}

#[test]
fn flux_is_written_in_scientific_notation() {
    let document = parse_votable(SAMPLE).unwrap();
    let written = write_votable(&document);

    assert!(written.contains("<TD>1.99495e-2</TD>"));
    assert!(written.contains("<TD>1.38007e-2</TD>"));
}

#[test]
fn canonical_layout_has_resource_root_and_curation_group() {
    let document = parse_votable(SAMPLE).unwrap();
    let written = write_votable(&document);

    assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(written.contains("<RESOURCE type=\"results\">"));
    assert!(written.contains("<GROUP name=\"Curation\">"));
    assert!(written.contains("<PARAM name=\"Publisher\""));
}
