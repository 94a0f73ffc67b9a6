use prismvot::{SpectralDocument, export_csv, export_json, parse_votable};

const SAMPLE: &str = include_str!("fixtures/sample.vot");

#[test]
fn csv_export_has_header_and_rows() {
    let document = parse_votable(SAMPLE).unwrap();
    let csv = export_csv(&document).unwrap();

    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("WAVELENGTH,FLUX"));
    assert_eq!(lines.next(), Some("6491.85000,1.99495e-2"));
    // header + one line per row
    assert_eq!(csv.lines().count(), 1 + document.len());
}

#[test]
fn json_export_round_trips() {
    let document = parse_votable(SAMPLE).unwrap();
    let json = export_json(&document).unwrap();

    let decoded: SpectralDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, document);
}
