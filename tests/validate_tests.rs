use prismvot::{
    DataKind, Field, FormatError, Sample, SpectralDocument, parse_votable, validate,
};

const SAMPLE: &str = include_str!("fixtures/sample.vot");

fn field(name: &str, datatype: DataKind) -> Field {
    Field {
        id: None,
        name: name.to_string(),
        unit: None,
        ucd: None,
        datatype,
        description: None,
    }
}

fn document_with(samples: Vec<Sample>) -> SpectralDocument {
    SpectralDocument {
        params: Vec::new(),
        fields: vec![
            field("WAVELENGTH", DataKind::Float),
            field("FLUX", DataKind::Float),
        ],
        samples,
    }
}

#[test]
fn fixture_passes_validation() {
    let document = parse_votable(SAMPLE).unwrap();
    validate(&document).unwrap();
}

#[test]
fn empty_table_is_valid() {
    validate(&document_with(Vec::new())).unwrap();
}

#[test]
fn detects_decreasing_wavelength() {
    let document = document_with(vec![
        Sample { wavelength: 6000.0, flux: 0.01 },
        Sample { wavelength: 6100.0, flux: 0.01 },
        Sample { wavelength: 6050.0, flux: 0.01 },
    ]);
    let err = validate(&document).unwrap_err();
    match err {
        FormatError::NonMonotonicWavelength { row, previous, value } => {
            assert_eq!(row, 2);
            assert_eq!(previous, 6100.0);
            assert_eq!(value, 6050.0);
        }
        other => panic!("expected NonMonotonicWavelength, got {other:?}"),
    }
}

#[test]
fn detects_repeated_wavelength() {
    let document = document_with(vec![
        Sample { wavelength: 6000.0, flux: 0.01 },
        Sample { wavelength: 6000.0, flux: 0.02 },
    ]);
    assert!(matches!(
        validate(&document).unwrap_err(),
        FormatError::NonMonotonicWavelength { row: 1, .. }
    ));
}

#[test]
fn detects_non_finite_flux() {
    let document = document_with(vec![
        Sample { wavelength: 6000.0, flux: 0.01 },
        Sample { wavelength: 6100.0, flux: f64::NAN },
    ]);
    assert!(matches!(
        validate(&document).unwrap_err(),
        FormatError::NonFiniteFlux { row: 1, .. }
    ));

    let document = document_with(vec![Sample {
        wavelength: 6000.0,
        flux: f64::INFINITY,
    }]);
    assert!(matches!(
        validate(&document).unwrap_err(),
        FormatError::NonFiniteFlux { row: 0, .. }
    ));
}

#[test]
fn detects_wrong_field_count() {
    let mut document = document_with(Vec::new());
    document.fields.pop();
    assert!(matches!(
        validate(&document).unwrap_err(),
        FormatError::FieldCount {
            expected: 2,
            found: 1,
        }
    ));
}

#[test]
fn detects_non_floating_column() {
    let mut document = document_with(Vec::new());
    document.fields[1] = field("FLUX", DataKind::Char);
    assert!(matches!(
        validate(&document).unwrap_err(),
        FormatError::NonNumericField { ref name, .. } if name == "FLUX"
    ));
}
