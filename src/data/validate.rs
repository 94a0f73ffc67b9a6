use super::model::SpectralDocument;
use crate::error::FormatError;

// ---------------------------------------------------------------------------
// Data-invariant checks
// ---------------------------------------------------------------------------

/// Check the invariants the format itself does not enforce:
///
/// * exactly two floating-point columns,
/// * strictly increasing wavelengths,
/// * finite flux values.
///
/// The parser accepts any structurally valid table, so bad files can still
/// be opened and inspected; this reports the first data violation with its
/// row location. A table with zero rows is valid.
pub fn validate(document: &SpectralDocument) -> Result<(), FormatError> {
    if document.fields.len() != 2 {
        return Err(FormatError::FieldCount {
            expected: 2,
            found: document.fields.len(),
        });
    }
    for field in &document.fields {
        if !field.datatype.is_floating() {
            return Err(FormatError::NonNumericField {
                name: field.name.clone(),
                datatype: field.datatype.to_string(),
            });
        }
    }

    let mut previous: Option<f64> = None;
    for (row, sample) in document.samples().enumerate() {
        if let Some(prev) = previous {
            // NaN wavelengths fail this comparison too.
            if !(sample.wavelength > prev) {
                return Err(FormatError::NonMonotonicWavelength {
                    row,
                    previous: prev,
                    value: sample.wavelength,
                });
            }
        }
        previous = Some(sample.wavelength);

        if !sample.flux.is_finite() {
            return Err(FormatError::NonFiniteFlux {
                row,
                value: sample.flux,
            });
        }
    }

    Ok(())
}
