use std::path::Path;

use prismvot::{DataKind, Field, MetadataValue, Param, Sample, SpectralDocument};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Smooth pseudo-continuum peaking in the near infrared, with broad
/// absorption troughs and a little measurement noise on top.
fn generate_flux(wavelengths: &[f64], rng: &mut SimpleRng) -> Vec<f64> {
    // (center, width, depth) of the absorption features
    let troughs = [
        (9400.0, 400.0, 0.004),
        (11350.0, 500.0, 0.006),
        (13800.0, 900.0, 0.009),
        (19000.0, 1100.0, 0.007),
    ];

    wavelengths
        .iter()
        .map(|&w| {
            let continuum = 0.004 + gaussian(w, 12500.0, 7000.0, 0.022);
            let absorbed: f64 = troughs
                .iter()
                .map(|&(mu, sigma, depth)| gaussian(w, mu, sigma, depth))
                .sum();
            (continuum - absorbed + rng.gauss(0.0, 1.5e-4)).max(1.0e-5)
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn char_param(name: &str, value: &str) -> Param {
    Param {
        name: name.to_string(),
        value: MetadataValue::String(value.to_string()),
        datatype: Some(DataKind::Char),
        unit: None,
        ucd: None,
        description: None,
    }
}

fn float_param(name: &str, value: f64, unit: &str) -> Param {
    Param {
        name: name.to_string(),
        value: MetadataValue::Float(value),
        datatype: Some(DataKind::Float),
        unit: Some(unit.to_string()),
        ucd: None,
        description: None,
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // Wavelength grid matching the library's prism coverage
    let start = 6491.85;
    let end = 25575.9;
    let n = 1100;
    let step = (end - start) / (n - 1) as f64;
    let wavelengths: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
    let fluxes = generate_flux(&wavelengths, &mut rng);

    let params = vec![
        char_param("DataModel", "Spectrum-1.0"),
        char_param("Publisher", "SpeX Prism Library"),
        char_param("Collection", "SpeX Prism Library"),
        char_param("ContactName", "Library Curator"),
        char_param("ContactEmail", "curator@example.org"),
        char_param("DatasetTitle", "Synthetic L5 dwarf comparison spectrum"),
        char_param("SpectralType", "L5"),
        char_param("SpectralAxis", "WAVELENGTH"),
        char_param("FluxAxis", "FLUX"),
        float_param("SpectralSI", 1.0e-10, "m"),
        float_param("FluxSI", 1.0e7, "W/m3"),
    ];

    let fields = vec![
        Field {
            id: Some("WAVELENGTH".to_string()),
            name: "WAVELENGTH".to_string(),
            unit: Some("Angstrom".to_string()),
            ucd: Some("em.wl".to_string()),
            datatype: DataKind::Float,
            description: Some("Wavelength in Angstrom".to_string()),
        },
        Field {
            id: Some("FLUX".to_string()),
            name: "FLUX".to_string(),
            unit: Some("erg/cm2/s/A".to_string()),
            ucd: Some("phot.flux.density;em.wl".to_string()),
            datatype: DataKind::Float,
            description: Some("Flux density per unit wavelength".to_string()),
        },
    ];

    let samples: Vec<Sample> = wavelengths
        .iter()
        .zip(fluxes.iter())
        .map(|(&wavelength, &flux)| Sample { wavelength, flux })
        .collect();

    let document = SpectralDocument {
        params,
        fields,
        samples,
    };

    let output_path = "sample_spectrum.vot";
    prismvot::write_votable_file(&document, Path::new(output_path))
        .expect("Failed to write output file");

    println!(
        "Wrote {} rows ({:.2} to {:.2} Angstrom) to {output_path}",
        document.len(),
        start,
        end
    );
}
