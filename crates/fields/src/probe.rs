//! Failure-tolerant sampling and bulk field diagnostics.
//!
//! Transport-style consumers hold a field behind `Arc<dyn MagneticField>`
//! and must not abort because one lookup failed; [`sample_or_zero`] is that
//! boundary. [`collect_stats`] aggregates a field over a sampled cube for
//! the CLI and for sanity checks against the configured spectrum.

use glam::DVec3;
use serde_json::{json, Value};
use tracing::warn;

use synturb_core::{MagneticField, Xorshift64};

/// Samples a field, substituting the zero vector on failure.
///
/// Never fails and never panics: a failed lookup logs a warning with the
/// position and the error, and the caller sees no field at that point.
pub fn sample_or_zero(field: &dyn MagneticField, position: DVec3) -> DVec3 {
    match field.at(position) {
        Ok(value) => value,
        Err(error) => {
            warn!(%error, ?position, "field lookup failed, substituting zero");
            DVec3::ZERO
        }
    }
}

/// Aggregate statistics of a field over a sampled region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    /// Number of positions sampled.
    pub samples: usize,
    /// Mean field vector, in tesla.
    pub mean: DVec3,
    /// Root-mean-square field magnitude, in tesla.
    pub rms: f64,
    /// Largest sampled magnitude, in tesla.
    pub max_magnitude: f64,
}

impl FieldStats {
    /// The statistics as a JSON object, for CLI output.
    pub fn to_json(&self) -> Value {
        json!({
            "samples": self.samples,
            "mean": [self.mean.x, self.mean.y, self.mean.z],
            "rms": self.rms,
            "max_magnitude": self.max_magnitude,
        })
    }
}

/// Aggregates the field over uniform positions in a cube.
///
/// Draws `count` positions deterministically from `seed`, uniform in the
/// cube `center ± extent` per axis, and reports their mean vector, rms
/// magnitude, and maximum magnitude. Failed lookups count as zero vectors,
/// as in [`sample_or_zero`].
pub fn collect_stats(
    field: &dyn MagneticField,
    center: DVec3,
    extent: f64,
    count: usize,
    seed: u64,
) -> FieldStats {
    let mut rng = Xorshift64::new(seed);
    let mut mean = DVec3::ZERO;
    let mut square_sum = 0.0;
    let mut max_magnitude = 0.0_f64;
    for _ in 0..count {
        let position = center
            + DVec3::new(
                rng.next_range(-extent, extent),
                rng.next_range(-extent, extent),
                rng.next_range(-extent, extent),
            );
        let value = sample_or_zero(field, position);
        mean += value;
        square_sum += value.length_squared();
        max_magnitude = max_magnitude.max(value.length());
    }
    if count > 0 {
        mean /= count as f64;
        square_sum /= count as f64;
    }
    FieldStats {
        samples: count,
        mean,
        rms: square_sum.sqrt(),
        max_magnitude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use synturb_core::units::{MICROGAUSS, PARSEC};
    use synturb_core::{FieldError, UniformField};
    use synturb_planewave::PlaneWaveTurbulence;

    /// Field whose lookup always fails, standing in for an external
    /// implementation with a broken backend.
    struct FaultyProbe;

    impl MagneticField for FaultyProbe {
        fn at(&self, _position: DVec3) -> Result<DVec3, FieldError> {
            Err(FieldError::Evaluation("backend unavailable".into()))
        }

        fn description(&self) -> String {
            "faulty probe".into()
        }

        fn params(&self) -> Value {
            json!({})
        }

        fn param_schema(&self) -> Value {
            json!({})
        }
    }

    // ---- Boundary tests ----

    #[test]
    fn sample_or_zero_passes_values_through() {
        let field = UniformField::new(DVec3::new(0.0, 2.0, 0.0));
        assert_eq!(sample_or_zero(&field, DVec3::splat(9.0)), DVec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn sample_or_zero_substitutes_zero_on_failure() {
        assert_eq!(sample_or_zero(&FaultyProbe, DVec3::splat(1.0)), DVec3::ZERO);
    }

    // ---- Statistics tests ----

    #[test]
    fn stats_of_a_uniform_field_are_exact() {
        let value = DVec3::new(1.0, 2.0, 3.0);
        let field = UniformField::new(value);
        let stats = collect_stats(&field, DVec3::ZERO, 10.0, 100, 42);
        assert_eq!(stats.samples, 100);
        assert_eq!(stats.mean, value);
        assert_eq!(stats.rms.to_bits(), value.length().to_bits());
        assert_eq!(stats.max_magnitude.to_bits(), value.length().to_bits());
    }

    #[test]
    fn stats_are_deterministic_in_the_seed() {
        let field = PlaneWaveTurbulence::from_json(3, &json!({})).unwrap();
        let a = collect_stats(&field, DVec3::ZERO, 50.0 * PARSEC, 200, 7);
        let b = collect_stats(&field, DVec3::ZERO, 50.0 * PARSEC, 200, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn stats_of_an_empty_sample_are_zero() {
        let field = UniformField::new(DVec3::X);
        let stats = collect_stats(&field, DVec3::ZERO, 10.0, 0, 42);
        assert_eq!(stats.samples, 0);
        assert_eq!(stats.mean, DVec3::ZERO);
        assert_eq!(stats.rms, 0.0);
        assert_eq!(stats.max_magnitude, 0.0);
    }

    #[test]
    fn stats_of_a_faulty_field_count_zero_vectors() {
        let stats = collect_stats(&FaultyProbe, DVec3::ZERO, 10.0, 50, 42);
        assert_eq!(stats.samples, 50);
        assert_eq!(stats.rms, 0.0);
        assert_eq!(stats.max_magnitude, 0.0);
    }

    #[test]
    fn turbulence_rms_lands_near_the_configured_target() {
        let field = PlaneWaveTurbulence::from_json(42, &json!({})).unwrap();
        let stats = collect_stats(&field, DVec3::ZERO, 50.0 * PARSEC, 1000, 7);
        let ratio = stats.rms / MICROGAUSS;
        assert!(
            (ratio - 1.0).abs() < 0.1,
            "rms = {} T, want about 1 microgauss",
            stats.rms
        );
        assert!(stats.max_magnitude > stats.rms);
    }

    #[test]
    fn stats_serialize_to_json() {
        let stats = FieldStats {
            samples: 3,
            mean: DVec3::new(0.5, 0.0, -0.5),
            rms: 1.25,
            max_magnitude: 2.0,
        };
        let value = stats.to_json();
        assert_eq!(value["samples"], 3);
        assert_eq!(value["mean"], json!([0.5, 0.0, -0.5]));
        assert_eq!(value["rms"], 1.25);
        assert_eq!(value["max_magnitude"], 2.0);
    }

    // ---- Property-based tests ----

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn stats_stay_finite_for_any_cube(
                seed: u64,
                extent in 1.0_f64..1e18,
                count in 1_usize..64,
            ) {
                let field = UniformField::new(DVec3::new(1e-10, 0.0, 1e-10));
                let stats = collect_stats(&field, DVec3::ZERO, extent, count, seed);
                prop_assert!(stats.mean.is_finite());
                prop_assert!(stats.rms.is_finite());
                prop_assert!(stats.max_magnitude >= stats.rms - 1e-24);
            }
        }
    }
}
