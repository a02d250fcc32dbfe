#![deny(unsafe_code)]
//! Field registry: maps field names to implementations and provides sampling
//! diagnostics and magnitude snapshots.
//!
//! This crate sits between `synturb-core` (which defines the `MagneticField`
//! trait) and the field implementations (`synturb-planewave`, the built-in
//! uniform field). The CLI depends on this crate so dispatch logic lives in
//! exactly one place.

pub mod probe;

#[cfg(feature = "png")]
pub mod snapshot;

use glam::DVec3;
use serde_json::Value;
use synturb_core::{FieldError, MagneticField, UniformField};
use synturb_planewave::PlaneWaveTurbulence;

/// All available field names.
const FIELD_NAMES: &[&str] = &["plane-wave", "uniform"];

/// Enumeration of all available magnetic-field models.
///
/// Wraps each implementation and delegates the `MagneticField` trait
/// methods. Use [`FieldKind::from_name`] for string-based construction.
#[derive(Debug)]
pub enum FieldKind {
    /// Plane-wave turbulence synthesis.
    PlaneWave(PlaneWaveTurbulence),
    /// Spatially constant field.
    Uniform(UniformField),
}

impl FieldKind {
    /// Constructs a field by name.
    ///
    /// The `seed` feeds any randomness the named model draws at
    /// construction; models without randomness ignore it.
    ///
    /// # Errors
    ///
    /// [`FieldError::UnknownField`] if the name is not recognized, plus
    /// whatever configuration errors the named model itself reports.
    pub fn from_name(name: &str, seed: u64, params: &Value) -> Result<Self, FieldError> {
        match name {
            "plane-wave" => Ok(FieldKind::PlaneWave(PlaneWaveTurbulence::from_json(
                seed, params,
            )?)),
            "uniform" => Ok(FieldKind::Uniform(UniformField::from_json(params))),
            _ => Err(FieldError::UnknownField(name.to_string())),
        }
    }

    /// Returns a slice of all recognized field names.
    pub fn list_fields() -> &'static [&'static str] {
        FIELD_NAMES
    }
}

impl MagneticField for FieldKind {
    fn at(&self, position: DVec3) -> Result<DVec3, FieldError> {
        match self {
            FieldKind::PlaneWave(f) => f.at(position),
            FieldKind::Uniform(f) => f.at(position),
        }
    }

    fn description(&self) -> String {
        match self {
            FieldKind::PlaneWave(f) => f.description(),
            FieldKind::Uniform(f) => f.description(),
        }
    }

    fn params(&self) -> Value {
        match self {
            FieldKind::PlaneWave(f) => f.params(),
            FieldKind::Uniform(f) => f.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            FieldKind::PlaneWave(f) => f.param_schema(),
            FieldKind::Uniform(f) => f.param_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_name_plane_wave_succeeds() {
        let field = FieldKind::from_name("plane-wave", 42, &json!({}));
        assert!(field.is_ok());
    }

    #[test]
    fn from_name_uniform_succeeds() {
        let field = FieldKind::from_name("uniform", 42, &json!({"value": [0.0, 0.0, 1e-9]}));
        assert!(field.is_ok());
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = FieldKind::from_name("nonexistent", 42, &json!({}));
        assert!(matches!(result, Err(FieldError::UnknownField(_))));
    }

    #[test]
    fn from_name_propagates_construction_errors() {
        let result = FieldKind::from_name("plane-wave", 42, &json!({"num_modes": 1}));
        assert!(matches!(result, Err(FieldError::TooFewModes(1))));
    }

    #[test]
    fn list_fields_names_every_variant() {
        let names = FieldKind::list_fields();
        assert!(names.contains(&"plane-wave"));
        assert!(names.contains(&"uniform"));
    }

    #[test]
    fn trait_delegation_at_and_description() {
        let field = FieldKind::from_name("uniform", 42, &json!({"value": [1.0, 0.0, 0.0]}))
            .unwrap();
        assert_eq!(field.at(DVec3::splat(5.0)).unwrap(), DVec3::X);
        assert!(field.description().contains("uniform"));
    }

    #[test]
    fn trait_delegation_params_and_schema() {
        let field = FieldKind::from_name("plane-wave", 42, &json!({})).unwrap();
        assert!(field.params().get("brms").is_some());
        assert!(field.param_schema().get("brms").is_some());
    }

    #[test]
    fn determinism_same_seed() {
        let a = FieldKind::from_name("plane-wave", 99, &json!({})).unwrap();
        let b = FieldKind::from_name("plane-wave", 99, &json!({})).unwrap();
        for position in [DVec3::ZERO, DVec3::splat(1e16), DVec3::new(3e15, -2e16, 5e14)] {
            let va = a.at(position).unwrap();
            let vb = b.at(position).unwrap();
            assert_eq!(va.x.to_bits(), vb.x.to_bits());
            assert_eq!(va.y.to_bits(), vb.y.to_bits());
            assert_eq!(va.z.to_bits(), vb.z.to_bits());
        }
    }

    #[test]
    fn object_safety() {
        let field = FieldKind::from_name("uniform", 42, &json!({})).unwrap();
        let boxed: Box<dyn MagneticField> = Box::new(field);
        assert_eq!(boxed.at(DVec3::ZERO).unwrap(), DVec3::ZERO);
    }
}
