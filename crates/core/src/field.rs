//! The core `MagneticField` trait and the trivial uniform implementation.
//!
//! The trait is object-safe so fields can be passed around as
//! `Arc<dyn MagneticField>` and swapped at runtime; transport code holds
//! exactly this one handle to whatever field model a run is using.

use glam::DVec3;
use serde_json::{json, Value};

use crate::error::FieldError;
use crate::params::param_vec3;

/// A magnetic field defined at every point in space.
///
/// Implementations must be immutable after construction: `at` takes `&self`
/// and the trait requires `Send + Sync`, so one field instance can serve
/// many propagation threads concurrently without locks.
///
/// The built-in implementations never fail, but the lookup returns a
/// `Result` because external implementations (gridded data, remote
/// services) can. Callers that must not abort absorb failures through a
/// boundary helper rather than by ignoring them.
///
/// This trait is **object-safe**: `Box<dyn MagneticField>` and
/// `Arc<dyn MagneticField>` are the expected ways to hold one.
pub trait MagneticField: Send + Sync {
    /// The field vector at `position`, in tesla.
    fn at(&self, position: DVec3) -> Result<DVec3, FieldError>;

    /// One-line human-readable summary of the configuration.
    ///
    /// Intended for logs and CLI output, never for control flow.
    fn description(&self) -> String;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types and defaults.
    fn param_schema(&self) -> Value;
}

/// A spatially constant magnetic field.
///
/// The simplest useful field: background fields in transport setups, and
/// the known-answer case in tests of anything that consumes a
/// [`MagneticField`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformField {
    value: DVec3,
}

impl UniformField {
    /// Creates a uniform field with the given vector value, in tesla.
    pub fn new(value: DVec3) -> Self {
        Self { value }
    }

    /// Builds a uniform field from a JSON object with an optional
    /// `value: [x, y, z]` key, defaulting to the zero vector.
    pub fn from_json(params: &Value) -> Self {
        Self::new(param_vec3(params, "value", DVec3::ZERO))
    }

    /// The constant field vector.
    pub fn value(&self) -> DVec3 {
        self.value
    }
}

impl MagneticField for UniformField {
    fn at(&self, _position: DVec3) -> Result<DVec3, FieldError> {
        Ok(self.value)
    }

    fn description(&self) -> String {
        format!(
            "uniform field: B = ({:.3e}, {:.3e}, {:.3e}) T",
            self.value.x, self.value.y, self.value.z
        )
    }

    fn params(&self) -> Value {
        json!({ "value": [self.value.x, self.value.y, self.value.z] })
    }

    fn param_schema(&self) -> Value {
        json!({
            "value": {
                "type": "array[3] of number",
                "default": [0.0, 0.0, 0.0],
                "description": "Constant field vector in tesla"
            }
        })
    }
}
