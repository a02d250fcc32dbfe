//! Error types shared across the synturb crates.

use thiserror::Error;

/// Errors produced by field construction, lookup, and tooling.
///
/// All invariants are checked eagerly at construction time; field
/// evaluation itself is total for the built-in implementations. The
/// `Evaluation` variant exists for external implementations of
/// [`crate::MagneticField`] whose lookups can fail (remote grids,
/// interpolators), so that callers can absorb those failures at a
/// well-defined boundary.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The length-scale bounds of a spectrum were not ordered `0 < lmin < lmax`.
    #[error("invalid spectrum bounds: lmin = {lmin}, lmax = {lmax} (need 0 < lmin < lmax)")]
    InvalidSpectrumBounds { lmin: f64, lmax: f64 },

    /// A scalar parameter was out of range, non-finite, or otherwise unusable.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Too few wave modes to lay out the wavenumber distribution.
    #[error("at least two wave modes are required to build the wavenumber distribution, got {0}")]
    TooFewModes(usize),

    /// A cylindrical-kind field was configured without a confinement geometry.
    #[error("cylindrical turbulence requires a confinement geometry")]
    MissingGeometry,

    /// A field name not present in the registry.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A field lookup failed at evaluation time.
    #[error("field evaluation failed: {0}")]
    Evaluation(String),

    /// Writing a diagnostic artifact failed.
    #[error("io error: {0}")]
    Io(String),
}
