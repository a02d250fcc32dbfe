#![deny(unsafe_code)]
//! Core types for the synturb turbulent magnetic-field toolkit.
//!
//! Provides the `MagneticField` trait, the `TurbulenceSpectrum` model,
//! SI-anchored unit constants, the `Xorshift64` PRNG behind every seeded
//! realization, the shared `FieldError` type, and JSON parameter helpers.

pub mod error;
pub mod field;
pub mod params;
pub mod prng;
pub mod spectrum;
pub mod units;

pub use error::FieldError;
pub use field::{MagneticField, UniformField};
pub use prng::Xorshift64;
pub use spectrum::TurbulenceSpectrum;
