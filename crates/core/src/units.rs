//! SI-anchored unit constants.
//!
//! All quantities in this workspace are plain `f64` in SI units (meters,
//! tesla). These constants exist so configurations read like the
//! astrophysics literature they come from: `0.1 * MICROGAUSS`,
//! `5.0 * KILOPARSEC`, and so on.

/// Meter, the base length unit.
pub const METER: f64 = 1.0;

/// Kilometer in meters.
pub const KILOMETER: f64 = 1e3 * METER;

/// Astronomical unit in meters.
pub const AU: f64 = 1.495978707e11 * METER;

/// Parsec in meters.
pub const PARSEC: f64 = 3.0856775807e16 * METER;

/// Kiloparsec in meters.
pub const KILOPARSEC: f64 = 1e3 * PARSEC;

/// Megaparsec in meters.
pub const MEGAPARSEC: f64 = 1e6 * PARSEC;

/// Tesla, the base magnetic flux density unit.
pub const TESLA: f64 = 1.0;

/// Gauss in tesla.
pub const GAUSS: f64 = 1e-4 * TESLA;

/// Microgauss in tesla. The typical scale of galactic magnetic fields.
pub const MICROGAUSS: f64 = 1e-6 * GAUSS;

/// Nanogauss in tesla. The typical scale of intergalactic magnetic fields.
pub const NANOGAUSS: f64 = 1e-9 * GAUSS;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_units_scale_consistently() {
        assert!((KILOPARSEC / PARSEC - 1e3).abs() < 1e-9);
        assert!((MEGAPARSEC / PARSEC - 1e6).abs() < 1e-3);
        assert!((KILOMETER / METER - 1e3).abs() < f64::EPSILON);
    }

    #[test]
    fn magnetic_units_scale_consistently() {
        assert!((GAUSS / TESLA - 1e-4).abs() < f64::EPSILON);
        assert!((MICROGAUSS / GAUSS - 1e-6).abs() < 1e-20);
        assert!((NANOGAUSS / MICROGAUSS - 1e-3).abs() < 1e-12);
    }

    #[test]
    fn parsec_is_about_3e16_meters() {
        assert!(PARSEC > 3.08e16 && PARSEC < 3.09e16);
    }
}
