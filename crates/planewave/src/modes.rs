//! Wave-mode ensemble construction.
//!
//! All randomness of a realization lives here: one sequential pass over a
//! seeded stream draws the propagation geometry and phase of every mode,
//! and a second pass normalizes the amplitudes once the weight total is
//! known. After that the ensemble is frozen.

use std::f64::consts::PI;

use glam::DVec3;
use synturb_core::{FieldError, TurbulenceSpectrum, Xorshift64};

use crate::TurbulenceKind;

/// One wave mode of a plane-wave superposition.
///
/// `direction` and `polarization` are unit vectors with
/// `polarization · direction = 0`, so each mode is a transverse
/// (divergence-free) plane wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveMode {
    /// Wavenumber magnitude, in 1/m.
    pub wavenumber: f64,
    /// Unit propagation direction.
    pub direction: DVec3,
    /// Unit polarization vector, perpendicular to `direction`.
    pub polarization: DVec3,
    /// Field amplitude carried by this mode, in tesla.
    pub amplitude: f64,
    /// Phase offset, in radians.
    pub phase: f64,
}

/// Draws a complete mode ensemble from one seeded stream.
///
/// Wavenumbers are log-spaced between `2π/lmax` and `2π/lmin` inclusive.
/// Mode weights sample the energy spectrum with a `(1 + κ²)` correction
/// that reconciles the continuous spectrum with the discrete superposition,
/// and the amplitudes are normalized in a second pass so that the sum of
/// squared amplitudes equals `2·brms²`. Each cosine contributes half its
/// squared amplitude on spatial average, which makes the rms of the
/// superposed field equal `brms`.
///
/// The per-mode draw order (azimuth, polar cosine, rotation, phase) is
/// fixed; slab and cylindrical ensembles skip the polar and rotation
/// draws entirely, so the stream position differs between kinds by design.
///
/// # Errors
///
/// Fails with [`FieldError::TooFewModes`] when `num_modes <= 1`; a single
/// mode leaves the wavenumber spacing undefined.
pub(crate) fn sample_modes(
    spectrum: &TurbulenceSpectrum,
    num_modes: usize,
    kind: TurbulenceKind,
    rng: &mut Xorshift64,
) -> Result<Vec<WaveMode>, FieldError> {
    if num_modes <= 1 {
        return Err(FieldError::TooFewModes(num_modes));
    }

    let kmax = 2.0 * PI / spectrum.lmin();
    let kmin = 2.0 * PI / spectrum.lmax();
    let span = (kmax / kmin).log10();
    let steps = (num_modes - 1) as f64;
    let wavenumbers: Vec<f64> = (0..num_modes)
        .map(|i| 10f64.powf(kmin.log10() + i as f64 / steps * span))
        .collect();

    // Relative spacing of the log grid; multiplied by k it recovers the
    // local bin width Δk.
    let delta_k0 = (wavenumbers[1] - wavenumbers[0]) / wavenumbers[1];

    let mut modes = Vec::with_capacity(num_modes);
    let mut weight_sum = 0.0;
    for &k in &wavenumbers {
        let khat = k * spectrum.lbendover();
        let gk = spectrum.energy_spectrum(k) * (1.0 + khat * khat);
        let weight = gk * delta_k0 * k;
        weight_sum += weight;

        let phi = rng.next_range(-PI, PI);
        let cos_theta = match kind {
            TurbulenceKind::Isotropic => rng.next_range(-1.0, 1.0),
            TurbulenceKind::Slab | TurbulenceKind::Cylindrical => 1.0,
        };
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
        let alpha = match kind {
            TurbulenceKind::Isotropic => rng.next_range(0.0, 2.0 * PI),
            TurbulenceKind::Slab | TurbulenceKind::Cylindrical => 0.0,
        };
        let phase = rng.next_range(0.0, 2.0 * PI);

        let direction = DVec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);
        // A unit vector perpendicular to `direction`, rotated around it
        // by `alpha`.
        let polarization = DVec3::new(
            cos_theta * phi.cos() * alpha.cos() + phi.sin() * alpha.sin(),
            cos_theta * phi.sin() * alpha.cos() - phi.cos() * alpha.sin(),
            -sin_theta * alpha.cos(),
        );
        debug_assert!(polarization.dot(direction).abs() < 1e-12);

        // The amplitude slot carries the raw weight until the second pass.
        modes.push(WaveMode {
            wavenumber: k,
            direction,
            polarization,
            amplitude: weight,
            phase,
        });
    }

    // Only now are the actual amplitudes computable; the normalization
    // needs the weight total. A zero total (brms = 0) yields a zero field
    // rather than a 0/0.
    for mode in &mut modes {
        mode.amplitude = if weight_sum > 0.0 {
            (2.0 * mode.amplitude / weight_sum).sqrt() * spectrum.brms()
        } else {
            0.0
        };
    }

    Ok(modes)
}
