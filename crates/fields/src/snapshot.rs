//! Grayscale PNG snapshots of the field magnitude over a plane.
//!
//! This module is feature-gated behind `png` (default on) so headless
//! consumers can depend on the `fields` crate without pulling in the
//! `image` crate. Sampling goes through [`crate::probe::sample_or_zero`],
//! so a partially failing field renders as dark pixels instead of aborting.

use std::path::Path;

use glam::DVec3;

use synturb_core::{FieldError, MagneticField};

use crate::probe::sample_or_zero;

/// Axis-aligned sampling grid for a field-magnitude slice in a z-plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeSlice {
    /// Center of the slice; the plane sits at its z.
    pub center: DVec3,
    /// Half-extent of the slice along x and y, in meters.
    pub extent: f64,
    /// Grid resolution per axis, in pixels.
    pub resolution: u32,
}

/// Writes the field magnitude over a z-plane as an 8-bit grayscale PNG.
///
/// The grid spans `center ± extent` in x and y, sampled at pixel centers
/// with the top image row at the largest y. Pixel values are normalized to
/// the largest magnitude in the slice; an all-zero slice stays black.
///
/// # Errors
///
/// [`FieldError::InvalidParameter`] for a zero resolution or a non-positive
/// or non-finite extent, [`FieldError::Io`] on write failure.
pub fn write_magnitude_png(
    field: &dyn MagneticField,
    slice: &MagnitudeSlice,
    path: &Path,
) -> Result<(), FieldError> {
    if slice.resolution == 0 {
        return Err(FieldError::InvalidParameter {
            name: "resolution".into(),
            reason: "must be at least one pixel".into(),
        });
    }
    if !(slice.extent > 0.0) || !slice.extent.is_finite() {
        return Err(FieldError::InvalidParameter {
            name: "extent".into(),
            reason: format!("must be positive and finite, got {}", slice.extent),
        });
    }

    let n = slice.resolution;
    let step = 2.0 * slice.extent / f64::from(n);
    let origin = slice.center - DVec3::new(slice.extent, slice.extent, 0.0);
    let mut magnitudes = vec![0.0_f64; n as usize * n as usize];
    for row in 0..n {
        for col in 0..n {
            let x = origin.x + (f64::from(col) + 0.5) * step;
            let y = origin.y + (f64::from(n - row) - 0.5) * step;
            let position = DVec3::new(x, y, slice.center.z);
            magnitudes[(row * n + col) as usize] = sample_or_zero(field, position).length();
        }
    }

    let peak = magnitudes.iter().copied().fold(0.0_f64, f64::max);
    let pixels: Vec<u8> = magnitudes
        .iter()
        .map(|&m| if peak > 0.0 { (m / peak * 255.0).round() as u8 } else { 0 })
        .collect();
    let img = image::GrayImage::from_raw(n, n, pixels)
        .ok_or_else(|| FieldError::Io("pixel buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FieldError::Io(e.to_string()))
}
