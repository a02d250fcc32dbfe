//! Cylindrical confinement geometry.
//!
//! A realization can be confined to a cylinder aligned with the z axis:
//! smooth radial attenuation outside the surface, an axial cutoff with an
//! optional linear profile along the axis, and the divergence-free
//! azimuthal profile used by the cylindrical turbulence kind. All of this
//! is pure arithmetic over parameters validated at field construction;
//! evaluation has no failure paths.

use glam::DVec3;
use synturb_core::units::PARSEC;
use synturb_core::FieldError;

/// Numerical guard against division by zero on the cylinder axis.
const AXIS_EPSILON: f64 = 1e-8;

/// Width of the tanh edge profile of the azimuthal field, in meters.
const EDGE_WIDTH: f64 = 1.0;

/// Confinement cylinder for a turbulence realization.
///
/// The cylinder axis is parallel to z through `center`. An infinite
/// `radius` disables the radial mask and `axial_length <= 0` disables the
/// axial one, so the default value masks nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderGeometry {
    /// Point on the cylinder axis; distances are measured from it in the
    /// z = 0 plane.
    pub center: DVec3,
    /// Cylinder radius, in meters. May be infinite.
    pub radius: f64,
    /// Width of the sigmoid roll-off just outside the surface, in meters.
    pub transition_width: f64,
    /// e-folding length of the exponential decay outside the surface, in
    /// meters.
    pub decay_length: f64,
    /// Axial extent, in meters. Non-positive disables the axial mask.
    pub axial_length: f64,
    /// With an axial extent set: `true` keeps the field constant along the
    /// axis, `false` scales it linearly with `z / axial_length`.
    pub axial_constant: bool,
}

impl Default for CylinderGeometry {
    fn default() -> Self {
        Self {
            center: DVec3::ZERO,
            radius: f64::INFINITY,
            transition_width: PARSEC,
            decay_length: PARSEC,
            axial_length: 0.0,
            axial_constant: false,
        }
    }
}

impl CylinderGeometry {
    /// Checks the scalar parameters.
    ///
    /// # Errors
    ///
    /// Rejects NaN anywhere, negative `radius`, `transition_width`, or
    /// `decay_length`, and non-finite `center` or `axial_length`.
    pub fn validate(&self) -> Result<(), FieldError> {
        if !self.center.is_finite() {
            return Err(FieldError::InvalidParameter {
                name: "center".into(),
                reason: format!("must be finite, got {:?}", self.center),
            });
        }
        if !(self.radius >= 0.0) {
            return Err(FieldError::InvalidParameter {
                name: "radius".into(),
                reason: format!("must be non-negative, got {}", self.radius),
            });
        }
        for (name, value) in [
            ("transition_width", self.transition_width),
            ("decay_length", self.decay_length),
        ] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(FieldError::InvalidParameter {
                    name: name.into(),
                    reason: format!("must be non-negative and finite, got {value}"),
                });
            }
        }
        if !self.axial_length.is_finite() {
            return Err(FieldError::InvalidParameter {
                name: "axial_length".into(),
                reason: format!("must be finite, got {}", self.axial_length),
            });
        }
        Ok(())
    }

    /// Axial mask factor at height `z`, or `None` beyond the cutoff.
    ///
    /// With no axial extent the factor is always 1. With one, positions
    /// above it are cut off entirely; below it the factor is 1 in constant
    /// mode and `z / axial_length` in linear mode. The linear profile is
    /// not clamped, so it passes through zero at the base and goes
    /// negative below it.
    pub fn axial_scale(&self, z: f64) -> Option<f64> {
        if self.axial_length > 0.0 {
            if z > self.axial_length {
                return None;
            }
            if !self.axial_constant {
                return Some(z / self.axial_length);
            }
        }
        Some(1.0)
    }

    /// Radial attenuation factor at `position`.
    ///
    /// Exactly 1 out to the surface. Beyond it, a logistic roll-off over
    /// `transition_width` times an exponential decay over `decay_length`;
    /// both factors start at 1 on the surface and fall monotonically, so a
    /// few transition widths out the field is effectively gone.
    pub fn radial_attenuation(&self, position: DVec3) -> f64 {
        let excess = self.planar_offset(position).length() - self.radius;
        if excess <= 0.0 {
            return 1.0;
        }
        let transition = 1.0 / (1.0 + (-excess / self.transition_width).exp());
        (1.0 - transition) * (-excess / self.decay_length).exp()
    }

    /// Divergence-free azimuthal profile at `position`, in the z = 0 plane.
    ///
    /// Circles the axis counterclockwise with a tanh shoulder at the
    /// surface: magnitude near 2 deep inside, near 0 outside, and exactly
    /// 0 on the axis itself. The cylindrical turbulence kind replaces the
    /// planar field components with this profile scaled by the raw field
    /// magnitude.
    pub fn azimuthal_swirl(&self, position: DVec3) -> DVec3 {
        let offset = self.planar_offset(position);
        let r = offset.length();
        let shoulder = 1.0 - ((r - self.radius) / EDGE_WIDTH).tanh();
        DVec3::new(
            -offset.y / (r + AXIS_EPSILON) * shoulder,
            offset.x / (r + AXIS_EPSILON) * shoulder,
            0.0,
        )
    }

    fn planar_offset(&self, position: DVec3) -> DVec3 {
        DVec3::new(position.x, position.y, 0.0) - self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded() -> CylinderGeometry {
        CylinderGeometry {
            radius: 10.0,
            transition_width: 1.0,
            decay_length: 1.0,
            ..CylinderGeometry::default()
        }
    }

    // ---- Validation tests ----

    #[test]
    fn default_geometry_validates_and_masks_nothing() {
        let geometry = CylinderGeometry::default();
        geometry.validate().unwrap();
        assert_eq!(geometry.axial_scale(1e20), Some(1.0));
        assert_eq!(geometry.radial_attenuation(DVec3::splat(1e20)), 1.0);
    }

    #[test]
    fn validate_rejects_negative_radius() {
        let geometry = CylinderGeometry {
            radius: -1.0,
            ..CylinderGeometry::default()
        };
        assert!(matches!(
            geometry.validate().unwrap_err(),
            FieldError::InvalidParameter { .. }
        ));
    }

    #[test]
    fn validate_rejects_nan_widths() {
        let geometry = CylinderGeometry {
            transition_width: f64::NAN,
            ..CylinderGeometry::default()
        };
        assert!(geometry.validate().is_err());
        let geometry = CylinderGeometry {
            decay_length: -2.0,
            ..CylinderGeometry::default()
        };
        assert!(geometry.validate().is_err());
    }

    #[test]
    fn validate_rejects_infinite_axial_length() {
        let geometry = CylinderGeometry {
            axial_length: f64::INFINITY,
            ..CylinderGeometry::default()
        };
        assert!(geometry.validate().is_err());
    }

    #[test]
    fn validate_accepts_infinite_radius() {
        CylinderGeometry::default().validate().unwrap();
    }

    // ---- Axial mask tests ----

    #[test]
    fn axial_scale_cuts_off_above_the_extent() {
        let geometry = CylinderGeometry {
            axial_length: 50.0,
            ..bounded()
        };
        assert_eq!(geometry.axial_scale(50.1), None);
        assert!(geometry.axial_scale(50.0).is_some());
    }

    #[test]
    fn axial_scale_is_linear_by_default() {
        let geometry = CylinderGeometry {
            axial_length: 50.0,
            ..bounded()
        };
        assert_eq!(geometry.axial_scale(25.0), Some(0.5));
        assert_eq!(geometry.axial_scale(0.0), Some(0.0));
        // Unclamped below the base.
        assert_eq!(geometry.axial_scale(-25.0), Some(-0.5));
    }

    #[test]
    fn axial_scale_constant_mode_is_flat() {
        let geometry = CylinderGeometry {
            axial_length: 50.0,
            axial_constant: true,
            ..bounded()
        };
        assert_eq!(geometry.axial_scale(1.0), Some(1.0));
        assert_eq!(geometry.axial_scale(49.0), Some(1.0));
        assert_eq!(geometry.axial_scale(51.0), None);
    }

    // ---- Radial attenuation tests ----

    #[test]
    fn radial_attenuation_is_unity_inside() {
        let geometry = bounded();
        assert_eq!(geometry.radial_attenuation(DVec3::ZERO), 1.0);
        assert_eq!(geometry.radial_attenuation(DVec3::new(9.99, 0.0, 5.0)), 1.0);
        assert_eq!(geometry.radial_attenuation(DVec3::new(10.0, 0.0, 0.0)), 1.0);
    }

    #[test]
    fn radial_attenuation_vanishes_a_few_widths_out() {
        let geometry = bounded();
        let factor = geometry.radial_attenuation(DVec3::new(15.0, 0.0, 0.0));
        assert!(factor < 1e-3, "attenuation {factor} too weak 5 widths out");
        assert!(factor > 0.0);
    }

    #[test]
    fn radial_attenuation_decreases_monotonically_outside() {
        let geometry = bounded();
        let mut previous = 1.0;
        for step in 1..50 {
            let d = 10.0 + step as f64 * 0.25;
            let factor = geometry.radial_attenuation(DVec3::new(d, 0.0, 0.0));
            assert!(
                factor <= previous,
                "attenuation climbed from {previous} to {factor} at d = {d}"
            );
            previous = factor;
        }
    }

    #[test]
    fn radial_attenuation_ignores_the_z_coordinate() {
        let geometry = bounded();
        let low = geometry.radial_attenuation(DVec3::new(12.0, 0.0, -40.0));
        let high = geometry.radial_attenuation(DVec3::new(12.0, 0.0, 40.0));
        assert_eq!(low.to_bits(), high.to_bits());
    }

    #[test]
    fn radial_attenuation_measures_from_the_center() {
        let geometry = CylinderGeometry {
            center: DVec3::new(100.0, 0.0, 0.0),
            ..bounded()
        };
        assert_eq!(geometry.radial_attenuation(DVec3::new(100.0, 5.0, 0.0)), 1.0);
        assert!(geometry.radial_attenuation(DVec3::ZERO) < 1e-3);
    }

    #[test]
    fn zero_transition_width_gives_a_hard_edge_without_nan() {
        let geometry = CylinderGeometry {
            transition_width: 0.0,
            ..bounded()
        };
        let factor = geometry.radial_attenuation(DVec3::new(10.5, 0.0, 0.0));
        assert!(factor.is_finite());
        assert_eq!(factor, 0.0);
    }

    // ---- Azimuthal profile tests ----

    #[test]
    fn azimuthal_swirl_is_perpendicular_to_the_radial_direction() {
        let geometry = bounded();
        for position in [
            DVec3::new(3.0, 4.0, 0.0),
            DVec3::new(-7.0, 2.0, 12.0),
            DVec3::new(0.5, -0.5, -3.0),
        ] {
            let swirl = geometry.azimuthal_swirl(position);
            let radial = DVec3::new(position.x, position.y, 0.0);
            assert!(
                swirl.dot(radial).abs() < 1e-9 * radial.length() * swirl.length().max(1.0),
                "swirl not azimuthal at {position:?}"
            );
            assert_eq!(swirl.z, 0.0);
        }
    }

    #[test]
    fn azimuthal_swirl_vanishes_on_the_axis() {
        let geometry = bounded();
        assert_eq!(geometry.azimuthal_swirl(DVec3::new(0.0, 0.0, 7.0)), DVec3::ZERO);
    }

    #[test]
    fn azimuthal_swirl_magnitude_doubles_deep_inside() {
        // Far from the edge the tanh shoulder contributes a factor of 2.
        let geometry = CylinderGeometry {
            radius: 1e6,
            ..bounded()
        };
        let magnitude = geometry.azimuthal_swirl(DVec3::new(5e5, 0.0, 0.0)).length();
        assert!(
            (magnitude - 2.0).abs() < 1e-6,
            "interior swirl magnitude {magnitude} != 2"
        );
    }

    #[test]
    fn azimuthal_swirl_fades_outside_the_surface() {
        let geometry = bounded();
        let outside = geometry.azimuthal_swirl(DVec3::new(20.0, 0.0, 0.0)).length();
        assert!(outside < 1e-6, "swirl {outside} survives outside the surface");
    }

    #[test]
    fn azimuthal_swirl_circles_counterclockwise() {
        let geometry = bounded();
        // At +x the field should point toward +y.
        let swirl = geometry.azimuthal_swirl(DVec3::new(5.0, 0.0, 0.0));
        assert!(swirl.y > 0.0 && swirl.x.abs() < 1e-12);
    }
}
