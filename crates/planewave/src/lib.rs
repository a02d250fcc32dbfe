#![deny(unsafe_code)]
//! Plane-wave turbulent magnetic-field synthesis.
//!
//! A [`PlaneWaveTurbulence`] field is a superposition of discrete
//! transverse plane waves whose amplitudes follow a prescribed turbulence
//! spectrum. All randomness is drawn once at construction from a seeded
//! stream; afterwards the realization is a frozen lookup table and
//! evaluation is a pure function of position, safe to share across
//! threads. The superposition runs through one of two interchangeable
//! strategies (scalar reference, AVX kernel), picked by a CPU capability
//! check at construction.
//!
//! The SIMD kernel lives in [`simd`], the ensemble construction in
//! [`modes`], and the optional confinement cylinder in [`geometry`].

pub mod geometry;
pub mod modes;
pub mod simd;

use glam::DVec3;
use serde_json::{json, Value};
use tracing::debug;

use synturb_core::params::{param_bool, param_f64, param_string, param_usize, param_vec3};
use synturb_core::spectrum::{DEFAULT_Q_INDEX, DEFAULT_S_INDEX};
use synturb_core::units::{MICROGAUSS, PARSEC};
use synturb_core::{FieldError, MagneticField, TurbulenceSpectrum, Xorshift64};

pub use crate::geometry::CylinderGeometry;
pub use crate::modes::WaveMode;
pub use crate::simd::Strategy;

use crate::simd::LaneTable;

/// Default number of wave modes.
pub const DEFAULT_NUM_MODES: usize = 64;

/// Default rms field strength for JSON construction, in tesla.
pub const DEFAULT_BRMS: f64 = MICROGAUSS;

/// Default smallest turbulent length scale for JSON construction, in meters.
pub const DEFAULT_LMIN: f64 = PARSEC;

/// Default largest turbulent length scale for JSON construction, in meters.
pub const DEFAULT_LMAX: f64 = 100.0 * PARSEC;

/// Spatial structure of a turbulence realization.
///
/// A closed set, matched exhaustively wherever behavior depends on it, so
/// adding a kind surfaces every branch that needs a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurbulenceKind {
    /// Mode directions drawn uniformly over the sphere.
    Isotropic,
    /// All modes propagate along z; the field varies only with z.
    Slab,
    /// Slab-like modes whose planar components are replaced by an
    /// azimuthal profile around the confinement axis. Requires a
    /// [`CylinderGeometry`].
    Cylindrical,
}

impl TurbulenceKind {
    /// Name used in JSON parameters and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            TurbulenceKind::Isotropic => "isotropic",
            TurbulenceKind::Slab => "slab",
            TurbulenceKind::Cylindrical => "cylindrical",
        }
    }

    /// Parses a kind from its [`name`](TurbulenceKind::name).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "isotropic" => Some(TurbulenceKind::Isotropic),
            "slab" => Some(TurbulenceKind::Slab),
            "cylindrical" => Some(TurbulenceKind::Cylindrical),
            _ => None,
        }
    }
}

/// Construction parameters beyond the spectrum and the seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneWaveParams {
    /// Number of wave modes; at least two.
    pub num_modes: usize,
    /// Spatial structure of the realization.
    pub kind: TurbulenceKind,
    /// Optional confinement cylinder. Required for the cylindrical kind.
    pub geometry: Option<CylinderGeometry>,
}

impl Default for PlaneWaveParams {
    fn default() -> Self {
        Self {
            num_modes: DEFAULT_NUM_MODES,
            kind: TurbulenceKind::Isotropic,
            geometry: None,
        }
    }
}

/// A turbulent magnetic field synthesized from discrete plane waves.
///
/// The field vector at a position is
/// `Σᵢ polarizationᵢ · amplitudeᵢ · cos(kᵢ · (directionᵢ · pos) + phaseᵢ)`,
/// optionally masked by the confinement geometry. The ensemble is drawn
/// entirely at construction; identical `(spectrum, seed, params)` rebuild
/// the identical field on any machine, bit for bit within one strategy.
#[derive(Debug, Clone)]
pub struct PlaneWaveTurbulence {
    spectrum: TurbulenceSpectrum,
    kind: TurbulenceKind,
    geometry: Option<CylinderGeometry>,
    seed: u64,
    strategy: Strategy,
    modes: Vec<WaveMode>,
    table: LaneTable,
}

impl PlaneWaveTurbulence {
    /// Builds a realization from a spectrum, a seed, and parameters.
    ///
    /// Draws the full mode ensemble from a stream seeded with `seed` (every
    /// seed value is deterministic, including 0) and packs the lane table
    /// for the accelerated strategy. The evaluation strategy is detected
    /// here, once; see [`Strategy::detect`].
    ///
    /// # Errors
    ///
    /// [`FieldError::TooFewModes`] for `num_modes <= 1`,
    /// [`FieldError::MissingGeometry`] for the cylindrical kind without a
    /// geometry, and [`FieldError::InvalidParameter`] for bad geometry
    /// scalars.
    pub fn new(
        spectrum: TurbulenceSpectrum,
        seed: u64,
        params: PlaneWaveParams,
    ) -> Result<Self, FieldError> {
        if let Some(geometry) = &params.geometry {
            geometry.validate()?;
        }
        if params.kind == TurbulenceKind::Cylindrical && params.geometry.is_none() {
            return Err(FieldError::MissingGeometry);
        }

        let mut rng = Xorshift64::new(seed);
        let modes = modes::sample_modes(&spectrum, params.num_modes, params.kind, &mut rng)?;
        let table = LaneTable::pack(&modes);
        let strategy = Strategy::detect();
        debug!(
            num_modes = modes.len(),
            kind = params.kind.name(),
            strategy = strategy.name(),
            seed,
            "constructed plane-wave turbulence realization"
        );

        Ok(Self {
            spectrum,
            kind: params.kind,
            geometry: params.geometry,
            seed,
            strategy,
            modes,
            table,
        })
    }

    /// Builds a field from a JSON parameter object.
    ///
    /// Missing keys fall back to defaults: `brms` 1 µG, `lmin` 1 pc,
    /// `lmax` 100 pc, `lbendover` equal to `lmin`, the standard spectral
    /// indices, 64 isotropic modes, no geometry. A nested `geometry`
    /// object enables confinement; its sub-keys default to the unbounded
    /// cylinder.
    ///
    /// # Errors
    ///
    /// As [`PlaneWaveTurbulence::new`], plus spectrum construction errors
    /// and [`FieldError::InvalidParameter`] for an unknown `kind` name.
    pub fn from_json(seed: u64, params: &Value) -> Result<Self, FieldError> {
        let lmin = param_f64(params, "lmin", DEFAULT_LMIN);
        let spectrum = TurbulenceSpectrum::with_indices(
            param_f64(params, "brms", DEFAULT_BRMS),
            lmin,
            param_f64(params, "lmax", DEFAULT_LMAX),
            param_f64(params, "lbendover", lmin),
            param_f64(params, "s_index", DEFAULT_S_INDEX),
            param_f64(params, "q_index", DEFAULT_Q_INDEX),
        )?;
        let kind_name = param_string(params, "kind", TurbulenceKind::Isotropic.name());
        let kind =
            TurbulenceKind::parse(&kind_name).ok_or_else(|| FieldError::InvalidParameter {
                name: "kind".into(),
                reason: format!("unknown turbulence kind {kind_name:?}"),
            })?;
        Self::new(
            spectrum,
            seed,
            PlaneWaveParams {
                num_modes: param_usize(params, "num_modes", DEFAULT_NUM_MODES),
                kind,
                geometry: params.get("geometry").map(geometry_from_json),
            },
        )
    }

    /// Replaces the evaluation strategy, for comparisons and benchmarks.
    ///
    /// # Errors
    ///
    /// [`FieldError::InvalidParameter`] when the requested strategy is not
    /// available on this CPU.
    pub fn with_strategy(mut self, strategy: Strategy) -> Result<Self, FieldError> {
        if !strategy.available() {
            return Err(FieldError::InvalidParameter {
                name: "strategy".into(),
                reason: format!("{} is not available on this cpu", strategy.name()),
            });
        }
        self.strategy = strategy;
        Ok(self)
    }

    /// The field vector at `position`, in tesla.
    ///
    /// Total function of the position and the frozen ensemble: no
    /// validation, no failure paths, no interior mutability.
    pub fn sample(&self, position: DVec3) -> DVec3 {
        let axial = match &self.geometry {
            Some(geometry) => match geometry.axial_scale(position.z) {
                Some(scale) => scale,
                // Beyond the axial cutoff nothing survives; skip the
                // superposition entirely.
                None => return DVec3::ZERO,
            },
            None => 1.0,
        };

        let raw = simd::superpose(self.strategy, &self.modes, &self.table, position);

        let field = match (self.kind, &self.geometry) {
            (TurbulenceKind::Cylindrical, Some(geometry)) => {
                // The azimuthal profile carries the raw magnitude in the
                // plane; the axial component passes through unchanged.
                let swirl = geometry.azimuthal_swirl(position);
                let magnitude = raw.length();
                DVec3::new(swirl.x * magnitude, swirl.y * magnitude, raw.z)
            }
            // Construction rejects this combination; kept total anyway.
            (TurbulenceKind::Cylindrical, None) => raw,
            (TurbulenceKind::Isotropic | TurbulenceKind::Slab, Some(geometry)) => {
                raw * geometry.radial_attenuation(position)
            }
            (TurbulenceKind::Isotropic | TurbulenceKind::Slab, None) => raw,
        };

        field * axial
    }

    /// The spectrum this realization was drawn from.
    pub fn spectrum(&self) -> &TurbulenceSpectrum {
        &self.spectrum
    }

    /// Spatial structure of the realization.
    pub fn kind(&self) -> TurbulenceKind {
        self.kind
    }

    /// The confinement geometry, if any.
    pub fn geometry(&self) -> Option<&CylinderGeometry> {
        self.geometry.as_ref()
    }

    /// Seed the mode ensemble was drawn from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The evaluation strategy in use.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The frozen mode ensemble.
    pub fn modes(&self) -> &[WaveMode] {
        &self.modes
    }
}

impl MagneticField for PlaneWaveTurbulence {
    fn at(&self, position: DVec3) -> Result<DVec3, FieldError> {
        Ok(self.sample(position))
    }

    fn description(&self) -> String {
        format!(
            "plane-wave turbulence: {} {} modes on [{:.3e}, {:.3e}] m, \
             brms = {:.3e} T, {} strategy",
            self.modes.len(),
            self.kind.name(),
            self.spectrum.lmin(),
            self.spectrum.lmax(),
            self.spectrum.brms(),
            self.strategy.name()
        )
    }

    fn params(&self) -> Value {
        let geometry = self.geometry.as_ref().map(|g| {
            json!({
                "center": [g.center.x, g.center.y, g.center.z],
                "radius": g.radius,
                "transition_width": g.transition_width,
                "decay_length": g.decay_length,
                "axial_length": g.axial_length,
                "axial_constant": g.axial_constant,
            })
        });
        json!({
            "brms": self.spectrum.brms(),
            "lmin": self.spectrum.lmin(),
            "lmax": self.spectrum.lmax(),
            "lbendover": self.spectrum.lbendover(),
            "s_index": self.spectrum.s_index(),
            "q_index": self.spectrum.q_index(),
            "num_modes": self.modes.len(),
            "kind": self.kind.name(),
            "seed": self.seed,
            "strategy": self.strategy.name(),
            "geometry": geometry,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "brms": {
                "type": "number",
                "default": DEFAULT_BRMS,
                "description": "Target rms field strength in tesla"
            },
            "lmin": {
                "type": "number",
                "default": DEFAULT_LMIN,
                "description": "Smallest turbulent length scale in meters"
            },
            "lmax": {
                "type": "number",
                "default": DEFAULT_LMAX,
                "description": "Largest turbulent length scale in meters"
            },
            "lbendover": {
                "type": "number",
                "default": "lmin",
                "description": "Bend-over scale of the spectrum in meters"
            },
            "s_index": {
                "type": "number",
                "default": DEFAULT_S_INDEX,
                "description": "Inertial-range spectral index"
            },
            "q_index": {
                "type": "number",
                "default": DEFAULT_Q_INDEX,
                "description": "Energy-range spectral index"
            },
            "num_modes": {
                "type": "integer",
                "default": DEFAULT_NUM_MODES,
                "description": "Number of wave modes, at least two"
            },
            "kind": {
                "type": "string",
                "default": "isotropic",
                "description": "isotropic, slab, or cylindrical"
            },
            "geometry": {
                "type": "object",
                "default": null,
                "description": "Confinement cylinder: center, radius, \
                                transition_width, decay_length, axial_length, \
                                axial_constant"
            },
        })
    }
}

fn geometry_from_json(params: &Value) -> CylinderGeometry {
    let defaults = CylinderGeometry::default();
    CylinderGeometry {
        center: param_vec3(params, "center", defaults.center),
        radius: param_f64(params, "radius", defaults.radius),
        transition_width: param_f64(params, "transition_width", defaults.transition_width),
        decay_length: param_f64(params, "decay_length", defaults.decay_length),
        axial_length: param_f64(params, "axial_length", defaults.axial_length),
        axial_constant: param_bool(params, "axial_constant", defaults.axial_constant),
    }
}
