//! Evaluation strategies for the mode superposition.
//!
//! Two interchangeable implementations of the same sum: a scalar loop over
//! the mode ensemble with the platform cosine, and a four-lane AVX kernel
//! over a lane-padded structure-of-arrays copy of the ensemble, using a
//! polynomial `cos(π·x)`. The strategy is a capability decision made once
//! at field construction; both produce the same field up to the documented
//! accuracy of the polynomial, and the scalar path is the reference.

#![allow(unsafe_code)]

use std::f64::consts::PI;

use glam::DVec3;

use crate::modes::WaveMode;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// 2^52 + 2^51. Adding this to a float in (-2^51, 2^51) pins the exponent
/// and leaves the integer parity in mantissa bit 0.
const PARITY_SHIFT: f64 = 6_755_399_441_055_744.0;

/// Sign and exponent bits plus mantissa bit 0.
const PARITY_MASK: i64 = 0xfff0_0000_0000_0001_u64 as i64;

/// Bit pattern of 2^52 + 1: the pinned exponent with an odd mantissa LSB.
const ODD_PATTERN: i64 = 0x4330_0000_0000_0001;

/// Minimax coefficients for cos(π·s) on s ∈ [-1/2, 1/2] as a polynomial in
/// s², highest power first; the trailing constant term 1 is applied in the
/// kernel. Worst-case absolute error is below 2.5e-7, at the interval ends.
const COS_PI_POLY: [f64; 4] = [
    0.221_185_208_065_374_394_6,
    -1.332_560_668_688_523_853,
    4.058_509_506_474_178_075,
    -4.934_797_516_664_651_162,
];

/// Evaluation strategy for the wave-mode superposition.
///
/// Selecting a strategy never changes the observable contract, only the
/// speed and the (documented) rounding of the cosine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Per-mode loop with the platform cosine. Always available; the
    /// numerical reference.
    Scalar,
    /// Four-lane AVX kernel with the polynomial cosine. x86_64 CPUs with
    /// AVX only.
    Avx,
}

impl Strategy {
    /// Picks the fastest strategy available on this CPU.
    ///
    /// The capability check runs here, once per constructed field;
    /// evaluation never re-detects.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if std::arch::is_x86_feature_detected!("avx") {
                return Strategy::Avx;
            }
        }
        Strategy::Scalar
    }

    /// Whether this strategy can run on the current CPU.
    pub fn available(self) -> bool {
        match self {
            Strategy::Scalar => true,
            Strategy::Avx => Strategy::detect() == Strategy::Avx,
        }
    }

    /// Name for logs and parameter output.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Scalar => "scalar",
            Strategy::Avx => "avx",
        }
    }
}

/// Lane-padded structure-of-arrays copy of a mode ensemble.
///
/// Seven rows of `lanes` values: the three components of
/// `amplitude · polarization`, the three components of
/// `(wavenumber/π) · direction`, and `phase/π`. The π divisions move the
/// kernel onto `cos(π·x)`, whose argument reduction is a plain round.
/// Rows are zero-padded to a multiple of four lanes; padded lanes carry
/// zero amplitude and contribute nothing, so the kernel needs no scalar
/// tail. Loads are unaligned, trading a negligible penalty for not
/// hand-aligning allocations.
#[derive(Debug, Clone)]
pub(crate) struct LaneTable {
    lanes: usize,
    rows: Vec<f64>,
}

const ROW_AXI_X: usize = 0;
const ROW_AXI_Y: usize = 1;
const ROW_AXI_Z: usize = 2;
const ROW_KDIR_X: usize = 3;
const ROW_KDIR_Y: usize = 4;
const ROW_KDIR_Z: usize = 5;
const ROW_PHASE: usize = 6;
const ROWS: usize = 7;

impl LaneTable {
    pub(crate) fn pack(modes: &[WaveMode]) -> Self {
        let lanes = modes.len().div_ceil(4) * 4;
        let mut rows = vec![0.0; ROWS * lanes];
        for (i, mode) in modes.iter().enumerate() {
            rows[ROW_AXI_X * lanes + i] = mode.amplitude * mode.polarization.x;
            rows[ROW_AXI_Y * lanes + i] = mode.amplitude * mode.polarization.y;
            rows[ROW_AXI_Z * lanes + i] = mode.amplitude * mode.polarization.z;
            rows[ROW_KDIR_X * lanes + i] = mode.wavenumber / PI * mode.direction.x;
            rows[ROW_KDIR_Y * lanes + i] = mode.wavenumber / PI * mode.direction.y;
            rows[ROW_KDIR_Z * lanes + i] = mode.wavenumber / PI * mode.direction.z;
            rows[ROW_PHASE * lanes + i] = mode.phase / PI;
        }
        Self { lanes, rows }
    }

    #[cfg(target_arch = "x86_64")]
    fn row(&self, index: usize) -> &[f64] {
        &self.rows[index * self.lanes..(index + 1) * self.lanes]
    }
}

/// Runs the superposition with the given strategy.
pub(crate) fn superpose(
    strategy: Strategy,
    modes: &[WaveMode],
    table: &LaneTable,
    position: DVec3,
) -> DVec3 {
    match strategy {
        Strategy::Scalar => superpose_scalar(modes, position),
        #[cfg(target_arch = "x86_64")]
        // SAFETY: `Strategy::Avx` only reaches evaluation after the runtime
        // capability check in `Strategy::detect` / `Strategy::available`.
        Strategy::Avx => unsafe { superpose_avx(table, position) },
        #[cfg(not(target_arch = "x86_64"))]
        Strategy::Avx => superpose_scalar(modes, position),
    }
}

/// Reference superposition: per-mode loop with the platform cosine.
pub(crate) fn superpose_scalar(modes: &[WaveMode], position: DVec3) -> DVec3 {
    let mut total = DVec3::ZERO;
    for mode in modes {
        let along = mode.direction.dot(position);
        total +=
            mode.polarization * mode.amplitude * (mode.wavenumber * along + mode.phase).cos();
    }
    total
}

/// Four-lane AVX superposition over the packed table.
///
/// Same sum as [`superpose_scalar`], with the cosine replaced by the
/// polynomial approximation; per-component results agree with the scalar
/// path within `2.5e-7 · Σ|amplitude|`, which Cauchy-Schwarz bounds by
/// `2.5e-7 · sqrt(2 · num_modes) · brms`. Arguments are valid out to
/// `|k · pos / π| < 2^51` half-waves, beyond which the input itself no
/// longer resolves the phase.
///
/// # Safety
///
/// The CPU must support AVX; callers check `Strategy::available` (or
/// `Strategy::detect`) before dispatching here.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx")]
unsafe fn superpose_avx(table: &LaneTable, position: DVec3) -> DVec3 {
    // SAFETY: all intrinsics below are AVX operations, guaranteed present
    // by this function's contract. Loads are unaligned (`loadu`), and every
    // `add(i)` stays within a row because `lanes` is a multiple of four.
    unsafe {
        let axi_x = table.row(ROW_AXI_X).as_ptr();
        let axi_y = table.row(ROW_AXI_Y).as_ptr();
        let axi_z = table.row(ROW_AXI_Z).as_ptr();
        let kdir_x = table.row(ROW_KDIR_X).as_ptr();
        let kdir_y = table.row(ROW_KDIR_Y).as_ptr();
        let kdir_z = table.row(ROW_KDIR_Z).as_ptr();
        let phases = table.row(ROW_PHASE).as_ptr();

        let pos_x = _mm256_set1_pd(position.x);
        let pos_y = _mm256_set1_pd(position.y);
        let pos_z = _mm256_set1_pd(position.z);

        // One accumulator per output component; each holds four partial
        // sums that collapse at the end.
        let mut acc_x = _mm256_setzero_pd();
        let mut acc_y = _mm256_setzero_pd();
        let mut acc_z = _mm256_setzero_pd();

        let mut i = 0;
        while i < table.lanes {
            // (k/π · direction) · position + phase/π: the cosine argument
            // in units of half-waves.
            let along = _mm256_add_pd(
                _mm256_mul_pd(pos_x, _mm256_loadu_pd(kdir_x.add(i))),
                _mm256_add_pd(
                    _mm256_mul_pd(pos_y, _mm256_loadu_pd(kdir_y.add(i))),
                    _mm256_mul_pd(pos_z, _mm256_loadu_pd(kdir_z.add(i))),
                ),
            );
            let wave = cos_pi(_mm256_add_pd(along, _mm256_loadu_pd(phases.add(i))));

            acc_x = _mm256_add_pd(_mm256_mul_pd(wave, _mm256_loadu_pd(axi_x.add(i))), acc_x);
            acc_y = _mm256_add_pd(_mm256_mul_pd(wave, _mm256_loadu_pd(axi_y.add(i))), acc_y);
            acc_z = _mm256_add_pd(_mm256_mul_pd(wave, _mm256_loadu_pd(axi_z.add(i))), acc_z);

            i += 4;
        }

        DVec3::new(hsum(acc_x), hsum(acc_y), hsum(acc_z))
    }
}

/// `cos(π·x)` for each lane.
///
/// Rounding to the nearest integer (ties to even) finds the index of the
/// containing half-wave; the offset from its center drives a polynomial in
/// the squared offset; the parity of the index decides the sign. Parity is
/// extracted without integer instructions (AVX has no 64-bit integer
/// compare): adding 2^52 + 2^51 pins the exponent and shifts the integer
/// part down to the mantissa, where bit 0 is the parity. Masking keeps
/// that bit together with the pinned exponent so the compare sees a normal
/// float rather than a denormal, and the resulting all-ones/all-zeros lane
/// mask reduces to a sign bit xor'ed onto the polynomial.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx")]
#[inline]
unsafe fn cos_pi(x: __m256d) -> __m256d {
    // SAFETY: AVX-only intrinsics, guaranteed by the caller's contract.
    unsafe {
        // Index of the containing half-wave; ties-to-even matches the
        // scalar `round_ties_even` used in tests.
        let q = _mm256_round_pd::<{ _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC }>(x);
        // Offset from the half-wave center, in [-1/2, 1/2].
        let s = _mm256_sub_pd(x, q);

        let shifted = _mm256_add_pd(q, _mm256_set1_pd(PARITY_SHIFT));
        let parity = _mm256_and_pd(
            shifted,
            _mm256_castsi256_pd(_mm256_set1_epi64x(PARITY_MASK)),
        );
        let odd = _mm256_cmp_pd::<_CMP_EQ_OQ>(
            parity,
            _mm256_castsi256_pd(_mm256_set1_epi64x(ODD_PATTERN)),
        );
        // Odd lanes keep only the sign bit, flipping the polynomial below.
        let sign_flip = _mm256_and_pd(odd, _mm256_set1_pd(-0.0));

        let s2 = _mm256_mul_pd(s, s);
        let mut u = _mm256_set1_pd(COS_PI_POLY[0]);
        u = _mm256_add_pd(_mm256_mul_pd(u, s2), _mm256_set1_pd(COS_PI_POLY[1]));
        u = _mm256_add_pd(_mm256_mul_pd(u, s2), _mm256_set1_pd(COS_PI_POLY[2]));
        u = _mm256_add_pd(_mm256_mul_pd(u, s2), _mm256_set1_pd(COS_PI_POLY[3]));
        u = _mm256_add_pd(_mm256_mul_pd(u, s2), _mm256_set1_pd(1.0));

        _mm256_xor_pd(u, sign_flip)
    }
}

/// Sums the four lanes of an accumulator.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx")]
#[inline]
unsafe fn hsum(v: __m256d) -> f64 {
    // SAFETY: unaligned store into a local array, AVX per the contract.
    unsafe {
        let mut lanes = [0.0_f64; 4];
        _mm256_storeu_pd(lanes.as_mut_ptr(), v);
        lanes.iter().sum()
    }
}
