//! Smith & Barstad (2004) transfer function from terrain spectrum to
//! precipitation spectrum.
//!
//! ```text
//!            cw · i·σ · ĥ
//! P̂ = ─────────────────────────────────────────
//!     (1 − i·hw·m) (1 + i·σ·τc) (1 + i·σ·τf)
//! ```
//!
//! with intrinsic frequency `σ = kx·u + ky·v` and vertical wavenumber `m`.
//! `σ² = f²` and `σ² = nm²` are singular; the denominator of `m²` is pushed to
//! ±EPS near zero instead of taking a limit, and the numerator is clipped at
//! zero.

use num_complex::Complex64;

use crate::atmosphere::Wind;
use crate::params::PrecipParams;

/// Clamp threshold: machine epsilon for f64.
pub const EPS: f64 = f64::EPSILON;

/// Push `x` out of `(−EPS, EPS)` while keeping its sign.
///
/// `0.0` and `−0.0` both map to `+EPS`.
#[inline]
pub fn clamp_away_from_zero(x: f64) -> f64 {
    if (0.0..EPS).contains(&x) {
        EPS
    } else if x < 0.0 && x > -EPS {
        -EPS
    } else {
        x
    }
}

/// Vertical wavenumber `m` for one spectral bin.
///
/// `m = sign(σ) · sqrt(|max(nm² − σ², 0) / clamp(σ² − f²) · (kx² + ky²)|)`,
/// where `sign(σ)` is +1 for `σ ≥ 0`. The sign picks the radiating branch and
/// must stay discontinuous at `σ = 0`.
#[inline]
pub fn vertical_wavenumber(kx: f64, ky: f64, sigma: f64, nm: f64, f: f64) -> f64 {
    let num = (nm * nm - sigma * sigma).max(0.0);
    let den = clamp_away_from_zero(sigma * sigma - f * f);
    let sign = if sigma >= 0.0 { 1.0 } else { -1.0 };
    sign * (num / den * (kx * kx + ky * ky)).abs().sqrt()
}

/// Per-bin transfer function for one parameter set.
#[derive(Debug, Clone, Copy)]
pub struct TransferFunction {
    wind: Wind,
    coriolis: f64,
    nm: f64,
    hw: f64,
    cw: f64,
    conv_time: f64,
    fall_time: f64,
}

impl TransferFunction {
    pub fn new(params: &PrecipParams, wind: Wind, coriolis: f64) -> Self {
        Self {
            wind,
            coriolis,
            nm: params.nm,
            hw: params.hw,
            cw: params.cw,
            conv_time: params.conv_time,
            fall_time: params.fall_time,
        }
    }

    /// Intrinsic frequency `σ = kx·u + ky·v`.
    #[inline]
    pub fn intrinsic_frequency(&self, kx: f64, ky: f64) -> f64 {
        kx * self.wind.u + ky * self.wind.v
    }

    /// Map the terrain coefficient `h_hat` at `(kx, ky)` to precipitation.
    #[inline]
    pub fn apply(&self, kx: f64, ky: f64, h_hat: Complex64) -> Complex64 {
        let sigma = self.intrinsic_frequency(kx, ky);
        let m = vertical_wavenumber(kx, ky, sigma, self.nm, self.coriolis);

        let uplift = Complex64::new(0.0, self.cw * sigma) * h_hat;
        let airflow = Complex64::new(1.0, -self.hw * m);
        let conversion = Complex64::new(1.0, sigma * self.conv_time);
        let fallout = Complex64::new(1.0, sigma * self.fall_time);

        uplift / (airflow * conversion * fallout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn clamp_preserves_sign() {
        assert_eq!(clamp_away_from_zero(0.0), EPS);
        assert_eq!(clamp_away_from_zero(-0.0), EPS);
        assert_eq!(clamp_away_from_zero(1e-20), EPS);
        assert_eq!(clamp_away_from_zero(-1e-20), -EPS);
        assert_eq!(clamp_away_from_zero(EPS), EPS);
        assert_eq!(clamp_away_from_zero(-EPS), -EPS);
        assert_eq!(clamp_away_from_zero(0.5), 0.5);
        assert_eq!(clamp_away_from_zero(-3.0), -3.0);
    }

    #[test]
    fn vertical_wavenumber_sign_follows_sigma() {
        let (kx, ky, nm, f) = (1e-3, 2e-3, 0.01, 1e-4);
        let up = vertical_wavenumber(kx, ky, 5e-3, nm, f);
        let down = vertical_wavenumber(kx, ky, -5e-3, nm, f);
        assert!(up > 0.0, "m for σ > 0 should be positive, got {up}");
        assert_abs_diff_eq!(up, -down, epsilon = 1e-18);
        // σ = 0 takes the positive branch.
        assert!(vertical_wavenumber(kx, ky, 0.0, nm, f) >= 0.0);
    }

    #[test]
    fn vertical_wavenumber_vanishes_above_stability_frequency() {
        // σ² > nm² clips the numerator to zero: evanescent modes carry no m.
        assert_eq!(vertical_wavenumber(1e-3, 0.0, 0.02, 0.01, 1e-4), 0.0);
    }

    #[test]
    fn vertical_wavenumber_matches_hydrostatic_limit() {
        // For f ≪ σ ≪ nm, m ≈ nm·|k| / σ.
        let (kx, u, nm) = (2e-5, 10.0, 0.01);
        let sigma = kx * u;
        let m = vertical_wavenumber(kx, 0.0, sigma, nm, 0.0);
        assert_abs_diff_eq!(m, nm / u, epsilon = 1e-6);
    }

    #[test]
    fn singular_denominator_stays_finite() {
        let f = 1.4e-4;
        let m = vertical_wavenumber(3e-4, 0.0, f, 0.01, f);
        assert!(m.is_finite() && m > 0.0, "m = {m}");

        let params = PrecipParams::default();
        let tf = TransferFunction::new(&params, Wind { u: f / 3e-4, v: 0.0 }, f);
        let p = tf.apply(3e-4, 0.0, Complex64::new(1.0e6, -2.0e5));
        assert!(p.re.is_finite() && p.im.is_finite(), "P̂ = {p}");
    }

    #[test]
    fn zero_wavenumber_bin_is_removed() {
        let params = PrecipParams::default();
        let tf = TransferFunction::new(&params, Wind::from_direction(15.0, 270.0), 1e-4);
        let p = tf.apply(0.0, 0.0, Complex64::new(5.0e7, 0.0));
        assert_eq!(p, Complex64::new(0.0, 0.0));
    }

    #[test]
    fn without_delays_or_airflow_response_output_is_pure_uplift() {
        let params = PrecipParams {
            nm: 0.0,
            conv_time: 0.0,
            fall_time: 0.0,
            cw: 0.01,
            ..Default::default()
        };
        let wind = Wind { u: 10.0, v: 0.0 };
        let tf = TransferFunction::new(&params, wind, 0.0);
        let h_hat = Complex64::new(2.0, 1.0);
        let p = tf.apply(1e-3, 0.0, h_hat);
        let expected = Complex64::new(0.0, 0.01 * 1e-2) * h_hat;
        assert_abs_diff_eq!(p.re, expected.re, epsilon = 1e-15);
        assert_abs_diff_eq!(p.im, expected.im, epsilon = 1e-15);
    }
}
