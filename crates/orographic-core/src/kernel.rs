//! Spectral precipitation kernel (Smith & Barstad, 2004).
//!
//! Pipeline:
//!   wind & Coriolis → zero padding → forward FFT → wavenumber axes →
//!   transfer function → inverse FFT → de-pad, mm/h, background rate → floor.
//!
//! Stateless: each call plans its own transforms and allocates a fresh
//! output grid. The input grid is only borrowed immutably, so one elevation
//! buffer can be shared across concurrent calls.

use num_complex::Complex64;
use tracing::{debug, trace};

use crate::atmosphere::{coriolis_parameter, Wind};
use crate::error::Result;
use crate::grid::Grid;
use crate::params::{GridSpacing, PrecipParams};
use crate::spectral::{pad_width, pad_zeros, wavenumbers, Fft2};
use crate::transfer::TransferFunction;

/// Converts the kernel's per-second rate to per-hour.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Compute the steady-state orographic precipitation rate (mm/h) over `elevation`.
///
/// `elevation` is in metres, rows north → south and columns west → east,
/// with cell sizes `spacing.dx` (columns) and `spacing.dy` (rows). The
/// result has the same shape; every value ≤ 0 is replaced by
/// `params.precip_min` (0 when unset).
///
/// All input checks run before any transform; see [`crate::PrecipError`].
pub fn compute_orographic_precip(
    elevation: &Grid,
    spacing: GridSpacing,
    params: &PrecipParams,
) -> Result<Grid> {
    elevation.validate()?;
    spacing.validate()?;
    params.validate(elevation.shape())?;

    // ── 1–2. Wind components and Coriolis parameter ─────────────────────────
    let wind = Wind::from_direction(params.wind_speed, params.wind_dir);
    let coriolis = coriolis_parameter(params.latitude);

    // ── 3. Zero padding against FFT wrap-around ─────────────────────────────
    let pad = pad_width(elevation.height, elevation.width);
    let (mut spectrum, rows, cols) = pad_zeros(elevation, pad);
    debug!(
        rows = elevation.height,
        cols = elevation.width,
        pad,
        padded_rows = rows,
        padded_cols = cols,
        speed = wind.speed(),
        u = wind.u,
        v = wind.v,
        coriolis,
        "padded elevation grid"
    );

    // ── 4. Forward transform ────────────────────────────────────────────────
    let fft = Fft2::new(rows, cols);
    fft.forward(&mut spectrum);
    trace!("forward transform done");

    // ── 5–7. Wavenumbers and transfer function ──────────────────────────────
    let kx = wavenumbers(cols, spacing.dx);
    let ky = wavenumbers(rows, spacing.dy);
    let transfer = TransferFunction::new(params, wind, coriolis);
    for (row, &ky_r) in spectrum.chunks_exact_mut(cols).zip(&ky) {
        for (h_hat, &kx_c) in row.iter_mut().zip(&kx) {
            *h_hat = transfer.apply(kx_c, ky_r, *h_hat);
        }
    }
    trace!("transfer function applied");

    // ── 8. Inverse transform ────────────────────────────────────────────────
    fft.inverse(&mut spectrum);

    // ── 8–9. De-pad, units, background rate, floor ──────────────────────────
    let precip = finish(&spectrum, cols, pad, elevation.width, elevation.height, params);
    debug!(
        min = precip.min_value(),
        max = precip.max_value(),
        "precipitation field ready"
    );
    Ok(precip)
}

/// Crop the padded inverse transform back to `width × height`, convert to
/// mm/h, add the background rate and floor non-positive cells.
fn finish(
    spectrum: &[Complex64],
    padded_cols: usize,
    pad: usize,
    width: usize,
    height: usize,
    params: &PrecipParams,
) -> Grid {
    let floor = params.floor();
    let mut out = Grid::zeros(width, height);
    for r in 0..height {
        let start = (r + pad) * padded_cols + pad;
        let src = &spectrum[start..start + width];
        let dst = &mut out.data[r * width..(r + 1) * width];
        for (c, (p, v)) in dst.iter_mut().zip(src).enumerate() {
            let rate = v.re * SECONDS_PER_HOUR + params.precip_base.at(r * width + c);
            *p = if rate <= 0.0 { floor } else { rate };
        }
    }
    out
}
