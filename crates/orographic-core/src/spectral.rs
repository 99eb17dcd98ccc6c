//! Spectral-domain plumbing: boundary padding, 2D FFT and wavenumber axes.
//!
//! Buffers are row-major `Vec<Complex64>` of `rows × cols`. Forward transforms
//! are unnormalised and inverse transforms divide by `rows·cols`, so a
//! forward/inverse pair is the identity (numpy `fft2`/`ifft2` convention).

use std::f64::consts::PI;
use std::sync::Arc;

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use crate::grid::Grid;

/// Upper bound on the zero-pad width, in cells.
pub const MAX_PAD: usize = 200;

/// Zero-pad width applied on every side before the forward transform.
///
/// `ceil((rows + cols) / 2)` rounded half-up to the nearest multiple of 100,
/// capped at [`MAX_PAD`]. Non-decreasing in `rows + cols`.
pub fn pad_width(rows: usize, cols: usize) -> usize {
    let half = (rows + cols).div_ceil(2);
    let rounded = (half + 50) / 100 * 100;
    rounded.min(MAX_PAD)
}

/// Copy `grid` into the centre of a zero buffer with `pad` cells on each side.
///
/// Returns the buffer with its `(rows, cols)`.
pub fn pad_zeros(grid: &Grid, pad: usize) -> (Vec<Complex64>, usize, usize) {
    let rows = grid.height + 2 * pad;
    let cols = grid.width + 2 * pad;
    let mut buf = vec![Complex64::new(0.0, 0.0); rows * cols];
    for (r, src) in grid.data.chunks_exact(grid.width).enumerate() {
        let start = (r + pad) * cols + pad;
        for (dst, &h) in buf[start..start + grid.width].iter_mut().zip(src) {
            *dst = Complex64::new(h, 0.0);
        }
    }
    (buf, rows, cols)
}

/// Sample frequencies for an FFT of length `n` with sample spacing `d`.
///
/// `[0, 1, …, ⌈n/2⌉−1, −⌊n/2⌋, …, −1] / (n·d)`.
pub fn fftfreq(n: usize, d: f64) -> Vec<f64> {
    let val = 1.0 / (n as f64 * d);
    let n_half = n.div_ceil(2);
    let mut results: Vec<f64> = (0..n_half).map(|i| i as f64).collect();
    results.extend((-(n as isize / 2)..0).map(|i| i as f64));
    results.iter_mut().for_each(|x| *x *= val);
    results
}

/// Angular wavenumbers (rad/m) along an axis of `n` cells spaced `spacing` m.
pub fn wavenumbers(n: usize, spacing: f64) -> Vec<f64> {
    fftfreq(n, spacing).into_iter().map(|f| 2.0 * PI * f).collect()
}

/// A planned 2D complex FFT of fixed shape.
pub struct Fft2 {
    rows: usize,
    cols: usize,
    row_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
}

impl Fft2 {
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            rows,
            cols,
            row_forward: planner.plan_fft_forward(cols),
            row_inverse: planner.plan_fft_inverse(cols),
            col_forward: planner.plan_fft_forward(rows),
            col_inverse: planner.plan_fft_inverse(rows),
        }
    }

    /// In-place forward transform, unnormalised.
    pub fn forward(&self, data: &mut [Complex64]) {
        self.process(data, &self.row_forward, &self.col_forward);
    }

    /// In-place inverse transform, normalised by `1 / (rows·cols)`.
    pub fn inverse(&self, data: &mut [Complex64]) {
        self.process(data, &self.row_inverse, &self.col_inverse);
        let scale = 1.0 / (self.rows * self.cols) as f64;
        for v in data.iter_mut() {
            *v *= scale;
        }
    }

    fn process(&self, data: &mut [Complex64], row_fft: &Arc<dyn Fft<f64>>, col_fft: &Arc<dyn Fft<f64>>) {
        assert_eq!(
            data.len(),
            self.rows * self.cols,
            "buffer does not match the planned {}×{} shape",
            self.rows,
            self.cols
        );

        // Rows are contiguous; rustfft transforms every `cols`-long chunk.
        row_fft.process(data);

        // Columns go through a transposed copy so they are contiguous too.
        let mut transposed = transpose(data, self.rows, self.cols);
        col_fft.process(&mut transposed);
        data.copy_from_slice(&transpose(&transposed, self.cols, self.rows));
    }
}

/// Transpose a row-major `rows × cols` buffer into `cols × rows`.
fn transpose(src: &[Complex64], rows: usize, cols: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); src.len()];
    for r in 0..rows {
        for c in 0..cols {
            out[c * rows + r] = src[r * cols + c];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn pad_width_rounds_to_hundreds_and_caps() {
        assert_eq!(pad_width(1, 1), 0);
        assert_eq!(pad_width(3, 2), 0);
        assert_eq!(pad_width(49, 49), 0);
        assert_eq!(pad_width(50, 50), 100);
        assert_eq!(pad_width(100, 100), 100);
        assert_eq!(pad_width(149, 149), 100);
        assert_eq!(pad_width(150, 150), 200);
        assert_eq!(pad_width(5000, 3000), MAX_PAD);
    }

    #[test]
    fn pad_width_is_monotone_and_bounded() {
        let mut prev = 0;
        for sum in 2..2000 {
            let pad = pad_width(sum / 2, sum - sum / 2);
            assert!(pad >= prev, "pad dropped from {prev} to {pad} at rows+cols={sum}");
            assert!(pad <= MAX_PAD);
            assert_eq!(pad % 100, 0, "pad {pad} is not a multiple of 100");
            prev = pad;
        }
    }

    #[test]
    fn pad_zeros_centres_the_grid() {
        let g = Grid::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let (buf, rows, cols) = pad_zeros(&g, 2);
        assert_eq!((rows, cols), (6, 6));
        assert_eq!(buf[2 * cols + 2].re, 1.0);
        assert_eq!(buf[3 * cols + 3].re, 4.0);
        let total: f64 = buf.iter().map(|c| c.re).sum();
        assert_eq!(total, 10.0);
    }

    #[test]
    fn fftfreq_matches_numpy_ordering() {
        assert_eq!(fftfreq(5, 1.0 / 5.0), vec![0.0, 1.0, 2.0, -2.0, -1.0]);
        assert_eq!(fftfreq(4, 1.0 / 4.0), vec![0.0, 1.0, -2.0, -1.0]);
        assert_eq!(fftfreq(1, 1.0), vec![0.0]);
    }

    #[test]
    fn wavenumbers_scale_by_axis_length() {
        let k = wavenumbers(8, 250.0);
        assert_abs_diff_eq!(k[1], 2.0 * PI / 2000.0, epsilon = 1e-15);
        assert_abs_diff_eq!(k[7], -2.0 * PI / 2000.0, epsilon = 1e-15);
    }

    #[test]
    fn forward_of_impulse_is_flat() {
        let fft = Fft2::new(4, 6);
        let mut buf = vec![Complex64::new(0.0, 0.0); 24];
        buf[0] = Complex64::new(1.0, 0.0);
        fft.forward(&mut buf);
        for v in &buf {
            assert_abs_diff_eq!(v.re, 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(v.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn forward_puts_mean_in_dc_bin() {
        let fft = Fft2::new(3, 5);
        let mut buf: Vec<Complex64> = (0..15).map(|i| Complex64::new(i as f64, 0.0)).collect();
        fft.forward(&mut buf);
        assert_abs_diff_eq!(buf[0].re, 105.0, epsilon = 1e-9);
        assert_abs_diff_eq!(buf[0].im, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn inverse_undoes_forward_on_non_square_grid() {
        let fft = Fft2::new(7, 4);
        let original: Vec<Complex64> = (0..28)
            .map(|i| Complex64::new((i as f64 * 0.37).sin(), 0.0))
            .collect();
        let mut buf = original.clone();
        fft.forward(&mut buf);
        fft.inverse(&mut buf);
        for (a, b) in buf.iter().zip(&original) {
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-12);
            assert_abs_diff_eq!(a.im, 0.0, epsilon = 1e-12);
        }
    }
}
