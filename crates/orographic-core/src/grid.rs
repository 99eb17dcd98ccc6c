use serde::{Deserialize, Serialize};

use crate::error::{PrecipError, Result};

/// A 2D grid of f64 values, row-major.
///
/// Columns run west → east, rows run north → south. Used both for terrain
/// elevation in metres and for the precipitation rate returned by the kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// Row-major cell values.
    pub data: Vec<f64>,
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl Grid {
    /// Create a new Grid filled with the given value.
    pub fn new(width: usize, height: usize, fill: f64) -> Self {
        Self {
            data: vec![fill; width * height],
            width,
            height,
        }
    }

    pub fn zeros(width: usize, height: usize) -> Self {
        Self::new(width, height, 0.0)
    }

    /// Wrap row-major `data`, checking that it covers `width × height` cells.
    pub fn from_vec(width: usize, height: usize, data: Vec<f64>) -> Result<Self> {
        let grid = Self { data, width, height };
        grid.check_shape()?;
        Ok(grid)
    }

    /// Build a grid from nested rows. Every row must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(PrecipError::InvalidGrid(format!(
                "row {r} has {} columns, expected {width}",
                row.len()
            )));
        }
        let data = rows.iter().flatten().copied().collect();
        Self::from_vec(width, rows.len(), data)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: f64) {
        self.data[row * self.width + col] = val;
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check dimensions, buffer length and that every value is finite.
    ///
    /// Grids built through `from_vec`/`from_rows` are shape-consistent, but a
    /// grid deserialised from JSON is not, so the kernel always calls this.
    pub fn validate(&self) -> Result<()> {
        self.check_shape()?;
        if let Some(i) = self.data.iter().position(|v| !v.is_finite()) {
            return Err(PrecipError::InvalidGrid(format!(
                "non-finite value {} at row {}, col {}",
                self.data[i],
                i / self.width,
                i % self.width
            )));
        }
        Ok(())
    }

    fn check_shape(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PrecipError::InvalidGrid(format!(
                "dimensions must be positive, got {}×{}",
                self.height, self.width
            )));
        }
        let cells = self.width.checked_mul(self.height).ok_or_else(|| {
            PrecipError::InvalidGrid(format!(
                "{}×{} grid overflows the addressable cell count",
                self.height, self.width
            ))
        })?;
        if self.data.len() != cells {
            return Err(PrecipError::InvalidGrid(format!(
                "{} values for a {}×{} grid",
                self.data.len(),
                self.height,
                self.width
            )));
        }
        Ok(())
    }

    pub fn min_value(&self) -> f64 {
        self.data.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    pub fn max_value(&self) -> f64 {
        self.data.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// `(row, col)` of the first maximum.
    pub fn argmax(&self) -> (usize, usize) {
        self.arg_extreme(|candidate, best| candidate > best)
    }

    /// `(row, col)` of the first minimum.
    pub fn argmin(&self) -> (usize, usize) {
        self.arg_extreme(|candidate, best| candidate < best)
    }

    fn arg_extreme(&self, better: impl Fn(f64, f64) -> bool) -> (usize, usize) {
        let mut best = 0;
        for (i, &v) in self.data.iter().enumerate().skip(1) {
            if better(v, self.data[best]) {
                best = i;
            }
        }
        (best / self.width.max(1), best % self.width.max(1))
    }
}
