//! Independent kernel invocations over many inputs.
//!
//! Parallelism lives across calls, never inside one: with the `threading`
//! feature each job runs on the rayon pool, otherwise jobs run in order.

#[cfg(feature = "threading")]
use rayon::prelude::*;

use crate::error::Result;
use crate::grid::Grid;
use crate::kernel::compute_orographic_precip;
use crate::params::{GridSpacing, PrecipParams};

/// One kernel call: a borrowed elevation grid plus its own parameters.
#[derive(Debug, Clone)]
pub struct PrecipJob<'a> {
    pub elevation: &'a Grid,
    pub spacing: GridSpacing,
    pub params: PrecipParams,
}

impl<'a> PrecipJob<'a> {
    pub fn new(elevation: &'a Grid, spacing: GridSpacing, params: PrecipParams) -> Self {
        Self { elevation, spacing, params }
    }

    pub fn run(&self) -> Result<Grid> {
        compute_orographic_precip(self.elevation, self.spacing, &self.params)
    }
}

/// Run every job and return the results in input order.
///
/// A failing job does not affect the others.
pub fn compute_batch(jobs: &[PrecipJob<'_>]) -> Vec<Result<Grid>> {
    #[cfg(feature = "threading")]
    {
        jobs.par_iter().map(PrecipJob::run).collect()
    }
    #[cfg(not(feature = "threading"))]
    {
        jobs.iter().map(PrecipJob::run).collect()
    }
}

/// Jobs sharing one elevation grid, one per wind direction.
pub fn wind_direction_sweep<'a>(
    elevation: &'a Grid,
    spacing: GridSpacing,
    params: &PrecipParams,
    wind_dirs: &[f64],
) -> Vec<PrecipJob<'a>> {
    wind_dirs
        .iter()
        .map(|&wind_dir| PrecipJob::new(elevation, spacing, PrecipParams { wind_dir, ..params.clone() }))
        .collect()
}
