//! Linear-theory orographic precipitation (Smith & Barstad, 2004).
//!
//! [`compute_orographic_precip`] maps a terrain elevation grid to a
//! steady-state precipitation rate (mm/h) by filtering the terrain spectrum
//! with a transfer function for uplift, cloud-water conversion and
//! hydrometeor fallout.

pub mod atmosphere;
pub mod batch;
pub mod config;
pub mod error;
pub mod grid;
pub mod kernel;
pub mod params;
pub mod spectral;
pub mod transfer;

pub use atmosphere::{coriolis_parameter, UpliftSensitivity, Wind};
pub use batch::{compute_batch, wind_direction_sweep, PrecipJob};
pub use config::{ModelConfig, ParamsDocument};
pub use error::{PrecipError, Result};
pub use grid::Grid;
pub use kernel::compute_orographic_precip;
pub use params::{BaseRate, GridSpacing, PrecipParams};
