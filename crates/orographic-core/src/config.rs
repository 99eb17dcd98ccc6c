//! JSON configuration documents.
//!
//! A configuration carries the grid spacing, the model parameters and,
//! optionally, the lapse rates from which `cw` is derived:
//!
//! ```json
//! {
//!   "dx": 1000.0,
//!   "dy": 1000.0,
//!   "uplift": { "lapse_rate": -5.8e-3, "lapse_rate_m": -6.5e-3, "ref_density": 7.4e-3 },
//!   "params": {
//!     "latitude": 40.0, "precip_base": 7.0, "wind_speed": 15.0, "wind_dir": 270.0,
//!     "conv_time": 1000.0, "fall_time": 1000.0, "nm": 0.005, "hw": 2500.0
//!   }
//! }
//! ```
//!
//! Older parameter names (`p0`, `windspeed`, `winddir`, `tau_c`, `tau_f`) are
//! accepted as aliases.

use serde::{Deserialize, Serialize};

use crate::atmosphere::UpliftSensitivity;
use crate::error::{PrecipError, Result};
use crate::params::{BaseRate, GridSpacing, PrecipParams, DEFAULT_HW, DEFAULT_NM};

/// Parameter document as written by a user; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamsDocument {
    pub latitude: Option<f64>,
    #[serde(alias = "p0")]
    pub precip_base: Option<BaseRate>,
    pub precip_min: Option<f64>,
    #[serde(alias = "windspeed")]
    pub wind_speed: Option<f64>,
    #[serde(alias = "winddir")]
    pub wind_dir: Option<f64>,
    #[serde(alias = "tau_c")]
    pub conv_time: Option<f64>,
    #[serde(alias = "tau_f")]
    pub fall_time: Option<f64>,
    pub nm: Option<f64>,
    pub hw: Option<f64>,
    pub cw: Option<f64>,
}

impl ParamsDocument {
    /// Fill defaults and report missing required parameters.
    ///
    /// `nm` and `hw` default to 0.01 1/s and 3400 m; a missing `cw` is
    /// derived from `uplift`. Range checks happen later in
    /// [`PrecipParams::validate`], once the grid shape is known.
    pub fn resolve(self, uplift: &UpliftSensitivity) -> Result<PrecipParams> {
        let cw = match self.cw {
            Some(cw) => cw,
            None => uplift.cw()?,
        };
        Ok(PrecipParams {
            latitude: self.latitude.ok_or_else(|| PrecipError::missing("latitude"))?,
            precip_base: self.precip_base.ok_or_else(|| PrecipError::missing("precip_base"))?,
            precip_min: self.precip_min,
            wind_speed: self.wind_speed.ok_or_else(|| PrecipError::missing("wind_speed"))?,
            wind_dir: self.wind_dir.ok_or_else(|| PrecipError::missing("wind_dir"))?,
            conv_time: self.conv_time.ok_or_else(|| PrecipError::missing("conv_time"))?,
            fall_time: self.fall_time.ok_or_else(|| PrecipError::missing("fall_time"))?,
            nm: self.nm.unwrap_or(DEFAULT_NM),
            hw: self.hw.unwrap_or(DEFAULT_HW),
            cw,
        })
    }
}

impl From<&PrecipParams> for ParamsDocument {
    fn from(p: &PrecipParams) -> Self {
        Self {
            latitude: Some(p.latitude),
            precip_base: Some(p.precip_base.clone()),
            precip_min: p.precip_min,
            wind_speed: Some(p.wind_speed),
            wind_dir: Some(p.wind_dir),
            conv_time: Some(p.conv_time),
            fall_time: Some(p.fall_time),
            nm: Some(p.nm),
            hw: Some(p.hw),
            cw: Some(p.cw),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub dx: f64,
    pub dy: f64,
    #[serde(default)]
    pub uplift: UpliftSensitivity,
    pub params: ParamsDocument,
}

impl ModelConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn spacing(&self) -> GridSpacing {
        GridSpacing::new(self.dx, self.dy)
    }

    pub fn resolve_params(&self) -> Result<PrecipParams> {
        self.params.clone().resolve(&self.uplift)
    }
}
