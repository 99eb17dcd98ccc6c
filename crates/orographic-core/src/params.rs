use serde::{Deserialize, Serialize};

use crate::atmosphere::UpliftSensitivity;
use crate::error::{PrecipError, Result};
use crate::grid::Grid;

/// Cell size along the two grid axes, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpacing {
    /// Column spacing (west → east).
    pub dx: f64,
    /// Row spacing (north → south).
    pub dy: f64,
}

impl GridSpacing {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn uniform(d: f64) -> Self {
        Self { dx: d, dy: d }
    }

    pub fn validate(&self) -> Result<()> {
        let ok = |d: f64| d.is_finite() && d > 0.0;
        if ok(self.dx) && ok(self.dy) {
            Ok(())
        } else {
            Err(PrecipError::InvalidSpacing { dx: self.dx, dy: self.dy })
        }
    }
}

/// Background (non-orographic) precipitation rate in mm/h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BaseRate {
    /// Same rate everywhere.
    Uniform(f64),
    /// Per-cell rate; must match the elevation grid's shape.
    Field(Grid),
}

impl BaseRate {
    /// Rate at flat row-major cell index `i`.
    #[inline]
    pub fn at(&self, i: usize) -> f64 {
        match self {
            BaseRate::Uniform(rate) => *rate,
            BaseRate::Field(grid) => grid.data[i],
        }
    }
}

impl From<f64> for BaseRate {
    fn from(rate: f64) -> Self {
        BaseRate::Uniform(rate)
    }
}

/// Full parameter set for one kernel call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipParams {
    /// Latitude in degrees, drives the Coriolis term.
    pub latitude: f64,
    /// Background precipitation rate (mm/h), scalar or per-cell.
    pub precip_base: BaseRate,
    /// Value substituted where the result is ≤ 0. `None` means 0.
    #[serde(default)]
    pub precip_min: Option<f64>,
    /// Wind speed (m/s).
    pub wind_speed: f64,
    /// Wind direction in degrees, direction the wind blows from.
    pub wind_dir: f64,
    /// Cloud water to hydrometeor conversion time (s).
    pub conv_time: f64,
    /// Hydrometeor fallout time (s).
    pub fall_time: f64,
    /// Moist stability frequency (1/s).
    pub nm: f64,
    /// Water vapour scale height (m).
    pub hw: f64,
    /// Uplift sensitivity (kg/m³).
    pub cw: f64,
}

/// Default moist stability frequency (1/s).
pub const DEFAULT_NM: f64 = 0.01;
/// Default water vapour scale height (m).
pub const DEFAULT_HW: f64 = 3400.0;

impl Default for PrecipParams {
    fn default() -> Self {
        let uplift = UpliftSensitivity::default();
        Self {
            latitude: 0.0,
            precip_base: BaseRate::Uniform(0.0),
            precip_min: None,
            wind_speed: 10.0,
            wind_dir: 270.0,
            conv_time: 1000.0,
            fall_time: 1000.0,
            nm: DEFAULT_NM,
            hw: DEFAULT_HW,
            cw: uplift.ref_density * uplift.lapse_rate_m / uplift.lapse_rate,
        }
    }
}

impl PrecipParams {
    /// Floor substituted for non-positive results.
    pub fn floor(&self) -> f64 {
        self.precip_min.unwrap_or(0.0)
    }

    /// Check every parameter against an elevation grid of `shape = (rows, cols)`.
    ///
    /// Beyond finiteness, `wind_speed`, `conv_time`, `fall_time`, `nm`, `hw`
    /// and `precip_min` must be non-negative, so the floored output is never
    /// negative. `precip_base` may be negative.
    pub fn validate(&self, shape: (usize, usize)) -> Result<()> {
        let scalars = [
            ("latitude", self.latitude),
            ("wind_speed", self.wind_speed),
            ("wind_dir", self.wind_dir),
            ("conv_time", self.conv_time),
            ("fall_time", self.fall_time),
            ("nm", self.nm),
            ("hw", self.hw),
            ("cw", self.cw),
        ];
        for (name, value) in scalars {
            finite(name, value)?;
        }
        for (name, value) in [
            ("wind_speed", self.wind_speed),
            ("conv_time", self.conv_time),
            ("fall_time", self.fall_time),
            ("nm", self.nm),
            ("hw", self.hw),
        ] {
            if value < 0.0 {
                return Err(PrecipError::invalid_parameter(
                    name,
                    format!("must be non-negative, got {value}"),
                ));
            }
        }

        if let Some(min) = self.precip_min {
            finite("precip_min", min)?;
            if min < 0.0 {
                return Err(PrecipError::invalid_parameter(
                    "precip_min",
                    format!("must be non-negative, got {min}"),
                ));
            }
        }

        match &self.precip_base {
            BaseRate::Uniform(rate) => finite("precip_base", *rate),
            BaseRate::Field(grid) => {
                if grid.shape() != shape || shape.0.checked_mul(shape.1) != Some(grid.data.len()) {
                    return Err(PrecipError::invalid_parameter(
                        "precip_base",
                        format!(
                            "field shape {}×{} does not match elevation shape {}×{}",
                            grid.height, grid.width, shape.0, shape.1
                        ),
                    ));
                }
                match grid.data.iter().find(|v| !v.is_finite()) {
                    Some(v) => Err(PrecipError::invalid_parameter(
                        "precip_base",
                        format!("field contains non-finite value {v}"),
                    )),
                    None => Ok(()),
                }
            }
        }
    }
}

fn finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PrecipError::invalid_parameter(name, format!("must be finite, got {value}")))
    }
}
