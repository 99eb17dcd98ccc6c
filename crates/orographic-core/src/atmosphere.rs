//! Scalar atmospheric inputs: wind components, Coriolis parameter and the
//! uplift sensitivity factor.
//!
//! Wind direction follows the meteorological "from" convention: 0° = wind
//! from the north, 270° = wind from the west, angles clockwise. With rows
//! running north → south, `u` is positive towards the east and `v` positive
//! towards the south.

use serde::{Deserialize, Serialize};

use crate::error::{PrecipError, Result};

/// Earth's rotation rate Ω in rad/s.
pub const EARTH_ROTATION_RATE: f64 = 7.2921e-5;

/// Cartesian wind components in m/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wind {
    /// Along-column (west → east) component.
    pub u: f64,
    /// Along-row (north → south) component.
    pub v: f64,
}

impl Wind {
    /// Decompose a wind speed and "from" direction in degrees.
    ///
    /// `u = −sin(dir)·speed`, `v = cos(dir)·speed`.
    pub fn from_direction(speed: f64, dir_deg: f64) -> Self {
        let dir = dir_deg.to_radians();
        Self {
            u: -dir.sin() * speed,
            v: dir.cos() * speed,
        }
    }

    pub fn speed(&self) -> f64 {
        self.u.hypot(self.v)
    }
}

/// Coriolis parameter `f = 2Ω·sin(latitude)`.
pub fn coriolis_parameter(latitude_deg: f64) -> f64 {
    2.0 * EARTH_ROTATION_RATE * latitude_deg.to_radians().sin()
}

/// Inputs for the uplift sensitivity factor `cw`.
///
/// Defaults follow Smith & Barstad (2004), Appendix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpliftSensitivity {
    /// Environmental lapse rate (°C/km).
    pub lapse_rate: f64,
    /// Moist adiabatic lapse rate (°C/km).
    pub lapse_rate_m: f64,
    /// Reference saturation water vapour density (kg/m³).
    pub ref_density: f64,
}

impl Default for UpliftSensitivity {
    fn default() -> Self {
        Self {
            lapse_rate: -4.0,
            lapse_rate_m: -7.0,
            ref_density: 7.4e-3,
        }
    }
}

impl UpliftSensitivity {
    /// `cw = ref_density · lapse_rate_m / lapse_rate` in kg/m³.
    pub fn cw(&self) -> Result<f64> {
        for (name, value) in [
            ("lapse_rate", self.lapse_rate),
            ("lapse_rate_m", self.lapse_rate_m),
            ("ref_density", self.ref_density),
        ] {
            if !value.is_finite() {
                return Err(PrecipError::invalid_parameter(
                    name,
                    format!("must be finite, got {value}"),
                ));
            }
        }
        if self.lapse_rate == 0.0 {
            return Err(PrecipError::invalid_parameter("lapse_rate", "must be non-zero"));
        }
        Ok(self.ref_density * self.lapse_rate_m / self.lapse_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn westerly_wind_blows_east() {
        let w = Wind::from_direction(15.0, 270.0);
        assert_abs_diff_eq!(w.u, 15.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w.v, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn northerly_wind_has_positive_v() {
        // Rows grow southwards, so wind from the north advects towards +v.
        let w = Wind::from_direction(10.0, 0.0);
        assert_abs_diff_eq!(w.u, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w.v, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn decomposition_preserves_speed() {
        for dir in [0.0, 33.0, 90.0, 181.5, 270.0, 359.0] {
            let w = Wind::from_direction(12.5, dir);
            assert_abs_diff_eq!(w.speed(), 12.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn coriolis_follows_hemisphere() {
        assert_eq!(coriolis_parameter(0.0), 0.0);
        let north = coriolis_parameter(45.0);
        let south = coriolis_parameter(-45.0);
        assert!(north > 0.0 && south < 0.0);
        assert_abs_diff_eq!(north, -south, epsilon = 1e-18);
        assert_abs_diff_eq!(coriolis_parameter(90.0), 2.0 * EARTH_ROTATION_RATE, epsilon = 1e-18);
    }

    #[test]
    fn default_uplift_sensitivity() {
        let cw = UpliftSensitivity::default().cw().unwrap();
        assert_abs_diff_eq!(cw, 7.4e-3 * 7.0 / 4.0, epsilon = 1e-15);
    }

    #[test]
    fn zero_lapse_rate_is_rejected() {
        let u = UpliftSensitivity { lapse_rate: 0.0, ..Default::default() };
        assert!(matches!(
            u.cw(),
            Err(PrecipError::InvalidParameter { name: "lapse_rate", .. })
        ));
    }
}
