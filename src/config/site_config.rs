use serde::{Deserialize, Serialize};

use crate::config::constants::{
    DEFAULT_TOP_K, HOURS_PER_YEAR, OPERATING_HOURS_FRACTION, POWER_LOSS_PER_1000KM,
    RATED_WIND_SPEED, REFERENCE_HEIGHT, SEA_LEVEL_AIR_DENSITY, TARGET_HEIGHT,
    TURBINE_POWER_COEFFICIENT, TURBINE_SWEPT_AREA,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurbineSpec {
    pub swept_area: f64,              // m^2
    pub power_coefficient: f64,
    pub reference_height: f64,        // m, height of the wind measurement
    pub target_height: f64,           // m, hub height
    pub rated_wind_speed: f64,        // m/s
    pub sea_level_air_density: f64,   // kg/m^3, used for the rated-output ceiling
}

impl TurbineSpec {
    /// Nameplate output at rated wind speed, in kW.
    pub fn rated_power_kw(&self) -> f64 {
        0.5 * self.sea_level_air_density
            * self.swept_area
            * self.power_coefficient
            * self.rated_wind_speed.powi(3)
            / 1000.0
    }

    /// Energy a turbine would produce running at rated output all year, in kWh.
    pub fn max_annual_output_kwh(&self) -> f64 {
        self.rated_power_kw() * HOURS_PER_YEAR
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub turbine: TurbineSpec,
    pub power_loss_per_1000km: f64,
    pub operating_hours_fraction: f64,
    pub top_k: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            turbine: TurbineSpec {
                swept_area: TURBINE_SWEPT_AREA,
                power_coefficient: TURBINE_POWER_COEFFICIENT,
                reference_height: REFERENCE_HEIGHT,
                target_height: TARGET_HEIGHT,
                rated_wind_speed: RATED_WIND_SPEED,
                sea_level_air_density: SEA_LEVEL_AIR_DENSITY,
            },
            power_loss_per_1000km: POWER_LOSS_PER_1000KM,
            operating_hours_fraction: OPERATING_HOURS_FRACTION,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl SiteConfig {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rated_power_matches_reference_turbine() {
        let spec = SiteConfig::default().turbine;
        // 0.5 * 1.225 * 2000 * 0.35 * 14^3 / 1000
        assert!((spec.rated_power_kw() - 1176.49).abs() < 1e-9);
    }

    #[test]
    fn max_annual_output_is_rated_power_over_a_full_year() {
        let spec = SiteConfig::default().turbine;
        assert!((spec.max_annual_output_kwh() - 10_306_052.4).abs() < 1e-6);
    }
}
