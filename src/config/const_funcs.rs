use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Deserialize;
use thiserror::Error;

use crate::config::constants::{
    DRY_AIR_GAS_CONSTANT, KELVIN_OFFSET, WATER_VAPOR_GAS_CONSTANT,
};

/// A calculator input violated a mathematical precondition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("friction coefficient must be positive, got {0}")]
    NonPositiveFriction(f64),
    #[error("friction coefficient {friction} must lie below both heights ({reference_height} m and {target_height} m)")]
    FrictionAboveHeights {
        friction: f64,
        reference_height: f64,
        target_height: f64,
    },
    #[error("absolute temperature must be positive, got {0} K")]
    NonPositiveTemperature(f64),
}

/// Extrapolate a wind speed to another height with the logarithmic wind profile.
///
/// The friction coefficient is the surface roughness length in metres; it must
/// be positive and smaller than both heights for the log arguments to stay
/// above 1.
pub fn calc_wind_at_height(
    speed_at_reference: f64,
    friction_coefficient: f64,
    reference_height: f64,
    target_height: f64,
) -> Result<f64, DomainError> {
    if friction_coefficient <= 0.0 {
        return Err(DomainError::NonPositiveFriction(friction_coefficient));
    }
    if friction_coefficient >= reference_height.min(target_height) {
        return Err(DomainError::FrictionAboveHeights {
            friction: friction_coefficient,
            reference_height,
            target_height,
        });
    }

    Ok(speed_at_reference * (target_height / friction_coefficient).ln()
        / (reference_height / friction_coefficient).ln())
}

/// Saturation vapor pressure in Pa for a temperature in degrees Celsius
/// (Magnus formula).
pub fn calc_saturation_vapor_pressure(temp_celsius: f64) -> f64 {
    6.1094 * ((17.625 * temp_celsius) / (temp_celsius + 243.04)).exp() * 100.0
}

/// Actual vapor pressure in Pa given relative humidity in percent.
pub fn calc_vapor_pressure(temp_celsius: f64, relative_humidity_pct: f64) -> f64 {
    (relative_humidity_pct / 100.0) * calc_saturation_vapor_pressure(temp_celsius)
}

/// Surface air density in kg/m^3 for moist air.
///
/// Partitions the surface pressure into dry-air and water-vapor components and
/// applies the ideal gas relation to each.
pub fn calc_air_density(
    surface_pressure_pa: f64,
    temp_kelvin: f64,
    relative_humidity_pct: f64,
) -> Result<f64, DomainError> {
    if temp_kelvin <= 0.0 {
        return Err(DomainError::NonPositiveTemperature(temp_kelvin));
    }

    let temp_celsius = temp_kelvin - KELVIN_OFFSET;
    let vapor_pressure = calc_vapor_pressure(temp_celsius, relative_humidity_pct);
    let dry_pressure = surface_pressure_pa - vapor_pressure;

    Ok(dry_pressure / (DRY_AIR_GAS_CONSTANT * temp_kelvin)
        + vapor_pressure / (WATER_VAPOR_GAS_CONSTANT * temp_kelvin))
}

/// Power generation of a single turbine in kW.
///
/// The cubic wind-speed term dominates site quality and is kept exact.
pub fn calc_power_generation(
    wind_speed: f64,
    air_density: f64,
    turbine_area: f64,
    power_coefficient: f64,
) -> f64 {
    0.5 * air_density * turbine_area * wind_speed.powi(3) * power_coefficient / 1000.0
}

/// Power remaining after transmission over a distance in metres.
///
/// Loss is stepped: each full 1000 km costs `loss_per_1000km` of the original
/// power. The result is clamped at zero rather than going negative on extreme
/// distances.
pub fn calc_transmission_loss(power_kw: f64, distance_m: f64, loss_per_1000km: f64) -> f64 {
    let distance_km = distance_m / 1000.0;
    let loss_fraction = 1.0 - loss_per_1000km * (distance_km / 1000.0).floor();
    (power_kw * loss_fraction).max(0.0)
}

#[derive(Debug, Deserialize)]
struct LandCoverClass {
    class: u8,
    #[allow(dead_code)]
    label: String,
    roughness_m: Option<f64>,
}

lazy_static! {
    static ref LANDCOVER_ROUGHNESS: HashMap<u8, f64> = {
        let table_file = include_str!("../../assets/landcover_roughness.json");
        let classes: Vec<LandCoverClass> =
            serde_json::from_str(table_file).expect("Failed to parse land cover roughness table");

        classes
            .into_iter()
            .filter_map(|c| c.roughness_m.map(|r| (c.class, r)))
            .collect()
    };
}

/// Surface roughness length in metres for a land cover class, used as the
/// friction coefficient when no per-cell friction field is available.
pub fn roughness_for_landcover(class: u8) -> Option<f64> {
    LANDCOVER_ROUGHNESS.get(&class).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wind_extrapolation_matches_log_profile() {
        // 5 m/s at 10 m over grassland (z0 = 0.03 m), extrapolated to 80 m
        let wind = calc_wind_at_height(5.0, 0.03, 10.0, 80.0).unwrap();
        assert!((wind - 6.789800617016165).abs() < 1e-12, "wind was {}", wind);
    }

    #[test]
    fn wind_extrapolation_rejects_non_positive_friction() {
        assert_eq!(
            calc_wind_at_height(5.0, 0.0, 10.0, 80.0),
            Err(DomainError::NonPositiveFriction(0.0))
        );
        assert!(calc_wind_at_height(5.0, -0.5, 10.0, 80.0).is_err());
    }

    #[test]
    fn wind_extrapolation_rejects_friction_at_or_above_heights() {
        assert!(calc_wind_at_height(5.0, 10.0, 10.0, 80.0).is_err());
        assert!(calc_wind_at_height(5.0, 12.0, 10.0, 80.0).is_err());
    }

    #[test]
    fn saturation_vapor_pressure_at_15c() {
        let es = calc_saturation_vapor_pressure(15.0);
        assert!((es - 1701.9828147155868).abs() < 1e-9, "es was {}", es);
    }

    #[test]
    fn air_density_matches_reference_value() {
        // Standard sea-level conditions at 50% relative humidity
        let rho = calc_air_density(101_325.0, 288.15, 50.0).unwrap();
        let expected = 1.2211231735309047;
        assert!(
            ((rho - expected) / expected).abs() < 1e-6,
            "density was {}",
            rho
        );
    }

    #[test]
    fn air_density_is_lower_for_humid_air() {
        let dry = calc_air_density(101_325.0, 288.15, 0.0).unwrap();
        let humid = calc_air_density(101_325.0, 288.15, 100.0).unwrap();
        assert!(humid < dry, "moist air must be lighter than dry air");
    }

    #[test]
    fn air_density_rejects_non_positive_temperature() {
        assert_eq!(
            calc_air_density(101_325.0, 0.0, 50.0),
            Err(DomainError::NonPositiveTemperature(0.0))
        );
        assert!(calc_air_density(101_325.0, -5.0, 50.0).is_err());
    }

    #[test]
    fn power_scales_with_cube_of_wind_speed() {
        let single = calc_power_generation(4.0, 1.225, 2000.0, 0.35);
        let doubled = calc_power_generation(8.0, 1.225, 2000.0, 0.35);
        assert!(
            (doubled - 8.0 * single).abs() < 1e-9 * doubled,
            "doubling wind speed must give 8x power"
        );
    }

    #[test]
    fn power_generation_reference_case() {
        let rho = calc_air_density(101_325.0, 288.15, 50.0).unwrap();
        let wind = calc_wind_at_height(5.0, 0.03, 10.0, 80.0).unwrap();
        let power = calc_power_generation(wind, rho, 2000.0, 0.35);
        assert!((power - 133.78227640160887).abs() < 1e-9, "power was {}", power);
    }

    #[test]
    fn no_transmission_loss_at_zero_distance() {
        assert_eq!(calc_transmission_loss(100.0, 0.0, 0.0035), 100.0);
    }

    #[test]
    fn transmission_loss_steps_per_full_1000km() {
        // Just under 1000 km: no loss yet
        let under = calc_transmission_loss(150.0, 999_999.0, 0.0035);
        assert_eq!(under, 150.0);

        // 2000 km: two full steps
        let at_2000 = calc_transmission_loss(150.0, 2_000_000.0, 0.0035);
        assert!((at_2000 - 148.95).abs() < 1e-9, "adjusted was {}", at_2000);
    }

    #[test]
    fn transmission_loss_is_non_increasing_in_distance() {
        let mut previous = f64::INFINITY;
        for step in 0..400 {
            let adjusted = calc_transmission_loss(100.0, step as f64 * 1_000_000.0, 0.0035);
            assert!(adjusted <= previous, "loss must not recover with distance");
            previous = adjusted;
        }
    }

    #[test]
    fn transmission_loss_clamps_at_zero() {
        // 300,000 km of line would push the loss fraction past 100%
        assert_eq!(calc_transmission_loss(100.0, 300_000_000.0, 0.0035), 0.0);
    }

    #[test]
    fn roughness_table_covers_known_classes() {
        assert_eq!(roughness_for_landcover(3), Some(0.03));
        assert_eq!(roughness_for_landcover(5), Some(1.0));
        assert_eq!(roughness_for_landcover(0), None);
        assert_eq!(roughness_for_landcover(200), None);
    }
}
