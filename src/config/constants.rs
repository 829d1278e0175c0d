// Analysis Years
pub const ANALYSIS_YEARS: [u32; 4] = [2020, 2050, 2075, 2099];

// Wind Turbine Constants
pub const TURBINE_SWEPT_AREA: f64 = 2000.0;          // Rotor swept area (m^2)
pub const TURBINE_POWER_COEFFICIENT: f64 = 0.35;     // Fraction of kinetic energy extracted
pub const REFERENCE_HEIGHT: f64 = 10.0;              // Wind measurement height (m)
pub const TARGET_HEIGHT: f64 = 80.0;                 // Hub height for extrapolation (m)
pub const RATED_WIND_SPEED: f64 = 14.0;              // Wind speed at rated output (m/s)
pub const SEA_LEVEL_AIR_DENSITY: f64 = 1.225;        // kg/m^3

// Physical Constants
pub const DRY_AIR_GAS_CONSTANT: f64 = 287.05;        // J/(kg K)
pub const WATER_VAPOR_GAS_CONSTANT: f64 = 461.5;     // J/(kg K)
pub const KELVIN_OFFSET: f64 = 273.15;
pub const EARTH_RADIUS_KM: f64 = 6371.009;           // Mean Earth radius, matches great-circle references

// Transmission and Production Constants
pub const POWER_LOSS_PER_1000KM: f64 = 0.0035;       // Fractional loss per full 1000 km transmitted
pub const OPERATING_HOURS_FRACTION: f64 = 0.3;       // Assumed fraction of each day at nameplate output
pub const HOURS_PER_DAY: f64 = 24.0;
pub const DAYS_PER_YEAR: f64 = 365.0;
pub const HOURS_PER_YEAR: f64 = 8760.0;

// Land Cover Classes Excluded From Siting
pub const LANDCOVER_WATER: u8 = 2;
pub const LANDCOVER_URBAN: u8 = 5;

// Output Constants
pub const DEFAULT_TOP_K: usize = 10;
pub const OUTPUT_DECIMALS: i32 = 5;                  // Decimal places in exported tables
