use serde::{Deserialize, Serialize};

/// A city with a projected annual energy demand for one analysis year.
///
/// Demand points are externally supplied and never mutated by the ranking
/// engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandPoint {
    name: String,
    latitude: f64,
    longitude: f64,
    annual_demand_kwh: f64,
}

impl DemandPoint {
    pub fn new(name: String, latitude: f64, longitude: f64, annual_demand_kwh: f64) -> Self {
        Self {
            name,
            latitude,
            longitude,
            annual_demand_kwh,
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_latitude(&self) -> f64 {
        self.latitude
    }

    pub fn get_longitude(&self) -> f64 {
        self.longitude
    }

    pub fn get_annual_demand_kwh(&self) -> f64 {
        self.annual_demand_kwh
    }
}
