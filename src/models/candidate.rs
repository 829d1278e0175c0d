use serde::Serialize;

use crate::models::power_grid::GridCell;

/// A grid cell scored against one demand point. Produced fresh per
/// (demand point, year) and discarded after export.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateSite {
    pub cell: GridCell,
    pub distance_km: f64,
    pub adjusted_power_kw: f64,
    pub annual_energy_kwh: f64,
    pub demand_satisfaction_pct: f64,
    pub capacity_factor_pct: f64,
}

/// A grid cell ranked on raw output alone, without any demand point or
/// transmission adjustment.
#[derive(Debug, Clone, Serialize)]
pub struct PotentialSite {
    pub cell: GridCell,
    pub annual_energy_kwh: f64,
    pub capacity_factor_pct: f64,
}

impl PotentialSite {
    /// Nameplate daily output of the cell, in kW.
    pub fn daily_power_kw(&self) -> f64 {
        self.cell.power_generation
    }
}
