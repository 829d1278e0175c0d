use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::config::const_funcs::calc_transmission_loss;
use crate::config::constants::{DAYS_PER_YEAR, HOURS_PER_DAY};
use crate::config::site_config::SiteConfig;
use crate::models::candidate::{CandidateSite, PotentialSite};
use crate::models::demand::DemandPoint;
use crate::models::power_grid::PowerGrid;
use crate::utils::geo::great_circle_distance_km;

// Candidate ordering: higher score wins, ties go to the earlier scan index so
// repeated runs over the same grid always rank identically.
struct Scored<T> {
    score: f64,
    seq: usize,
    value: T,
}

impl<T> PartialEq for Scored<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Scored<T> {}

impl<T> PartialOrd for Scored<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scored<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Bounded top-K selector over a candidate stream.
///
/// Keeps a min-heap of at most `k` entries so a full grid scan never
/// materializes more than `k` candidates at once.
struct TopK<T> {
    k: usize,
    heap: BinaryHeap<std::cmp::Reverse<Scored<T>>>,
}

impl<T> TopK<T> {
    fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k + 1),
        }
    }

    fn push(&mut self, score: f64, seq: usize, value: T) {
        if self.k == 0 {
            return;
        }
        self.heap.push(std::cmp::Reverse(Scored { score, seq, value }));
        if self.heap.len() > self.k {
            self.heap.pop();
        }
    }

    /// Best first.
    fn into_ranked(self) -> Vec<T> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|entry| entry.0.value)
            .collect()
    }
}

/// Rank candidate turbine sites for one demand point.
///
/// Scans every eligible grid cell once, adjusting the cell's output for
/// transmission loss over the great-circle distance to the city, and returns
/// at most `top_k` sites ordered by adjusted power descending.
pub fn rank_sites(
    grid: &PowerGrid,
    demand: &DemandPoint,
    config: &SiteConfig,
    top_k: usize,
) -> Vec<CandidateSite> {
    let max_annual_output = config.turbine.max_annual_output_kwh();
    let annual_demand = demand.get_annual_demand_kwh();
    let mut selector = TopK::new(top_k);

    for (seq, cell) in grid.eligible_cells() {
        let distance_km = great_circle_distance_km(
            cell.latitude,
            cell.longitude,
            demand.get_latitude(),
            demand.get_longitude(),
        );
        let adjusted_power_kw = calc_transmission_loss(
            cell.power_generation,
            distance_km * 1000.0,
            config.power_loss_per_1000km,
        );
        let annual_energy_kwh = annual_production_kwh(adjusted_power_kw, config);

        let demand_satisfaction_pct = if annual_demand > 0.0 {
            annual_energy_kwh / annual_demand * 100.0
        } else {
            0.0
        };
        let capacity_factor_pct = annual_energy_kwh / max_annual_output * 100.0;

        selector.push(
            adjusted_power_kw,
            seq,
            CandidateSite {
                cell,
                distance_km,
                adjusted_power_kw,
                annual_energy_kwh,
                demand_satisfaction_pct,
                capacity_factor_pct,
            },
        );
    }

    selector.into_ranked()
}

/// Rank grid cells on raw output alone, with no demand point, distance, or
/// transmission adjustment. Runs against the same grid snapshot as
/// `rank_sites` within a year.
pub fn rank_sites_by_raw_potential(
    grid: &PowerGrid,
    config: &SiteConfig,
    top_k: usize,
) -> Vec<PotentialSite> {
    let max_annual_output = config.turbine.max_annual_output_kwh();
    let mut selector = TopK::new(top_k);

    for (seq, cell) in grid.eligible_cells() {
        let annual_energy_kwh = annual_production_kwh(cell.power_generation, config);
        let capacity_factor_pct = annual_energy_kwh / max_annual_output * 100.0;

        selector.push(
            annual_energy_kwh,
            seq,
            PotentialSite {
                cell,
                annual_energy_kwh,
                capacity_factor_pct,
            },
        );
    }

    selector.into_ranked()
}

/// Projected annual energy in kWh from a daily power figure, assuming the
/// configured operating fraction of each day.
fn annual_production_kwh(power_kw: f64, config: &SiteConfig) -> f64 {
    power_kw * (config.operating_hours_fraction * HOURS_PER_DAY) * DAYS_PER_YEAR
}
