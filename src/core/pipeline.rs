use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::site_ranking::{rank_sites, rank_sites_by_raw_potential};
use crate::config::site_config::SiteConfig;
use crate::data::demand_loader::{self, DemandLoadError};
use crate::data::grid_loader::{self, GridLoadError};
use crate::models::candidate::{CandidateSite, PotentialSite};
use crate::models::demand::DemandPoint;
use crate::models::power_grid::PowerGrid;
use crate::utils::logging::{start_timing, FileIOType, OperationCategory};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Grid(#[from] GridLoadError),
    #[error(transparent)]
    Demand(#[from] DemandLoadError),
}

impl AnalysisError {
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            AnalysisError::Grid(GridLoadError::Missing(_))
                | AnalysisError::Demand(DemandLoadError::Missing(_))
        )
    }
}

/// Top-K sites for one city, rank order preserved.
#[derive(Debug, Clone)]
pub struct CityRanking {
    pub city: DemandPoint,
    pub sites: Vec<CandidateSite>,
}

/// Everything one analysis year produces.
#[derive(Debug, Clone)]
pub struct YearOutcome {
    pub year: u32,
    pub city_rankings: Vec<CityRanking>,
    pub potential: Vec<PotentialSite>,
}

fn grid_path(data_dir: &Path, year: u32) -> PathBuf {
    data_dir.join(format!("final_grid_{year}.json"))
}

fn climate_path(data_dir: &Path, year: u32) -> PathBuf {
    data_dir.join(format!("climate_{year}.json"))
}

fn demand_path(data_dir: &Path, year: u32) -> PathBuf {
    data_dir.join(format!("city_power_demand_projection_{year}.csv"))
}

// A pre-computed grid snapshot takes precedence; otherwise the grid is built
// from the year's climate fields.
fn load_grid(data_dir: &Path, year: u32, config: &SiteConfig) -> Result<PowerGrid, GridLoadError> {
    let prebuilt = grid_path(data_dir, year);
    if prebuilt.exists() {
        let _timing = start_timing(
            "load_power_grid",
            OperationCategory::FileIO {
                subcategory: FileIOType::DataLoad,
            },
        );
        return grid_loader::load_power_grid(&prebuilt);
    }

    let snapshot = {
        let _timing = start_timing(
            "load_climate_snapshot",
            OperationCategory::FileIO {
                subcategory: FileIOType::DataLoad,
            },
        );
        grid_loader::load_climate_snapshot(&climate_path(data_dir, year))?
    };

    let _timing = start_timing("build_power_grid", OperationCategory::GridBuild);
    Ok(PowerGrid::from_climate(&snapshot, config)?)
}

/// Run both rankings for one analysis year.
///
/// Demand points scan the shared grid snapshot independently, so the per-city
/// work runs on the rayon pool unless `parallel` is off.
pub fn run_year(
    year: u32,
    data_dir: &Path,
    config: &SiteConfig,
    parallel: bool,
) -> Result<YearOutcome, AnalysisError> {
    let grid = load_grid(data_dir, year, config)?;
    let demand_points = demand_loader::load_demand_points(&demand_path(data_dir, year))?;

    info!(
        year,
        cities = demand_points.len(),
        eligible_cells = grid.eligible_count(),
        "ranking candidate sites"
    );

    let rank_city = |city: &DemandPoint| CityRanking {
        city: city.clone(),
        sites: rank_sites(&grid, city, config, config.top_k),
    };

    let city_rankings = {
        let _timing = start_timing("rank_sites", OperationCategory::Ranking);
        if parallel {
            demand_points.par_iter().map(rank_city).collect()
        } else {
            demand_points.iter().map(rank_city).collect()
        }
    };

    let potential = {
        let _timing = start_timing("rank_raw_potential", OperationCategory::Ranking);
        rank_sites_by_raw_potential(&grid, config, config.top_k)
    };

    Ok(YearOutcome {
        year,
        city_rankings,
        potential,
    })
}

/// Run every requested year, skipping years whose inputs are missing or
/// malformed. Years that fail are logged and excluded from the result.
pub fn run_analysis(
    years: &[u32],
    data_dir: &Path,
    config: &SiteConfig,
    parallel: bool,
) -> Vec<YearOutcome> {
    let mut outcomes = Vec::with_capacity(years.len());
    for &year in years {
        match run_year(year, data_dir, config, parallel) {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => warn!(year, error = %e, "skipping year"),
        }
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_inputs(dir: &Path, year: u32) {
        fs::write(
            climate_path(dir, year),
            r#"{"lat": [53.0, 54.0], "lon": [-8.0, -7.0],
                "sfc_wind": [[6.0, 7.0], [5.0, null]],
                "tas": [[288.15, 288.15], [288.15, 288.15]],
                "ps": [[101325.0, 101325.0], [101325.0, 101325.0]],
                "hurs": [[50.0, 50.0], [50.0, 50.0]],
                "friction_coefficient": [[0.03, 0.03], [0.03, 0.03]],
                "airport_mask": [[0, 0], [1, 0]]}"#,
        )
        .unwrap();
        fs::write(
            demand_path(dir, year),
            "City,Latitude,Longitude,Energy Demand (kWh)\n\
             Dublin,53.3498,-6.2603,5000000\n\
             Cork,51.8985,-8.4756,1000000\n",
        )
        .unwrap();
    }

    #[test]
    fn runs_a_year_end_to_end_from_climate_inputs() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path(), 2020);

        let outcome = run_year(2020, dir.path(), &SiteConfig::default(), false).unwrap();

        assert_eq!(outcome.year, 2020);
        assert_eq!(outcome.city_rankings.len(), 2);
        // Two cells survive: one is masked, one has missing wind data
        assert_eq!(outcome.potential.len(), 2);
        for ranking in &outcome.city_rankings {
            assert_eq!(ranking.sites.len(), 2);
            assert!(ranking.sites[0].adjusted_power_kw >= ranking.sites[1].adjusted_power_kw);
        }
        // The 7 m/s cell dominates everywhere
        assert_eq!(outcome.potential[0].cell.longitude, -7.0);
    }

    #[test]
    fn prebuilt_grid_takes_precedence_over_climate() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path(), 2050);
        fs::write(
            grid_path(dir.path(), 2050),
            r#"{"lat": [53.0], "lon": [-8.0], "power_generation": [[250.0]]}"#,
        )
        .unwrap();

        let outcome = run_year(2050, dir.path(), &SiteConfig::default(), false).unwrap();
        assert_eq!(outcome.potential.len(), 1);
        assert_eq!(outcome.potential[0].daily_power_kw(), 250.0);
    }

    #[test]
    fn missing_inputs_fail_the_year() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_year(2075, dir.path(), &SiteConfig::default(), false).unwrap_err();
        assert!(err.is_missing_input());
    }

    #[test]
    fn run_analysis_continues_past_failed_years() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path(), 2099);

        let outcomes = run_analysis(
            &[2020, 2099],
            dir.path(),
            &SiteConfig::default(),
            false,
        );
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].year, 2099);
    }

    #[test]
    fn parallel_and_sequential_rankings_agree() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path(), 2020);
        let config = SiteConfig::default();

        let seq = run_year(2020, dir.path(), &config, false).unwrap();
        let par = run_year(2020, dir.path(), &config, true).unwrap();

        for (a, b) in seq.city_rankings.iter().zip(&par.city_rankings) {
            assert_eq!(a.city.get_name(), b.city.get_name());
            for (x, y) in a.sites.iter().zip(&b.sites) {
                assert_eq!(x.adjusted_power_kw, y.adjusted_power_kw);
                assert_eq!(x.cell.latitude, y.cell.latitude);
            }
        }
    }
}
