use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::const_funcs::{
    calc_air_density, calc_power_generation, calc_wind_at_height, roughness_for_landcover,
};
use crate::config::constants::{LANDCOVER_URBAN, LANDCOVER_WATER};
use crate::config::site_config::SiteConfig;
use crate::models::climate::{ClimateSnapshot, ShapeError};

#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid has {values} values for {lats} latitudes x {lons} longitudes")]
    DimensionMismatch {
        lats: usize,
        lons: usize,
        values: usize,
    },
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// One raster pixel with its pre-computed daily power output in kW.
#[derive(Debug, Clone, Serialize)]
pub struct GridCell {
    pub latitude: f64,
    pub longitude: f64,
    pub power_generation: f64,
}

/// Per-cell power generation on a lat/lon grid, row-major over latitudes.
///
/// Every stored value is finite and non-negative; excluded or missing cells
/// hold zero and are skipped by the ranking scan.
#[derive(Debug, Clone)]
pub struct PowerGrid {
    lat: Vec<f64>,
    lon: Vec<f64>,
    values: Vec<f64>,
}

impl PowerGrid {
    pub fn new(lat: Vec<f64>, lon: Vec<f64>, values: Vec<f64>) -> Result<Self, GridError> {
        if values.len() != lat.len() * lon.len() {
            return Err(GridError::DimensionMismatch {
                lats: lat.len(),
                lons: lon.len(),
                values: values.len(),
            });
        }

        // Sanitize on entry so the scan can trust every value
        let values = values
            .into_iter()
            .map(|v| if v.is_finite() && v > 0.0 { v } else { 0.0 })
            .collect();

        Ok(Self { lat, lon, values })
    }

    /// Compute the power grid from merged climate fields.
    ///
    /// Cells under any exclusion mask, on urban or water land cover, or with
    /// missing data produce zero. Cells whose inputs violate a calculator
    /// precondition are skipped the same way; one warning summarizes them.
    pub fn from_climate(snapshot: &ClimateSnapshot, config: &SiteConfig) -> Result<Self, GridError> {
        snapshot.validate()?;

        let rows = snapshot.lat.len();
        let cols = snapshot.lon.len();
        let mut values = Vec::with_capacity(rows * cols);
        let mut domain_skipped = 0usize;

        for i in 0..rows {
            for j in 0..cols {
                values.push(cell_power(snapshot, config, i, j, &mut domain_skipped));
            }
        }

        if domain_skipped > 0 {
            warn!(
                cells = domain_skipped,
                "excluded cells with out-of-domain climate inputs"
            );
        }

        Self::new(snapshot.lat.clone(), snapshot.lon.clone(), values)
    }

    pub fn n_lat(&self) -> usize {
        self.lat.len()
    }

    pub fn n_lon(&self) -> usize {
        self.lon.len()
    }

    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.lon.len() + j]
    }

    pub fn eligible_count(&self) -> usize {
        self.values.iter().filter(|&&v| v > 0.0).count()
    }

    /// Lazy row-major scan over cells with positive generation. The scan
    /// index accompanies each cell and defines the deterministic tie-break
    /// used by the rankings.
    pub fn eligible_cells(&self) -> impl Iterator<Item = (usize, GridCell)> + '_ {
        let cols = self.lon.len();
        self.values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v > 0.0)
            .map(move |(idx, &power)| {
                (
                    idx,
                    GridCell {
                        latitude: self.lat[idx / cols],
                        longitude: self.lon[idx % cols],
                        power_generation: power,
                    },
                )
            })
    }
}

fn cell_power(
    snapshot: &ClimateSnapshot,
    config: &SiteConfig,
    i: usize,
    j: usize,
    domain_skipped: &mut usize,
) -> f64 {
    if snapshot.is_masked(i, j) {
        return 0.0;
    }

    let landcover = snapshot.lccs_class.as_ref().and_then(|lccs| lccs[i][j]);
    if matches!(landcover, Some(LANDCOVER_URBAN) | Some(LANDCOVER_WATER)) {
        return 0.0;
    }

    let Some(wind) = finite_value(&snapshot.sfc_wind, i, j) else {
        return 0.0;
    };
    let Some(tas) = finite_value(&snapshot.tas, i, j) else {
        return 0.0;
    };
    let Some(ps) = finite_value(&snapshot.ps, i, j) else {
        return 0.0;
    };
    let Some(hurs) = finite_value(&snapshot.hurs, i, j) else {
        return 0.0;
    };

    let friction = snapshot
        .friction_coefficient
        .as_ref()
        .and_then(|f| f[i][j])
        .filter(|f| f.is_finite())
        .or_else(|| landcover.and_then(roughness_for_landcover));
    let Some(friction) = friction else {
        return 0.0;
    };

    let turbine = &config.turbine;
    let wind_at_hub = match calc_wind_at_height(
        wind,
        friction,
        turbine.reference_height,
        turbine.target_height,
    ) {
        Ok(v) => v,
        Err(e) => {
            debug!(row = i, col = j, error = %e, "cell skipped");
            *domain_skipped += 1;
            return 0.0;
        }
    };

    let density = match calc_air_density(ps, tas, hurs) {
        Ok(v) => v,
        Err(e) => {
            debug!(row = i, col = j, error = %e, "cell skipped");
            *domain_skipped += 1;
            return 0.0;
        }
    };

    calc_power_generation(
        wind_at_hub,
        density,
        turbine.swept_area,
        turbine.power_coefficient,
    )
    .max(0.0)
}

fn finite_value(field: &[Vec<Option<f64>>], i: usize, j: usize) -> Option<f64> {
    field[i][j].filter(|v| v.is_finite())
}
