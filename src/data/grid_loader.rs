use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::models::climate::ClimateSnapshot;
use crate::models::power_grid::{GridError, PowerGrid};

#[derive(Debug, Error)]
pub enum GridLoadError {
    #[error("grid file not found: {0}")]
    Missing(PathBuf),
    #[error("failed to read grid file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse grid file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Grid(#[from] GridError),
}

// Serialized form of a pre-computed power grid; `null` marks no-data cells.
#[derive(Debug, Deserialize)]
struct PowerGridFile {
    lat: Vec<f64>,
    lon: Vec<f64>,
    power_generation: Vec<Vec<Option<f64>>>,
}

fn open(path: &Path) -> Result<BufReader<File>, GridLoadError> {
    if !path.exists() {
        return Err(GridLoadError::Missing(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| GridLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Load a pre-computed power grid snapshot. No-data cells become zero.
pub fn load_power_grid(path: &Path) -> Result<PowerGrid, GridLoadError> {
    let reader = open(path)?;
    let parsed: PowerGridFile =
        serde_json::from_reader(reader).map_err(|source| GridLoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let values = parsed
        .power_generation
        .into_iter()
        .flatten()
        .map(|v| v.unwrap_or(0.0))
        .collect();

    Ok(PowerGrid::new(parsed.lat, parsed.lon, values)?)
}

/// Load one year's merged climate fields.
pub fn load_climate_snapshot(path: &Path) -> Result<ClimateSnapshot, GridLoadError> {
    let reader = open(path)?;
    serde_json::from_reader(reader).map_err(|source| GridLoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}
