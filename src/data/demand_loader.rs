use std::fs::File;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use crate::models::demand::DemandPoint;

#[derive(Debug, Error)]
pub enum DemandLoadError {
    #[error("demand table not found: {0}")]
    Missing(PathBuf),
    #[error("failed to read demand table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse demand table {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("invalid demand record for '{city}': {reason}")]
    InvalidRecord { city: String, reason: String },
}

// Column names follow the upstream projection tables.
#[derive(Debug, Deserialize)]
struct DemandRecord {
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Energy Demand (kWh)")]
    energy_demand_kwh: f64,
}

/// Load one year's city demand table from CSV.
pub fn load_demand_points(path: &Path) -> Result<Vec<DemandPoint>, DemandLoadError> {
    if !path.exists() {
        return Err(DemandLoadError::Missing(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| DemandLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut points = Vec::new();
    for record in reader.deserialize::<DemandRecord>() {
        let record = record.map_err(|source| DemandLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        points.push(validate_record(record)?);
    }
    Ok(points)
}

fn validate_record(record: DemandRecord) -> Result<DemandPoint, DemandLoadError> {
    if !(-90.0..=90.0).contains(&record.latitude) {
        return Err(DemandLoadError::InvalidRecord {
            city: record.city,
            reason: format!("latitude {} out of range", record.latitude),
        });
    }
    if !(-180.0..=180.0).contains(&record.longitude) {
        return Err(DemandLoadError::InvalidRecord {
            city: record.city,
            reason: format!("longitude {} out of range", record.longitude),
        });
    }
    if !record.energy_demand_kwh.is_finite() || record.energy_demand_kwh < 0.0 {
        return Err(DemandLoadError::InvalidRecord {
            city: record.city,
            reason: format!("energy demand {} must be non-negative", record.energy_demand_kwh),
        });
    }

    Ok(DemandPoint::new(
        record.city,
        record.latitude,
        record.longitude,
        record.energy_demand_kwh,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_table(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_well_formed_table() {
        let file = write_table(
            "City,Latitude,Longitude,Energy Demand (kWh)\n\
             Dublin,53.3498,-6.2603,5000000000\n\
             Cork,51.8985,-8.4756,900000000\n",
        );
        let points = load_demand_points(file.path()).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].get_name(), "Dublin");
        assert!((points[0].get_latitude() - 53.3498).abs() < 1e-12);
        assert_eq!(points[1].get_annual_demand_kwh(), 900_000_000.0);
    }

    #[test]
    fn missing_file_is_a_distinct_error() {
        let err = load_demand_points(Path::new("/nonexistent/demand.csv")).unwrap_err();
        assert!(matches!(err, DemandLoadError::Missing(_)));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let file = write_table(
            "City,Latitude,Longitude,Energy Demand (kWh)\n\
             Atlantis,95.0,0.0,1000\n",
        );
        let err = load_demand_points(file.path()).unwrap_err();
        assert!(matches!(err, DemandLoadError::InvalidRecord { .. }));
    }

    #[test]
    fn rejects_negative_demand() {
        let file = write_table(
            "City,Latitude,Longitude,Energy Demand (kWh)\n\
             Dublin,53.3,-6.3,-5\n",
        );
        assert!(load_demand_points(file.path()).is_err());
    }
}
