use serde::Deserialize;
use thiserror::Error;

/// A grid field had a shape that does not match the coordinate vectors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' has shape {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
pub struct ShapeError {
    pub field: &'static str,
    pub rows: usize,
    pub cols: usize,
    pub expected_rows: usize,
    pub expected_cols: usize,
}

/// One year's climate fields on a shared lat/lon grid, as merged upstream.
///
/// Missing data is `null` in the serialized form. The friction and land cover
/// fields are optional; exclusion masks default to all-clear when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct ClimateSnapshot {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    /// Near-surface wind speed (m/s)
    pub sfc_wind: Vec<Vec<Option<f64>>>,
    /// Near-surface air temperature (K)
    pub tas: Vec<Vec<Option<f64>>>,
    /// Surface pressure (Pa)
    pub ps: Vec<Vec<Option<f64>>>,
    /// Relative humidity (%)
    pub hurs: Vec<Vec<Option<f64>>>,
    /// Surface roughness length (m); derived from land cover when absent
    #[serde(default)]
    pub friction_coefficient: Option<Vec<Vec<Option<f64>>>>,
    /// Land cover classification
    #[serde(default)]
    pub lccs_class: Option<Vec<Vec<Option<u8>>>>,
    /// National protected areas (nonzero = excluded)
    #[serde(default)]
    pub protected_mask: Option<Vec<Vec<u8>>>,
    /// Airport exclusion zones (nonzero = excluded)
    #[serde(default)]
    pub airport_mask: Option<Vec<Vec<u8>>>,
    /// Special protection areas (nonzero = excluded)
    #[serde(default)]
    pub special_protection_mask: Option<Vec<Vec<u8>>>,
}

fn check_shape<T>(
    field: &'static str,
    data: &[Vec<T>],
    rows: usize,
    cols: usize,
) -> Result<(), ShapeError> {
    let bad_row = data.iter().map(Vec::len).find(|&len| len != cols);
    if data.len() != rows || bad_row.is_some() {
        return Err(ShapeError {
            field,
            rows: data.len(),
            cols: bad_row.unwrap_or(cols),
            expected_rows: rows,
            expected_cols: cols,
        });
    }
    Ok(())
}

impl ClimateSnapshot {
    /// Verify every field matches the lat/lon coordinate vectors.
    pub fn validate(&self) -> Result<(), ShapeError> {
        let rows = self.lat.len();
        let cols = self.lon.len();

        check_shape("sfc_wind", &self.sfc_wind, rows, cols)?;
        check_shape("tas", &self.tas, rows, cols)?;
        check_shape("ps", &self.ps, rows, cols)?;
        check_shape("hurs", &self.hurs, rows, cols)?;
        if let Some(friction) = &self.friction_coefficient {
            check_shape("friction_coefficient", friction, rows, cols)?;
        }
        if let Some(lccs) = &self.lccs_class {
            check_shape("lccs_class", lccs, rows, cols)?;
        }
        if let Some(mask) = &self.protected_mask {
            check_shape("protected_mask", mask, rows, cols)?;
        }
        if let Some(mask) = &self.airport_mask {
            check_shape("airport_mask", mask, rows, cols)?;
        }
        if let Some(mask) = &self.special_protection_mask {
            check_shape("special_protection_mask", mask, rows, cols)?;
        }
        Ok(())
    }

    /// True when any exclusion mask marks the cell.
    pub fn is_masked(&self, i: usize, j: usize) -> bool {
        [
            &self.protected_mask,
            &self.airport_mask,
            &self.special_protection_mask,
        ]
        .iter()
        .any(|mask| mask.as_ref().is_some_and(|m| m[i][j] != 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(value: f64) -> Vec<Vec<Option<f64>>> {
        vec![vec![Some(value), Some(value)]]
    }

    fn snapshot() -> ClimateSnapshot {
        ClimateSnapshot {
            lat: vec![0.0],
            lon: vec![0.0, 1.0],
            sfc_wind: field(5.0),
            tas: field(288.15),
            ps: field(101_325.0),
            hurs: field(50.0),
            friction_coefficient: None,
            lccs_class: None,
            protected_mask: None,
            airport_mask: None,
            special_protection_mask: None,
        }
    }

    #[test]
    fn validate_accepts_consistent_fields() {
        assert!(snapshot().validate().is_ok());
    }

    #[test]
    fn validate_rejects_ragged_field() {
        let mut snap = snapshot();
        snap.tas = vec![vec![Some(288.15)]];
        let err = snap.validate().unwrap_err();
        assert_eq!(err.field, "tas");
    }

    #[test]
    fn any_nonzero_mask_excludes_a_cell() {
        let mut snap = snapshot();
        assert!(!snap.is_masked(0, 0));

        snap.airport_mask = Some(vec![vec![0, 1]]);
        assert!(!snap.is_masked(0, 0));
        assert!(snap.is_masked(0, 1));
    }
}
