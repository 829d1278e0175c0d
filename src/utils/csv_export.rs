use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::constants::OUTPUT_DECIMALS;
use crate::core::pipeline::YearOutcome;

/// Round to a fixed number of decimal places, applied to every numeric value
/// before emission. Idempotent.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn r(value: f64) -> f64 {
    round_to(value, OUTPUT_DECIMALS)
}

/// Writes the ranked-site tables and KML placemark files into a timestamped
/// directory under the configured output root.
pub struct CsvExporter {
    output_dir: PathBuf,
    verbose_logging: bool,
}

impl CsvExporter {
    pub fn new(output_dir: impl AsRef<Path>, verbose_logging: bool) -> io::Result<Self> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let full_path = output_dir.as_ref().join(timestamp);
        std::fs::create_dir_all(&full_path)?;

        Ok(Self {
            output_dir: full_path,
            verbose_logging,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export all ranking output for the analyzed years.
    pub fn export_analysis_results(&self, outcomes: &[YearOutcome]) -> io::Result<()> {
        self.export_top_locations(outcomes)?;
        self.export_top_power_locations(outcomes)?;
        self.export_top_locations_kml(outcomes)?;
        self.export_top_power_locations_kml(outcomes)?;

        if self.verbose_logging {
            println!(
                "Export completed successfully to: {}",
                self.output_dir.display()
            );
        }
        Ok(())
    }

    /// Per-city ranking table, one row per (year, city, rank).
    pub fn export_top_locations(&self, outcomes: &[YearOutcome]) -> io::Result<PathBuf> {
        let path = self.output_dir.join("top_locations.csv");
        let mut file = File::create(&path)?;

        writeln!(
            file,
            "Year,City,Rank,Lat,Lon,Distance_to_City (km),Adjusted_Daily_Power (kW),\
             Annual_Energy_Production (kWh),City_Energy_Demand (kWh),\
             Demand_Satisfaction (%),Capacity Factor (%)"
        )?;

        for outcome in outcomes {
            for ranking in &outcome.city_rankings {
                for (rank, site) in ranking.sites.iter().enumerate() {
                    writeln!(
                        file,
                        "{},{},{},{},{},{},{},{},{},{},{}",
                        outcome.year,
                        ranking.city.get_name(),
                        rank + 1,
                        r(site.cell.latitude),
                        r(site.cell.longitude),
                        r(site.distance_km),
                        r(site.adjusted_power_kw),
                        r(site.annual_energy_kwh),
                        r(ranking.city.get_annual_demand_kwh()),
                        r(site.demand_satisfaction_pct),
                        r(site.capacity_factor_pct)
                    )?;
                }
            }
        }

        if self.verbose_logging {
            println!("Wrote city rankings to: {}", path.display());
        }
        Ok(path)
    }

    /// Demand-independent ranking table, one row per (year, rank).
    pub fn export_top_power_locations(&self, outcomes: &[YearOutcome]) -> io::Result<PathBuf> {
        let path = self.output_dir.join("top_power_locations.csv");
        let mut file = File::create(&path)?;

        writeln!(
            file,
            "Year,Rank,Lat,Lon,Daily Power Potential (kW),\
             Annual Energy Production (kWh),Capacity Factor (%)"
        )?;

        for outcome in outcomes {
            for (rank, site) in outcome.potential.iter().enumerate() {
                writeln!(
                    file,
                    "{},{},{},{},{},{},{}",
                    outcome.year,
                    rank + 1,
                    r(site.cell.latitude),
                    r(site.cell.longitude),
                    r(site.daily_power_kw()),
                    r(site.annual_energy_kwh),
                    r(site.capacity_factor_pct)
                )?;
            }
        }

        if self.verbose_logging {
            println!("Wrote power potential rankings to: {}", path.display());
        }
        Ok(path)
    }

    pub fn export_top_locations_kml(&self, outcomes: &[YearOutcome]) -> io::Result<PathBuf> {
        let placemarks = outcomes.iter().flat_map(|outcome| {
            outcome.city_rankings.iter().flat_map(move |ranking| {
                ranking.sites.iter().enumerate().map(move |(rank, site)| {
                    (
                        outcome.year,
                        rank + 1,
                        site.cell.longitude,
                        site.cell.latitude,
                    )
                })
            })
        });
        self.write_kml("top_locations.kml", placemarks)
    }

    pub fn export_top_power_locations_kml(&self, outcomes: &[YearOutcome]) -> io::Result<PathBuf> {
        let placemarks = outcomes.iter().flat_map(|outcome| {
            outcome.potential.iter().enumerate().map(move |(rank, site)| {
                (
                    outcome.year,
                    rank + 1,
                    site.cell.longitude,
                    site.cell.latitude,
                )
            })
        });
        self.write_kml("top_power_locations.kml", placemarks)
    }

    fn write_kml(
        &self,
        filename: &str,
        placemarks: impl Iterator<Item = (u32, usize, f64, f64)>,
    ) -> io::Result<PathBuf> {
        let path = self.output_dir.join(filename);
        let mut file = File::create(&path)?;

        writeln!(file, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(file, r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#)?;
        writeln!(file, "<Document>")?;
        for (year, rank, lon, lat) in placemarks {
            writeln!(file, "  <Placemark>")?;
            writeln!(file, "    <name>{} - Rank {}</name>", year, rank)?;
            writeln!(
                file,
                "    <description>Year: {}, Rank: {}</description>",
                year, rank
            )?;
            writeln!(
                file,
                "    <Point><coordinates>{},{}</coordinates></Point>",
                r(lon),
                r(lat)
            )?;
            writeln!(file, "  </Placemark>")?;
        }
        writeln!(file, "</Document>")?;
        writeln!(file, "</kml>")?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::CityRanking;
    use crate::models::candidate::{CandidateSite, PotentialSite};
    use crate::models::demand::DemandPoint;
    use crate::models::power_grid::GridCell;

    fn sample_outcome() -> YearOutcome {
        let cell = GridCell {
            latitude: 53.123456789,
            longitude: -8.987654321,
            power_generation: 150.0,
        };
        YearOutcome {
            year: 2020,
            city_rankings: vec![CityRanking {
                city: DemandPoint::new("Dublin".to_string(), 53.3498, -6.2603, 5_000_000.0),
                sites: vec![CandidateSite {
                    cell: cell.clone(),
                    distance_km: 181.5,
                    adjusted_power_kw: 150.0,
                    annual_energy_kwh: 394_200.0,
                    demand_satisfaction_pct: 7.884,
                    capacity_factor_pct: 3.82493,
                }],
            }],
            potential: vec![PotentialSite {
                cell,
                annual_energy_kwh: 394_200.0,
                capacity_factor_pct: 3.82493,
            }],
        }
    }

    #[test]
    fn rounding_is_idempotent() {
        for value in [0.1 + 0.2, 1.234567891, -53.000004999, 148.95, 0.0] {
            let once = round_to(value, 5);
            let twice = round_to(once, 5);
            assert_eq!(once, twice, "rounding {} twice changed the value", value);
        }
    }

    #[test]
    fn rounding_truncates_to_five_decimals() {
        assert_eq!(round_to(1.234567891, 5), 1.23457);
        assert_eq!(round_to(-1.000001234, 5), -1.0);
    }

    #[test]
    fn exports_both_tables_with_rounded_values() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path(), false).unwrap();
        let outcomes = vec![sample_outcome()];

        let city_path = exporter.export_top_locations(&outcomes).unwrap();
        let potential_path = exporter.export_top_power_locations(&outcomes).unwrap();

        let city_table = std::fs::read_to_string(city_path).unwrap();
        let mut lines = city_table.lines();
        assert!(lines.next().unwrap().starts_with("Year,City,Rank,Lat,Lon"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("2020,Dublin,1,53.12346,-8.98765,"));
        assert_eq!(lines.next(), None);

        let potential_table = std::fs::read_to_string(potential_path).unwrap();
        assert_eq!(potential_table.lines().count(), 2);
        assert!(potential_table.contains("2020,1,53.12346,-8.98765,150,394200,3.82493"));
    }

    #[test]
    fn kml_contains_one_placemark_per_ranked_site() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path(), false).unwrap();
        let outcomes = vec![sample_outcome()];

        let path = exporter.export_top_locations_kml(&outcomes).unwrap();
        let kml = std::fs::read_to_string(path).unwrap();

        assert_eq!(kml.matches("<Placemark>").count(), 1);
        assert!(kml.contains("<name>2020 - Rank 1</name>"));
        // KML coordinate order is lon,lat
        assert!(kml.contains("<coordinates>-8.98765,53.12346</coordinates>"));
    }
}
