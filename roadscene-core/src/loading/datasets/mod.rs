//! Loading the traffic, construction and collision exports into typed records.
//!
//! Rows without a usable location are dropped here; only their count is logged.
//! Collision and construction rows whose borough is the `"0"` placeholder are
//! dropped as well.

mod de;
mod parser;
mod raw_types;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use geo::Point;
use log::info;

pub use de::parse_datetime;
pub use parser::{TRAFFIC_HOUR_COLUMNS, deserialize_rows, read_traffic_rows};
pub use raw_types::{RawCollisionRow, RawConstructionRow, RawTrafficRow};

use de::{is_placeholder_borough, non_empty, normalize_borough};

use crate::Error;
use crate::geocoding::is_valid_coordinate;
use crate::loading::boroughs::BoroughBoundaries;
use crate::model::{CasualtyCounts, CollisionReport, ConstructionProject, TrafficCount};

/// Row accounting for one dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub rows: usize,
    pub kept: usize,
    pub missing_geometry: usize,
    pub placeholder_borough: usize,
    pub malformed: usize,
}

impl IngestStats {
    fn log(&self, dataset: &str) {
        info!(
            "Loaded {} of {} {dataset} rows ({} without valid coordinates, \
             {} with placeholder borough, {} malformed)",
            self.kept, self.rows, self.missing_geometry, self.placeholder_borough, self.malformed
        );
    }
}

/// Loads the traffic counts, assigning boroughs from `boundaries` to rows
/// that do not name one.
///
/// # Errors
///
/// Fails if the file cannot be opened or lacks the geometry columns.
pub fn load_traffic(
    path: &Path,
    boundaries: Option<&BoroughBoundaries>,
) -> Result<Vec<TrafficCount>, Error> {
    let (records, stats) = traffic_from_reader(open(path)?, boundaries)?;
    stats.log("traffic");
    Ok(records)
}

/// # Errors
///
/// Fails if the file cannot be opened or lacks the geometry columns.
pub fn load_construction(path: &Path) -> Result<Vec<ConstructionProject>, Error> {
    let (records, stats) = construction_from_reader(open(path)?)?;
    stats.log("construction");
    Ok(records)
}

/// # Errors
///
/// Fails if the file cannot be opened or lacks the geometry columns.
pub fn load_collisions(path: &Path) -> Result<Vec<CollisionReport>, Error> {
    let (records, stats) = collisions_from_reader(open(path)?)?;
    stats.log("collision");
    Ok(records)
}

/// # Errors
///
/// Fails if the header lacks the geometry columns.
pub fn traffic_from_reader<R: Read>(
    reader: R,
    boundaries: Option<&BoroughBoundaries>,
) -> Result<(Vec<TrafficCount>, IngestStats), Error> {
    let (rows, malformed) = read_traffic_rows(reader)?;
    let mut stats = IngestStats {
        rows: rows.len() + malformed,
        malformed,
        ..IngestStats::default()
    };

    let records: Vec<TrafficCount> = rows
        .into_iter()
        .filter_map(|row| {
            let location = valid_location(row.latitude, row.longitude, &mut stats)?;
            let borough = normalize_borough(&row.borough).or_else(|| {
                boundaries
                    .and_then(|b| b.borough_at(&location))
                    .map(str::to_string)
            });
            Some(TrafficCount {
                date: parse_datetime(&row.date),
                location,
                roadway_name: row.roadway_name,
                direction: row.direction,
                from_street: row.from_street,
                to_street: row.to_street,
                borough,
                hourly: row.hourly,
            })
        })
        .collect();

    stats.kept = records.len();
    Ok((records, stats))
}

/// # Errors
///
/// Fails if the header lacks the geometry columns.
pub fn construction_from_reader<R: Read>(
    reader: R,
) -> Result<(Vec<ConstructionProject>, IngestStats), Error> {
    let (rows, malformed) = deserialize_rows::<RawConstructionRow, _>(reader, "construction")?;
    let mut stats = IngestStats {
        rows: rows.len() + malformed,
        malformed,
        ..IngestStats::default()
    };

    let records: Vec<ConstructionProject> = rows
        .into_iter()
        .filter_map(|row| {
            if is_placeholder_borough(&row.borough) {
                stats.placeholder_borough += 1;
                return None;
            }
            let location = valid_location(row.latitude, row.longitude, &mut stats)?;
            Some(ConstructionProject {
                borough: normalize_borough(&row.borough),
                boro: normalize_borough(&row.boro),
                construction_type: non_empty(&row.consttype),
                award: row.award,
                data_as_of: parse_datetime(&row.data_as_of),
                location,
            })
        })
        .collect();

    stats.kept = records.len();
    Ok((records, stats))
}

/// # Errors
///
/// Fails if the header lacks the geometry columns.
pub fn collisions_from_reader<R: Read>(
    reader: R,
) -> Result<(Vec<CollisionReport>, IngestStats), Error> {
    let (rows, malformed) = deserialize_rows::<RawCollisionRow, _>(reader, "collision")?;
    let mut stats = IngestStats {
        rows: rows.len() + malformed,
        malformed,
        ..IngestStats::default()
    };

    let records: Vec<CollisionReport> = rows
        .into_iter()
        .filter_map(|row| {
            if is_placeholder_borough(&row.borough) {
                stats.placeholder_borough += 1;
                return None;
            }
            let location = valid_location(row.latitude, row.longitude, &mut stats)?;
            let count = |value: Option<f64>| value.unwrap_or(0.0);
            Some(CollisionReport {
                crash_date: parse_datetime(&row.crash_date),
                borough: normalize_borough(&row.borough),
                location,
                casualties: CasualtyCounts {
                    persons_injured: count(row.number_of_persons_injured),
                    persons_killed: count(row.number_of_persons_killed),
                    pedestrians_injured: count(row.number_of_pedestrians_injured),
                    pedestrians_killed: count(row.number_of_pedestrians_killed),
                    cyclist_injured: count(row.number_of_cyclist_injured),
                    cyclist_killed: count(row.number_of_cyclist_killed),
                    motorist_injured: count(row.number_of_motorist_injured),
                    motorist_killed: count(row.number_of_motorist_killed),
                },
                contributing_factor_1: non_empty(&row.contributing_factor_vehicle_1),
                contributing_factor_2: non_empty(&row.contributing_factor_vehicle_2),
                on_street_name: non_empty(&row.on_street_name),
                off_street_name: non_empty(&row.off_street_name),
            })
        })
        .collect();

    stats.kept = records.len();
    Ok((records, stats))
}

fn valid_location(
    lat: Option<f64>,
    lon: Option<f64>,
    stats: &mut IngestStats,
) -> Option<Point<f64>> {
    match (lat, lon) {
        (Some(lat), Some(lon)) if is_valid_coordinate(lat, lon) => Some(Point::new(lon, lat)),
        _ => {
            stats.missing_geometry += 1;
            None
        }
    }
}

fn open(path: &Path) -> Result<File, Error> {
    File::open(path).map_err(|e| {
        Error::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to open dataset '{}': {}", path.display(), e),
        ))
    })
}
