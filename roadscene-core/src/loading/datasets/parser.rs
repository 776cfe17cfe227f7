use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use log::trace;
use serde::de::DeserializeOwned;

use super::de::parse_lenient_f64;
use super::raw_types::RawTrafficRow;
use crate::Error;

/// Hourly count columns of the traffic export, midnight first
pub const TRAFFIC_HOUR_COLUMNS: [&str; 24] = [
    "_12_00_1_00_am",
    "_1_00_2_00am",
    "_2_00_3_00am",
    "_3_00_4_00am",
    "_4_00_5_00am",
    "_5_00_6_00am",
    "_6_00_7_00am",
    "_7_00_8_00am",
    "_8_00_9_00am",
    "_9_00_10_00am",
    "_10_00_11_00am",
    "_11_00_12_00pm",
    "_12_00_1_00pm",
    "_1_00_2_00pm",
    "_2_00_3_00pm",
    "_3_00_4_00pm",
    "_4_00_5_00pm",
    "_5_00_6_00pm",
    "_6_00_7_00pm",
    "_7_00_8_00pm",
    "_8_00_9_00pm",
    "_9_00_10_00pm",
    "_10_00_11_00pm",
    "_11_00_12_00am",
];

const GEOMETRY_COLUMNS: [&str; 2] = ["latitude", "longitude"];

/// Deserializes every row of a CSV source, skipping rows that fail to decode.
/// Returns the rows and the number of skipped ones.
///
/// # Errors
///
/// Fails if the header cannot be read or lacks the geometry columns.
pub fn deserialize_rows<T, R>(reader: R, dataset: &str) -> Result<(Vec<T>, usize), Error>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    require_columns(reader.headers()?, dataset, &GEOMETRY_COLUMNS)?;

    let mut malformed = 0usize;
    let rows: Vec<T> = reader
        .deserialize()
        .filter_map(|row| match row {
            Ok(row) => Some(row),
            Err(e) => {
                trace!("Skipping malformed {dataset} row: {e}");
                malformed += 1;
                None
            }
        })
        .collect();

    Ok((rows, malformed))
}

/// Reads the traffic export by column name, since the hourly columns are not
/// valid identifiers and their order differs between exports.
///
/// # Errors
///
/// Fails if the header cannot be read or lacks the geometry columns.
pub fn read_traffic_rows<R: Read>(reader: R) -> Result<(Vec<RawTrafficRow>, usize), Error> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    require_columns(&headers, "traffic", &GEOMETRY_COLUMNS)?;
    let columns = TrafficColumns::from_headers(&headers);

    let mut rows = Vec::new();
    let mut malformed = 0usize;
    for record in reader.records() {
        match record {
            Ok(record) => rows.push(columns.row(&record)),
            Err(e) => {
                trace!("Skipping malformed traffic row: {e}");
                malformed += 1;
            }
        }
    }

    Ok((rows, malformed))
}

fn require_columns(headers: &StringRecord, dataset: &str, required: &[&str]) -> Result<(), Error> {
    for column in required {
        if column_index(headers, column).is_none() {
            return Err(Error::InvalidData(format!(
                "{dataset} dataset has no '{column}' column"
            )));
        }
    }
    Ok(())
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

struct TrafficColumns {
    date: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    roadway_name: Option<usize>,
    direction: Option<usize>,
    from_street: Option<usize>,
    to_street: Option<usize>,
    borough: Option<usize>,
    hourly: [Option<usize>; 24],
}

impl TrafficColumns {
    fn from_headers(headers: &StringRecord) -> Self {
        Self {
            date: column_index(headers, "Date"),
            latitude: column_index(headers, "latitude"),
            longitude: column_index(headers, "longitude"),
            roadway_name: column_index(headers, "Roadway_Name"),
            direction: column_index(headers, "Direction"),
            from_street: column_index(headers, "From_St"),
            to_street: column_index(headers, "To_St"),
            borough: column_index(headers, "borough"),
            hourly: TRAFFIC_HOUR_COLUMNS.map(|name| column_index(headers, name)),
        }
    }

    fn row(&self, record: &StringRecord) -> RawTrafficRow {
        let text = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };
        let number =
            |index: Option<usize>| index.and_then(|i| record.get(i)).and_then(parse_lenient_f64);

        RawTrafficRow {
            date: text(self.date),
            latitude: number(self.latitude),
            longitude: number(self.longitude),
            roadway_name: text(self.roadway_name),
            direction: text(self.direction),
            from_street: text(self.from_street),
            to_street: text(self.to_street),
            borough: text(self.borough),
            hourly: self.hourly.map(number),
        }
    }
}
