use serde::Deserialize;

use super::de::deserialize_lenient_f64;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RawConstructionRow {
    pub borough: String,
    pub boro: String,
    pub consttype: String,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub award: Option<f64>,
    pub data_as_of: String,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RawCollisionRow {
    pub crash_date: String,
    pub borough: String,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub number_of_persons_injured: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub number_of_persons_killed: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub number_of_pedestrians_injured: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub number_of_pedestrians_killed: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub number_of_cyclist_injured: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub number_of_cyclist_killed: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub number_of_motorist_injured: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub number_of_motorist_killed: Option<f64>,
    pub contributing_factor_vehicle_1: String,
    pub contributing_factor_vehicle_2: String,
    pub on_street_name: String,
    pub off_street_name: String,
}

/// Traffic rows are read positionally, the hourly columns have no stable order
#[derive(Debug, Default)]
pub struct RawTrafficRow {
    pub date: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub roadway_name: String,
    pub direction: String,
    pub from_street: String,
    pub to_street: String,
    pub borough: String,
    pub hourly: [Option<f64>; 24],
}
