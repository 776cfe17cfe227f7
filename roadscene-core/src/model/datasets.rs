//! Typed rows of the three source datasets, after geometry validation

use std::ops::AddAssign;

use chrono::{Datelike, NaiveDateTime};
use geo::Point;
use serde::Serialize;

/// Number of hourly count columns in the traffic dataset
pub const HOURS_PER_DAY: usize = 24;

/// One automated traffic count (a road segment on a given day)
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficCount {
    pub date: Option<NaiveDateTime>,
    pub location: Point<f64>,
    pub roadway_name: String,
    pub direction: String,
    pub from_street: String,
    pub to_street: String,
    pub borough: Option<String>,
    /// Vehicle counts indexed by hour of day, 0 = midnight to 1am
    pub hourly: [Option<f64>; HOURS_PER_DAY],
}

impl TrafficCount {
    /// Sum of the available hourly counts divided by 24
    #[allow(clippy::cast_precision_loss)]
    pub fn average_volume(&self) -> f64 {
        self.hourly.iter().flatten().sum::<f64>() / HOURS_PER_DAY as f64
    }

    pub fn year(&self) -> Option<i32> {
        self.date.map(|date| date.year())
    }
}

/// A street construction project
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionProject {
    pub borough: Option<String>,
    /// Borough column used by the project registry, spelled differently from `borough`
    pub boro: Option<String>,
    pub construction_type: Option<String>,
    pub award: Option<f64>,
    pub data_as_of: Option<NaiveDateTime>,
    pub location: Point<f64>,
}

impl ConstructionProject {
    pub fn registry_borough(&self) -> Option<&str> {
        self.boro.as_deref().or(self.borough.as_deref())
    }

    pub fn borough_name(&self) -> Option<&str> {
        self.borough.as_deref().or(self.boro.as_deref())
    }
}

/// Injury and fatality counts of one collision, per road-user category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CasualtyCounts {
    pub persons_injured: f64,
    pub persons_killed: f64,
    pub pedestrians_injured: f64,
    pub pedestrians_killed: f64,
    pub cyclist_injured: f64,
    pub cyclist_killed: f64,
    pub motorist_injured: f64,
    pub motorist_killed: f64,
}

impl CasualtyCounts {
    /// All eight columns
    pub fn total(&self) -> f64 {
        self.persons_injured
            + self.persons_killed
            + self.pedestrians_injured
            + self.pedestrians_killed
            + self.cyclist_injured
            + self.cyclist_killed
            + self.motorist_injured
            + self.motorist_killed
    }

    /// Persons, cyclists and motorists; the map layer leaves pedestrians out
    pub fn layer_categories(&self) -> [f64; 6] {
        [
            self.persons_injured,
            self.persons_killed,
            self.cyclist_injured,
            self.cyclist_killed,
            self.motorist_injured,
            self.motorist_killed,
        ]
    }
}

impl AddAssign for CasualtyCounts {
    fn add_assign(&mut self, other: Self) {
        self.persons_injured += other.persons_injured;
        self.persons_killed += other.persons_killed;
        self.pedestrians_injured += other.pedestrians_injured;
        self.pedestrians_killed += other.pedestrians_killed;
        self.cyclist_injured += other.cyclist_injured;
        self.cyclist_killed += other.cyclist_killed;
        self.motorist_injured += other.motorist_injured;
        self.motorist_killed += other.motorist_killed;
    }
}

/// A police-reported motor vehicle collision
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionReport {
    pub crash_date: Option<NaiveDateTime>,
    pub borough: Option<String>,
    pub location: Point<f64>,
    pub casualties: CasualtyCounts,
    pub contributing_factor_1: Option<String>,
    pub contributing_factor_2: Option<String>,
    pub on_street_name: Option<String>,
    pub off_street_name: Option<String>,
}

impl CollisionReport {
    pub fn year(&self) -> Option<i32> {
        self.crash_date.map(|date| date.year())
    }
}

/// The raw datasets kept for dashboard analytics
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub traffic: Vec<TrafficCount>,
    pub construction: Vec<ConstructionProject>,
    pub collisions: Vec<CollisionReport>,
}
