//! Dashboard aggregates over the raw datasets.
//!
//! Every function here is pure and returns serializable rows; categories are
//! sorted by descending count with ties broken by name unless noted.

mod collisions;
mod construction;
mod traffic;

use std::collections::HashMap;

use serde::Serialize;

pub use collisions::{
    BoroughCasualties, StreetCollisions, casualties_by_borough, collisions_per_borough,
    contributing_factor_frequencies, fatalities_by_borough, street_collision_count,
};
pub use construction::{
    construction_starts_per_month, construction_types_by_borough, normalized_award_by_borough,
    project_type_distribution, projects_per_borough,
};
pub use traffic::{
    HourlyVolume, VolumeHeatmap, average_volume_by_borough, average_volume_per_hour,
    traffic_volume_heatmap,
};

use crate::model::Datasets;

/// Label for records without a borough
pub const UNKNOWN_BOROUGH: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValue {
    pub name: String,
    pub value: f64,
}

/// A value and its percentage of the column total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub name: String,
    pub value: f64,
    pub percent: f64,
}

/// Row × column count table; `counts[i][j]` belongs to `rows[i]` and `columns[j]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossTab {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn get(&self, row: &str, column: &str) -> Option<usize> {
        let i = self.rows.iter().position(|r| r == row)?;
        let j = self.columns.iter().position(|c| c == column)?;
        Some(self.counts[i][j])
    }
}

/// Every aggregate the dashboard shows, computed in one pass over the model
#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub projects_per_borough: Vec<CategoryCount>,
    pub project_types: Vec<CategoryShare>,
    pub construction_types_by_borough: CrossTab,
    pub construction_starts_per_month: Vec<CategoryCount>,
    pub normalized_award_by_borough: Vec<CategoryValue>,
    pub collisions_per_borough: Vec<CategoryCount>,
    pub casualties_by_borough: Vec<BoroughCasualties>,
    pub fatalities_by_borough: Vec<CategoryShare>,
    pub contributing_factors: Vec<CategoryCount>,
    pub traffic_volume_heatmap: VolumeHeatmap,
    pub average_volume_per_hour: Vec<HourlyVolume>,
    pub average_volume_by_borough: Vec<CategoryValue>,
}

pub fn dashboard_overview(datasets: &Datasets) -> DashboardOverview {
    let construction = &datasets.construction;
    let collisions = &datasets.collisions;
    let traffic = &datasets.traffic;

    DashboardOverview {
        projects_per_borough: projects_per_borough(construction),
        project_types: project_type_distribution(construction),
        construction_types_by_borough: construction_types_by_borough(construction),
        construction_starts_per_month: construction_starts_per_month(construction),
        normalized_award_by_borough: normalized_award_by_borough(construction),
        collisions_per_borough: collisions_per_borough(collisions),
        casualties_by_borough: casualties_by_borough(collisions),
        fatalities_by_borough: fatalities_by_borough(collisions),
        contributing_factors: contributing_factor_frequencies(collisions),
        traffic_volume_heatmap: traffic_volume_heatmap(traffic),
        average_volume_per_hour: average_volume_per_hour(traffic),
        average_volume_by_borough: average_volume_by_borough(traffic),
    }
}

fn ranked<K: Into<String>>(counts: HashMap<K, usize>) -> Vec<CategoryCount> {
    let mut rows: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(name, count)| CategoryCount {
            name: name.into(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    rows
}

fn with_percent(values: Vec<(String, f64)>) -> Vec<CategoryShare> {
    let total: f64 = values.iter().map(|(_, value)| value).sum();
    values
        .into_iter()
        .map(|(name, value)| CategoryShare {
            name,
            value,
            percent: if total > 0.0 { value / total * 100.0 } else { 0.0 },
        })
        .collect()
}
