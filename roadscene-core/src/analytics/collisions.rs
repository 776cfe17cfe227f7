use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use super::{CategoryCount, CategoryShare, UNKNOWN_BOROUGH, ranked, with_percent};
use crate::model::{CasualtyCounts, CollisionReport};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoroughCasualties {
    pub borough: String,
    #[serde(flatten)]
    pub counts: CasualtyCounts,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreetCollisions {
    pub street: String,
    pub count: usize,
}

fn borough(report: &CollisionReport) -> &str {
    report.borough.as_deref().unwrap_or(UNKNOWN_BOROUGH)
}

pub fn collisions_per_borough(reports: &[CollisionReport]) -> Vec<CategoryCount> {
    ranked(reports.iter().map(borough).counts())
}

/// All eight casualty columns summed per borough, sorted by borough name
pub fn casualties_by_borough(reports: &[CollisionReport]) -> Vec<BoroughCasualties> {
    let mut sums: BTreeMap<&str, CasualtyCounts> = BTreeMap::new();
    for report in reports {
        *sums.entry(borough(report)).or_default() += report.casualties;
    }
    sums.into_iter()
        .map(|(borough, counts)| BoroughCasualties {
            borough: borough.to_string(),
            counts,
            total: counts.total(),
        })
        .collect()
}

/// Persons killed per borough with each borough's share of all fatalities
pub fn fatalities_by_borough(reports: &[CollisionReport]) -> Vec<CategoryShare> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for report in reports {
        *sums.entry(borough(report)).or_default() += report.casualties.persons_killed;
    }
    with_percent(
        sums.into_iter()
            .map(|(borough, killed)| (borough.to_string(), killed))
            .collect(),
    )
}

/// Contributing factor phrases of collisions that list a factor for both
/// vehicles, most frequent first
pub fn contributing_factor_frequencies(reports: &[CollisionReport]) -> Vec<CategoryCount> {
    ranked(
        reports
            .iter()
            .filter_map(|r| {
                Some([
                    r.contributing_factor_1.as_deref()?,
                    r.contributing_factor_2.as_deref()?,
                ])
            })
            .flatten()
            .counts(),
    )
}

/// Collisions whose on-street or off-street name contains `street`,
/// ignoring case. A blank query matches nothing.
pub fn street_collision_count(reports: &[CollisionReport], street: &str) -> StreetCollisions {
    let needle = street.trim().to_lowercase();
    let count = if needle.is_empty() {
        0
    } else {
        reports
            .iter()
            .filter(|r| {
                [&r.on_street_name, &r.off_street_name]
                    .into_iter()
                    .flatten()
                    .any(|name| name.to_lowercase().contains(&needle))
            })
            .count()
    };
    StreetCollisions {
        street: street.trim().to_string(),
        count,
    }
}
