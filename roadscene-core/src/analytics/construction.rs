use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

use super::{CategoryCount, CategoryShare, CategoryValue, CrossTab, ranked, with_percent};
use crate::model::ConstructionProject;

/// Projects per registry borough; projects naming no borough are not counted
pub fn projects_per_borough(projects: &[ConstructionProject]) -> Vec<CategoryCount> {
    ranked(
        projects
            .iter()
            .filter_map(ConstructionProject::registry_borough)
            .counts(),
    )
}

/// Share of each construction type, largest first
#[allow(clippy::cast_precision_loss)]
pub fn project_type_distribution(projects: &[ConstructionProject]) -> Vec<CategoryShare> {
    let counts = ranked(
        projects
            .iter()
            .filter_map(|p| p.construction_type.as_deref())
            .counts(),
    );
    with_percent(
        counts
            .into_iter()
            .map(|c| (c.name, c.count as f64))
            .collect(),
    )
}

/// Borough × construction type counts, both axes sorted by name
pub fn construction_types_by_borough(projects: &[ConstructionProject]) -> CrossTab {
    let pairs: Vec<(&str, &str)> = projects
        .iter()
        .filter_map(|p| Some((p.registry_borough()?, p.construction_type.as_deref()?)))
        .collect();

    let rows: Vec<&str> = pairs
        .iter()
        .map(|(b, _)| *b)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let columns: Vec<&str> = pairs
        .iter()
        .map(|(_, t)| *t)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut counts = vec![vec![0usize; columns.len()]; rows.len()];
    for (borough, kind) in &pairs {
        // both searches succeed, the axes were built from `pairs`
        if let (Ok(i), Ok(j)) = (rows.binary_search(borough), columns.binary_search(kind)) {
            counts[i][j] += 1;
        }
    }

    CrossTab {
        rows: rows.into_iter().map(str::to_string).collect(),
        columns: columns.into_iter().map(str::to_string).collect(),
        counts,
    }
}

/// Projects per `YYYY-MM` of their `data_as_of` date, oldest month first
pub fn construction_starts_per_month(projects: &[ConstructionProject]) -> Vec<CategoryCount> {
    let mut months: BTreeMap<String, usize> = BTreeMap::new();
    for date in projects.iter().filter_map(|p| p.data_as_of) {
        *months.entry(date.format("%Y-%m").to_string()).or_default() += 1;
    }
    months
        .into_iter()
        .map(|(name, count)| CategoryCount { name, count })
        .collect()
}

/// Mean award per borough divided by the sum of all borough means.
/// Boroughs are sorted by name; projects without an award are ignored.
#[allow(clippy::cast_precision_loss)]
pub fn normalized_award_by_borough(projects: &[ConstructionProject]) -> Vec<CategoryValue> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for project in projects {
        if let (Some(borough), Some(award)) = (project.registry_borough(), project.award) {
            let (sum, n) = sums.entry(borough).or_default();
            *sum += award;
            *n += 1;
        }
    }

    let means: Vec<(&str, f64)> = sums
        .into_iter()
        .map(|(borough, (sum, n))| (borough, sum / n as f64))
        .collect();
    let total: f64 = means.iter().map(|(_, mean)| mean).sum();

    means
        .into_iter()
        .map(|(borough, mean)| CategoryValue {
            name: borough.to_string(),
            value: if total > 0.0 { mean / total } else { 0.0 },
        })
        .collect()
}
