//! Building map marker layers from the typed datasets

use std::collections::BTreeMap;

use geo::Point;
use log::debug;
use ordered_float::OrderedFloat;

use crate::model::{
    CollisionReport, ConstructionProject, Datasets, IncidentLayer, IncidentLayers, IncidentRecord,
    TrafficCount,
};

type LocationKey = (OrderedFloat<f64>, OrderedFloat<f64>);

fn location_key(point: &Point<f64>) -> LocationKey {
    (OrderedFloat(point.y()), OrderedFloat(point.x()))
}

/// Builds the three incident layers.
///
/// With `year` set, traffic counts and collisions outside that calendar year
/// are left out; construction projects are never filtered.
pub fn build_incident_layers(datasets: &Datasets, year: Option<i32>) -> IncidentLayers {
    let in_year = |record_year: Option<i32>| year.is_none_or(|y| record_year == Some(y));

    let traffic: Vec<&TrafficCount> = datasets
        .traffic
        .iter()
        .filter(|count| in_year(count.year()))
        .collect();
    let collisions: Vec<&CollisionReport> = datasets
        .collisions
        .iter()
        .filter(|report| in_year(report.year()))
        .collect();

    IncidentLayers {
        traffic: traffic_layer(&traffic),
        construction: construction_layer(&datasets.construction),
        collision: collision_layer(&collisions),
    }
}

/// One marker per counted road segment: the mean of its daily average volumes
#[allow(clippy::cast_precision_loss)]
pub fn traffic_layer(counts: &[&TrafficCount]) -> Vec<IncidentRecord> {
    struct Segment<'a> {
        location: Point<f64>,
        borough: Option<&'a str>,
        volume_sum: f64,
        rows: usize,
    }

    let mut segments: BTreeMap<(LocationKey, &str, &str, &str, &str), Segment<'_>> =
        BTreeMap::new();
    for count in counts {
        let key = (
            location_key(&count.location),
            count.roadway_name.as_str(),
            count.direction.as_str(),
            count.from_street.as_str(),
            count.to_street.as_str(),
        );
        let segment = segments.entry(key).or_insert_with(|| Segment {
            location: count.location,
            borough: None,
            volume_sum: 0.0,
            rows: 0,
        });
        segment.volume_sum += count.average_volume();
        segment.rows += 1;
        if segment.borough.is_none() {
            segment.borough = count.borough.as_deref();
        }
    }

    segments
        .into_values()
        .map(|segment| IncidentRecord {
            layer: IncidentLayer::Traffic,
            borough: segment.borough.map(str::to_string),
            location: segment.location,
            metric: Some(segment.volume_sum / segment.rows as f64),
        })
        .collect()
}

/// One marker per project, carrying the award amount
pub fn construction_layer(projects: &[ConstructionProject]) -> Vec<IncidentRecord> {
    projects
        .iter()
        .map(|project| IncidentRecord {
            layer: IncidentLayer::Construction,
            borough: project.borough_name().map(str::to_string),
            location: project.location,
            metric: project.award,
        })
        .collect()
}

/// One marker per (borough, location): the per-category mean casualties summed
/// over persons, cyclists and motorists. Reports without a borough cannot be
/// grouped and are left out.
#[allow(clippy::cast_precision_loss)]
pub fn collision_layer(reports: &[&CollisionReport]) -> Vec<IncidentRecord> {
    let mut groups: BTreeMap<(&str, LocationKey), (Point<f64>, [f64; 6], usize)> = BTreeMap::new();
    let mut ungrouped = 0usize;

    for report in reports {
        let Some(borough) = report.borough.as_deref() else {
            ungrouped += 1;
            continue;
        };
        let (_, sums, rows) = groups
            .entry((borough, location_key(&report.location)))
            .or_insert((report.location, [0.0; 6], 0));
        for (sum, value) in sums.iter_mut().zip(report.casualties.layer_categories()) {
            *sum += value;
        }
        *rows += 1;
    }

    if ungrouped > 0 {
        debug!("{ungrouped} collisions without a borough left out of the collision layer");
    }

    groups
        .into_iter()
        .map(|((borough, _), (location, sums, rows))| IncidentRecord {
            layer: IncidentLayer::Collision,
            borough: Some(borough.to_string()),
            location,
            metric: Some(sums.iter().map(|sum| sum / rows as f64).sum()),
        })
        .collect()
}
