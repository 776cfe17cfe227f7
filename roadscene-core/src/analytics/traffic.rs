use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use super::CategoryValue;
use crate::loading::datasets::TRAFFIC_HOUR_COLUMNS;
use crate::model::TrafficCount;
use crate::model::datasets::HOURS_PER_DAY;

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Mean volume per weekday (rows, Monday first) and hour (columns)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeHeatmap {
    pub days: Vec<&'static str>,
    pub hours: Vec<usize>,
    /// `None` where no count was recorded
    pub values: Vec<Vec<Option<f64>>>,
}

impl VolumeHeatmap {
    pub fn get(&self, weekday: usize, hour: usize) -> Option<f64> {
        self.values.get(weekday)?.get(hour).copied().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyVolume {
    pub hour: usize,
    pub column: &'static str,
    pub mean: Option<f64>,
}

#[derive(Clone, Copy, Default)]
struct Mean {
    sum: f64,
    n: usize,
}

impl Mean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.n += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn value(self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }
}

/// Counts without a date are left out
pub fn traffic_volume_heatmap(counts: &[TrafficCount]) -> VolumeHeatmap {
    let mut cells = [[Mean::default(); HOURS_PER_DAY]; 7];
    for count in counts {
        let Some(date) = count.date else { continue };
        let day = date.weekday().num_days_from_monday() as usize;
        for (hour, volume) in count.hourly.iter().enumerate() {
            if let Some(volume) = volume {
                cells[day][hour].push(*volume);
            }
        }
    }

    VolumeHeatmap {
        days: WEEKDAYS.to_vec(),
        hours: (0..HOURS_PER_DAY).collect(),
        values: cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.value()).collect())
            .collect(),
    }
}

/// Mean of each hourly column over all counts that recorded it
pub fn average_volume_per_hour(counts: &[TrafficCount]) -> Vec<HourlyVolume> {
    let mut hours = [Mean::default(); HOURS_PER_DAY];
    for count in counts {
        for (mean, volume) in hours.iter_mut().zip(count.hourly) {
            if let Some(volume) = volume {
                mean.push(volume);
            }
        }
    }

    hours
        .into_iter()
        .zip(TRAFFIC_HOUR_COLUMNS)
        .enumerate()
        .map(|(hour, (mean, column))| HourlyVolume {
            hour,
            column,
            mean: mean.value(),
        })
        .collect()
}

/// Mean daily average volume per borough, sorted by name
pub fn average_volume_by_borough(counts: &[TrafficCount]) -> Vec<CategoryValue> {
    let mut boroughs: BTreeMap<&str, Mean> = BTreeMap::new();
    for count in counts {
        if let Some(borough) = count.borough.as_deref() {
            boroughs.entry(borough).or_default().push(count.average_volume());
        }
    }

    boroughs
        .into_iter()
        .filter_map(|(borough, mean)| {
            Some(CategoryValue {
                name: borough.to_string(),
                value: mean.value()?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use geo::Point;

    use super::*;

    /// 2022-01-03 is a Monday
    fn count(day: u32, borough: Option<&str>, hours: &[(usize, f64)]) -> TrafficCount {
        let mut hourly = [None; HOURS_PER_DAY];
        for &(hour, volume) in hours {
            hourly[hour] = Some(volume);
        }
        TrafficCount {
            date: NaiveDate::from_ymd_opt(2022, 1, day).and_then(|d| d.and_hms_opt(0, 0, 0)),
            location: Point::new(-73.98, 40.75),
            roadway_name: "BROADWAY".to_string(),
            direction: "NB".to_string(),
            from_street: "A".to_string(),
            to_street: "B".to_string(),
            borough: borough.map(str::to_string),
            hourly,
        }
    }

    #[test]
    fn heatmap_groups_by_weekday_and_hour() {
        let counts = [
            count(3, None, &[(8, 100.0), (9, 50.0)]),
            count(10, None, &[(8, 300.0)]),
            count(9, None, &[(23, 10.0)]),
        ];
        let heatmap = traffic_volume_heatmap(&counts);
        assert_eq!(heatmap.days[0], "Monday");
        assert_eq!(heatmap.get(0, 8), Some(200.0));
        assert_eq!(heatmap.get(0, 9), Some(50.0));
        assert_eq!(heatmap.get(6, 23), Some(10.0));
        assert_eq!(heatmap.get(1, 8), None);
    }

    #[test]
    fn hourly_means_skip_missing_values() {
        let counts = [count(3, None, &[(0, 10.0)]), count(4, None, &[(0, 30.0), (1, 5.0)])];
        let hourly = average_volume_per_hour(&counts);
        assert_eq!(hourly.len(), 24);
        assert_eq!(hourly[0].mean, Some(20.0));
        assert_eq!(hourly[0].column, "_12_00_1_00_am");
        assert_eq!(hourly[1].mean, Some(5.0));
        assert_eq!(hourly[2].mean, None);
    }

    #[test]
    fn borough_means_ignore_counts_without_borough() {
        let counts = [
            count(3, Some("Manhattan"), &[(0, 24.0)]),
            count(4, Some("Manhattan"), &[(0, 72.0)]),
            count(4, None, &[(0, 2400.0)]),
        ];
        let boroughs = average_volume_by_borough(&counts);
        assert_eq!(boroughs.len(), 1);
        assert_eq!(boroughs[0].value, 2.0);
    }
}
