use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y%m%d"];

/// Empty or unparseable cells become `None` instead of failing the row
pub(super) fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_lenient_f64(&raw))
}

pub(super) fn parse_lenient_f64(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parse the timestamp spellings found in the NYC open data exports
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Trimmed text, `None` when empty
pub(super) fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Borough names; `"0"` is the placeholder the exports use for "unknown"
pub(super) fn normalize_borough(raw: &str) -> Option<String> {
    non_empty(raw).filter(|borough| !is_placeholder_borough(borough))
}

/// Collision and construction rows carrying this placeholder are not kept at all
pub(super) fn is_placeholder_borough(raw: &str) -> bool {
    raw.trim() == "0"
}
