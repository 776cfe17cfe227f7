//! Geocoding outcomes, carried as data rather than as errors.
//!
//! Providers live outside the core (see the server crate); everything they
//! produce is normalised into a [`GeocodeResult`] so that downstream code can
//! refuse unresolved endpoints explicitly.

use std::fmt;

use geo::Point;

use crate::Error;

/// Why an address could not be turned into coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    EmptyAddress,
    NotFound,
    Timeout,
    Provider(String),
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAddress => write!(f, "empty address"),
            Self::NotFound => write!(f, "address not found"),
            Self::Timeout => write!(f, "geocoder timed out"),
            Self::Provider(message) => write!(f, "geocoder error: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeStatus {
    Resolved(Point<f64>),
    Unresolved(UnresolvedReason),
}

/// Outcome of geocoding a single free-text address
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub address: String,
    pub status: GeocodeStatus,
}

impl GeocodeResult {
    /// Builds a resolved result, downgrading invalid coordinates to
    /// [`UnresolvedReason::Provider`].
    pub fn resolved(address: impl Into<String>, lat: f64, lon: f64) -> Self {
        let status = if is_valid_coordinate(lat, lon) {
            GeocodeStatus::Resolved(Point::new(lon, lat))
        } else {
            GeocodeStatus::Unresolved(UnresolvedReason::Provider(format!(
                "invalid coordinates ({lat}, {lon})"
            )))
        };
        Self {
            address: address.into(),
            status,
        }
    }

    pub fn unresolved(address: impl Into<String>, reason: UnresolvedReason) -> Self {
        Self {
            address: address.into(),
            status: GeocodeStatus::Unresolved(reason),
        }
    }

    pub fn location(&self) -> Option<Point<f64>> {
        match self.status {
            GeocodeStatus::Resolved(point) => Some(point),
            GeocodeStatus::Unresolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.status, GeocodeStatus::Resolved(_))
    }

    /// Returns the coordinates or the user-facing "could not locate" error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvedAddress`] for any unresolved result.
    pub fn require_location(&self) -> Result<Point<f64>, Error> {
        self.location().ok_or_else(|| Error::UnresolvedAddress {
            address: self.address.clone(),
        })
    }
}

/// Whitespace-only input never reaches a provider
pub fn is_blank_address(address: &str) -> bool {
    address.trim().is_empty()
}

pub fn is_valid_coordinate(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}
