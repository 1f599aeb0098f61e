use crate::utils::error::{CareError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaccinationInput {
    pub breed: String,
    pub age_months: Option<u32>,
    pub last_vaccination_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccinationSchedule {
    pub next_due_in_days: u32,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionInput {
    pub breed: String,
    pub age_months: Option<f64>,
    pub weight_kg: Option<f64>,
    pub milk_yield_l_per_day: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionPlan {
    pub fodder_kg_per_day: f64,
    pub concentrate_kg_per_day: f64,
    pub supplements: String,
    pub notes: String,
}

impl NutritionPlan {
    pub fn fodder_display(&self) -> String {
        format!("{:.1}", self.fodder_kg_per_day)
    }

    pub fn concentrate_display(&self) -> String {
        format!("{:.1}", self.concentrate_kg_per_day)
    }
}

/// Combined output of both calculators for one animal. Either half may be
/// missing when its inputs are incomplete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarePlan {
    pub vaccination: Option<VaccinationSchedule>,
    pub nutrition: Option<NutritionPlan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CareError::InvalidCoordinate {
                latitude,
                longitude,
                reason: "latitude must be within [-90, 90]".to_string(),
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CareError::InvalidCoordinate {
                latitude,
                longitude,
                reason: "longitude must be within [-180, 180]".to_string(),
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Precision {
    DefaultFallback,
    IpApproximate,
    ManualGeocoded,
    GpsPrecise,
}

impl Precision {
    /// Confidence order used when an automatic stage asks to overwrite the
    /// current resolution.
    pub fn rank(self) -> u8 {
        match self {
            Precision::DefaultFallback => 0,
            Precision::IpApproximate => 1,
            Precision::ManualGeocoded => 2,
            Precision::GpsPrecise => 3,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Precision::DefaultFallback => "default",
            Precision::IpApproximate => "approximate (IP)",
            Precision::ManualGeocoded => "address",
            Precision::GpsPrecise => "precise (GPS)",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub coordinate: GeoCoordinate,
    pub label: String,
    pub precision: Precision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
    LocationNotFound,
}

impl FailureReason {
    /// Copy shown to the user. `fallback` is the last known label, if any; it is
    /// only named for reference since vet actions stay off until a new fix.
    pub fn user_message(self, fallback: Option<&str>) -> String {
        let base = match self {
            FailureReason::PermissionDenied => {
                "Location access was denied. Allow location access in your browser or device settings, or enter your address below."
            }
            FailureReason::PositionUnavailable => {
                "Your device could not determine its position. Try again outdoors or enter your address below."
            }
            FailureReason::Timeout => {
                "Getting your precise location took too long. Try again or enter your address below."
            }
            FailureReason::Unknown => {
                "Something went wrong while getting your location. Enter your address below instead."
            }
            FailureReason::LocationNotFound => {
                "We could not find that location. Check the spelling or try a nearby town."
            }
        };
        match fallback {
            Some(label) => format!(
                "{} Your last known location ({}) is shown for reference only.",
                base, label
            ),
            None => base.to_string(),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureReason::PermissionDenied => "permission-denied",
            FailureReason::PositionUnavailable => "position-unavailable",
            FailureReason::Timeout => "timeout",
            FailureReason::Unknown => "unknown",
            FailureReason::LocationNotFound => "location not found",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum LocationState {
    Unresolved,
    Resolving,
    Resolved(ResolvedLocation),
    Failed { reason: FailureReason },
}

impl LocationState {
    pub fn resolved(&self) -> Option<&ResolvedLocation> {
        match self {
            LocationState::Resolved(location) => Some(location),
            _ => None,
        }
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self, LocationState::Resolving)
    }
}

/// Options handed to the device geolocation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpsOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

impl GpsOptions {
    pub const PRECISE: GpsOptions = GpsOptions {
        high_accuracy: true,
        timeout: Duration::from_secs(10),
        maximum_age: Duration::from_secs(300),
    };
}

impl Default for GpsOptions {
    fn default() -> Self {
        Self::PRECISE
    }
}

/// Raw IP-geolocation answer. Coordinates are optional because providers omit
/// them for reserved or unknown addresses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    pub formatted_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DevicePosition {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("timed out")]
    Timeout,
    #[error("unknown geolocation error")]
    Unknown,
}

impl From<PositionError> for FailureReason {
    fn from(err: PositionError) -> Self {
        match err {
            PositionError::PermissionDenied => FailureReason::PermissionDenied,
            PositionError::PositionUnavailable => FailureReason::PositionUnavailable,
            PositionError::Timeout => FailureReason::Timeout,
            PositionError::Unknown => FailureReason::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_range_checks() {
        assert!(GeoCoordinate::new(12.9, 77.6).is_ok());
        assert!(GeoCoordinate::new(-90.0, 180.0).is_ok());
        assert!(GeoCoordinate::new(90.5, 0.0).is_err());
        assert!(GeoCoordinate::new(0.0, -180.5).is_err());
        assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_precision_rank_order() {
        assert!(Precision::DefaultFallback.rank() < Precision::IpApproximate.rank());
        assert!(Precision::IpApproximate.rank() < Precision::ManualGeocoded.rank());
        assert!(Precision::ManualGeocoded.rank() < Precision::GpsPrecise.rank());
    }

    #[test]
    fn test_gps_failure_messages_are_distinct() {
        let reasons = [
            FailureReason::PermissionDenied,
            FailureReason::PositionUnavailable,
            FailureReason::Timeout,
            FailureReason::Unknown,
        ];
        let messages: std::collections::HashSet<String> =
            reasons.iter().map(|r| r.user_message(None)).collect();
        assert_eq!(messages.len(), reasons.len());
    }

    #[test]
    fn test_failure_message_mentions_retained_location() {
        let message = FailureReason::PermissionDenied.user_message(Some("Bengaluru, KA"));
        assert!(message.contains("last known location (Bengaluru, KA)"));
        assert!(message.contains("for reference only"));
        assert!(!message.contains("still in use"));
    }

    #[test]
    fn test_gps_options_constants() {
        let options = GpsOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.maximum_age, Duration::from_secs(300));
    }

    #[test]
    fn test_location_state_serializes_with_status_tag() {
        let state = LocationState::Failed {
            reason: FailureReason::Timeout,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "timeout");
    }
}
