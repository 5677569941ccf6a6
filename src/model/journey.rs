use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::enums::{ArrivalBoardingActivity, CallStatus, DepartureBoardingActivity, ProgressRate};
use super::text::NaturalLanguageString;
use crate::serde_helpers::{lenient, lenient_required, one_or_many, timestamp};

/// A journey together with the vehicle's latest position on it.
///
/// Shared by `VehicleActivity` and `MonitoredStopVisit`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MonitoredVehicleJourney {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framed_vehicle_journey_ref: Option<FramedVehicleJourneyRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journey_pattern_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_line_name: Option<NaturalLanguageString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_name: Option<NaturalLanguageString>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub situation_ref: Option<Vec<SituationRef>>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub monitored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_location: Option<VehicleLocation>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub bearing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_rate: Option<ProgressRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitored_call: Option<Call>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onward_calls: Option<Call>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FramedVehicleJourneyRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_frame_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dated_vehicle_journey_ref: Option<String>,
}

/// Reference to a situation affecting the journey.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SituationRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub situation_simple_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub situation_full_ref: Option<SituationFullRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SituationFullRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub situation_number: Option<String>,
}

impl fmt::Display for SituationFullRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.participant_ref, &self.situation_number) {
            (Some(participant), Some(number)) => write!(f, "{participant}:{number}"),
            (Some(only), None) | (None, Some(only)) => f.write_str(only),
            (None, None) => Ok(()),
        }
    }
}

/// WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VehicleLocation {
    #[serde(deserialize_with = "lenient_required")]
    pub longitude: f64,
    #[serde(deserialize_with = "lenient_required")]
    pub latitude: f64,
}

/// Arrival and departure detail at one stop, used both for `MonitoredCall` and
/// for `OnwardCalls`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Call {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_point_ref: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub visit_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_point_name: Option<NaturalLanguageString>,
    #[serde(
        default,
        deserialize_with = "timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub aimed_arrival_time: Option<DateTime<FixedOffset>>,
    #[serde(
        default,
        deserialize_with = "timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub aimed_departure_time: Option<DateTime<FixedOffset>>,
    /// ISO-8601 duration, e.g. `PT10M`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aimed_headway_interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_boarding_activity: Option<ArrivalBoardingActivity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_platform_name: Option<NaturalLanguageString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_status: Option<CallStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_boarding_activity: Option<DepartureBoardingActivity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_platform_name: Option<NaturalLanguageString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_status: Option<CallStatus>,
    #[serde(
        default,
        deserialize_with = "timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_arrival_time: Option<DateTime<FixedOffset>>,
    #[serde(
        default,
        deserialize_with = "timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_departure_time: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_headway_interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<CallExtensions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallExtensions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distances: Option<Distances>,
}

/// Distance of the vehicle from the call, as published by MTA Bus Time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Distances {
    /// Rider-facing text such as `approaching` or `2 stops away`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentable_distance: Option<String>,
    /// Meters.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub distance_from_call: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub stops_from_call: Option<u32>,
    /// Meters.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub call_distance_along_route: Option<f64>,
}
