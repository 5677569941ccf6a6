use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::journey::MonitoredVehicleJourney;
use super::situation::PtSituationElement;
use crate::serde_helpers::{one_or_many, timestamp, timestamp_required};

/// All deliveries returned by one feed request.
///
/// A delivery list is `None` when the feed did not include that kind of
/// delivery at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceDelivery {
    #[serde(deserialize_with = "timestamp_required")]
    pub response_timestamp: DateTime<FixedOffset>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub vehicle_monitoring_delivery: Option<Vec<VehicleMonitoringDelivery>>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub stop_monitoring_delivery: Option<Vec<StopMonitoringDelivery>>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub situation_exchange_delivery: Option<Vec<SituationExchangeDelivery>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VehicleMonitoringDelivery {
    #[serde(deserialize_with = "timestamp_required")]
    pub response_timestamp: DateTime<FixedOffset>,
    #[serde(
        default,
        deserialize_with = "timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub valid_until: Option<DateTime<FixedOffset>>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub vehicle_activity: Option<Vec<VehicleActivity>>,
}

/// Current state of one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VehicleActivity {
    #[serde(deserialize_with = "timestamp_required")]
    pub recorded_at_time: DateTime<FixedOffset>,
    pub monitored_vehicle_journey: MonitoredVehicleJourney,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StopMonitoringDelivery {
    #[serde(deserialize_with = "timestamp_required")]
    pub response_timestamp: DateTime<FixedOffset>,
    #[serde(
        default,
        deserialize_with = "timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub valid_until: Option<DateTime<FixedOffset>>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub monitored_stop_visit: Option<Vec<MonitoredStopVisit>>,
}

/// A vehicle's visit to the monitored stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MonitoredStopVisit {
    #[serde(deserialize_with = "timestamp_required")]
    pub recorded_at_time: DateTime<FixedOffset>,
    pub monitored_vehicle_journey: MonitoredVehicleJourney,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SituationExchangeDelivery {
    #[serde(
        default,
        deserialize_with = "timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub response_timestamp: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub situations: Option<Situations>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Situations {
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub pt_situation_element: Option<Vec<PtSituationElement>>,
}
