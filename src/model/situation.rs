use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::enums::{ServiceCondition, Severity};
use super::text::NaturalLanguageString;
use crate::serde_helpers::{one_or_many, timestamp, timestamp_required};

/// One service alert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PtSituationElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_window: Option<PublicationWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<NaturalLanguageString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<NaturalLanguageString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affects: Option<Affects>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consequences: Option<Consequences>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub situation_number: Option<String>,
}

/// Half-open validity range of an alert; a missing end means "until further notice".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicationWindow {
    #[serde(deserialize_with = "timestamp_required")]
    pub start_time: DateTime<FixedOffset>,
    #[serde(
        default,
        deserialize_with = "timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Affects {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_journeys: Option<AffectedVehicleJourneys>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AffectedVehicleJourneys {
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub affected_vehicle_journey: Option<Vec<AffectedVehicleJourney>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AffectedVehicleJourney {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_ref: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Consequences {
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub consequence: Option<Vec<Consequence>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Consequence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ServiceCondition>,
}
