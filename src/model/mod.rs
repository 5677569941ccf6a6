//! Typed records for the subset of SIRI used by Vehicle Monitoring, Stop
//! Monitoring and Situation Exchange feeds.
//!
//! Wire names are PascalCase (`rename_all`), list fields accept a lone element
//! in place of a list, and absent optional values are omitted when encoding.

mod delivery;
mod enums;
mod journey;
mod situation;
mod text;

pub use delivery::{
    MonitoredStopVisit, ServiceDelivery, SituationExchangeDelivery, Situations,
    StopMonitoringDelivery, VehicleActivity, VehicleMonitoringDelivery,
};
pub use enums::{
    ArrivalBoardingActivity, CallStatus, DepartureBoardingActivity, ProgressRate,
    ServiceCondition, Severity,
};
pub use journey::{
    Call, CallExtensions, Distances, FramedVehicleJourneyRef, MonitoredVehicleJourney,
    SituationFullRef, SituationRef, VehicleLocation,
};
pub use situation::{
    AffectedVehicleJourney, AffectedVehicleJourneys, Affects, Consequence, Consequences,
    PtSituationElement, PublicationWindow,
};
pub use text::NaturalLanguageString;

use serde::{Deserialize, Serialize};

/// Root of a SIRI document, without its `Siri` wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Siri {
    pub service_delivery: ServiceDelivery,
}
