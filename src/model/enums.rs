//! SIRI enumerations, decoded and printed by their wire strings.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// How the vehicle is progressing against its schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ProgressRate {
    NoProgress,
    SlowProgress,
    NormalProgress,
    FastProgress,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ArrivalBoardingActivity {
    Alighting,
    NoAlighting,
    PassThru,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum DepartureBoardingActivity {
    Boarding,
    NoBoarding,
    PassThru,
}

/// Arrival or departure status of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum CallStatus {
    OnTime,
    Early,
    Delayed,
    Cancelled,
    Arrived,
    Departed,
    Missed,
    NoReport,
    NotExpected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Severity {
    Unknown,
    VerySlight,
    Slight,
    Normal,
    Severe,
    VerySevere,
    NoImpact,
    Undefined,
}

/// Effect of a situation on the service, carried by a `Consequence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ServiceCondition {
    Unknown,
    Altered,
    Cancelled,
    Delayed,
    Diverted,
    NoService,
    Disrupted,
    AdditionalService,
    SpecialService,
    OnTime,
    NormalService,
    IntermittentService,
    ShortFormedService,
    FullLengthService,
    ExtendedService,
    SplittingTrain,
    ReplacementTransport,
    ArrivesEarly,
    ShuttleService,
    ReplacementService,
    Undefined,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;
    use serde_json::Value;
    use strum::IntoEnumIterator;

    fn assert_wire_matches_display<E>()
    where
        E: IntoEnumIterator + Serialize + DeserializeOwned + std::fmt::Display + PartialEq + std::fmt::Debug,
    {
        for variant in E::iter() {
            let wire = serde_json::to_value(&variant).unwrap();
            assert_eq!(wire, Value::String(variant.to_string()));
            let back: E = serde_json::from_value(wire).unwrap();
            assert_eq!(back, variant);
        }
    }

    #[test]
    fn test_wire_strings_match_display() {
        assert_wire_matches_display::<ProgressRate>();
        assert_wire_matches_display::<ArrivalBoardingActivity>();
        assert_wire_matches_display::<DepartureBoardingActivity>();
        assert_wire_matches_display::<CallStatus>();
        assert_wire_matches_display::<Severity>();
        assert_wire_matches_display::<ServiceCondition>();
    }

    #[test]
    fn test_decodes_by_text_not_position() {
        let rate: ProgressRate = serde_json::from_value("normalProgress".into()).unwrap();
        assert_eq!(rate, ProgressRate::NormalProgress);

        let status: CallStatus = serde_json::from_value("noReport".into()).unwrap();
        assert_eq!(status, CallStatus::NoReport);
    }

    #[test]
    fn test_unknown_text_is_rejected() {
        assert!(serde_json::from_value::<Severity>("catastrophic".into()).is_err());
        assert!(serde_json::from_value::<ProgressRate>(Value::from(2)).is_err());
    }
}
