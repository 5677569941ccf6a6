//! Report rendering for decoded SIRI documents.
//!
//! The text report walks the document depth first and prints one `Label: value`
//! line per field between dashed section banners. Absent values inside a present
//! group print as `null`; absent groups and lists are skipped.

use std::fmt::Display;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::model::{
    Call, Distances, MonitoredVehicleJourney, PtSituationElement, ServiceDelivery,
    SituationExchangeDelivery, Siri, StopMonitoringDelivery, VehicleMonitoringDelivery,
};

const SERVICE_DELIVERY: &str = "-               Service Delivery:                   -";
const VEHICLE_MONITORING_DELIVERY: &str = "-      Vehicle Monitoring Delivery:      -";
const STOP_MONITORING_DELIVERY: &str = "-        Stop Monitoring Delivery:       -";
const SITUATION_EXCHANGE_DELIVERY: &str = "-    Situation Exchange Delivery:        -";
const VEHICLE_ACTIVITY: &str = "-   Vehicle Activity:  -";
const MONITORED_STOP_VISIT: &str = "-   Monitored Stop Visit:  -";
const SITUATION_REF: &str = "- Situation Ref: -";
const SITUATION_REF_END: usize = 16;
const PT_SITUATION_ELEMENT: &str = "-     PtSituationElement:  -";
const AFFECTED_VEHICLE_JOURNEY: &str = "- AffectedVehicleJourney: -";
const PT_CONSEQUENCES: &str = "-    PtConsequences: -";

/// Accumulates report lines.
#[derive(Debug, Default)]
struct Report {
    lines: Vec<String>,
}

impl Report {
    fn rule(&mut self, width: usize) {
        self.lines.push("-".repeat(width));
    }

    /// Title framed by rules of the same width.
    fn banner(&mut self, title: &str) {
        self.rule(title.len());
        self.lines.push(title.to_string());
        self.rule(title.len());
    }

    fn field<T: Display>(&mut self, label: &str, value: Option<T>) {
        match value {
            Some(value) => self.lines.push(format!("{label}: {value}")),
            None => self.lines.push(format!("{label}: null")),
        }
    }

    fn time(&mut self, label: &str, value: Option<&DateTime<FixedOffset>>) {
        self.field(label, value.map(DateTime::to_rfc3339));
    }

    fn service_delivery(&mut self, delivery: &ServiceDelivery) {
        self.banner(SERVICE_DELIVERY);
        self.time("ResponseTimestamp", Some(&delivery.response_timestamp));

        self.banner(VEHICLE_MONITORING_DELIVERY);
        for vmd in delivery.vehicle_monitoring_delivery.iter().flatten() {
            self.vehicle_monitoring_delivery(vmd);
        }
        self.rule(VEHICLE_MONITORING_DELIVERY.len());

        self.banner(STOP_MONITORING_DELIVERY);
        for smd in delivery.stop_monitoring_delivery.iter().flatten() {
            self.stop_monitoring_delivery(smd);
        }
        self.rule(STOP_MONITORING_DELIVERY.len());

        self.banner(SITUATION_EXCHANGE_DELIVERY);
        for sed in delivery.situation_exchange_delivery.iter().flatten() {
            self.situation_exchange_delivery(sed);
        }
        self.rule(SITUATION_EXCHANGE_DELIVERY.len());
    }

    fn vehicle_monitoring_delivery(&mut self, delivery: &VehicleMonitoringDelivery) {
        for activity in delivery.vehicle_activity.iter().flatten() {
            self.banner(VEHICLE_ACTIVITY);
            self.journey(&activity.monitored_vehicle_journey);
            self.time("RecordedAtTime", Some(&activity.recorded_at_time));
            self.rule(VEHICLE_ACTIVITY.len());
        }
        self.time("ResponseTimestamp", Some(&delivery.response_timestamp));
        self.time("ValidUntil", delivery.valid_until.as_ref());
    }

    fn stop_monitoring_delivery(&mut self, delivery: &StopMonitoringDelivery) {
        for visit in delivery.monitored_stop_visit.iter().flatten() {
            self.banner(MONITORED_STOP_VISIT);
            self.journey(&visit.monitored_vehicle_journey);
            self.time("RecordedAtTime", Some(&visit.recorded_at_time));
            // Visits close with the same rule width as vehicle activities.
            self.rule(VEHICLE_ACTIVITY.len());
        }
        self.time("ResponseTimestamp", Some(&delivery.response_timestamp));
        self.time("ValidUntil", delivery.valid_until.as_ref());
    }

    fn journey(&mut self, journey: &MonitoredVehicleJourney) {
        self.field("LineRef", journey.line_ref.as_ref());
        self.field("DirectionRef", journey.direction_ref.as_ref());
        if let Some(framed) = &journey.framed_vehicle_journey_ref {
            self.field(
                "FramedVehicleJourneyRef.DataFrameRef",
                framed.data_frame_ref.as_ref(),
            );
            self.field(
                "FramedVehicleJourneyRef.DatedVehicleJourneyRef",
                framed.dated_vehicle_journey_ref.as_ref(),
            );
        }
        self.field("JourneyPatternRef", journey.journey_pattern_ref.as_ref());
        self.field("PublishedLineName", journey.published_line_name.as_ref());
        self.field("OperatorRef", journey.operator_ref.as_ref());
        self.field("OriginRef", journey.origin_ref.as_ref());
        self.field("DestinationRef", journey.destination_ref.as_ref());
        self.field("DestinationName", journey.destination_name.as_ref());

        if let Some(refs) = &journey.situation_ref {
            self.banner(SITUATION_REF);
            for situation in refs {
                self.field("SituationRef", situation.situation_simple_ref.as_ref());
                self.field("SituationRef.FullRef", situation.situation_full_ref.as_ref());
            }
            self.rule(SITUATION_REF_END);
        }

        self.field("Monitored", journey.monitored);
        if let Some(location) = &journey.vehicle_location {
            self.field("VehicleLocation.Longitude", Some(location.longitude));
            self.field("VehicleLocation.Latitude", Some(location.latitude));
        }
        self.field("Bearing", journey.bearing);
        self.field("ProgressRate", journey.progress_rate);
        self.field("ProgressStatus", journey.progress_status.as_ref());
        self.field("BlockRef", journey.block_ref.as_ref());
        self.field("VehicleRef", journey.vehicle_ref.as_ref());

        if let Some(call) = &journey.monitored_call {
            self.monitored_call(call);
        }
        if let Some(call) = &journey.onward_calls {
            self.onward_calls(call);
        }
    }

    fn monitored_call(&mut self, call: &Call) {
        if let Some(distances) = call.extensions.as_ref().and_then(|e| e.distances.as_ref()) {
            self.distances("MonitoredCall", distances);
        }
        self.field("MonitoredCall.StopPointRef", call.stop_point_ref.as_ref());
        self.field("MonitoredCall.VisitNumber", call.visit_number);
        self.field("MonitoredCall.StopPointName", call.stop_point_name.as_ref());
    }

    fn onward_calls(&mut self, call: &Call) {
        self.time("OnwardCalls.AimedArrivalTime", call.aimed_arrival_time.as_ref());
        self.time("OnwardCalls.AimedDepartureTime", call.aimed_departure_time.as_ref());
        self.field(
            "OnwardCalls.AimedHeadwayInterval",
            call.aimed_headway_interval.as_ref(),
        );
        self.field(
            "OnwardCalls.ArrivalBoardingActivity",
            call.arrival_boarding_activity,
        );
        self.field(
            "OnwardCalls.ArrivalPlatformName",
            call.arrival_platform_name.as_ref(),
        );
        self.field("OnwardCalls.ArrivalStatus", call.arrival_status);
        self.field(
            "OnwardCalls.DepartureBoardingActivity",
            call.departure_boarding_activity,
        );
        self.field(
            "OnwardCalls.DeparturePlatformName",
            call.departure_platform_name.as_ref(),
        );
        self.field("OnwardCalls.DepartureStatus", call.departure_status);
        self.time("OnwardCalls.ExpectedArrivalTime", call.expected_arrival_time.as_ref());
        self.time(
            "OnwardCalls.ExpectedDepartureTime",
            call.expected_departure_time.as_ref(),
        );
        self.field(
            "OnwardCalls.ExpectedHeadwayInterval",
            call.expected_headway_interval.as_ref(),
        );
        if let Some(distances) = call.extensions.as_ref().and_then(|e| e.distances.as_ref()) {
            self.distances("OnwardCalls", distances);
        }
    }

    fn distances(&mut self, prefix: &str, distances: &Distances) {
        self.field(
            &format!("{prefix}.Extensions.Distances.PresentableDistance"),
            distances.presentable_distance.as_ref(),
        );
        self.field(
            &format!("{prefix}.Extensions.Distances.DistanceFromCall"),
            distances.distance_from_call,
        );
        self.field(
            &format!("{prefix}.Extensions.Distances.StopsFromCall"),
            distances.stops_from_call,
        );
        self.field(
            &format!("{prefix}.Extensions.Distances.CallDistanceAlongRoute"),
            distances.call_distance_along_route,
        );
    }

    fn situation_exchange_delivery(&mut self, delivery: &SituationExchangeDelivery) {
        let Some(elements) = delivery
            .situations
            .as_ref()
            .and_then(|s| s.pt_situation_element.as_ref())
        else {
            return;
        };

        self.banner(PT_SITUATION_ELEMENT);
        for element in elements {
            self.situation_element(element);
        }
        self.rule(PT_SITUATION_ELEMENT.len());
    }

    fn situation_element(&mut self, element: &PtSituationElement) {
        if let Some(window) = &element.publication_window {
            self.time(
                "PtSituationElement.PublicationWindow.StartTime",
                Some(&window.start_time),
            );
            self.time(
                "PtSituationElement.PublicationWindow.EndTime",
                window.end_time.as_ref(),
            );
        }
        self.field("PtSituationElement.Severity", element.severity);
        self.field("PtSituationElement.Summary", element.summary.as_ref());
        self.field("PtSituationElement.Description", element.description.as_ref());

        let affected = element
            .affects
            .as_ref()
            .and_then(|a| a.vehicle_journeys.as_ref())
            .and_then(|v| v.affected_vehicle_journey.as_ref());
        if let Some(journeys) = affected {
            for journey in journeys {
                self.banner(AFFECTED_VEHICLE_JOURNEY);
                self.field("LineRef", journey.line_ref.as_ref());
                self.field("DirectionRef", journey.direction_ref.as_ref());
            }
            self.rule(AFFECTED_VEHICLE_JOURNEY.len());
        }

        if let Some(consequences) = element
            .consequences
            .as_ref()
            .and_then(|c| c.consequence.as_ref())
        {
            for consequence in consequences {
                self.banner(PT_CONSEQUENCES);
                self.field("Condition", consequence.condition);
            }
            self.rule(PT_CONSEQUENCES.len());
        }

        self.field(
            "PtSituationElement.SituationNumber",
            element.situation_number.as_ref(),
        );
    }
}

/// Renders the text report for `siri`, one entry per line.
#[tracing::instrument(skip(siri))]
pub fn report_lines(siri: &Siri) -> Vec<String> {
    let mut report = Report::default();
    report.service_delivery(&siri.service_delivery);
    debug!(lines = report.lines.len(), "Report rendered");
    report.lines
}

/// Writes the text report for `siri` to `out`.
pub fn write_report<W: Write>(siri: &Siri, out: &mut W) -> Result<()> {
    for line in report_lines(siri) {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

/// Writes `siri` as pretty-printed JSON, in the model's wire names.
pub fn write_json<W: Write>(siri: &Siri, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, siri)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;
    use crate::parser::parse_siri;
    use pretty_assertions::assert_eq;

    const MINIMAL_VM_XML: &str = r#"<Siri xmlns="http://www.siri.org.uk/siri">
      <ServiceDelivery>
        <ResponseTimestamp>2012-09-12T09:28:47.766-04:00</ResponseTimestamp>
        <VehicleMonitoringDelivery>
          <ResponseTimestamp>2012-09-12T09:28:47.766-04:00</ResponseTimestamp>
          <VehicleActivity>
            <MonitoredVehicleJourney>
              <LineRef>M15</LineRef>
              <DirectionRef>0</DirectionRef>
              <Monitored>true</Monitored>
            </MonitoredVehicleJourney>
            <RecordedAtTime>2012-09-12T09:28:37.000-04:00</RecordedAtTime>
          </VehicleActivity>
        </VehicleMonitoringDelivery>
      </ServiceDelivery>
    </Siri>"#;

    fn minimal() -> Siri {
        parse_siri(MINIMAL_VM_XML.as_bytes(), Format::Xml).unwrap()
    }

    fn position(lines: &[String], line: &str) -> usize {
        lines
            .iter()
            .position(|l| l == line)
            .unwrap_or_else(|| panic!("missing line {line:?}"))
    }

    #[test]
    fn test_banner_titles_match_rule_width() {
        for title in [
            VEHICLE_MONITORING_DELIVERY,
            STOP_MONITORING_DELIVERY,
            SITUATION_EXCHANGE_DELIVERY,
        ] {
            assert_eq!(title.len(), 42);
        }
        assert_eq!(SERVICE_DELIVERY.len(), 53);
        assert_eq!(VEHICLE_ACTIVITY.len(), 24);
        assert_eq!(MONITORED_STOP_VISIT.len(), 28);
        assert_eq!(SITUATION_REF.len(), 18);
        assert_eq!(PT_SITUATION_ELEMENT.len(), 28);
        assert_eq!(AFFECTED_VEHICLE_JOURNEY.len(), 27);
        assert_eq!(PT_CONSEQUENCES.len(), 22);
    }

    #[test]
    fn test_vehicle_activity_fields_in_order() {
        let lines = report_lines(&minimal());

        let banner = position(&lines, VEHICLE_ACTIVITY);
        let line_ref = position(&lines, "LineRef: M15");
        let direction = position(&lines, "DirectionRef: 0");
        let monitored = position(&lines, "Monitored: true");
        assert!(banner < line_ref);
        assert!(line_ref < direction);
        assert!(direction < monitored);
    }

    #[test]
    fn test_absent_monitored_call_is_skipped() {
        let lines = report_lines(&minimal());

        assert!(!lines.iter().any(|l| l.starts_with("MonitoredCall.")));
        assert!(!lines.iter().any(|l| l.starts_with("OnwardCalls.")));
        assert!(!lines.iter().any(|l| l.starts_with("VehicleLocation.")));
        assert!(lines.contains(&"VehicleRef: null".to_string()));
        assert!(lines.contains(&"RecordedAtTime: 2012-09-12T09:28:37-04:00".to_string()));
        assert!(lines.contains(&"ValidUntil: null".to_string()));
    }

    #[test]
    fn test_report_is_idempotent() {
        let siri = minimal();
        let mut first = Vec::new();
        let mut second = Vec::new();
        write_report(&siri, &mut first).unwrap();
        write_report(&siri, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_list_prints_banners_only() {
        let json = r#"{"Siri": {"ServiceDelivery": {
            "ResponseTimestamp": "2012-09-12T09:28:47-04:00",
            "SituationExchangeDelivery": [{
                "Situations": { "PtSituationElement": [] }
            }]
        }}}"#;
        let siri = parse_siri(json.as_bytes(), Format::Json).unwrap();
        let lines = report_lines(&siri);

        let start = position(&lines, SITUATION_EXCHANGE_DELIVERY);
        assert_eq!(
            &lines[start + 2..],
            &[
                "-".repeat(28),
                PT_SITUATION_ELEMENT.to_string(),
                "-".repeat(28),
                "-".repeat(28),
                "-".repeat(42),
            ]
        );
    }

    #[test]
    fn test_header_layout() {
        let lines = report_lines(&minimal());
        assert_eq!(
            &lines[..4],
            &[
                "-".repeat(53),
                SERVICE_DELIVERY.to_string(),
                "-".repeat(53),
                "ResponseTimestamp: 2012-09-12T09:28:47.766-04:00".to_string(),
            ]
        );
        assert!(lines.contains(&STOP_MONITORING_DELIVERY.to_string()));
        assert_eq!(lines.last().unwrap(), &"-".repeat(42));
    }

    #[test]
    fn test_situation_element_lines() {
        let xml = r#"<Siri><ServiceDelivery>
          <ResponseTimestamp>2012-09-12T09:28:47-04:00</ResponseTimestamp>
          <SituationExchangeDelivery>
            <Situations>
              <PtSituationElement>
                <PublicationWindow><StartTime>2012-09-12T00:00:00-04:00</StartTime></PublicationWindow>
                <Severity>undefined</Severity>
                <Summary xml:lang="EN">M15 detour</Summary>
                <Affects><VehicleJourneys>
                  <AffectedVehicleJourney><LineRef>MTA NYCT_M15</LineRef><DirectionRef>0</DirectionRef></AffectedVehicleJourney>
                  <AffectedVehicleJourney><LineRef>MTA NYCT_M15</LineRef><DirectionRef>1</DirectionRef></AffectedVehicleJourney>
                </VehicleJourneys></Affects>
                <Consequences><Consequence><Condition>diverted</Condition></Consequence></Consequences>
                <SituationNumber>MTA NYCT_7</SituationNumber>
              </PtSituationElement>
            </Situations>
          </SituationExchangeDelivery>
        </ServiceDelivery></Siri>"#;
        let siri = parse_siri(xml.as_bytes(), Format::Xml).unwrap();
        let lines = report_lines(&siri);

        assert!(lines.contains(
            &"PtSituationElement.PublicationWindow.StartTime: 2012-09-12T00:00:00-04:00".to_string()
        ));
        assert!(lines.contains(&"PtSituationElement.PublicationWindow.EndTime: null".to_string()));
        assert!(lines.contains(&"PtSituationElement.Severity: undefined".to_string()));
        assert!(lines.contains(&"PtSituationElement.Summary: [EN] M15 detour".to_string()));
        assert!(lines.contains(&"PtSituationElement.Description: null".to_string()));
        assert_eq!(lines.iter().filter(|l| *l == AFFECTED_VEHICLE_JOURNEY).count(), 2);
        assert!(lines.contains(&"Condition: diverted".to_string()));
        assert!(lines.contains(&"PtSituationElement.SituationNumber: MTA NYCT_7".to_string()));
    }

    #[test]
    fn test_write_json_uses_wire_names() {
        let mut out = Vec::new();
        write_json(&minimal(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"ServiceDelivery\""));
        assert!(text.contains("\"LineRef\": \"M15\""));
        assert!(!text.contains("OnwardCalls"));
    }
}
