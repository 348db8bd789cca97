//! Wire format of the live detection channel.
//!
//! The channel delivers newline-delimited JSON objects tagged by `type`.
//! Only detection frames are translated into events; every other shape is
//! ignored by design.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::entity_store::{CollectionType, EventKind, SecurityEvent, Severity};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelMessage {
    Detection(DetectionPayload),
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
pub struct DetectionPayload {
    pub label: String,
    /// Model confidence in [0, 1].
    pub confidence: f64,
    pub camera_id: String,
}

impl DetectionPayload {
    /// Shapes a detection frame into the event record the dashboard
    /// shows: medium severity, unreviewed, freshly minted id.
    pub fn into_event(self, now: DateTime<Utc>) -> SecurityEvent {
        let kind = if self.label == "person" {
            EventKind::Person
        } else {
            EventKind::Vehicle
        };
        SecurityEvent {
            id: format!("{}-{}", SecurityEvent::ID_PREFIX, Uuid::new_v4()),
            kind,
            severity: Severity::Medium,
            timestamp: now,
            camera_name: format!("Camera {}", self.camera_id),
            description: format!(
                "{} detected with {:.0}% confidence",
                self.label,
                self.confidence * 100.0
            ),
            thumbnail: String::new(),
            is_reviewed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_frames_decode() {
        let raw = r#"{"type":"detection","label":"person","confidence":0.8,"camera_id":"c1"}"#;
        let message: ChannelMessage = serde_json::from_str(raw).unwrap();

        let ChannelMessage::Detection(payload) = message else {
            panic!("expected a detection");
        };
        assert_eq!(payload.label, "person");
        assert_eq!(payload.camera_id, "c1");
    }

    #[test]
    fn unknown_tags_decode_as_unsupported() {
        let raw = r#"{"type":"heartbeat","uptime":12}"#;
        let message: ChannelMessage = serde_json::from_str(raw).unwrap();
        assert!(matches!(message, ChannelMessage::Unsupported));
    }

    #[test]
    fn translated_event_carries_confidence_and_source() {
        let payload = DetectionPayload {
            label: "person".to_string(),
            confidence: 0.8,
            camera_id: "c1".to_string(),
        };
        let now = Utc::now();

        let event = payload.into_event(now);

        assert_eq!(event.kind, EventKind::Person);
        assert_eq!(event.severity, Severity::Medium);
        assert_eq!(event.camera_name, "Camera c1");
        assert_eq!(event.description, "person detected with 80% confidence");
        assert!(!event.is_reviewed);
        assert!(event.id.starts_with("evt-"));
        assert_eq!(event.timestamp, now);
    }

    #[test]
    fn non_person_labels_map_to_vehicle() {
        let payload = DetectionPayload {
            label: "truck".to_string(),
            confidence: 0.55,
            camera_id: "c2".to_string(),
        };

        let event = payload.into_event(Utc::now());

        assert_eq!(event.kind, EventKind::Vehicle);
        assert_eq!(event.description, "truck detected with 55% confidence");
    }
}
