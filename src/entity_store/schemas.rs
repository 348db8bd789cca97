//! Record types for each persisted collection, with the serde layout the
//! dashboard stores and serves: camelCase field names, lowercase enum
//! tokens, RFC 3339 timestamps.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CollectionType;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    Online,
    Offline,
    Maintenance,
}

/// One configured feed. Created on registration, replaced wholesale on
/// change; there is no partial-field update.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub id: String,
    pub name: String,
    pub location: String,
    pub status: CameraStatus,
    /// Reference to the current frame used by the tile views.
    pub thumbnail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtsp_url: Option<String>,
    pub fps: u32,
    pub resolution: String,
    pub is_recording: bool,
}

impl CollectionType for Camera {
    const COLLECTION_KEY: &'static str = "sentinel_cameras";
    const ID_PREFIX: &'static str = "c";

    fn record_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Motion,
    Person,
    Vehicle,
    Face,
    Theft,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Append-only detection log entry. Stored in insertion order; the
/// accessor re-sorts newest-first for display only.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub camera_name: String,
    pub description: String,
    pub thumbnail: String,
    pub is_reviewed: bool,
}

impl CollectionType for SecurityEvent {
    const COLLECTION_KEY: &'static str = "sentinel_events";
    const ID_PREFIX: &'static str = "evt";

    fn record_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PersonKind {
    Known,
    Employee,
    Banned,
    Vip,
}

/// Face-ID roster entry. Confidence stays 0.0 until first matched.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PersonKind,
    pub last_seen: DateTime<Utc>,
    pub confidence: f64,
    pub thumbnail: String,
}

impl CollectionType for Person {
    const COLLECTION_KEY: &'static str = "sentinel_faces";
    const ID_PREFIX: &'static str = "p";

    fn record_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelCategory {
    Person,
    Object,
    Vehicle,
}

impl Display for ModelCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Person => write!(f, "person"),
            Self::Object => write!(f, "object"),
            Self::Vehicle => write!(f, "vehicle"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrainingDataType {
    Image,
    Video,
}

/// User-supplied reference sample for the training gallery.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingModel {
    pub id: String,
    pub label: String,
    pub category: ModelCategory,
    pub data_type: TrainingDataType,
    /// Encoded reference payload or URL; treated as opaque here.
    pub data_url: String,
    pub description: String,
    pub date_added: DateTime<Utc>,
}

impl CollectionType for TrainingModel {
    const COLLECTION_KEY: &'static str = "sentinel_training_data";
    const ID_PREFIX: &'static str = "tm";

    fn record_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Resolved,
}

/// Seed-only at runtime: listed by the dashboard, never mutated here.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TheftAlert {
    pub id: String,
    pub item: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
    pub status: AlertStatus,
    pub thumbnail: String,
}

impl CollectionType for TheftAlert {
    const COLLECTION_KEY: &'static str = "sentinel_alerts";
    const ID_PREFIX: &'static str = "t";

    fn record_id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_serializes_with_stored_field_names() {
        let camera = Camera {
            id: "c1".to_string(),
            name: "Front Entrance".to_string(),
            location: "Main Lobby".to_string(),
            status: CameraStatus::Online,
            thumbnail: String::new(),
            rtsp_url: Some("rtsp://example/stream1".to_string()),
            fps: 30,
            resolution: "4K".to_string(),
            is_recording: true,
        };

        let value = serde_json::to_value(&camera).unwrap();
        assert_eq!(value["status"], "online");
        assert_eq!(value["rtspUrl"], "rtsp://example/stream1");
        assert_eq!(value["isRecording"], true);
    }

    #[test]
    fn event_kind_field_round_trips_as_type() {
        let raw = r#"{
            "id": "e9",
            "type": "theft",
            "severity": "critical",
            "timestamp": "2026-08-08T10:00:00Z",
            "cameraName": "Cash Register 1",
            "description": "Object removed from counter without scan",
            "thumbnail": "",
            "isReviewed": false
        }"#;

        let event: SecurityEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.kind, EventKind::Theft);
        assert_eq!(event.severity, Severity::Critical);

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "theft");
        assert_eq!(value["cameraName"], "Cash Register 1");
    }

    #[test]
    fn person_kind_uses_lowercase_tokens() {
        let person = Person {
            id: "p7".to_string(),
            name: "John Doe".to_string(),
            kind: PersonKind::Banned,
            last_seen: Utc::now(),
            confidence: 0.0,
            thumbnail: String::new(),
        };

        let value = serde_json::to_value(&person).unwrap();
        assert_eq!(value["type"], "banned");
        assert_eq!(value["lastSeen"], serde_json::to_value(person.last_seen).unwrap());
    }
}
