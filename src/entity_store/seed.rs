//! Default records written on first run. Pure builders: the reference
//! instant comes in as an argument so repeated boots with an existing
//! store never touch these.

use chrono::{DateTime, Duration, Utc};

use super::schemas::{
    AlertStatus, Camera, CameraStatus, EventKind, Person, PersonKind, SecurityEvent, Severity,
    TheftAlert,
};

pub fn default_cameras() -> Vec<Camera> {
    vec![
        Camera {
            id: "c1".to_string(),
            name: "Front Entrance".to_string(),
            location: "Main Lobby".to_string(),
            status: CameraStatus::Online,
            thumbnail: String::new(),
            rtsp_url: Some("mock-stream".to_string()),
            fps: 30,
            resolution: "4K".to_string(),
            is_recording: true,
        },
        Camera {
            id: "c2".to_string(),
            name: "Parking Lot A".to_string(),
            location: "Exterior North".to_string(),
            status: CameraStatus::Online,
            thumbnail: String::new(),
            rtsp_url: Some("mock-stream".to_string()),
            fps: 24,
            resolution: "1080p".to_string(),
            is_recording: true,
        },
        Camera {
            id: "c3".to_string(),
            name: "Warehouse Bay 4".to_string(),
            location: "Storage".to_string(),
            status: CameraStatus::Online,
            thumbnail: String::new(),
            rtsp_url: Some("mock-stream".to_string()),
            fps: 15,
            resolution: "1080p".to_string(),
            is_recording: false,
        },
    ]
}

pub fn default_events(now: DateTime<Utc>) -> Vec<SecurityEvent> {
    vec![
        SecurityEvent {
            id: "e1".to_string(),
            kind: EventKind::Person,
            severity: Severity::Medium,
            timestamp: now - Duration::minutes(5),
            camera_name: "Front Entrance".to_string(),
            description: "Unknown male loitering near door".to_string(),
            thumbnail: String::new(),
            is_reviewed: false,
        },
        SecurityEvent {
            id: "e2".to_string(),
            kind: EventKind::Theft,
            severity: Severity::Critical,
            timestamp: now - Duration::minutes(120),
            camera_name: "Cash Register 1".to_string(),
            description: "Object removed from counter without scan".to_string(),
            thumbnail: String::new(),
            is_reviewed: false,
        },
        SecurityEvent {
            id: "e3".to_string(),
            kind: EventKind::Vehicle,
            severity: Severity::Low,
            timestamp: now - Duration::minutes(200),
            camera_name: "Parking Lot A".to_string(),
            description: "Delivery truck arrival".to_string(),
            thumbnail: String::new(),
            is_reviewed: true,
        },
    ]
}

pub fn default_faces(now: DateTime<Utc>) -> Vec<Person> {
    vec![
        Person {
            id: "p1".to_string(),
            name: "Alice Smith".to_string(),
            kind: PersonKind::Employee,
            last_seen: now,
            confidence: 0.98,
            thumbnail: String::new(),
        },
        Person {
            id: "p2".to_string(),
            name: "John Doe".to_string(),
            kind: PersonKind::Banned,
            last_seen: now - Duration::days(1),
            confidence: 0.92,
            thumbnail: String::new(),
        },
        Person {
            id: "p3".to_string(),
            name: "Sarah Connor".to_string(),
            kind: PersonKind::Vip,
            last_seen: now - Duration::hours(12),
            confidence: 0.99,
            thumbnail: String::new(),
        },
    ]
}

pub fn default_theft_alerts(now: DateTime<Utc>) -> Vec<TheftAlert> {
    vec![TheftAlert {
        id: "t1".to_string(),
        item: "Electronics Package".to_string(),
        location: "Warehouse Bay 4".to_string(),
        timestamp: now,
        status: AlertStatus::Active,
        thumbnail: String::new(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_ids_are_unique_per_collection() {
        let now = Utc::now();
        let cameras = default_cameras();
        let mut camera_ids: Vec<_> = cameras.iter().map(|c| c.id.clone()).collect();
        camera_ids.dedup();
        assert_eq!(camera_ids.len(), cameras.len());

        let events = default_events(now);
        let mut event_ids: Vec<_> = events.iter().map(|e| e.id.clone()).collect();
        event_ids.dedup();
        assert_eq!(event_ids.len(), events.len());
    }

    #[test]
    fn seed_events_span_the_recent_past() {
        let now = Utc::now();
        for event in default_events(now) {
            assert!(event.timestamp < now);
        }
    }

    #[test]
    fn seed_is_deterministic_for_a_fixed_instant() {
        let now = Utc::now();
        assert_eq!(default_events(now), default_events(now));
        assert_eq!(default_faces(now), default_faces(now));
    }
}
