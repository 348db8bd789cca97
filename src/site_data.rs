//! Typed accessors over the entity store.
//!
//! [`SiteData`] is the single mutation path the views go through: list,
//! add and delete per entity kind, with ids minted here and derived
//! fields filled in. Reads always hit the store; callers re-list after a
//! mutation to observe it.

use std::sync::Arc;

use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::entity_store::{
    self, Camera, CameraStatus, CollectionStore, CollectionType, ModelCategory, Person,
    PersonKind, SecurityEvent, TheftAlert, TrainingDataType, TrainingModel,
};
use crate::error::Result;
use crate::ingest::EventSink;

/// Camera fields supplied at registration; the id is minted on insert.
#[derive(Debug, Clone)]
pub struct NewCamera {
    pub name: String,
    pub location: String,
    pub status: CameraStatus,
    pub thumbnail: String,
    pub rtsp_url: Option<String>,
    pub fps: u32,
    pub resolution: String,
    pub is_recording: bool,
}

impl Default for NewCamera {
    fn default() -> Self {
        NewCamera {
            name: String::new(),
            location: String::new(),
            status: CameraStatus::Online,
            thumbnail: String::new(),
            rtsp_url: None,
            fps: 30,
            resolution: "1080p".to_string(),
            is_recording: false,
        }
    }
}

/// Roster fields supplied at enrollment. Last-seen and confidence are
/// derived: a fresh entry has never been matched.
#[derive(Debug, Clone)]
pub struct NewPerson {
    pub name: String,
    pub kind: PersonKind,
    pub thumbnail: String,
}

#[derive(Debug, Clone)]
pub struct NewTrainingModel {
    pub label: String,
    pub category: ModelCategory,
    pub data_type: TrainingDataType,
    pub data_url: String,
    pub description: String,
}

/// Accessor facade over a store backend. Cheap to clone; all clones share
/// the same backend.
pub struct SiteData<Db> {
    store: Arc<Db>,
}

impl<Db> Clone for SiteData<Db> {
    fn clone(&self) -> Self {
        SiteData {
            store: Arc::clone(&self.store),
        }
    }
}

impl<Db> SiteData<Db>
where
    Db: CollectionStore,
{
    /// Wraps a store backend, seeding any collection that has never been
    /// written. Safe across repeated boots.
    pub fn new(store: Db) -> Result<Self> {
        let data = SiteData {
            store: Arc::new(store),
        };
        entity_store::initialize(data.store.as_ref())?;
        Ok(data)
    }

    pub fn cameras(&self) -> Vec<Camera> {
        self.store.read_collection()
    }

    /// Events newest-first. Display order only; the stored sequence keeps
    /// insertion order.
    pub fn events(&self) -> Vec<SecurityEvent> {
        let mut events: Vec<SecurityEvent> = self.store.read_collection();
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        events
    }

    pub fn faces(&self) -> Vec<Person> {
        self.store.read_collection()
    }

    pub fn training_models(&self) -> Vec<TrainingModel> {
        self.store.read_collection()
    }

    pub fn theft_alerts(&self) -> Vec<TheftAlert> {
        self.store.read_collection()
    }

    pub fn add_camera(&self, new: NewCamera) -> Result<Camera> {
        let mut cameras = self.cameras();
        let camera = Camera {
            id: mint_id(&cameras),
            name: new.name,
            location: new.location,
            status: new.status,
            thumbnail: new.thumbnail,
            rtsp_url: new.rtsp_url,
            fps: new.fps,
            resolution: new.resolution,
            is_recording: new.is_recording,
        };
        cameras.push(camera.clone());
        self.store.write_collection(&cameras)?;
        info!("Camera {} ({}) registered", camera.id, camera.name);
        Ok(camera)
    }

    /// The registration surface: display name plus connection URL, other
    /// fields defaulted. The URL is passed through unvalidated.
    pub fn register_camera(&self, name: &str, rtsp_url: &str) -> Result<Camera> {
        self.add_camera(NewCamera {
            name: name.to_string(),
            rtsp_url: Some(rtsp_url.to_string()),
            ..NewCamera::default()
        })
    }

    pub fn remove_camera(&self, id: &str) -> Result<()> {
        self.remove_record::<Camera>(id)
    }

    pub fn enroll_person(&self, new: NewPerson) -> Result<Person> {
        let mut faces = self.faces();
        let person = Person {
            id: mint_id(&faces),
            name: new.name,
            kind: new.kind,
            last_seen: Utc::now(),
            // Zero until the analyzer first matches this entry.
            confidence: 0.0,
            thumbnail: new.thumbnail,
        };
        faces.push(person.clone());
        self.store.write_collection(&faces)?;
        info!("Person {} added to the face roster", person.id);
        Ok(person)
    }

    pub fn remove_person(&self, id: &str) -> Result<()> {
        self.remove_record::<Person>(id)
    }

    pub fn add_training_model(&self, new: NewTrainingModel) -> Result<TrainingModel> {
        let mut models = self.training_models();
        let model = TrainingModel {
            id: mint_id(&models),
            label: new.label,
            category: new.category,
            data_type: new.data_type,
            data_url: new.data_url,
            description: new.description,
            date_added: Utc::now(),
        };
        models.push(model.clone());
        self.store.write_collection(&models)?;
        info!("Training model {} ({}) stored", model.id, model.label);
        Ok(model)
    }

    pub fn remove_training_model(&self, id: &str) -> Result<()> {
        self.remove_record::<TrainingModel>(id)
    }

    /// Appends an already-shaped event, re-minting its id on collision so
    /// collection-wide id uniqueness holds for externally minted records.
    pub fn record_event(&self, mut event: SecurityEvent) -> Result<SecurityEvent> {
        let mut events: Vec<SecurityEvent> = self.store.read_collection();
        if events.iter().any(|e| e.id == event.id) {
            event.id = mint_id(&events);
        }
        events.push(event.clone());
        self.store.write_collection(&events)?;
        Ok(event)
    }

    fn remove_record<C: CollectionType>(&self, id: &str) -> Result<()> {
        let mut records: Vec<C> = self.store.read_collection();
        let before = records.len();
        records.retain(|r| r.record_id() != id);
        if records.len() == before {
            // Unknown id: a no-op, not an error.
            return Ok(());
        }
        self.store.write_collection(&records)?;
        info!("Removed {} from {}", id, C::COLLECTION_KEY);
        Ok(())
    }
}

impl<Db> EventSink for SiteData<Db>
where
    Db: CollectionStore,
{
    fn record_event(&self, event: SecurityEvent) -> Result<SecurityEvent> {
        SiteData::record_event(self, event)
    }
}

fn mint_id<C: CollectionType>(existing: &[C]) -> String {
    loop {
        let id = format!("{}-{}", C::ID_PREFIX, Uuid::new_v4());
        if !existing.iter().any(|r| r.record_id() == id) {
            return id;
        }
    }
}
