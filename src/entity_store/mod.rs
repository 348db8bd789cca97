//! Persistent collection storage for the dashboard's entity records.
//!
//! Each entity kind lives under one storage key as a JSON-encoded ordered
//! sequence. The store is the only owner of the persisted representation;
//! everything above it goes through [`CollectionStore`], which keeps the
//! mutation path single and lets tests substitute an in-memory double.
//!
//! Read-path failures (missing key, unreadable backend, corrupt value)
//! degrade to an empty sequence and a log line. Write-path failures are
//! real errors, with capacity exhaustion surfaced as its own kind.

mod memory;
mod schemas;
mod seed;
mod sled_db;

pub use memory::MemoryStore;
pub use schemas::{
    AlertStatus, Camera, CameraStatus, EventKind, ModelCategory, Person, PersonKind,
    SecurityEvent, Severity, TheftAlert, TrainingDataType, TrainingModel,
};
pub use sled_db::SledStore;

use chrono::Utc;
use log::info;
use serde::{de::DeserializeOwned, Serialize};

#[cfg(test)]
use mockall::automock;

/// A record type stored as one named collection.
pub trait CollectionType: Serialize + DeserializeOwned + Clone + Send + 'static {
    /// Storage key the collection's sequence is persisted under.
    const COLLECTION_KEY: &'static str;

    /// Prefix for minted record ids.
    const ID_PREFIX: &'static str;

    fn record_id(&self) -> &str;
}

/// Operations every store backend provides.
///
/// `read_collection` never fails: anything unreadable comes back as an
/// empty sequence so callers proceed with empty state. `write_collection`
/// persists the whole sequence and surfaces [`crate::error::Error::StorageFull`]
/// when the backend is out of capacity.
#[cfg_attr(test, automock)]
pub trait CollectionStore: Send + Sync + 'static {
    /// Whether the collection key exists at all. An empty sequence still
    /// counts as present; only a never-written key reports `false`.
    fn has_collection(&self, collection: &str) -> bool;

    fn read_collection<C>(&self) -> Vec<C>
    where
        C: CollectionType + 'static;

    fn write_collection<C>(&self, records: &[C]) -> crate::error::Result<()>
    where
        C: CollectionType + 'static;
}

/// First-run seeding. Each collection is written only while its key is
/// absent, so calling this on every boot is safe.
pub fn initialize<Db: CollectionStore>(store: &Db) -> crate::error::Result<()> {
    let now = Utc::now();
    seed_if_absent(store, &seed::default_cameras())?;
    seed_if_absent(store, &seed::default_events(now))?;
    seed_if_absent(store, &seed::default_faces(now))?;
    seed_if_absent(store, &seed::default_theft_alerts(now))?;
    seed_if_absent::<TrainingModel, Db>(store, &[])?;
    Ok(())
}

fn seed_if_absent<C, Db>(store: &Db, records: &[C]) -> crate::error::Result<()>
where
    C: CollectionType,
    Db: CollectionStore,
{
    if store.has_collection(C::COLLECTION_KEY) {
        return Ok(());
    }
    info!(
        "Seeding collection {} with {} records",
        C::COLLECTION_KEY,
        records.len()
    );
    store.write_collection(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn initialize_seeds_every_collection() {
        init_logger();
        let store = MemoryStore::new();

        initialize(&store).unwrap();

        assert_eq!(store.read_collection::<Camera>().len(), 3);
        assert_eq!(store.read_collection::<SecurityEvent>().len(), 3);
        assert_eq!(store.read_collection::<Person>().len(), 3);
        assert_eq!(store.read_collection::<TheftAlert>().len(), 1);
        assert!(store.read_collection::<TrainingModel>().is_empty());
        assert!(store.has_collection(TrainingModel::COLLECTION_KEY));
    }

    #[test]
    fn initialize_is_idempotent() {
        init_logger();
        let store = MemoryStore::new();

        initialize(&store).unwrap();
        let cameras = store.read_collection::<Camera>();
        let events = store.read_collection::<SecurityEvent>();
        let faces = store.read_collection::<Person>();
        let alerts = store.read_collection::<TheftAlert>();

        initialize(&store).unwrap();

        assert_eq!(store.read_collection::<Camera>(), cameras);
        assert_eq!(store.read_collection::<SecurityEvent>(), events);
        assert_eq!(store.read_collection::<Person>(), faces);
        assert_eq!(store.read_collection::<TheftAlert>(), alerts);
    }

    #[test]
    fn initialize_does_not_overwrite_emptied_collections() {
        init_logger();
        let store = MemoryStore::new();
        initialize(&store).unwrap();

        // Deleting every record must not re-trigger seeding on next boot.
        store.write_collection::<Person>(&[]).unwrap();
        initialize(&store).unwrap();

        assert!(store.read_collection::<Person>().is_empty());
    }

    #[test]
    fn initialize_skips_present_collections_without_writes() {
        init_logger();
        let mut mock = MockCollectionStore::new();
        mock.expect_has_collection().times(5).returning(|_| true);
        // No write_collection expectations: a write would fail the test.

        initialize(&mock).unwrap();
    }
}
