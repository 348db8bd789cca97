//! In-memory store implementation.
//!
//! Holds the same serialized layout as the disk store, in a map. Used by
//! tests and by volatile deployments that do not need the data to survive
//! a restart. An optional byte quota makes the capacity failure mode
//! reachable without filling an actual disk.

use std::collections::HashMap;
use std::sync::Mutex;

use log::warn;

use crate::error::{Error, Result};

use super::{CollectionStore, CollectionType};

pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<u8>>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            collections: Mutex::new(HashMap::new()),
            quota_bytes: None,
        }
    }

    /// Caps the total serialized size across all collections.
    pub fn with_quota(quota_bytes: usize) -> Self {
        MemoryStore {
            collections: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Plants raw bytes under a collection key, bypassing serialization.
    /// Lets tests model a corrupted backing value.
    pub fn plant_raw(&self, collection: &str, raw: &[u8]) {
        self.collections
            .lock()
            .unwrap()
            .insert(collection.to_string(), raw.to_vec());
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionStore for MemoryStore {
    fn has_collection(&self, collection: &str) -> bool {
        self.collections.lock().unwrap().contains_key(collection)
    }

    fn read_collection<C>(&self) -> Vec<C>
    where
        C: CollectionType,
    {
        let collections = self.collections.lock().unwrap();
        let Some(raw) = collections.get(C::COLLECTION_KEY) else {
            return Vec::new();
        };
        match serde_json::from_slice(raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "Corrupt value under {}; treating as empty: {}",
                    C::COLLECTION_KEY,
                    e
                );
                Vec::new()
            }
        }
    }

    fn write_collection<C>(&self, records: &[C]) -> Result<()>
    where
        C: CollectionType,
    {
        let raw = serde_json::to_vec(records)?;
        let mut collections = self.collections.lock().unwrap();

        if let Some(quota) = self.quota_bytes {
            let others: usize = collections
                .iter()
                .filter(|(key, _)| key.as_str() != C::COLLECTION_KEY)
                .map(|(_, value)| value.len())
                .sum();
            if others + raw.len() > quota {
                return Err(Error::StorageFull {
                    collection: C::COLLECTION_KEY,
                });
            }
        }

        collections.insert(C::COLLECTION_KEY.to_string(), raw);
        Ok(())
    }
}
