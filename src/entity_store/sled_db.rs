//! Disk-backed store implementation on top of `sled`.
//!
//! One key per collection in the default tree, holding the JSON-encoded
//! sequence. Capacity exhaustion on the write path is reported as
//! `Error::StorageFull` so the caller can tell the user instead of
//! silently losing the record.

use std::path::Path;

use directories::ProjectDirs;
use log::{error, info, warn};

use crate::error::{Error, Result};

use super::{CollectionStore, CollectionType};

pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    pub fn open_from<P: AsRef<Path>>(path: P) -> Result<SledStore> {
        let db = sled::open(path)?;
        info!("Entity store opened");
        Ok(SledStore { db })
    }

    /// Opens the store under the per-user data directory.
    pub fn open_default() -> Result<SledStore> {
        let proj_dirs = ProjectDirs::from("com", "sentinel", "sentinel-vms")
            .ok_or_else(|| Error::Config("no home directory to place the entity store".to_string()))?;
        Self::open_from(proj_dirs.data_dir().join("entities"))
    }

    /// Throwaway store backed by a temp directory, removed on drop.
    pub fn temporary() -> Result<SledStore> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(SledStore { db })
    }
}

impl CollectionStore for SledStore {
    fn has_collection(&self, collection: &str) -> bool {
        self.db.contains_key(collection).unwrap_or_else(|e| {
            error!("Presence check failed for {}: {}", collection, e);
            false
        })
    }

    fn read_collection<C>(&self) -> Vec<C>
    where
        C: CollectionType,
    {
        let raw = match self.db.get(C::COLLECTION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                error!("Read failed for {}: {}", C::COLLECTION_KEY, e);
                return Vec::new();
            }
        };

        match serde_json::from_slice(&raw) {
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
        self.db
            .insert(C::COLLECTION_KEY, raw)
            .map_err(|e| write_failure(C::COLLECTION_KEY, e))?;
        Ok(())
    }
}

fn write_failure(collection: &'static str, err: sled::Error) -> Error {
    match &err {
        sled::Error::Io(io) if io.kind() == std::io::ErrorKind::StorageFull => {
            Error::StorageFull { collection }
        }
        _ => Error::Storage(err),
    }
}
