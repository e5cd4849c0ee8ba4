//! Persisted local state, backed by an embedded redb key-value store.
//!
//! Only three things survive an app restart: the authenticated user's
//! profile (JSON blob), the category catalog with its last-refresh
//! timestamp, and the current session id/username. Other users' profiles and
//! all reaction-pagination state are session-only so they can never go stale
//! across restarts.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, TableDefinition};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ripple::profiles::UserProfile;
use crate::ripple::taxonomy::Category;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("ripple_kv");

const KEY_CURRENT_PROFILE: &str = "current_profile";
const KEY_SESSION: &str = "session";
const KEY_CATEGORY_CATALOG: &str = "category_catalog";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The persisted session identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedCatalog {
    categories: Vec<Category>,
    updated_at: DateTime<Utc>,
}

pub struct Storage {
    db: Database,
}

impl Storage {
    /// Open or create the store at the given path.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = Database::create(path).map_err(|e| StorageError::Backend(e.to_string()))?;

        // Ensure the table exists by doing a write transaction.
        let write_txn = db
            .begin_write()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        {
            let _table = write_txn
                .open_table(TABLE)
                .map_err(|e| StorageError::Backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(Self { db })
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        match table.get(key) {
            Ok(Some(val)) => Ok(Some(val.value().to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(StorageError::Backend(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| StorageError::Backend(e.to_string()))?;
            table
                .insert(key, value)
                .map_err(|e| StorageError::Backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| StorageError::Backend(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| StorageError::Backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(())
    }

    pub fn save_current_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let blob = serde_json::to_vec(profile)?;
        self.set(KEY_CURRENT_PROFILE, &blob)
    }

    pub fn load_current_profile(&self) -> Result<Option<UserProfile>, StorageError> {
        match self.get(KEY_CURRENT_PROFILE)? {
            Some(blob) => Ok(Some(serde_json::from_slice(&blob)?)),
            None => Ok(None),
        }
    }

    pub fn clear_current_profile(&self) -> Result<(), StorageError> {
        self.delete(KEY_CURRENT_PROFILE)
    }

    pub fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        let blob = serde_json::to_vec(session)?;
        self.set(KEY_SESSION, &blob)
    }

    pub fn load_session(&self) -> Result<Option<Session>, StorageError> {
        match self.get(KEY_SESSION)? {
            Some(blob) => Ok(Some(serde_json::from_slice(&blob)?)),
            None => Ok(None),
        }
    }

    pub fn clear_session(&self) -> Result<(), StorageError> {
        self.delete(KEY_SESSION)
    }

    pub fn save_category_catalog(
        &self,
        categories: &[Category],
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let blob = serde_json::to_vec(&PersistedCatalog {
            categories: categories.to_vec(),
            updated_at,
        })?;
        self.set(KEY_CATEGORY_CATALOG, &blob)
    }

    /// Returns the persisted catalog with its last-update timestamp, if any.
    pub fn load_category_catalog(
        &self,
    ) -> Result<Option<(Vec<Category>, DateTime<Utc>)>, StorageError> {
        match self.get(KEY_CATEGORY_CATALOG)? {
            Some(blob) => {
                let catalog: PersistedCatalog = serde_json::from_slice(&blob)?;
                Ok(Some((catalog.categories, catalog.updated_at)))
            }
            None => Ok(None),
        }
    }
}
