use std::collections::BTreeMap;

use irs_core::types::DbId;
use serde::Serialize;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::issue::Issue;
use crate::models::media::Media;
use crate::models::user::User;

/// A keyed collection with its own auto-incrementing id counter.
#[derive(Debug)]
pub(crate) struct Table<T> {
    next_id: DbId,
    rows: BTreeMap<DbId, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    /// Allocate the next id, build the row with it, and return a copy.
    pub(crate) fn insert_with(&mut self, build: impl FnOnce(DbId) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    pub(crate) fn get(&self, id: DbId) -> Option<&T> {
        self.rows.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: DbId) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    pub(crate) fn contains(&self, id: DbId) -> bool {
        self.rows.contains_key(&id)
    }

    /// Rows in id (insertion) order.
    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) users: Table<User>,
    pub(crate) issues: Table<Issue>,
    pub(crate) media: Table<Media>,
}

/// Row counts per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCounts {
    pub users: usize,
    pub issues: usize,
    pub media: usize,
}

/// Process-local store holding the users, issues, and media collections.
///
/// Thread-safe via interior `RwLock`; wrap in `Arc` and share it through
/// the application state. Writers are serialized, and there are no
/// transactions spanning more than one call.
#[derive(Debug, Default)]
pub struct Store {
    tables: RwLock<Tables>,
}

impl Store {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }

    /// Current number of rows in each collection.
    pub async fn counts(&self) -> StoreCounts {
        let tables = self.read().await;
        StoreCounts {
            users: tables.users.len(),
            issues: tables.issues.len(),
            media: tables.media.len(),
        }
    }
}
