//! Local record lists with optimistic mutation and rollback.
//!
//! Each controller keeps the records it displays in a [`WorkingSet`].
//! Optimistic edits return a snapshot that restores the previous state if
//! the backend call fails. [`InFlight`] keeps a second write to the same
//! record from starting while the first is outstanding.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use decorhub_client::{Booking, DecoratorRequest, Payment, User};
use tokio::sync::RwLock;

use crate::error::{DashboardError, Result};

/// Records addressable by backend id.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Booking {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Payment {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for DecoratorRequest {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for User {
    fn key(&self) -> &str {
        &self.email
    }
}

/// A record removed optimistically, with its former position.
#[derive(Debug, Clone)]
pub struct Removed<T> {
    index: usize,
    item: T,
}

impl<T> Removed<T> {
    pub fn item(&self) -> &T {
        &self.item
    }
}

/// A record's state before an optimistic edit.
#[derive(Debug, Clone)]
pub struct Snapshot<T>(T);

/// Ordered list of records shown by a controller.
#[derive(Debug)]
pub struct WorkingSet<T> {
    items: RwLock<Vec<T>>,
}

impl<T> Default for WorkingSet<T> {
    fn default() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Keyed + Clone> WorkingSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents after a fresh load.
    pub async fn replace(&self, items: Vec<T>) {
        *self.items.write().await = items;
    }

    pub async fn all(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.key() == id)
            .cloned()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.items.read().await.iter().any(|item| item.key() == id)
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    pub async fn push(&self, item: T) {
        self.items.write().await.push(item);
    }

    /// Remove a record, keeping what is needed to put it back.
    pub async fn remove(&self, id: &str) -> Option<Removed<T>> {
        let mut items = self.items.write().await;
        let index = items.iter().position(|item| item.key() == id)?;
        let item = items.remove(index);
        Some(Removed { index, item })
    }

    /// Undo a [`remove`](Self::remove). A no-op if the record came back in
    /// the meantime (e.g. a reload).
    pub async fn restore(&self, removed: Removed<T>) {
        let mut items = self.items.write().await;
        if items.iter().any(|item| item.key() == removed.item.key()) {
            return;
        }
        let index = removed.index.min(items.len());
        items.insert(index, removed.item);
    }

    /// Apply an edit in place, returning the prior state.
    pub async fn edit<F>(&self, id: &str, f: F) -> Option<Snapshot<T>>
    where
        F: FnOnce(&mut T),
    {
        let mut items = self.items.write().await;
        let item = items.iter_mut().find(|item| item.key() == id)?;
        let snapshot = Snapshot(item.clone());
        f(item);
        Some(snapshot)
    }

    /// Undo an [`edit`](Self::edit).
    pub async fn rollback(&self, snapshot: Snapshot<T>) {
        let mut items = self.items.write().await;
        if let Some(item) = items.iter_mut().find(|item| item.key() == snapshot.0.key()) {
            *item = snapshot.0;
        }
    }
}

/// Records with a write outstanding.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    ids: Mutex<HashSet<String>>,
}

impl InFlight {
    fn ids(&self) -> MutexGuard<'_, HashSet<String>> {
        self.ids.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn acquire(&self, id: &str) -> Result<InFlightGuard<'_>> {
        if !self.ids().insert(id.to_string()) {
            return Err(DashboardError::UpdateInFlight(id.to_string()));
        }
        Ok(InFlightGuard {
            set: self,
            id: id.to_string(),
        })
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.ids().contains(id)
    }
}

/// Releases the record when the write finishes, however it finishes.
pub(crate) struct InFlightGuard<'a> {
    set: &'a InFlight,
    id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.ids().remove(&self.id);
    }
}
