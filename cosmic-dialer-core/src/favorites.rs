//! Favorites Store
//!
//! Process-wide set of favorite contacts, keyed by phone number and kept in
//! insertion order. The store is a cheap, cloneable handle: every screen that
//! needs favorite status holds a clone, and a mutation made through any clone is
//! visible to all of them as soon as the call returns.
//!
//! Changes are also published as [`FavoritesEvent`]s for consumers that prefer
//! to be notified instead of re-reading.
//!
//! ## Usage
//!
//! ```rust
//! use cosmic_dialer_core::{Contact, FavoritesStore, Name};
//!
//! let store = FavoritesStore::new();
//! let ada = Contact::new(Name::new("Ms", "Ada", "Lovelace"), "100");
//!
//! store.add(&ada);
//! store.add(&ada);
//! assert_eq!(store.len(), 1);
//! assert!(store.is_favorite("100"));
//!
//! store.remove("100");
//! assert!(!store.is_favorite("100"));
//! ```

use crate::Contact;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::debug;

/// Change notification for the favorite set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesEvent {
    /// A contact became a favorite
    Added(String),
    /// A contact stopped being a favorite
    Removed(String),
}

/// Shared favorite set
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    favorites: Arc<RwLock<Vec<Contact>>>,
    event_tx: broadcast::Sender<FavoritesEvent>,
}

impl FavoritesStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(64);

        Self {
            favorites: Arc::new(RwLock::new(Vec::new())),
            event_tx,
        }
    }

    /// Subscribe to favorite changes
    pub fn subscribe(&self) -> broadcast::Receiver<FavoritesEvent> {
        self.event_tx.subscribe()
    }

    /// Add a contact to the favorites
    ///
    /// Returns `false` if a contact with the same phone is already present.
    pub fn add(&self, contact: &Contact) -> bool {
        {
            let mut guard = self.write();
            if guard.iter().any(|c| c.phone == contact.phone) {
                debug!("Contact {} is already a favorite", contact.phone);
                return false;
            }

            let mut favorite = contact.clone();
            favorite.favorite = true;
            guard.push(favorite);
        }

        debug!("Added favorite {}", contact.phone);
        let _ = self
            .event_tx
            .send(FavoritesEvent::Added(contact.phone.clone()));
        true
    }

    /// Remove a contact from the favorites by phone
    ///
    /// Returns `false` if the phone was not a favorite.
    pub fn remove(&self, phone: &str) -> bool {
        {
            let mut guard = self.write();
            let before = guard.len();
            guard.retain(|c| c.phone != phone);
            if guard.len() == before {
                return false;
            }
        }

        debug!("Removed favorite {}", phone);
        let _ = self
            .event_tx
            .send(FavoritesEvent::Removed(phone.to_string()));
        true
    }

    /// Check whether a phone belongs to a favorite
    pub fn is_favorite(&self, phone: &str) -> bool {
        self.read().iter().any(|c| c.phone == phone)
    }

    /// Snapshot of the favorites in insertion order
    pub fn list(&self) -> Vec<Contact> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Writers never panic while holding the lock, so a poisoned guard still
    // holds a consistent set.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Contact>> {
        self.favorites
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Contact>> {
        self.favorites
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for FavoritesStore {
    fn default() -> Self {
        Self::new()
    }
}
