//! Contact List Controller
//!
//! Backs the contact list screen: fetches contacts, annotates each one with its
//! favorite status, and handles the list gestures (tap to call, long press for
//! the profile, swipe to toggle the favorite).
//!
//! ## Loading vs. Refreshing
//!
//! - `load_contacts` replaces the view with a loading state until the fetch
//!   resolves.
//! - `refresh` keeps the current list readable while the fetch is in flight
//!   and waits a minimum visible duration first, so the pull-to-refresh
//!   indicator is noticeable even on fast sources.
//!
//! Either way a failed fetch discards the previous list and shows the error
//! state; results are never merged with stale data.
//!
//! ## Stale Results
//!
//! Fetches cannot be cancelled. Each one takes a generation number instead,
//! and a result is applied only if it belongs to the newest fetch and the
//! screen is still mounted.

use crate::favorites::FavoritesStore;
use crate::navigation::{CallParams, NavParams, Navigator, Screen};
use crate::source::ContactSource;
use crate::{Contact, DialerError, Result};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Minimum time the refresh indicator stays visible
pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_secs(2);

/// What the contact list screen shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Ready(Vec<Contact>),
    /// Static error text; the screen offers no retry
    Error(String),
}

/// Controller for the contact list screen
pub struct ContactListController {
    source: Arc<dyn ContactSource>,
    favorites: FavoritesStore,
    navigator: Arc<dyn Navigator>,
    refresh_delay: Duration,
    state: RwLock<ListState>,
    /// Refreshes in flight
    refreshing: AtomicUsize,
    mounted: AtomicBool,
    generation: AtomicU64,
}

impl ContactListController {
    pub fn new(
        source: Arc<dyn ContactSource>,
        favorites: FavoritesStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            source,
            favorites,
            navigator,
            refresh_delay: DEFAULT_REFRESH_DELAY,
            state: RwLock::new(ListState::Loading),
            refreshing: AtomicUsize::new(0),
            mounted: AtomicBool::new(true),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    /// Fetch contacts and replace the list
    pub async fn load_contacts(&self) -> Result<Vec<Contact>> {
        let generation = self.next_generation();
        *self.write() = ListState::Loading;

        let result = self.source.fetch().await;
        self.apply(generation, result)
    }

    /// Re-fetch contacts while the current list stays visible
    pub async fn refresh(&self) -> Result<Vec<Contact>> {
        let generation = self.next_generation();
        let in_flight = RefreshGuard::enter(&self.refreshing);
        debug!("Refreshing contacts (generation {})", generation);

        tokio::time::sleep(self.refresh_delay).await;
        let result = self.source.fetch().await;

        drop(in_flight);
        self.apply(generation, result)
    }

    /// Toggle the favorite status of a contact
    ///
    /// Updates the shared store first, then flips the matching list entry in
    /// place without re-fetching. Returns the new favorite status.
    pub fn toggle_favorite(&self, contact: &Contact) -> bool {
        if contact.favorite {
            self.favorites.remove(&contact.phone);
        } else {
            self.favorites.add(contact);
        }
        let favorite = !contact.favorite;

        if let ListState::Ready(contacts) = &mut *self.write() {
            for entry in contacts.iter_mut().filter(|c| c.phone == contact.phone) {
                entry.favorite = favorite;
            }
        }

        info!(
            "{} {} favorites",
            contact.display_name(),
            if favorite { "added to" } else { "removed from" }
        );
        favorite
    }

    /// Re-read favorite flags from the store without re-fetching
    ///
    /// Used when another screen changed the favorites.
    pub fn sync_favorites(&self) {
        if let ListState::Ready(contacts) = &mut *self.write() {
            for contact in contacts.iter_mut() {
                contact.favorite = self.favorites.is_favorite(&contact.phone);
            }
        }
    }

    /// Tap on a list item: open the call screen for that contact
    pub fn select_contact(&self, phone: &str) -> Result<CallParams> {
        let contact = self.find(phone)?;
        let params = CallParams::for_contact(&contact);

        self.navigator
            .navigate_to(Screen::Call, NavParams::Call(params.clone()));
        Ok(params)
    }

    /// Long press on a list item: open the profile screen
    pub fn open_profile(&self, phone: &str) -> Result<Contact> {
        let contact = self.find(phone)?;

        self.navigator
            .navigate_to(Screen::Profile, NavParams::Profile(Box::new(contact.clone())));
        Ok(contact)
    }

    /// The screen went away; results still in flight are discarded
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// True while any refresh is in flight
    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst) > 0
    }

    pub fn state(&self) -> ListState {
        self.read().clone()
    }

    /// Contacts currently shown (empty while loading or in the error state)
    pub fn contacts(&self) -> Vec<Contact> {
        match &*self.read() {
            ListState::Ready(contacts) => contacts.clone(),
            _ => Vec::new(),
        }
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn apply(&self, generation: u64, result: Result<Vec<Contact>>) -> Result<Vec<Contact>> {
        if !self.is_mounted() {
            debug!("Discarding contacts fetched after unmount");
            return Err(DialerError::Cancelled("contact list closed".to_string()));
        }
        if generation != self.generation.load(Ordering::SeqCst) {
            debug!("Discarding contacts from superseded fetch {}", generation);
            return Err(DialerError::Cancelled(
                "superseded by a newer fetch".to_string(),
            ));
        }

        match result {
            Ok(mut contacts) => {
                for contact in contacts.iter_mut() {
                    contact.favorite = self.favorites.is_favorite(&contact.phone);
                }

                info!("Loaded {} contacts", contacts.len());
                *self.write() = ListState::Ready(contacts.clone());
                Ok(contacts)
            }
            Err(e) => {
                warn!("Failed to load contacts: {}", e);
                *self.write() = ListState::Error(e.user_message());
                Err(e)
            }
        }
    }

    fn find(&self, phone: &str) -> Result<Contact> {
        self.contacts()
            .into_iter()
            .find(|c| c.phone == phone)
            .ok_or_else(|| DialerError::ContactNotFound(phone.to_string()))
    }

    fn read(&self) -> RwLockReadGuard<'_, ListState> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ListState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Counts one in-flight refresh; released on drop, including cancellation
struct RefreshGuard<'a> {
    count: &'a AtomicUsize,
}

impl<'a> RefreshGuard<'a> {
    fn enter(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self { count }
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.count.fetch_sub(1, Ordering::SeqCst);
    }
}
