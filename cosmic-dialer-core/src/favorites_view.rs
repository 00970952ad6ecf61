//! Favorites Screen
//!
//! Backs the favorites tab: a grid of large avatars built straight from the
//! [`FavoritesStore`], so a favorite stays visible even after the contact list
//! has been refetched without it. Tapping a thumbnail opens the profile of the
//! stored contact.

use crate::favorites::FavoritesStore;
use crate::navigation::{NavParams, Navigator, Screen};
use crate::{Contact, DialerError, Result};
use std::sync::Arc;
use tracing::debug;

/// Text shown when nothing has been marked as favorite
pub const EMPTY_FAVORITES_TEXT: &str = "You have no favorites yet";

/// One cell of the favorites grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteThumbnail {
    /// First and last name, without the title
    pub name: String,
    pub phone: String,
    /// Large avatar URL
    pub avatar: String,
}

impl From<&Contact> for FavoriteThumbnail {
    fn from(contact: &Contact) -> Self {
        Self {
            name: contact.name.short(),
            phone: contact.phone.clone(),
            avatar: contact.picture.large.clone(),
        }
    }
}

/// Controller for the favorites screen
pub struct FavoritesView {
    favorites: FavoritesStore,
    navigator: Arc<dyn Navigator>,
}

impl FavoritesView {
    pub fn new(favorites: FavoritesStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            favorites,
            navigator,
        }
    }

    /// Switch to the favorites tab
    pub fn open(&self) {
        self.navigator.navigate_to(Screen::Favorites, NavParams::None);
    }

    /// Grid cells in the order the favorites were added
    pub fn entries(&self) -> Vec<FavoriteThumbnail> {
        self.favorites
            .list()
            .iter()
            .map(FavoriteThumbnail::from)
            .collect()
    }

    /// Placeholder text, if the grid is empty
    pub fn empty_text(&self) -> Option<&'static str> {
        self.favorites.is_empty().then_some(EMPTY_FAVORITES_TEXT)
    }

    /// Tap on a thumbnail: show the stored contact's profile
    pub fn open_profile(&self, phone: &str) -> Result<Contact> {
        let contact = self
            .favorites
            .list()
            .into_iter()
            .find(|c| c.phone == phone)
            .ok_or_else(|| DialerError::ContactNotFound(phone.to_string()))?;

        debug!("Opening favorite {}", phone);
        self.navigator
            .navigate_to(Screen::Profile, NavParams::Profile(Box::new(contact.clone())));
        Ok(contact)
    }
}
