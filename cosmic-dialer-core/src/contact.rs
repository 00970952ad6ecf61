//! Contact Records
//!
//! Contact data as delivered by a [`ContactSource`](crate::source::ContactSource),
//! plus the `favorite` annotation applied by the contact list.
//!
//! ## Wire Format
//!
//! Records follow the random-user shape:
//!
//! ```json
//! {
//!   "name": { "title": "Ms", "first": "Ada", "last": "Lovelace" },
//!   "picture": { "large": "...", "medium": "...", "thumbnail": "..." },
//!   "phone": "(555) 010-0001",
//!   "cell": "(555) 010-0002",
//!   "email": "ada@example.com"
//! }
//! ```
//!
//! `favorite` is never read from the wire; it is derived from the
//! [`FavoritesStore`](crate::favorites::FavoritesStore).

use serde::{Deserialize, Serialize};

/// Personal name of a contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    /// Honorific (Mr, Ms, Dr, ...)
    #[serde(default)]
    pub title: String,
    pub first: String,
    pub last: String,
}

impl Name {
    pub fn new(title: impl Into<String>, first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            first: first.into(),
            last: last.into(),
        }
    }

    /// Name as shown in the contact list and on the call screen
    ///
    /// ```rust
    /// use cosmic_dialer_core::Name;
    ///
    /// let name = Name::new("Ms", "Ada", "Lovelace");
    /// assert_eq!(name.display(), "Ms.Ada Lovelace");
    /// ```
    pub fn display(&self) -> String {
        if self.title.is_empty() {
            return self.short();
        }
        format!("{}.{} {}", self.title, self.first, self.last)
    }

    /// Name as shown on favorites thumbnails
    pub fn short(&self) -> String {
        format!("{} {}", self.first, self.last)
    }
}

/// Avatar image references in three sizes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    #[serde(alias = "thumbnail", default)]
    pub small: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub large: String,
}

/// A single contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: Name,

    #[serde(default)]
    pub picture: Picture,

    /// Unique key within a fetch batch
    pub phone: String,

    /// Mobile number (profile detail)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<String>,

    /// Email address (profile detail)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Favorite flag, derived from the favorites store
    #[serde(skip)]
    pub favorite: bool,
}

impl Contact {
    /// Create a contact with only a name and phone number
    pub fn new(name: Name, phone: impl Into<String>) -> Self {
        Self {
            name,
            picture: Picture::default(),
            phone: phone.into(),
            cell: None,
            email: None,
            favorite: false,
        }
    }

    pub fn with_picture(mut self, picture: Picture) -> Self {
        self.picture = picture;
        self
    }

    /// Get the display name used in the list
    pub fn display_name(&self) -> String {
        self.name.display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_forms() {
        let name = Name::new("Mr", "Alan", "Turing");
        assert_eq!(name.display(), "Mr.Alan Turing");
        assert_eq!(name.short(), "Alan Turing");

        let untitled = Name::new("", "Grace", "Hopper");
        assert_eq!(untitled.display(), "Grace Hopper");
    }

    #[test]
    fn test_deserialize_random_user_record() {
        let record = json!({
            "name": { "title": "Ms", "first": "Ada", "last": "Lovelace" },
            "picture": {
                "large": "https://img/large/1.jpg",
                "medium": "https://img/med/1.jpg",
                "thumbnail": "https://img/thumb/1.jpg"
            },
            "phone": "(555) 010-0001",
            "email": "ada@example.com",
            "gender": "female"
        });

        let contact: Contact = serde_json::from_value(record).unwrap();
        assert_eq!(contact.phone, "(555) 010-0001");
        assert_eq!(contact.picture.small, "https://img/thumb/1.jpg");
        assert_eq!(contact.email.as_deref(), Some("ada@example.com"));
        assert!(contact.cell.is_none());
        assert!(!contact.favorite);
    }

    #[test]
    fn test_favorite_is_not_on_the_wire() {
        let mut contact = Contact::new(Name::new("Dr", "Ada", "Lovelace"), "1");
        contact.favorite = true;

        let value = serde_json::to_value(&contact).unwrap();
        assert!(value.get("favorite").is_none());

        let back: Contact = serde_json::from_value(value).unwrap();
        assert!(!back.favorite);
    }
}
