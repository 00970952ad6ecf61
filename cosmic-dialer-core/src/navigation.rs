//! Navigation Capability
//!
//! Screens are pushed on a stack owned by the UI layer. The core only asks for
//! two moves: pop back to the root, and open a named screen with parameters.

use crate::Contact;

/// Screens known to the dialer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Contacts,
    Favorites,
    Profile,
    Call,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contacts => "Contacts",
            Self::Favorites => "Favorites",
            Self::Profile => "Profile",
            Self::Call => "Call",
        }
    }
}

/// Parameters for the call screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallParams {
    pub callee_name: String,
    pub callee_number: String,
    pub avatar: String,
}

impl CallParams {
    /// Parameters for calling a contact from the list
    pub fn for_contact(contact: &Contact) -> Self {
        Self {
            callee_name: contact.display_name(),
            callee_number: contact.phone.clone(),
            avatar: contact.picture.medium.clone(),
        }
    }
}

/// Parameters attached to a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavParams {
    None,
    Call(CallParams),
    Profile(Box<Contact>),
}

/// Navigation stack capability
pub trait Navigator: Send + Sync {
    fn pop_to_root(&self);
    fn navigate_to(&self, screen: Screen, params: NavParams);
}

/// Return from a terminal call screen to the contact list
pub(crate) fn return_to_contacts(navigator: &dyn Navigator) {
    navigator.pop_to_root();
    navigator.navigate_to(Screen::Contacts, NavParams::None);
}
