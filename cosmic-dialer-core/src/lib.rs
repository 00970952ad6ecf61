//! COSMIC Dialer Core
//!
//! Contact list and simulated calling for the COSMIC dialer: contact
//! fetching, a shared favorites store, the contact list and favorites screens,
//! and call sessions with their connect, ring and hang-up timers.
//!
//! Platform services (audio, vibration, screen navigation, the contact
//! backend) are injected as trait objects so the same logic runs on a desktop
//! console and under test with virtual time.

pub mod audio;
pub mod call;
pub mod contact;
pub mod controller;
pub mod favorites;
pub mod favorites_view;
pub mod navigation;
pub mod source;
pub mod theme;

mod error;

#[cfg(test)]
pub(crate) mod test_utils;

pub use audio::{AudioMode, AudioPlayer, SilentAudioPlayer, Track, Vibrator};
pub use call::{
    format_duration, CallContext, CallEvent, CallPhase, CallSession, CallSnapshot, CallTimings,
};
pub use contact::{Contact, Name, Picture};
pub use controller::{ContactListController, ListState};
pub use error::{DialerError, Result};
pub use favorites::{FavoritesEvent, FavoritesStore};
pub use favorites_view::{FavoriteThumbnail, FavoritesView, EMPTY_FAVORITES_TEXT};
pub use navigation::{CallParams, NavParams, Navigator, Screen};
pub use source::{ContactPage, ContactSource, JsonFileContactSource, StaticContactSource};
pub use theme::{Palette, ThemeStore, ThemeVariant};
