//! Test doubles for the dialer capabilities

use crate::audio::{AudioMode, AudioPlayer, Track, Vibrator};
use crate::navigation::{NavParams, Navigator, Screen};
use crate::source::ContactSource;
use crate::{Contact, DialerError, Name, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// How long `play(Ringtone)` takes to resolve
#[derive(Debug, Clone, Copy)]
enum Readiness {
    After(Duration),
    Never,
    Fails,
}

/// Audio player with scripted ringback readiness
pub struct MockAudioPlayer {
    native: bool,
    readiness: Readiness,
    played: Mutex<Vec<Track>>,
    stopped: Mutex<Vec<Track>>,
    prepared: AtomicUsize,
}

impl MockAudioPlayer {
    fn with(native: bool, readiness: Readiness) -> Self {
        Self {
            native,
            readiness,
            played: Mutex::new(Vec::new()),
            stopped: Mutex::new(Vec::new()),
            prepared: AtomicUsize::new(0),
        }
    }

    /// Native playback; the ringback is ready after `latency`
    pub fn native(latency: Duration) -> Self {
        Self::with(true, Readiness::After(latency))
    }

    /// Native playback; the ringback never becomes ready
    pub fn native_never_ready() -> Self {
        Self::with(true, Readiness::Never)
    }

    /// Native playback; every playback call fails
    pub fn native_failing() -> Self {
        Self::with(true, Readiness::Fails)
    }

    /// No native playback
    pub fn fallback() -> Self {
        Self::with(false, Readiness::After(Duration::ZERO))
    }

    pub fn played(&self) -> Vec<Track> {
        self.played.lock().unwrap().clone()
    }

    pub fn stopped(&self) -> Vec<Track> {
        self.stopped.lock().unwrap().clone()
    }

    pub fn prepare_count(&self) -> usize {
        self.prepared.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioPlayer for MockAudioPlayer {
    fn supports_native_playback(&self) -> bool {
        self.native
    }

    async fn prepare(&self, _mode: AudioMode) -> Result<()> {
        self.prepared.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn play(&self, track: Track) -> Result<()> {
        if let Readiness::Fails = self.readiness {
            return Err(DialerError::Audio("device busy".to_string()));
        }

        self.played.lock().unwrap().push(track);
        if track == Track::Ringtone {
            match self.readiness {
                Readiness::After(latency) => tokio::time::sleep(latency).await,
                Readiness::Never => std::future::pending::<()>().await,
                Readiness::Fails => {}
            }
        }
        Ok(())
    }

    async fn stop(&self, track: Track) -> Result<()> {
        self.stopped.lock().unwrap().push(track);
        Ok(())
    }
}

/// Vibrator that counts patterns
#[derive(Default)]
pub struct RecordingVibrator {
    count: AtomicUsize,
}

impl RecordingVibrator {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Vibrator for RecordingVibrator {
    fn vibrate(&self, _pattern: &[Duration]) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Navigation request captured by [`RecordingNavigator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    PopToRoot,
    NavigateTo(Screen, NavParams),
}

/// Navigator that records every request with its (virtual) time
#[derive(Default)]
pub struct RecordingNavigator {
    actions: Mutex<Vec<(tokio::time::Instant, NavAction)>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> Vec<NavAction> {
        self.actions
            .lock()
            .unwrap()
            .iter()
            .map(|(_, action)| action.clone())
            .collect()
    }

    pub fn returns_to_contacts(&self) -> usize {
        self.actions()
            .iter()
            .filter(|a| **a == NavAction::NavigateTo(Screen::Contacts, NavParams::None))
            .count()
    }
}

impl Navigator for RecordingNavigator {
    fn pop_to_root(&self) {
        self.actions
            .lock()
            .unwrap()
            .push((tokio::time::Instant::now(), NavAction::PopToRoot));
    }

    fn navigate_to(&self, screen: Screen, params: NavParams) {
        self.actions
            .lock()
            .unwrap()
            .push((tokio::time::Instant::now(), NavAction::NavigateTo(screen, params)));
    }
}

/// Contact source that replays scripted responses and counts fetches
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Vec<Contact>>>>,
    fetches: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<Vec<Contact>>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContactSource for ScriptedSource {
    async fn fetch(&self) -> Result<Vec<Contact>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DialerError::fetch("no scripted response")))
    }
}

/// Build a contact with a predictable name and picture
pub fn contact(first: &str, phone: &str) -> Contact {
    let mut contact = Contact::new(Name::new("Mx", first, "Example"), phone);
    contact.picture.medium = format!("https://img/med/{}.jpg", phone);
    contact
}
