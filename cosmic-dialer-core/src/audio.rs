//! Audio and Haptic Capabilities
//!
//! Call sessions play a ringback tone while connecting and an end tone on
//! hang-up, and vibrate when the call connects. Both are injected capabilities,
//! created once at startup and shared by reference with every session.
//!
//! Playback is best-effort: a session logs audio errors and carries on with its
//! transition.

use crate::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Vibration pattern used when a call connects and on fallback hang-up
pub const VIBRATION_PATTERN: [Duration; 3] = [
    Duration::from_millis(500),
    Duration::from_millis(500),
    Duration::from_millis(500),
];

/// Sounds a call session can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Track {
    /// Ringback tone while the call is connecting
    Ringtone,
    /// Tone played when the call is hung up
    Endtone,
}

impl Track {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ringtone => "ringtone",
            Self::Endtone => "endtone",
        }
    }
}

/// Playback settings applied before any tone is played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioMode {
    pub stays_active_in_background: bool,
    pub duck_others: bool,
    pub play_through_earpiece: bool,
    pub allows_recording: bool,
    pub plays_in_silent_mode: bool,
}

impl Default for AudioMode {
    fn default() -> Self {
        Self {
            stays_active_in_background: true,
            duck_others: false,
            play_through_earpiece: false,
            allows_recording: false,
            plays_in_silent_mode: true,
        }
    }
}

/// Sound playback capability
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Whether this environment can play tones natively
    ///
    /// Without native playback a session connects immediately and uses
    /// vibration plus a longer display delay on hang-up.
    fn supports_native_playback(&self) -> bool;

    /// Request audio permission and apply the playback mode
    async fn prepare(&self, mode: AudioMode) -> Result<()>;

    /// Start playing a track; resolves once playback has started
    async fn play(&self, track: Track) -> Result<()>;

    /// Stop a track
    async fn stop(&self, track: Track) -> Result<()>;
}

/// Vibration capability
pub trait Vibrator: Send + Sync {
    fn vibrate(&self, pattern: &[Duration]);
}

/// Audio player for environments without native playback
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudioPlayer;

#[async_trait]
impl AudioPlayer for SilentAudioPlayer {
    fn supports_native_playback(&self) -> bool {
        false
    }

    async fn prepare(&self, _mode: AudioMode) -> Result<()> {
        Ok(())
    }

    async fn play(&self, track: Track) -> Result<()> {
        debug!("Silent audio: skipping {}", track.as_str());
        Ok(())
    }

    async fn stop(&self, _track: Track) -> Result<()> {
        Ok(())
    }
}
