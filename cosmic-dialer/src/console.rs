//! Console Capabilities
//!
//! Desktop stand-ins for the phone services a call session needs. Tones and
//! vibration are reported through the log; navigation tracks the screen stack
//! so the CLI can show where the user would be.

use async_trait::async_trait;
use cosmic_dialer_core::{
    AudioMode, AudioPlayer, NavParams, Navigator, Result, Screen, Track, Vibrator,
};
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, info};

/// Audio player that simulates tone playback with a startup latency
pub struct SimulatedAudioPlayer {
    ringback_latency: Duration,
}

impl SimulatedAudioPlayer {
    pub fn new(ringback_latency: Duration) -> Self {
        Self { ringback_latency }
    }
}

#[async_trait]
impl AudioPlayer for SimulatedAudioPlayer {
    fn supports_native_playback(&self) -> bool {
        true
    }

    async fn prepare(&self, mode: AudioMode) -> Result<()> {
        debug!(
            "Audio mode: background={}, silent_mode={}, earpiece={}",
            mode.stays_active_in_background, mode.plays_in_silent_mode, mode.play_through_earpiece
        );
        Ok(())
    }

    async fn play(&self, track: Track) -> Result<()> {
        if track == Track::Ringtone {
            tokio::time::sleep(self.ringback_latency).await;
        }
        info!("Playing {}", track.as_str());
        Ok(())
    }

    async fn stop(&self, track: Track) -> Result<()> {
        debug!("Stopped {}", track.as_str());
        Ok(())
    }
}

/// Vibrator that logs the requested pattern
#[derive(Debug, Default)]
pub struct ConsoleVibrator;

impl Vibrator for ConsoleVibrator {
    fn vibrate(&self, pattern: &[Duration]) {
        let total: Duration = pattern.iter().sum();
        info!("Vibrating ({} pulses, {:?})", pattern.len(), total);
    }
}

/// Navigator that keeps the screen stack in memory
pub struct ConsoleNavigator {
    stack: RwLock<Vec<Screen>>,
}

impl ConsoleNavigator {
    pub fn new() -> Self {
        Self {
            stack: RwLock::new(vec![Screen::Contacts]),
        }
    }

    /// Screen currently on top of the stack
    pub fn current(&self) -> Screen {
        self.stack
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .last()
            .copied()
            .unwrap_or(Screen::Contacts)
    }

    /// Number of screens on the stack
    pub fn depth(&self) -> usize {
        self.stack
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl Default for ConsoleNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for ConsoleNavigator {
    fn pop_to_root(&self) {
        let mut stack = self
            .stack
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        stack.truncate(1);
    }

    fn navigate_to(&self, screen: Screen, params: NavParams) {
        match &params {
            NavParams::Call(call) => info!("-> {} ({})", screen.as_str(), call.callee_name),
            NavParams::Profile(contact) => {
                info!("-> {} ({})", screen.as_str(), contact.display_name())
            }
            NavParams::None => info!("-> {}", screen.as_str()),
        }

        let mut stack = self
            .stack
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // The root screen is never stacked twice
        if stack.len() == 1 && stack[0] == screen {
            return;
        }
        stack.push(screen);
    }
}
