//! Call Sessions
//!
//! A [`CallSession`] simulates one outgoing call, from the moment the call
//! screen opens until the user is sent back to the contact list.
//!
//! ## Lifecycle
//!
//! - **Connecting**: two timers start. The connect timeout (60 s) and the
//!   establish operation, which prepares audio and plays the ringback tone.
//!   When the tone is ready the call is *connected*.
//! - **Ringing**: the connect timeout is cancelled, the phone vibrates and the
//!   ringback tone stops.
//! - **Active**: the call clock counts seconds until the user hangs up.
//! - **Ending**: the user hung up. The end tone plays and, after a short
//!   display delay, the session moves to **Ended** and returns to the list.
//! - **Failed**: nothing connected within the timeout. After the failure
//!   message has been shown the session returns to the list. No retry.
//!
//! Without native audio the establish operation connects immediately and
//! hang-up vibrates instead of playing a tone, with a longer display delay.
//!
//! ## Timers
//!
//! Every timer is a spawned task whose handle the session owns. Leaving a phase
//! cancels the timers that phase started, and every timer re-checks the phase
//! under the session lock before acting, so a late wake-up can never undo a
//! newer transition. Dropping the session cancels everything that is left.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let session = CallSession::start(params, context, CallTimings::default());
//! let mut events = session.subscribe();
//!
//! // ... later, the user taps "End Call"
//! session.end_call()?;
//! session.finished().await;
//! ```

mod phase;
mod timers;

pub use phase::{format_duration, CallPhase};
pub use timers::{
    CallTimings, CONNECT_TIMEOUT, END_DELAY_FALLBACK, END_DELAY_NATIVE, FAILURE_DISPLAY_DELAY,
    TICK_INTERVAL,
};

use crate::audio::{AudioMode, AudioPlayer, Track, Vibrator, VIBRATION_PATTERN};
use crate::navigation::{self, CallParams, Navigator};
use crate::{DialerError, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use timers::CallTimers;
use tokio::sync::broadcast;
use tokio::time::{sleep, sleep_until, timeout_at, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Capabilities a call session needs from its environment
#[derive(Clone)]
pub struct CallContext {
    pub audio: Arc<dyn AudioPlayer>,
    pub vibrator: Arc<dyn Vibrator>,
    pub navigator: Arc<dyn Navigator>,
    pub audio_mode: AudioMode,
}

impl CallContext {
    pub fn new(
        audio: Arc<dyn AudioPlayer>,
        vibrator: Arc<dyn Vibrator>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            audio,
            vibrator,
            navigator,
            audio_mode: AudioMode::default(),
        }
    }
}

/// Events published by a call session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallEvent {
    PhaseChanged { from: CallPhase, to: CallPhase },
    /// Call clock advanced; carries the new elapsed seconds
    Tick(u64),
    /// The session sent the user back to the contact list
    ReturnedToContacts,
}

/// Point-in-time view of a call session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSnapshot {
    pub id: Uuid,
    pub callee_name: String,
    pub callee_number: String,
    pub avatar: String,
    pub phase: CallPhase,
    pub elapsed_seconds: u64,
    pub failed: bool,
}

impl CallSnapshot {
    pub fn status_text(&self) -> String {
        self.phase.status_text(self.elapsed_seconds)
    }
}

#[derive(Debug)]
struct CallState {
    phase: CallPhase,
    elapsed_seconds: u64,
    failed: bool,
    returned: bool,
    timers: CallTimers,
}

struct Shared {
    id: Uuid,
    params: CallParams,
    context: CallContext,
    timings: CallTimings,
    state: Mutex<CallState>,
    event_tx: broadcast::Sender<CallEvent>,
}

impl Shared {
    // No task panics while holding the lock, so a poisoned guard is still consistent.
    fn lock(&self) -> MutexGuard<'_, CallState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn native_audio(&self) -> bool {
        self.context.audio.supports_native_playback()
    }

    fn set_phase(&self, state: &mut CallState, to: CallPhase) {
        let from = state.phase;
        state.phase = to;
        debug!("Call {}: {} -> {}", self.id, from.as_str(), to.as_str());
        let _ = self.event_tx.send(CallEvent::PhaseChanged { from, to });
    }

    fn return_to_contacts(&self) {
        self.lock().returned = true;
        navigation::return_to_contacts(self.context.navigator.as_ref());
        info!("Call {} left the call screen", self.id);
        let _ = self.event_tx.send(CallEvent::ReturnedToContacts);
    }
}

/// One simulated outgoing call
pub struct CallSession {
    shared: Arc<Shared>,
}

impl CallSession {
    /// Open the call screen and start connecting
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(params: CallParams, context: CallContext, timings: CallTimings) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        let shared = Arc::new(Shared {
            id: Uuid::new_v4(),
            params,
            context,
            timings,
            state: Mutex::new(CallState {
                phase: CallPhase::Connecting,
                elapsed_seconds: 0,
                failed: false,
                returned: false,
                timers: CallTimers::default(),
            }),
            event_tx,
        });

        info!(
            "Calling {} ({}), session {}",
            shared.params.callee_name, shared.params.callee_number, shared.id
        );

        {
            let mut state = shared.lock();
            state.timers.connect_timeout = Some(tokio::spawn(run_connect_timeout(shared.clone())));
            state.timers.establish = Some(tokio::spawn(run_establish(shared.clone())));
        }

        Self { shared }
    }

    /// Hang up
    ///
    /// Valid while connecting, ringing or active. Cancels the call clock and any
    /// pending connect timeout, then leaves the call screen after the end-tone
    /// display delay.
    pub fn end_call(&self) -> Result<()> {
        let shared = &self.shared;
        let mut state = shared.lock();

        if !state.phase.can_end() {
            return Err(DialerError::invalid_state(format!(
                "cannot end a call that is {}",
                state.phase.as_str()
            )));
        }

        state.timers.cancel_connect_timeout();
        state.timers.cancel_establish();
        state.timers.cancel_clock();
        shared.set_phase(&mut state, CallPhase::Ending);
        state.timers.exit = Some(tokio::spawn(run_hang_up(shared.clone())));

        info!(
            "Call {} ended by user after {} s",
            shared.id, state.elapsed_seconds
        );
        Ok(())
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<CallEvent> {
        self.shared.event_tx.subscribe()
    }

    /// Wait until the session has sent the user back to the contact list
    pub async fn finished(&self) {
        let mut events = self.subscribe();
        let returned = self.shared.lock().returned;
        if returned {
            return;
        }

        loop {
            match events.recv().await {
                Ok(CallEvent::ReturnedToContacts) => return,
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => {
                    let returned = self.shared.lock().returned;
                    if returned {
                        return;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => return,
            }
        }
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn params(&self) -> &CallParams {
        &self.shared.params
    }

    pub fn phase(&self) -> CallPhase {
        self.shared.lock().phase
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.shared.lock().elapsed_seconds
    }

    pub fn is_failed(&self) -> bool {
        self.shared.lock().failed
    }

    pub fn status_text(&self) -> String {
        let state = self.shared.lock();
        state.phase.status_text(state.elapsed_seconds)
    }

    pub fn snapshot(&self) -> CallSnapshot {
        let state = self.shared.lock();
        CallSnapshot {
            id: self.shared.id,
            callee_name: self.shared.params.callee_name.clone(),
            callee_number: self.shared.params.callee_number.clone(),
            avatar: self.shared.params.avatar.clone(),
            phase: state.phase,
            elapsed_seconds: state.elapsed_seconds,
            failed: state.failed,
        }
    }
}

impl Drop for CallSession {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        if !state.phase.is_terminal() {
            debug!(
                "Call {} closed while {}",
                self.shared.id,
                state.phase.as_str()
            );
        }
        state.timers.cancel_all();
    }
}

/// Fail the call if nothing connected in time
async fn run_connect_timeout(shared: Arc<Shared>) {
    sleep(shared.timings.connect_timeout).await;

    {
        let mut state = shared.lock();
        if state.phase != CallPhase::Connecting {
            return;
        }

        warn!(
            "Call {} not connected after {:?}",
            shared.id, shared.timings.connect_timeout
        );
        state.failed = true;
        state.timers.cancel_establish();
        // This task now carries the delayed exit
        state.timers.exit = state.timers.connect_timeout.take();
        shared.set_phase(&mut state, CallPhase::Failed);
    }

    sleep(shared.timings.failure_display).await;
    shared.return_to_contacts();
}

/// Play the ringback tone, then connect and simulate the ring
async fn run_establish(shared: Arc<Shared>) {
    let audio = shared.context.audio.clone();
    let native = shared.native_audio();

    if native {
        if let Err(e) = audio.prepare(shared.context.audio_mode).await {
            warn!("Audio setup failed for call {}: {}", shared.id, e);
        }
        if let Err(e) = audio.play(Track::Ringtone).await {
            warn!("Failed to play ringback for call {}: {}", shared.id, e);
        }
    }

    {
        let mut state = shared.lock();
        if state.phase != CallPhase::Connecting {
            return;
        }
        state.timers.cancel_connect_timeout();
        shared.set_phase(&mut state, CallPhase::Ringing);
    }

    shared.context.vibrator.vibrate(&VIBRATION_PATTERN);
    if native {
        if let Err(e) = audio.stop(Track::Ringtone).await {
            warn!("Failed to stop ringback for call {}: {}", shared.id, e);
        }
    }

    let mut state = shared.lock();
    if state.phase != CallPhase::Ringing {
        return;
    }
    // Finishing; detach rather than abort our own handle
    state.timers.establish.take();
    shared.set_phase(&mut state, CallPhase::Active);
    state.timers.clock = Some(tokio::spawn(run_clock(shared.clone())));
}

/// Count call seconds while active
async fn run_clock(shared: Arc<Shared>) {
    let period = shared.timings.tick_interval;
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);

    loop {
        interval.tick().await;

        let active = {
            let mut state = shared.lock();
            if state.phase == CallPhase::Active {
                state.elapsed_seconds += 1;
                let _ = shared.event_tx.send(CallEvent::Tick(state.elapsed_seconds));
                true
            } else {
                false
            }
        };

        if !active {
            break;
        }
    }
}

/// Play the end tone and leave the call screen after the display delay
async fn run_hang_up(shared: Arc<Shared>) {
    let native = shared.native_audio();
    let deadline = Instant::now() + shared.timings.end_delay(native);

    if native {
        let audio = shared.context.audio.clone();
        let mode = shared.context.audio_mode;
        let id = shared.id;

        let tone = async move {
            if let Err(e) = audio.stop(Track::Ringtone).await {
                debug!("Ringback already stopped for call {}: {}", id, e);
            }
            if let Err(e) = audio.prepare(mode).await {
                warn!("Audio setup failed for call {}: {}", id, e);
            }
            if let Err(e) = audio.play(Track::Endtone).await {
                warn!("Failed to play end tone for call {}: {}", id, e);
            }
        };

        if timeout_at(deadline, tone).await.is_err() {
            warn!("End tone for call {} did not start in time", shared.id);
        }
    } else {
        shared.context.vibrator.vibrate(&VIBRATION_PATTERN);
    }

    sleep_until(deadline).await;

    {
        let mut state = shared.lock();
        if state.phase != CallPhase::Ending {
            return;
        }
        state.timers.exit.take();
        shared.set_phase(&mut state, CallPhase::Ended);
    }

    shared.return_to_contacts();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockAudioPlayer, RecordingNavigator, RecordingVibrator};
    use std::time::Duration;

    fn params() -> CallParams {
        CallParams {
            callee_name: "Ms.Ada Lovelace".to_string(),
            callee_number: "100".to_string(),
            avatar: "m.jpg".to_string(),
        }
    }

    fn start_with(
        audio: MockAudioPlayer,
    ) -> (CallSession, Arc<MockAudioPlayer>, Arc<RecordingNavigator>) {
        let audio = Arc::new(audio);
        let navigator = Arc::new(RecordingNavigator::new());
        let context = CallContext::new(
            audio.clone(),
            Arc::new(RecordingVibrator::default()),
            navigator.clone(),
        );
        let session = CallSession::start(params(), context, CallTimings::default());
        (session, audio, navigator)
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_connecting() {
        let (session, _, _) = start_with(MockAudioPlayer::native_never_ready());

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, CallPhase::Connecting);
        assert_eq!(snapshot.elapsed_seconds, 0);
        assert!(!snapshot.failed);
        assert_eq!(snapshot.status_text(), "Connecting...");
        assert_eq!(snapshot.callee_number, "100");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_connects_immediately() {
        let (session, _, _) = start_with(MockAudioPlayer::fallback());

        sleep(Duration::from_millis(10)).await;
        assert_eq!(session.phase(), CallPhase::Active);

        sleep(Duration::from_millis(3000)).await;
        assert_eq!(session.elapsed_seconds(), 3);
        assert_eq!(session.status_text(), "00:03");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ringback_played_and_stopped() {
        let (session, audio, _) = start_with(MockAudioPlayer::native(Duration::from_secs(2)));

        sleep(Duration::from_millis(2500)).await;
        assert_eq!(session.phase(), CallPhase::Active);
        assert_eq!(audio.played(), vec![Track::Ringtone]);
        assert_eq!(audio.stopped(), vec![Track::Ringtone]);
        assert_eq!(audio.prepare_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_vibrates_on_fallback_connect_and_hang_up() {
        let vibrator = Arc::new(RecordingVibrator::default());
        let context = CallContext::new(
            Arc::new(MockAudioPlayer::fallback()),
            vibrator.clone(),
            Arc::new(RecordingNavigator::new()),
        );
        let session = CallSession::start(params(), context, CallTimings::default());

        sleep(Duration::from_millis(10)).await;
        assert_eq!(vibrator.count(), 1);

        session.end_call().unwrap();
        session.finished().await;
        assert_eq!(vibrator.count(), 2);
        assert!(session.phase().is_terminal());
    }

    #[tokio::test(start_paused = true)]
    async fn test_native_hang_up_plays_tone_instead_of_vibrating() {
        let vibrator = Arc::new(RecordingVibrator::default());
        let context = CallContext::new(
            Arc::new(MockAudioPlayer::native(Duration::from_secs(1))),
            vibrator.clone(),
            Arc::new(RecordingNavigator::new()),
        );
        let session = CallSession::start(params(), context, CallTimings::default());

        sleep(Duration::from_secs(2)).await;
        assert_eq!(session.phase(), CallPhase::Active);
        assert_eq!(vibrator.count(), 1);

        session.end_call().unwrap();
        session.finished().await;
        assert_eq!(vibrator.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_call_twice_is_invalid() {
        let (session, _, _) = start_with(MockAudioPlayer::fallback());

        sleep(Duration::from_millis(10)).await;
        assert!(session.end_call().is_ok());
        assert_eq!(session.phase(), CallPhase::Ending);

        let second = session.end_call();
        assert!(matches!(second, Err(DialerError::InvalidState(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_stops_on_hang_up() {
        let (session, _, navigator) = start_with(MockAudioPlayer::fallback());

        sleep(Duration::from_millis(5500)).await;
        assert_eq!(session.elapsed_seconds(), 5);
        session.end_call().unwrap();

        sleep(Duration::from_secs(10)).await;
        assert_eq!(session.elapsed_seconds(), 5);
        assert_eq!(session.phase(), CallPhase::Ended);
        assert_eq!(navigator.returns_to_contacts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_audio_failure_does_not_block_connect() {
        let (session, _, _) = start_with(MockAudioPlayer::native_failing());

        sleep(Duration::from_millis(100)).await;
        assert_eq!(session.phase(), CallPhase::Active);
        assert!(!session.is_failed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_in_order() {
        let (session, _, _) = start_with(MockAudioPlayer::native(Duration::from_secs(1)));
        let mut events = session.subscribe();

        assert_eq!(
            events.recv().await.unwrap(),
            CallEvent::PhaseChanged {
                from: CallPhase::Connecting,
                to: CallPhase::Ringing
            }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            CallEvent::PhaseChanged {
                from: CallPhase::Ringing,
                to: CallPhase::Active
            }
        );
        assert_eq!(events.recv().await.unwrap(), CallEvent::Tick(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_navigation() {
        let (session, _, navigator) = start_with(MockAudioPlayer::native_never_ready());

        sleep(Duration::from_secs(61)).await;
        assert_eq!(session.phase(), CallPhase::Failed);
        drop(session);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(navigator.returns_to_contacts(), 0);
    }
}
