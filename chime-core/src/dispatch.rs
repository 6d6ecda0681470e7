//! Audio dispatch
//!
//! Pulls intents from the policy queues and starts at most one track per
//! tick. Security intents always win. A welcome greeting interrupts
//! anything and shields itself: other notifications popped while it plays
//! are deferred and replayed once the module goes quiet, after checking
//! that any warning they announce is still active.
//!
//! With nothing else to do the dispatcher keeps the seatbelt chime looping
//! for as long as a seatbelt warning is active.

use chime_hal::{AudioError, AudioEvent, AudioPlayer};
use chime_protocol::tracks;

use crate::policy::{IntentKind, PlayIntent, PolicyEngine};
use crate::queue::RingQueue;
use crate::state::StateTracker;

pub const DEFERRED_CAPACITY: usize = 8;

/// What the dispatcher believes the module is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NowPlaying {
    #[default]
    Nothing,
    Welcome,
    Other,
}

/// Outcome of one [`Dispatcher::service`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatched {
    /// No track was started this tick
    Idle,
    Played(u16),
    /// Parked behind the welcome greeting
    Deferred(u16),
    /// Deferred warning whose code cleared while waiting
    Dropped(u16),
    Failed(AudioError),
}

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    deferred: RingQueue<PlayIntent, DEFERRED_CAPACITY>,
    now_playing: NowPlaying,
    was_playing: bool,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_playing(&self) -> NowPlaying {
        self.now_playing
    }

    pub fn deferred(&self) -> usize {
        self.deferred.len()
    }

    /// Run one dispatch step
    pub fn service<A: AudioPlayer>(
        &mut self,
        policy: &mut PolicyEngine,
        tracker: &StateTracker,
        audio: &mut A,
    ) -> Dispatched {
        while let Some(event) = audio.poll() {
            match event {
                AudioEvent::Finished(track) => trace!("track {=u16} finished", track),
                AudioEvent::MediaReady => info!("audio media ready"),
                AudioEvent::Fault(code) => warn!("audio fault {=u8}", code),
            }
        }

        let playing = audio.is_playing();
        if self.was_playing && !playing {
            debug!("playback ended");
            self.now_playing = NowPlaying::Nothing;
        }
        self.was_playing = playing;

        if let Some(intent) = policy.pop_security() {
            audio.stop_if_playing(tracks::SEATBELT);
            return self.start(audio, intent.track, NowPlaying::Other);
        }

        if !playing && !self.deferred.is_empty() {
            return self.replay_deferred(audio, tracker);
        }

        if let Some(intent) = policy.pop_notification() {
            return self.notify(audio, intent);
        }

        self.seatbelt_loop(audio, tracker)
    }

    fn notify<A: AudioPlayer>(&mut self, audio: &mut A, intent: PlayIntent) -> Dispatched {
        if intent.kind == IntentKind::Welcome {
            if audio.is_playing() {
                audio.stop();
            }
            return self.start(audio, intent.track, NowPlaying::Welcome);
        }

        // Anything already parked goes first
        if self.now_playing == NowPlaying::Welcome || !self.deferred.is_empty() {
            debug!("deferred track {=u16}", intent.track);
            if let Some(old) = self.deferred.push(intent) {
                warn!("deferred queue full, dropped track {=u16}", old.track);
            }
            return Dispatched::Deferred(intent.track);
        }

        self.start(audio, intent.track, NowPlaying::Other)
    }

    fn replay_deferred<A: AudioPlayer>(
        &mut self,
        audio: &mut A,
        tracker: &StateTracker,
    ) -> Dispatched {
        let Some(intent) = self.deferred.pop() else {
            return Dispatched::Idle;
        };
        if let (IntentKind::WarningCode, Some(code)) = (intent.kind, intent.code) {
            if code != 0 && !tracker.is_warning_active(code) {
                info!("dropped stale warning {=u16}", code);
                return Dispatched::Dropped(intent.track);
            }
        }
        self.start(audio, intent.track, NowPlaying::Other)
    }

    fn seatbelt_loop<A: AudioPlayer>(
        &mut self,
        audio: &mut A,
        tracker: &StateTracker,
    ) -> Dispatched {
        if !tracker.state().seatbelt_active {
            if audio.is_playing() && audio.current_track() == tracks::SEATBELT {
                debug!("seatbelt cleared");
                audio.stop();
                self.was_playing = false;
                self.now_playing = NowPlaying::Nothing;
            }
            return Dispatched::Idle;
        }
        if audio.is_playing() {
            return Dispatched::Idle;
        }
        self.start(audio, tracks::SEATBELT, NowPlaying::Other)
    }

    fn start<A: AudioPlayer>(&mut self, audio: &mut A, track: u16, slot: NowPlaying) -> Dispatched {
        match audio.play_track(track) {
            Ok(()) => {
                info!("play track {=u16}", track);
                self.now_playing = slot;
                self.was_playing = true;
                Dispatched::Played(track)
            }
            Err(e) => {
                warn!("play track {=u16} failed: {}", track, e);
                Dispatched::Failed(e)
            }
        }
    }
}
