//! Device coordinating bus intake, policy, sweep and audio
//!
//! One [`Device::tick`] per main-loop iteration:
//! - Drains distinct frames from the bus through the tracker and policy
//! - Processes the queued door, key and handbrake events
//! - Applies radio keep-alive changes
//! - Advances the gauge sweep
//! - Starts at most one track

use chime_hal::{AudioPlayer, BusError, CanBus, OutputPin};
use chime_protocol::BusIds;

use crate::config::ChimeConfig;
use crate::dedup::DedupBuffer;
use crate::dispatch::{Dispatched, Dispatcher};
use crate::policy::PolicyEngine;
use crate::state::{Applied, StateTracker};
use crate::sweep::SweepEngine;

/// Fatal start-up errors
///
/// There is no recovery path; the caller is expected to park in a wait
/// loop until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    Bus(BusError),
}

impl From<BusError> for InitError {
    fn from(e: BusError) -> Self {
        InitError::Bus(e)
    }
}

/// The whole alert core wired to its hardware
pub struct Device<B, A, P> {
    bus: B,
    audio: A,
    radio: P,
    config: ChimeConfig,
    ids: BusIds,
    dedup: DedupBuffer,
    tracker: StateTracker,
    policy: PolicyEngine,
    sweep: SweepEngine,
    dispatcher: Dispatcher,
}

impl<B: CanBus, A: AudioPlayer, P: OutputPin> Device<B, A, P> {
    pub fn new(bus: B, audio: A, radio: P, config: &ChimeConfig) -> Self {
        let ids: BusIds = config.bus.into();
        Self {
            bus,
            audio,
            radio,
            config: *config,
            ids,
            dedup: DedupBuffer::new(&config.dedup),
            tracker: StateTracker::new(ids, config.key, &config.policy),
            policy: PolicyEngine::new(&config.policy, &config.radio),
            sweep: SweepEngine::new(&config.sweep, ids.cluster_command),
            dispatcher: Dispatcher::new(),
        }
    }

    /// Bring up the bus and its filters, set the volume and park the radio line low
    pub fn begin(&mut self) -> Result<(), InitError> {
        if let Err(e) = self.bus.begin() {
            error!("bus init failed: {}", e);
            return Err(e.into());
        }
        if let Err(e) = self.bus.set_filters(&self.ids.accepted()) {
            warn!("bus filters not set: {}", e);
        }
        info!("bus up");

        if let Err(e) = self.audio.set_volume(self.config.audio.volume) {
            warn!("audio volume not set: {}", e);
        }
        self.radio.set_low();
        Ok(())
    }

    /// Seed the goodbye phrasing picker, typically from a hardware RNG
    pub fn seed(&mut self, seed: u32) {
        self.policy.seed(seed);
    }

    /// Run one cooperative loop iteration
    pub fn tick(&mut self, now_ms: u32) -> Dispatched {
        while let Some(frame) = self.dedup.read_distinct(&mut self.bus, now_ms) {
            let applied = self.tracker.apply(&frame, now_ms);
            self.policy.on_applied(&applied, self.tracker.state(), now_ms);
            if let Applied::Ignition { on, .. } = applied {
                self.sweep.on_ignition(on, now_ms);
            }
        }

        self.policy.process_events(&mut self.tracker, now_ms);

        if let Some(high) = self.policy.take_radio_change() {
            self.radio.set_level(high);
        }

        self.sweep.tick(&mut self.bus, now_ms);

        self.dispatcher.service(&mut self.policy, &self.tracker, &mut self.audio)
    }

    pub fn tracker(&self) -> &StateTracker {
        &self.tracker
    }

    pub fn policy(&self) -> &PolicyEngine {
        &self.policy
    }

    pub fn sweep(&self) -> &SweepEngine {
        &self.sweep
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn bus(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn audio(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn radio(&self) -> &P {
        &self.radio
    }
}
