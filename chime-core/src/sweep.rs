//! Gauge sweep
//!
//! A start-up animation of the speedometer and tachometer needles. Purely
//! time driven: the only vehicle input is the ignition flag. State
//! transitions happen in [`SweepEngine::tick`] once their deadline has
//! passed, so the loop never blocks.
//!
//! ```text
//! Idle ──(OFF→ON, start delay)──▶ WaitDelay ──▶ ToPeakSecondAxis ──▶ Peak
//!  ▲                                                                  │
//!  └──────────── ToStopSecondAxis ◀──────── ToStopFirstAxis ◀─────────┘
//! ```
//!
//! Ignition OFF at any point forces `Idle` immediately. A sweep only runs
//! after an ignition OFF has been seen since boot, so a warm reset while
//! driving does not animate the cluster.

use chime_hal::CanBus;
use chime_protocol::cluster::{self, Gauge};

use crate::config::SweepConfig;

/// Transmissions per needle move
pub const BURST_COUNT: u8 = 2;

/// Sweep phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SweepState {
    Idle,
    /// Lead-in before the first needle moves
    WaitDelay,
    /// First needle at peak, second about to follow
    ToPeakSecondAxis,
    /// Both needles holding at peak
    Peak,
    /// About to release the first needle
    ToStopFirstAxis,
    /// First needle released, second about to follow
    ToStopSecondAxis,
}

#[derive(Debug, Clone)]
pub struct SweepEngine {
    config: SweepConfig,
    command_id: u16,
    state: SweepState,
    deadline_ms: u32,
    ignition_on: bool,
    seen_off: bool,
    armed: bool,
    armed_at_ms: u32,
}

impl SweepEngine {
    pub fn new(config: &SweepConfig, command_id: u16) -> Self {
        Self {
            config: *config,
            command_id,
            state: SweepState::Idle,
            deadline_ms: 0,
            ignition_on: false,
            seen_off: false,
            armed: false,
            armed_at_ms: 0,
        }
    }

    pub fn state(&self) -> SweepState {
        self.state
    }

    /// Check if an OFF→ON edge is waiting out the start delay
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Feed every decoded ignition frame
    pub fn on_ignition(&mut self, on: bool, now_ms: u32) {
        if !on {
            self.seen_off = true;
            self.armed = false;
            if self.state != SweepState::Idle {
                info!("sweep cancelled in {}", self.state);
                self.state = SweepState::Idle;
            }
        } else if !self.ignition_on && self.seen_off && self.config.enabled {
            debug!("sweep armed");
            self.armed = true;
            self.armed_at_ms = now_ms;
        }
        self.ignition_on = on;
    }

    /// Advance the sweep, transmitting needle commands as phases complete
    pub fn tick<B: CanBus>(&mut self, bus: &mut B, now_ms: u32) -> SweepState {
        if self.armed
            && self.ignition_on
            && now_ms.wrapping_sub(self.armed_at_ms) >= u32::from(self.config.start_after_ms)
        {
            self.armed = false;
            self.enter(SweepState::WaitDelay, now_ms, self.lead_ms());
        }

        if self.state == SweepState::Idle {
            return self.state;
        }
        if !self.ignition_on {
            self.state = SweepState::Idle;
            return self.state;
        }
        if (now_ms.wrapping_sub(self.deadline_ms) as i32) < 0 {
            return self.state;
        }

        let (first, second) = self.axis_order();
        let gap = self.gap_ms();
        match self.state {
            SweepState::WaitDelay => {
                self.drive(bus, first);
                self.enter(SweepState::ToPeakSecondAxis, now_ms, gap);
            }
            SweepState::ToPeakSecondAxis => {
                self.drive(bus, second);
                self.enter(SweepState::Peak, now_ms, self.config.peak_dwell_ms);
            }
            SweepState::Peak => {
                self.enter(SweepState::ToStopFirstAxis, now_ms, self.lead_ms());
            }
            SweepState::ToStopFirstAxis => {
                self.release(bus, first);
                self.enter(SweepState::ToStopSecondAxis, now_ms, gap);
            }
            SweepState::ToStopSecondAxis => {
                self.release(bus, second);
                self.enter(SweepState::Idle, now_ms, 0);
            }
            SweepState::Idle => {}
        }
        self.state
    }

    fn enter(&mut self, state: SweepState, now_ms: u32, after_ms: u16) {
        trace!("sweep {} +{=u16}ms", state, after_ms);
        self.state = state;
        self.deadline_ms = now_ms.wrapping_add(u32::from(after_ms));
    }

    /// The axis with the shorter lead-in moves first
    fn axis_order(&self) -> (Gauge, Gauge) {
        if self.config.speed_delay_ms <= self.config.tacho_delay_ms {
            (Gauge::Speedometer, Gauge::Tachometer)
        } else {
            (Gauge::Tachometer, Gauge::Speedometer)
        }
    }

    fn lead_ms(&self) -> u16 {
        self.config.speed_delay_ms.min(self.config.tacho_delay_ms)
    }

    fn gap_ms(&self) -> u16 {
        self.config.speed_delay_ms.abs_diff(self.config.tacho_delay_ms)
    }

    fn drive<B: CanBus>(&self, bus: &mut B, gauge: Gauge) {
        let raw = match gauge {
            Gauge::Speedometer => cluster::kmh_to_raw(self.config.target_kmh),
            Gauge::Tachometer => cluster::rpm_to_raw(self.config.target_rpm),
        };
        self.burst(bus, &cluster::drive(self.command_id, gauge, raw));
    }

    fn release<B: CanBus>(&self, bus: &mut B, gauge: Gauge) {
        self.burst(bus, &cluster::release(self.command_id, gauge));
    }

    fn burst<B: CanBus>(&self, bus: &mut B, frame: &chime_protocol::CanFrame) {
        for _ in 0..BURST_COUNT {
            if let Err(e) = bus.transmit(frame) {
                warn!("sweep transmit failed: {}", e);
            }
        }
    }
}
