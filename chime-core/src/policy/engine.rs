//! Alert policy
//!
//! Turns tracked state changes into play intents. Two inputs per tick:
//!
//! 1. [`PolicyEngine::on_applied`] for every distinct frame, right after the
//!    tracker has applied it (warning codes, ignition edges, sport button).
//! 2. [`PolicyEngine::process_events`] once per tick, draining the key,
//!    handbrake and door queues (welcome, goodbye, fuel reminder, radio).
//!
//! Intents with a priority above notification land on the security queue;
//! the rest on the notification queue. Both queues are FIFO.

use chime_protocol::tracks::{self, track_for_code};
use chime_protocol::{KeyCode, SportMode, WarningCode, WarningStatus};

use super::classify::classify;
use super::intent::{IntentKind, PlayIntent, Priority};
use crate::config::{PolicyConfig, RadioConfig};
use crate::queue::RingQueue;
use crate::state::{Applied, CarState, DoorEvent, DoorEventKind, IgnitionEdge, StateTracker};

pub const SECURITY_QUEUE_CAPACITY: usize = 24;
pub const NOTIFICATION_QUEUE_CAPACITY: usize = 32;

/// Seed used when none (or zero) is supplied
const DEFAULT_SEED: u32 = 0x2545_F491;

/// Arrival greeting window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WelcomeWindow {
    Idle,
    /// Armed by an unlock
    Armed {
        deadline_ms: u32,
        /// Another door opened first; wait for the driver indefinitely
        hold: bool,
    },
}

/// Check if `now` is strictly before `deadline`, tolerating timer wrap
fn before(now_ms: u32, deadline_ms: u32) -> bool {
    (now_ms.wrapping_sub(deadline_ms) as i32) < 0
}

#[derive(Debug, Clone)]
pub struct PolicyEngine {
    config: PolicyConfig,
    radio: RadioConfig,
    security: RingQueue<PlayIntent, SECURITY_QUEUE_CAPACITY>,
    notification: RingQueue<PlayIntent, NOTIFICATION_QUEUE_CAPACITY>,
    welcome: WelcomeWindow,
    goodbye_armed: bool,
    /// Gong already played for the current ignition cycle
    gong_played: bool,
    /// Last warning update was the all-clear
    all_clear: bool,
    radio_level: bool,
    radio_pending: Option<bool>,
    rng: u32,
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::new(&PolicyConfig::default(), &RadioConfig::default())
    }
}

impl PolicyEngine {
    /// Create an engine with nothing armed and the radio line low
    pub fn new(config: &PolicyConfig, radio: &RadioConfig) -> Self {
        Self {
            config: *config,
            radio: *radio,
            security: RingQueue::new(),
            notification: RingQueue::new(),
            welcome: WelcomeWindow::Idle,
            goodbye_armed: false,
            gong_played: false,
            all_clear: true,
            radio_level: false,
            radio_pending: None,
            rng: DEFAULT_SEED,
        }
    }

    /// Seed the goodbye phrasing picker
    pub fn seed(&mut self, seed: u32) {
        self.rng = if seed == 0 { DEFAULT_SEED } else { seed };
    }

    pub fn welcome(&self) -> WelcomeWindow {
        self.welcome
    }

    pub fn goodbye_armed(&self) -> bool {
        self.goodbye_armed
    }

    pub fn pop_security(&mut self) -> Option<PlayIntent> {
        self.security.pop()
    }

    pub fn pop_notification(&mut self) -> Option<PlayIntent> {
        self.notification.pop()
    }

    /// Number of intents waiting on (security, notification)
    pub fn pending(&self) -> (usize, usize) {
        (self.security.len(), self.notification.len())
    }

    /// Intents lost to queue overflow since boot
    pub fn dropped(&self) -> u32 {
        self.security.dropped().wrapping_add(self.notification.dropped())
    }

    /// Radio level requested since the last call, if it changed
    pub fn take_radio_change(&mut self) -> Option<bool> {
        self.radio_pending.take()
    }

    /// React to a frame the tracker has just applied
    pub fn on_applied(&mut self, applied: &Applied, state: &CarState, now_ms: u32) {
        match *applied {
            Applied::Ignition { on, edge } => self.on_ignition(on, edge, state, now_ms),
            Applied::Warning {
                warning,
                newly_active,
            } => self.on_warning(warning, newly_active, now_ms),
            Applied::Sport { mode, changed } if changed && state.ignition_on => {
                let (kind, track) = match mode {
                    SportMode::On => (IntentKind::SportOn, tracks::SPORT_ON),
                    SportMode::Off => (IntentKind::SportOff, tracks::SPORT_OFF),
                };
                self.post(PlayIntent::notification(kind, track, now_ms));
            }
            _ => {}
        }
    }

    /// Drain the tracker's event queues and apply the door/key rules
    pub fn process_events(&mut self, tracker: &mut StateTracker, now_ms: u32) {
        while let Some(ev) = tracker.next_key_event() {
            match ev.code {
                KeyCode::Unlock => {
                    self.welcome = WelcomeWindow::Armed {
                        deadline_ms: ev.at_ms.wrapping_add(self.config.welcome_window_ms),
                        hold: false,
                    };
                    debug!("welcome armed");
                    let battery_ok = tracker.state().battery_at_least(self.radio.min_volts);
                    if !battery_ok {
                        info!("radio kept off, battery not OK");
                    }
                    self.set_radio(battery_ok);
                }
                KeyCode::Lock => self.set_radio(false),
                KeyCode::Trunk | KeyCode::Other(_) => {}
            }
        }

        while let Some(ev) = tracker.next_handbrake_event() {
            debug!("handbrake {}", ev.kind);
        }

        while let Some(ev) = tracker.next_door_event() {
            self.on_door(ev, tracker);
        }

        if let WelcomeWindow::Armed {
            deadline_ms,
            hold: false,
        } = self.welcome
        {
            if !before(now_ms, deadline_ms) {
                debug!("welcome window expired");
                self.welcome = WelcomeWindow::Idle;
            }
        }
    }

    fn on_ignition(&mut self, on: bool, edge: Option<IgnitionEdge>, state: &CarState, now_ms: u32) {
        if on && !self.gong_played {
            self.post(PlayIntent::notification(
                IntentKind::IgnitionGong,
                tracks::IGNITION_GONG,
                now_ms,
            ));
            self.gong_played = true;
        } else if !on {
            self.gong_played = false;
        }

        match edge {
            Some(IgnitionEdge::Off) => {
                self.goodbye_armed = true;
                if !state.handbrake_engaged {
                    self.post(PlayIntent {
                        kind: IntentKind::HandbrakeWarning,
                        track: tracks::HANDBRAKE_DOWN,
                        code: None,
                        priority: Priority::DriveNow,
                        at_ms: now_ms,
                    });
                }
                if self.radio.hold_after_ignition_off {
                    self.set_radio(true);
                }
            }
            Some(IgnitionEdge::On) => self.goodbye_armed = false,
            None => {}
        }
    }

    fn on_warning(&mut self, warning: WarningCode, newly_active: bool, now_ms: u32) {
        let WarningCode { code, status } = warning;
        match status {
            // Code 0 means all clear whatever the status byte says
            _ if code == 0 => {
                if !self.all_clear {
                    self.all_clear = true;
                    self.post(PlayIntent {
                        kind: IntentKind::WarningCode,
                        track: tracks::ALL_CLEAR,
                        code: Some(0),
                        priority: Priority::Notification,
                        at_ms: now_ms,
                    });
                }
            }
            WarningStatus::Active => {
                self.all_clear = false;
                if newly_active {
                    self.post(PlayIntent {
                        kind: IntentKind::WarningCode,
                        track: track_for_code(code),
                        code: Some(code),
                        priority: classify(code),
                        at_ms: now_ms,
                    });
                }
            }
            WarningStatus::Cleared => self.all_clear = false,
        }
    }

    fn on_door(&mut self, ev: DoorEvent, tracker: &mut StateTracker) {
        let driver_opened = ev.kind == DoorEventKind::DriverOpened;

        if let WelcomeWindow::Armed { deadline_ms, hold } = self.welcome {
            if driver_opened && (hold || before(ev.at_ms, deadline_ms)) {
                self.welcome = WelcomeWindow::Idle;
                self.post(PlayIntent::notification(
                    IntentKind::Welcome,
                    tracks::WELCOME,
                    ev.at_ms,
                ));
                return;
            }
            if ev.kind.is_open() && !driver_opened {
                self.welcome = WelcomeWindow::Armed {
                    deadline_ms,
                    hold: true,
                };
            }
        }

        if !driver_opened || tracker.state().ignition_on {
            return;
        }

        if tracker.state().low_fuel_reminder_armed {
            self.post(PlayIntent::notification(
                IntentKind::FuelReminder,
                tracks::FUEL_REMINDER,
                ev.at_ms,
            ));
            tracker.consume_fuel_reminder();
        }

        let state = tracker.state();
        if self.goodbye_armed && !state.any_warning_active && !state.low_fuel_reminder_armed {
            let variants = if state.passenger_seen_since_unlock {
                tracks::GOODBYE_WITH_PASSENGER
            } else {
                tracks::GOODBYE_SOLO
            };
            let track = variants[usize::from(self.next_bit())];
            self.post(PlayIntent::notification(IntentKind::Goodbye, track, ev.at_ms));
            self.goodbye_armed = false;
        }
    }

    fn post(&mut self, intent: PlayIntent) {
        info!(
            "post {} track {=u16} prio {=u8}",
            intent.kind,
            intent.track,
            intent.priority.level()
        );
        let evicted = if intent.priority.is_security() {
            self.security.push(intent)
        } else {
            self.notification.push(intent)
        };
        if let Some(old) = evicted {
            warn!(
                "intent queue full, dropped track {=u16} ({=u32} so far)",
                old.track,
                self.dropped()
            );
        }
    }

    fn set_radio(&mut self, high: bool) {
        if high != self.radio_level {
            info!("radio {}", if high { "high" } else { "low" });
            self.radio_level = high;
            self.radio_pending = Some(high);
        }
    }

    /// xorshift32, one bit per call
    fn next_bit(&mut self) -> u8 {
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng = x;
        (x & 1) as u8
    }
}
