//! State tracker
//!
//! Applies decoded frames to [`CarState`] and turns value changes into
//! queued edge events. Transitions are strictly pairwise (previous vs
//! current); the only debounce beyond the dedup window is the key cooldown.

use heapless::Vec;

use chime_protocol::tracks::{is_low_fuel_code, is_seatbelt_code};
use chime_protocol::{
    decode, BusIds, CanFrame, DoorSnapshot, IgnitionStage, KeyCode, Signal, SportMode,
    WarningCode, WarningStatus,
};

use super::car::{CarState, KeySnapshot, LockState};
use super::events::{
    DoorEvent, DoorEventKind, HandbrakeEvent, HandbrakeEventKind, IgnitionEdge, KeyEvent,
};
use crate::config::{KeyConfig, PolicyConfig};
use crate::queue::RingQueue;

pub const DOOR_QUEUE_CAPACITY: usize = 8;
pub const HANDBRAKE_QUEUE_CAPACITY: usize = 4;
pub const KEY_QUEUE_CAPACITY: usize = 6;
/// Distinct warning codes tracked as active at once
pub const MAX_ACTIVE_WARNINGS: usize = 16;

/// What a frame changed, for consumers that react within the same tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Applied {
    /// Not a tracked frame, too short, or carried no update
    Nothing,
    /// Ignition frame; `edge` is set on a transition
    Ignition {
        on: bool,
        edge: Option<IgnitionEdge>,
    },
    Doors {
        events: u8,
    },
    Handbrake {
        changed: bool,
    },
    /// `None` when the press was absorbed by the cooldown
    Key(Option<KeyCode>),
    /// `newly_active` is set when an ACTIVE report names a code that was
    /// not already active
    Warning {
        warning: WarningCode,
        newly_active: bool,
    },
    Battery {
        volts: f32,
    },
    Sport {
        mode: SportMode,
        changed: bool,
    },
}

/// Single writer of [`CarState`]
#[derive(Debug, Clone)]
pub struct StateTracker {
    ids: BusIds,
    key_config: KeyConfig,
    battery_low_volts: f32,
    state: CarState,
    key: KeySnapshot,
    active_warnings: Vec<u16, MAX_ACTIVE_WARNINGS>,
    /// Low fuel was reported while the ignition was on this cycle
    low_fuel_seen: bool,
    door_events: RingQueue<DoorEvent, DOOR_QUEUE_CAPACITY>,
    handbrake_events: RingQueue<HandbrakeEvent, HANDBRAKE_QUEUE_CAPACITY>,
    key_events: RingQueue<KeyEvent, KEY_QUEUE_CAPACITY>,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new(BusIds::default(), KeyConfig::default(), &PolicyConfig::default())
    }
}

impl StateTracker {
    pub fn new(ids: BusIds, key_config: KeyConfig, policy: &PolicyConfig) -> Self {
        Self {
            ids,
            key_config,
            battery_low_volts: policy.battery_low_volts,
            state: CarState::default(),
            key: KeySnapshot::default(),
            active_warnings: Vec::new(),
            low_fuel_seen: false,
            door_events: RingQueue::new(),
            handbrake_events: RingQueue::new(),
            key_events: RingQueue::new(),
        }
    }

    /// Current vehicle state
    pub fn state(&self) -> &CarState {
        &self.state
    }

    pub fn key_snapshot(&self) -> KeySnapshot {
        self.key
    }

    /// Codes currently reported active, in activation order
    pub fn active_warnings(&self) -> &[u16] {
        &self.active_warnings
    }

    pub fn is_warning_active(&self, code: u16) -> bool {
        self.active_warnings.contains(&code)
    }

    pub fn next_door_event(&mut self) -> Option<DoorEvent> {
        self.door_events.pop()
    }

    pub fn next_handbrake_event(&mut self) -> Option<HandbrakeEvent> {
        self.handbrake_events.pop()
    }

    pub fn next_key_event(&mut self) -> Option<KeyEvent> {
        self.key_events.pop()
    }

    /// Disarm the low-fuel reminder after it has been posted
    pub fn consume_fuel_reminder(&mut self) {
        self.state.low_fuel_reminder_armed = false;
    }

    /// Apply one distinct frame
    pub fn apply(&mut self, frame: &CanFrame, now_ms: u32) -> Applied {
        let Some(signal) = decode(&self.ids, frame) else {
            return Applied::Nothing;
        };

        match signal {
            Signal::Ignition(stage) => self.apply_ignition(stage),
            Signal::Doors(doors) => self.apply_doors(doors, now_ms),
            Signal::Handbrake { engaged } => self.apply_handbrake(engaged, now_ms),
            Signal::KeyFob(raw) => self.apply_key(raw, now_ms),
            Signal::Warning(warning) => self.apply_warning(warning),
            Signal::Battery(volts) => {
                self.state.battery_volts = Some(volts);
                let low = volts < self.battery_low_volts;
                if low != self.state.battery_low {
                    warn!("battery low: {}", low);
                    self.state.battery_low = low;
                }
                Applied::Battery { volts }
            }
            Signal::SportButton(mode) => {
                let on = mode == SportMode::On;
                let changed = on != self.state.sport_mode;
                self.state.sport_mode = on;
                Applied::Sport { mode, changed }
            }
        }
    }

    fn apply_ignition(&mut self, stage: IgnitionStage) -> Applied {
        let on = stage.is_on(self.key_config.accept_accessory);
        let was_on = self.state.ignition_on;
        self.state.ignition_on = on;

        let edge = match (was_on, on) {
            (false, true) => {
                self.state.low_fuel_reminder_armed = false;
                self.state.passenger_seen_since_unlock = false;
                Some(IgnitionEdge::On)
            }
            (true, false) => {
                if self.low_fuel_seen {
                    self.state.low_fuel_reminder_armed = true;
                    self.low_fuel_seen = false;
                }
                Some(IgnitionEdge::Off)
            }
            _ => None,
        };

        if let Some(edge) = edge {
            info!("ignition {}", edge);
        }
        Applied::Ignition { on, edge }
    }

    fn apply_doors(&mut self, doors: DoorSnapshot, now_ms: u32) -> Applied {
        use DoorEventKind::*;

        let prev = self.state.doors;
        let pairs = [
            (prev.driver, doors.driver, DriverOpened, DriverClosed),
            (prev.passenger, doors.passenger, PassengerOpened, PassengerClosed),
            (prev.rear_driver, doors.rear_driver, RearDriverOpened, RearDriverClosed),
            (
                prev.rear_passenger,
                doors.rear_passenger,
                RearPassengerOpened,
                RearPassengerClosed,
            ),
            (prev.boot, doors.boot, BootOpened, BootClosed),
            (prev.bonnet, doors.bonnet, BonnetOpened, BonnetClosed),
        ];

        let mut events = 0;
        for (was, is, opened, closed) in pairs {
            if was == is {
                continue;
            }
            let kind = if is { opened } else { closed };
            if kind == PassengerOpened {
                self.state.passenger_seen_since_unlock = true;
            }
            debug!("door {}", kind);
            self.door_events.push(DoorEvent { kind, at_ms: now_ms });
            events += 1;
        }

        self.state.doors = doors;
        Applied::Doors { events }
    }

    fn apply_handbrake(&mut self, engaged: bool, now_ms: u32) -> Applied {
        let changed = engaged != self.state.handbrake_engaged;
        if changed {
            self.state.handbrake_engaged = engaged;
            let kind = if engaged {
                HandbrakeEventKind::Engaged
            } else {
                HandbrakeEventKind::Released
            };
            self.handbrake_events.push(HandbrakeEvent { kind, at_ms: now_ms });
        }
        Applied::Handbrake { changed }
    }

    fn apply_key(&mut self, raw: u8, now_ms: u32) -> Applied {
        let cooldown = u32::from(self.key_config.cooldown_ms);
        if raw == self.key.raw && now_ms.wrapping_sub(self.key.at_ms) < cooldown {
            return Applied::Key(None);
        }

        let code = KeyCode::from_byte(raw);
        if matches!(code, KeyCode::Other(_)) && raw == self.key.raw {
            return Applied::Key(None);
        }

        self.key.raw = raw;
        self.key.at_ms = now_ms;
        match code {
            KeyCode::Unlock => {
                self.key.lock_state = LockState::Unlocked;
                self.state.passenger_seen_since_unlock = false;
            }
            KeyCode::Lock => self.key.lock_state = LockState::Locked,
            _ => {}
        }

        info!("key {}", code);
        self.key_events.push(KeyEvent { code, at_ms: now_ms });
        Applied::Key(Some(code))
    }

    fn apply_warning(&mut self, warning: WarningCode) -> Applied {
        let WarningCode { code, status } = warning;
        let mut newly_active = false;
        match status {
            // Code 0 is the cluster's "all OK", never an active warning
            _ if code == 0 => self.active_warnings.clear(),
            WarningStatus::Active => {
                if !self.active_warnings.contains(&code) {
                    if self.active_warnings.is_full() {
                        let evicted = self.active_warnings.remove(0);
                        warn!("active warning set full, forgot code {=u16}", evicted);
                    }
                    // Room was made above
                    let _ = self.active_warnings.push(code);
                    newly_active = true;
                }
                if is_low_fuel_code(code) && self.state.ignition_on {
                    self.low_fuel_seen = true;
                }
            }
            WarningStatus::Cleared => self.active_warnings.retain(|&c| c != code),
        }

        self.state.any_warning_active = !self.active_warnings.is_empty();
        self.state.seatbelt_active = self.active_warnings.iter().any(|&c| is_seatbelt_code(c));
        Applied::Warning {
            warning,
            newly_active,
        }
    }
}
