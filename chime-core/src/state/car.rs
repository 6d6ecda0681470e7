//! Reconstructed vehicle state
//!
//! Every field holds the last decoded value. Silence on the bus freezes the
//! state; nothing here decays or resets on its own.

use chime_protocol::DoorSnapshot;

/// Latest known vehicle state
///
/// Only [`StateTracker`](super::StateTracker) writes this; everything else
/// receives it by shared reference.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CarState {
    pub ignition_on: bool,
    pub doors: DoorSnapshot,
    /// Assumed engaged until the first handbrake frame
    pub handbrake_engaged: bool,
    /// `None` until the first voltage frame
    pub battery_volts: Option<f32>,
    pub battery_low: bool,
    pub seatbelt_active: bool,
    pub sport_mode: bool,
    pub passenger_seen_since_unlock: bool,
    /// Fires once on the next driver door open while ignition is off
    pub low_fuel_reminder_armed: bool,
    pub any_warning_active: bool,
}

impl Default for CarState {
    fn default() -> Self {
        Self {
            ignition_on: false,
            doors: DoorSnapshot::default(),
            handbrake_engaged: true,
            battery_volts: None,
            battery_low: false,
            seatbelt_active: false,
            sport_mode: false,
            passenger_seen_since_unlock: false,
            low_fuel_reminder_armed: false,
            any_warning_active: false,
        }
    }
}

impl CarState {
    /// Check if the battery is known to be at or above `min_volts`
    ///
    /// An unknown voltage is treated as not OK.
    pub fn battery_at_least(&self, min_volts: f32) -> bool {
        self.battery_volts.is_some_and(|v| v >= min_volts)
    }
}

/// Lock state as last commanded by the key fob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockState {
    #[default]
    Unknown,
    Locked,
    Unlocked,
}

/// Last accepted key fob code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeySnapshot {
    /// Raw byte, 0xFF before the first accepted press
    pub raw: u8,
    pub lock_state: LockState,
    pub at_ms: u32,
}

impl Default for KeySnapshot {
    fn default() -> Self {
        Self {
            raw: 0xFF,
            lock_state: LockState::Unknown,
            at_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = CarState::default();
        assert!(state.handbrake_engaged);
        assert!(!state.ignition_on);
        assert_eq!(state.battery_volts, None);
        assert_eq!(KeySnapshot::default().lock_state, LockState::Unknown);
    }

    #[test]
    fn test_battery_threshold() {
        let mut state = CarState::default();
        assert!(!state.battery_at_least(11.8));
        state.battery_volts = Some(12.4);
        assert!(state.battery_at_least(11.8));
        state.battery_volts = Some(11.5);
        assert!(!state.battery_at_least(11.8));
    }
}
