//! Tunables
//!
//! Every timing constant and threshold the core uses, grouped per
//! component. Defaults match the vehicle the core was calibrated on. With
//! the `serde` feature the whole set can be baked into flash as a postcard
//! blob; none of this is runtime state.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use chime_protocol::BusIds;

/// Duplicate filter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DedupConfig {
    /// Identical frames closer than this are suppressed
    pub window_ms: u16,
    /// How many recent frames to compare against (1..=10)
    pub history_depth: u8,
    /// Pull cap per read (1..=6)
    pub max_pulls: u8,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            window_ms: 300,
            history_depth: 10,
            max_pulls: 6,
        }
    }
}

/// Key fob and ignition decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyConfig {
    /// Repeats of the same raw key code inside this window are one press
    pub cooldown_ms: u16,
    /// Count the accessory position as ignition on
    pub accept_accessory: bool,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 250,
            accept_accessory: false,
        }
    }
}

/// Alert policy settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolicyConfig {
    /// How long after unlock a driver door open still counts as arrival
    pub welcome_window_ms: u32,
    /// Battery is low below this voltage
    pub battery_low_volts: f32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            welcome_window_ms: 120_000,
            battery_low_volts: 11.8,
        }
    }
}

/// Gauge sweep settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SweepConfig {
    pub enabled: bool,
    /// Speedometer peak in km/h
    pub target_kmh: u16,
    /// Tachometer peak in rpm
    pub target_rpm: u16,
    /// Lead-in before the speedometer moves
    pub speed_delay_ms: u16,
    /// Lead-in before the tachometer moves
    pub tacho_delay_ms: u16,
    /// Hold time at the peak
    pub peak_dwell_ms: u16,
    /// Ignition must stay on this long before the sweep starts
    pub start_after_ms: u16,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target_kmh: 260,
            target_rpm: 5500,
            speed_delay_ms: 28,
            tacho_delay_ms: 35,
            peak_dwell_ms: 1000,
            start_after_ms: 4000,
        }
    }
}

/// Radio keep-alive settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RadioConfig {
    /// Unlock only powers the radio at or above this voltage
    pub min_volts: f32,
    /// Keep the radio powered after ignition off until the car is locked
    pub hold_after_ignition_off: bool,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            min_volts: 11.8,
            hold_after_ignition_off: true,
        }
    }
}

/// Audio output settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AudioConfig {
    /// Volume applied at start-up (0..=30)
    pub volume: u8,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { volume: 12 }
    }
}

/// Identifier layout, serializable form of [`BusIds`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    pub ignition: u16,
    pub doors: u16,
    pub handbrake: u16,
    pub key_fob: u16,
    pub warning: u16,
    pub battery: u16,
    pub sport_button: u16,
    pub cluster_command: u16,
}

impl Default for BusConfig {
    fn default() -> Self {
        BusIds::default().into()
    }
}

impl From<BusIds> for BusConfig {
    fn from(ids: BusIds) -> Self {
        Self {
            ignition: ids.ignition,
            doors: ids.doors,
            handbrake: ids.handbrake,
            key_fob: ids.key_fob,
            warning: ids.warning,
            battery: ids.battery,
            sport_button: ids.sport_button,
            cluster_command: ids.cluster_command,
        }
    }
}

impl From<BusConfig> for BusIds {
    fn from(cfg: BusConfig) -> Self {
        Self {
            ignition: cfg.ignition,
            doors: cfg.doors,
            handbrake: cfg.handbrake,
            key_fob: cfg.key_fob,
            warning: cfg.warning,
            battery: cfg.battery,
            sport_button: cfg.sport_button,
            cluster_command: cfg.cluster_command,
        }
    }
}

/// Complete core configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChimeConfig {
    pub bus: BusConfig,
    pub dedup: DedupConfig,
    pub key: KeyConfig,
    pub policy: PolicyConfig,
    pub sweep: SweepConfig,
    pub radio: RadioConfig,
    pub audio: AudioConfig,
}

/// Errors from encoding or decoding the configuration blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Buffer too small or value not representable
    Encode,
    /// Blob truncated, corrupted or from an incompatible layout
    Decode,
}

#[cfg(feature = "serde")]
impl ChimeConfig {
    /// Largest encoded size of a configuration blob
    pub const MAX_ENCODED_LEN: usize = 96;

    /// Encode into `buf`, returning the used prefix
    pub fn to_postcard<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Encode)
    }

    /// Decode from a blob previously written by [`Self::to_postcard`]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ChimeConfig::default();
        assert_eq!(cfg.dedup.window_ms, 300);
        assert_eq!(cfg.dedup.history_depth, 10);
        assert_eq!(cfg.key.cooldown_ms, 250);
        assert!(!cfg.key.accept_accessory);
        assert_eq!(cfg.policy.welcome_window_ms, 120_000);
        assert_eq!(cfg.sweep.target_kmh, 260);
        assert_eq!(cfg.sweep.target_rpm, 5500);
        assert_eq!(cfg.sweep.start_after_ms, 4000);
        assert_eq!(cfg.bus.warning, 0x338);
    }

    #[test]
    fn test_bus_ids_conversion() {
        let ids = BusIds {
            doors: 0x0E2,
            ..BusIds::default()
        };
        let cfg = BusConfig::from(ids);
        assert_eq!(BusIds::from(cfg), ids);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_blob() {
        let mut cfg = ChimeConfig::default();
        cfg.sweep.target_kmh = 240;
        cfg.radio.min_volts = 12.1;

        let mut buf = [0u8; ChimeConfig::MAX_ENCODED_LEN];
        let used = cfg.to_postcard(&mut buf).unwrap().len();
        let decoded = ChimeConfig::from_postcard(&buf[..used]).unwrap();
        assert_eq!(decoded, cfg);

        assert_eq!(
            ChimeConfig::from_postcard(&buf[..used / 2]),
            Err(ConfigError::Decode)
        );
        assert_eq!(
            cfg.to_postcard(&mut [0u8; 4]).err(),
            Some(ConfigError::Encode)
        );
    }
}
