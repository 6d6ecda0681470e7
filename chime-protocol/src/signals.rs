//! Signal decoders
//!
//! One entry per [`SignalKind`] in [`DECODERS`]: a minimum length and a
//! pure function from payload bytes to a typed [`Signal`]. Frames shorter
//! than the minimum never reach the decoder.

use crate::frame::CanFrame;
use crate::ids::{BusIds, SignalKind};

/// Battery voltage scale, volts per raw count
pub const VOLTS_PER_COUNT: f32 = 0.014_705_9;

/// Trailing bytes that mark a warning-code frame
pub const WARNING_SENTINEL: [u8; 3] = [0xFE, 0xFE, 0xFE];

// Wire format values
const IGN_ACCESSORY: u8 = 0x01;
const IGN_RUN: u8 = 0x04;
const IGN_START: u8 = 0x08;

const KEY_UNLOCK: u8 = 1;
const KEY_LOCK: u8 = 4;
const KEY_TRUNK: u8 = 64;

const WARNING_ACTIVE: u8 = 0x02;
const WARNING_CLEARED: u8 = 0x01;

const SPORT_ON: u8 = 0xF2;
const SPORT_OFF: u8 = 0xF1;

/// Ignition stage flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IgnitionStage {
    pub accessory: bool,
    pub run: bool,
    pub start: bool,
}

impl IgnitionStage {
    /// Decode from the low nibble of byte 0
    pub fn from_byte(byte: u8) -> Self {
        Self {
            accessory: byte & IGN_ACCESSORY != 0,
            run: byte & IGN_RUN != 0,
            start: byte & IGN_START != 0,
        }
    }

    /// Ignition counts as on for run or start, and optionally accessory
    pub fn is_on(&self, accept_accessory: bool) -> bool {
        self.run || self.start || (accept_accessory && self.accessory)
    }
}

/// Door, boot and bonnet open flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DoorSnapshot {
    pub driver: bool,
    pub passenger: bool,
    pub rear_driver: bool,
    pub rear_passenger: bool,
    pub boot: bool,
    pub bonnet: bool,
}

impl DoorSnapshot {
    /// Decode from bytes 1 and 2 of the door frame
    pub fn from_bytes(doors: u8, lids: u8) -> Self {
        Self {
            driver: doors & 0x01 != 0,
            passenger: doors & 0x04 != 0,
            rear_driver: doors & 0x10 != 0,
            rear_passenger: doors & 0x40 != 0,
            boot: lids & 0x01 != 0,
            bonnet: lids & 0x04 != 0,
        }
    }
}

/// Key fob button code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyCode {
    Unlock,
    Lock,
    Trunk,
    /// Any other raw value
    Other(u8),
}

impl KeyCode {
    /// Parse from the raw byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            KEY_UNLOCK => KeyCode::Unlock,
            KEY_LOCK => KeyCode::Lock,
            KEY_TRUNK => KeyCode::Trunk,
            other => KeyCode::Other(other),
        }
    }
}

/// Warning code status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WarningStatus {
    Active,
    Cleared,
}

impl WarningStatus {
    /// Parse the status byte; other values are not warning updates
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            WARNING_ACTIVE => Some(WarningStatus::Active),
            WARNING_CLEARED => Some(WarningStatus::Cleared),
            _ => None,
        }
    }
}

/// A warning code update broadcast by the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WarningCode {
    pub code: u16,
    pub status: WarningStatus,
}

/// Sport button mode byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SportMode {
    On,
    Off,
}

impl SportMode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            SPORT_ON => Some(SportMode::On),
            SPORT_OFF => Some(SportMode::Off),
            _ => None,
        }
    }
}

/// A decoded vehicle signal
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Signal {
    Ignition(IgnitionStage),
    Doors(DoorSnapshot),
    Handbrake { engaged: bool },
    /// Raw key byte; cooldown handling needs the raw value
    KeyFob(u8),
    Warning(WarningCode),
    /// Battery voltage in volts
    Battery(f32),
    SportButton(SportMode),
}

/// Decoder table entry
pub struct Decoder {
    pub kind: SignalKind,
    /// Frames shorter than this are ignored
    pub min_len: usize,
    pub decode: fn(&[u8]) -> Option<Signal>,
}

/// The decoder table, one entry per signal kind
pub static DECODERS: [Decoder; 7] = [
    Decoder {
        kind: SignalKind::Ignition,
        min_len: 1,
        decode: decode_ignition,
    },
    Decoder {
        kind: SignalKind::Doors,
        min_len: 3,
        decode: decode_doors,
    },
    Decoder {
        kind: SignalKind::Handbrake,
        min_len: 6,
        decode: decode_handbrake,
    },
    Decoder {
        kind: SignalKind::KeyFob,
        min_len: 3,
        decode: decode_key_fob,
    },
    Decoder {
        kind: SignalKind::Warning,
        min_len: 8,
        decode: decode_warning,
    },
    Decoder {
        kind: SignalKind::Battery,
        min_len: 3,
        decode: decode_battery,
    },
    Decoder {
        kind: SignalKind::SportButton,
        min_len: 2,
        decode: decode_sport_button,
    },
];

/// Decode a frame into a signal
///
/// Returns `None` for identifiers the core does not consume, for frames
/// shorter than the decoder's minimum, and for payloads that carry no
/// update (wrong sentinel, unknown status or mode byte).
pub fn decode(ids: &BusIds, frame: &CanFrame) -> Option<Signal> {
    let kind = ids.classify(frame.id())?;
    let decoder = DECODERS.iter().find(|d| d.kind == kind)?;
    if frame.len() < decoder.min_len {
        return None;
    }
    (decoder.decode)(frame.payload())
}

fn decode_ignition(b: &[u8]) -> Option<Signal> {
    Some(Signal::Ignition(IgnitionStage::from_byte(b[0])))
}

fn decode_doors(b: &[u8]) -> Option<Signal> {
    Some(Signal::Doors(DoorSnapshot::from_bytes(b[1], b[2])))
}

fn decode_handbrake(b: &[u8]) -> Option<Signal> {
    Some(Signal::Handbrake {
        engaged: b[5] & 0x02 != 0,
    })
}

fn decode_key_fob(b: &[u8]) -> Option<Signal> {
    Some(Signal::KeyFob(b[2]))
}

fn decode_warning(b: &[u8]) -> Option<Signal> {
    if b[5..8] != WARNING_SENTINEL {
        return None;
    }
    let status = WarningStatus::from_byte(b[2])?;
    Some(Signal::Warning(WarningCode {
        code: u16::from_le_bytes([b[0], b[1]]),
        status,
    }))
}

fn decode_battery(b: &[u8]) -> Option<Signal> {
    let raw = (u16::from(b[1] & 0x0F) << 8) | u16::from(b[0]);
    Some(Signal::Battery(VOLTS_PER_COUNT * f32::from(raw)))
}

fn decode_sport_button(b: &[u8]) -> Option<Signal> {
    SportMode::from_byte(b[1]).map(Signal::SportButton)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn frame(id: u16, payload: &[u8]) -> CanFrame {
        CanFrame::new(id, payload).unwrap()
    }

    #[test]
    fn test_every_kind_has_a_decoder() {
        let kinds = [
            SignalKind::Ignition,
            SignalKind::Doors,
            SignalKind::Handbrake,
            SignalKind::KeyFob,
            SignalKind::Warning,
            SignalKind::Battery,
            SignalKind::SportButton,
        ];
        for kind in kinds {
            assert_eq!(DECODERS.iter().filter(|d| d.kind == kind).count(), 1);
        }
    }

    #[test]
    fn test_ignition_stage() {
        let ids = BusIds::default();
        let Some(Signal::Ignition(stage)) = decode(&ids, &frame(0x130, &[0x45, 0x00])) else {
            panic!("expected ignition");
        };
        assert!(stage.run);
        assert!(stage.accessory);
        assert!(!stage.start);
        assert!(stage.is_on(false));

        let acc_only = IgnitionStage::from_byte(0x41);
        assert!(!acc_only.is_on(false));
        assert!(acc_only.is_on(true));
        assert!(IgnitionStage::from_byte(0x08).is_on(false));
    }

    #[test]
    fn test_door_bits() {
        let ids = BusIds::default();
        let Some(Signal::Doors(doors)) = decode(&ids, &frame(0x2FC, &[0x00, 0x05, 0x04])) else {
            panic!("expected doors");
        };
        assert!(doors.driver);
        assert!(doors.passenger);
        assert!(!doors.rear_driver);
        assert!(!doors.rear_passenger);
        assert!(!doors.boot);
        assert!(doors.bonnet);
    }

    #[test]
    fn test_handbrake_bit() {
        let ids = BusIds::default();
        let engaged = frame(0x1B4, &[0, 0, 0, 0, 0, 0x02]);
        let released = frame(0x1B4, &[0, 0, 0, 0, 0, 0xFD]);
        assert_eq!(decode(&ids, &engaged), Some(Signal::Handbrake { engaged: true }));
        assert_eq!(decode(&ids, &released), Some(Signal::Handbrake { engaged: false }));
    }

    #[test]
    fn test_short_frames_are_ignored() {
        let ids = BusIds::default();
        assert_eq!(decode(&ids, &frame(0x130, &[])), None);
        assert_eq!(decode(&ids, &frame(0x2FC, &[0x00, 0x01])), None);
        assert_eq!(decode(&ids, &frame(0x1B4, &[0, 0, 0, 0, 0x02])), None);
        assert_eq!(decode(&ids, &frame(0x23A, &[0, 0])), None);
        assert_eq!(decode(&ids, &frame(0x338, &[0x2E, 0, 2, 0, 0, 0xFE, 0xFE])), None);
        assert_eq!(decode(&ids, &frame(0x3B4, &[0x00, 0x03])), None);
        assert_eq!(decode(&ids, &frame(0x315, &[0xF2])), None);
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(KeyCode::from_byte(1), KeyCode::Unlock);
        assert_eq!(KeyCode::from_byte(4), KeyCode::Lock);
        assert_eq!(KeyCode::from_byte(64), KeyCode::Trunk);
        assert_eq!(KeyCode::from_byte(0), KeyCode::Other(0));

        let ids = BusIds::default();
        assert_eq!(
            decode(&ids, &frame(0x23A, &[0xF0, 0x30, 0x01, 0x00])),
            Some(Signal::KeyFob(1))
        );
    }

    #[test]
    fn test_warning_frame() {
        let ids = BusIds::default();
        // Code 0x0113 = 275 (low fuel), active
        let active = frame(0x338, &[0x13, 0x01, 0x02, 0x00, 0x00, 0xFE, 0xFE, 0xFE]);
        assert_eq!(
            decode(&ids, &active),
            Some(Signal::Warning(WarningCode {
                code: 275,
                status: WarningStatus::Active,
            }))
        );

        let cleared = frame(0x338, &[0x00, 0x00, 0x01, 0x00, 0x00, 0xFE, 0xFE, 0xFE]);
        assert_eq!(
            decode(&ids, &cleared),
            Some(Signal::Warning(WarningCode {
                code: 0,
                status: WarningStatus::Cleared,
            }))
        );
    }

    #[test]
    fn test_warning_frame_needs_sentinel_and_status() {
        let ids = BusIds::default();
        let no_sentinel = frame(0x338, &[0x13, 0x01, 0x02, 0x00, 0x00, 0xFE, 0xFE, 0x00]);
        assert_eq!(decode(&ids, &no_sentinel), None);

        let odd_status = frame(0x338, &[0x13, 0x01, 0x03, 0x00, 0x00, 0xFE, 0xFE, 0xFE]);
        assert_eq!(decode(&ids, &odd_status), None);
    }

    #[test]
    fn test_battery_voltage() {
        let ids = BusIds::default();
        // 0x035C = 860 counts -> ~12.65 V; upper nibble of byte 1 is ignored
        let Some(Signal::Battery(volts)) = decode(&ids, &frame(0x3B4, &[0x5C, 0xF3, 0x00])) else {
            panic!("expected battery");
        };
        assert!((volts - 12.647).abs() < 0.01);
    }

    #[test]
    fn test_sport_button() {
        let ids = BusIds::default();
        assert_eq!(
            decode(&ids, &frame(0x315, &[0x00, 0xF2])),
            Some(Signal::SportButton(SportMode::On))
        );
        assert_eq!(
            decode(&ids, &frame(0x315, &[0x00, 0xF1])),
            Some(Signal::SportButton(SportMode::Off))
        );
        assert_eq!(decode(&ids, &frame(0x315, &[0x00, 0xF0])), None);
    }

    #[test]
    fn test_unconsumed_identifier() {
        let ids = BusIds::default();
        assert_eq!(decode(&ids, &frame(0x1A0, &[0; 8])), None);
    }

    proptest! {
        #[test]
        fn prop_decode_is_total(
            id in 0u16..=0x7FF,
            payload in proptest::collection::vec(any::<u8>(), 0..=8),
        ) {
            // Must never index past a short payload
            let f = CanFrame::new(id, &payload).unwrap();
            let _ = decode(&BusIds::default(), &f);
        }

        #[test]
        fn prop_short_frames_decode_to_none(
            kind in 0usize..7,
            payload in proptest::collection::vec(any::<u8>(), 0..8),
        ) {
            let decoder = &DECODERS[kind];
            prop_assume!(payload.len() < decoder.min_len);
            let ids = BusIds::default();
            let id = ids
                .accepted()
                .into_iter()
                .find(|&id| ids.classify(id) == Some(decoder.kind))
                .unwrap();
            let f = CanFrame::new(id, &payload).unwrap();
            prop_assert_eq!(decode(&ids, &f), None);
        }
    }
}
