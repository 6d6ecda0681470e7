//! Edge events produced by the state tracker
//!
//! An event is emitted only when a tracked value actually changes. Each
//! subsystem has its own small queue; see [`super::tracker`].

use chime_protocol::KeyCode;

/// Door, boot and bonnet transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DoorEventKind {
    DriverOpened,
    DriverClosed,
    PassengerOpened,
    PassengerClosed,
    RearDriverOpened,
    RearDriverClosed,
    RearPassengerOpened,
    RearPassengerClosed,
    BootOpened,
    BootClosed,
    BonnetOpened,
    BonnetClosed,
}

impl DoorEventKind {
    /// Check if this is an opening edge
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            DoorEventKind::DriverOpened
                | DoorEventKind::PassengerOpened
                | DoorEventKind::RearDriverOpened
                | DoorEventKind::RearPassengerOpened
                | DoorEventKind::BootOpened
                | DoorEventKind::BonnetOpened
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DoorEvent {
    pub kind: DoorEventKind,
    pub at_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandbrakeEventKind {
    Engaged,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandbrakeEvent {
    pub kind: HandbrakeEventKind,
    pub at_ms: u32,
}

/// One logical key fob press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub code: KeyCode,
    pub at_ms: u32,
}

/// Ignition transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IgnitionEdge {
    /// OFF to ON
    On,
    /// ON to OFF
    Off,
}
