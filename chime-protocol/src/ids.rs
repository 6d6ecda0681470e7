//! Bus identifiers consumed and produced by the core
//!
//! The values below are the body-bus layout of the target vehicle. They are
//! grouped in [`BusIds`] so a different layout can be supplied without
//! touching the decoders.

/// Ignition stage flags (run/start/accessory) in byte 0
pub const ID_IGNITION: u16 = 0x130;
/// Handbrake state, bit 1 of byte 5
pub const ID_HANDBRAKE: u16 = 0x1B4;
/// Key fob button codes in byte 2
pub const ID_KEY_FOB: u16 = 0x23A;
/// Door, boot and bonnet bitfield in bytes 1-2
pub const ID_DOORS: u16 = 0x2FC;
/// Sport button command, mode byte at index 1
pub const ID_SPORT_BUTTON: u16 = 0x315;
/// Cluster warning codes, trailing FE FE FE sentinel
pub const ID_WARNING: u16 = 0x338;
/// Battery voltage and engine state
pub const ID_BATTERY: u16 = 0x3B4;
/// Diagnostic command channel used to drive the cluster needles
pub const ID_CLUSTER_COMMAND: u16 = 0x6F1;

/// Vehicle signal carried by a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignalKind {
    Ignition,
    Doors,
    Handbrake,
    KeyFob,
    Warning,
    Battery,
    SportButton,
}

/// Identifier assignment for every consumed signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusIds {
    pub ignition: u16,
    pub doors: u16,
    pub handbrake: u16,
    pub key_fob: u16,
    pub warning: u16,
    pub battery: u16,
    pub sport_button: u16,
    /// Outgoing cluster command identifier (sweep)
    pub cluster_command: u16,
}

impl Default for BusIds {
    fn default() -> Self {
        Self {
            ignition: ID_IGNITION,
            doors: ID_DOORS,
            handbrake: ID_HANDBRAKE,
            key_fob: ID_KEY_FOB,
            warning: ID_WARNING,
            battery: ID_BATTERY,
            sport_button: ID_SPORT_BUTTON,
            cluster_command: ID_CLUSTER_COMMAND,
        }
    }
}

impl BusIds {
    /// Which signal, if any, a frame identifier carries
    pub fn classify(&self, id: u16) -> Option<SignalKind> {
        let kind = if id == self.ignition {
            SignalKind::Ignition
        } else if id == self.doors {
            SignalKind::Doors
        } else if id == self.handbrake {
            SignalKind::Handbrake
        } else if id == self.key_fob {
            SignalKind::KeyFob
        } else if id == self.warning {
            SignalKind::Warning
        } else if id == self.battery {
            SignalKind::Battery
        } else if id == self.sport_button {
            SignalKind::SportButton
        } else {
            return None;
        };
        Some(kind)
    }

    /// Identifiers the bus controller should accept
    ///
    /// Useful for programming acceptance filters; everything else is noise
    /// to the core.
    pub fn accepted(&self) -> [u16; 7] {
        [
            self.warning,
            self.key_fob,
            self.doors,
            self.ignition,
            self.handbrake,
            self.sport_button,
            self.battery,
        ]
    }
}
