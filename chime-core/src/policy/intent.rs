//! Play intents
//!
//! A request to play one track, tagged with a priority class. Intents are
//! consumed exactly once; popping transfers ownership to the dispatcher.

/// What caused the intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntentKind {
    /// Cluster warning code (including the all-clear, code 0)
    WarningCode,
    HandbrakeWarning,
    FuelReminder,
    Welcome,
    Goodbye,
    SportOn,
    SportOff,
    /// First ignition-on frame of a cycle
    IgnitionGong,
}

/// Priority class
///
/// Anything above [`Priority::Notification`] goes to the security queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Priority {
    Notification = 0,
    HighSeverity = 1,
    /// Drive-now class
    DriveNow = 2,
    /// Stop-now class
    StopNow = 3,
}

impl Priority {
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Check if this class belongs on the security queue
    pub fn is_security(self) -> bool {
        self != Priority::Notification
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlayIntent {
    pub kind: IntentKind,
    /// 1-based track index
    pub track: u16,
    /// Source code for [`IntentKind::WarningCode`] intents
    pub code: Option<u16>,
    pub priority: Priority,
    pub at_ms: u32,
}

impl PlayIntent {
    /// A plain notification with no warning code attached
    pub const fn notification(kind: IntentKind, track: u16, at_ms: u32) -> Self {
        Self {
            kind,
            track,
            code: None,
            priority: Priority::Notification,
            at_ms,
        }
    }
}
