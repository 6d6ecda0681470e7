//! Warning code severity
//!
//! Four classes. Stop-now and drive-now are the two top classes, then
//! high severity; everything unlisted is a plain notification.

use super::intent::Priority;

const STOP_NOW: [u16; 10] = [30, 33, 39, 212, 427, 961, 568, 257, 367, 74];

// Seatbelt plus open doors, boot and bonnet
const DRIVE_NOW: [u16; 10] = [46, 91, 389, 390, 14, 15, 16, 17, 18, 19];

const HIGH_SEVERITY: [u16; 27] = [
    // Reduced power
    29, 31, 49, 216,
    // Alternator
    213,
    // Traction control
    35, 236, 237, 382,
    // Coolant
    166,
    // Battery low
    306, 304, 229, 220, 415,
    // Tyres
    139, 143, 140, 141, 608, 609, 610, 611, 142, 265, 63, 384,
];

/// Severity class of a warning code
pub fn classify(code: u16) -> Priority {
    if STOP_NOW.contains(&code) {
        Priority::StopNow
    } else if DRIVE_NOW.contains(&code) {
        Priority::DriveNow
    } else if HIGH_SEVERITY.contains(&code) {
        Priority::HighSeverity
    } else {
        Priority::Notification
    }
}
