//! Audio track table
//!
//! Track numbers index files on the audio module's storage card, 1-based.
//! Warning codes map through [`track_for_code`]; synthesized events use the
//! named constants below.

/// Highest track index the audio module is provisioned with
pub const MAX_TRACK: u16 = 60;

pub const WELCOME: u16 = 1;
pub const SEATBELT: u16 = 2;
pub const IGNITION_GONG: u16 = 13;
/// Generic fallback for codes without a dedicated recording
pub const WARNING_GONG: u16 = 14;
pub const ALL_CLEAR: u16 = 23;
pub const FUEL_REMINDER: u16 = 45;
pub const GOODBYE_SOLO: [u16; 2] = [46, 47];
pub const GOODBYE_WITH_PASSENGER: [u16; 2] = [48, 49];
pub const HANDBRAKE_DOWN: u16 = 50;
pub const SPORT_ON: u16 = 52;
pub const SPORT_OFF: u16 = 53;

/// Track for a warning code
///
/// Unmapped codes fall back to [`WARNING_GONG`].
pub fn track_for_code(code: u16) -> u16 {
    match code {
        0 => ALL_CLEAR,

        // Seatbelt
        46 | 91 | 389 | 390 => SEATBELT,

        // Doors, boot, bonnet
        16 => 3,
        17 => 4,
        19 => 9,
        18 => 10,
        14 => 11,
        15 => 12,

        // Parking brake and key
        55 => 5,
        38 | 205 | 66 => 6,
        13 => 21,
        67 => 51,

        // Caps, preheat, lights
        32 => 7,
        25 => 8,
        113 => 16,

        // Fluids
        166 => 17,
        164 => 18,
        275 | 286 => 19,
        167 => 20,

        306 | 304 | 229 | 220 | 415 => 22,

        // Bulbs
        87..=89 | 111 | 114..=138 | 196 | 197 | 345 | 346 | 371..=373 | 378..=381 => 24,

        // Tyres
        139 | 608 => 25,
        143 | 609 => 26,
        140 | 610 => 27,
        141 | 611 => 28,
        142 => 29,
        265 => 30,
        63 | 384 => 37,

        // Engine
        27 | 28 => 31,
        29 | 31 | 49 | 216 => 32,
        30 | 33 | 39 | 212 | 427 | 961 | 568 => 33,
        182 => 34,
        213 => 35,
        257 | 367 => 36,

        // Brakes, traction, road, service
        71 => 38,
        74 => 39,
        184 => 40,
        36 => 41,
        35 | 236 | 237 | 382 => 42,
        79 | 165 => 43,
        281 | 284 => 44,

        _ => WARNING_GONG,
    }
}

pub fn is_seatbelt_code(code: u16) -> bool {
    matches!(code, 46 | 91 | 389 | 390)
}

pub fn is_low_fuel_code(code: u16) -> bool {
    matches!(code, 275 | 286)
}

pub fn is_low_battery_code(code: u16) -> bool {
    matches!(code, 306 | 304 | 229 | 220 | 415)
}
