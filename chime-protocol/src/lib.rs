//! Body-bus protocol for the Chime alert core
//!
//! This crate describes everything the core knows about the wire:
//!
//! - [`frame`]: the 11-bit identifier + up to 8 byte frame model
//! - [`ids`]: which identifiers carry which vehicle signal
//! - [`signals`]: pure decoders from payload bytes to typed signals
//! - [`cluster`]: command frames understood by the instrument cluster
//! - [`tracks`]: the fixed warning-code → audio track table
//!
//! # Decoding
//!
//! ```text
//! ┌──────────┐   BusIds::classify   ┌────────────┐   DECODERS   ┌────────┐
//! │ CanFrame │ ───────────────────▶ │ SignalKind │ ───────────▶ │ Signal │
//! └──────────┘                      └────────────┘  (len-gated) └────────┘
//! ```
//!
//! Nothing here keeps state. Short or unrecognised frames decode to `None`,
//! never to an error.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod cluster;
pub mod frame;
pub mod ids;
pub mod signals;
pub mod tracks;

pub use frame::{CanFrame, FrameError, MAX_DLC, MAX_STANDARD_ID};
pub use ids::{BusIds, SignalKind};
pub use signals::{
    decode, DoorSnapshot, IgnitionStage, KeyCode, Signal, SportMode, WarningCode, WarningStatus,
};
