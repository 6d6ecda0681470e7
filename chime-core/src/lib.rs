//! Board-agnostic core of the Chime in-vehicle alert unit
//!
//! This crate contains all logic that does not depend on a specific
//! microcontroller, bus transceiver or audio module:
//!
//! - Duplicate frame suppression
//! - Vehicle state reconstruction and edge events
//! - Alert policy (welcome, goodbye, warnings, reminders, radio hold)
//! - Audio dispatch with priorities and deferral
//! - Gauge sweep state machine
//! - Configuration type definitions
//!
//! Everything runs from a single cooperative loop calling
//! [`Device::tick`] with a millisecond timestamp. Nothing blocks and no
//! locking is involved.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod config;
pub mod dedup;
pub mod device;
pub mod dispatch;
pub mod policy;
pub mod queue;
pub mod state;
pub mod sweep;

#[cfg(test)]
mod testing;

pub use config::ChimeConfig;
pub use device::{Device, InitError};
pub use dispatch::{Dispatched, Dispatcher};
pub use policy::{IntentKind, PlayIntent, PolicyEngine, Priority};
pub use state::{CarState, StateTracker};
pub use sweep::{SweepEngine, SweepState};
