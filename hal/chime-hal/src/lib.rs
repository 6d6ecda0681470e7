//! Chime Hardware Abstraction Layer
//!
//! This crate defines the traits the alert core uses to reach its external
//! collaborators. Board support code implements them on top of the actual
//! bus transceiver, audio module and GPIO.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  chime-core (Device, Dispatcher, Sweep) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chime-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┼───────────┐
//!         ▼           ▼           ▼
//!    bus driver   audio module   GPIO
//! ```
//!
//! # Traits
//!
//! - [`can::CanBus`] - Frame source and sink
//! - [`audio::AudioPlayer`] - Track playback
//! - [`gpio::OutputPin`] - Digital output (radio keep-alive line)

#![no_std]
#![deny(unsafe_code)]

pub mod audio;
pub mod can;
pub mod gpio;

// Re-export key traits at crate root for convenience
pub use audio::{AudioError, AudioEvent, AudioPlayer, MAX_VOLUME};
pub use can::{BusError, CanBus};
pub use gpio::OutputPin;
