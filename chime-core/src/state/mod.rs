//! Vehicle state reconstruction
//!
//! The tracker is the only writer of [`CarState`]. It compares every decoded
//! value against the previous one and queues an edge event on change.

pub mod car;
pub mod events;
pub mod tracker;

pub use car::{CarState, KeySnapshot, LockState};
pub use events::{
    DoorEvent, DoorEventKind, HandbrakeEvent, HandbrakeEventKind, IgnitionEdge, KeyEvent,
};
pub use tracker::{Applied, StateTracker};
