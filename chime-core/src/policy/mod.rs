//! Alert policy
//!
//! Classification of warning codes, the play intent model and the engine
//! that arms, fires and queues intents.

pub mod classify;
pub mod engine;
pub mod intent;

pub use classify::classify;
pub use engine::{
    PolicyEngine, WelcomeWindow, NOTIFICATION_QUEUE_CAPACITY, SECURITY_QUEUE_CAPACITY,
};
pub use intent::{IntentKind, PlayIntent, Priority};
