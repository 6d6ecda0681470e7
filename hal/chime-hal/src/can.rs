//! Bus transceiver abstraction
//!
//! Provides the frame source/sink the core polls once per tick. Bit timing,
//! acceptance filters and interrupt wiring belong to the implementation.

use chime_protocol::CanFrame;

/// Errors from the bus transceiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Controller did not come up (wrong clock, no transceiver, ...)
    InitFailed,
    /// Frame could not be queued for transmission
    TransmitFailed,
}

/// Non-blocking frame source and sink
pub trait CanBus {
    /// Bring up the controller
    ///
    /// Failure here is fatal to the caller; there is no retry path.
    fn begin(&mut self) -> Result<(), BusError>;

    /// Restrict reception to the given identifiers
    ///
    /// Best effort: a controller with too few filter slots may let other
    /// frames through, and the decoder ignores them. The default accepts
    /// everything.
    fn set_filters(&mut self, accept: &[u16]) -> Result<(), BusError> {
        let _ = accept;
        Ok(())
    }

    /// Take the next received frame, if any
    ///
    /// Must never block. Returns `None` when the receive buffer is empty.
    fn poll(&mut self) -> Option<CanFrame>;

    /// Queue a frame for transmission
    fn transmit(&mut self, frame: &CanFrame) -> Result<(), BusError>;
}
