//! Frame model for the body bus.
//!
//! Frame format (standard identifiers only):
//! - IDENTIFIER: 11 bits (0x000-0x7FF)
//! - LENGTH: 0-8 bytes
//! - PAYLOAD: LENGTH data bytes
//!
//! Frames are transient: they are owned by whichever stage is currently
//! looking at them and are only retained by the dedup history.

use heapless::Vec;

/// Largest standard (11-bit) identifier
pub const MAX_STANDARD_ID: u16 = 0x7FF;

/// Maximum payload size in bytes
pub const MAX_DLC: usize = 8;

/// Errors that can occur when constructing a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Identifier does not fit in 11 bits
    IdentifierOutOfRange,
    /// Payload longer than 8 bytes
    PayloadTooLong,
}

/// A received or outgoing bus frame
///
/// Two frames compare equal when identifier, length and every payload
/// byte match. This is exactly the dedup notion of "same frame".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanFrame {
    id: u16,
    payload: Vec<u8, MAX_DLC>,
}

impl CanFrame {
    /// Create a new frame
    pub fn new(id: u16, payload: &[u8]) -> Result<Self, FrameError> {
        if id > MAX_STANDARD_ID {
            return Err(FrameError::IdentifierOutOfRange);
        }

        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLong)?;
        Ok(Self { id, payload })
    }

    /// Build a frame from a fixed buffer and a length
    ///
    /// The identifier is masked to 11 bits and the length clamped to 8, so
    /// this never fails. Used for frames the core composes itself.
    pub(crate) fn from_buffer(id: u16, buf: &[u8; MAX_DLC], len: usize) -> Self {
        let len = len.min(MAX_DLC);
        let mut payload = Vec::new();
        for &byte in &buf[..len] {
            // Capacity equals MAX_DLC, len is clamped above
            let _ = payload.push(byte);
        }
        Self {
            id: id & MAX_STANDARD_ID,
            payload,
        }
    }

    /// Frame identifier
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// True for a zero-length frame
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Single payload byte, if present
    pub fn byte(&self, index: usize) -> Option<u8> {
        self.payload.get(index).copied()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CanFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=u16:x} {=[u8]:x}", self.id, self.payload());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_frame() {
        let frame = CanFrame::new(0x2FC, &[0x00, 0x01, 0x00]).unwrap();
        assert_eq!(frame.id(), 0x2FC);
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.payload(), &[0x00, 0x01, 0x00]);
        assert_eq!(frame.byte(1), Some(0x01));
        assert_eq!(frame.byte(3), None);
    }

    #[test]
    fn test_identifier_out_of_range() {
        assert_eq!(
            CanFrame::new(0x800, &[]),
            Err(FrameError::IdentifierOutOfRange)
        );
    }

    #[test]
    fn test_payload_too_long() {
        let payload = [0u8; MAX_DLC + 1];
        assert_eq!(CanFrame::new(0x100, &payload), Err(FrameError::PayloadTooLong));
    }

    #[test]
    fn test_equality_covers_length() {
        let short = CanFrame::new(0x130, &[0x45]).unwrap();
        let long = CanFrame::new(0x130, &[0x45, 0x00]).unwrap();
        assert_ne!(short, long);
        assert_eq!(short, CanFrame::new(0x130, &[0x45]).unwrap());
    }

    #[test]
    fn test_from_buffer_clamps() {
        let frame = CanFrame::from_buffer(0xFFFF, &[1, 2, 3, 4, 5, 6, 7, 8], 12);
        assert_eq!(frame.id(), MAX_STANDARD_ID);
        assert_eq!(frame.len(), MAX_DLC);
    }

    #[test]
    fn test_empty_frame() {
        let frame = CanFrame::new(0x3B4, &[]).unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame.byte(0), None);
    }
}
