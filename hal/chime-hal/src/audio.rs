//! Audio module abstraction
//!
//! The module plays numbered tracks from its own storage. Wire framing,
//! checksums and power sequencing live in the implementation, which is also
//! expected to apply its own retry policy before reporting an error.

/// Highest volume step the module accepts
pub const MAX_VOLUME: u8 = 30;

/// Errors from the audio module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioError {
    /// Module is powered down or still initializing
    NotReady,
    /// Command was sent but never acknowledged
    NoAck,
    /// Track index outside the provisioned range
    InvalidTrack,
}

/// Status reports from the module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioEvent {
    /// Playback of a track ran to completion
    Finished(u16),
    /// Storage card was inserted or became readable
    MediaReady,
    /// Module reported an error code
    Fault(u8),
}

/// Track player
pub trait AudioPlayer {
    /// Start playing a track, replacing whatever is playing
    ///
    /// # Arguments
    /// * `track` - 1-based track index
    fn play_track(&mut self, track: u16) -> Result<(), AudioError>;

    /// Stop playback
    fn stop(&mut self);

    /// Check if a track is currently playing
    fn is_playing(&self) -> bool;

    /// Track currently playing, 0 when idle
    fn current_track(&self) -> u16;

    /// Set the output volume
    ///
    /// Values above [`MAX_VOLUME`] are clamped.
    fn set_volume(&mut self, volume: u8) -> Result<(), AudioError>;

    /// Current volume step
    fn volume(&self) -> u8;

    /// Drain one pending status report
    fn poll(&mut self) -> Option<AudioEvent>;

    /// Stop playback only if the given track is the one playing
    fn stop_if_playing(&mut self, track: u16) {
        if self.is_playing() && self.current_track() == track {
            self.stop();
        }
    }
}
