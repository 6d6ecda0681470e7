//! Host-side doubles for the hardware traits

use heapless::{Deque, Vec};

use chime_hal::{AudioError, AudioEvent, AudioPlayer, BusError, CanBus, OutputPin, MAX_VOLUME};
use chime_protocol::CanFrame;

/// Scripted bus: frames pushed with [`MockBus::push_rx`] come out of
/// `poll` in order, transmitted frames are recorded.
#[derive(Debug, Default)]
pub struct MockBus {
    rx: Deque<CanFrame, 64>,
    tx: Vec<CanFrame, 64>,
    fail_begin: bool,
    fail_transmit: bool,
    started: bool,
    filters: Vec<u16, 16>,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_rx(&mut self, frame: CanFrame) {
        self.rx.push_back(frame).expect("mock rx full");
    }

    pub fn rx_pending(&self) -> usize {
        self.rx.len()
    }

    pub fn sent(&self) -> &[CanFrame] {
        &self.tx
    }

    pub fn fail_begin(&mut self, fail: bool) {
        self.fail_begin = fail;
    }

    pub fn fail_transmit(&mut self, fail: bool) {
        self.fail_transmit = fail;
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// Identifiers passed to `set_filters`
    pub fn filters(&self) -> &[u16] {
        &self.filters
    }
}

impl CanBus for MockBus {
    fn begin(&mut self) -> Result<(), BusError> {
        if self.fail_begin {
            return Err(BusError::InitFailed);
        }
        self.started = true;
        Ok(())
    }

    fn set_filters(&mut self, accept: &[u16]) -> Result<(), BusError> {
        self.filters.clear();
        self.filters.extend_from_slice(accept).expect("mock filter list full");
        Ok(())
    }

    fn poll(&mut self) -> Option<CanFrame> {
        self.rx.pop_front()
    }

    fn transmit(&mut self, frame: &CanFrame) -> Result<(), BusError> {
        if self.fail_transmit {
            return Err(BusError::TransmitFailed);
        }
        self.tx.push(frame.clone()).expect("mock tx full");
        Ok(())
    }
}

/// Audio module double. Playback lasts until [`MockAudio::finish`].
#[derive(Debug, Default)]
pub struct MockAudio {
    playing: bool,
    current: u16,
    volume: u8,
    played: Vec<u16, 64>,
    stops: u32,
    events: Deque<AudioEvent, 8>,
    fail_play: Option<AudioError>,
}

impl MockAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every track started, in order
    pub fn played(&self) -> &[u16] {
        &self.played
    }

    pub fn stops(&self) -> u32 {
        self.stops
    }

    /// End the current track the way the module would
    pub fn finish(&mut self) {
        if self.playing {
            self.playing = false;
            let _ = self.events.push_back(AudioEvent::Finished(self.current));
        }
    }

    pub fn push_event(&mut self, event: AudioEvent) {
        let _ = self.events.push_back(event);
    }

    pub fn fail_play(&mut self, error: Option<AudioError>) {
        self.fail_play = error;
    }
}

impl AudioPlayer for MockAudio {
    fn play_track(&mut self, track: u16) -> Result<(), AudioError> {
        if let Some(e) = self.fail_play {
            return Err(e);
        }
        self.playing = true;
        self.current = track;
        self.played.push(track).expect("mock play log full");
        Ok(())
    }

    fn stop(&mut self) {
        self.playing = false;
        self.stops += 1;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn current_track(&self) -> u16 {
        if self.playing {
            self.current
        } else {
            0
        }
    }

    fn set_volume(&mut self, volume: u8) -> Result<(), AudioError> {
        if let Some(e) = self.fail_play {
            return Err(e);
        }
        self.volume = volume.min(MAX_VOLUME);
        Ok(())
    }

    fn volume(&self) -> u8 {
        self.volume
    }

    fn poll(&mut self) -> Option<AudioEvent> {
        self.events.pop_front()
    }
}

#[derive(Debug, Default)]
pub struct MockPin {
    high: bool,
    writes: u32,
}

impl MockPin {
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.high = true;
        self.writes += 1;
    }

    fn set_low(&mut self) {
        self.high = false;
        self.writes += 1;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}
