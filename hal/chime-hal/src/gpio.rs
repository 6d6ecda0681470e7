//! Digital output abstraction
//!
//! The core drives a single line: the radio keep-alive (accessory power
//! hold). Active high.

/// A push-pull output the core can drive
pub trait OutputPin {
    /// Drive the line high
    fn set_high(&mut self);

    /// Drive the line low
    fn set_low(&mut self);

    /// Drive the line to `high`
    fn set_level(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Level last written to the line
    fn is_set_high(&self) -> bool;
}
