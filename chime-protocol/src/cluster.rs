//! Instrument cluster command frames
//!
//! The cluster accepts diagnostic "needle" commands on
//! [`ID_CLUSTER_COMMAND`](crate::ids::ID_CLUSTER_COMMAND). A command is
//! wrapped as `[0x60, n, p0 .. pn-1]` where `n` is the inner length.
//!
//! Inner payloads:
//! - Drive gauge: `30 <axis> 06 <hi> <lo>`
//! - Release gauge: `30 <axis> 00`

use crate::frame::{CanFrame, MAX_DLC};

/// Address byte of the cluster in the wrapper
const CLUSTER_ADDRESS: u8 = 0x60;
/// Service byte for gauge control
const GAUGE_SERVICE: u8 = 0x30;
/// Control option: drive to value
const OPTION_DRIVE: u8 = 0x06;
/// Control option: return control to the cluster
const OPTION_RELEASE: u8 = 0x00;

/// Gauges the sweep can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gauge {
    Speedometer,
    Tachometer,
}

impl Gauge {
    fn axis(self) -> u8 {
        match self {
            Gauge::Speedometer => 0x20,
            Gauge::Tachometer => 0x21,
        }
    }
}

/// Convert km/h to the speedometer's raw scale (rounded)
pub fn kmh_to_raw(kmh: u16) -> u16 {
    let n = u32::from(kmh) * 1777;
    ((n + 50) / 100) as u16
}

/// Convert rpm to the tachometer's raw scale (rounded)
pub fn rpm_to_raw(rpm: u16) -> u16 {
    let n = u32::from(rpm) * 106;
    ((n + 62) / 125) as u16
}

/// Wrap an inner command payload for the cluster
///
/// Inner payloads longer than 6 bytes are truncated to fit one frame.
pub fn wrap(id: u16, inner: &[u8]) -> CanFrame {
    let inner = &inner[..inner.len().min(MAX_DLC - 2)];
    let mut buf = [0u8; MAX_DLC];
    buf[0] = CLUSTER_ADDRESS;
    buf[1] = inner.len() as u8;
    buf[2..2 + inner.len()].copy_from_slice(inner);
    CanFrame::from_buffer(id, &buf, 2 + inner.len())
}

/// Drive a gauge to a raw value
pub fn drive(id: u16, gauge: Gauge, raw: u16) -> CanFrame {
    let [hi, lo] = raw.to_be_bytes();
    wrap(id, &[GAUGE_SERVICE, gauge.axis(), OPTION_DRIVE, hi, lo])
}

/// Hand a gauge back to the cluster
pub fn release(id: u16, gauge: Gauge) -> CanFrame {
    wrap(id, &[GAUGE_SERVICE, gauge.axis(), OPTION_RELEASE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ID_CLUSTER_COMMAND;

    #[test]
    fn test_scales() {
        assert_eq!(kmh_to_raw(0), 0);
        // 260 * 17.77 = 4620.2
        assert_eq!(kmh_to_raw(260), 4620);
        // 5500 * 0.848 = 4664
        assert_eq!(rpm_to_raw(5500), 4664);
        assert_eq!(rpm_to_raw(1), 1);
    }

    #[test]
    fn test_drive_speedometer() {
        let frame = drive(ID_CLUSTER_COMMAND, Gauge::Speedometer, kmh_to_raw(260));
        assert_eq!(frame.id(), 0x6F1);
        assert_eq!(frame.payload(), &[0x60, 0x05, 0x30, 0x20, 0x06, 0x12, 0x0C]);
    }

    #[test]
    fn test_drive_tachometer() {
        let frame = drive(ID_CLUSTER_COMMAND, Gauge::Tachometer, 0x1238);
        assert_eq!(frame.payload(), &[0x60, 0x05, 0x30, 0x21, 0x06, 0x12, 0x38]);
    }

    #[test]
    fn test_release() {
        let spd = release(ID_CLUSTER_COMMAND, Gauge::Speedometer);
        let tac = release(ID_CLUSTER_COMMAND, Gauge::Tachometer);
        assert_eq!(spd.payload(), &[0x60, 0x03, 0x30, 0x20, 0x00]);
        assert_eq!(tac.payload(), &[0x60, 0x03, 0x30, 0x21, 0x00]);
    }

    #[test]
    fn test_wrap_truncates() {
        let frame = wrap(ID_CLUSTER_COMMAND, &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(frame.len(), MAX_DLC);
        assert_eq!(frame.byte(1), Some(6));
        assert_eq!(frame.byte(7), Some(6));
    }
}
