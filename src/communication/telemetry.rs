//! Telemetry frame encoding and paced transmit
//!
//! Once per control tick the scheduler snapshots controller state into a
//! [`TelemetryFrame`] and loads it into the [`TelemetryWriter`]. The writer
//! drains the encoded frame one byte per poll through the serial port, so a
//! full frame takes 19 polls to leave the buffer.
//!
//! ## Behavior
//!
//! - `load` always replaces the buffered frame and rewinds the cursor. A
//!   frame still draining when the next tick lands is dropped mid-send and
//!   counted in [`TelemetryStats::frames_dropped`].
//! - `pump` writes at most one byte per call and backs off without loss when
//!   the port is busy.
//! - Multi-byte fields are big-endian on the wire.

use crate::platform::SerialInterface;

/// Encoded telemetry frame length in bytes
pub const TELEMETRY_LEN: usize = 19;

/// Telemetry frame start byte
pub const TELEMETRY_START: u8 = b'S';

/// Snapshot of controller state for one tick
///
/// Field order mirrors the wire layout. Ages are captured before the
/// end-of-tick bump, so a frame built on the same tick an input arrived
/// reports age zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryFrame {
    /// Mode byte: mode index in bits 7..3, substate in bits 2..0
    pub mode_byte: u8,
    /// Throttle pulse width latched in the output port (us)
    pub throttle_out_us: u16,
    /// Steering pulse width latched in the output port (us)
    pub steer_out_us: u16,
    /// Most recent throttle capture measurement (us)
    pub capture_throttle_us: u16,
    /// Most recent steering capture measurement (us)
    pub capture_steer_us: u16,
    /// Control tick counter
    pub tick: u16,
    /// Packed accepted/shadow drive state nibbles
    pub predicted_state_byte: u8,
    /// Throttle capture age in ticks, clamped to 255
    pub capture_throttle_age: u8,
    /// Steering capture age in ticks, clamped to 255
    pub capture_steer_age: u8,
    /// Ticks since the last accepted command frame
    pub serial_age_ticks: u16,
    /// Free-running diagnostic counter
    pub debug_counter: u16,
}

impl TelemetryFrame {
    /// Encode the frame into its 19-byte wire form
    pub fn encode(&self) -> [u8; TELEMETRY_LEN] {
        let mut buf = [0u8; TELEMETRY_LEN];
        buf[0] = TELEMETRY_START;
        buf[1] = self.mode_byte;
        buf[2..4].copy_from_slice(&self.throttle_out_us.to_be_bytes());
        buf[4..6].copy_from_slice(&self.steer_out_us.to_be_bytes());
        buf[6..8].copy_from_slice(&self.capture_throttle_us.to_be_bytes());
        buf[8..10].copy_from_slice(&self.capture_steer_us.to_be_bytes());
        buf[10..12].copy_from_slice(&self.tick.to_be_bytes());
        buf[12] = self.predicted_state_byte;
        buf[13] = self.capture_throttle_age;
        buf[14] = self.capture_steer_age;
        buf[15..17].copy_from_slice(&self.serial_age_ticks.to_be_bytes());
        buf[17..19].copy_from_slice(&self.debug_counter.to_be_bytes());
        buf
    }
}

/// Telemetry writer statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct TelemetryStats {
    /// Frames loaded for transmit
    pub frames_loaded: u32,
    /// Frames fully drained to the port
    pub frames_completed: u32,
    /// Frames replaced before fully draining
    pub frames_dropped: u32,
}

/// Paced telemetry transmitter
///
/// Holds one encoded frame and a drain cursor. The newest snapshot always
/// wins: loading while a frame is part-way out abandons the remainder.
pub struct TelemetryWriter {
    buffer: [u8; TELEMETRY_LEN],
    cursor: usize,
    stats: TelemetryStats,
}

impl TelemetryWriter {
    /// Create a writer with no frame pending
    pub const fn new() -> Self {
        Self {
            buffer: [0u8; TELEMETRY_LEN],
            cursor: TELEMETRY_LEN,
            stats: TelemetryStats {
                frames_loaded: 0,
                frames_completed: 0,
                frames_dropped: 0,
            },
        }
    }

    /// Replace the buffered frame and rewind the transmit cursor
    pub fn load(&mut self, frame: &TelemetryFrame) {
        if self.pending() {
            self.stats.frames_dropped += 1;
        }
        self.buffer = frame.encode();
        self.cursor = 0;
        self.stats.frames_loaded += 1;
    }

    /// Check whether undrained frame bytes remain
    pub fn pending(&self) -> bool {
        self.cursor < TELEMETRY_LEN
    }

    /// Offer at most one buffered byte to the serial port
    ///
    /// # Returns
    ///
    /// true if a byte was accepted by the port
    pub fn pump<S: SerialInterface>(&mut self, serial: &mut S) -> bool {
        if !self.pending() {
            return false;
        }
        if !serial.try_write(self.buffer[self.cursor]) {
            return false;
        }
        self.cursor += 1;
        if self.cursor == TELEMETRY_LEN {
            self.stats.frames_completed += 1;
        }
        true
    }

    /// Get writer statistics
    pub fn stats(&self) -> TelemetryStats {
        self.stats
    }

    /// Reset writer statistics
    pub fn reset_stats(&mut self) {
        self.stats = TelemetryStats::default();
    }
}

impl Default for TelemetryWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockSerial;

    fn sample_frame() -> TelemetryFrame {
        TelemetryFrame {
            mode_byte: 0x19,
            throttle_out_us: 1563,
            steer_out_us: 1510,
            capture_throttle_us: 1602,
            capture_steer_us: 1488,
            tick: 0x1234,
            predicted_state_byte: 0x12,
            capture_throttle_age: 0,
            capture_steer_age: 3,
            serial_age_ticks: 0x0105,
            debug_counter: 0xBEEF,
        }
    }

    #[test]
    fn test_encode_layout() {
        let frame = sample_frame();
        let bytes = frame.encode();

        assert_eq!(bytes.len(), TELEMETRY_LEN);
        assert_eq!(bytes[0], b'S');
        assert_eq!(bytes[1], 0x19);
        // 1563 = 0x061B
        assert_eq!(&bytes[2..4], &[0x06, 0x1B]);
        // 1510 = 0x05E6
        assert_eq!(&bytes[4..6], &[0x05, 0xE6]);
        // 1602 = 0x0642
        assert_eq!(&bytes[6..8], &[0x06, 0x42]);
        // 1488 = 0x05D0
        assert_eq!(&bytes[8..10], &[0x05, 0xD0]);
        assert_eq!(&bytes[10..12], &[0x12, 0x34]);
        assert_eq!(bytes[12], 0x12);
        assert_eq!(bytes[13], 0);
        assert_eq!(bytes[14], 3);
        assert_eq!(&bytes[15..17], &[0x01, 0x05]);
        assert_eq!(&bytes[17..19], &[0xBE, 0xEF]);
    }

    #[test]
    fn test_pump_drains_one_byte_per_call() {
        let mut writer = TelemetryWriter::new();
        let mut serial = MockSerial::new();
        writer.load(&sample_frame());

        for _ in 0..TELEMETRY_LEN {
            assert!(writer.pending());
            assert!(writer.pump(&mut serial));
        }
        assert!(!writer.pending());
        assert!(!writer.pump(&mut serial));
        assert_eq!(serial.tx_data(), &sample_frame().encode()[..]);
        assert_eq!(writer.stats().frames_completed, 1);
        assert_eq!(writer.stats().frames_dropped, 0);
    }

    #[test]
    fn test_busy_port_holds_cursor() {
        let mut writer = TelemetryWriter::new();
        let mut serial = MockSerial::new();
        serial.set_tx_busy_polls(2);
        writer.load(&sample_frame());

        assert!(!writer.pump(&mut serial));
        assert!(!writer.pump(&mut serial));
        assert!(writer.pump(&mut serial));
        assert_eq!(serial.tx_data(), &[b'S']);
    }

    #[test]
    fn test_load_replaces_partial_frame() {
        let mut writer = TelemetryWriter::new();
        let mut serial = MockSerial::new();
        writer.load(&sample_frame());
        for _ in 0..5 {
            writer.pump(&mut serial);
        }

        let mut next = sample_frame();
        next.tick = 0x1235;
        writer.load(&next);

        serial.clear_tx_data();
        while writer.pump(&mut serial) {}
        assert_eq!(serial.tx_data(), &next.encode()[..]);
        assert_eq!(writer.stats().frames_loaded, 2);
        assert_eq!(writer.stats().frames_dropped, 1);
        assert_eq!(writer.stats().frames_completed, 1);
    }

    #[test]
    fn test_new_writer_has_nothing_pending() {
        let mut writer = TelemetryWriter::new();
        let mut serial = MockSerial::new();
        assert!(!writer.pending());
        assert!(!writer.pump(&mut serial));
        assert!(serial.tx_data().is_empty());
    }
}
