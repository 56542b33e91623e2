//! Inbound serial command gateway
//!
//! Decodes the 9-byte command frames sent by the autonomous peer:
//!
//! ```text
//! ['B', thr_lo, thr_hi, steer_lo, steer_hi, mode, timeout, 0, 0]
//! ```
//!
//! Fields are little-endian. The throttle field carries an enforcement tag
//! in its top two bits (see `car::throttle`); the mode byte packs the
//! requested mode index above three substate bits (see `car::state`); the
//! timeout byte declares the session failsafe window in control ticks.
//!
//! # Framing Rules
//!
//! - The accumulator resets whenever its first byte is not `'B'`, dropping
//!   garbage one byte at a time until a start byte aligns.
//! - A complete frame with a nonzero reserved byte is *held*, not flushed:
//!   the peer may be mid-stream and a flush would eat the next real frame's
//!   start byte. Held bytes are dropped only when the accumulator fills,
//!   after which the scan for the next `'B'` resynchronizes the stream.
//! - No partial-frame data is ever acted upon.

use heapless::Vec;

use crate::car::throttle::ThrottleCommand;

/// Inbound command frame length (bytes)
pub const FRAME_LEN: usize = 9;
/// Inbound command frame start byte
pub const FRAME_START: u8 = b'B';
/// RX accumulator capacity; a held frame resynchronizes when this fills
const RX_BUFFER_SIZE: usize = 12;

/// Decoded inbound command frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialCommand {
    /// Requested throttle, tag taken from the wire bits
    pub throttle: ThrottleCommand,
    /// Requested steering pulse width (µs, before trim)
    pub steer_us: u16,
    /// Requested mode byte (index << 3, low bits ignored on receive)
    pub mode_byte: u8,
    /// Session failsafe window declared by the peer (ticks)
    pub session_timeout_ticks: u8,
}

impl SerialCommand {
    /// Neutral command: centered throttle and steering, zero-length session
    ///
    /// Used as the power-on value before any frame has arrived; with a zero
    /// session timeout it reads as stale the moment its age ticks up.
    pub const fn neutral() -> Self {
        Self {
            throttle: ThrottleCommand::neutral(),
            steer_us: 1500,
            mode_byte: 0,
            session_timeout_ticks: 0,
        }
    }

    /// Encode into the 9-byte wire frame
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let thr = self.throttle.to_wire().to_le_bytes();
        let steer = self.steer_us.to_le_bytes();
        [
            FRAME_START,
            thr[0],
            thr[1],
            steer[0],
            steer[1],
            self.mode_byte,
            self.session_timeout_ticks,
            0,
            0,
        ]
    }
}

/// Gateway statistics for monitoring and diagnostics
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewayStats {
    /// Complete frames decoded
    pub frames_decoded: u32,
    /// Bytes dropped while hunting for a start byte
    pub start_rejects: u32,
    /// Complete frames held for nonzero reserved bytes
    pub held_frames: u32,
    /// Full-accumulator resynchronizations
    pub resyncs: u32,
}

/// Inbound frame decode anomalies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Reserved tail bytes (indices 7 and 8) must be zero
    ReservedNonzero,
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameError::ReservedNonzero => write!(f, "reserved frame bytes nonzero"),
        }
    }
}

/// Byte-at-a-time command frame decoder
pub struct CommandGateway {
    rx_buffer: Vec<u8, RX_BUFFER_SIZE>,
    stats: GatewayStats,
}

impl CommandGateway {
    /// Create a new gateway with an empty accumulator
    pub fn new() -> Self {
        Self {
            rx_buffer: Vec::new(),
            stats: GatewayStats::default(),
        }
    }

    /// Get gateway statistics
    pub fn stats(&self) -> GatewayStats {
        self.stats
    }

    /// Reset gateway statistics
    pub fn reset_stats(&mut self) {
        self.stats = GatewayStats::default();
    }

    /// Feed one received byte
    ///
    /// # Returns
    ///
    /// The decoded command when this byte completes a valid frame, `None`
    /// while a frame is still accumulating or the stream is resynchronizing.
    pub fn push_byte(&mut self, byte: u8) -> Option<SerialCommand> {
        if self.rx_buffer.is_full() {
            // A held frame that never decoded; drop it and rescan
            self.rx_buffer.clear();
            self.stats.resyncs += 1;
        }
        // Cannot fail: fullness handled above
        let _ = self.rx_buffer.push(byte);

        if self.rx_buffer[0] != FRAME_START {
            self.rx_buffer.clear();
            self.stats.start_rejects += 1;
            return None;
        }
        if self.rx_buffer.len() != FRAME_LEN {
            return None;
        }

        match decode_frame(&self.rx_buffer) {
            Ok(command) => {
                self.rx_buffer.clear();
                self.stats.frames_decoded += 1;
                Some(command)
            }
            Err(_err) => {
                self.stats.held_frames += 1;
                crate::log_debug!("Command frame held: reserved bytes nonzero");
                None
            }
        }
    }
}

impl Default for CommandGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a complete frame (caller guarantees length and start byte)
fn decode_frame(frame: &[u8]) -> Result<SerialCommand, FrameError> {
    if frame[7] != 0 || frame[8] != 0 {
        return Err(FrameError::ReservedNonzero);
    }
    Ok(SerialCommand {
        throttle: ThrottleCommand::from_wire(u16::from_le_bytes([frame[1], frame[2]])),
        steer_us: u16::from_le_bytes([frame[3], frame[4]]),
        mode_byte: frame[5],
        session_timeout_ticks: frame[6],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::throttle::Enforcement;

    fn push_all(gateway: &mut CommandGateway, bytes: &[u8]) -> Option<SerialCommand> {
        let mut decoded = None;
        for &byte in bytes {
            decoded = gateway.push_byte(byte);
        }
        decoded
    }

    #[test]
    fn test_frame_round_trip() {
        let command = SerialCommand {
            throttle: ThrottleCommand::new(1320, Enforcement::ForceBackward),
            steer_us: 1485,
            mode_byte: 3 << 3,
            session_timeout_ticks: 50,
        };
        let mut gateway = CommandGateway::new();
        assert_eq!(push_all(&mut gateway, &command.encode()), Some(command));
        assert_eq!(gateway.stats().frames_decoded, 1);
    }

    #[test]
    fn test_fields_are_little_endian() {
        let mut gateway = CommandGateway::new();
        let frame = [b'B', 0xDC, 0x05, 0xE2, 0x05, 0x20, 0x14, 0, 0];
        let command = push_all(&mut gateway, &frame).unwrap();
        assert_eq!(command.throttle.value, 1500);
        assert_eq!(command.throttle.enforcement, Enforcement::PassThrough);
        assert_eq!(command.steer_us, 1506);
        assert_eq!(command.mode_byte, 0x20);
        assert_eq!(command.session_timeout_ticks, 20);
    }

    #[test]
    fn test_garbage_dropped_until_start_byte() {
        let mut gateway = CommandGateway::new();
        assert_eq!(push_all(&mut gateway, &[0x00, 0xFF, 0x53]), None);
        assert_eq!(gateway.stats().start_rejects, 3);

        // Stream aligns on the next real frame
        let command = SerialCommand {
            throttle: ThrottleCommand::neutral(),
            steer_us: 1500,
            mode_byte: 1 << 3,
            session_timeout_ticks: 10,
        };
        assert_eq!(push_all(&mut gateway, &command.encode()), Some(command));
    }

    #[test]
    fn test_partial_frame_yields_nothing() {
        let mut gateway = CommandGateway::new();
        let frame = SerialCommand::neutral().encode();
        assert_eq!(push_all(&mut gateway, &frame[..8]), None);
        assert_eq!(gateway.stats().frames_decoded, 0);
    }

    #[test]
    fn test_nonzero_reserved_byte_holds_frame() {
        let mut gateway = CommandGateway::new();
        let mut frame = SerialCommand::neutral().encode();
        frame[7] = 1;
        assert_eq!(push_all(&mut gateway, &frame), None);
        assert_eq!(gateway.stats().held_frames, 1);
        // Held, not flushed: nothing decoded yet and nothing resynced
        assert_eq!(gateway.stats().resyncs, 0);
    }

    #[test]
    fn test_held_frame_resyncs_on_next_start_byte() {
        let mut gateway = CommandGateway::new();
        let mut bad = SerialCommand::neutral().encode();
        bad[8] = 7;
        assert_eq!(push_all(&mut gateway, &bad), None);

        // The frame right after the held one is consumed by the rescan...
        let good = SerialCommand {
            throttle: ThrottleCommand::new(1700, Enforcement::PassThrough),
            steer_us: 1480,
            mode_byte: 3 << 3,
            session_timeout_ticks: 100,
        };
        assert_eq!(push_all(&mut gateway, &good.encode()), None);
        assert_eq!(gateway.stats().resyncs, 1);

        // ...and the one after that decodes cleanly
        assert_eq!(push_all(&mut gateway, &good.encode()), Some(good));
        assert_eq!(gateway.stats().frames_decoded, 1);
    }
}
