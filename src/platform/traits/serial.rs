//! Serial port interface trait
//!
//! Byte-at-a-time polled access to the command/telemetry UART. The control
//! loop polls faster than one byte time, so single-byte transfers never
//! drop data (see `core::scheduler` for the timing contract).

/// Serial port interface trait
///
/// Platform implementations must provide this interface for the serial link
/// to the autonomous command source.
///
/// Both operations are non-blocking: the loop owns the pacing, the port only
/// reports readiness.
pub trait SerialInterface {
    /// Poll for one received byte
    ///
    /// # Returns
    ///
    /// `Some(byte)` if a byte was waiting in the receive register, `None`
    /// otherwise. Reading consumes the byte.
    fn poll_read(&mut self) -> Option<u8>;

    /// Try to transmit one byte
    ///
    /// # Returns
    ///
    /// `true` if the transmit register accepted the byte, `false` if it is
    /// still busy with the previous byte (retry on a later poll).
    fn try_write(&mut self, byte: u8) -> bool;
}
