//! Mock serial port implementation for testing

use crate::platform::traits::SerialInterface;
use std::collections::VecDeque;
use std::vec::Vec;

/// Mock serial port
///
/// Provides in-memory buffers for transmit and receive data, allowing unit
/// tests to verify serial traffic without hardware.
///
/// # Example
///
/// ```
/// use dualpilot::platform::mock::MockSerial;
/// use dualpilot::platform::traits::SerialInterface;
///
/// let mut serial = MockSerial::new();
/// serial.inject_rx_data(b"Bx");
/// assert_eq!(serial.poll_read(), Some(b'B'));
/// assert!(serial.try_write(b'S'));
/// assert_eq!(serial.tx_data(), b"S");
/// ```
#[derive(Debug, Default)]
pub struct MockSerial {
    rx_queue: VecDeque<u8>,
    tx_data: Vec<u8>,
    tx_busy_polls: u32,
}

impl MockSerial {
    /// Create a new mock serial port
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject receive data (for test setup)
    pub fn inject_rx_data(&mut self, data: &[u8]) {
        self.rx_queue.extend(data.iter().copied());
    }

    /// Get transmitted data (for test verification)
    pub fn tx_data(&self) -> &[u8] {
        &self.tx_data
    }

    /// Clear transmitted data
    pub fn clear_tx_data(&mut self) {
        self.tx_data.clear();
    }

    /// Refuse the next `polls` transmit attempts (simulates a busy register)
    pub fn set_tx_busy_polls(&mut self, polls: u32) {
        self.tx_busy_polls = polls;
    }

    /// Number of injected bytes not yet read
    pub fn rx_pending(&self) -> usize {
        self.rx_queue.len()
    }
}

impl SerialInterface for MockSerial {
    fn poll_read(&mut self) -> Option<u8> {
        self.rx_queue.pop_front()
    }

    fn try_write(&mut self, byte: u8) -> bool {
        if self.tx_busy_polls > 0 {
            self.tx_busy_polls -= 1;
            return false;
        }
        self.tx_data.push(byte);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_read_consumes_injected_bytes() {
        let mut serial = MockSerial::new();
        serial.inject_rx_data(&[1, 2]);
        assert_eq!(serial.poll_read(), Some(1));
        assert_eq!(serial.poll_read(), Some(2));
        assert_eq!(serial.poll_read(), None);
    }

    #[test]
    fn test_try_write_records_bytes() {
        let mut serial = MockSerial::new();
        assert!(serial.try_write(0x53));
        assert!(serial.try_write(0x10));
        assert_eq!(serial.tx_data(), &[0x53, 0x10]);
    }

    #[test]
    fn test_busy_polls_refuse_then_recover() {
        let mut serial = MockSerial::new();
        serial.set_tx_busy_polls(2);
        assert!(!serial.try_write(0xAA));
        assert!(!serial.try_write(0xAA));
        assert!(serial.try_write(0xAA));
        assert_eq!(serial.tx_data(), &[0xAA]);
    }
}
