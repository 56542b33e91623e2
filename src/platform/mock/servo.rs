//! Mock servo output bank implementation for testing

use crate::platform::traits::{ServoChannel, ServoInterface};
use std::vec::Vec;

/// Mock servo output bank
///
/// Latches the most recent accepted pulse width per channel and records every
/// accepted write so tests can assert on the exact output sequence. Writes can
/// be made to fail for a number of calls to exercise refusal handling.
#[derive(Debug)]
pub struct MockServoBank {
    latched: [u16; 2],
    refusals_remaining: u32,
    history: Vec<(ServoChannel, u16)>,
}

impl MockServoBank {
    /// Create a new mock bank with both channels latched at 1500 us
    pub fn new() -> Self {
        Self {
            latched: [1500, 1500],
            refusals_remaining: 0,
            history: Vec::new(),
        }
    }

    /// Refuse the next `count` write attempts (simulates a busy compare unit)
    pub fn refuse_next(&mut self, count: u32) {
        self.refusals_remaining = count;
    }

    /// All accepted writes in order (for test verification)
    pub fn history(&self) -> &[(ServoChannel, u16)] {
        &self.history
    }

    /// Most recent accepted write on one channel, if any
    pub fn last_set(&self, channel: ServoChannel) -> Option<u16> {
        self.history
            .iter()
            .rev()
            .find(|(ch, _)| *ch == channel)
            .map(|(_, us)| *us)
    }

    /// Clear the recorded write history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for MockServoBank {
    fn default() -> Self {
        Self::new()
    }
}

impl ServoInterface for MockServoBank {
    fn try_set(&mut self, channel: ServoChannel, width_us: u16) -> bool {
        if self.refusals_remaining > 0 {
            self.refusals_remaining -= 1;
            return false;
        }
        self.latched[channel.index()] = width_us;
        self.history.push((channel, width_us));
        true
    }

    fn current(&self, channel: ServoChannel) -> u16 {
        self.latched[channel.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bank_latches_neutral() {
        let bank = MockServoBank::new();
        assert_eq!(bank.current(ServoChannel::Steering), 1500);
        assert_eq!(bank.current(ServoChannel::Throttle), 1500);
    }

    #[test]
    fn test_accepted_write_updates_latch_and_history() {
        let mut bank = MockServoBank::new();
        assert!(bank.try_set(ServoChannel::Throttle, 1700));
        assert_eq!(bank.current(ServoChannel::Throttle), 1700);
        assert_eq!(bank.history(), &[(ServoChannel::Throttle, 1700)]);
        assert_eq!(bank.last_set(ServoChannel::Throttle), Some(1700));
    }

    #[test]
    fn test_refused_write_leaves_latch_unchanged() {
        let mut bank = MockServoBank::new();
        bank.refuse_next(1);
        assert!(!bank.try_set(ServoChannel::Steering, 1300));
        assert_eq!(bank.current(ServoChannel::Steering), 1500);
        assert!(bank.history().is_empty());
        assert!(bank.try_set(ServoChannel::Steering, 1300));
        assert_eq!(bank.current(ServoChannel::Steering), 1300);
    }
}
