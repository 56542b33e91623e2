//! Mock pulse-width capture implementation for testing

use crate::platform::traits::{CaptureChannel, CaptureInterface};
use std::collections::VecDeque;

/// Mock capture unit
///
/// Tests push pre-recorded pulse widths per channel; each `poll` pops one
/// measurement, mirroring a hardware capture register that holds at most the
/// latest completed pulse. An empty queue models a transmitter that has gone
/// quiet.
#[derive(Debug, Default)]
pub struct MockCapture {
    steering: VecDeque<u16>,
    throttle: VecDeque<u16>,
}

impl MockCapture {
    /// Create a new mock capture unit with no pending measurements
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a pulse-width measurement on one channel (for test setup)
    pub fn push_measurement(&mut self, channel: CaptureChannel, width_us: u16) {
        self.queue_mut(channel).push_back(width_us);
    }

    /// Number of measurements not yet polled on one channel
    pub fn pending(&self, channel: CaptureChannel) -> usize {
        match channel {
            CaptureChannel::Steering => self.steering.len(),
            CaptureChannel::Throttle => self.throttle.len(),
        }
    }

    fn queue_mut(&mut self, channel: CaptureChannel) -> &mut VecDeque<u16> {
        match channel {
            CaptureChannel::Steering => &mut self.steering,
            CaptureChannel::Throttle => &mut self.throttle,
        }
    }
}

impl CaptureInterface for MockCapture {
    fn poll(&mut self, channel: CaptureChannel) -> Option<u16> {
        self.queue_mut(channel).pop_front()
    }
}
