//! Input freshness tracking
//!
//! Every decision input carries an age in control ticks alongside its value:
//! the two capture channels as `{value_us, age_ticks}` samples and the
//! latest decoded serial command with its own age. Ages increment once per
//! tick, reset to zero on a fresh sample, and saturate rather than wrap, so
//! a dead source can never tick back around to "fresh". Staleness is the
//! only failure signal the mode policies ever see.

use crate::communication::command::SerialCommand;
use crate::platform::traits::CaptureChannel;

/// Capture staleness threshold (ticks, ~100 ms); beyond this the radio
/// reading must not drive the car
pub const CAPTURE_TIMEOUT_TICKS: u16 = 10;

/// Serial link-loss threshold (ticks, ~10 s); at this age the arbiter
/// reverts to the default mode
pub const SERIAL_LINK_TIMEOUT_TICKS: u16 = 1000;

/// One freshness-tracked pulse-width input
#[derive(Debug, Clone, Copy)]
pub struct InputSample {
    /// Last sampled pulse width (µs)
    pub value_us: u16,
    /// Ticks since the last sample, saturating
    pub age_ticks: u16,
}

impl InputSample {
    /// Sample that has never been refreshed (maximally stale)
    pub const fn never() -> Self {
        Self {
            value_us: 1500,
            age_ticks: u16::MAX,
        }
    }

    fn refresh(&mut self, value_us: u16) {
        self.value_us = value_us;
        self.age_ticks = 0;
    }

    fn bump_age(&mut self) {
        self.age_ticks = self.age_ticks.saturating_add(1);
    }

    /// True once the sample is older than `timeout_ticks`
    pub fn is_stale(&self, timeout_ticks: u16) -> bool {
        self.age_ticks > timeout_ticks
    }

    /// Age clamped to one byte for the telemetry frame
    pub fn wire_age(&self) -> u8 {
        self.age_ticks.min(u16::from(u8::MAX)) as u8
    }
}

/// Freshness-tracked inputs read by the mode arbiter
#[derive(Debug, Clone, Copy)]
pub struct InputTracker {
    /// Steering capture channel
    pub capture_steer: InputSample,
    /// Throttle capture channel
    pub capture_throttle: InputSample,
    /// Latest decoded serial command
    pub serial: SerialCommand,
    /// Ticks since the last decoded frame, saturating
    pub serial_age_ticks: u16,
}

impl InputTracker {
    /// Create a tracker with every input maximally stale
    pub const fn new() -> Self {
        Self {
            capture_steer: InputSample::never(),
            capture_throttle: InputSample::never(),
            serial: SerialCommand::neutral(),
            serial_age_ticks: u16::MAX,
        }
    }

    /// Record a completed capture measurement
    pub fn refresh_capture(&mut self, channel: CaptureChannel, value_us: u16) {
        match channel {
            CaptureChannel::Steering => self.capture_steer.refresh(value_us),
            CaptureChannel::Throttle => self.capture_throttle.refresh(value_us),
        }
    }

    /// Record a decoded serial command
    pub fn refresh_serial(&mut self, command: SerialCommand) {
        self.serial = command;
        self.serial_age_ticks = 0;
    }

    /// Advance every age by one tick
    pub fn bump_ages(&mut self) {
        self.capture_steer.bump_age();
        self.capture_throttle.bump_age();
        self.serial_age_ticks = self.serial_age_ticks.saturating_add(1);
    }

    /// Capture reading too old to drive with
    pub fn capture_stale(&self, channel: CaptureChannel) -> bool {
        match channel {
            CaptureChannel::Steering => self.capture_steer.is_stale(CAPTURE_TIMEOUT_TICKS),
            CaptureChannel::Throttle => self.capture_throttle.is_stale(CAPTURE_TIMEOUT_TICKS),
        }
    }

    /// Either capture channel too old to drive with
    pub fn any_capture_stale(&self) -> bool {
        self.capture_stale(CaptureChannel::Steering) || self.capture_stale(CaptureChannel::Throttle)
    }

    /// Serial session older than the timeout the peer declared for itself
    pub fn serial_session_stale(&self) -> bool {
        self.serial_age_ticks > u16::from(self.serial.session_timeout_ticks)
    }

    /// Serial link gone altogether
    pub fn serial_link_lost(&self) -> bool {
        self.serial_age_ticks >= SERIAL_LINK_TIMEOUT_TICKS
    }
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new()
    }
}
