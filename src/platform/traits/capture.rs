//! Pulse-width capture interface trait
//!
//! The RC receiver outputs one servo pulse per channel per frame; the
//! capture hardware measures the high time of each pulse. A measurement
//! becomes available at the pulse's falling edge and is consumed by `poll`.

/// Receiver channels measured by the capture unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureChannel {
    /// Steering wheel channel
    Steering,
    /// Throttle trigger channel
    Throttle,
}

/// Pulse-width capture interface trait
///
/// Platform implementations convert raw timer counts to microseconds before
/// reporting; the core only ever sees µs.
pub trait CaptureInterface {
    /// Poll for a completed pulse measurement
    ///
    /// # Arguments
    ///
    /// * `channel` - Receiver channel to poll
    ///
    /// # Returns
    ///
    /// `Some(width_us)` if a pulse completed since the last poll of this
    /// channel, `None` otherwise. Consuming the measurement re-arms the
    /// channel for the next pulse.
    fn poll(&mut self, channel: CaptureChannel) -> Option<u16>;
}
