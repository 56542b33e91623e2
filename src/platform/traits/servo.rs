//! Servo output interface trait
//!
//! Two independently settable pulse-width channels (steering servo, throttle
//! ESC) backed by a double-buffered hardware comparator.
//!
//! ## Behavior
//!
//! Updates are glitch-free only when the comparator accepts them, so
//! `try_set` refuses near the period top (the new value could land half in
//! the old period) and while a just-completed period's values have not yet
//! been read out for telemetry. A refusal is not a fault: the caller's
//! contract is to recompute and retry on the next tick.
//!
//! Values outside the conventional 1000-2000 µs range drive the servo/ESC
//! to its end-stop; this layer deliberately does not clamp.

/// Output channels driven by the servo port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoChannel {
    /// Steering servo
    Steering,
    /// Throttle ESC
    Throttle,
}

impl ServoChannel {
    /// Channel index for table-backed implementations
    pub const fn index(self) -> usize {
        match self {
            ServoChannel::Steering => 0,
            ServoChannel::Throttle => 1,
        }
    }
}

/// Servo output interface trait
pub trait ServoInterface {
    /// Try to set a channel's pulse width
    ///
    /// # Arguments
    ///
    /// * `channel` - Output channel
    /// * `us` - Pulse width in microseconds (not clamped)
    ///
    /// # Returns
    ///
    /// `true` if the value was latched for the next period, `false` if the
    /// port refused the update (retry next tick, never an error).
    fn try_set(&mut self, channel: ServoChannel, us: u16) -> bool;

    /// Pulse width currently latched on a channel
    ///
    /// This is the value driving (or about to drive) the output, which can
    /// differ from the last commanded value when updates were refused. The
    /// ESC predictor and telemetry read this, never the commanded value.
    fn current(&self, channel: ServoChannel) -> u16;
}
