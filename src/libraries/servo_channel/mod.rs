//! Steering and throttle output channels
//!
//! Command surface between the mode policies and the servo output port.
//! Steering writes apply the configured trim; throttle commands route
//! through the ESC predictor's `calculate_action` so every below-center
//! request respects the reversal gating. A refused port update is dropped
//! on the floor: the arbiter recomputes its command next tick, so a refusal
//! costs one period of latency and nothing else.

use crate::car::throttle::ThrottleCommand;
use crate::libraries::esc_predictor::EscPredictor;
use crate::parameters::ControllerConfig;
use crate::platform::traits::{ServoChannel, ServoInterface};

/// Per-tick command surface over the servo output port
pub struct ServoChannels<'a> {
    port: &'a mut dyn ServoInterface,
    config: ControllerConfig,
}

impl<'a> ServoChannels<'a> {
    /// Create the command surface for one tick
    ///
    /// # Arguments
    ///
    /// * `port` - Servo output port
    /// * `config` - Parameter table (trim and throttle bands)
    pub fn new(port: &'a mut dyn ServoInterface, config: ControllerConfig) -> Self {
        Self { port, config }
    }

    /// Drive steering with a raw capture pulse width, no trim
    pub fn set_steering_raw(&mut self, us: u16) {
        let _ = self.port.try_set(ServoChannel::Steering, us);
    }

    /// Drive steering from a serial command, applying trim
    ///
    /// The output is `steer_us + extra_trim + (angle_trim - 1500)`: the base
    /// term recenters the serial convention (1500 = straight) onto the
    /// mechanical center, and `extra_trim` adds the human wheel bias in the
    /// modes that use it.
    pub fn set_steering_trimmed(&mut self, steer_us: u16, extra_trim: i16) {
        let us = i32::from(steer_us) + i32::from(extra_trim) + i32::from(self.config.angle_trim)
            - 1500;
        let _ = self.port.try_set(ServoChannel::Steering, us as u16);
    }

    /// Drive throttle with a raw pulse width, bypassing the predictor
    ///
    /// Radio pass-through path: the operator's transmitter talks straight to
    /// the ESC. The predictor still sees the latched value next tick.
    pub fn set_throttle_raw(&mut self, us: u16) {
        let _ = self.port.try_set(ServoChannel::Throttle, us);
    }

    /// Drive throttle through the predictor's reversal gating
    pub fn set_throttle_command(&mut self, cmd: ThrottleCommand, predictor: &EscPredictor) {
        let us = predictor.calculate_action(cmd, &self.config);
        let _ = self.port.try_set(ServoChannel::Throttle, us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::throttle::Enforcement;
    use crate::platform::mock::MockServoBank;

    #[test]
    fn test_raw_steering_is_untrimmed() {
        let mut bank = MockServoBank::new();
        let mut channels = ServoChannels::new(&mut bank, ControllerConfig::default());
        channels.set_steering_raw(1432);
        assert_eq!(bank.current(ServoChannel::Steering), 1432);
    }

    #[test]
    fn test_trimmed_steering_applies_base_and_extra_trim() {
        let mut bank = MockServoBank::new();
        // angle_trim 1510: base trim is +10
        let mut channels = ServoChannels::new(&mut bank, ControllerConfig::default());
        channels.set_steering_trimmed(1500, 0);
        assert_eq!(bank.current(ServoChannel::Steering), 1510);

        let mut channels = ServoChannels::new(&mut bank, ControllerConfig::default());
        channels.set_steering_trimmed(1500, -25);
        assert_eq!(bank.current(ServoChannel::Steering), 1485);
    }

    #[test]
    fn test_throttle_command_routes_through_gating() {
        let mut bank = MockServoBank::new();
        let mut channels = ServoChannels::new(&mut bank, ControllerConfig::default());
        // Power-on predictor gates the reversal down to a brake pulse
        let predictor = EscPredictor::new();
        channels.set_throttle_command(
            ThrottleCommand::new(1300, Enforcement::ForceBackward),
            &predictor,
        );
        assert_eq!(bank.current(ServoChannel::Throttle), 1200);
    }

    #[test]
    fn test_refused_update_is_dropped() {
        let mut bank = MockServoBank::new();
        bank.refuse_next(1);
        let mut channels = ServoChannels::new(&mut bank, ControllerConfig::default());
        channels.set_throttle_raw(1800);
        // Port still latches the previous value; no retry, no panic
        assert_eq!(bank.current(ServoChannel::Throttle), 1500);
    }
}
