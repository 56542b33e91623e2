//! Remote Modes
//!
//! Human RC control. `RemoteOnly` is the plain pass-through used for normal
//! driving; `RemoteStateDemo` replaces the throttle with fixed demo values
//! to exercise the ESC predictor's reversal gating from the transmitter.
//!
//! ## Behavior
//!
//! - Steering always follows the capture reading, raw
//! - Throttle goes neutral when the capture throttle is stale beyond 10
//!   ticks (disconnected wire, dead receiver)
//! - RemoteOnly passes the raw capture pulse to the ESC, bypassing the
//!   predictor's action mapping; the predictor still tracks the latched
//!   output
//! - RemoteStateDemo classifies the knob against center and commands full
//!   forward, full backward, or brake

use crate::car::state::ControllerState;
use crate::car::throttle::{self, Enforcement, ThrottleCommand, THROTTLE_CENTER};
use crate::libraries::ServoChannels;
use crate::platform::CaptureChannel;

/// Run one RemoteOnly tick
pub fn tick_remote_only(state: &mut ControllerState, servos: &mut ServoChannels) {
    servos.set_steering_raw(state.inputs.capture_steer.value_us);
    if state.inputs.capture_stale(CaptureChannel::Throttle) {
        state.note_failsafe();
        servos.set_throttle_command(ThrottleCommand::neutral(), &state.predictor);
        return;
    }
    servos.set_throttle_raw(state.inputs.capture_throttle.value_us);
    state.debug_counter = state.debug_counter.wrapping_add(1);
}

/// Run one RemoteStateDemo tick
pub fn tick_state_demo(state: &mut ControllerState, servos: &mut ServoChannels) {
    servos.set_steering_raw(state.inputs.capture_steer.value_us);
    if state.inputs.capture_stale(CaptureChannel::Throttle) {
        state.note_failsafe();
        servos.set_throttle_command(ThrottleCommand::neutral(), &state.predictor);
        return;
    }

    let mapped = throttle::capture_to_throttle(state.inputs.capture_throttle.value_us, &state.config);
    let cmd = if mapped > THROTTLE_CENTER {
        ThrottleCommand::new(2000, Enforcement::PassThrough)
    } else if mapped < THROTTLE_CENTER {
        ThrottleCommand::new(1000, Enforcement::ForceBackward)
    } else {
        ThrottleCommand::new(1000, Enforcement::ForceBrake)
    };
    servos.set_throttle_command(cmd, &state.predictor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ControllerConfig;
    use crate::platform::mock::MockServoBank;
    use crate::platform::{ServoChannel, ServoInterface};

    fn fresh_state(steer_us: u16, throttle_us: u16) -> ControllerState {
        let mut state = ControllerState::new(ControllerConfig::default());
        state.advance_tick();
        state.inputs.refresh_capture(CaptureChannel::Steering, steer_us);
        state
            .inputs
            .refresh_capture(CaptureChannel::Throttle, throttle_us);
        state.inputs.bump_ages();
        state
    }

    #[test]
    fn test_remote_only_passes_both_channels_raw() {
        let mut state = fresh_state(1432, 1610);
        let mut bank = MockServoBank::new();
        let mut servos = ServoChannels::new(&mut bank, state.config);

        tick_remote_only(&mut state, &mut servos);

        assert_eq!(bank.current(ServoChannel::Steering), 1432);
        assert_eq!(bank.current(ServoChannel::Throttle), 1610);
        assert_eq!(state.debug_counter, 1);
    }

    #[test]
    fn test_remote_only_neutralizes_stale_throttle() {
        let mut state = ControllerState::new(ControllerConfig::default());
        state.advance_tick();
        state.inputs.refresh_capture(CaptureChannel::Steering, 1480);
        state.inputs.bump_ages();
        let mut bank = MockServoBank::new();
        let mut servos = ServoChannels::new(&mut bank, state.config);

        tick_remote_only(&mut state, &mut servos);

        assert_eq!(bank.current(ServoChannel::Steering), 1480);
        assert_eq!(bank.current(ServoChannel::Throttle), 1478);
        assert_eq!(state.debug_counter, 0);
    }

    #[test]
    fn test_state_demo_forward_knob_commands_full_forward() {
        // 1700 us maps above center; demo value 2000 leaves the action
        // mapping at 2063 (2000 - 1500 + min_forward_moving)
        let mut state = fresh_state(1500, 1700);
        let mut bank = MockServoBank::new();
        let mut servos = ServoChannels::new(&mut bank, state.config);

        tick_state_demo(&mut state, &mut servos);

        assert_eq!(bank.current(ServoChannel::Throttle), 2063);
    }

    #[test]
    fn test_state_demo_backward_knob_respects_gating() {
        // Power-on prediction still allows forward, so the backward demo
        // command passes through as a brake pulse (1000 - 1500 + 1400)
        let mut state = fresh_state(1500, 1300);
        let mut bank = MockServoBank::new();
        let mut servos = ServoChannels::new(&mut bank, state.config);

        tick_state_demo(&mut state, &mut servos);

        assert_eq!(bank.current(ServoChannel::Throttle), 900);
    }

    #[test]
    fn test_state_demo_neutral_knob_commands_brake() {
        // Power-on prediction still allows backward, so the brake demo
        // command lands just above the neutral band top
        let mut state = fresh_state(1500, 1500);
        let mut bank = MockServoBank::new();
        let mut servos = ServoChannels::new(&mut bank, state.config);

        tick_state_demo(&mut state, &mut servos);

        assert_eq!(bank.current(ServoChannel::Throttle), 1511);
    }
}
