//! SerialOnly Mode
//!
//! Autonomous drive with no human override path. Steering and throttle both
//! follow the serial command stream.
//!
//! ## Behavior
//!
//! - Serial link silent for 1000 ticks (~10 s): revert to the default mode;
//!   the rest of the body still runs this tick, so one last failsafe
//!   command goes out under this mode's policy
//! - Steering from the serial command, base trim applied
//! - Serial session older than its declared timeout: neutral throttle
//! - Otherwise throttle from the serial command

use crate::car::state::ControllerState;
use crate::car::throttle::ThrottleCommand;
use crate::libraries::ServoChannels;

/// Run one SerialOnly tick
pub fn tick(state: &mut ControllerState, servos: &mut ServoChannels) {
    if state.inputs.serial_link_lost() {
        state.enter_mode(state.config.default_mode);
    }
    servos.set_steering_trimmed(state.inputs.serial.steer_us, 0);
    if state.inputs.serial_session_stale() {
        state.note_failsafe();
        servos.set_throttle_command(ThrottleCommand::neutral(), &state.predictor);
        return;
    }
    servos.set_throttle_command(state.inputs.serial.throttle, &state.predictor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::state::GlobalMode;
    use crate::car::throttle::Enforcement;
    use crate::communication::SerialCommand;
    use crate::parameters::ControllerConfig;
    use crate::platform::mock::MockServoBank;
    use crate::platform::{ServoChannel, ServoInterface};

    fn forward_command() -> SerialCommand {
        SerialCommand {
            throttle: ThrottleCommand::new(1600, Enforcement::PassThrough),
            steer_us: 1520,
            mode_byte: (GlobalMode::SerialOnly.index()) << 3,
            session_timeout_ticks: 5,
        }
    }

    #[test]
    fn test_drives_both_channels_from_serial() {
        let mut state = ControllerState::new(ControllerConfig::default());
        state.enter_mode(GlobalMode::SerialOnly);
        state.advance_tick();
        state.inputs.refresh_serial(forward_command());
        state.inputs.bump_ages();
        let mut bank = MockServoBank::new();
        let mut servos = ServoChannels::new(&mut bank, state.config);

        tick(&mut state, &mut servos);

        // 1520 + (1510 - 1500) base trim
        assert_eq!(bank.current(ServoChannel::Steering), 1530);
        // 1600 - 1500 + min_forward_moving
        assert_eq!(bank.current(ServoChannel::Throttle), 1663);
        assert_eq!(state.mode(), GlobalMode::SerialOnly);
    }

    #[test]
    fn test_session_timeout_neutralizes_throttle_only() {
        let mut state = ControllerState::new(ControllerConfig::default());
        state.enter_mode(GlobalMode::SerialOnly);
        state.inputs.refresh_serial(forward_command());
        for _ in 0..6 {
            state.advance_tick();
            state.inputs.bump_ages();
        }
        let mut bank = MockServoBank::new();
        let mut servos = ServoChannels::new(&mut bank, state.config);

        tick(&mut state, &mut servos);

        assert_eq!(bank.current(ServoChannel::Steering), 1530);
        assert_eq!(bank.current(ServoChannel::Throttle), 1478);
        assert_eq!(state.mode(), GlobalMode::SerialOnly);
    }

    #[test]
    fn test_link_loss_reverts_to_default_and_still_fails_safe() {
        let mut state = ControllerState::new(ControllerConfig::default());
        state.enter_mode(GlobalMode::SerialOnly);
        state.advance_tick();
        let mut bank = MockServoBank::new();
        let mut servos = ServoChannels::new(&mut bank, state.config);

        // Inputs never refreshed: link lost, session stale
        tick(&mut state, &mut servos);

        assert_eq!(state.mode(), ControllerConfig::default().default_mode);
        assert_eq!(bank.current(ServoChannel::Steering), 1510);
        assert_eq!(bank.current(ServoChannel::Throttle), 1478);
    }
}
