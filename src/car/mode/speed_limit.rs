//! SpeedLimit Mode
//!
//! Autonomous drive with the human throttle knob as a dead-man ceiling: the
//! serial source may never command more forward deflection than the human
//! is holding on the knob, and with the knob at or below neutral the serial
//! throttle is forced to neutral outright.
//!
//! ## Behavior
//!
//! - Serial link silent for 1000 ticks: revert to the default mode, then
//!   finish the tick under this policy
//! - Steering always from serial, biased by the human wheel deflection
//! - Any stale input (either capture, or serial session past its declared
//!   timeout): neutral throttle
//! - Knob forward: serial throttle clamped to the knob's mapped deflection
//!   in both directions
//! - Knob at or below neutral: neutral throttle

use crate::car::state::ControllerState;
use crate::car::throttle::{self, ThrottleCommand, THROTTLE_CENTER};
use crate::libraries::ServoChannels;

use super::capture_steer_offset;

/// Run one SpeedLimit tick
pub fn tick(state: &mut ControllerState, servos: &mut ServoChannels) {
    if state.inputs.serial_link_lost() {
        state.enter_mode(state.config.default_mode);
    }
    let trim = capture_steer_offset(state);
    if state.inputs.any_capture_stale() || state.inputs.serial_session_stale() {
        state.note_failsafe();
        servos.set_steering_trimmed(state.inputs.serial.steer_us, trim);
        servos.set_throttle_command(ThrottleCommand::neutral(), &state.predictor);
        return;
    }

    servos.set_steering_trimmed(state.inputs.serial.steer_us, trim);
    let ceiling = throttle::capture_to_throttle(state.inputs.capture_throttle.value_us, &state.config);
    if ceiling > THROTTLE_CENTER {
        let limited = throttle::limit_forward(state.inputs.serial.throttle, ceiling);
        servos.set_throttle_command(limited, &state.predictor);
    } else {
        servos.set_throttle_command(ThrottleCommand::neutral(), &state.predictor);
    }
}
