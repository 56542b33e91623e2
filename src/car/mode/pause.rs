//! Pause Mode
//!
//! Autonomous drive with a press-and-release gesture on the throttle knob
//! toggling a paused state. A deliberate press brakes the car; once the
//! knob is released the car sits paused (neutral throttle, steering still
//! on the wheel) until a second press-and-release resumes serial control.
//!
//! ## Behavior
//!
//! The gesture detector is an eight-phase debounce chain over the knob
//! condition (pressed = mapped capture throttle off center). Phases 0 and 1
//! are "running", 2 and 3 the braking press, 4 through 7 the paused state
//! and its exit gesture. Each advance requires the triggering condition to
//! persist for more than 5 ticks; a contradicting reading at phases 2-7
//! steps back one phase instead of restarting the chain.
//!
//! - Serial link silent for 1000 ticks: revert to the default mode, then
//!   finish the tick under this policy
//! - Any stale input: serial steering plus wheel bias, neutral throttle
//! - Phases 0-3 drive as commented below; phases 4-7 hold capture steering
//!   with neutral throttle

use crate::car::state::ControllerState;
use crate::car::throttle::{self, Enforcement, ThrottleCommand, THROTTLE_CENTER};
use crate::libraries::ServoChannels;

use super::capture_steer_offset;

/// Held ticks before a knob condition is believed
pub const PRESS_DEBOUNCE_TICKS: u16 = 5;

/// Run one Pause tick
pub fn tick(state: &mut ControllerState, servos: &mut ServoChannels) {
    let trim = capture_steer_offset(state);
    if state.inputs.serial_link_lost() {
        state.enter_mode(state.config.default_mode);
    }
    if state.inputs.any_capture_stale() || state.inputs.serial_session_stale() {
        state.note_failsafe();
        servos.set_steering_trimmed(state.inputs.serial.steer_us, trim);
        servos.set_throttle_command(ThrottleCommand::neutral(), &state.predictor);
        return;
    }

    let mapped = throttle::capture_to_throttle(state.inputs.capture_throttle.value_us, &state.config);
    let pressed = mapped != THROTTLE_CENTER;

    match state.substate() {
        // Running
        0 => {
            if pressed {
                drive_brake(state, servos);
                state.switch_substate(1);
            } else {
                drive_serial(state, servos, trim);
            }
        }
        // Press detected, waiting for it to persist
        1 => {
            if pressed {
                drive_brake(state, servos);
                if state.ticks_in_substate() > PRESS_DEBOUNCE_TICKS {
                    state.switch_substate(2);
                }
            } else {
                // False alarm, keep running
                state.switch_substate(0);
                drive_serial(state, servos, trim);
            }
        }
        // Deliberate press, waiting for release
        2 => {
            if pressed {
                drive_brake(state, servos);
            } else {
                state.switch_substate(3);
                drive_paused(state, servos);
            }
        }
        // Release detected, waiting for it to persist
        3 => {
            if pressed {
                state.switch_substate(2);
                drive_brake(state, servos);
            } else {
                drive_paused(state, servos);
                if state.ticks_in_substate() > PRESS_DEBOUNCE_TICKS {
                    state.switch_substate(4);
                }
            }
        }
        // Paused
        4 => {
            drive_paused(state, servos);
            if pressed {
                state.switch_substate(5);
            }
        }
        // Paused, press detected
        5 => {
            drive_paused(state, servos);
            if pressed {
                if state.ticks_in_substate() > PRESS_DEBOUNCE_TICKS {
                    state.switch_substate(6);
                }
            } else {
                state.switch_substate(4);
            }
        }
        // Paused, deliberate press, waiting for release
        6 => {
            drive_paused(state, servos);
            if !pressed && state.ticks_in_substate() > PRESS_DEBOUNCE_TICKS {
                state.switch_substate(7);
            }
        }
        // Paused, release detected
        7 => {
            drive_paused(state, servos);
            if pressed {
                state.switch_substate(6);
            } else if state.ticks_in_substate() > PRESS_DEBOUNCE_TICKS {
                // Unpause
                state.switch_substate(0);
            }
        }
        _ => state.switch_substate(0),
    }
}

/// Brake against the press: capture steering, brake-tagged full reverse
fn drive_brake(state: &ControllerState, servos: &mut ServoChannels) {
    servos.set_steering_raw(state.inputs.capture_steer.value_us);
    servos.set_throttle_command(
        ThrottleCommand::new(1000, Enforcement::ForceBrake),
        &state.predictor,
    );
}

/// Hold paused: capture steering, neutral throttle
fn drive_paused(state: &ControllerState, servos: &mut ServoChannels) {
    servos.set_steering_raw(state.inputs.capture_steer.value_us);
    servos.set_throttle_command(ThrottleCommand::neutral(), &state.predictor);
}

/// Serial control: trimmed serial steering, serial throttle
fn drive_serial(state: &ControllerState, servos: &mut ServoChannels, trim: i16) {
    servos.set_steering_trimmed(state.inputs.serial.steer_us, trim);
    servos.set_throttle_command(state.inputs.serial.throttle, &state.predictor);
}
