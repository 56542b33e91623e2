//! Takeover Modes
//!
//! Autonomous drive the human can interrupt at any moment by moving the
//! throttle knob. `Takeover` and `TakeoverWithTrim` share this body; the
//! trim variant additionally biases serial steering by the human's wheel
//! deflection, so a passenger can keep correcting a drifting straight-line
//! calibration while the serial source drives.
//!
//! ## Behavior
//!
//! - Serial link silent for 1000 ticks: revert to the default mode, then
//!   finish the tick under this policy
//! - Either capture channel stale: serial steering (plus trim), neutral
//!   throttle
//! - Knob off neutral, or serial session past its declared timeout: the
//!   human drives. Steering and throttle come from capture, the throttle
//!   backward-tagged so a pull into reverse brakes first. Substate 0 goes
//!   to 1 on the first such tick; after more than 5 held ticks it goes to
//!   2, re-entering 2 on later ticks to stretch the release window
//! - Knob back at neutral in substate 2: keep driving from capture (which
//!   now commands neutral) for up to 200 ticks before handing control back
//!   to serial; a knob that was held under 6 ticks hands back immediately
//! - Otherwise: serial steering (plus trim) and serial throttle

use crate::car::state::ControllerState;
use crate::car::throttle::{self, Enforcement, ThrottleCommand, THROTTLE_CENTER};
use crate::libraries::ServoChannels;

use super::capture_steer_offset;

/// Held ticks before a takeover is considered deliberate
pub const TAKEOVER_CONFIRM_TICKS: u16 = 5;

/// Neutral-knob ticks before control returns to serial
pub const SERIAL_REGAIN_DELAY_TICKS: u16 = 200;

/// Run one Takeover tick
///
/// # Arguments
///
/// * `apply_trim` - Bias serial steering by the human wheel deflection
///   (the TakeoverWithTrim variant)
pub fn tick(state: &mut ControllerState, servos: &mut ServoChannels, apply_trim: bool) {
    let trim = if apply_trim {
        capture_steer_offset(state)
    } else {
        0
    };

    if state.inputs.serial_link_lost() {
        state.enter_mode(state.config.default_mode);
    }
    if state.inputs.any_capture_stale() {
        state.note_failsafe();
        servos.set_steering_trimmed(state.inputs.serial.steer_us, trim);
        servos.set_throttle_command(ThrottleCommand::neutral(), &state.predictor);
        return;
    }

    let mapped = throttle::capture_to_throttle(state.inputs.capture_throttle.value_us, &state.config);
    if mapped != THROTTLE_CENTER || state.inputs.serial_session_stale() {
        // Human takes over
        servos.set_steering_raw(state.inputs.capture_steer.value_us);
        servos.set_throttle_command(
            ThrottleCommand::new(mapped, Enforcement::ForceBackward),
            &state.predictor,
        );
        if state.substate() == 0 {
            state.switch_substate(1);
        } else if state.ticks_in_substate() > TAKEOVER_CONFIRM_TICKS {
            // Re-entering substate 2 restarts the release window
            state.switch_substate(2);
        }
        return;
    }

    if state.substate() == 2 {
        // Knob released after a confirmed takeover: wait before handing
        // control back to serial
        servos.set_steering_raw(state.inputs.capture_steer.value_us);
        servos.set_throttle_command(
            ThrottleCommand::new(mapped, Enforcement::ForceBackward),
            &state.predictor,
        );
        if state.ticks_in_substate() > SERIAL_REGAIN_DELAY_TICKS {
            state.switch_substate(0);
        }
        return;
    }

    // Knob at neutral and no confirmed takeover pending: serial drives
    state.switch_substate(0);
    servos.set_steering_trimmed(state.inputs.serial.steer_us, trim);
    servos.set_throttle_command(state.inputs.serial.throttle, &state.predictor);
}
