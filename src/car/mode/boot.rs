//! Boot Mode
//!
//! Power-on hold. The ESC arms against a steady neutral pulse; driving
//! during that window risks an uncontrolled start, so throttle is pinned to
//! neutral and steering is left untouched until the hold expires.
//!
//! ## Behavior
//!
//! - Command neutral throttle every tick
//! - After 300 ticks (~3 s) switch to the configured default mode

use crate::car::state::ControllerState;
use crate::car::throttle::ThrottleCommand;
use crate::libraries::ServoChannels;

/// Ticks to hold neutral before handing control to the default mode
pub const BOOT_HOLD_TICKS: u16 = 300;

/// Run one Boot tick
pub fn tick(state: &mut ControllerState, servos: &mut ServoChannels) {
    servos.set_throttle_command(ThrottleCommand::neutral(), &state.predictor);
    if state.ticks_in_substate() > BOOT_HOLD_TICKS {
        state.enter_mode(state.config.default_mode);
    }
}
