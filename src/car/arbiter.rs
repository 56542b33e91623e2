//! Mode Arbiter
//!
//! Runs once per control tick: applies any pending serial mode-change
//! request, then executes the active mode's policy. Failsafe mode
//! reversions (serial link loss, boot expiry) live inside the policies;
//! everything else that changes the mode goes through here.
//!
//! ## Behavior
//!
//! - A mode request is honored only while the carrying frame is under 2
//!   ticks old, so a stale byte can never flip the mode long after it was
//!   sent
//! - The requested substate bits are discarded; every mode entry starts at
//!   substate 0
//! - Requests for an index outside the mode table are ignored

use crate::car::mode;
use crate::car::state::{ControllerState, GlobalMode, MODE_INDEX_SHIFT};
use crate::libraries::ServoChannels;

/// Maximum age in ticks for a serial frame to carry a mode request
pub const MODE_REQUEST_MAX_AGE_TICKS: u16 = 2;

/// Run one arbiter tick
pub fn tick(state: &mut ControllerState, servos: &mut ServoChannels) {
    apply_mode_request(state);
    run_active_mode(state, servos);
    state.settle_failsafe();
}

/// Apply a fresh serial mode-change request, if any
fn apply_mode_request(state: &mut ControllerState) {
    if state.inputs.serial_age_ticks >= MODE_REQUEST_MAX_AGE_TICKS {
        return;
    }
    let requested = state.inputs.serial.mode_byte >> MODE_INDEX_SHIFT;
    match GlobalMode::from_index(requested) {
        Some(mode) if mode != state.mode() => state.enter_mode(mode),
        Some(_) => {}
        None => {
            crate::log_warn!("Ignoring unknown mode index {}", requested);
        }
    }
}

/// Execute the active mode's policy for this tick
fn run_active_mode(state: &mut ControllerState, servos: &mut ServoChannels) {
    match state.mode() {
        GlobalMode::Boot => mode::boot::tick(state, servos),
        GlobalMode::RemoteOnly => mode::remote::tick_remote_only(state, servos),
        GlobalMode::RemoteStateDemo => mode::remote::tick_state_demo(state, servos),
        GlobalMode::SerialOnly => mode::serial_link::tick(state, servos),
        GlobalMode::Takeover => mode::takeover::tick(state, servos, false),
        GlobalMode::TakeoverWithTrim => mode::takeover::tick(state, servos, true),
        GlobalMode::SpeedLimit => mode::speed_limit::tick(state, servos),
        GlobalMode::Pause => mode::pause::tick(state, servos),
    }
}
