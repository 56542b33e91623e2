//! Control mode policies
//!
//! One policy function per mode, run once per control tick by the arbiter.
//! Policies read the tracked inputs, write servo commands for the tick, and
//! drive their own substate machinery. Mode changes happen in two places:
//! serial mode requests in the arbiter, failsafe reversions inside the
//! policies themselves.
//!
//! ## Available Modes
//!
//! - **Boot**: neutral hold while the ESC arms, then the default mode
//! - **RemoteOnly**: human RC pass-through
//! - **RemoteStateDemo**: RC steering, fixed demo throttle per knob intent
//! - **SerialOnly**: autonomous drive, no override path
//! - **Takeover / TakeoverWithTrim**: autonomous drive with human override
//!   on throttle knob deflection
//! - **SpeedLimit**: autonomous drive, knob acts as a forward ceiling
//! - **Pause**: autonomous drive with a press-and-release pause gesture

pub mod boot;
pub mod pause;
pub mod remote;
pub mod serial_link;
pub mod speed_limit;
pub mod takeover;

use crate::car::state::ControllerState;

/// Human wheel bias in microseconds
///
/// How far the capture steering reading sits from the configured center.
/// Modes that bias serial steering by the wheel add this on top of the base
/// trim.
fn capture_steer_offset(state: &ControllerState) -> i16 {
    (state.inputs.capture_steer.value_us as i16).wrapping_sub(state.config.angle_trim as i16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ControllerConfig;
    use crate::platform::CaptureChannel;

    #[test]
    fn test_capture_steer_offset_is_signed() {
        let mut state = ControllerState::new(ControllerConfig::default());
        state
            .inputs
            .refresh_capture(CaptureChannel::Steering, 1530);
        assert_eq!(capture_steer_offset(&state), 20);

        state
            .inputs
            .refresh_capture(CaptureChannel::Steering, 1470);
        assert_eq!(capture_steer_offset(&state), -40);
    }
}
