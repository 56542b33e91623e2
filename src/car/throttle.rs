//! Centered throttle commands
//!
//! A throttle request is a 14-bit value centered at 1500 (above = forward,
//! below = backward or brake) plus an enforcement tag that tells the ESC
//! predictor how a below-center request may be applied. The tag travels in
//! the top two bits of the inbound serial throttle field, so an autonomous
//! source can ask for gated reversals over the wire.
//!
//! ## Behavior
//!
//! - `PassThrough` below-center requests reach the ESC unmodified (used for
//!   active deceleration where the caller knows the drivetrain state).
//! - `ForceBackward` requests reverse but lets the predictor route through
//!   brake and neutral first.
//! - `ForceBrake` requests braking but lets the predictor refuse a pulse
//!   that would re-engage reverse.

use crate::parameters::ControllerConfig;

/// Centered neutral request
pub const THROTTLE_CENTER: u16 = 1500;

/// Wire bit carrying the ForceBrake tag
const BRAKE_BIT: u16 = 0x8000;
/// Wire bit carrying the ForceBackward tag
const BACKWARD_BIT: u16 = 0x4000;
/// Mask of the 14-bit centered value
const VALUE_MASK: u16 = 0x3FFF;

/// Direction enforcement for below-center throttle requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    /// No direction enforced; the value is applied as-is
    PassThrough,
    /// Engage reverse, sequenced through brake/neutral by the predictor
    ForceBackward,
    /// Brake without ever re-engaging reverse
    ForceBrake,
}

/// One throttle request: centered value plus enforcement tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleCommand {
    pub value: u16,
    pub enforcement: Enforcement,
}

impl ThrottleCommand {
    /// Create a command from a centered value and tag
    pub const fn new(value: u16, enforcement: Enforcement) -> Self {
        Self { value, enforcement }
    }

    /// Neutral request (1500, no enforcement)
    pub const fn neutral() -> Self {
        Self::new(THROTTLE_CENTER, Enforcement::PassThrough)
    }

    /// Decode a raw wire field into value + tag
    ///
    /// Only the exact brake pattern selects `ForceBrake`; any other pattern
    /// with a tag bit set, the unassigned 0b11 included, reads as
    /// `ForceBackward`.
    pub fn from_wire(raw: u16) -> Self {
        let enforcement = match raw & (BRAKE_BIT | BACKWARD_BIT) {
            0 => Enforcement::PassThrough,
            BRAKE_BIT => Enforcement::ForceBrake,
            _ => Enforcement::ForceBackward,
        };
        Self::new(raw & VALUE_MASK, enforcement)
    }

    /// Encode value + tag back into the wire field
    pub fn to_wire(self) -> u16 {
        let tag_bits = match self.enforcement {
            Enforcement::PassThrough => 0,
            Enforcement::ForceBackward => BACKWARD_BIT,
            Enforcement::ForceBrake => BRAKE_BIT,
        };
        (self.value & VALUE_MASK) | tag_bits
    }
}

/// Map a raw capture pulse width to a centered throttle value
///
/// The deadband spans the whole range where output would not move the car
/// (`max_backward_moving..=min_forward_moving`), so a knob resting anywhere
/// near center reads as exactly 1500. Outside the deadband the deflection
/// is measured from the band edge, keeping the mapped value continuous.
///
/// # Arguments
///
/// * `us` - Raw capture measurement in microseconds
/// * `config` - Parameter table providing the deadband edges
///
/// # Returns
///
/// Centered throttle value (1500 = neutral)
pub fn capture_to_throttle(us: u16, config: &ControllerConfig) -> u16 {
    let us = i32::from(us);
    let forward_edge = i32::from(config.min_forward_moving);
    let backward_edge = i32::from(config.max_backward_moving);
    if us > forward_edge {
        (us - forward_edge + 1500) as u16
    } else if us < backward_edge {
        (us - backward_edge + 1500) as u16
    } else {
        THROTTLE_CENTER
    }
}

/// Clamp a command's deflection against a centered ceiling
///
/// Forward values are capped at `ceiling`; backward values are floored at
/// the mirror point `3000 - ceiling`, so one above-center ceiling bounds
/// deflection in both directions. The enforcement tag is preserved. Callers
/// pass a ceiling above center (the limiting mode guarantees it).
pub fn limit_forward(cmd: ThrottleCommand, ceiling: u16) -> ThrottleCommand {
    let floor = 3000u16.saturating_sub(ceiling);
    let mut value = cmd.value;
    if value > THROTTLE_CENTER {
        value = value.min(ceiling);
    } else if value < THROTTLE_CENTER {
        value = value.max(floor);
    }
    ThrottleCommand::new(value, cmd.enforcement)
}
