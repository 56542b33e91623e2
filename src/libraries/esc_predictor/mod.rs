//! ESC internal-state prediction and reversal gating
//!
//! The ESC is a black box: it runs its own direction state machine with an
//! internal debounce filter and offers no feedback channel. Commanding a
//! direct forward/backward flip while the opposite direction is still
//! engaged can damage the drivetrain, so this module mirrors the ESC's
//! suspected state machine from the pulse widths we actually drove it with
//! and gates reversal requests through brake and neutral.
//!
//! ## Behavior
//!
//! Once per control tick, `predict` classifies the pulse width that was
//! latched in the output port during the elapsed period (not the commanded
//! value; a refused port update must not advance the prediction) and steps
//! the state table. A transition is tracked twice: `accepted` moves
//! immediately, while `shadow` trails behind until the classification has
//! agreed for `transition_filter_threshold` consecutive ticks, mirroring
//! the debounce latency suspected inside the ESC. Reversal gating treats a
//! direction as possibly-engaged while *either* half of the pair says so.
//!
//! `calculate_action` maps a `ThrottleCommand` to an output pulse width,
//! enforcing the asymmetric safety rules:
//!
//! - `ForceBackward` while the forward side may be engaged degrades to the
//!   brake pulse; while brake may be engaged it holds true neutral; only
//!   then does it emit the reverse pulse.
//! - `ForceBrake` while the backward side may be engaged holds just above
//!   the neutral band instead of emitting a below-neutral pulse, which the
//!   ESC would read as re-engaging reverse.

use crate::car::throttle::{Enforcement, ThrottleCommand, THROTTLE_CENTER};
use crate::parameters::ControllerConfig;

/// Predicted ESC drivetrain state
///
/// `Neutral1` and `Neutral2` are distinct because the ESC distinguishes
/// neutral reached from forward (next backward pulse brakes) from neutral
/// reached from backward (next backward pulse reverses).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Neutral, arrived from the forward side
    Neutral1,
    /// Driving forward
    Forward,
    /// Braking
    Brake,
    /// Neutral, arrived from the backward side
    Neutral2,
    /// Driving backward
    Backward,
}

impl DriverState {
    /// Telemetry code for this state
    pub const fn code(self) -> u8 {
        match self {
            DriverState::Neutral1 => 1,
            DriverState::Forward => 2,
            DriverState::Brake => 3,
            DriverState::Neutral2 => 4,
            DriverState::Backward => 5,
        }
    }

    const fn is_forward_side(self) -> bool {
        matches!(self, DriverState::Forward | DriverState::Neutral1)
    }

    const fn is_backward_side(self) -> bool {
        matches!(self, DriverState::Backward | DriverState::Neutral2)
    }
}

impl core::fmt::Display for DriverState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            DriverState::Neutral1 => "Neutral1",
            DriverState::Forward => "Forward",
            DriverState::Brake => "Brake",
            DriverState::Neutral2 => "Neutral2",
            DriverState::Backward => "Backward",
        };
        write!(f, "{}", name)
    }
}

/// Direction intent classified from a raw pulse width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Forward,
    Neutral,
    Backward,
}

/// ESC state predictor
///
/// Holds the accepted/shadow state pair and the debounce counter. Power-on
/// seeds the pair with one state from each direction group so every gate
/// reads as possibly-engaged until real output settles the filter.
#[derive(Debug, Clone, Copy)]
pub struct EscPredictor {
    accepted: DriverState,
    shadow: DriverState,
    hold_count: u8,
}

impl EscPredictor {
    /// Create a predictor in the conservative power-on state
    pub const fn new() -> Self {
        Self {
            accepted: DriverState::Forward,
            shadow: DriverState::Backward,
            hold_count: 0,
        }
    }

    /// Currently accepted prediction
    pub fn accepted(&self) -> DriverState {
        self.accepted
    }

    /// Trailing state the ESC may still be settling out of
    pub fn shadow(&self) -> DriverState {
        self.shadow
    }

    /// Pack the state pair for the telemetry frame (shadow high nibble)
    pub fn state_byte(&self) -> u8 {
        (self.shadow.code() << 4) | self.accepted.code()
    }

    /// Advance the prediction from the pulse width applied last period
    ///
    /// # Arguments
    ///
    /// * `applied_us` - Pulse width actually latched in the throttle output
    /// * `config` - Parameter table providing the classification bands
    ///
    /// # Returns
    ///
    /// The new accepted state
    pub fn predict(&mut self, applied_us: u16, config: &ControllerConfig) -> DriverState {
        let candidate = match self.classify(applied_us, config) {
            Some(intent) => transition(self.accepted, intent),
            // Band gap: nothing proposed, prediction holds
            None => self.accepted,
        };

        if candidate != self.accepted {
            self.shadow = self.accepted;
            self.accepted = candidate;
            self.hold_count = 1;
        } else {
            self.hold_count = self.hold_count.saturating_add(1);
            if self.hold_count >= config.transition_filter_threshold {
                self.shadow = self.accepted;
                self.hold_count -= 1;
            }
        }
        self.accepted
    }

    /// Map a throttle command to a safe output pulse width
    ///
    /// Pure function of the current prediction; does not advance it.
    pub fn calculate_action(&self, cmd: ThrottleCommand, config: &ControllerConfig) -> u16 {
        if cmd.value == THROTTLE_CENTER {
            return neutral_output(config);
        }

        let v = i32::from(cmd.value);
        if cmd.value > THROTTLE_CENTER {
            // Forward requests are never gated
            return (v - 1500 + i32::from(config.min_forward_moving)) as u16;
        }

        let pass_through = (v - 1500 + i32::from(config.max_backward_moving)) as u16;
        match cmd.enforcement {
            Enforcement::PassThrough => pass_through,
            Enforcement::ForceBrake => {
                if self.backward_may_be_active() {
                    // A below-neutral pulse would re-engage reverse; hold at
                    // the smallest forward-leaning value instead
                    config.max_neutral + 1
                } else {
                    pass_through
                }
            }
            Enforcement::ForceBackward => {
                if self.forward_may_be_active() {
                    // Reads as brake while the ESC is forward-side
                    pass_through
                } else if self.brake_may_be_active() {
                    // Force the ESC through true neutral before reverse
                    neutral_output(config)
                } else {
                    // Genuine reverse engage
                    pass_through
                }
            }
        }
    }

    fn forward_may_be_active(&self) -> bool {
        self.accepted.is_forward_side() || self.shadow.is_forward_side()
    }

    fn backward_may_be_active(&self) -> bool {
        self.accepted.is_backward_side() || self.shadow.is_backward_side()
    }

    fn brake_may_be_active(&self) -> bool {
        self.accepted == DriverState::Brake || self.shadow == DriverState::Brake
    }

    /// Classify a pulse width into a direction intent
    ///
    /// The bands may overlap (hysteresis). Overlaps resolve to the intent
    /// that keeps the accepted state unchanged (at most one can), then to
    /// Neutral; a forward/backward-only overlap falls back to Forward
    /// (unreachable with an ordered parameter table).
    fn classify(&self, us: u16, config: &ControllerConfig) -> Option<Intent> {
        let forward = us >= config.min_forward;
        let neutral = us >= config.min_neutral && us <= config.max_neutral;
        let backward = us <= config.max_backward;

        let hits = [
            (forward, Intent::Forward),
            (neutral, Intent::Neutral),
            (backward, Intent::Backward),
        ];
        let mut matched = None;
        for (hit, intent) in hits {
            if !hit {
                continue;
            }
            if transition(self.accepted, intent) == self.accepted {
                return Some(intent);
            }
            if matched.is_none() {
                matched = Some(intent);
            }
        }
        if neutral {
            return Some(Intent::Neutral);
        }
        matched
    }
}

impl Default for EscPredictor {
    fn default() -> Self {
        Self::new()
    }
}

/// Output pulse width for a neutral request
fn neutral_output(config: &ControllerConfig) -> u16 {
    (config.min_forward + config.max_backward) / 2
}

/// ESC state table: next state for the current state under an intent
fn transition(current: DriverState, intent: Intent) -> DriverState {
    use DriverState::*;
    match intent {
        // The physical ESC honors a forward pulse from any state
        Intent::Forward => Forward,
        Intent::Neutral => match current {
            Neutral1 | Forward => Neutral1,
            Brake | Neutral2 | Backward => Neutral2,
        },
        Intent::Backward => match current {
            Neutral1 | Forward | Brake => Brake,
            Neutral2 | Backward => Backward,
        },
    }
}
