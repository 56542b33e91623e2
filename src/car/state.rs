//! Controller state core
//!
//! Owns the active mode, its runtime counters, the control tick, the input
//! freshness tracker, and the ESC drive-state predictor. Mode policies and
//! the arbiter mutate this struct; nothing here touches a peripheral.

use core::fmt;

use crate::libraries::{EscPredictor, InputTracker};
use crate::parameters::ControllerConfig;

/// Bit position of the mode index inside the mode byte
pub const MODE_INDEX_SHIFT: u8 = 3;

/// Substate bits of the mode byte
pub const SUBSTATE_MASK: u8 = 0x07;

/// Top-level control mode
///
/// Exactly one mode is active at a time and all transitions go through the
/// arbiter. On the wire the mode index occupies the upper five bits of the
/// mode byte; the lower three carry the active substate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalMode {
    /// Power-on hold: neutral throttle while the ESC arms
    Boot,
    /// Human RC pass-through on both channels
    RemoteOnly,
    /// RC steering with fixed demo throttle per classified knob intent
    RemoteStateDemo,
    /// Serial drive with no human override path
    SerialOnly,
    /// Serial drive, human takes over by moving the throttle knob
    Takeover,
    /// Takeover plus steering trim taken from the capture steering reading
    TakeoverWithTrim,
    /// Serial drive with the human throttle knob as a forward ceiling
    SpeedLimit,
    /// Serial drive with a press-and-release pause gesture on the knob
    Pause,
}

impl GlobalMode {
    /// Mode index carried in the upper bits of the mode byte
    pub const fn index(self) -> u8 {
        match self {
            GlobalMode::Boot => 0,
            GlobalMode::RemoteOnly => 1,
            GlobalMode::RemoteStateDemo => 2,
            GlobalMode::SerialOnly => 3,
            GlobalMode::Takeover => 4,
            GlobalMode::TakeoverWithTrim => 5,
            GlobalMode::SpeedLimit => 6,
            GlobalMode::Pause => 7,
        }
    }

    /// Look up a mode by its wire index
    ///
    /// # Returns
    ///
    /// `None` for indices outside the mode table; the arbiter ignores those
    /// requests rather than entering an undefined mode.
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(GlobalMode::Boot),
            1 => Some(GlobalMode::RemoteOnly),
            2 => Some(GlobalMode::RemoteStateDemo),
            3 => Some(GlobalMode::SerialOnly),
            4 => Some(GlobalMode::Takeover),
            5 => Some(GlobalMode::TakeoverWithTrim),
            6 => Some(GlobalMode::SpeedLimit),
            7 => Some(GlobalMode::Pause),
            _ => None,
        }
    }

    /// Get mode name for logging and telemetry
    pub const fn name(self) -> &'static str {
        match self {
            GlobalMode::Boot => "Boot",
            GlobalMode::RemoteOnly => "RemoteOnly",
            GlobalMode::RemoteStateDemo => "RemoteStateDemo",
            GlobalMode::SerialOnly => "SerialOnly",
            GlobalMode::Takeover => "Takeover",
            GlobalMode::TakeoverWithTrim => "TakeoverWithTrim",
            GlobalMode::SpeedLimit => "SpeedLimit",
            GlobalMode::Pause => "Pause",
        }
    }
}

impl fmt::Display for GlobalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-mode runtime counters
///
/// The substate meaning is mode-specific (takeover phase, pause debounce
/// phase). Both fields are reset on every mode entry, so a substate is only
/// ever interpreted against the mode that set it.
#[derive(Debug, Clone, Copy)]
struct ModeRuntime {
    substate: u8,
    substate_start_tick: u16,
}

/// Decision state of the whole controller
///
/// Created once at startup and mutated in place for the life of the
/// process. Peripheral access stays outside: the scheduler feeds inputs in
/// through [`InputTracker`] and mode policies write outputs through a servo
/// channel wrapper passed per tick.
pub struct ControllerState {
    /// Fixed parameter table
    pub config: ControllerConfig,
    /// Freshness-tracked inputs
    pub inputs: InputTracker,
    /// ESC drive-state predictor
    pub predictor: EscPredictor,
    /// Free-running diagnostic counter reported in telemetry
    pub debug_counter: u16,
    mode: GlobalMode,
    runtime: ModeRuntime,
    tick: u16,
    failsafe_active: bool,
    failsafe_noted: bool,
}

impl ControllerState {
    /// Create the controller state in `Boot` mode at tick zero
    pub const fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            inputs: InputTracker::new(),
            predictor: EscPredictor::new(),
            debug_counter: 0,
            mode: GlobalMode::Boot,
            runtime: ModeRuntime {
                substate: 0,
                substate_start_tick: 0,
            },
            tick: 0,
            failsafe_active: false,
            failsafe_noted: false,
        }
    }

    /// Active control mode
    pub fn mode(&self) -> GlobalMode {
        self.mode
    }

    /// Current control tick
    pub fn tick(&self) -> u16 {
        self.tick
    }

    /// Advance the control tick by one period
    pub fn advance_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Switch to a new mode, resetting the substate machinery
    pub fn enter_mode(&mut self, mode: GlobalMode) {
        crate::log_info!("Mode change: {} -> {}", self.mode.name(), mode.name());
        self.mode = mode;
        self.runtime = ModeRuntime {
            substate: 0,
            substate_start_tick: self.tick,
        };
    }

    /// Active substate within the current mode
    pub fn substate(&self) -> u8 {
        self.runtime.substate
    }

    /// Move to a substate and restart its hold timer
    ///
    /// Re-entering the current substate also restarts the timer; takeover
    /// uses that to stretch a hold window.
    pub fn switch_substate(&mut self, substate: u8) {
        self.runtime.substate = substate & SUBSTATE_MASK;
        self.runtime.substate_start_tick = self.tick;
    }

    /// Ticks spent in the current substate
    pub fn ticks_in_substate(&self) -> u16 {
        self.tick.wrapping_sub(self.runtime.substate_start_tick)
    }

    /// Mode byte for the wire: mode index in bits 7..3, substate in 2..0
    pub fn mode_byte(&self) -> u8 {
        (self.mode.index() << MODE_INDEX_SHIFT) | (self.runtime.substate & SUBSTATE_MASK)
    }

    /// Record that the active mode held the throttle neutral on stale input
    ///
    /// Warns on the first stale tick only; the latch stays silent until a
    /// tick completes without a failsafe note.
    pub fn note_failsafe(&mut self) {
        self.failsafe_noted = true;
        if !self.failsafe_active {
            self.failsafe_active = true;
            crate::log_warn!("Input stale: holding throttle neutral");
        }
    }

    /// True while the active mode is neutralizing the throttle on staleness
    pub fn failsafe_active(&self) -> bool {
        self.failsafe_active
    }

    /// Latch or drop the failsafe flag at the end of a tick
    pub(crate) fn settle_failsafe(&mut self) {
        self.failsafe_active = self.failsafe_noted;
        self.failsafe_noted = false;
    }
}
