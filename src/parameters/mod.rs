//! Controller parameter table
//!
//! A fixed table loaded once at startup and read-only afterwards; there is no
//! persistence and no runtime reconfiguration. All pulse-width fields are in
//! microseconds on the 1000-2000 µs servo convention.
//!
//! The throttle thresholds describe the ESC's observed response bands:
//!
//! ```text
//!  1000        1400        1446      1466   1490   1510       1563        2000
//!   |-- reverse --|          |  neutral band  |      |          |-- forward --|
//!  min_backward  max_backward_moving          |   max_neutral  min_forward_moving
//!                            min_neutral   min_forward
//! ```
//!
//! The detection bands (`min_forward`, `min_neutral`/`max_neutral`,
//! `max_backward`) intentionally overlap; the ESC predictor uses the overlap
//! as hysteresis (see `libraries::esc_predictor`).

use core::fmt;

use crate::car::state::GlobalMode;

/// Fixed controller configuration
///
/// Defaults were calibrated against a stock brushed ESC; a different
/// drivetrain needs its own band measurements.
#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    /// Steering pulse width that centers the wheels
    pub angle_trim: u16,
    /// Full-forward output bound (documentation of range, not enforced)
    pub max_forward: u16,
    /// Smallest output that actually moves the car forward
    pub min_forward_moving: u16,
    /// Forward-detection threshold (classification band edge)
    pub min_forward: u16,
    /// Neutral band top (classification)
    pub max_neutral: u16,
    /// Neutral band bottom (classification)
    pub min_neutral: u16,
    /// Backward-detection threshold (classification band edge)
    pub max_backward: u16,
    /// Largest output that actually moves the car backward
    pub max_backward_moving: u16,
    /// Full-backward output bound (documentation of range, not enforced)
    pub min_backward: u16,
    /// Consecutive agreeing ticks before a predicted state is confirmed
    pub transition_filter_threshold: u8,
    /// Mode entered after boot and on serial link loss
    pub default_mode: GlobalMode,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            angle_trim: 1510,
            max_forward: 2000,
            min_forward_moving: 1563,
            min_forward: 1490,
            max_neutral: 1510,
            min_neutral: 1446,
            max_backward: 1466,
            max_backward_moving: 1400,
            min_backward: 1000,
            transition_filter_threshold: 4,
            default_mode: GlobalMode::RemoteOnly,
        }
    }
}

impl ControllerConfig {
    /// Check band ordering
    ///
    /// The predictor and the throttle mapping assume the bands are ordered
    /// backward < neutral < forward; a table violating that would classify
    /// nonsense and defeat the reversal gating.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the table is usable, otherwise the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transition_filter_threshold == 0 {
            return Err(ConfigError::ZeroFilterThreshold);
        }
        if !(self.min_backward <= self.max_backward_moving
            && self.max_backward_moving <= self.max_backward)
        {
            return Err(ConfigError::BackwardBandsReversed);
        }
        if self.min_neutral > self.max_neutral {
            return Err(ConfigError::NeutralBandReversed);
        }
        if !(self.min_forward <= self.min_forward_moving
            && self.min_forward_moving <= self.max_forward)
        {
            return Err(ConfigError::ForwardBandsReversed);
        }
        Ok(())
    }
}

/// Parameter table validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `transition_filter_threshold` must be at least 1
    ZeroFilterThreshold,
    /// Requires `min_backward <= max_backward_moving <= max_backward`
    BackwardBandsReversed,
    /// Requires `min_neutral <= max_neutral`
    NeutralBandReversed,
    /// Requires `min_forward <= min_forward_moving <= max_forward`
    ForwardBandsReversed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroFilterThreshold => {
                write!(f, "transition_filter_threshold must be at least 1")
            }
            ConfigError::BackwardBandsReversed => {
                write!(f, "backward bands out of order (min_backward <= max_backward_moving <= max_backward)")
            }
            ConfigError::NeutralBandReversed => {
                write!(f, "neutral band out of order (min_neutral <= max_neutral)")
            }
            ConfigError::ForwardBandsReversed => {
                write!(f, "forward bands out of order (min_forward <= min_forward_moving <= max_forward)")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(ControllerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let config = ControllerConfig {
            transition_filter_threshold: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFilterThreshold));
    }

    #[test]
    fn test_reversed_backward_bands_rejected() {
        let config = ControllerConfig {
            max_backward_moving: 900,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::BackwardBandsReversed));
    }

    #[test]
    fn test_reversed_neutral_band_rejected() {
        let config = ControllerConfig {
            min_neutral: 1511,
            max_neutral: 1446,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NeutralBandReversed));
    }

    #[test]
    fn test_reversed_forward_bands_rejected() {
        let config = ControllerConfig {
            min_forward_moving: 1489,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ForwardBandsReversed));
    }
}
