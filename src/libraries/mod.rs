//! Common libraries
//!
//! Vehicle-agnostic building blocks used by the mode arbiter:
//!
//! - `input_tracker`: freshness-tracked input samples (capture + serial)
//! - `esc_predictor`: ESC internal-state prediction and reversal gating
//! - `servo_channel`: steering/throttle command surface over the output port

pub mod esc_predictor;
pub mod input_tracker;
pub mod servo_channel;

// Re-export commonly used types
pub use esc_predictor::{DriverState, EscPredictor};
pub use input_tracker::{InputSample, InputTracker};
pub use servo_channel::ServoChannels;
