//! Mock platform implementation for testing
//!
//! This module provides mock implementations of platform traits that can be used
//! for unit testing without requiring actual hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```
//! use dualpilot::platform::mock::MockPlatform;
//! use dualpilot::platform::traits::{Platform, ServoChannel, ServoInterface};
//!
//! let mut platform = MockPlatform::new();
//! assert!(platform.servos_mut().try_set(ServoChannel::Throttle, 1500));
//! ```

#![cfg(any(test, feature = "mock"))]

mod capture;
mod platform;
mod serial;
mod servo;
mod ticker;

pub use capture::MockCapture;
pub use platform::MockPlatform;
pub use serial::MockSerial;
pub use servo::MockServoBank;
pub use ticker::MockTicker;
