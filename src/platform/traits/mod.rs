//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod capture;
pub mod platform;
pub mod serial;
pub mod servo;
pub mod ticker;

// Re-export trait interfaces
pub use capture::{CaptureChannel, CaptureInterface};
pub use platform::Platform;
pub use serial::SerialInterface;
pub use servo::{ServoChannel, ServoInterface};
pub use ticker::TickerInterface;
