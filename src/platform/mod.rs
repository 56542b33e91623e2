//! Platform abstraction layer
//!
//! This module isolates all hardware access behind polling traits so the
//! decision core stays target-independent. All platform-specific code must
//! live below this module.

pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use traits::{
    CaptureChannel, CaptureInterface, Platform, SerialInterface, ServoChannel, ServoInterface,
    TickerInterface,
};
