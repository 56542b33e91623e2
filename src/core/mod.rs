//! Core controller functionality
//!
//! This module contains the fundamental infrastructure of the controller:
//! the polled control loop and the logging macros.

pub mod logging;
pub mod scheduler;

pub use scheduler::ControlLoop;
