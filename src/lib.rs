#![cfg_attr(not(test), no_std)]

//! dualpilot - decision core for a dual-source RC car controller
//!
//! This library arbitrates between a human operator's RC transmitter (pulse
//! width capture) and an autonomous serial command source, and converts the
//! winning command into safe pulse widths for a steering servo and an ESC.
//! The ESC's internal direction state is tracked by a predictor so the
//! controller never requests a direct forward/backward flip.

// The mock platform is host-only and backed by std collections.
#[cfg(any(test, feature = "mock"))]
extern crate std;

// Platform abstraction layer (traits + mock implementations)
pub mod platform;

// Core systems (logging, control loop)
pub mod core;

// Vehicle-agnostic libraries (input freshness, ESC prediction, servo channels)
pub mod libraries;

// Serial command gateway and telemetry
pub mod communication;

// Car logic: modes, arbiter, throttle helpers
pub mod car;

// Fixed parameter table
pub mod parameters;
