//! Root platform trait
//!
//! This module defines the root Platform trait that aggregates the four
//! peripheral interfaces the control core consumes.

use super::{CaptureInterface, SerialInterface, ServoInterface, TickerInterface};

/// Root platform trait
///
/// Platform implementations provide concrete types for each peripheral via
/// associated types, enabling compile-time dispatch; the control loop is
/// generic over this trait and never touches registers itself.
///
/// Accessors hand out exclusive references one peripheral at a time, which
/// matches the loop's strictly sequential use of them.
pub trait Platform {
    /// Serial port to the autonomous command source
    type Serial: SerialInterface;

    /// Pulse-width capture unit for the RC receiver channels
    type Capture: CaptureInterface;

    /// Servo output port (steering + throttle)
    type Servos: ServoInterface;

    /// PWM period ticker
    type Ticker: TickerInterface;

    /// Access the serial port
    fn serial_mut(&mut self) -> &mut Self::Serial;

    /// Access the capture unit
    fn capture_mut(&mut self) -> &mut Self::Capture;

    /// Access the servo output port
    fn servos_mut(&mut self) -> &mut Self::Servos;

    /// Access the period ticker
    fn ticker_mut(&mut self) -> &mut Self::Ticker;
}
