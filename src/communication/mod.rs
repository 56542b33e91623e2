//! Serial Link Protocols
//!
//! This module implements the byte protocols spoken on the companion serial
//! link: inbound drive command frames and outbound telemetry frames.
//!
//! # Protocols
//!
//! - **Command frames**: 9-byte `'B'`-framed drive commands (throttle,
//!   steering, mode request, session timeout), little-endian fields
//! - **Telemetry frames**: 19-byte `'S'`-framed state snapshots emitted once
//!   per control tick, big-endian fields
//!
//! # Transport
//!
//! - UART (115200 baud, 8N1), polled one byte per scheduler pass

pub mod command;
pub mod telemetry;

pub use command::{CommandGateway, FrameError, GatewayStats, SerialCommand};
pub use telemetry::{TelemetryFrame, TelemetryStats, TelemetryWriter};
