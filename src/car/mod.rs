//! Car vehicle control
//!
//! Decision core of the dual-mode controller: the mode arbiter, the per-mode
//! policies, the throttle command vocabulary, and the controller state they
//! all share.
//!
//! ## Modules
//!
//! - `arbiter`: per-tick mode request handling and policy dispatch
//! - `mode`: one policy per control mode
//! - `state`: `GlobalMode`, substate runtime, and the owned controller state
//! - `throttle`: throttle command type, capture mapping, forward limiter

pub mod arbiter;
pub mod mode;
pub mod state;
pub mod throttle;

// Re-export commonly used types
pub use state::{ControllerState, GlobalMode};
pub use throttle::{Enforcement, ThrottleCommand, THROTTLE_CENTER};
