//! Mock periodic ticker implementation for testing

use crate::platform::traits::TickerInterface;

/// Mock control-period ticker
///
/// Tests advance simulated time by queuing elapsed periods; each `poll`
/// consumes one. With nothing queued the ticker reports no elapsed period,
/// which lets tests interleave serial traffic between control ticks.
#[derive(Debug, Default)]
pub struct MockTicker {
    pending_periods: u32,
}

impl MockTicker {
    /// Create a new mock ticker with no elapsed periods
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `count` control periods as elapsed (for test setup)
    pub fn advance_periods(&mut self, count: u32) {
        self.pending_periods += count;
    }
}

impl TickerInterface for MockTicker {
    fn poll_period_elapsed(&mut self) -> bool {
        if self.pending_periods > 0 {
            self.pending_periods -= 1;
            true
        } else {
            false
        }
    }
}
