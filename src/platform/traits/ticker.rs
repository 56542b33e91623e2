//! Control-tick timing interface trait

/// Period ticker interface trait
///
/// The control tick is paced by the servo PWM period (~9.92 ms): one
/// elapsed period equals one tick. The hardware sets an overflow flag at
/// the period boundary; `poll_period_elapsed` reads and clears it.
pub trait TickerInterface {
    /// Poll for an elapsed PWM period
    ///
    /// # Returns
    ///
    /// `true` exactly once per completed period; polling clears the
    /// condition. If the loop ever stalls past a full period the following
    /// poll still reports a single elapsed period (hardware flags do not
    /// queue), so a stall slips ticks rather than bursting them.
    fn poll_period_elapsed(&mut self) -> bool;
}
