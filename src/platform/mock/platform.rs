//! Mock platform implementation for testing

use crate::platform::mock::{MockCapture, MockSerial, MockServoBank, MockTicker};
use crate::platform::traits::Platform;

/// Mock platform bundling all mock peripherals
///
/// Fields are public so tests can stage inputs and inspect outputs directly
/// while the control loop drives the same peripherals through the `Platform`
/// trait.
///
/// # Example
///
/// ```
/// use dualpilot::platform::mock::MockPlatform;
/// use dualpilot::platform::traits::{Platform, SerialInterface};
///
/// let mut platform = MockPlatform::new();
/// platform.serial.inject_rx_data(&[0x42]);
/// assert_eq!(platform.serial_mut().poll_read(), Some(0x42));
/// ```
#[derive(Debug, Default)]
pub struct MockPlatform {
    pub serial: MockSerial,
    pub capture: MockCapture,
    pub servos: MockServoBank,
    pub ticker: MockTicker,
}

impl MockPlatform {
    /// Create a new mock platform with all peripherals in their reset state
    pub fn new() -> Self {
        Self::default()
    }
}

impl Platform for MockPlatform {
    type Serial = MockSerial;
    type Capture = MockCapture;
    type Servos = MockServoBank;
    type Ticker = MockTicker;

    fn serial_mut(&mut self) -> &mut Self::Serial {
        &mut self.serial
    }

    fn capture_mut(&mut self) -> &mut Self::Capture {
        &mut self.capture
    }

    fn servos_mut(&mut self) -> &mut Self::Servos {
        &mut self.servos
    }

    fn ticker_mut(&mut self) -> &mut Self::Ticker {
        &mut self.ticker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::traits::{CaptureChannel, CaptureInterface, ServoChannel, ServoInterface};

    #[test]
    fn test_trait_accessors_reach_the_same_peripherals_as_fields() {
        let mut platform = MockPlatform::new();
        platform.capture.push_measurement(CaptureChannel::Steering, 1450);
        assert_eq!(
            platform.capture_mut().poll(CaptureChannel::Steering),
            Some(1450)
        );

        assert!(platform.servos_mut().try_set(ServoChannel::Throttle, 1620));
        assert_eq!(platform.servos.current(ServoChannel::Throttle), 1620);
    }
}
