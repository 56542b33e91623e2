//! Control loop scheduler
//!
//! Single polled superloop, no interrupts in the decision path. The firmware
//! calls [`ControlLoop::poll`] as fast as it can; each call pumps at most
//! one serial byte in each direction, drains finished capture measurements,
//! and runs one control tick when the servo PWM period has elapsed
//! (~9.92 ms, so the control rate is ~100 Hz).
//!
//! ## Timing contract
//!
//! `poll` must be called at least once per UART byte time (about 87 us at
//! 115200 8N1). The single-byte pumps then keep up with the line rate
//! without any buffering beyond the peripheral's own registers.
//!
//! ## Per-tick order
//!
//! 1. Advance the tick counter
//! 2. Feed the latched throttle output to the ESC predictor
//! 3. Snapshot state into a telemetry frame (ages still pre-bump, so a
//!    sample that arrived since the last tick reports age 0)
//! 4. Age all tracked inputs
//! 5. Run the mode arbiter, which writes this tick's servo commands

use crate::car::arbiter;
use crate::car::state::ControllerState;
use crate::communication::{CommandGateway, TelemetryFrame, TelemetryWriter};
use crate::libraries::ServoChannels;
use crate::parameters::ControllerConfig;
use crate::platform::{
    CaptureChannel, CaptureInterface, Platform, SerialInterface, ServoChannel, ServoInterface,
    TickerInterface,
};

/// Polled control loop
///
/// Owns the controller state and the two serial protocol endpoints. The
/// platform is borrowed per poll, never stored.
pub struct ControlLoop {
    state: ControllerState,
    gateway: CommandGateway,
    telemetry: TelemetryWriter,
}

impl ControlLoop {
    /// Create a control loop in Boot mode at tick zero
    ///
    /// # Arguments
    ///
    /// * `config` - Parameter table, assumed validated at startup
    pub fn new(config: ControllerConfig) -> Self {
        crate::log_info!("Control loop starting in Boot mode");
        Self {
            state: ControllerState::new(config),
            gateway: CommandGateway::new(),
            telemetry: TelemetryWriter::new(),
        }
    }

    /// Run one superloop pass
    ///
    /// Receive runs before the tick so a command completed this pass is
    /// visible to it; transmit runs after so a freshly built telemetry
    /// frame gets its first byte out in the same pass.
    pub fn poll<P: Platform>(&mut self, platform: &mut P) {
        self.pump_rx(platform.serial_mut());
        self.poll_captures(platform.capture_mut());
        if platform.ticker_mut().poll_period_elapsed() {
            self.run_tick(platform);
        }
        self.telemetry.pump(platform.serial_mut());
    }

    /// Controller state (modes, inputs, prediction)
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Inbound command gateway
    pub fn gateway(&self) -> &CommandGateway {
        &self.gateway
    }

    /// Outbound telemetry writer
    pub fn telemetry(&self) -> &TelemetryWriter {
        &self.telemetry
    }

    /// Feed at most one received byte to the command gateway
    fn pump_rx<S: SerialInterface>(&mut self, serial: &mut S) {
        if let Some(byte) = serial.poll_read() {
            if let Some(command) = self.gateway.push_byte(byte) {
                self.state.inputs.refresh_serial(command);
            }
        }
    }

    /// Drain finished capture measurements into the input tracker
    fn poll_captures<C: CaptureInterface>(&mut self, capture: &mut C) {
        if let Some(us) = capture.poll(CaptureChannel::Steering) {
            self.state.inputs.refresh_capture(CaptureChannel::Steering, us);
        }
        if let Some(us) = capture.poll(CaptureChannel::Throttle) {
            self.state.inputs.refresh_capture(CaptureChannel::Throttle, us);
        }
    }

    /// Run one control tick
    fn run_tick<P: Platform>(&mut self, platform: &mut P) {
        self.state.advance_tick();

        let throttle_out = platform.servos_mut().current(ServoChannel::Throttle);
        let steer_out = platform.servos_mut().current(ServoChannel::Steering);
        self.state.predictor.predict(throttle_out, &self.state.config);

        let frame = TelemetryFrame {
            mode_byte: self.state.mode_byte(),
            throttle_out_us: throttle_out,
            steer_out_us: steer_out,
            capture_throttle_us: self.state.inputs.capture_throttle.value_us,
            capture_steer_us: self.state.inputs.capture_steer.value_us,
            tick: self.state.tick(),
            predicted_state_byte: self.state.predictor.state_byte(),
            capture_throttle_age: self.state.inputs.capture_throttle.wire_age(),
            capture_steer_age: self.state.inputs.capture_steer.wire_age(),
            serial_age_ticks: self.state.inputs.serial_age_ticks,
            debug_counter: self.state.debug_counter,
        };
        self.telemetry.load(&frame);

        self.state.inputs.bump_ages();

        let mut servos = ServoChannels::new(platform.servos_mut(), self.state.config);
        arbiter::tick(&mut self.state, &mut servos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::state::GlobalMode;
    use crate::communication::telemetry::TELEMETRY_LEN;
    use crate::communication::SerialCommand;
    use crate::platform::mock::MockPlatform;

    fn run_one_tick(looper: &mut ControlLoop, platform: &mut MockPlatform) {
        platform.ticker.advance_periods(1);
        looper.poll(platform);
    }

    #[test]
    fn test_no_tick_without_elapsed_period() {
        let mut looper = ControlLoop::new(ControllerConfig::default());
        let mut platform = MockPlatform::new();

        for _ in 0..10 {
            looper.poll(&mut platform);
        }

        assert_eq!(looper.state().tick(), 0);
        assert!(!looper.telemetry().pending());
    }

    #[test]
    fn test_tick_advances_and_emits_telemetry() {
        let mut looper = ControlLoop::new(ControllerConfig::default());
        let mut platform = MockPlatform::new();

        run_one_tick(&mut looper, &mut platform);

        assert_eq!(looper.state().tick(), 1);
        assert!(looper.telemetry().pending());
        assert_eq!(looper.telemetry().stats().frames_loaded, 1);
    }

    #[test]
    fn test_telemetry_drains_one_byte_per_poll() {
        let mut looper = ControlLoop::new(ControllerConfig::default());
        let mut platform = MockPlatform::new();

        run_one_tick(&mut looper, &mut platform);
        // One byte went out inside the tick's own poll
        assert_eq!(platform.serial.tx_data().len(), 1);
        assert_eq!(platform.serial.tx_data()[0], b'S');

        for _ in 0..(TELEMETRY_LEN - 1) {
            looper.poll(&mut platform);
        }
        assert_eq!(platform.serial.tx_data().len(), TELEMETRY_LEN);
        assert!(!looper.telemetry().pending());
    }

    #[test]
    fn test_serial_frame_reaches_input_tracker() {
        let mut looper = ControlLoop::new(ControllerConfig::default());
        let mut platform = MockPlatform::new();

        let command = SerialCommand {
            throttle: crate::car::ThrottleCommand::neutral(),
            steer_us: 1480,
            mode_byte: GlobalMode::SerialOnly.index() << 3,
            session_timeout_ticks: 9,
        };
        platform.serial.inject_rx_data(&command.encode());

        // One byte per poll
        for _ in 0..9 {
            looper.poll(&mut platform);
        }

        assert_eq!(looper.state().inputs.serial.steer_us, 1480);
        assert_eq!(looper.state().inputs.serial_age_ticks, 0);
        assert_eq!(looper.gateway().stats().frames_decoded, 1);
    }

    #[test]
    fn test_capture_measurements_reach_input_tracker() {
        let mut looper = ControlLoop::new(ControllerConfig::default());
        let mut platform = MockPlatform::new();

        platform.capture.push_measurement(CaptureChannel::Steering, 1523);
        platform.capture.push_measurement(CaptureChannel::Throttle, 1610);
        looper.poll(&mut platform);

        assert_eq!(looper.state().inputs.capture_steer.value_us, 1523);
        assert_eq!(looper.state().inputs.capture_throttle.value_us, 1610);
    }

    #[test]
    fn test_boot_hold_expires_into_default_mode() {
        let mut looper = ControlLoop::new(ControllerConfig::default());
        let mut platform = MockPlatform::new();

        for _ in 0..300 {
            run_one_tick(&mut looper, &mut platform);
        }
        assert_eq!(looper.state().mode(), GlobalMode::Boot);

        run_one_tick(&mut looper, &mut platform);
        assert_eq!(
            looper.state().mode(),
            ControllerConfig::default().default_mode
        );
    }

    #[test]
    fn test_telemetry_snapshot_matches_state() {
        let mut looper = ControlLoop::new(ControllerConfig::default());
        let mut platform = MockPlatform::new();

        platform.capture.push_measurement(CaptureChannel::Throttle, 1650);
        run_one_tick(&mut looper, &mut platform);
        assert_eq!(platform.serial.tx_data(), &[b'S']);

        for _ in 0..(TELEMETRY_LEN - 1) {
            looper.poll(&mut platform);
        }
        let tx = platform.serial.tx_data();
        assert_eq!(tx.len(), TELEMETRY_LEN);
        // Boot mode, substate 0
        assert_eq!(tx[1], 0x00);
        // Fresh capture reports its value with age 0; the tick field reads 1
        assert_eq!(&tx[6..8], &[0x06, 0x72]);
        assert_eq!(tx[13], 0);
        assert_eq!(&tx[10..12], &[0x00, 0x01]);
        // Serial has never been heard from
        assert_eq!(&tx[15..17], &[0xFF, 0xFF]);
    }
}
