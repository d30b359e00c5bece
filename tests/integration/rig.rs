//! A controller wired to mock adapters, driven one service pass at a time.

use rc_chassis::app::service::{Controller, LoopStatus};
use rc_chassis::config::ControllerConfig;
use rc_chassis::error::SensorError;

use crate::mock_hw::{MockClock, MockLink, MockPwm, MockSensors, RecordingSink};

pub struct Rig {
    pub ctl: Controller<MockPwm>,
    pub link: MockLink,
    pub sensors: MockSensors,
    pub clock: MockClock,
    pub events: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    /// Started controller with its power-on writes already cleared.
    pub fn with_config(config: ControllerConfig) -> Self {
        let mut events = RecordingSink::new();
        let mut ctl = Controller::new(MockPwm::new(), &config).expect("valid config");
        ctl.start(&mut events);
        ctl.sink_mut().writes.clear();
        Self {
            ctl,
            link: MockLink::new(),
            sensors: MockSensors::failing(SensorError::Unavailable),
            clock: MockClock::new(),
            events,
        }
    }

    pub fn service(&mut self) -> LoopStatus {
        self.ctl.service(
            &mut self.link,
            &mut self.sensors,
            &self.clock,
            &mut self.events,
        )
    }

    /// Send one line, run one pass, return everything written.
    pub fn send(&mut self, line: &str) -> Vec<String> {
        self.link.send(line);
        self.service();
        self.link.take_output()
    }

    /// Let `ms` pass, run one pass, return everything written.
    pub fn tick(&mut self, ms: u64) -> Vec<String> {
        self.clock.advance_ms(ms);
        self.service();
        self.link.take_output()
    }

    pub fn pwm(&self) -> &MockPwm {
        self.ctl.sink()
    }
}
