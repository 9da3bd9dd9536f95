use embedded_hal::digital::InputPin;

use generic::board_error::BoardError;

use crate::common::stepper_driver::StepperDriver;
use crate::hardware::BoardHardware;

/// One stepper axis: the output stage plus the edge detection that turns
/// a level-driven step request line into discrete pulses.
pub struct StepperChannel<H: BoardHardware> {
    driver: StepperDriver<H::EnablePin, H::DirPin, H::StepPin>,
    min_endstop: Option<H::EndstopPin>,
    max_endstop: Option<H::EndstopPin>,
    last_step_level: bool,
}

impl<H: BoardHardware> StepperChannel<H> {
    /// Channel without endstop wiring; both endstop queries report
    /// not-triggered.
    pub fn new(driver: StepperDriver<H::EnablePin, H::DirPin, H::StepPin>) -> Self {
        StepperChannel { driver, min_endstop: None, max_endstop: None, last_step_level: false }
    }

    pub fn with_endstops(
        mut self,
        min_endstop: Option<H::EndstopPin>,
        max_endstop: Option<H::EndstopPin>,
    ) -> Self {
        self.min_endstop = min_endstop;
        self.max_endstop = max_endstop;
        self
    }

    pub fn set_direction(&mut self, forward: bool) -> Result<(), BoardError> {
        self.driver.set_direction(forward)
    }

    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), BoardError> {
        if enabled {
            self.driver.enable()
        } else {
            self.driver.disable()
        }
    }

    /// Drive the step request line to `level`.
    ///
    /// A pulse reaches the output stage only on a false-to-true
    /// transition; `level` is recorded afterwards no matter what, so a
    /// held-high request can never double-pulse.
    pub fn step(&mut self, level: bool) -> Result<(), BoardError> {
        let result = if level && !self.last_step_level {
            self.driver.pulse()
        } else {
            Ok(())
        };
        self.last_step_level = level;
        result
    }

    pub fn is_at_minimum(&mut self) -> bool {
        match self.min_endstop.as_mut() {
            Some(pin) => pin.is_high().unwrap_or(false),
            None => false,
        }
    }

    pub fn is_at_maximum(&mut self) -> bool {
        match self.max_endstop.as_mut() {
            Some(pin) => pin.is_high().unwrap_or(false),
            None => false,
        }
    }

    /// Per-axis direction inversion, applied during board reset from the
    /// persisted axis-inversion byte.
    pub fn set_inverted(&mut self, inverted: bool) {
        self.driver.set_inverted(inverted)
    }
}
