use embedded_hal::digital::OutputPin;

use generic::board_error::BoardError;

/// Driver for one step/dir stepper output stage.
///
/// The enable line is active low: driving it low energizes the coil.
pub struct StepperDriver<EN: OutputPin, DIR: OutputPin, STEP: OutputPin> {
    enable_pin: EN,
    dir_pin: DIR,
    step_pin: STEP,
    revert_dir: bool,
}

impl<EN: OutputPin, DIR: OutputPin, STEP: OutputPin> StepperDriver<EN, DIR, STEP> {
    pub fn new(enable_pin: EN, dir_pin: DIR, step_pin: STEP, revert_dir: bool) -> Self {
        StepperDriver { enable_pin, dir_pin, step_pin, revert_dir }
    }

    pub fn enable(&mut self) -> Result<(), BoardError> {
        self.enable_pin.set_low().map_err(|_| BoardError::GpioPin)
    }

    pub fn disable(&mut self) -> Result<(), BoardError> {
        self.enable_pin.set_high().map_err(|_| BoardError::GpioPin)
    }

    pub fn set_direction(&mut self, forward: bool) -> Result<(), BoardError> {
        if forward ^ self.revert_dir {
            self.dir_pin.set_high().map_err(|_| BoardError::GpioPin)?;
        } else {
            self.dir_pin.set_low().map_err(|_| BoardError::GpioPin)?;
        }
        Ok(())
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        self.revert_dir = inverted;
    }

    /// Emit one complete step pulse.
    pub fn pulse(&mut self) -> Result<(), BoardError> {
        self.step_pin.set_high().map_err(|_| BoardError::GpioPin)?;
        self.step_pin.set_low().map_err(|_| BoardError::GpioPin)
    }
}
