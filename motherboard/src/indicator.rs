use embedded_hal::digital::OutputPin;

use generic::board_error::BoardError;

/// Indicator ticks the LED stays lit during one blink.
pub const ON_TICKS: u16 = 18;
/// Indicator ticks the LED stays dark between blinks of one cycle.
pub const OFF_TICKS: u16 = 18;
/// Indicator ticks between cycles.
pub const PAUSE_TICKS: u16 = 80;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkState {
    /// Idle: line held low, ticks are no-ops. Left only through
    /// [`StatusIndicator::restart`].
    None,
    On,
    Off,
    Pause,
}

/// Renders an error code as "blink N times, pause" on a single LED,
/// advanced once per low-frequency timer tick.
pub struct StatusIndicator<Led: OutputPin> {
    led: Led,
    state: BlinkState,
    ticks_remaining: u16,
    blinks_completed: u8,
}

impl<Led: OutputPin> StatusIndicator<Led> {
    pub fn new(led: Led) -> Self {
        StatusIndicator { led, state: BlinkState::None, ticks_remaining: 0, blinks_completed: 0 }
    }

    /// Advance the blink pattern by one tick, rendering `error_code`
    /// blinks per cycle. A changed code takes effect at the next phase
    /// boundary; each phase lasts exactly its nominal tick count.
    pub fn on_tick(&mut self, error_code: u8) -> Result<(), BoardError> {
        if self.state == BlinkState::None {
            return Ok(());
        }
        if self.ticks_remaining > 0 {
            self.ticks_remaining -= 1;
            if self.ticks_remaining > 0 {
                return Ok(());
            }
        }
        match self.state {
            BlinkState::On => {
                self.blinks_completed += 1;
                self.state = BlinkState::Off;
                self.ticks_remaining = OFF_TICKS;
                self.set_led(false)
            }
            BlinkState::Off => {
                if self.blinks_completed >= error_code {
                    self.state = BlinkState::Pause;
                    self.ticks_remaining = PAUSE_TICKS;
                    Ok(())
                } else {
                    self.state = BlinkState::On;
                    self.ticks_remaining = ON_TICKS;
                    self.set_led(true)
                }
            }
            BlinkState::Pause => {
                self.blinks_completed = 0;
                self.state = BlinkState::On;
                self.ticks_remaining = ON_TICKS;
                self.set_led(true)
            }
            BlinkState::None => Ok(()),
        }
    }

    /// Begin a fresh cycle: the next tick starts a new `On` phase with a
    /// zeroed blink count.
    pub fn restart(&mut self) -> Result<(), BoardError> {
        self.state = BlinkState::Off;
        self.ticks_remaining = 0;
        self.blinks_completed = 0;
        self.set_led(false)
    }

    /// Force the indicator idle with the line low, bypassing the state
    /// machine.
    pub fn clear(&mut self) -> Result<(), BoardError> {
        self.state = BlinkState::None;
        self.ticks_remaining = 0;
        self.blinks_completed = 0;
        self.set_led(false)
    }

    pub fn state(&self) -> BlinkState {
        self.state
    }

    fn set_led(&mut self, on: bool) -> Result<(), BoardError> {
        if on {
            self.led.set_high().map_err(|_| BoardError::GpioPin)
        } else {
            self.led.set_low().map_err(|_| BoardError::GpioPin)
        }
    }
}
