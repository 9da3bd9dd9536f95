//! Mock peripherals. Each mock hands out cheap clones over one shared
//! cell, so a test keeps its observer handle after moving the "pin" into
//! the board.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use fugit::MicrosDurationU32;

use motherboard::common::host_link::HostLink;
use motherboard::common::settings::RamSettings;
use motherboard::common::stepper_driver::StepperDriver;
use motherboard::common::timer::PeriodicTimer;
use motherboard::hardware::BoardHardware;
use motherboard::stepper_channel::StepperChannel;

#[derive(Default)]
struct PinCell {
    level: Cell<bool>,
    rising_edges: Cell<u32>,
}

/// A GPIO line; output writes count rising edges, input reads follow
/// whatever [`SharedPin::set_level`] last drove.
#[derive(Clone, Default)]
pub struct SharedPin {
    cell: Rc<PinCell>,
}

impl SharedPin {
    pub fn new() -> Self {
        SharedPin::default()
    }

    pub fn level(&self) -> bool {
        self.cell.level.get()
    }

    /// Completed low-to-high transitions seen on this line.
    pub fn rising_edges(&self) -> u32 {
        self.cell.rising_edges.get()
    }

    /// Drive the line from outside the board, e.g. a closing endstop.
    pub fn set_level(&self, high: bool) {
        self.cell.level.set(high);
    }
}

impl ErrorType for SharedPin {
    type Error = Infallible;
}

impl OutputPin for SharedPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.cell.level.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        if !self.cell.level.get() {
            self.cell.rising_edges.set(self.cell.rising_edges.get() + 1);
        }
        self.cell.level.set(true);
        Ok(())
    }
}

impl InputPin for SharedPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.cell.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.cell.level.get())
    }
}

/// Periodic timer that records its programmed period and counts the
/// acknowledgements from the interrupt entries.
#[derive(Clone, Default)]
pub struct MockTimer {
    armed_period_us: Rc<Cell<Option<u32>>>,
    rearms: Rc<Cell<u32>>,
}

impl MockTimer {
    pub fn armed_period_us(&self) -> Option<u32> {
        self.armed_period_us.get()
    }

    pub fn rearms(&self) -> u32 {
        self.rearms.get()
    }
}

impl PeriodicTimer for MockTimer {
    fn arm(&mut self, period: MicrosDurationU32) {
        self.armed_period_us.set(Some(period.to_micros()));
    }

    fn rearm(&mut self) {
        self.rearms.set(self.rearms.get() + 1);
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HostLinkEvent {
    Enabled(bool),
    Reset,
    ResetRx,
    ResetTx,
}

/// Host link that records the configuration calls made against it.
#[derive(Clone, Default)]
pub struct MockHostLink {
    events: Rc<RefCell<Vec<HostLinkEvent>>>,
}

impl MockHostLink {
    pub fn events(&self) -> Vec<HostLinkEvent> {
        self.events.borrow().clone()
    }
}

impl HostLink for MockHostLink {
    fn enable(&mut self, enabled: bool) {
        self.events.borrow_mut().push(HostLinkEvent::Enabled(enabled));
    }

    fn reset(&mut self) {
        self.events.borrow_mut().push(HostLinkEvent::Reset);
    }

    fn reset_rx(&mut self) {
        self.events.borrow_mut().push(HostLinkEvent::ResetRx);
    }

    fn reset_tx(&mut self) {
        self.events.borrow_mut().push(HostLinkEvent::ResetTx);
    }
}

pub struct MockHardware;

impl BoardHardware for MockHardware {
    type EnablePin = SharedPin;
    type DirPin = SharedPin;
    type StepPin = SharedPin;
    type EndstopPin = SharedPin;
    type IndicatorPin = SharedPin;
    type StepTimer = MockTimer;
    type IndicatorTimer = MockTimer;
    type Settings = RamSettings<64>;
    type Host = MockHostLink;
}

/// Observer handles for one channel's lines.
#[derive(Clone)]
pub struct ChannelPins {
    pub enable: SharedPin,
    pub dir: SharedPin,
    pub step: SharedPin,
}

/// A channel without endstop wiring plus its observer handles.
pub fn mock_channel() -> (StepperChannel<MockHardware>, ChannelPins) {
    let pins =
        ChannelPins { enable: SharedPin::new(), dir: SharedPin::new(), step: SharedPin::new() };
    let driver = StepperDriver::new(pins.enable.clone(), pins.dir.clone(), pins.step.clone(), false);
    (StepperChannel::new(driver), pins)
}
