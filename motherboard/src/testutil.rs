//! Shared-handle fakes for unit tests. Handles are cheap clones over the
//! same cell, so tests keep observing pins after moving them into the
//! board.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use fugit::MicrosDurationU32;

use crate::board::Motherboard;
use crate::bsp::config::STEPPER_COUNT;
use crate::common::host_link::HostLink;
use crate::common::settings::RamSettings;
use crate::common::stepper_driver::StepperDriver;
use crate::common::timer::PeriodicTimer;
use crate::hardware::BoardHardware;
use crate::motion::{MotionControl, StepperSet};
use crate::stepper_channel::StepperChannel;

#[derive(Default)]
struct PinCell {
    level: Cell<bool>,
    rising_edges: Cell<u32>,
}

#[derive(Clone, Default)]
pub(crate) struct TestPin {
    cell: Rc<PinCell>,
}

impl TestPin {
    pub fn new() -> Self {
        TestPin::default()
    }

    pub fn level(&self) -> bool {
        self.cell.level.get()
    }

    pub fn rising_edges(&self) -> u32 {
        self.cell.rising_edges.get()
    }

    /// Drive the pin from "outside", e.g. to simulate an endstop switch.
    pub fn set_level(&self, high: bool) {
        self.cell.level.set(high);
    }
}

impl ErrorType for TestPin {
    type Error = Infallible;
}

impl OutputPin for TestPin {
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

impl InputPin for TestPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.cell.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.cell.level.get())
    }
}

#[derive(Clone, Default)]
pub(crate) struct TestTimer {
    pub armed_period_us: Rc<Cell<Option<u32>>>,
    pub rearms: Rc<Cell<u32>>,
}

impl PeriodicTimer for TestTimer {
    fn arm(&mut self, period: MicrosDurationU32) {
        self.armed_period_us.set(Some(period.to_micros()));
    }

    fn rearm(&mut self) {
        self.rearms.set(self.rearms.get() + 1);
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum HostLinkEvent {
    Enabled(bool),
    Reset,
    ResetRx,
    ResetTx,
}

#[derive(Clone, Default)]
pub(crate) struct TestHostLink {
    pub events: Rc<RefCell<Vec<HostLinkEvent>>>,
}

impl HostLink for TestHostLink {
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

pub(crate) struct TestHardware;

impl BoardHardware for TestHardware {
    type EnablePin = TestPin;
    type DirPin = TestPin;
    type StepPin = TestPin;
    type EndstopPin = TestPin;
    type IndicatorPin = TestPin;
    type StepTimer = TestTimer;
    type IndicatorTimer = TestTimer;
    type Settings = RamSettings<64>;
    type Host = TestHostLink;
}

/// Motion fake: counts advances and toggles every step line once per
/// advance, so two advances produce one pulse per channel.
pub(crate) struct TestMotion {
    paused: Rc<Cell<bool>>,
    advances: Rc<Cell<u32>>,
    hold_z: Rc<Cell<Option<bool>>>,
    step_level: bool,
}

impl MotionControl<TestHardware> for TestMotion {
    fn is_paused(&self) -> bool {
        self.paused.get()
    }

    fn advance(&mut self, channels: &mut StepperSet<TestHardware>) {
        self.advances.set(self.advances.get() + 1);
        self.step_level = !self.step_level;
        for channel in channels.iter_mut() {
            let _ = channel.step(self.step_level);
        }
    }

    fn set_hold_z(&mut self, hold: bool) {
        self.hold_z.set(Some(hold));
    }
}

/// Observer handles for one channel's pins.
pub(crate) struct ChannelPins {
    pub enable: TestPin,
    pub dir: TestPin,
    pub step: TestPin,
}

pub(crate) fn test_channel() -> (StepperChannel<TestHardware>, ChannelPins) {
    let pins = ChannelPins { enable: TestPin::new(), dir: TestPin::new(), step: TestPin::new() };
    let driver = StepperDriver::new(pins.enable.clone(), pins.dir.clone(), pins.step.clone(), false);
    (StepperChannel::new(driver), pins)
}

pub(crate) struct TestFixture {
    pub board: Motherboard<TestHardware, TestMotion>,
    pub indicator_pin: TestPin,
    pub channel_pins: Vec<ChannelPins>,
    pub paused: Rc<Cell<bool>>,
    pub advances: Rc<Cell<u32>>,
    pub hold_z: Rc<Cell<Option<bool>>>,
    pub host_events: Rc<RefCell<Vec<HostLinkEvent>>>,
    pub step_period: Rc<Cell<Option<u32>>>,
    pub indicator_period: Rc<Cell<Option<u32>>>,
}

/// Board with [`STEPPER_COUNT`] channels and `axis_byte` persisted in the
/// settings store (0xff behaves like an erased cell).
pub(crate) fn test_board(axis_byte: u8) -> TestFixture {
    let mut channels = StepperSet::new();
    let mut channel_pins = Vec::new();
    for _ in 0..STEPPER_COUNT {
        let (channel, pins) = test_channel();
        channels.push(channel).ok().unwrap();
        channel_pins.push(pins);
    }

    let indicator_pin = TestPin::new();
    let paused = Rc::new(Cell::new(false));
    let advances = Rc::new(Cell::new(0));
    let hold_z = Rc::new(Cell::new(None));
    let motion = TestMotion {
        paused: paused.clone(),
        advances: advances.clone(),
        hold_z: hold_z.clone(),
        step_level: false,
    };

    let mut settings = RamSettings::new();
    settings.write_byte(generic::settings::AXIS_INVERSION, axis_byte);

    let host_link = TestHostLink::default();
    let host_events = host_link.events.clone();
    let step_timer = TestTimer::default();
    let step_period = step_timer.armed_period_us.clone();
    let indicator_timer = TestTimer::default();
    let indicator_period = indicator_timer.armed_period_us.clone();

    let board = Motherboard::new(
        channels,
        indicator_pin.clone(),
        motion,
        settings,
        host_link,
        step_timer,
        indicator_timer,
    );

    TestFixture {
        board,
        indicator_pin,
        channel_pins,
        paused,
        advances,
        hold_z,
        host_events,
        step_period,
        indicator_period,
    }
}
