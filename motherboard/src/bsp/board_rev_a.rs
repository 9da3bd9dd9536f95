//! Board support for the rev A controller: an RP2040 carrier with three
//! step/dir output stages, a host UART on GPIO0/1 and the status LED on
//! GPIO25. Rev A has no endstop headers and no dedicated settings part.

use core::cell::RefCell;

use cortex_m::peripheral::NVIC;
use critical_section::Mutex;
use defmt_rtt as _;
use fugit::MicrosDurationU32;
use panic_probe as _;
use rp2040_hal::gpio::bank0::{Gpio0, Gpio1, Gpio25};
use rp2040_hal::gpio::{
    DynPinId, FunctionSioInput, FunctionSioOutput, FunctionUart, Pin, PullDown,
};
use rp2040_hal::pac::{interrupt, Interrupt, UART0};
use rp2040_hal::timer::{Alarm, Alarm0, Alarm1};
use rp2040_hal::uart::{Enabled, UartPeripheral};

use crate::board::Motherboard;
use crate::common::host_link::HostLink;
use crate::common::settings::RamSettings;
use crate::common::stepper_driver::StepperDriver;
use crate::common::timer::PeriodicTimer;
use crate::define_pins;
use crate::hardware::BoardHardware;
use crate::motion::MotionControl;
use crate::stepper_channel::StepperChannel;

pub type IndicatorPinType = Pin<Gpio25, FunctionSioOutput, PullDown>;
pub type StepperEnablePinType = Pin<DynPinId, FunctionSioOutput, PullDown>;
pub type StepperDirPinType = Pin<DynPinId, FunctionSioOutput, PullDown>;
pub type StepperStepPinType = Pin<DynPinId, FunctionSioOutput, PullDown>;
pub type EndstopPinType = Pin<DynPinId, FunctionSioInput, PullDown>;
pub type HostUartPins = (Pin<Gpio0, FunctionUart, PullDown>, Pin<Gpio1, FunctionUart, PullDown>);
pub type HostUartType = UartPeripheral<Enabled, UART0, HostUartPins>;

define_pins! {
    // host link
    host_uart_tx, gpio0,
    host_uart_rx, gpio1,
    // X axis
    stepper_x_nEN, gpio2,
    stepper_x_dir, gpio3,
    stepper_x_step, gpio4,
    // Y axis
    stepper_y_nEN, gpio5,
    stepper_y_dir, gpio6,
    stepper_y_step, gpio7,
    // Z axis
    stepper_z_nEN, gpio8,
    stepper_z_dir, gpio9,
    stepper_z_step, gpio10,
    // status LED
    indicator_led, gpio25
}

/// Size of the RAM-backed settings area on rev A.
pub const SETTINGS_BYTES: usize = 64;

/// One-shot hardware alarm re-armed from the interrupt entry each period.
pub struct AlarmTimer<A: Alarm> {
    alarm: A,
    period: MicrosDurationU32,
}

impl<A: Alarm> AlarmTimer<A> {
    pub fn new(alarm: A) -> Self {
        AlarmTimer { alarm, period: MicrosDurationU32::micros(0) }
    }
}

impl<A: Alarm> PeriodicTimer for AlarmTimer<A> {
    fn arm(&mut self, period: MicrosDurationU32) {
        self.period = period;
        let _ = self.alarm.schedule(period);
        self.alarm.enable_interrupt();
    }

    fn rearm(&mut self) {
        self.alarm.clear_interrupt();
        let _ = self.alarm.schedule(self.period);
    }
}

/// Host link over the board UART. Enable toggles the receive interrupt;
/// the inbound reset drains whatever sits in the FIFO.
pub struct RevAHostUart {
    uart: HostUartType,
}

impl RevAHostUart {
    pub fn new(uart: HostUartType) -> Self {
        RevAHostUart { uart }
    }
}

impl HostLink for RevAHostUart {
    fn enable(&mut self, enabled: bool) {
        if enabled {
            self.uart.enable_rx_interrupt();
        } else {
            self.uart.disable_rx_interrupt();
        }
    }

    fn reset(&mut self) {
        self.reset_rx();
        self.reset_tx();
    }

    fn reset_rx(&mut self) {
        let mut scratch = [0u8; 8];
        while self.uart.read_raw(&mut scratch).is_ok() {}
    }

    fn reset_tx(&mut self) {
        // The TX FIFO drains on its own; nothing is queued above it.
    }
}

pub struct RevAHardware;

impl BoardHardware for RevAHardware {
    type EnablePin = StepperEnablePinType;
    type DirPin = StepperDirPinType;
    type StepPin = StepperStepPinType;
    type EndstopPin = EndstopPinType;
    type IndicatorPin = IndicatorPinType;
    type StepTimer = AlarmTimer<Alarm0>;
    type IndicatorTimer = AlarmTimer<Alarm1>;
    type Settings = RamSettings<SETTINGS_BYTES>;
    type Host = RevAHostUart;
}

/// Motion collaborator installed on this board.
pub type RevAMotion = &'static mut (dyn MotionControl<RevAHardware> + Send);

pub type RevABoard = Motherboard<RevAHardware, RevAMotion>;

/// Channel for one rev A axis; rev A carries no endstop wiring.
pub fn stepper_channel(
    enable: StepperEnablePinType,
    dir: StepperDirPinType,
    step: StepperStepPinType,
) -> StepperChannel<RevAHardware> {
    StepperChannel::new(StepperDriver::new(enable, dir, step, false))
}

static BOARD: Mutex<RefCell<Option<RevABoard>>> = Mutex::new(RefCell::new(None));

/// Bind the one controller instance to the interrupt trampolines and
/// unmask both timer interrupts. [`Motherboard::reset`] must have armed
/// the timers first.
pub fn install(board: RevABoard) {
    critical_section::with(|cs| {
        BOARD.borrow(cs).replace(Some(board));
    });
    unsafe {
        NVIC::unmask(Interrupt::TIMER_IRQ_0);
        NVIC::unmask(Interrupt::TIMER_IRQ_1);
    }
}

/// Run `f` on the installed board from thread context; the critical
/// section keeps both tick interrupts out for its duration.
pub fn with_board<R>(f: impl FnOnce(&mut RevABoard) -> R) -> Option<R> {
    critical_section::with(|cs| BOARD.borrow_ref_mut(cs).as_mut().map(f))
}

#[interrupt]
fn TIMER_IRQ_0() {
    critical_section::with(|cs| {
        if let Some(board) = BOARD.borrow_ref_mut(cs).as_mut() {
            board.on_step_clock_tick();
        }
    });
}

#[interrupt]
fn TIMER_IRQ_1() {
    critical_section::with(|cs| {
        if let Some(board) = BOARD.borrow_ref_mut(cs).as_mut() {
            board.on_indicator_tick();
        }
    });
}
