use core::cell::RefCell;

use critical_section::Mutex;
use fugit::ExtU32;

use generic::board_error::BoardError;
use generic::settings;
use generic::time::Micros;

use crate::bsp::config::{
    DEBUG_MSG_BUFFER_SIZE, INDICATOR_TICK_INTERVAL_US, STEP_CLOCK_INTERVAL_US,
};
use crate::common::host_link::HostLink;
use crate::common::settings::SettingsStore;
use crate::common::timer::PeriodicTimer;
use crate::hardware::BoardHardware;
use crate::indicator::StatusIndicator;
use crate::motion::{MotionControl, StepperSet};
use crate::stepper_channel::StepperChannel;
use crate::{log_error, log_info};

/// State read or written from both interrupt and thread context. Every
/// access goes through the critical-section mutex; no field is ever
/// touched outside it.
struct SharedState {
    elapsed_micros: Micros,
    error_code: u8,
    debug_message: [u8; DEBUG_MSG_BUFFER_SIZE],
    debug_message_len: u8,
}

/// The realtime controller of the board.
///
/// Owns the stepper channels, the status indicator and the shared
/// time/debug/error state. The two interrupt entry points
/// ([`on_step_clock_tick`] and [`on_indicator_tick`]) are plain methods;
/// board support moves the one instance into a critical-section cell and
/// calls them from thin interrupt trampolines.
///
/// [`on_step_clock_tick`]: Motherboard::on_step_clock_tick
/// [`on_indicator_tick`]: Motherboard::on_indicator_tick
pub struct Motherboard<H: BoardHardware, M: MotionControl<H>> {
    shared: Mutex<RefCell<SharedState>>,
    channels: StepperSet<H>,
    indicator: StatusIndicator<H::IndicatorPin>,
    motion: M,
    settings: H::Settings,
    host_link: H::Host,
    step_timer: H::StepTimer,
    indicator_timer: H::IndicatorTimer,
}

impl<H: BoardHardware, M: MotionControl<H>> Motherboard<H, M> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        channels: StepperSet<H>,
        indicator_pin: H::IndicatorPin,
        motion: M,
        settings: H::Settings,
        host_link: H::Host,
        step_timer: H::StepTimer,
        indicator_timer: H::IndicatorTimer,
    ) -> Self {
        Motherboard {
            shared: Mutex::new(RefCell::new(SharedState {
                elapsed_micros: 0,
                error_code: 0,
                debug_message: [0; DEBUG_MSG_BUFFER_SIZE],
                debug_message_len: 0,
            })),
            channels,
            indicator: StatusIndicator::new(indicator_pin),
            motion,
            settings,
            host_link,
            step_timer,
            indicator_timer,
        }
    }

    /// Reset the board to its initial state. Idempotent; must run before
    /// either interrupt may fire.
    pub fn reset(&mut self) -> Result<(), BoardError> {
        self.set_debug_message(&[]);
        self.report_error(0)?;

        let axis_invert = self.settings.read_byte(settings::AXIS_INVERSION, 0);
        // Z holding keeps the coil energized while the axis is idle so
        // the stage cannot shift under gravity. Bit 7 is active low:
        // 0 means hold, 1 means release.
        let hold_z = settings::hold_z_enabled(axis_invert);
        self.motion.set_hold_z(hold_z);
        for (axis, channel) in self.channels.iter_mut().enumerate() {
            channel.set_inverted(settings::axis_inverted(axis_invert, axis));
        }

        self.host_link.enable(true);
        self.host_link.reset_rx();
        self.host_link.reset();
        self.host_link.reset_tx();

        self.step_timer.arm(STEP_CLOCK_INTERVAL_US.micros());
        self.indicator_timer.arm(INDICATOR_TICK_INTERVAL_US.micros());

        log_info!("board reset, {} stepper channels, hold_z={}", self.channels.len(), hold_z);
        Ok(())
    }

    /// Step-clock interrupt entry. Runs once per
    /// [`STEP_CLOCK_INTERVAL_US`] and must complete well within that
    /// period on every invocation.
    pub fn on_step_clock_tick(&mut self) {
        self.step_timer.rearm();
        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            shared.elapsed_micros = shared.elapsed_micros.wrapping_add(STEP_CLOCK_INTERVAL_US);
        });
        // A paused board keeps time but never touches a channel.
        if self.motion.is_paused() {
            return;
        }
        self.motion.advance(&mut self.channels);
    }

    /// Indicator-clock interrupt entry.
    pub fn on_indicator_tick(&mut self) {
        self.indicator_timer.rearm();
        let error_code = critical_section::with(|cs| self.shared.borrow_ref(cs).error_code);
        if self.indicator.on_tick(error_code).is_err() {
            log_error!("indicator write failed");
        }
    }

    /// Snapshot of the microseconds elapsed since initialization. Wraps;
    /// see [`generic::time::micros_elapsed`].
    pub fn current_micros(&self) -> Micros {
        critical_section::with(|cs| self.shared.borrow_ref(cs).elapsed_micros)
    }

    /// Store a debug message for a later pickup over the host link. Only
    /// the first [`DEBUG_MSG_BUFFER_SIZE`] bytes are kept; the previous
    /// message is overwritten wholesale.
    pub fn set_debug_message(&self, message: &[u8]) {
        let len = message.len().min(DEBUG_MSG_BUFFER_SIZE);
        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            shared.debug_message[..len].copy_from_slice(&message[..len]);
            shared.debug_message[len..].fill(0);
            shared.debug_message_len = len as u8;
        });
    }

    /// Copy the stored debug message into `out`, zero-padding past the
    /// stored length. Returns that length.
    pub fn debug_message(&self, out: &mut [u8; DEBUG_MSG_BUFFER_SIZE]) -> u8 {
        critical_section::with(|cs| {
            let shared = self.shared.borrow_ref(cs);
            out.copy_from_slice(&shared.debug_message);
            shared.debug_message_len
        })
    }

    /// Report an error code to render on the indicator.
    ///
    /// Zero clears the error and forces the line low immediately. A new
    /// nonzero code restarts the blink cycle; repeating the stored code
    /// leaves the in-progress cycle untouched. The code is always stored.
    pub fn report_error(&mut self, code: u8) -> Result<(), BoardError> {
        let Motherboard { shared, indicator, .. } = self;
        critical_section::with(|cs| {
            let mut state = shared.borrow_ref_mut(cs);
            let result = if code == 0 {
                indicator.clear()
            } else if state.error_code != code {
                indicator.restart()
            } else {
                Ok(())
            };
            state.error_code = code;
            result
        })
    }

    /// The error code currently being displayed.
    pub fn current_error(&self) -> u8 {
        critical_section::with(|cs| self.shared.borrow_ref(cs).error_code)
    }

    /// Number of stepper channels fitted on this board. Fixed for the
    /// controller's lifetime.
    pub fn stepper_count(&self) -> usize {
        self.channels.len()
    }

    /// The channel for the given axis; the same index always returns the
    /// same channel. Panics on an out-of-range axis.
    pub fn stepper_channel(&mut self, axis: usize) -> &mut StepperChannel<H> {
        &mut self.channels[axis]
    }
}
