use heapless::Vec;

use crate::bsp::config::MAX_STEPPER_COUNT;
use crate::hardware::BoardHardware;
use crate::stepper_channel::StepperChannel;

/// The board's stepper channels, sized for the largest supported
/// revision; the populated length is fixed at construction.
pub type StepperSet<H> = Vec<StepperChannel<H>, MAX_STEPPER_COUNT>;

/// Motion/command collaborator interface.
///
/// Step timing decisions belong to the implementor; the controller only
/// supplies the periodic trigger and the channel set to drive.
pub trait MotionControl<H: BoardHardware> {
    /// Polled once per step-clock tick. While true, step generation is
    /// skipped; timekeeping continues.
    fn is_paused(&self) -> bool;

    /// Advance pulse generation by one step-clock tick. Runs in interrupt
    /// context and must complete well within one tick period.
    fn advance(&mut self, channels: &mut StepperSet<H>);

    /// Keep the Z coil energized while the axis is idle.
    fn set_hold_z(&mut self, hold: bool);
}

impl<H, M> MotionControl<H> for &mut M
where
    H: BoardHardware,
    M: MotionControl<H> + ?Sized,
{
    fn is_paused(&self) -> bool {
        (**self).is_paused()
    }

    fn advance(&mut self, channels: &mut StepperSet<H>) {
        (**self).advance(channels)
    }

    fn set_hold_z(&mut self, hold: bool) {
        (**self).set_hold_z(hold)
    }
}
