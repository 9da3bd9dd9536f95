use fugit::MicrosDurationU32;

/// A periodic interrupt source.
///
/// The core treats timers as opaque triggers: it arms them once during
/// board reset and acknowledges each firing from the interrupt entry
/// point. One-shot hardware schedules the next period in [`rearm`];
/// auto-reload hardware only clears its pending flag there.
///
/// [`rearm`]: PeriodicTimer::rearm
pub trait PeriodicTimer {
    /// Program the period and enable the interrupt.
    fn arm(&mut self, period: MicrosDurationU32);

    /// Acknowledge a fired interrupt and keep the timer running.
    fn rearm(&mut self);
}
