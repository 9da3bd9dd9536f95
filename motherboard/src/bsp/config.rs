//! Fixed configuration shared by all board revisions.

/// Interval between step-clock interrupts, in microseconds. This is the
/// minimum possible time between step pulses; in practice the time
/// between steps should be at least eight times larger, or interrupt
/// work starves everything else.
pub const STEP_CLOCK_INTERVAL_US: u32 = 64;

/// Interval between indicator-blink ticks, in microseconds. Derived from
/// a fixed hardware prescale; blink phase lengths are counted in these
/// ticks.
pub const INDICATOR_TICK_INTERVAL_US: u32 = 16_384;

/// Capacity of the cross-context debug message buffer.
pub const DEBUG_MSG_BUFFER_SIZE: usize = 32;

/// Stepper axes fitted on the current board revision (X, Y, Z).
pub const STEPPER_COUNT: usize = 3;

/// Largest axis count any supported board revision carries.
pub const MAX_STEPPER_COUNT: usize = 5;
