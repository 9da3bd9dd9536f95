//! Full-controller tests: both interrupt entry points driven by hand,
//! every observation made through the mocked pins.

use generic::settings::{AXIS_INVERT_X, AXIS_INVERT_Z, HOLD_Z_DISABLE};
use generic::time::micros_elapsed;
use integration::fixture::{mock_board, MockBoard};
use integration::mock_hardware::HostLinkEvent;
use motherboard::bsp::config::{
    DEBUG_MSG_BUFFER_SIZE, INDICATOR_TICK_INTERVAL_US, STEPPER_COUNT, STEP_CLOCK_INTERVAL_US,
};
use motherboard::indicator::{OFF_TICKS, ON_TICKS, PAUSE_TICKS};

/// Tick the indicator clock `n` times, collecting the LED level after
/// each tick.
fn indicator_levels(fixture: &mut MockBoard, n: usize) -> Vec<bool> {
    (0..n)
        .map(|_| {
            fixture.board.on_indicator_tick();
            fixture.indicator.level()
        })
        .collect()
}

#[test]
fn step_pulses_count_rising_edges_only() {
    let mut fixture = mock_board(None);
    let channel = fixture.board.stepper_channel(0);
    for level in [true, true, false, true, true, true, false, false, true] {
        channel.step(level).unwrap();
    }
    assert_eq!(fixture.channels[0].step.rising_edges(), 3);
    // Other channels are untouched.
    assert_eq!(fixture.channels[1].step.rising_edges(), 0);
}

#[test]
fn step_clock_accumulates_micros_and_drives_the_channels() {
    let mut fixture = mock_board(None);
    let before = fixture.board.current_micros();
    for _ in 0..1_000 {
        fixture.board.on_step_clock_tick();
    }
    let after = fixture.board.current_micros();
    assert_eq!(micros_elapsed(after, before), 1_000 * STEP_CLOCK_INTERVAL_US);
    assert_eq!(fixture.motion.advances.get(), 1_000);
    // The scripted planner toggles the step line once per tick: one full
    // pulse every two ticks, on every channel.
    for pins in &fixture.channels {
        assert_eq!(pins.step.rising_edges(), 500);
    }
    // Each tick acknowledged its timer.
    assert_eq!(fixture.step_timer.rearms(), 1_000);
}

#[test]
fn paused_board_keeps_time_without_stepping() {
    let mut fixture = mock_board(None);
    fixture.motion.paused.set(true);
    for _ in 0..64 {
        fixture.board.on_step_clock_tick();
    }
    assert_eq!(fixture.board.current_micros(), 64 * STEP_CLOCK_INTERVAL_US);
    assert_eq!(fixture.motion.advances.get(), 0);
    assert!(fixture.channels.iter().all(|pins| pins.step.rising_edges() == 0));

    fixture.motion.paused.set(false);
    fixture.board.on_step_clock_tick();
    assert_eq!(fixture.motion.advances.get(), 1);
}

#[test]
fn debug_message_clamps_and_zero_pads() {
    let fixture = mock_board(None);
    fixture.board.set_debug_message(b"thermistor open");
    let mut out = [0xaa; DEBUG_MSG_BUFFER_SIZE];
    let len = fixture.board.debug_message(&mut out);
    assert_eq!(&out[..len as usize], b"thermistor open");
    assert!(out[len as usize..].iter().all(|&b| b == 0));

    // A second write replaces the first wholesale.
    fixture.board.set_debug_message(&[b'y'; 64]);
    let len = fixture.board.debug_message(&mut out);
    assert_eq!(len as usize, DEBUG_MSG_BUFFER_SIZE);
    assert!(out.iter().all(|&b| b == b'y'));
}

#[test]
fn error_three_blinks_three_times_per_cycle() {
    let mut fixture = mock_board(None);
    fixture.board.report_error(3).unwrap();
    assert_eq!(fixture.board.current_error(), 3);

    let on = ON_TICKS as usize;
    let off = OFF_TICKS as usize;
    let cycle = 3 * (on + off) + PAUSE_TICKS as usize;
    let levels = indicator_levels(&mut fixture, cycle * 2);

    for repeat in 0..2 {
        let base = repeat * cycle;
        for blink in 0..3 {
            let start = base + blink * (on + off);
            assert!(
                levels[start..start + on].iter().all(|&v| v),
                "cycle {repeat} blink {blink} should be high for {ON_TICKS} ticks"
            );
            assert!(
                !levels[start + on..start + on + off].iter().any(|&v| v),
                "cycle {repeat} blink {blink} should be low for {OFF_TICKS} ticks"
            );
        }
        let pause = base + 3 * (on + off);
        assert!(
            !levels[pause..base + cycle].iter().any(|&v| v),
            "cycle {repeat} pause should stay low"
        );
    }
    assert_eq!(fixture.indicator_timer.rearms() as usize, cycle * 2);
}

#[test]
fn clearing_the_error_is_immediate() {
    let mut fixture = mock_board(None);
    fixture.board.report_error(2).unwrap();
    indicator_levels(&mut fixture, 4);
    assert!(fixture.indicator.level());

    fixture.board.report_error(0).unwrap();
    assert_eq!(fixture.board.current_error(), 0);
    assert!(!fixture.indicator.level());
    // And the indicator stays dark without further error reports.
    let levels = indicator_levels(&mut fixture, 100);
    assert!(levels.iter().all(|&v| !v));
}

#[test]
fn a_changed_code_restarts_the_cycle_a_repeat_does_not() {
    let mut fixture = mock_board(None);
    fixture.board.report_error(2).unwrap();
    // Run into the middle of the first blink.
    indicator_levels(&mut fixture, 10);
    assert!(fixture.indicator.level());

    // Same code: the cycle continues where it was.
    fixture.board.report_error(2).unwrap();
    assert!(fixture.indicator.level());

    // Different code: fresh cycle, starting from a low line.
    fixture.board.report_error(4).unwrap();
    assert!(!fixture.indicator.level());
    let levels = indicator_levels(&mut fixture, (ON_TICKS + OFF_TICKS) as usize * 4 + 1);
    let highs = levels.iter().filter(|&&v| v).count();
    // Four full blinks before the pause.
    assert_eq!(highs, ON_TICKS as usize * 4);
}

#[test]
fn reset_derives_hold_z_and_axis_inversion() {
    // X and Z inverted, hold bit clear (active low: holding stays on).
    let mut fixture = mock_board(Some(AXIS_INVERT_X | AXIS_INVERT_Z));
    fixture.board.reset().unwrap();
    assert_eq!(fixture.motion.hold_z.get(), Some(true));

    fixture.board.stepper_channel(0).set_direction(true).unwrap();
    fixture.board.stepper_channel(1).set_direction(true).unwrap();
    fixture.board.stepper_channel(2).set_direction(true).unwrap();
    assert!(!fixture.channels[0].dir.level());
    assert!(fixture.channels[1].dir.level());
    assert!(!fixture.channels[2].dir.level());
}

#[test]
fn reset_honors_the_active_low_hold_bit() {
    let mut fixture = mock_board(Some(HOLD_Z_DISABLE));
    fixture.board.reset().unwrap();
    assert_eq!(fixture.motion.hold_z.get(), Some(false));

    // No persisted byte at all: defaults keep Z holding on.
    let mut fresh = mock_board(None);
    fresh.board.reset().unwrap();
    assert_eq!(fresh.motion.hold_z.get(), Some(true));
}

#[test]
fn reset_configures_link_timers_and_clears_state() {
    let mut fixture = mock_board(None);
    fixture.board.set_debug_message(b"stale");
    fixture.board.report_error(7).unwrap();

    fixture.board.reset().unwrap();

    assert_eq!(
        fixture.host.events(),
        vec![
            HostLinkEvent::Enabled(true),
            HostLinkEvent::ResetRx,
            HostLinkEvent::Reset,
            HostLinkEvent::ResetTx,
        ]
    );
    assert_eq!(fixture.step_timer.armed_period_us(), Some(STEP_CLOCK_INTERVAL_US));
    assert_eq!(fixture.indicator_timer.armed_period_us(), Some(INDICATOR_TICK_INTERVAL_US));

    assert_eq!(fixture.board.current_error(), 0);
    assert!(!fixture.indicator.level());
    let mut out = [0u8; DEBUG_MSG_BUFFER_SIZE];
    assert_eq!(fixture.board.debug_message(&mut out), 0);
    assert!(out.iter().all(|&b| b == 0));
}

#[test]
fn stepper_set_is_fixed_for_the_board_lifetime() {
    let mut fixture = mock_board(None);
    assert_eq!(fixture.board.stepper_count(), STEPPER_COUNT);
    fixture.board.reset().unwrap();
    assert_eq!(fixture.board.stepper_count(), STEPPER_COUNT);

    let first = fixture.board.stepper_channel(1) as *mut _;
    let again = fixture.board.stepper_channel(1) as *mut _;
    assert_eq!(first, again);
}

#[test]
fn endstopless_channels_never_report_triggered() {
    let mut fixture = mock_board(None);
    for axis in 0..fixture.board.stepper_count() {
        let channel = fixture.board.stepper_channel(axis);
        assert!(!channel.is_at_minimum());
        assert!(!channel.is_at_maximum());
    }
}

#[test]
fn coil_enable_is_active_low_at_the_driver() {
    let mut fixture = mock_board(None);
    let channel = fixture.board.stepper_channel(2);
    channel.set_enabled(true).unwrap();
    assert!(!fixture.channels[2].enable.level());
    let channel = fixture.board.stepper_channel(2);
    channel.set_enabled(false).unwrap();
    assert!(fixture.channels[2].enable.level());
}
