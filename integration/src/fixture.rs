//! One-call assembly of a fully mocked board.

use motherboard::board::Motherboard;
use motherboard::bsp::config::STEPPER_COUNT;
use motherboard::common::settings::RamSettings;
use motherboard::motion::StepperSet;

use crate::mock_hardware::{
    mock_channel, ChannelPins, MockHardware, MockHostLink, MockTimer, SharedPin,
};
use crate::scripted_motion::{MotionHandles, ScriptedMotion};

pub struct MockBoard {
    pub board: Motherboard<MockHardware, ScriptedMotion>,
    pub indicator: SharedPin,
    pub channels: Vec<ChannelPins>,
    pub motion: MotionHandles,
    pub host: MockHostLink,
    pub step_timer: MockTimer,
    pub indicator_timer: MockTimer,
}

/// Board with the standard channel count. `axis_byte`, when given, is
/// persisted at the axis-inversion offset before construction.
pub fn mock_board(axis_byte: Option<u8>) -> MockBoard {
    let mut channel_set = StepperSet::new();
    let mut channels = Vec::new();
    for _ in 0..STEPPER_COUNT {
        let (channel, pins) = mock_channel();
        channel_set.push(channel).ok().expect("channel set capacity");
        channels.push(pins);
    }

    let mut settings = RamSettings::new();
    if let Some(byte) = axis_byte {
        settings.write_byte(generic::settings::AXIS_INVERSION, byte);
    }

    let indicator = SharedPin::new();
    let (motion, motion_handles) = ScriptedMotion::new();
    let host = MockHostLink::default();
    let step_timer = MockTimer::default();
    let indicator_timer = MockTimer::default();

    let board = Motherboard::new(
        channel_set,
        indicator.clone(),
        motion,
        settings,
        host.clone(),
        step_timer.clone(),
        indicator_timer.clone(),
    );

    MockBoard {
        board,
        indicator,
        channels,
        motion: motion_handles,
        host,
        step_timer,
        indicator_timer,
    }
}
