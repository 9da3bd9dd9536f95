//! A scripted stand-in for the motion/command collaborator.

use std::cell::Cell;
use std::rc::Rc;

use motherboard::motion::{MotionControl, StepperSet};

use crate::mock_hardware::MockHardware;

/// Drives every channel's step line like a trivial constant-rate planner:
/// the line toggles once per tick, so two ticks produce one pulse per
/// channel. Pause and hold-Z are observable through shared handles.
pub struct ScriptedMotion {
    paused: Rc<Cell<bool>>,
    advances: Rc<Cell<u32>>,
    hold_z: Rc<Cell<Option<bool>>>,
    step_level: bool,
}

/// Observer/driver handles for a [`ScriptedMotion`].
#[derive(Clone)]
pub struct MotionHandles {
    pub paused: Rc<Cell<bool>>,
    pub advances: Rc<Cell<u32>>,
    pub hold_z: Rc<Cell<Option<bool>>>,
}

impl ScriptedMotion {
    pub fn new() -> (Self, MotionHandles) {
        let handles = MotionHandles {
            paused: Rc::new(Cell::new(false)),
            advances: Rc::new(Cell::new(0)),
            hold_z: Rc::new(Cell::new(None)),
        };
        let motion = ScriptedMotion {
            paused: handles.paused.clone(),
            advances: handles.advances.clone(),
            hold_z: handles.hold_z.clone(),
            step_level: false,
        };
        (motion, handles)
    }
}

impl MotionControl<MockHardware> for ScriptedMotion {
    fn is_paused(&self) -> bool {
        self.paused.get()
    }

    fn advance(&mut self, channels: &mut StepperSet<MockHardware>) {
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
