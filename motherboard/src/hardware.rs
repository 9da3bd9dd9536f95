use embedded_hal::digital::{InputPin, OutputPin};

use crate::common::host_link::HostLink;
use crate::common::settings::SettingsStore;
use crate::common::timer::PeriodicTimer;

/// Concrete peripheral bindings for one board revision.
///
/// Associated types keep the controller free of platform code while
/// letting each board revision (and the host-side mocks) supply its own
/// pin and peripheral types with no runtime dispatch.
pub trait BoardHardware {
    type EnablePin: OutputPin;
    type DirPin: OutputPin;
    type StepPin: OutputPin;
    type EndstopPin: InputPin;
    type IndicatorPin: OutputPin;
    type StepTimer: PeriodicTimer;
    type IndicatorTimer: PeriodicTimer;
    type Settings: SettingsStore;
    type Host: HostLink;
}
