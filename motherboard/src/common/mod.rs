pub mod host_link;
pub mod logging;
pub mod settings;
pub mod stepper_driver;
pub mod timer;
