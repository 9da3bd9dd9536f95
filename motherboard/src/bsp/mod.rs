mod board_helper;

pub mod config;

#[cfg(all(feature = "bsp_rev_a", target_arch = "arm", target_os = "none"))]
pub mod board_rev_a;
#[cfg(all(feature = "bsp_rev_a", target_arch = "arm", target_os = "none"))]
pub use board_rev_a::*;
