//! Logging macros that route to defmt on the target, plain text under host
//! tests, and compile to nothing everywhere else.

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(all(feature = "defmt", target_os = "none"))]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(target_os = "none"), test))]
        println!("[INFO] {}", format!($($arg)*));
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(all(feature = "defmt", target_os = "none"))]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(target_os = "none"), test))]
        println!("[WARN] {}", format!($($arg)*));
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(all(feature = "defmt", target_os = "none"))]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(target_os = "none"), test))]
        eprintln!("[ERROR] {}", format!($($arg)*));
    }};
}
