/// Microseconds since board initialization. Wraps at the counter's bit
/// width; callers computing durations must go through [`micros_elapsed`].
pub type Micros = u32;

/// Duration between two [`Micros`] readings, correct across a single
/// counter wraparound.
#[must_use]
pub fn micros_elapsed(now: Micros, earlier: Micros) -> Micros {
    now.wrapping_sub(earlier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_without_wraparound() {
        assert_eq!(micros_elapsed(1_000, 936), 64);
        assert_eq!(micros_elapsed(64, 64), 0);
    }

    #[test]
    fn elapsed_across_wraparound() {
        assert_eq!(micros_elapsed(24, Micros::MAX - 39), 64);
        assert_eq!(micros_elapsed(0, Micros::MAX), 1);
    }
}
