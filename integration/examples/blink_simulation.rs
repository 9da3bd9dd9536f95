//! Render the indicator pattern for a few error codes on the terminal.
//!
//! ```text
//! cargo run -p integration --example blink_simulation
//! ```

use integration::fixture::mock_board;
use motherboard::indicator::{OFF_TICKS, ON_TICKS, PAUSE_TICKS};

fn main() {
    for code in [1u8, 3] {
        let mut fixture = mock_board(None);
        fixture.board.reset().expect("board reset");
        fixture.board.report_error(code).expect("report error");

        let cycle = code as usize * (ON_TICKS + OFF_TICKS) as usize + PAUSE_TICKS as usize;
        let mut line = String::with_capacity(cycle);
        for _ in 0..cycle {
            fixture.board.on_indicator_tick();
            line.push(if fixture.indicator.level() { '#' } else { '.' });
        }
        println!("error {code}: {line}");
    }
}
