// System tick: TIMG0 timer 0 at 1 ms, counted in TICKS
//
// The timer lands in its cell before its interrupt is enabled, so the
// handler always finds it and can clear the source.

use esp_hal::time::Duration;

use super::TickTimer;
use crate::kernel::{Shared, TickCounter};

pub const TICK_MS: u32 = 1;

pub static TICKS: TickCounter = TickCounter::new();
static TIMER0: Shared<TickTimer> = Shared::new();

#[esp_hal::handler(priority = esp_hal::interrupt::Priority::Priority1)]
fn timer0_handler() {
    TIMER0.with(|timer| timer.clear_interrupt());
    TICKS.advance(TICK_MS);
}

pub fn start(timer: TickTimer) {
    TIMER0.install_with(timer, |timer| {
        timer.set_interrupt_handler(timer0_handler);
        timer
            .start(Duration::from_millis(TICK_MS as u64))
            .expect("tick timer start");
        timer.listen();
    });
    log::info!("board: {} ms tick running", TICK_MS);
}
