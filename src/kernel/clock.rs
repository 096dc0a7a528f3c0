// Monotonic millisecond clock
//
// Wrapping u32 counter (~49.7 days per lap). Never compare raw values;
// take the modular distance with elapsed_ms() instead, which stays
// correct across one wrap.

use core::cell::Cell;

use critical_section::Mutex;

pub trait Clock {
    /// Milliseconds since boot, wrapping at `u32::MAX`.
    fn now_ms(&self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &T {
    #[inline]
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Forward distance from `since` to `now`, modulo 2^32.
#[inline]
pub const fn elapsed_ms(since: u32, now: u32) -> u32 {
    now.wrapping_sub(since)
}

// Counter advanced by a periodic timer interrupt.
// cs: riscv32imc has no atomic add
pub struct TickCounter {
    ms: Mutex<Cell<u32>>,
}

impl TickCounter {
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    pub const fn starting_at(ms: u32) -> Self {
        Self {
            ms: Mutex::new(Cell::new(ms)),
        }
    }

    // called from the timer ISR with the timer period
    #[inline]
    pub fn advance(&self, ms: u32) {
        critical_section::with(|cs| {
            let cell = self.ms.borrow(cs);
            cell.set(cell.get().wrapping_add(ms));
        });
    }

    pub fn get(&self) -> u32 {
        critical_section::with(|cs| self.ms.borrow(cs).get())
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TickCounter {
    #[inline]
    fn now_ms(&self) -> u32 {
        self.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_without_wrap() {
        assert_eq!(elapsed_ms(100, 350), 250);
        assert_eq!(elapsed_ms(7, 7), 0);
    }

    #[test]
    fn elapsed_across_wrap_is_forward_distance() {
        assert_eq!(elapsed_ms(u32::MAX, 0), 1);
        assert_eq!(elapsed_ms(u32::MAX - 9, 5), 15);
        assert_eq!(elapsed_ms(0xFFFF_FF00, 0x0000_0100), 0x200);
    }

    #[test]
    fn tick_counter_wraps() {
        let ticks = TickCounter::starting_at(u32::MAX - 1);
        ticks.advance(1);
        assert_eq!(ticks.now_ms(), u32::MAX);
        ticks.advance(3);
        assert_eq!(ticks.now_ms(), 2);
        assert_eq!(elapsed_ms(u32::MAX - 1, ticks.now_ms()), 4);
    }

    #[test]
    fn clock_through_reference() {
        let ticks = TickCounter::new();
        ticks.advance(42);
        let by_ref: &dyn Clock = &ticks;
        assert_eq!((&ticks).now_ms(), 42);
        assert_eq!(by_ref.now_ms(), 42);
    }
}
