// LED bank over embedded-hal output pins
//
// Channel i is pins[i]. Polarity maps "lit" to a pin level, so an
// open-drain LED wired to VCC (lit when low) reads like any other.
// Pin errors are Infallible on every board we drive; they are dropped.

use embedded_hal::digital::StatefulOutputPin;

use crate::kernel::activation::Outputs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

pub struct LedBank<P, const N: usize> {
    pins: [P; N],
    polarity: Polarity,
}

impl<P: StatefulOutputPin, const N: usize> LedBank<P, N> {
    /// Take ownership of the pins and switch every LED off.
    pub fn new(pins: [P; N], polarity: Polarity) -> Self {
        let mut bank = Self { pins, polarity };
        for ch in 0..N {
            bank.clear(ch);
        }
        bank
    }

    pub fn release(self) -> [P; N] {
        self.pins
    }

    fn drive(&mut self, channel: usize, lit: bool) {
        let high = lit == (self.polarity == Polarity::ActiveHigh);
        if let Some(pin) = self.pins.get_mut(channel) {
            let _ = if high { pin.set_high() } else { pin.set_low() };
        }
    }
}

impl<P: StatefulOutputPin, const N: usize> Outputs for LedBank<P, N> {
    fn set(&mut self, channel: usize) {
        self.drive(channel, true);
    }

    fn clear(&mut self, channel: usize) {
        self.drive(channel, false);
    }

    fn toggle(&mut self, channel: usize) {
        if let Some(pin) = self.pins.get_mut(channel) {
            let _ = pin.toggle();
        }
    }

    fn is_active(&mut self, channel: usize) -> bool {
        let Some(pin) = self.pins.get_mut(channel) else {
            return false;
        };
        let high = pin.is_set_high().unwrap_or(false);
        match self.polarity {
            Polarity::ActiveHigh => high,
            Polarity::ActiveLow => !high,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorType, OutputPin};

    #[derive(Default)]
    struct Pin {
        high: bool,
        writes: usize,
    }

    impl ErrorType for Pin {
        type Error = Infallible;
    }

    impl OutputPin for Pin {
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }
    }

    impl StatefulOutputPin for Pin {
        fn is_set_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.high)
        }

        fn is_set_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.high)
        }
    }

    #[test]
    fn new_bank_is_dark() {
        let mut bank = LedBank::new([Pin::default(), Pin { high: true, writes: 0 }], Polarity::ActiveHigh);
        assert!(!bank.is_active(0));
        assert!(!bank.is_active(1));
    }

    #[test]
    fn active_low_drives_inverted_levels() {
        let mut bank = LedBank::new([Pin::default()], Polarity::ActiveLow);
        // off means high on an active-low LED
        assert!(!bank.is_active(0));
        bank.set(0);
        assert!(bank.is_active(0));
        let [pin] = bank.release();
        assert!(!pin.high);
    }

    #[test]
    fn toggle_then_clear() {
        let mut bank = LedBank::new([Pin::default(), Pin::default()], Polarity::ActiveHigh);
        bank.toggle(1);
        assert!(bank.is_active(1));
        assert!(!bank.is_active(0));
        bank.toggle(1);
        assert!(!bank.is_active(1));

        bank.set(0);
        bank.clear(0);
        bank.clear(0);
        assert!(!bank.is_active(0));
    }

    #[test]
    fn out_of_range_channel_is_ignored() {
        let mut bank = LedBank::new([Pin::default()], Polarity::ActiveHigh);
        bank.set(3);
        bank.toggle(3);
        assert!(!bank.is_active(3));
        let [pin] = bank.release();
        // only the power-on clear touched the pin
        assert_eq!(pin.writes, 1);
    }
}
