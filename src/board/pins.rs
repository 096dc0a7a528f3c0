//! GPIO |     Function     |      Notes
//! -----+------------------+----------------------------------
//!  3   | Button 1         | Active LOW, internal pullup
//!  4   | LED 0            | Active HIGH, 330R to GND
//!  5   | LED 1            | Active HIGH, 330R to GND
//!  9   | Button 0 (BOOT)  | Active LOW, internal pullup
//! 20   | UART0 RX         | Console commands '1', '2'
//! 21   | UART0 TX         | Unused; logs go over USB-JTAG

use crate::drivers::input::Edge;
use crate::drivers::led::Polarity;

/// Button/LED pairs; channel i is LED i gated by button i.
pub const CHANNELS: usize = 2;

// ----- LEDs -----
pub const LED0: u8 = 4;
pub const LED1: u8 = 5;
pub const LED_POLARITY: Polarity = Polarity::ActiveHigh;

// ----- Buttons -----
pub const BTN0: u8 = 9;
pub const BTN1: u8 = 3;
// press-and-release: act on the rising edge of an active-low button
pub const BTN_EDGE: Edge = Edge::Rising;
pub const BTN_DEBOUNCE_HZ: u32 = 10;

// ----- Console -----
pub const UART_RX: u8 = 20;
pub const UART_TX: u8 = 21;
