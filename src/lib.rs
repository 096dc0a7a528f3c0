// softloop: cooperative poll-loop kernel for single-core MCUs
//
// No OS, no executor. One main loop samples a millisecond clock,
// advances a fixed table of periodic tasks, services one poll
// function and drives outputs from ISR-owned activation flags.

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "esp32c3")]
pub mod board;
pub mod drivers;
pub mod kernel;
pub mod net;
