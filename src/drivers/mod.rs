// Drivers for the loop's collaborators: debounced inputs, LED outputs,
// serial console. Board-independent; pin wiring lives in board/.

pub mod console;
pub mod input;
pub mod led;

pub use console::{ByteSource, Command, Console};
pub use input::{ConfigError, DebounceFilter, Edge, InputChannel, InputConfig};
pub use led::{LedBank, Polarity};
