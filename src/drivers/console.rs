// Serial console control
//
// Digits '1'..'9' act as a software edge on channels 0..8, for boards
// with fewer buttons than LEDs. The console is the poll loop's service:
// each poll drains the bytes already waiting and never blocks.

use core::fmt;

use crate::kernel::activation::{ActivationTable, Outputs};
use crate::kernel::poll::Service;

// bound one poll's work even if the host floods the line
const MAX_BYTES_PER_POLL: usize = 16;

/// Non-blocking byte receiver. `WouldBlock` means nothing is waiting.
pub trait ByteSource {
    type Error: fmt::Debug;

    fn read(&mut self) -> nb::Result<u8, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle(usize),
}

impl Command {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'1'..=b'9' => Some(Command::Toggle((byte - b'1') as usize)),
            _ => None,
        }
    }
}

pub struct Console<'a, R, O, const N: usize> {
    rx: R,
    outputs: O,
    activation: &'a ActivationTable<N>,
    commands: u32,
}

impl<'a, R: ByteSource, O: Outputs, const N: usize> Console<'a, R, O, N> {
    pub fn new(rx: R, outputs: O, activation: &'a ActivationTable<N>) -> Self {
        Self {
            rx,
            outputs,
            activation,
            commands: 0,
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Toggle(ch) => match self.activation.on_edge(ch, &mut self.outputs) {
                Some(state) => {
                    self.commands = self.commands.wrapping_add(1);
                    log::info!("console: channel {} {}", ch, state);
                }
                None => log::debug!("console: no channel {}", ch),
            },
        }
    }

    pub fn activation(&self) -> &'a ActivationTable<N> {
        self.activation
    }

    pub fn outputs_mut(&mut self) -> &mut O {
        &mut self.outputs
    }

    /// Commands applied since boot.
    pub fn commands(&self) -> u32 {
        self.commands
    }
}

impl<R: ByteSource, O: Outputs, const N: usize> Service for Console<'_, R, O, N> {
    fn poll(&mut self) {
        for _ in 0..MAX_BYTES_PER_POLL {
            match self.rx.read() {
                Ok(byte) => {
                    if let Some(cmd) = Command::from_byte(byte) {
                        self.apply(cmd);
                    }
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => {
                    log::warn!("console: rx error {:?}", e);
                    break;
                }
            }
        }
    }
}
