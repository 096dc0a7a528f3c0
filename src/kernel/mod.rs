// Cooperative kernel: clock, periodic task table, ISR activation flags
// Single core, no preemption. Interrupts only flip activation flags and
// advance the tick counter; everything else runs in the poll loop.

pub mod activation;
pub mod clock;
pub mod poll;
pub mod scheduler;
pub mod shared;

pub use activation::{Activation, ActivationFlag, ActivationTable};
pub use clock::{Clock, TickCounter, elapsed_ms};
pub use poll::{DrivePolicy, Iteration, LoopConfig, PollLoop, Service};
pub use scheduler::{RegisterError, Scheduler, TimerTask};
pub use shared::Shared;
