// Network stack glue for the poll loop
//
// The stack itself is a collaborator: it implements `Service` (one
// non-blocking unit of work per poll) and `ProtocolTimers` (its
// maintenance hooks). This module fixes the order and periods of those
// hooks, the interface addressing handed to the stack at boot, and the
// flat-out service loop that ties them together.

pub mod config;
pub mod service;
pub mod timers;

pub use config::{
    Addressing, Eui48Error, Eui48Source, MacAddress, NetConfig, NoEeprom, SummaryLine, resolve_mac,
};
pub use service::{IdleStack, ServiceLoop, configure, service_loop};
pub use timers::{PROTOCOL_TIMER_SLOTS, ProtocolTimers, register_protocol_timers};
