// Protocol stack maintenance timers
//
// No timer thread: the loop's scheduler calls the stack's hooks. Fast
// TCP first, then slow TCP, ARP, and the DHCP pair when DHCP is on.
// A tick that makes several due runs them in that order.

use crate::kernel::scheduler::{RegisterError, Scheduler};

pub const TCP_FAST_INTERVAL_MS: u32 = 250;
pub const TCP_SLOW_INTERVAL_MS: u32 = 500;
pub const ARP_TMR_INTERVAL_MS: u32 = 1000;
pub const DHCP_COARSE_TIMER_MS: u32 = 60_000;
pub const DHCP_FINE_TIMER_MS: u32 = 500;

/// Scheduler slots needed for the full table (DHCP included).
pub const PROTOCOL_TIMER_SLOTS: usize = 5;

pub trait ProtocolTimers {
    fn tcp_fast_timer(&mut self);
    fn tcp_slow_timer(&mut self);
    fn arp_timer(&mut self);

    fn dhcp_coarse_timer(&mut self) {}
    fn dhcp_fine_timer(&mut self) {}
}

pub fn register_protocol_timers<S: ProtocolTimers, const N: usize>(
    sched: &mut Scheduler<S, N>,
    dhcp: bool,
) -> Result<(), RegisterError> {
    sched.register(TCP_FAST_INTERVAL_MS, S::tcp_fast_timer)?;
    sched.register(TCP_SLOW_INTERVAL_MS, S::tcp_slow_timer)?;
    sched.register(ARP_TMR_INTERVAL_MS, S::arp_timer)?;
    if dhcp {
        sched.register(DHCP_COARSE_TIMER_MS, S::dhcp_coarse_timer)?;
        sched.register(DHCP_FINE_TIMER_MS, S::dhcp_fine_timer)?;
    }
    log::info!("net: {} protocol timers (dhcp: {})", sched.len(), dhcp);
    Ok(())
}
