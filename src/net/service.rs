// Network service loop bring-up
//
// Boot order: pick the MAC, print the interface summary, fill the
// scheduler with the stack's timers, then poll the stack flat out with
// no outputs to drive.

use embedded_hal::delay::DelayNs;

use super::config::{Eui48Source, NetConfig, resolve_mac};
use super::timers::{ProtocolTimers, register_protocol_timers};
use crate::kernel::{
    Activation, ActivationTable, Clock, LoopConfig, PollLoop, RegisterError, Scheduler, Service,
};

static NO_CHANNELS: ActivationTable<0> = ActivationTable::new(Activation::Active);

pub type ServiceLoop<K, S, D, const T: usize> = PollLoop<'static, K, S, (), D, T, 0>;

/// Resolve the interface MAC (EEPROM first, else `config.mac`) and log
/// the addressing the stack will be given.
pub fn configure<E: Eui48Source>(eeprom: Option<&mut E>, config: NetConfig) -> NetConfig {
    let config = NetConfig {
        mac: resolve_mac(eeprom, config.mac),
        ..config
    };
    config.log_summary();
    config
}

/// Poll loop for `stack`, its protocol timers measured from `clock`'s
/// current reading.
pub fn service_loop<K, S, D, const T: usize>(
    clock: K,
    stack: S,
    delay: D,
    config: &NetConfig,
) -> Result<ServiceLoop<K, S, D, T>, RegisterError>
where
    K: Clock,
    S: Service + ProtocolTimers,
    D: DelayNs,
{
    let mut sched: Scheduler<S, T> = Scheduler::starting_at(clock.now_ms());
    register_protocol_timers(&mut sched, config.dhcp())?;
    Ok(PollLoop::new(
        clock,
        sched,
        stack,
        (),
        delay,
        &NO_CHANNELS,
        LoopConfig::flat_out(),
    ))
}

/// Stand-in stack for boards without a network interface. Counts polls
/// and hook calls; reports them at debug level every ARP period.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IdleStack {
    pub polls: u32,
    pub tcp_fast: u32,
    pub tcp_slow: u32,
    pub arp: u32,
    pub dhcp_coarse: u32,
    pub dhcp_fine: u32,
}

impl Service for IdleStack {
    fn poll(&mut self) {
        self.polls = self.polls.wrapping_add(1);
    }
}

impl ProtocolTimers for IdleStack {
    fn tcp_fast_timer(&mut self) {
        self.tcp_fast += 1;
    }

    fn tcp_slow_timer(&mut self) {
        self.tcp_slow += 1;
    }

    fn arp_timer(&mut self) {
        self.arp += 1;
        log::debug!(
            "net: idle, {} polls, tcp {}/{}, arp {}",
            self.polls,
            self.tcp_fast,
            self.tcp_slow,
            self.arp
        );
    }

    fn dhcp_coarse_timer(&mut self) {
        self.dhcp_coarse += 1;
    }

    fn dhcp_fine_timer(&mut self) {
        self.dhcp_fine += 1;
    }
}
